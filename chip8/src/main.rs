use std::path::PathBuf;

use clap::Parser;

use chipvm_core::CLOCK_SPEED_HZ;

mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(name = "chipvm")]
#[command(about = "Runs a Chip-8 program in an SDL2 window", long_about = None)]
pub struct Args {
    /// Path to the Chip-8 ROM image
    rom: PathBuf,

    /// Instructions executed per second; the timers tick once per instruction
    #[arg(long, default_value_t = CLOCK_SPEED_HZ)]
    hz: u32,

    /// Size of each Chip-8 pixel on screen
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// Seed for CXKK; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG isn't set (e.g. warn, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .parse_default_env()
        .init();

    run::run(&args)
}
