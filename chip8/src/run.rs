use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use log::{error, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chipvm_core::{load_rom_file, Chip8};
use chipvm_display::Display;

use crate::keymap::keymap;
use crate::Args;

pub fn run(args: &Args) -> anyhow::Result<()> {
    let mut chip8 = match args.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };

    // Load ROM before touching SDL so a bad path fails fast
    let rom = load_rom_file(&args.rom)
        .with_context(|| format!("unable to load {}", args.rom.display()))?;
    chip8.load_rom(&rom)?;
    info!("loaded {} ({} bytes)", args.rom.display(), rom.len());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, args.scale).map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    // Set initial timing
    let cycle_time = Duration::from_secs(1) / args.hz.max(1);
    let mut last_cycle = Instant::now();

    // Whether or not the configured clock speed should be respected
    let mut fast_forward = false;

    'event: loop {
        // If something was drawn since the last frame, render it
        if let Some(frame) = chip8.take_frame() {
            display.render(frame).map_err(|e| anyhow!(e))?;
        }

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_press(kc),
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Backspace, _) => chip8.reset(),
                    (Keycode::Escape, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_release(kc),
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        if let Err(fault) = chip8.cycle() {
            error!("halting: {}", fault);
            return Err(fault.into());
        }

        // Handle timing
        let elapsed_cycle_time = last_cycle.elapsed();
        if !fast_forward && cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = Instant::now();
    }

    Ok(())
}
