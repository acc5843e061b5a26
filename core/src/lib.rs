//! A Chip-8 interpreter core: machine state, decoding, and instruction execution.
//!
//! The host owns a [`Chip8`], feeds it key presses, calls [`Chip8::cycle`] at whatever rate it
//! likes, and renders [`Chip8::take_frame`] when it returns a frame.

pub use chip8::Chip8;
pub use constants::CLOCK_SPEED_HZ;
pub use error::{Fault, LoadError};
pub use instruction::Instruction;
pub use rom::{load_rom_file, read_rom};

pub mod alu;
mod chip8;
pub mod constants;
mod error;
mod instruction;
pub mod opcode;
mod operations;
mod rom;
pub mod state;
