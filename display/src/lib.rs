//! SDL2 rendering of the Chip-8 frame buffer.

pub use display::Display;

mod display;
