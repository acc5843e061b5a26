/// Width of the frame buffer in pixels
pub const DISPLAY_WIDTH: usize = 64;

/// Height of the frame buffer in pixels
pub const DISPLAY_HEIGHT: usize = 32;

/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Address where ROMs are loaded and execution starts
pub const PROGRAM_START: u16 = 0x200;

/// Largest ROM that fits between `PROGRAM_START` and the end of memory
pub const PROGRAM_CAPACITY: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Address of the built-in hex digit sprites
pub const FONT_START: u16 = 0x000;

/// Each font sprite is 8 pixels wide and 5 rows tall
pub const FONT_SPRITE_HEIGHT: u16 = 5;

/// Maximum depth of nested subroutine calls
pub const STACK_DEPTH: usize = 16;

/// Number of keys on the hex keypad
pub const KEY_COUNT: usize = 16;

/// Index of VF, the register used for carry, borrow and collision flags
pub const FLAG_REGISTER: usize = 0xF;

/// Default number of instructions executed per second by the host driver
pub const CLOCK_SPEED_HZ: u32 = 500;

/// # Sprite Sheet
/// Sprites for the hex digits 0..F, stored in the reserved area starting at `FONT_START`.
///
/// Each byte is one row of a sprite; the set bits of the high nibble are the lit pixels.
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
