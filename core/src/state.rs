use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, KEY_COUNT, MEMORY_SIZE, PROGRAM_START,
    SPRITE_SHEET, STACK_DEPTH,
};
use crate::error::Fault;

/// The FrameBuffer is indexed as [y][x]; each cell is 0 (off) or 1 (on)
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Pressed status of the keys 0..F
pub type Keypad = [bool; KEY_COUNT];

/// The complete mutable state of a Chip-8 machine
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the flag register for carry, borrow and collisions
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses currently on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented once per cycle while non-zero
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the font sprite sheet
///     - 0x200.. holds the loaded program
/// - 32x64 frame buffer
///
/// Every memory access and stack operation is bounds checked and reports a `Fault`
/// instead of wrapping.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
        }
    }

    /// Fetches the big-endian instruction word at the pc.
    pub fn fetch(&self) -> Result<u16, Fault> {
        let bytes = self.slice(self.pc as usize, 2)?;
        Ok(u16::from(bytes[0]) << 8 | u16::from(bytes[1]))
    }

    /// Borrows `len` bytes of memory starting at `start`.
    pub fn slice(&self, start: usize, len: usize) -> Result<&[u8], Fault> {
        let end = self.checked_end(start, len)?;
        Ok(&self.memory[start..end])
    }

    /// Mutably borrows `len` bytes of memory starting at `start`.
    pub fn slice_mut(&mut self, start: usize, len: usize) -> Result<&mut [u8], Fault> {
        let end = self.checked_end(start, len)?;
        Ok(&mut self.memory[start..end])
    }

    fn checked_end(&self, start: usize, len: usize) -> Result<usize, Fault> {
        let end = start + len;
        if end > MEMORY_SIZE {
            // report the first address that doesn't exist
            let addr = start.max(MEMORY_SIZE);
            return Err(Fault::AddressOutOfRange { addr, pc: self.pc });
        }
        Ok(end)
    }

    /// Pushes a return address.
    ///
    /// `sp` counts live entries: the address goes in `stack[sp]`, then `sp` grows, so the first
    /// call fills slot 0.
    pub fn push(&mut self, addr: u16) -> Result<(), Fault> {
        let sp = self.sp as usize;
        if sp >= STACK_DEPTH {
            return Err(Fault::StackOverflow { pc: self.pc });
        }
        self.stack[sp] = addr;
        self.sp += 1;
        Ok(())
    }

    /// Pops the most recent return address.
    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow { pc: self.pc });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    /// Decrements both timers towards zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
