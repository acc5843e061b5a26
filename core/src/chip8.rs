use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{KEY_COUNT, PROGRAM_CAPACITY, PROGRAM_START};
use crate::error::{Fault, LoadError};
use crate::instruction::Instruction;
use crate::operations;
use crate::state::{FrameBuffer, Keypad, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `pressed_keys` with public interfaces for manipulating them
///  - the loaded `rom` so the machine can be reset
///  - the random source used by CXKK
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the machine by a single cycle
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    pressed_keys: Keypad,
    rom: Vec<u8>,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a machine whose random numbers are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8 {
            state: State::new(),
            pressed_keys: [false; KEY_COUNT],
            rom: Vec::new(),
            rng,
        }
    }

    /// Load a rom into program memory
    ///
    /// Program memory past the image is zeroed. Memory is left untouched if the rom doesn't fit.
    ///
    /// # Arguments
    /// * `rom` the program image, placed at `PROGRAM_START`
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        if rom.len() > PROGRAM_CAPACITY {
            return Err(LoadError::TooLarge {
                size: rom.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }
        let start = PROGRAM_START as usize;
        // clear what a previous rom left behind
        self.state.memory[start..].fill(0);
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        self.rom = rom.to_vec();
        debug!("loaded {} byte rom at {:04X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    /// Restores the power-on state and reloads the current rom
    pub fn reset(&mut self) {
        self.state = State::new();
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + self.rom.len()].copy_from_slice(&self.rom);
        debug!("reset with {} byte rom", self.rom.len());
    }

    /// Borrows the FrameBuffer
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn and clears the draw flag
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Whether the sound timer is currently running
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Read access to the machine state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Write access to the machine state, for hosts and tests that need to poke at it
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.set_key(key, true);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: u8, pressed: bool) {
        match self.pressed_keys.get_mut(key as usize) {
            Some(slot) => *slot = pressed,
            None => warn!("ignoring key {:#04X}; the keypad only has keys 0..F", key),
        }
    }

    /// Advances the machine by a single cycle
    /// - fetches and executes the opcode at the pc
    /// - stores the pc returned by the instruction
    /// - decrements the timers
    ///
    /// A fault leaves the machine exactly as it was.
    pub fn cycle(&mut self) -> Result<(), Fault> {
        let op = self.state.fetch()?;
        let instruction = Instruction::decode(op);
        trace!(
            "{:04X} {:?} v{:02X?} i{:04X} pc{:04X}",
            op,
            instruction,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        let next = operations::execute(
            instruction,
            &mut self.state,
            &self.pressed_keys,
            &mut self.rng,
        )?;
        self.state.pc = next;
        self.state.tick_timers();
        Ok(())
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_advances_pc() {
        let mut chip8 = Chip8::new();
        let starting_pc = chip8.state.pc;
        chip8.load_rom(&[0x00, 0xE0]).unwrap();
        chip8.cycle().unwrap();
        assert_eq!(chip8.state.pc, starting_pc + 0x2);
    }

    #[test]
    fn test_cycle_decrements_timers() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0x00, 0xE0]).unwrap();
        chip8.state.delay_timer = 0x2;
        chip8.state.sound_timer = 0x1;
        chip8.cycle().unwrap();
        assert_eq!(chip8.state.delay_timer, 0x1);
        assert_eq!(chip8.state.sound_timer, 0x0);
        assert!(!chip8.sound_active());
    }

    #[test]
    fn test_fx15_then_fx07_sees_one_tick() {
        let mut chip8 = Chip8::new();
        // V1 = 5; DT = V1; V2 = DT
        chip8
            .load_rom(&[0x61, 0x05, 0xF1, 0x15, 0xF2, 0x07])
            .unwrap();
        for _ in 0..3 {
            chip8.cycle().unwrap();
        }
        assert_eq!(chip8.state.v[0x2], 0x4);
    }

    #[test]
    fn test_faulting_cycle_changes_nothing() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0x00, 0xEE]).unwrap();
        chip8.state.delay_timer = 0x3;
        let before = chip8.state.clone();
        assert_eq!(chip8.cycle(), Err(Fault::StackUnderflow { pc: 0x200 }));
        assert_eq!(chip8.state, before);
    }

    #[test]
    fn test_waits_for_key_then_continues() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0xF3, 0x0A]).unwrap();
        chip8.cycle().unwrap();
        chip8.cycle().unwrap();
        assert_eq!(chip8.state.pc, 0x200);
        chip8.key_press(0xB);
        chip8.cycle().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
        assert_eq!(chip8.state.v[0x3], 0xB);
    }

    #[test]
    fn test_key_press_and_release() {
        let mut chip8 = Chip8::new();
        chip8.key_press(0xE);
        assert!(chip8.pressed_keys[0xE]);
        chip8.key_release(0xE);
        assert!(!chip8.pressed_keys[0xE]);
    }

    #[test]
    fn test_ignores_keys_off_the_keypad() {
        let mut chip8 = Chip8::new();
        chip8.key_press(0x10);
        assert_eq!(chip8.pressed_keys, [false; 16]);
    }

    #[test]
    fn test_take_frame_clears_draw_flag() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0x00, 0xE0]).unwrap();
        assert!(chip8.take_frame().is_none());
        chip8.cycle().unwrap();
        assert!(chip8.take_frame().is_some());
        assert!(chip8.take_frame().is_none());
    }

    #[test]
    fn test_reset_restores_rom() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0x61, 0x05]).unwrap();
        chip8.cycle().unwrap();
        chip8.state.memory[0x200] = 0x00;
        chip8.reset();
        assert_eq!(chip8.state.pc, 0x200);
        assert_eq!(chip8.state.v[0x1], 0x0);
        assert_eq!(chip8.state.memory[0x200..0x202], [0x61, 0x05]);
    }

    #[test]
    fn test_shorter_rom_replaces_longer_one() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0xAA; 0x10]).unwrap();
        chip8.load_rom(&[0x61, 0x05]).unwrap();
        assert_eq!(chip8.state.memory[0x200..0x202], [0x61, 0x05]);
        assert!(chip8.state.memory[0x202..].iter().all(|&b| b == 0));

        let loaded = chip8.state.memory;
        chip8.reset();
        assert_eq!(chip8.state.memory, loaded);
    }

    #[test]
    fn test_seeded_machines_agree() {
        let rom = [0xC1, 0xFF, 0xC2, 0xFF];
        let mut a = Chip8::with_seed(42);
        let mut b = Chip8::with_seed(42);
        a.load_rom(&rom).unwrap();
        b.load_rom(&rom).unwrap();
        for _ in 0..2 {
            a.cycle().unwrap();
            b.cycle().unwrap();
        }
        assert_eq!(a.state.v, b.state.v);
    }
}
