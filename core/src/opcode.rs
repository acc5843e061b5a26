/// # Opcodes
///
/// Instruction words are 16 bits each, fetched big-endian from two consecutive bytes of memory.
/// Their behavior is cased on some combination of:
/// - `(n, _, _, _)` the instruction group; applies to all opcodes
/// - `(_, _, _, n)` the ALU operation within group 0x8
/// - `(_, _, n, n)` the operation within groups 0x0, 0xE and 0xF
///
/// Nibbles not used to select the operation carry its operands.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` an immediate byte that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` the register Vx or the register range V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` the height of a sprite
///
/// Every accessor is total over all 65536 words.
pub trait Opcode {
    /// The component nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// The instruction group.
    /// `[g___]`
    fn group(&self) -> u8;

    /// `[_x__]`
    fn x(&self) -> u8;

    /// `[__y_]`
    fn y(&self) -> u8;

    /// `[___n]`
    fn n(&self) -> u8;

    /// The least significant byte.
    /// `[__kk]`
    fn kk(&self) -> u8;

    /// The low 12 bits.
    /// `[_adr]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.group(), self.x(), self.y(), self.n())
    }

    fn group(&self) -> u8 {
        (self >> 12) as u8
    }

    fn x(&self) -> u8 {
        ((self >> 8) & 0xF) as u8
    }

    fn y(&self) -> u8 {
        ((self >> 4) & 0xF) as u8
    }

    fn n(&self) -> u8 {
        (self & 0xF) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0xFF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}
