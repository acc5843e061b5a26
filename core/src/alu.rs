//! Arithmetic and logic for group 0x8 and the immediate forms in 0x6, 0x7 and 0xC.
//!
//! Every operation takes Vx and the second operand and returns the value to store in Vx along
//! with the new value of VF, if the operation defines one. Flags always describe the operands
//! before truncation to 8 bits.

/// Result of an ALU operation; `flag` is `None` when VF is left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    pub value: u8,
    pub flag: Option<u8>,
}

impl Output {
    fn plain(value: u8) -> Self {
        Output { value, flag: None }
    }

    fn flagged(value: u8, flag: bool) -> Self {
        Output {
            value,
            flag: Some(u8::from(flag)),
        }
    }
}

/// ALU operations selected by the low nibble of an 8XYN instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Load,
    Or,
    And,
    Xor,
    Add,
    Sub,
    ShiftRight,
    SubReverse,
    ShiftLeft,
}

impl AluOp {
    /// Selects the operation for an 8XYN sub-code; unused sub-codes return `None`.
    pub fn from_nibble(n: u8) -> Option<Self> {
        match n {
            0x0 => Some(AluOp::Load),
            0x1 => Some(AluOp::Or),
            0x2 => Some(AluOp::And),
            0x3 => Some(AluOp::Xor),
            0x4 => Some(AluOp::Add),
            0x5 => Some(AluOp::Sub),
            0x6 => Some(AluOp::ShiftRight),
            0x7 => Some(AluOp::SubReverse),
            0xE => Some(AluOp::ShiftLeft),
            _ => None,
        }
    }

    pub fn apply(self, a: u8, b: u8) -> Output {
        match self {
            AluOp::Load => load(a, b),
            AluOp::Or => or(a, b),
            AluOp::And => and(a, b),
            AluOp::Xor => xor(a, b),
            AluOp::Add => add(a, b),
            AluOp::Sub => sub(a, b),
            AluOp::ShiftRight => shr(a),
            AluOp::SubReverse => subn(a, b),
            AluOp::ShiftLeft => shl(a),
        }
    }
}

/// Vx = b
pub fn load(_a: u8, b: u8) -> Output {
    Output::plain(b)
}

/// Vx |= b
pub fn or(a: u8, b: u8) -> Output {
    Output::plain(a | b)
}

/// Vx &= b
pub fn and(a: u8, b: u8) -> Output {
    Output::plain(a & b)
}

/// Vx ^= b
pub fn xor(a: u8, b: u8) -> Output {
    Output::plain(a ^ b)
}

/// Vx += b; VF = carry
pub fn add(a: u8, b: u8) -> Output {
    let sum = u16::from(a) + u16::from(b);
    Output::flagged(sum as u8, sum > 0xFF)
}

/// Vx -= b; VF = Vx > b
pub fn sub(a: u8, b: u8) -> Output {
    Output::flagged(a.wrapping_sub(b), a > b)
}

/// Vx = b - Vx; VF = b > Vx
pub fn subn(a: u8, b: u8) -> Output {
    Output::flagged(b.wrapping_sub(a), b > a)
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(a: u8) -> Output {
    Output::flagged(a >> 1, a & 0x1 == 0x1)
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(a: u8) -> Output {
    Output::flagged(a << 1, a & 0x80 == 0x80)
}

/// Vx = random & kk
pub fn random_and(random: u8, kk: u8) -> Output {
    Output::plain(random & kk)
}
