use crate::alu::AluOp;
use crate::opcode::Opcode;

/// A decoded Chip-8 instruction and its operands
///
/// Register operands are nibbles (0x0..=0xF), addresses are 12 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XKK
    SkipEqImm(u8, u8),
    /// 4XKK
    SkipNeImm(u8, u8),
    /// 5XY_
    SkipEqReg(u8, u8),
    /// 6XKK
    LoadImm(u8, u8),
    /// 7XKK, no carry flag
    AddImm(u8, u8),
    /// 8XYN
    Alu(AluOp, u8, u8),
    /// 9XY_
    SkipNeReg(u8, u8),
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXKK
    Random(u8, u8),
    /// DXYN
    Draw(u8, u8, u8),
    /// EX9E
    SkipKeyPressed(u8),
    /// EXA1
    SkipKeyNotPressed(u8),
    /// FX07
    GetDelay(u8),
    /// FX0A
    WaitKey(u8),
    /// FX15
    SetDelay(u8),
    /// FX18
    SetSound(u8),
    /// FX1E
    AddIndex(u8),
    /// FX29
    FontSprite(u8),
    /// FX33
    Bcd(u8),
    /// FX55
    Store(u8),
    /// FX65
    Read(u8),
    /// Anything else in a recognized group: legacy 0NNN machine calls and unused sub-codes.
    /// Executes as a no-op.
    Unsupported(u16),
}

impl Instruction {
    /// Selects the Instruction for a raw word
    pub fn decode(op: u16) -> Self {
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Clear,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Return,
            (0x1, ..) => Instruction::Jump(op.addr()),
            (0x2, ..) => Instruction::Call(op.addr()),
            (0x3, x, ..) => Instruction::SkipEqImm(x, op.kk()),
            (0x4, x, ..) => Instruction::SkipNeImm(x, op.kk()),
            (0x5, x, y, _) => Instruction::SkipEqReg(x, y),
            (0x6, x, ..) => Instruction::LoadImm(x, op.kk()),
            (0x7, x, ..) => Instruction::AddImm(x, op.kk()),
            (0x8, x, y, n) => match AluOp::from_nibble(n) {
                Some(alu) => Instruction::Alu(alu, x, y),
                None => Instruction::Unsupported(op),
            },
            (0x9, x, y, _) => Instruction::SkipNeReg(x, y),
            (0xA, ..) => Instruction::LoadIndex(op.addr()),
            (0xB, ..) => Instruction::JumpOffset(op.addr()),
            (0xC, x, ..) => Instruction::Random(x, op.kk()),
            (0xD, x, y, n) => Instruction::Draw(x, y, n),
            (0xE, x, 0x9, 0xE) => Instruction::SkipKeyPressed(x),
            (0xE, x, 0xA, 0x1) => Instruction::SkipKeyNotPressed(x),
            (0xF, x, 0x0, 0x7) => Instruction::GetDelay(x),
            (0xF, x, 0x0, 0xA) => Instruction::WaitKey(x),
            (0xF, x, 0x1, 0x5) => Instruction::SetDelay(x),
            (0xF, x, 0x1, 0x8) => Instruction::SetSound(x),
            (0xF, x, 0x1, 0xE) => Instruction::AddIndex(x),
            (0xF, x, 0x2, 0x9) => Instruction::FontSprite(x),
            (0xF, x, 0x3, 0x3) => Instruction::Bcd(x),
            (0xF, x, 0x5, 0x5) => Instruction::Store(x),
            (0xF, x, 0x6, 0x5) => Instruction::Read(x),
            _ => Instruction::Unsupported(op),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;

    #[test]
    fn test_decodes_system_words() {
        assert_eq!(Instruction::decode(0x00E0), Instruction::Clear);
        assert_eq!(Instruction::decode(0x00EE), Instruction::Return);
        assert_eq!(Instruction::decode(0x0123), Instruction::Unsupported(0x0123));
        assert_eq!(Instruction::decode(0x00E1), Instruction::Unsupported(0x00E1));
    }

    #[test]
    fn test_decodes_address_operands() {
        assert_eq!(Instruction::decode(0x1ABC), Instruction::Jump(0xABC));
        assert_eq!(Instruction::decode(0x2123), Instruction::Call(0x123));
        assert_eq!(Instruction::decode(0xAABC), Instruction::LoadIndex(0xABC));
        assert_eq!(Instruction::decode(0xBABC), Instruction::JumpOffset(0xABC));
    }

    #[test]
    fn test_decodes_register_and_byte() {
        assert_eq!(Instruction::decode(0x3A42), Instruction::SkipEqImm(0xA, 0x42));
        assert_eq!(Instruction::decode(0x4A42), Instruction::SkipNeImm(0xA, 0x42));
        assert_eq!(Instruction::decode(0x6122), Instruction::LoadImm(0x1, 0x22));
        assert_eq!(Instruction::decode(0x7122), Instruction::AddImm(0x1, 0x22));
        assert_eq!(Instruction::decode(0xC3F0), Instruction::Random(0x3, 0xF0));
    }

    #[test]
    fn test_register_skips_ignore_low_nibble() {
        assert_eq!(Instruction::decode(0x5120), Instruction::SkipEqReg(0x1, 0x2));
        assert_eq!(Instruction::decode(0x5127), Instruction::SkipEqReg(0x1, 0x2));
        assert_eq!(Instruction::decode(0x9120), Instruction::SkipNeReg(0x1, 0x2));
    }

    #[test]
    fn test_decodes_alu_table() {
        let expected = [
            (0x0, Some(AluOp::Load)),
            (0x1, Some(AluOp::Or)),
            (0x2, Some(AluOp::And)),
            (0x3, Some(AluOp::Xor)),
            (0x4, Some(AluOp::Add)),
            (0x5, Some(AluOp::Sub)),
            (0x6, Some(AluOp::ShiftRight)),
            (0x7, Some(AluOp::SubReverse)),
            (0x8, None),
            (0xE, Some(AluOp::ShiftLeft)),
            (0xF, None),
        ];
        for (n, alu) in expected {
            let op = 0x8120 | n;
            let decoded = Instruction::decode(op);
            match alu {
                Some(alu) => assert_eq!(decoded, Instruction::Alu(alu, 0x1, 0x2)),
                None => assert_eq!(decoded, Instruction::Unsupported(op)),
            }
        }
    }

    #[test]
    fn test_decodes_draw() {
        assert_eq!(Instruction::decode(0xD125), Instruction::Draw(0x1, 0x2, 0x5));
    }

    #[test]
    fn test_decodes_key_group() {
        assert_eq!(Instruction::decode(0xE39E), Instruction::SkipKeyPressed(0x3));
        assert_eq!(Instruction::decode(0xE3A1), Instruction::SkipKeyNotPressed(0x3));
        assert_eq!(Instruction::decode(0xE3A2), Instruction::Unsupported(0xE3A2));
    }

    #[test]
    fn test_decodes_misc_group() {
        assert_eq!(Instruction::decode(0xF107), Instruction::GetDelay(0x1));
        assert_eq!(Instruction::decode(0xF10A), Instruction::WaitKey(0x1));
        assert_eq!(Instruction::decode(0xF115), Instruction::SetDelay(0x1));
        assert_eq!(Instruction::decode(0xF118), Instruction::SetSound(0x1));
        assert_eq!(Instruction::decode(0xF11E), Instruction::AddIndex(0x1));
        assert_eq!(Instruction::decode(0xF129), Instruction::FontSprite(0x1));
        assert_eq!(Instruction::decode(0xF133), Instruction::Bcd(0x1));
        assert_eq!(Instruction::decode(0xF155), Instruction::Store(0x1));
        assert_eq!(Instruction::decode(0xF165), Instruction::Read(0x1));
        assert_eq!(Instruction::decode(0xF199), Instruction::Unsupported(0xF199));
    }

    #[test]
    fn test_decode_is_total() {
        let unsupported = (0..=u16::MAX)
            .map(Instruction::decode)
            .filter(|i| matches!(i, Instruction::Unsupported(_)))
            .count();
        // 0NNN minus 00E0/00EE, seven unused ALU codes, and the unmapped E/F sub-codes
        let expected = (0x1000 - 2) + 7 * 0x100 + (0x1000 - 2 * 0x10) + (0x1000 - 9 * 0x10);
        assert_eq!(unsupported, expected);
    }
}
