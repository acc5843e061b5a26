use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions raised while executing an instruction.
///
/// A faulting instruction leaves the machine state exactly as it was before the cycle began,
/// so the host may inspect it, reset, or halt.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error("address {addr:#06X} is outside of memory (pc {pc:#06X})")]
    AddressOutOfRange { addr: usize, pc: u16 },
    #[error("stack overflow: more than 16 nested calls (pc {pc:#06X})")]
    StackOverflow { pc: u16 },
    #[error("stack underflow: return with an empty stack (pc {pc:#06X})")]
    StackUnderflow { pc: u16 },
}

/// Reasons a ROM could not be placed in memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("rom not found: {0}")]
    NotFound(PathBuf),
    #[error("rom is {size} bytes but only {capacity} bytes of program space are available")]
    TooLarge { size: usize, capacity: usize },
    #[error("rom was truncated: expected {expected} bytes but read {read}")]
    Truncated { expected: usize, read: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
