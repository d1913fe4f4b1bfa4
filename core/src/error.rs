use thiserror::Error;

pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Everything that can stop the machine.
///
/// None of these are recovered from internally: a failed `step` halts the
/// machine and leaves its state as it was before the failing instruction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("unknown instruction {word:#06X} at {address:#05X}")]
    UnknownInstruction { word: u16, address: u16 },
    #[error("memory access out of bounds at {address:#06X}")]
    MemoryOutOfBounds { address: usize },
    #[error("stack overflow: more than 16 nested calls")]
    StackOverflow,
    #[error("stack underflow: return without a matching call")]
    StackUnderflow,
    #[error("program counter {pc:#06X} is not aligned to an instruction")]
    MisalignedProgramCounter { pc: u16 },
    #[error("no program has been loaded")]
    NotLoaded,
    #[error("the machine has halted")]
    Halted,
    #[error("program is {size} bytes but at most {max} fit in memory")]
    InvalidProgramSize { size: usize, max: usize },
    #[error("key {key:#04X} is not on the keypad")]
    InvalidKey { key: u8 },
}
