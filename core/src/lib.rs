pub use chip8::Chip8;
pub use constants::{CPU_HZ, TIMER_HZ};
pub use error::{Chip8Error, Result};
pub use framebuffer::FrameBuffer;
pub use instruction::{decode, disassemble, Disassembled, Instruction};
pub use keypad::Keypad;
pub use opcode::Opcode;
pub use quirks::Quirks;

mod chip8;
pub mod constants;
mod error;
mod framebuffer;
mod instruction;
mod keypad;
pub mod memory;
mod opcode;
pub mod operations;
mod quirks;
pub mod registers;
pub mod stack;
pub mod state;
pub mod timers;
