use crate::constants::STACK_DEPTH;
use crate::error::{Chip8Error, Result};

/// # Call Stack
/// Stores return addresses when subroutines are called.
///
/// `sp` is the number of addresses currently stored; `stack[sp - 1]` is the top.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CallStack {
    stack: [u16; STACK_DEPTH],
    sp: usize,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            stack: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn push(&mut self, address: u16) -> Result<()> {
        if self.is_full() {
            return Err(Chip8Error::StackOverflow);
        }
        self.stack[self.sp] = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }

    pub fn is_full(&self) -> bool {
        self.sp == STACK_DEPTH
    }

    /// Stored return addresses, oldest first
    pub fn addresses(&self) -> &[u16] {
        &self.stack[..self.sp]
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
