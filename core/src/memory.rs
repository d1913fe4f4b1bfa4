use crate::constants::MEMORY_SIZE;
use crate::error::{Chip8Error, Result};

/// # Memory
/// 4096 bytes of addressable memory.
///
/// - `0x000..0x200` is reserved for the interpreter (the font lives here)
/// - `0x200..0x1000` holds the program and its data
///
/// Every access is checked; addresses are never wrapped.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            bytes: [0; MEMORY_SIZE],
        }
    }

    pub fn read(&self, address: usize) -> Result<u8> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds { address })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<()> {
        let byte = self
            .bytes
            .get_mut(address)
            .ok_or(Chip8Error::MemoryOutOfBounds { address })?;
        *byte = value;
        Ok(())
    }

    /// Reads the big-endian word at `address..address + 2`
    pub fn read_word(&self, address: usize) -> Result<u16> {
        let bytes = self.slice(address, 2)?;
        Ok(u16::from(bytes[0]) << 8 | u16::from(bytes[1]))
    }

    /// Borrows `len` bytes starting at `address`.
    ///
    /// The whole range is checked up front; the reported address is the first one past the end
    /// of memory.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8]> {
        let range = Memory::range(address, len)?;
        Ok(&self.bytes[range])
    }

    pub fn slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8]> {
        let range = Memory::range(address, len)?;
        Ok(&mut self.bytes[range])
    }

    /// Copies `data` into memory starting at `address`
    pub fn load(&mut self, address: usize, data: &[u8]) -> Result<()> {
        self.slice_mut(address, data.len())?.copy_from_slice(data);
        Ok(())
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    fn range(address: usize, len: usize) -> Result<std::ops::Range<usize>> {
        let end = address + len;
        if end > MEMORY_SIZE {
            let address = address.max(MEMORY_SIZE);
            return Err(Chip8Error::MemoryOutOfBounds { address });
        }
        Ok(address..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
