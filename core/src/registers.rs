use crate::constants::PROGRAM_START;

/// # Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is also written as the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
/// - (pc) a 16-bit program counter
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
}

/// Index of the register doubling as the flag register
pub const VF: usize = 0xF;

impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
        }
    }

    /// Sets VF to 1 or 0
    pub fn set_flag(&mut self, flag: bool) {
        self.v[VF] = u8::from(flag);
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}
