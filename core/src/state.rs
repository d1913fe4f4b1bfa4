use crate::constants::{FONT, FONT_START};
use crate::framebuffer::FrameBuffer;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::registers::RegisterFile;
use crate::stack::CallStack;
use crate::timers::TimerBank;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// - (registers) V0..VF, I and the program counter
/// - (stack) up to 16 return addresses
/// - (timers) delay & sound, decremented at 60Hz by the host
///
/// ## Memory
/// - 4096 bytes of addressable memory with the font at `FONT_START`
/// - a 64x32 frame buffer that stores the contents of the next frame to be drawn
///
/// ## Input
/// - the pressed status of keys 0..F
/// - Emulation halts until a key's value is written to `awaiting_key`
#[derive(Clone)]
pub struct State {
    pub registers: RegisterFile,
    pub stack: CallStack,
    pub timers: TimerBank,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keypad: Keypad,
    pub awaiting_key: Option<KeyWait>,
}

/// An `Fx0A` that hasn't seen a key press yet
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyWait {
    /// The register the key will be stored in
    pub register: u8,
    /// The keypad as of the last step, so only fresh presses end the wait
    pub seen: Keypad,
}

impl State {
    pub fn new() -> Self {
        let mut memory = Memory::new();
        memory.as_mut_slice()[FONT_START as usize..FONT_START as usize + FONT.len()]
            .copy_from_slice(&FONT);

        State {
            registers: RegisterFile::new(),
            stack: CallStack::new(),
            timers: TimerBank::new(),
            memory,
            frame_buffer: FrameBuffer::default(),
            draw_flag: false,
            keypad: Keypad::new(),
            awaiting_key: None,
        }
    }

    /// Vx
    pub fn v(&self, x: u8) -> u8 {
        self.registers.v[usize::from(x)]
    }

    pub fn set_v(&mut self, x: u8, value: u8) {
        self.registers.v[usize::from(x)] = value;
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
