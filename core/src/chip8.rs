use log::{debug, error, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{KEY_COUNT, MAX_PROGRAM_SIZE, PROGRAM_START};
use crate::error::{Chip8Error, Result};
use crate::framebuffer::FrameBuffer;
use crate::instruction::decode;
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::operations::{execute, resume_key_wait};
use crate::quirks::Quirks;
use crate::registers::RegisterFile;
use crate::stack::CallStack;
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `quirks` that select which interpreter dialect to emulate
///  - a random number generator, seeded for reproducible runs if asked
///  - whether a program is loaded and whether the machine has halted
///
/// Supplies interfaces for:
/// - loading programs
/// - pressing and releasing keys
/// - advancing the CPU one instruction at a time
/// - advancing its timers at 60Hz
/// - inspecting its frame buffer, timers and registers for rendering, beeping and debugging
///
/// Nothing here keeps time. The host decides how often `step` (about 700 times a second) and
/// `tick_60hz` are called.
pub struct Chip8 {
    state: State,
    quirks: Quirks,
    seed: Option<u64>,
    rng: StdRng,
    loaded: bool,
    halted: Option<Chip8Error>,
}

impl Chip8 {
    pub fn new(quirks: Quirks) -> Self {
        Chip8::build(quirks, None)
    }

    /// A machine whose `Cxkk` sequence is the same on every run and every reload
    pub fn with_seed(quirks: Quirks, seed: u64) -> Self {
        Chip8::build(quirks, Some(seed))
    }

    fn build(quirks: Quirks, seed: Option<u64>) -> Self {
        Chip8 {
            state: State::new(),
            quirks,
            seed,
            rng: Chip8::rng(seed),
            loaded: false,
            halted: None,
        }
    }

    fn rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Resets the machine and loads a program at `PROGRAM_START`.
    ///
    /// A program too large to fit leaves the machine as it was.
    ///
    /// # Arguments
    /// * `program` the bytes of a ROM
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::InvalidProgramSize {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }

        let mut state = State::new();
        state.memory.load(usize::from(PROGRAM_START), program)?;
        self.state = state;
        self.rng = Chip8::rng(self.seed);
        self.halted = None;
        self.loaded = true;
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Advances the CPU by a single instruction
    /// - fails if no program is loaded or the machine has halted
    /// - while awaiting a keypress only checks the keypad
    /// - otherwise gets and executes the next opcode
    ///
    /// Any error halts the machine with the pc still on the failing instruction.
    pub fn step(&mut self) -> Result<()> {
        if !self.loaded {
            return Err(Chip8Error::NotLoaded);
        }
        if self.halted.is_some() {
            return Err(Chip8Error::Halted);
        }
        if self.state.awaiting_key.is_some() {
            resume_key_wait(&mut self.state);
            return Ok(());
        }

        let address = self.state.registers.pc;
        if let Err(err) = self.cycle() {
            error!("halted at {:03X}: {}", address, err);
            self.state.registers.pc = address;
            self.halted = Some(err.clone());
            return Err(err);
        }
        Ok(())
    }

    fn cycle(&mut self) -> Result<()> {
        let op = self.get_op()?;
        let instruction = decode(op.word());
        trace!(
            "{:03X} {:04X} {:<16} v{:02X?} i{:03X}",
            self.state.registers.pc,
            op,
            instruction.to_string(),
            self.state.registers.v,
            self.state.registers.i
        );
        self.state.registers.pc += 0x2;
        execute(instruction, &mut self.state, &self.quirks, &mut self.rng)
    }

    /// Gets the opcode currently pointed at by the pc.
    fn get_op(&self) -> Result<Opcode> {
        let pc = self.state.registers.pc;
        if pc % 2 != 0 {
            return Err(Chip8Error::MisalignedProgramCounter { pc });
        }
        self.state.memory.read_word(usize::from(pc)).map(Opcode)
    }

    /// Decrements the delay and sound timers; call at 60Hz
    pub fn tick_60hz(&mut self) {
        self.state.timers.tick();
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the keypad index 0x0..=0xF that was pressed
    pub fn key_press(&mut self, key: u8) -> Result<()> {
        self.state.keypad.press(key)
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the keypad index 0x0..=0xF that was released
    pub fn key_release(&mut self, key: u8) -> Result<()> {
        self.state.keypad.release(key)
    }

    /// Replaces the whole keypad, for hosts that poll every key each frame
    pub fn set_keys(&mut self, pressed: [bool; KEY_COUNT]) {
        self.state.keypad.set_all(pressed);
    }

    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.state.keypad.is_pressed(key)
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.timers.sound
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.timers.delay
    }

    /// A tone should play while the sound timer is running
    pub fn is_beeping(&self) -> bool {
        self.state.timers.sound > 0
    }

    pub fn pc(&self) -> u16 {
        self.state.registers.pc
    }

    pub fn i(&self) -> u16 {
        self.state.registers.i
    }

    /// Vx
    pub fn v(&self, x: u8) -> u8 {
        self.state.v(x & 0xF)
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.state.registers
    }

    pub fn stack(&self) -> &CallStack {
        &self.state.stack
    }

    /// Number of subroutine calls that haven't returned
    pub fn stack_depth(&self) -> usize {
        self.state.stack.depth()
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.state.awaiting_key.is_some()
    }

    /// The error that halted the machine, if it has halted
    pub fn halt_reason(&self) -> Option<&Chip8Error> {
        self.halted.as_ref()
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(Quirks::default())
    }
}
