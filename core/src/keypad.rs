use crate::constants::KEY_COUNT;
use crate::error::{Chip8Error, Result};

/// # Keypad
/// Chip-8 input is generated with a hexadecimal keypad.
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
/// The host presses and releases keys between steps; instructions only read them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: u8) -> Result<()> {
        *self.slot(key)? = true;
        Ok(())
    }

    pub fn release(&mut self, key: u8) -> Result<()> {
        *self.slot(key)? = false;
        Ok(())
    }

    pub fn set_all(&mut self, pressed: [bool; KEY_COUNT]) {
        self.pressed = pressed;
    }

    /// Whether `key` is held; only the low nibble of `key` is used
    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed[usize::from(key & 0xF)]
    }

    /// The lowest key that is held now but was not held in `previous`
    pub fn newly_pressed(&self, previous: &Keypad) -> Option<u8> {
        (0..KEY_COUNT as u8).find(|&key| self.is_pressed(key) && !previous.is_pressed(key))
    }

    fn slot(&mut self, key: u8) -> Result<&mut bool> {
        self.pressed
            .get_mut(usize::from(key))
            .ok_or(Chip8Error::InvalidKey { key })
    }
}
