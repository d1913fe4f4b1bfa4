/// # Timers
/// Two 8-bit countdowns that are decremented at 60Hz until they reach 0.
/// - `delay` is read and written by programs for timing
/// - `sound` plays a tone for as long as it is above 0
///
/// Nothing reloads them; the host decides when a tick happens.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimerBank {
    pub delay: u8,
    pub sound: u8,
}

impl TimerBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }
}
