use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// # Frame Buffer
/// The monochrome pixel grid a host renders, 64x32 unless built otherwise.
///
/// Pixels are stored row by row, so `(x, y)` lives at `y * width + x`.
/// Sprites are XORed onto the grid and wrap around both edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl FrameBuffer {
    /// # Panics
    /// If `width` or `height` is 0
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width > 0 && height > 0,
            "frame buffer must be at least 1x1, got {}x{}",
            width,
            height
        );
        FrameBuffer {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the pixel at `(x, y)` is on; coordinates wrap
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        let index = self.index(x, y);
        self.pixels[index] = on;
    }

    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|pixel| *pixel = false);
    }

    /// XORs an 8 pixel wide sprite onto the grid with its top left corner at `(x, y)`.
    ///
    /// Each byte of `sprite` is one row, most significant bit leftmost.
    /// Returns true if any pixel was switched off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let index = self.index(x + bit, y + row);
                collision |= self.pixels[index];
                self.pixels[index] ^= true;
            }
        }
        collision
    }

    /// Iterates over the rows of the grid from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks(self.width)
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|pixel| !pixel)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y % self.height) * self.width + (x % self.width)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}
