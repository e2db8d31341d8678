//! The in-memory RGBA framebuffer that both the windowed and headless
//! front ends present: a `mpp_controller::PixelSink` that accumulates the
//! red/green/blue channel planes into one 256x256 RGBA8 image.

use mpp_controller::{Channel, PixelSink};

pub const WIDTH: u32 = 256;
pub const HEIGHT: u32 = 256;

pub struct Framebuffer {
    data: Vec<u8>,
}

impl Framebuffer {
    #[must_use]
    pub fn new() -> Self {
        let mut data = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
        for pixel in data.chunks_exact_mut(4) {
            pixel[3] = 0xFF;
        }
        Self { data }
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelSink for Framebuffer {
    fn write_word(&mut self, channel: Channel, x: u8, y: u8, word: u64) {
        let channel_offset = match channel {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        };
        let row = usize::from(y);
        for i in 0..64u32 {
            let col = usize::from(x) + i as usize;
            let bit = (word >> i) & 1 == 1;
            let offset = (row * WIDTH as usize + col) * 4 + channel_offset;
            self.data[offset] = if bit { 0xFF } else { 0 };
        }
    }

    fn refresh(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_word_sets_only_the_requested_channel() {
        let mut fb = Framebuffer::new();
        fb.write_word(Channel::Red, 0, 0, 0b1);
        assert_eq!(fb.data()[0], 0xFF); // R
        assert_eq!(fb.data()[1], 0); // G
        assert_eq!(fb.data()[2], 0); // B
        assert_eq!(fb.data()[3], 0xFF); // A always opaque
    }

    #[test]
    fn write_word_places_bits_at_chip_offset() {
        let mut fb = Framebuffer::new();
        fb.write_word(Channel::Blue, 64, 2, 0b10);
        let row = 2usize;
        let col = 65usize;
        let offset = (row * WIDTH as usize + col) * 4 + 2;
        assert_eq!(fb.data()[offset], 0xFF);
    }
}
