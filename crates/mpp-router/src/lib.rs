//! NEWS (North/East/West/South) router over the PE array's route-data
//! flag.
//!
//! The router has no state of its own — it operates directly on the
//! `FLAG_ROUTE_DATA` plane of a [`PeArray`] handed to it by the caller,
//! the same relationship a ULA has to the framebuffer memory it's given
//! rather than owning memory itself.
//!
//! # Bit layout
//!
//! The route-data plane is a flat array of 1,024 chip words (`u64`),
//! indexed as `pid >> 6`. Because `pid = x | (y << 8)` and 256 is a
//! multiple of 64, this layout falls out of the torus geometry directly:
//!
//! - row `y` occupies the four contiguous words `[y*4, y*4+4)`
//! - within a row, word `y*4 + (x / 64)` holds the 64 cells `x` in
//!   `[64*(x/64), 64*(x/64)+64)`
//! - within a word, bit `x % 64` is the cell at column `x`
//!
//! `rotate_n`/`rotate_s` therefore reduce to rotating the *list of rows*
//! (no bit shifts needed); `rotate_e`/`rotate_w` rotate the 256 bits of
//! each row, carrying across the 4-word boundary.

use mpp_engine::PeArray;

/// Number of `u64` words per torus row (256 columns / 64 bits).
const WORDS_PER_ROW: usize = 4;

/// A view onto a [`PeArray`]'s route-data plane, providing the torus
/// shift and 2D unicast/read operations.
pub struct NewsRouter<'a> {
    engine: &'a mut PeArray,
}

impl<'a> NewsRouter<'a> {
    /// Borrows `engine` for the duration of the router operations.
    pub fn new(engine: &'a mut PeArray) -> Self {
        Self { engine }
    }

    fn row_words(&self, y: u8) -> [u64; WORDS_PER_ROW] {
        let base = usize::from(y) * WORDS_PER_ROW;
        let plane = self.engine.route_plane();
        [
            plane[base],
            plane[base + 1],
            plane[base + 2],
            plane[base + 3],
        ]
    }

    /// Atomic toroidal shift: the value previously at `(x, y)` is now at
    /// `(x, y - 1 mod 256)`.
    pub fn rotate_n(&mut self) {
        let plane = self.engine.route_plane_mut();
        let first: [u64; WORDS_PER_ROW] = plane[0..WORDS_PER_ROW].try_into().unwrap();
        plane.copy_within(WORDS_PER_ROW.., 0);
        let len = plane.len();
        plane[len - WORDS_PER_ROW..].copy_from_slice(&first);
    }

    /// Atomic toroidal shift: the value previously at `(x, y)` is now at
    /// `(x, y + 1 mod 256)`.
    pub fn rotate_s(&mut self) {
        let plane = self.engine.route_plane_mut();
        let len = plane.len();
        let last: [u64; WORDS_PER_ROW] = plane[len - WORDS_PER_ROW..].try_into().unwrap();
        plane.copy_within(0..len - WORDS_PER_ROW, WORDS_PER_ROW);
        plane[0..WORDS_PER_ROW].copy_from_slice(&last);
    }

    /// Atomic toroidal shift: the value previously at `(x, y)` is now at
    /// `(x + 1 mod 256, y)`.
    pub fn rotate_e(&mut self) {
        let plane = self.engine.route_plane_mut();
        for row in plane.chunks_exact_mut(WORDS_PER_ROW) {
            rotate_row_left(row.try_into().unwrap()).copy_into(row);
        }
    }

    /// Atomic toroidal shift: the value previously at `(x, y)` is now at
    /// `(x - 1 mod 256, y)`.
    pub fn rotate_w(&mut self) {
        let plane = self.engine.route_plane_mut();
        for row in plane.chunks_exact_mut(WORDS_PER_ROW) {
            rotate_row_right(row.try_into().unwrap()).copy_into(row);
        }
    }

    /// Sets `FLAG_ROUTE_DATA` of the PE at `(x, y)` to `b`.
    pub fn unicast_2d(&mut self, x: u8, y: u8, b: bool) {
        let word_index = usize::from(y) * WORDS_PER_ROW + usize::from(x / 64);
        let bit = u32::from(x % 64);
        let plane = self.engine.route_plane_mut();
        if b {
            plane[word_index] |= 1u64 << bit;
        } else {
            plane[word_index] &= !(1u64 << bit);
        }
    }

    /// Reads `FLAG_ROUTE_DATA` of the PE at `(x, y)`.
    #[must_use]
    pub fn read_2d(&self, x: u8, y: u8) -> bool {
        let word_index = usize::from(y) * WORDS_PER_ROW + usize::from(x / 64);
        let bit = u32::from(x % 64);
        let plane = self.engine.route_plane();
        (plane[word_index] >> bit) & 1 != 0
    }

    /// Returns the 64-bit word formed from `FLAG_ROUTE_DATA` of the chip
    /// containing `(x, y)`; bit `i` is the PE at chip-local index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `x` is not chip-aligned (a multiple of 64).
    #[must_use]
    pub fn read64_2d(&self, x: u8, y: u8) -> u64 {
        assert!(x % 64 == 0, "read64_2d requires a chip-aligned x, got {x}");
        self.row_words(y)[usize::from(x / 64)]
    }

    /// Router self-test: unicasts a single live cell, performs one full
    /// rotation cycle (four calls) in each of the four directions, and
    /// confirms the cell returns to its origin after each cycle.
    ///
    /// Not used by the Life step; a diagnostic grounded in the original
    /// implementation's own `test_n`/`test_e`/`test_w`/`test_s` routines.
    #[must_use]
    pub fn self_test(&mut self) -> bool {
        let (x, y) = (17u8, 201u8);
        for rotator in [
            Self::rotate_n as fn(&mut Self),
            Self::rotate_e as fn(&mut Self),
            Self::rotate_w as fn(&mut Self),
            Self::rotate_s as fn(&mut Self),
        ] {
            self.engine.route_plane_mut().fill(0);
            self.unicast_2d(x, y, true);
            for _ in 0..4 {
                rotator(self);
            }
            if !self.read_2d(x, y) {
                return false;
            }
            if self.engine.route_plane().iter().map(|w| w.count_ones()).sum::<u32>() != 1 {
                return false;
            }
        }
        true
    }
}

/// The four words of a torus row, little-endian: `words[0]` holds
/// columns `0..64`, `words[3]` holds columns `192..256`.
struct Row([u64; WORDS_PER_ROW]);

impl Row {
    fn copy_into(self, dst: &mut [u64]) {
        dst.copy_from_slice(&self.0);
    }
}

/// Rotates a 256-bit row left by one bit (column `x` takes the value
/// previously at `x - 1`), carrying across word boundaries.
fn rotate_row_left(words: [u64; WORDS_PER_ROW]) -> Row {
    let wrap = words[WORDS_PER_ROW - 1] >> 63;
    let mut carry = wrap;
    let mut out = words;
    for w in &mut out {
        let top = *w >> 63;
        *w = (*w << 1) | carry;
        carry = top;
    }
    Row(out)
}

/// Rotates a 256-bit row right by one bit (column `x` takes the value
/// previously at `x + 1`), carrying across word boundaries.
fn rotate_row_right(words: [u64; WORDS_PER_ROW]) -> Row {
    let wrap = words[0] & 1;
    let mut carry = wrap;
    let mut out = words;
    for w in out.iter_mut().rev() {
        let bottom = *w & 1;
        *w = (*w >> 1) | (carry << 63);
        carry = bottom;
    }
    Row(out)
}
