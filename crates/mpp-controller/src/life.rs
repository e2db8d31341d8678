//! The Life step microprogram (SPEC_FULL.md §4.F): one Conway's Life
//! generation, built entirely out of `Controller` primitives and router
//! rotations.

use mpp_engine::FLAG_ROUTE_DATA;

use crate::controller::Controller;
use crate::pixel_sink::{Channel, PixelSink};

/// Width of the unary neighbor-count thermometer: able to represent
/// counts `0..=8`, the full Moore neighborhood.
const COUNTER_BITS: usize = 10;

/// The smallest `memory_size` a `Controller` needs to run `life_step`:
/// the two reserved flags, plus `current_cell`, `next_cell`, and the
/// 10-bit counter, all above `FLAG_ROUTE_DATA`.
pub const MIN_MEMORY_SIZE: usize = crate::allocator::HEAP_BASE + 2 + COUNTER_BITS;

#[derive(Clone, Copy)]
enum Dir {
    N,
    E,
    W,
    S,
}

/// The eight-direction Moore-neighborhood tour: S, E, N, N, W, W, S, S.
/// Paired with the neighbor count each rotate contributes to.
const TOUR: [(Dir, usize); 8] = [
    (Dir::S, 2),
    (Dir::E, 3),
    (Dir::N, 4),
    (Dir::N, 5),
    (Dir::W, 6),
    (Dir::W, 7),
    (Dir::S, 8),
    (Dir::S, 9),
];

impl Controller {
    /// Runs one Conway's Life (B3/S23) generation over the 256x256 torus,
    /// reading and writing `FLAG_ROUTE_DATA`, and pushes the before/after
    /// planes to `sink`'s blue and red channels.
    pub fn life_step(&mut self, sink: &mut impl PixelSink) {
        let (current_cell, _) = self.allocate_memory(1);
        let (next_cell, _) = self.allocate_memory(1);
        let (cs, ce) = self.allocate_memory(COUNTER_BITS);

        self.clear_memory(cs, ce);
        self.set_memory(cs, cs + 1);
        self.recv_memory(current_cell);

        self.push_channel(sink, Channel::Blue);

        for (dir, k) in TOUR {
            {
                let mut router = self.router();
                match dir {
                    Dir::N => router.rotate_n(),
                    Dir::E => router.rotate_e(),
                    Dir::W => router.rotate_w(),
                    Dir::S => router.rotate_s(),
                }
            }
            self.count_flag(cs, cs + k, FLAG_ROUTE_DATA);
        }

        for i in cs..ce - 1 {
            self.log_xor(i, i + 1);
        }

        self.copy_from_to(current_cell, next_cell);
        self.set_if(next_cell, current_cell);
        self.log_and(next_cell, cs + 2);
        self.set_if(next_cell, cs + 3);

        self.copy_from_to(next_cell, current_cell);
        self.send_memory(current_cell);

        self.push_channel(sink, Channel::Red);
        sink.refresh();

        self.deallocate_all_memory();
    }

    fn push_channel(&self, sink: &mut impl PixelSink, channel: Channel) {
        for chip in 0..mpp_engine::CHIP_COUNT {
            let (x, y) = mpp_engine::chip_origin(chip);
            let word = self.pe().send(chip);
            sink.write_word(channel, x, y, word);
        }
    }
}
