//! The controller layer: bulk primitives, heap allocation, and the Life
//! step microprogram built on top of `mpp-engine` and `mpp-router`.

mod allocator;
mod controller;
mod life;
mod pixel_sink;

pub use allocator::{HEAP_BASE, HeapAllocator};
pub use controller::Controller;
pub use life::MIN_MEMORY_SIZE;
pub use pixel_sink::{Channel, NullSink, PixelSink};
