//! The pixel sink boundary (SPEC_FULL.md §4.H): a collaborator the Life
//! step pushes per-chip 64-bit words into, and asks to refresh. Double
//! buffering and any dirty-flag coalescing live entirely on the
//! implementor's side of this trait.

/// One of the three channels a generation can be presented on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Red channel: the next generation's live state.
    Red,
    /// Green channel: unused by the Life step itself, reserved for a
    /// future demonstration that wants a third plane.
    Green,
    /// Blue channel: the current generation's live state, before rotation.
    Blue,
}

/// A collaborator that accepts per-chip 64-bit words and a refresh
/// request. `x` is always chip-aligned (a multiple of 64).
pub trait PixelSink {
    /// Writes the 64-bit word for the chip whose chip-local index 0 is
    /// at `(x, y)`, on `channel`.
    fn write_word(&mut self, channel: Channel, x: u8, y: u8, word: u64);

    /// Requests a redraw. May coalesce with an in-flight render.
    fn refresh(&mut self);
}

/// A no-op sink, useful for tests and headless runs that don't care
/// about the presented image.
#[derive(Debug, Default)]
pub struct NullSink;

impl PixelSink for NullSink {
    fn write_word(&mut self, _channel: Channel, _x: u8, _y: u8, _word: u64) {}
    fn refresh(&mut self) {}
}
