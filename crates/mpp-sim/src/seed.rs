//! Initial-state seeding: a loaded Life 1.05 pattern, or a random
//! 50%-density plane.

use std::path::Path;

use mpp_controller::Controller;
use mpp_engine::CHIP_COUNT;
use mpp_patterns::PatternError;
use rand::Rng;

/// Loads `path` through the Life 1.05 reader at offset (128, 128),
/// wrapping every coordinate onto the 256x256 torus before unicasting it.
pub fn seed_from_pattern(controller: &mut Controller, path: &Path) -> Result<(), PatternError> {
    let dots = mpp_patterns::read_life_105_file(128, 128, path)?;
    let mut router = controller.router();
    for (x, y) in dots {
        let wx = x.rem_euclid(256) as u8;
        let wy = y.rem_euclid(256) as u8;
        router.unicast_2d(wx, wy, true);
    }
    Ok(())
}

/// Seeds the plane at 50% density, one batched chip-aligned RECV per
/// chip rather than 65,536 individual unicast writes.
pub fn seed_random(controller: &mut Controller) {
    let mut rng = rand::rng();
    for chip in 0..CHIP_COUNT {
        let word: u64 = rng.random();
        controller.recv_route_data(chip, word);
    }
}
