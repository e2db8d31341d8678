//! End-to-end coverage of the lockstep atomicity invariant: a STORE must
//! behave as if every PE's new value were computed from the pre-state and
//! committed simultaneously, never reading a neighbor's already-written
//! value within the same microinstruction.

use mpp_engine::{FLAG_ROUTE_DATA, FLAG_ZERO, OP_AND, OP_PASS_A, OP_ZERO, PeArray, TruthTable};

#[test]
fn store_commits_atomically_across_all_chips() {
    let mut pe = PeArray::new(64);

    // Seed every chip of FLAG_ROUTE_DATA with a distinct pattern.
    for chip in 0..1024usize {
        pe.recv(chip, u64::from(chip as u32).wrapping_mul(0x9E37_79B9));
    }

    // Snapshot pre-state via SEND before issuing the microinstruction.
    let pre: Vec<u64> = (0..1024usize).map(|c| pe.send(c)).collect();

    // log_and(FLAG_ROUTE_DATA, FLAG_ROUTE_DATA) is a no-op AND-with-self;
    // every chip must still see its own pre-state value, not some other
    // chip's.
    pe.load_a(FLAG_ROUTE_DATA, FLAG_ROUTE_DATA, TruthTable::new(OP_AND));
    pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
    pe.store(FLAG_ROUTE_DATA, false);

    for chip in 0..1024usize {
        assert_eq!(pe.send(chip), pre[chip], "chip {chip} diverged");
    }
}

#[test]
fn send_recv_roundtrip_every_chip() {
    let mut pe = PeArray::new(64);
    for chip in 0..1024usize {
        let value = (chip as u64) << 32 | (chip as u64);
        pe.recv(chip, value);
        assert_eq!(pe.send(chip), value);
    }
}

#[test]
fn reset_clears_all_flags() {
    let mut pe = PeArray::new(64);
    pe.recv(0, u64::MAX);
    pe.recv(1, u64::MAX);
    pe.reset();
    assert_eq!(pe.send(0), 0);
    assert_eq!(pe.send(1), 0);

    // PASS_A straight from FLAG_ZERO should also read back as 0 after reset.
    pe.load_a(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_PASS_A));
    pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
    pe.store(FLAG_ROUTE_DATA, false);
    assert_eq!(pe.send(0), 0);
}
