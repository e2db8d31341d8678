//! The controller: composes LOADA/LOADB/STORE triples into the bulk
//! primitives the Life step (and anything else built on this machine)
//! is written in terms of.

use mpp_core::{Observable, Value};
use mpp_engine::{FLAG_ROUTE_DATA, FLAG_ZERO, OP_AND, OP_ONE, OP_OR, OP_PASS_A, OP_XOR, OP_ZERO, PeArray, TruthTable};
use mpp_router::NewsRouter;

use crate::allocator::HeapAllocator;

/// Owns the PE array and the controller's ephemeral heap state, and
/// exposes the bulk primitives microprograms are built from.
pub struct Controller {
    pe: PeArray,
    heap: HeapAllocator,
}

impl Controller {
    /// Creates a controller over a freshly-reset PE array with
    /// `memory_size` bits of per-PE flag storage.
    #[must_use]
    pub fn new(memory_size: usize) -> Self {
        Self {
            pe: PeArray::new(memory_size),
            heap: HeapAllocator::new(),
        }
    }

    /// Read-only access to the underlying PE array (for SEND-style reads
    /// outside the primitive set, e.g. pushing display channels).
    #[must_use]
    pub fn pe(&self) -> &PeArray {
        &self.pe
    }

    /// A router view onto this controller's PE array.
    pub fn router(&mut self) -> NewsRouter<'_> {
        NewsRouter::new(&mut self.pe)
    }

    /// Resets the PE array to all-zero and the heap to empty.
    pub fn reset(&mut self) {
        self.pe.reset();
        self.heap.deallocate_all();
    }

    /// Bumps the heap by `size` flags and returns `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics if the allocation would exceed `memory_size` — a
    /// configuration error (the PE array was created too small for the
    /// microprogram driving it), not a runtime condition to recover from.
    pub fn allocate_memory(&mut self, size: usize) -> (usize, usize) {
        let (start, end) = self.heap.allocate(size);
        assert!(
            end <= self.pe.memory_size(),
            "heap overflow: allocated up to flag {end}, but memory_size is only {}",
            self.pe.memory_size()
        );
        (start, end)
    }

    /// Resets the heap to empty, without touching PE memory contents.
    pub fn deallocate_all_memory(&mut self) {
        self.heap.deallocate_all();
    }

    /// `mem[a..b] <- 0` on all PEs.
    pub fn clear_memory(&mut self, a: usize, b: usize) {
        for addr in a..b {
            self.pe.load_a(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
            self.pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
            self.pe.store(addr, false);
        }
    }

    /// `mem[a..b] <- 1` on all PEs.
    pub fn set_memory(&mut self, a: usize, b: usize) {
        for addr in a..b {
            self.pe.load_a(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ONE));
            self.pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
            self.pe.store(addr, false);
        }
    }

    /// `mem[dst] <- mem[src]` on all PEs.
    pub fn copy_from_to(&mut self, src: usize, dst: usize) {
        self.pe.load_a(src, FLAG_ZERO, TruthTable::new(OP_PASS_A));
        self.pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        self.pe.store(dst, false);
    }

    /// `mem[a] <- mem[a] AND mem[a2]`.
    pub fn log_and(&mut self, a: usize, a2: usize) {
        self.pe.load_a(a, a2, TruthTable::new(OP_AND));
        self.pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        self.pe.store(a, false);
    }

    /// `mem[a] <- mem[a] XOR mem[a2]`.
    pub fn log_xor(&mut self, a: usize, a2: usize) {
        self.pe.load_a(a, a2, TruthTable::new(OP_XOR));
        self.pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        self.pe.store(a, false);
    }

    /// `mem[a] <- mem[a] OR mem[chk]`.
    pub fn set_if(&mut self, a: usize, chk: usize) {
        self.pe.load_a(a, chk, TruthTable::new(OP_OR));
        self.pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        self.pe.store(a, false);
    }

    /// If `mem[flag]==1` then `mem[dst] <- mem[src]`, else unchanged.
    pub fn copy_if(&mut self, dst: usize, src: usize, flag: usize) {
        self.pe.load_a(src, FLAG_ZERO, TruthTable::new(OP_PASS_A));
        self.pe.load_b(FLAG_ZERO, flag, TruthTable::new(OP_ZERO));
        self.pe.store(dst, true);
    }

    /// For all PEs, `FLAG_ROUTE_DATA <- mem[addr]`.
    pub fn send_memory(&mut self, addr: usize) {
        self.copy_from_to(addr, FLAG_ROUTE_DATA);
    }

    /// For all PEs, `mem[addr] <- FLAG_ROUTE_DATA`.
    pub fn recv_memory(&mut self, addr: usize) {
        self.copy_from_to(FLAG_ROUTE_DATA, addr);
    }

    /// Deposits `value`, one bit per PE, into `FLAG_ROUTE_DATA` of chip
    /// `chip_no`. A direct RECV, bypassing LOADA/LOADB/STORE — used for
    /// chip-aligned bulk seeding (e.g. random initial state).
    pub fn recv_route_data(&mut self, chip_no: usize, value: u64) {
        self.pe.recv(chip_no, value);
    }

    /// Advances the unary thermometer counter in `[cs, ce)` by one
    /// observed 1-bit on `flag`, per PE: iterates `i` from `ce-2` down to
    /// `cs`, `copy_if(i+1, i, flag)`.
    pub fn count_flag(&mut self, cs: usize, ce: usize, flag: usize) {
        for i in (cs..=ce.saturating_sub(2)).rev() {
            self.copy_if(i + 1, i, flag);
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(crate::life::MIN_MEMORY_SIZE)
    }
}

impl Observable for Controller {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "heap.top" => Some(Value::from(self.heap.top() as u32)),
            "memory_size" => Some(Value::from(self.pe.memory_size() as u32)),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &["heap.top", "memory_size"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_controller() -> Controller {
        Controller::new(128)
    }

    #[test]
    fn clear_then_set_memory() {
        let mut c = new_controller();
        c.set_memory(64, 65);
        c.send_memory(64);
        assert_eq!(c.pe().send(0), u64::MAX);
        c.clear_memory(64, 65);
        c.send_memory(64);
        assert_eq!(c.pe().send(0), 0);
    }

    #[test]
    fn copy_from_to_propagates_bits() {
        let mut c = new_controller();
        c.router().unicast_2d(3, 0, true);
        c.recv_memory(64);
        c.copy_from_to(64, 65);
        c.send_memory(65);
        assert!(c.pe().send(0) & (1 << 3) != 0);
    }

    #[test]
    fn log_and_and_log_xor_match_boolean_ops() {
        let mut c = new_controller();
        c.router().unicast_2d(0, 0, true);
        c.router().unicast_2d(1, 0, true);
        c.recv_memory(64);
        c.router().unicast_2d(0, 0, true);
        c.router().unicast_2d(1, 0, false);
        c.recv_memory(65);

        c.copy_from_to(64, 66);
        c.log_and(66, 65);
        c.send_memory(66);
        assert_eq!(c.pe().send(0) & 0b11, 0b01);

        c.copy_from_to(64, 67);
        c.log_xor(67, 65);
        c.send_memory(67);
        assert_eq!(c.pe().send(0) & 0b11, 0b10);
    }

    #[test]
    fn copy_if_only_writes_where_flag_is_set() {
        let mut c = new_controller();
        c.set_memory(64, 65); // src = all ones
        c.router().unicast_2d(0, 0, true); // flag bit 0 only
        c.recv_memory(65); // flag plane
        c.clear_memory(66, 67); // dst starts at 0
        c.copy_if(66, 64, 65);
        c.send_memory(66);
        assert_eq!(c.pe().send(0), 1);
    }

    #[test]
    fn count_flag_builds_a_thermometer() {
        let mut c = new_controller();
        let (cs, ce) = (64usize, 75usize);
        c.clear_memory(cs, ce);
        c.set_memory(cs, cs + 1);

        // flag is all-ones: every call observes exactly one 1-bit per PE,
        // so each of the four calls below advances the thermometer by 1.
        c.set_memory(74, 75);
        for k in 2..=5usize {
            c.count_flag(cs, cs + k, 74);
        }
        for i in cs..cs + 5 {
            c.send_memory(i);
            assert_eq!(c.pe().send(0), u64::MAX, "bit {i} should be set");
        }
        c.send_memory(cs + 5);
        assert_eq!(c.pe().send(0), 0, "bit {} should not be set yet", cs + 5);
    }

    #[test]
    fn heap_allocation_panics_past_memory_size() {
        let mut c = Controller::new(70);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            c.allocate_memory(100);
        }));
        assert!(result.is_err());
    }
}
