//! The microinstruction engine: per-PE bit memory plus LOADA/LOADB/STORE/
//! RECV/SEND, bit-packed one word per chip so a single `u64` operation
//! updates 64 PEs simultaneously.

use crate::pe::{CHIP_COUNT, FLAG_ROUTE_DATA, FLAG_ZERO};
use crate::truth_table::TruthTable;

/// The PE array: 65,536 single-bit Processing Elements, each with
/// `memory_size` bits of flag storage, plus the hidden A/B registers the
/// microinstruction engine uses to stage a write.
pub struct PeArray {
    memory_size: usize,
    /// `memory_size` planes of `CHIP_COUNT` words; plane `addr` occupies
    /// `memory[addr * CHIP_COUNT .. (addr + 1) * CHIP_COUNT]`.
    memory: Vec<u64>,
    reg_a: Vec<u64>,
    reg_b: Vec<u64>,
    /// The context flag address last supplied to `load_b`, consumed by
    /// the following `store`.
    context_flag: usize,
}

impl PeArray {
    /// Creates a PE array with `memory_size` bits of flag storage per PE.
    ///
    /// # Panics
    ///
    /// Panics if `memory_size` is not large enough to hold the two
    /// reserved flags (`FLAG_ZERO` and `FLAG_ROUTE_DATA`). This is a
    /// configuration error, not a runtime condition.
    #[must_use]
    pub fn new(memory_size: usize) -> Self {
        assert!(
            memory_size > FLAG_ROUTE_DATA,
            "memory_size {memory_size} too small: must exceed FLAG_ROUTE_DATA ({FLAG_ROUTE_DATA})"
        );
        Self {
            memory_size,
            memory: vec![0u64; memory_size * CHIP_COUNT],
            reg_a: vec![0u64; CHIP_COUNT],
            reg_b: vec![0u64; CHIP_COUNT],
            context_flag: FLAG_ZERO,
        }
    }

    /// Number of addressable flags per PE.
    #[must_use]
    pub const fn memory_size(&self) -> usize {
        self.memory_size
    }

    /// Clears every flag of every PE to 0.
    pub fn reset(&mut self) {
        self.memory.fill(0);
        self.reg_a.fill(0);
        self.reg_b.fill(0);
        self.context_flag = FLAG_ZERO;
    }

    fn plane(&self, addr: usize) -> &[u64] {
        assert!(addr < self.memory_size, "flag address {addr} out of range");
        &self.memory[addr * CHIP_COUNT..(addr + 1) * CHIP_COUNT]
    }

    fn plane_mut(&mut self, addr: usize) -> &mut [u64] {
        assert!(addr < self.memory_size, "flag address {addr} out of range");
        &mut self.memory[addr * CHIP_COUNT..(addr + 1) * CHIP_COUNT]
    }

    fn read_word(&self, addr: usize, chip: usize) -> u64 {
        if addr == FLAG_ZERO { 0 } else { self.plane(addr)[chip] }
    }

    /// `LOADA(addr_a, read_flag, op_s)`: updates the per-PE A register to
    /// `f_{op_s}(mem[addr_a], mem[read_flag], 0)`.
    pub fn load_a(&mut self, addr_a: usize, read_flag: usize, op_s: TruthTable) {
        for chip in 0..CHIP_COUNT {
            let a = self.read_word(addr_a, chip);
            let s = self.read_word(read_flag, chip);
            self.reg_a[chip] = op_s.apply_word(a, s);
        }
    }

    /// `LOADB(addr_b, context_flag, op_c)`: updates the per-PE B register
    /// to `f_{op_c}(mem[addr_b], mem[context_flag], 0)`, and remembers
    /// `context_flag` for the following `store`.
    pub fn load_b(&mut self, addr_b: usize, context_flag: usize, op_c: TruthTable) {
        assert!(
            context_flag == FLAG_ZERO || context_flag < self.memory_size,
            "context flag {context_flag} out of range"
        );
        for chip in 0..CHIP_COUNT {
            let b = self.read_word(addr_b, chip);
            let c = self.read_word(context_flag, chip);
            self.reg_b[chip] = op_c.apply_word(b, c);
        }
        self.context_flag = context_flag;
    }

    /// `STORE(write_flag, context_value)`: for each PE, writes the A
    /// register into `write_flag` wherever the context flag (remembered
    /// from the last `load_b`) equals `context_value`; leaves `write_flag`
    /// unchanged elsewhere. Writes to `FLAG_ZERO` are discarded.
    pub fn store(&mut self, write_flag: usize, context_value: bool) {
        if write_flag == FLAG_ZERO {
            return;
        }
        let context_flag = self.context_flag;
        let reg_a = &self.reg_a;
        let predicate_mask: u64 = if context_value { u64::MAX } else { 0 };
        for chip in 0..CHIP_COUNT {
            let c_word = if context_flag == FLAG_ZERO {
                0
            } else {
                self.memory[context_flag * CHIP_COUNT + chip]
            };
            // Lanes where c_word matches the broadcast context_value.
            let match_mask = !(c_word ^ predicate_mask);
            let dst = &mut self.memory[write_flag * CHIP_COUNT + chip];
            *dst = (reg_a[chip] & match_mask) | (*dst & !match_mask);
        }
    }

    /// `RECV(chip_no, value)`: deposits `value`'s 64 bits into
    /// `FLAG_ROUTE_DATA` of the 64 PEs of `chip_no`, bit `i` to PE
    /// chip-local index `i`.
    pub fn recv(&mut self, chip_no: usize, value: u64) {
        assert!(chip_no < CHIP_COUNT, "chip {chip_no} out of range");
        self.plane_mut(FLAG_ROUTE_DATA)[chip_no] = value;
    }

    /// `SEND(chip_no)`: reads back the 64-bit word `RECV` would have
    /// written, from `FLAG_ROUTE_DATA`.
    #[must_use]
    pub fn send(&self, chip_no: usize) -> u64 {
        assert!(chip_no < CHIP_COUNT, "chip {chip_no} out of range");
        self.plane(FLAG_ROUTE_DATA)[chip_no]
    }

    /// Direct read access to the route-data plane, for the router.
    #[must_use]
    pub fn route_plane(&self) -> &[u64] {
        self.plane(FLAG_ROUTE_DATA)
    }

    /// Direct mutable access to the route-data plane, for the router.
    pub fn route_plane_mut(&mut self) -> &mut [u64] {
        self.plane_mut(FLAG_ROUTE_DATA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truth_table::{OP_AND, OP_ONE, OP_PASS_A, OP_ZERO};

    #[test]
    fn flag_zero_is_always_zero_and_writes_are_discarded() {
        let mut pe = PeArray::new(64);
        pe.load_a(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ONE));
        pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        pe.store(FLAG_ZERO, false);
        assert_eq!(pe.send(0) & 0, 0);
        // Reading FLAG_ZERO anywhere still yields 0.
        pe.load_a(10, FLAG_ZERO, TruthTable::new(OP_PASS_A));
        pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        pe.store(11, false);
        assert_eq!(pe.plane(11)[0], 0);
    }

    #[test]
    fn store_is_predicated_on_context() {
        let mut pe = PeArray::new(64);
        // Set address 1 to all-ones.
        pe.load_a(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ONE));
        pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        pe.store(1, false);
        assert_eq!(pe.plane(1)[0], u64::MAX);

        // Context flag (address 2) alternates per lane.
        pe.recv(0, 0xAAAA_AAAA_AAAA_AAAA);
        // Copy route data into address 2 via a trivial pass-through.
        pe.load_a(FLAG_ROUTE_DATA, FLAG_ZERO, TruthTable::new(OP_PASS_A));
        pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        pe.store(2, false);

        // Try to clear address 1 only where context flag (addr 2) == true.
        pe.load_a(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        pe.load_b(FLAG_ZERO, 2, TruthTable::new(OP_ZERO));
        pe.store(1, true);
        // Lanes where addr 2 was 1 (0xAAAA...) got cleared; others kept all-ones.
        assert_eq!(pe.plane(1)[0], !0xAAAA_AAAA_AAAA_AAAAu64);
    }

    #[test]
    fn recv_send_roundtrip() {
        let mut pe = PeArray::new(64);
        pe.recv(5, 0x1122_3344_5566_7788);
        assert_eq!(pe.send(5), 0x1122_3344_5566_7788);
    }

    #[test]
    fn log_and_composition_matches_bitwise_and() {
        // mem[1] <- 0xFF.., mem[2] <- 0x0F.. pattern, then compose
        // LOADA(1, 2, AND); LOADB(ZERO, ZERO, ZERO); STORE(1, false)
        // which is exactly how the controller's log_and(1, 2) is built.
        let mut pe = PeArray::new(64);
        pe.load_a(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ONE));
        pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        pe.store(1, false);
        pe.recv(0, 0x0F0F_0F0F_0F0F_0F0F);
        pe.load_a(FLAG_ROUTE_DATA, FLAG_ZERO, TruthTable::new(OP_PASS_A));
        pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        pe.store(2, false);

        pe.load_a(1, 2, TruthTable::new(OP_AND));
        pe.load_b(FLAG_ZERO, FLAG_ZERO, TruthTable::new(OP_ZERO));
        pe.store(1, false);

        assert_eq!(pe.plane(1)[0], 0x0F0F_0F0F_0F0F_0F0F);
    }
}
