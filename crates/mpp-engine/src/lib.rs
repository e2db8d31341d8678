//! PE array microarchitecture: bit-memory, truth-table ALU, and the
//! LOADA/LOADB/STORE/RECV/SEND microinstruction contract that drives all
//! 65,536 Processing Elements in lockstep.

mod engine;
mod pe;
mod truth_table;

pub use engine::PeArray;
pub use pe::{CHIP_COUNT, FLAG_ROUTE_DATA, FLAG_ZERO, PE_COUNT, chip_origin, pid_of_pos, pos_of_pid};
pub use truth_table::{OP_AND, OP_ONE, OP_OR, OP_PASS_A, OP_PASS_B, OP_XOR, OP_ZERO, TruthTable};
