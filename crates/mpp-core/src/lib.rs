//! Shared introspection trait for the MPP simulator crates.

mod observable;

pub use observable::{Observable, Value};
