//! Device memory snapshot computation

pub mod memory;

pub use memory::{bytes_to_mb, compute_snapshot, get_device_memory, BYTES_PER_MB};
