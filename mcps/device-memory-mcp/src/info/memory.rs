//! Memory snapshot provider
//!
//! Reading the OS and deriving the snapshot are separate steps: the source
//! read may fail, the arithmetic never does.

use crate::source::MemoryInfoSource;
use crate::types::{MemoryError, MemorySnapshot, RawMemory};

/// Binary megabyte
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Convert bytes to whole megabytes, truncating
pub fn bytes_to_mb(bytes: u64) -> i64 {
    (bytes / BYTES_PER_MB) as i64
}

/// Derive a snapshot from raw counters
pub fn compute_snapshot(raw: RawMemory) -> MemorySnapshot {
    let total = bytes_to_mb(raw.total_bytes);
    let available = bytes_to_mb(raw.available_bytes);
    let used = total - available;

    MemorySnapshot {
        total_ram_mb: total,
        available_ram_mb: available,
        used_ram_mb: used,
        usage_percentage: if total > 0 {
            (used as f64 / total as f64) * 100.0
        } else {
            0.0
        },
    }
}

/// Read the source and compute a snapshot
pub fn get_device_memory(source: &dyn MemoryInfoSource) -> Result<MemorySnapshot, MemoryError> {
    match source.read() {
        Ok(raw) => {
            let snapshot = compute_snapshot(raw);
            tracing::debug!(
                source = source.name(),
                total_mb = snapshot.total_ram_mb,
                available_mb = snapshot.available_ram_mb,
                usage = snapshot.usage_percentage,
                "Memory snapshot"
            );
            Ok(snapshot)
        }
        Err(e) => {
            tracing::warn!(source = source.name(), error = %e, "Memory query failed");
            Err(e)
        }
    }
}
