//! Process resident approximation
//!
//! Used where the OS exposes no reliable system-wide "available" counter.
//! Available is `total - rss` of the calling process, which says nothing
//! about memory held by other processes.

use sysinfo::{ProcessesToUpdate, System};

use super::MemoryInfoSource;
use crate::types::{Approximation, MemoryError, RawMemory};

/// Physical memory minus the resident set size of the current process
///
/// The subtraction happens in bytes, before megabyte truncation, so
/// `availableRAMMB` can be 1 MB higher than `total MB - rss MB`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessResidentSource;

impl ProcessResidentSource {
    pub fn new() -> Self {
        Self
    }
}

impl MemoryInfoSource for ProcessResidentSource {
    fn read(&self) -> Result<RawMemory, MemoryError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(MemoryError::query(
                "task accounting is not supported on this platform",
            ));
        }

        let pid = sysinfo::get_current_pid().map_err(MemoryError::query)?;

        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let resident = sys
            .process(pid)
            .map(|p| p.memory())
            .ok_or_else(|| MemoryError::query(format!("no task info for process {}", pid)))?;

        let total = sys.total_memory();
        Ok(RawMemory {
            total_bytes: total,
            available_bytes: total.saturating_sub(resident),
        })
    }

    fn approximation(&self) -> Approximation {
        Approximation::ProcessResident
    }

    fn name(&self) -> &'static str {
        "process_resident"
    }
}
