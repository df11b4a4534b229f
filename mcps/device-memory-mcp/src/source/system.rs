//! System-wide memory via sysinfo

use sysinfo::System;

use super::MemoryInfoSource;
use crate::types::{Approximation, MemoryError, RawMemory};

/// Total and available memory as reported by sysinfo
///
/// A fresh `System` is refreshed on every read so no state is shared between
/// calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMemorySource;

impl SystemMemorySource {
    pub fn new() -> Self {
        Self
    }
}

impl MemoryInfoSource for SystemMemorySource {
    fn read(&self) -> Result<RawMemory, MemoryError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(MemoryError::query(
                "memory accounting is not supported on this platform",
            ));
        }

        let mut sys = System::new();
        sys.refresh_memory();

        Ok(RawMemory {
            total_bytes: sys.total_memory(),
            available_bytes: sys.available_memory(),
        })
    }

    fn approximation(&self) -> Approximation {
        Approximation::SystemAvailable
    }

    fn name(&self) -> &'static str {
        "system"
    }
}
