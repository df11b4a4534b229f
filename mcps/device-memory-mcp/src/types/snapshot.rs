//! Memory snapshot types

use serde::{Deserialize, Serialize};

/// Raw counters read from a memory source, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMemory {
    /// Total physical memory installed
    pub total_bytes: u64,
    /// Memory available for new allocations
    pub available_bytes: u64,
}

/// Point-in-time device memory reading
///
/// Serialized with the bridge key names (`totalRAMMB`, ...). Megabyte fields
/// are signed: with a degenerate total of zero, `used_ram_mb` goes negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Total physical RAM in MB
    #[serde(rename = "totalRAMMB")]
    pub total_ram_mb: i64,
    /// RAM available for allocation in MB
    #[serde(rename = "availableRAMMB")]
    pub available_ram_mb: i64,
    /// `total_ram_mb - available_ram_mb`
    #[serde(rename = "usedRAMMB")]
    pub used_ram_mb: i64,
    /// Used share of total, in percent (not clamped)
    #[serde(rename = "usagePercentage")]
    pub usage_percentage: f64,
}

/// Meaning of "available" delivered by a memory source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approximation {
    /// System-wide available memory from the kernel
    SystemAvailable,
    /// Total minus the resident set size of this process
    ProcessResident,
}

impl std::fmt::Display for Approximation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Approximation::SystemAvailable => write!(f, "system_available"),
            Approximation::ProcessResident => write!(f, "process_resident"),
        }
    }
}

/// Which source and approximation back `getDeviceMemory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySourceInfo {
    /// Source name, e.g. `meminfo`
    pub source: String,
    pub approximation: Approximation,
    /// Target OS the server was built for
    pub platform: String,
}
