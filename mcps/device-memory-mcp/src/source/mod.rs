//! Memory sources
//!
//! A [`MemoryInfoSource`] is the only code that touches OS memory accounting.
//! Sources differ in what "available" means (see [`Approximation`]), so a
//! percentage computed from one source is not comparable with another.

pub mod meminfo;
pub mod process;
pub mod system;

use std::sync::Arc;

use crate::types::{Approximation, MemoryError, RawMemory, SourceConfig, SourceKind};

pub use meminfo::MeminfoSource;
pub use process::ProcessResidentSource;
pub use system::SystemMemorySource;

/// Capability to read total and available memory from the host OS
pub trait MemoryInfoSource: Send + Sync {
    /// Read the current counters
    fn read(&self) -> Result<RawMemory, MemoryError>;

    /// What "available" means for this source
    fn approximation(&self) -> Approximation;

    /// Short identifier, matching the config `kind`
    fn name(&self) -> &'static str;
}

/// Build the source selected by config
pub fn build_source(config: &SourceConfig) -> Arc<dyn MemoryInfoSource> {
    match config.effective_kind() {
        SourceKind::System => Arc::new(SystemMemorySource::new()),
        SourceKind::Meminfo => Arc::new(MeminfoSource::new(config.meminfo_path.clone())),
        SourceKind::ProcessResident => Arc::new(ProcessResidentSource::new()),
    }
}
