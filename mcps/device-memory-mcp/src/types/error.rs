//! Error types for device memory queries

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    /// The OS memory query failed; no snapshot is produced
    #[error("{0}")]
    QueryFailure(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl MemoryError {
    pub fn query(reason: impl std::fmt::Display) -> Self {
        MemoryError::QueryFailure(reason.to_string())
    }
}
