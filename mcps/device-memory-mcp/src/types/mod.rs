//! Types shared across the device memory provider

mod config;
mod error;
mod snapshot;

pub use config::*;
pub use error::*;
pub use snapshot::*;
