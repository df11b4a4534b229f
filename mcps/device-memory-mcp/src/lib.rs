//! Device Memory MCP Library
//!
//! One-shot device RAM snapshots behind a named-call channel.
//! `getDeviceMemory` returns total, available and used RAM in MB plus a usage
//! percentage; `getMemorySource` reports which approximation of "available"
//! the running platform uses.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use device_memory_mcp::{info, source::MeminfoSource};
//!
//! let snapshot = info::get_device_memory(&MeminfoSource::default())?;
//! println!("{}% used", snapshot.usage_percentage);
//! ```
//!
//! # Usage as Binary
//!
//! Run directly: `device-memory-mcp`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "device-memory": { "command": "./device-memory-mcp" } } }
//! ```

pub mod handlers;
pub mod info;
pub mod server;
pub mod source;
pub mod types;

// Re-export main server type
pub use server::DeviceMemoryMcpServer;

pub use source::MemoryInfoSource;
pub use types::{Approximation, Config, MemoryError, MemorySnapshot, RawMemory, SourceKind};

// Re-export EmbeddableMcp trait for in-process usage
pub use channel_common::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
