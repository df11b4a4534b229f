//! Channel Common - shared plumbing for method-channel servers
//!
//! - **Channel**: [`MethodChannel`] dispatcher with a success / error /
//!   not-implemented response envelope
//! - **Initialization**: `serve_stdio!` macro and tracing setup
//! - **Results**: [`json_success`] for tool responses
//! - **Errors**: mapping of channel failures onto MCP errors
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process calls
//!
//! # Example
//!
//! ```rust,ignore
//! use channel_common::{MethodCall, MethodChannel, MethodResponse};
//!
//! let mut channel = MethodChannel::new("com.example/clock");
//! channel.register("now", |_| MethodResponse::success(&1_700_000_000u64));
//!
//! match channel.invoke(&MethodCall::new("now")) {
//!     MethodResponse::Success { result } => println!("{}", result),
//!     MethodResponse::Error { code, message, .. } => eprintln!("{}: {}", code, message),
//!     MethodResponse::NotImplemented => eprintln!("not implemented"),
//! }
//! ```

pub mod channel;
pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

pub use channel::{MethodCall, MethodChannel, MethodHandler, MethodResponse, DEFAULT_ERROR_CODE};
pub use embeddable::{response_into_result, EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{channel_error, not_implemented, response_into_tool_result, McpResult};
pub use init::{init_tracing, LogFormat};
pub use result::json_success;

pub use rmcp::{
    model::{CallToolResult, Tool},
    ErrorData as McpError,
};

pub use async_trait::async_trait;
