//! Embeddable trait for in-process channel calls
//!
//! [`EmbeddableMcp`] lets a host application call a channel server directly,
//! without spawning the stdio binary. The error type keeps "method does not
//! exist" ([`EmbeddableError::NotImplemented`]) apart from "method ran and
//! failed" ([`EmbeddableError::MethodFailed`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use channel_common::EmbeddableMcp;
//! use device_memory_mcp::DeviceMemoryMcpServer;
//!
//! let server = DeviceMemoryMcpServer::new();
//! let result = server.call_tool("getDeviceMemory", serde_json::json!({})).await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

use crate::channel::MethodResponse;
use crate::result::json_success;

/// Error type for embedded channel calls
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    /// No handler is registered for the method
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// The handler ran and reported a failure
    #[error("{code}: {message}")]
    MethodFailed { code: String, message: String },

    /// MCP protocol error
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

/// Result type for embedded channel calls
pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// Convert a channel response for a named method into an embedded result
pub fn response_into_result(method: &str, response: MethodResponse) -> EmbeddableResult<CallToolResult> {
    match response {
        MethodResponse::Success { result } => json_success(&result).map_err(Into::into),
        MethodResponse::Error { code, message, .. } => {
            Err(EmbeddableError::MethodFailed { code, message })
        }
        MethodResponse::NotImplemented => Err(EmbeddableError::NotImplemented(method.to_string())),
    }
}

/// Trait for channel servers that can be executed in-process
///
/// Implementations must be `Send + Sync` so several tasks can call the same
/// server concurrently.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Server name used in MCP configuration files
    fn server_name(&self) -> &str;

    /// All methods exposed as tools
    fn list_tools(&self) -> Vec<Tool>;

    /// Execute a method by name
    ///
    /// Returns [`EmbeddableError::NotImplemented`] for unknown names and
    /// [`EmbeddableError::MethodFailed`] when the handler fails.
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{MethodCall, MethodChannel};

    struct TestServer {
        channel: MethodChannel,
    }

    impl TestServer {
        fn new() -> Self {
            let mut channel = MethodChannel::new("test/embedded");
            channel
                .register("ping", |_| MethodResponse::success(&"pong"))
                .register("broken", |_| MethodResponse::error("ERROR", "handler failed"));
            Self { channel }
        }
    }

    #[async_trait]
    impl EmbeddableMcp for TestServer {
        fn server_name(&self) -> &str {
            "test-server"
        }

        fn list_tools(&self) -> Vec<Tool> {
            vec![]
        }

        async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
            let response = self.channel.invoke(&MethodCall::with_arguments(name, params));
            response_into_result(name, response)
        }
    }

    #[test]
    fn test_server_name() {
        let server = TestServer::new();
        assert_eq!(server.server_name(), "test-server");
        assert!(server.server_description().is_none());
    }

    #[tokio::test]
    async fn test_call_registered_method() {
        let server = TestServer::new();
        let result = server.call_tool("ping", serde_json::json!({})).await.unwrap();
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result.content.len(), 1);
    }

    #[tokio::test]
    async fn test_call_unknown_method() {
        let server = TestServer::new();
        let result = server.call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(EmbeddableError::NotImplemented(ref n)) if n == "unknown"));
    }

    #[tokio::test]
    async fn test_call_failing_method() {
        let server = TestServer::new();
        let err = server
            .call_tool("broken", serde_json::json!({}))
            .await
            .unwrap_err();
        match err {
            EmbeddableError::MethodFailed { code, message } => {
                assert_eq!(code, "ERROR");
                assert_eq!(message, "handler failed");
            }
            other => panic!("expected MethodFailed, got {:?}", other),
        }
    }
}
