//! Error mapping between channel responses and MCP protocol errors
//!
//! Channel failures carry a machine-readable code (e.g. `"ERROR"`) and a
//! message. Over MCP the message becomes the error message and the code is
//! kept in the error data as `{ "code": ... }`.

use rmcp::{
    model::{CallToolResult, ErrorCode},
    ErrorData as McpError,
};
use serde_json::json;

use crate::channel::MethodResponse;
use crate::result::json_success;

/// Type alias for MCP tool results
pub type McpResult<T> = Result<T, McpError>;

/// Create an internal error carrying a channel error code
pub fn channel_error(code: impl Into<String>, message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), Some(json!({ "code": code.into() })))
}

/// Create a method-not-found error for a call name with no handler
pub fn not_implemented(method: &str) -> McpError {
    McpError::new(
        ErrorCode::METHOD_NOT_FOUND,
        format!("method not implemented: {}", method),
        None,
    )
}

/// Convert a channel response into an MCP tool result
pub fn response_into_tool_result(method: &str, response: MethodResponse) -> McpResult<CallToolResult> {
    match response {
        MethodResponse::Success { result } => json_success(&result),
        MethodResponse::Error { code, message, .. } => Err(channel_error(code, message)),
        MethodResponse::NotImplemented => Err(not_implemented(method)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_keeps_code() {
        let err = channel_error("ERROR", "Failed to get device memory: denied");
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("denied"));
        assert_eq!(err.data, Some(json!({ "code": "ERROR" })));
    }

    #[test]
    fn test_not_implemented_code() {
        let err = not_implemented("getBatteryLevel");
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(err.message.contains("getBatteryLevel"));
    }

    #[test]
    fn test_response_into_tool_result() {
        let ok = response_into_tool_result("m", MethodResponse::success(&json!({ "x": 1 })));
        assert!(ok.is_ok());

        let failed = response_into_tool_result("m", MethodResponse::error("ERROR", "bad"));
        assert_eq!(failed.unwrap_err().data, Some(json!({ "code": "ERROR" })));

        let missing = response_into_tool_result("m", MethodResponse::NotImplemented);
        assert_eq!(missing.unwrap_err().code, ErrorCode::METHOD_NOT_FOUND);
    }
}
