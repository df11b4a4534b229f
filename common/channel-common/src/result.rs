//! Result helpers for tool responses

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

/// Create a successful JSON response from any serializable data
///
/// The payload is pretty-printed into a single text content item.
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
