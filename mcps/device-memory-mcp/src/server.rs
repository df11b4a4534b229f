//! MCP Server implementation for device memory
//!
//! Tools delegate to the method channel built in the handlers module, so the
//! stdio transport and in-process embedding share one dispatch path.

use std::sync::Arc;

use channel_common::{
    async_trait, not_implemented, response_into_result, response_into_tool_result,
    EmbeddableMcp, EmbeddableResult, McpError, MethodCall, MethodChannel,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext},
    model::{
        CallToolRequestParam, CallToolResult, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    tool, tool_router, RoleServer,
};
use serde_json::Value;

use crate::handlers::{self, GET_DEVICE_MEMORY, GET_MEMORY_SOURCE};
use crate::source::{build_source, MemoryInfoSource};
use crate::types::{Approximation, Config};

/// The Device Memory MCP Server
#[derive(Clone)]
pub struct DeviceMemoryMcpServer {
    channel: Arc<MethodChannel>,
    description: String,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl DeviceMemoryMcpServer {
    /// Create a server using config from standard locations
    pub fn new() -> Self {
        Self::with_config(&Config::load())
    }

    pub fn with_config(config: &Config) -> Self {
        Self::with_source(build_source(&config.source))
    }

    /// Create a server backed by an explicit memory source
    pub fn with_source(source: Arc<dyn MemoryInfoSource>) -> Self {
        tracing::info!(
            source = source.name(),
            approximation = %source.approximation(),
            "Device memory source selected"
        );
        let description = describe(source.as_ref());
        Self {
            channel: Arc::new(handlers::device_memory_channel(source)),
            description,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "getDeviceMemory",
        description = "Get a device memory snapshot: totalRAMMB, availableRAMMB, usedRAMMB and usagePercentage"
    )]
    async fn get_device_memory(&self) -> Result<CallToolResult, McpError> {
        let response = self.channel.invoke(&MethodCall::new(GET_DEVICE_MEMORY));
        response_into_tool_result(GET_DEVICE_MEMORY, response)
    }

    #[tool(
        name = "getMemorySource",
        description = "Get the memory source in use and whether availableRAMMB is system-wide or an approximation from this process's resident set size"
    )]
    async fn get_memory_source(&self) -> Result<CallToolResult, McpError> {
        let response = self.channel.invoke(&MethodCall::new(GET_MEMORY_SOURCE));
        response_into_tool_result(GET_MEMORY_SOURCE, response)
    }
}

fn describe(source: &dyn MemoryInfoSource) -> String {
    let available = match source.approximation() {
        Approximation::SystemAvailable => "system-wide available memory",
        Approximation::ProcessResident => {
            "total memory minus this process's resident set size (not system-wide)"
        }
    };
    format!(
        "Device Memory MCP Server - one-shot RAM snapshots over the {} channel. \
         Source '{}': availableRAMMB is {}.",
        handlers::CHANNEL_NAME,
        source.name(),
        available
    )
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

// Written out instead of `#[tool_handler]`: the router answers unknown names
// with invalid params, the channel contract wants method-not-found.
impl rmcp::ServerHandler for DeviceMemoryMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.description.clone()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if !self.tool_router.has_route(request.name.as_ref()) {
            tracing::debug!(method = %request.name, "Method not implemented");
            return Err(not_implemented(request.name.as_ref()));
        }
        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_router.list_all()))
    }
}

impl Default for DeviceMemoryMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for DeviceMemoryMcpServer {
    fn server_name(&self) -> &str {
        "device_memory"
    }

    fn server_description(&self) -> Option<&str> {
        Some(self.description.as_str())
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        let response = self.channel.invoke(&MethodCall::with_arguments(name, params));
        response_into_result(name, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MemoryError, RawMemory};
    use channel_common::EmbeddableError;
    use rmcp::model::ErrorCode;

    const MB: u64 = 1024 * 1024;

    struct FakeSource {
        result: Result<RawMemory, MemoryError>,
        approximation: Approximation,
    }

    impl MemoryInfoSource for FakeSource {
        fn read(&self) -> Result<RawMemory, MemoryError> {
            self.result.clone()
        }

        fn approximation(&self) -> Approximation {
            self.approximation
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    fn server_with(result: Result<RawMemory, MemoryError>) -> DeviceMemoryMcpServer {
        DeviceMemoryMcpServer::with_source(Arc::new(FakeSource {
            result,
            approximation: Approximation::SystemAvailable,
        }))
    }

    fn healthy_server() -> DeviceMemoryMcpServer {
        server_with(Ok(RawMemory {
            total_bytes: 4096 * MB,
            available_bytes: 1024 * MB,
        }))
    }

    fn text_of(result: &CallToolResult) -> String {
        result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_embeddable_server_name() {
        let server = healthy_server();
        assert_eq!(server.server_name(), "device_memory");
    }

    #[test]
    fn test_embeddable_list_tools() {
        let server = healthy_server();
        let tools = server.list_tools();

        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["getDeviceMemory", "getMemorySource"]);
    }

    #[test]
    fn test_description_names_approximation() {
        let server = DeviceMemoryMcpServer::with_source(Arc::new(FakeSource {
            result: Err(MemoryError::query("unused")),
            approximation: Approximation::ProcessResident,
        }));
        let description = server.server_description().unwrap();
        assert!(description.contains("resident set size"));
        assert!(description.contains(handlers::CHANNEL_NAME));
    }

    #[tokio::test]
    async fn test_embeddable_call_device_memory() {
        let server = healthy_server();
        let result = server
            .call_tool("getDeviceMemory", serde_json::json!({}))
            .await
            .unwrap();

        assert!(!result.is_error.unwrap_or(false));
        let value: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(value["totalRAMMB"], 4096);
        assert_eq!(value["availableRAMMB"], 1024);
        assert_eq!(value["usedRAMMB"], 3072);
        assert_eq!(value["usagePercentage"], 75.0);
    }

    #[tokio::test]
    async fn test_embeddable_call_memory_source() {
        let server = healthy_server();
        let result = server
            .call_tool("getMemorySource", serde_json::json!({}))
            .await
            .unwrap();

        let value: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(value["source"], "fake");
        assert_eq!(value["approximation"], "system_available");
    }

    #[tokio::test]
    async fn test_embeddable_query_failure() {
        let server = server_with(Err(MemoryError::query("permission denied")));
        let err = server
            .call_tool("getDeviceMemory", serde_json::json!({}))
            .await
            .unwrap_err();

        match err {
            EmbeddableError::MethodFailed { code, message } => {
                assert_eq!(code, "ERROR");
                assert!(message.contains("permission denied"));
            }
            other => panic!("expected MethodFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_embeddable_unknown_tool() {
        let server = healthy_server();
        let result = server
            .call_tool("getBatteryLevel", serde_json::json!({}))
            .await;

        assert!(matches!(result, Err(EmbeddableError::NotImplemented(ref n)) if n == "getBatteryLevel"));
    }

    #[tokio::test]
    async fn test_tool_failure_maps_to_mcp_error() {
        let server = server_with(Err(MemoryError::query("kernel call failed")));
        let err = server.get_device_memory().await.unwrap_err();

        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("Failed to get device memory"));
        assert_eq!(err.data, Some(serde_json::json!({ "code": "ERROR" })));
    }

    #[tokio::test]
    async fn test_tool_zero_total() {
        let server = server_with(Ok(RawMemory {
            total_bytes: 0,
            available_bytes: 0,
        }));
        let result = server.get_device_memory().await.unwrap();
        let value: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(value["usagePercentage"], 0.0);
    }

    #[tokio::test]
    async fn test_concurrent_calls() {
        let server = healthy_server();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let server = server.clone();
                tokio::spawn(async move { server.call_tool("getDeviceMemory", Value::Null).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
    }

    async fn connect(
        server: DeviceMemoryMcpServer,
    ) -> rmcp::service::RunningService<rmcp::RoleClient, ()> {
        use rmcp::ServiceExt;

        let (server_io, client_io) = tokio::io::duplex(64 * 1024);
        tokio::spawn(async move {
            let running = server.serve(server_io).await?;
            running.waiting().await?;
            anyhow::Ok(())
        });
        ().serve(client_io).await.unwrap()
    }

    fn call(name: &str) -> CallToolRequestParam {
        CallToolRequestParam {
            name: name.to_string().into(),
            arguments: None,
            task: None,
        }
    }

    #[tokio::test]
    async fn test_transport_unknown_method_not_implemented() {
        let client = connect(healthy_server()).await;

        let err = client.call_tool(call("getBatteryLevel")).await.unwrap_err();
        match err {
            rmcp::ServiceError::McpError(e) => {
                assert_eq!(e.code, ErrorCode::METHOD_NOT_FOUND);
                assert!(e.message.contains("getBatteryLevel"));
            }
            other => panic!("expected method-not-found, got {:?}", other),
        }

        // The connection stays usable after the rejected call
        let result = client.call_tool(call("getDeviceMemory")).await.unwrap();
        assert!(!result.is_error.unwrap_or(false));
        let value: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(value["usedRAMMB"], 3072);

        client.cancel().await.unwrap();
    }

    #[tokio::test]
    async fn test_transport_query_failure_keeps_code() {
        let client = connect(server_with(Err(MemoryError::query("permission denied")))).await;

        let err = client.call_tool(call("getDeviceMemory")).await.unwrap_err();
        match err {
            rmcp::ServiceError::McpError(e) => {
                assert_eq!(e.code, ErrorCode::INTERNAL_ERROR);
                assert!(e.message.contains("permission denied"));
                assert_eq!(e.data, Some(serde_json::json!({ "code": "ERROR" })));
            }
            other => panic!("expected internal error, got {:?}", other),
        }

        client.cancel().await.unwrap();
    }

    #[tokio::test]
    async fn test_transport_lists_tools() {
        let client = connect(healthy_server()).await;

        let tools = client.list_all_tools().await.unwrap();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["getDeviceMemory", "getMemorySource"]);

        client.cancel().await.unwrap();
    }
}
