//! Device Memory MCP Server
//!
//! Serves `getDeviceMemory` and `getMemorySource` over stdio.
//!
//! Run directly: `device-memory-mcp`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "device-memory": { "command": "./device-memory-mcp" } } }
//! ```

use device_memory_mcp::DeviceMemoryMcpServer;

channel_common::serve_stdio!(DeviceMemoryMcpServer, "device_memory_mcp");
