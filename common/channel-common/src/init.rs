//! Server initialization utilities
//!
//! Tracing setup and the `serve_stdio!` macro shared by every channel server
//! binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log lines written to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; anything other than `json` is text
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }

    /// Read `LOG_FORMAT` from the environment
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

/// Initialize tracing for a channel server
///
/// Logs go to stderr because stdout carries the MCP protocol. The default
/// directive is `<crate_name>=info`; `RUST_LOG` adds to it and
/// `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let directive = format!("{}=info", crate_name);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::from_env() {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?,
    }

    Ok(())
}

/// Generate a `main` that serves a channel server over stdio
///
/// ```rust,ignore
/// channel_common::serve_stdio!(DeviceMemoryMcpServer, "device_memory_mcp");
/// ```
///
/// The server type must provide `new()`. The generated `main` initializes
/// tracing, serves over the stdio transport and waits for the peer to close.
#[macro_export]
macro_rules! serve_stdio {
    ($server_type:ty, $crate_name:expr) => {
        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            use rmcp::ServiceExt;

            $crate::init_tracing($crate_name)?;

            tracing::info!(concat!("Starting ", $crate_name, " server"));

            let server = <$server_type>::new();
            let service = server.serve(rmcp::transport::stdio()).await?;

            tracing::info!("Server running, waiting for requests...");

            service.waiting().await?;

            tracing::info!("Server shutting down");
            Ok(())
        }
    };
}
