//! Method channel dispatch
//!
//! A [`MethodChannel`] routes a named call to a registered handler and wraps
//! the outcome in a [`MethodResponse`] envelope. A call name with no handler
//! yields [`MethodResponse::NotImplemented`], which callers must treat as
//! "this operation does not exist here" rather than as a failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use channel_common::{MethodCall, MethodChannel, MethodResponse};
//!
//! let mut channel = MethodChannel::new("com.example/battery");
//! channel.register("getBatteryLevel", |_call| MethodResponse::success(&87));
//!
//! let response = channel.invoke(&MethodCall::new("getBatteryLevel"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// Error code used when a handler fails without a more specific code
pub const DEFAULT_ERROR_CODE: &str = "ERROR";

/// A handler bound to one method name
pub type MethodHandler = Arc<dyn Fn(&MethodCall) -> MethodResponse + Send + Sync>;

/// A single named call arriving over the channel
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Method name, e.g. `getDeviceMemory`
    pub method: String,
    /// Call arguments (`Null` when the call carries no payload)
    pub arguments: Value,
}

impl MethodCall {
    /// Create a call without arguments
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Value::Null,
        }
    }

    /// Create a call carrying a JSON payload
    pub fn with_arguments(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Response envelope returned for every call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResponse {
    /// The handler produced a result
    Success { result: Value },

    /// The handler ran and failed
    Error {
        code: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },

    /// No handler is registered for the method name
    NotImplemented,
}

impl MethodResponse {
    /// Serialize `data` into a success response
    ///
    /// A value that cannot be represented as JSON turns into an error
    /// response instead of a partial result.
    pub fn success<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(result) => MethodResponse::Success { result },
            Err(e) => MethodResponse::error(
                DEFAULT_ERROR_CODE,
                format!("Failed to encode response: {}", e),
            ),
        }
    }

    /// Build an error response without details
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        MethodResponse::Error {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// Named channel mapping method names to handlers
///
/// The channel is immutable once built; share it behind an `Arc` and call
/// [`MethodChannel::invoke`] from as many tasks as needed.
#[derive(Clone)]
pub struct MethodChannel {
    name: String,
    handlers: HashMap<String, MethodHandler>,
}

impl MethodChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: HashMap::new(),
        }
    }

    /// Channel name, e.g. `com.debughub.memory_monitor/device_memory`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a handler, replacing any existing handler for `method`
    pub fn register<F>(&mut self, method: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&MethodCall) -> MethodResponse + Send + Sync + 'static,
    {
        let method = method.into();
        if self.handlers.insert(method.clone(), Arc::new(handler)).is_some() {
            tracing::debug!(channel = %self.name, %method, "Replaced method handler");
        }
        self
    }

    /// Dispatch a call to its handler
    pub fn invoke(&self, call: &MethodCall) -> MethodResponse {
        match self.handlers.get(&call.method) {
            Some(handler) => {
                tracing::debug!(channel = %self.name, method = %call.method, "Dispatching call");
                handler(call)
            }
            None => {
                tracing::debug!(channel = %self.name, method = %call.method, "Method not implemented");
                MethodResponse::NotImplemented
            }
        }
    }

    /// Registered method names, sorted
    pub fn methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for MethodChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodChannel")
            .field("name", &self.name)
            .field("methods", &self.methods())
            .finish()
    }
}
