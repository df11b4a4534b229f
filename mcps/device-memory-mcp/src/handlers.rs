//! Channel handlers for the device memory methods
//!
//! Each handler captures the memory source and turns the provider result into
//! a channel response. Failures use the `ERROR` code.

use std::sync::Arc;

use channel_common::{MethodCall, MethodChannel, MethodResponse, DEFAULT_ERROR_CODE};

use crate::info;
use crate::source::MemoryInfoSource;
use crate::types::MemorySourceInfo;

/// Channel name shared with the application shell
pub const CHANNEL_NAME: &str = "com.debughub.memory_monitor/device_memory";

pub const GET_DEVICE_MEMORY: &str = "getDeviceMemory";
pub const GET_MEMORY_SOURCE: &str = "getMemorySource";

/// Build the device memory channel with all handlers registered
pub fn device_memory_channel(source: Arc<dyn MemoryInfoSource>) -> MethodChannel {
    let mut channel = MethodChannel::new(CHANNEL_NAME);

    let memory_source = Arc::clone(&source);
    channel.register(GET_DEVICE_MEMORY, move |call| {
        get_device_memory(memory_source.as_ref(), call)
    });
    channel.register(GET_MEMORY_SOURCE, move |call| get_memory_source(source.as_ref(), call));

    channel
}

pub fn get_device_memory(source: &dyn MemoryInfoSource, _call: &MethodCall) -> MethodResponse {
    match info::get_device_memory(source) {
        Ok(snapshot) => MethodResponse::success(&snapshot),
        Err(e) => MethodResponse::error(
            DEFAULT_ERROR_CODE,
            format!("Failed to get device memory: {}", e),
        ),
    }
}

pub fn get_memory_source(source: &dyn MemoryInfoSource, _call: &MethodCall) -> MethodResponse {
    MethodResponse::success(&describe_source(source))
}

pub fn describe_source(source: &dyn MemoryInfoSource) -> MemorySourceInfo {
    MemorySourceInfo {
        source: source.name().to_string(),
        approximation: source.approximation(),
        platform: std::env::consts::OS.to_string(),
    }
}
