//! Configuration for the device memory server

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::MemoryError;

/// Env var naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "DEVICE_MEMORY_CONFIG_PATH";

/// Env var overriding `source.kind`
pub const SOURCE_ENV: &str = "DEVICE_MEMORY_SOURCE";

// ============================================================================
// Configuration Types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Memory source to read; `None` picks the platform default
    #[serde(default)]
    pub kind: Option<SourceKind>,

    /// Path of the kernel meminfo file read by the `meminfo` source
    #[serde(default = "default_meminfo_path")]
    pub meminfo_path: PathBuf,
}

fn default_meminfo_path() -> PathBuf {
    PathBuf::from("/proc/meminfo")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: None,
            meminfo_path: default_meminfo_path(),
        }
    }
}

impl SourceConfig {
    /// Configured kind, falling back to the platform default
    pub fn effective_kind(&self) -> SourceKind {
        self.kind.unwrap_or_else(SourceKind::platform_default)
    }
}

/// Available memory sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// sysinfo system-wide total and available memory
    System,
    /// Kernel `/proc/meminfo` (`MemTotal` / `MemAvailable`)
    Meminfo,
    /// Physical memory minus this process's resident set size
    ProcessResident,
}

impl SourceKind {
    /// Source used when none is configured
    ///
    /// Apple targets have no reliable system-wide available counter and use
    /// the process resident approximation.
    pub fn platform_default() -> Self {
        if cfg!(any(target_os = "ios", target_os = "macos")) {
            SourceKind::ProcessResident
        } else if cfg!(any(target_os = "android", target_os = "linux")) {
            SourceKind::Meminfo
        } else {
            SourceKind::System
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::System => "system",
            SourceKind::Meminfo => "meminfo",
            SourceKind::ProcessResident => "process_resident",
        }
    }
}

impl FromStr for SourceKind {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(SourceKind::System),
            "meminfo" => Ok(SourceKind::Meminfo),
            "process_resident" => Ok(SourceKind::ProcessResident),
            other => Err(MemoryError::Config(format!("unknown memory source: {}", other))),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Loading
// ============================================================================

impl Config {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self, MemoryError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MemoryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, MemoryError> {
        toml::from_str(content).map_err(|e| MemoryError::Config(e.to_string()))
    }

    /// Load config from standard locations, then apply env overrides
    ///
    /// Config is searched in order:
    /// 1. `DEVICE_MEMORY_CONFIG_PATH` env var
    /// 2. `./device-memory-mcp.toml`
    /// 3. `$XDG_CONFIG_HOME/device-memory-mcp/config.toml`
    /// 4. `~/.device-memory-mcp.toml`
    /// 5. Default config if none found
    pub fn load() -> Self {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`], reading variables through `lookup`
    pub fn load_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load_file(lookup(CONFIG_PATH_ENV));
        if let Some(value) = lookup(SOURCE_ENV) {
            match value.parse::<SourceKind>() {
                Ok(kind) => {
                    tracing::info!("Memory source overridden by {}={}", SOURCE_ENV, kind);
                    config.source.kind = Some(kind);
                }
                Err(e) => tracing::warn!("Ignoring {}: {}", SOURCE_ENV, e),
            }
        }
        config
    }

    fn load_file(env_path: Option<String>) -> Self {
        if let Some(env_path) = env_path {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}={}", CONFIG_PATH_ENV, path.display());
                        return config;
                    }
                    Err(e) => tracing::warn!("Failed to load config: {}", e),
                }
            } else {
                tracing::warn!("{}={} does not exist", CONFIG_PATH_ENV, env_path);
            }
        }

        for path in Self::search_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => tracing::warn!("Failed to load config: {}", e),
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("device-memory-mcp.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("device-memory-mcp").join("config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".device-memory-mcp.toml"));
        }
        paths
    }
}
