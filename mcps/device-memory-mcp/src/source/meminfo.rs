//! Kernel meminfo source (Linux and Android)

use std::path::PathBuf;

use super::MemoryInfoSource;
use crate::types::{Approximation, MemoryError, RawMemory};

/// Reads `MemTotal` and `MemAvailable` from a `/proc/meminfo`-format file
#[derive(Debug, Clone)]
pub struct MeminfoSource {
    path: PathBuf,
}

impl MeminfoSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for MeminfoSource {
    fn default() -> Self {
        Self::new("/proc/meminfo")
    }
}

impl MemoryInfoSource for MeminfoSource {
    fn read(&self) -> Result<RawMemory, MemoryError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| MemoryError::query(format!("{}: {}", self.path.display(), e)))?;
        parse_meminfo(&content)
    }

    fn approximation(&self) -> Approximation {
        Approximation::SystemAvailable
    }

    fn name(&self) -> &'static str {
        "meminfo"
    }
}

/// Parse meminfo text into raw byte counters
///
/// `MemTotal` is required. Kernels older than 3.14 have no `MemAvailable`;
/// there available is estimated as `MemFree + Buffers + Cached`.
pub fn parse_meminfo(content: &str) -> Result<RawMemory, MemoryError> {
    let mut total = None;
    let mut available = None;
    let mut free = None;
    let mut buffers = None;
    let mut cached = None;

    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let slot = match key.trim() {
            "MemTotal" => &mut total,
            "MemAvailable" => &mut available,
            "MemFree" => &mut free,
            "Buffers" => &mut buffers,
            "Cached" => &mut cached,
            _ => continue,
        };
        *slot = Some(parse_kib(key, rest)?);
    }

    let total_bytes = total.ok_or_else(|| MemoryError::query("meminfo has no MemTotal entry"))?;

    let available_bytes = match available {
        Some(bytes) => bytes,
        None => {
            let free = free.ok_or_else(|| {
                MemoryError::query("meminfo has neither MemAvailable nor MemFree")
            })?;
            free.saturating_add(buffers.unwrap_or(0))
                .saturating_add(cached.unwrap_or(0))
        }
    };

    Ok(RawMemory {
        total_bytes,
        available_bytes,
    })
}

/// Parse a value like `  16316412 kB` into bytes
fn parse_kib(key: &str, rest: &str) -> Result<u64, MemoryError> {
    let mut parts = rest.split_whitespace();
    let value = parts
        .next()
        .ok_or_else(|| MemoryError::query(format!("meminfo {} has no value", key)))?;
    let kib: u64 = value
        .parse()
        .map_err(|e| MemoryError::query(format!("meminfo {} value {:?}: {}", key, value, e)))?;

    match parts.next() {
        Some(unit) if unit.eq_ignore_ascii_case("kb") => Ok(kib.saturating_mul(1024)),
        None => Ok(kib),
        Some(unit) => Err(MemoryError::query(format!(
            "meminfo {} has unexpected unit {:?}",
            key, unit
        ))),
    }
}
