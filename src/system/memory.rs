use serde::Serialize;

use super::source::RawMemory;
use crate::format::{bytes_to_gb, bytes_to_mb, percent_of};

/// Memory breakdown in MB (integers) and GB (two decimals).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySample {
    pub total: u64,
    #[serde(rename = "totalGB")]
    pub total_gb: f64,
    pub used: u64,
    #[serde(rename = "usedGB")]
    pub used_gb: f64,
    pub free: u64,
    #[serde(rename = "freeGB")]
    pub free_gb: f64,
    pub available: u64,
    #[serde(rename = "availableGB")]
    pub available_gb: f64,
    pub buffers: u64,
    #[serde(rename = "buffersGB")]
    pub buffers_gb: f64,
    pub cached: u64,
    #[serde(rename = "cachedGB")]
    pub cached_gb: f64,
    pub usage_percent: u8,
}

pub fn normalize(raw: &RawMemory) -> MemorySample {
    MemorySample {
        total: bytes_to_mb(raw.total),
        total_gb: bytes_to_gb(raw.total),
        used: bytes_to_mb(raw.used),
        used_gb: bytes_to_gb(raw.used),
        free: bytes_to_mb(raw.free),
        free_gb: bytes_to_gb(raw.free),
        available: bytes_to_mb(raw.available),
        available_gb: bytes_to_gb(raw.available),
        buffers: bytes_to_mb(raw.buffers),
        buffers_gb: bytes_to_gb(raw.buffers),
        cached: bytes_to_mb(raw.cached),
        cached_gb: bytes_to_gb(raw.cached),
        // Byte domain, not the rounded MB figures.
        usage_percent: percent_of(raw.used, raw.total),
    }
}
