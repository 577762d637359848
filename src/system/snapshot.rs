use serde::Serialize;

use super::cpu::CoreSample;
use super::memory::MemorySample;
use super::process::ProcessSample;
use super::summary::CpuSummary;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSample {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
    pub running_processes: u32,
    pub total_processes: u32,
}

/// One complete sampling cycle. Built fresh per request and never cached.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSnapshot {
    #[serde(rename = "cpuUsage")]
    pub cpu_usage_label: String,
    #[serde(rename = "cpuCores")]
    pub cores: Vec<CoreSample>,
    /// Set when `cores` is fallback data rather than a real measurement.
    #[serde(rename = "cpuCoresSynthetic")]
    pub cores_synthetic: bool,
    #[serde(rename = "cpuSummary")]
    pub summary: CpuSummary,
    #[serde(rename = "memoryUsage")]
    pub memory: MemorySample,
    pub processes: Vec<ProcessSample>,
    #[serde(rename = "systemLoad")]
    pub load: LoadSample,
}
