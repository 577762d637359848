use serde::Serialize;

use super::cpu::CoreSample;
use crate::format::round_1;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuSummary {
    pub total_cores: usize,
    pub available_cores: usize,
    pub active_cores: usize,
    pub average_usage: u8,
    pub total_user_time: f64,
    pub total_system_time: f64,
    pub total_idle_time: f64,
    pub total_io_wait_time: f64,
}

/// Fold per-core samples into aggregate figures. The `total_*_time` fields are
/// per-core means rounded to one decimal.
pub fn summarize(cores: &[CoreSample]) -> CpuSummary {
    if cores.is_empty() {
        return CpuSummary::default();
    }

    let n = cores.len() as f64;
    let mean = |field: fn(&CoreSample) -> f64| cores.iter().map(field).sum::<f64>() / n;
    let active_cores = cores.iter().filter(|c| c.is_active).count();

    CpuSummary {
        total_cores: cores.len(),
        available_cores: cores.len() - active_cores,
        active_cores,
        average_usage: mean(|c| f64::from(c.usage)).round() as u8,
        total_user_time: round_1(mean(|c| c.user)),
        total_system_time: round_1(mean(|c| c.system)),
        total_idle_time: round_1(mean(|c| c.idle)),
        total_io_wait_time: round_1(mean(|c| c.iowait)),
    }
}
