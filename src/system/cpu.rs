use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::source::CoreTicks;
use crate::format::round_1;

/// Cores above this usage percentage count as active.
pub const ACTIVE_THRESHOLD: u8 = 5;

const SYNTHETIC_CORES: u32 = 4;
const SYNTHETIC_SEED: u64 = 0x5eed_c0de;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreSample {
    pub core: u32,
    pub usage: u8,
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub iowait: f64,
    pub is_active: bool,
}

impl CoreSample {
    fn fully_idle(core: u32) -> Self {
        CoreSample {
            core,
            usage: 0,
            user: 0.0,
            system: 0.0,
            idle: 100.0,
            iowait: 0.0,
            is_active: false,
        }
    }

    fn from_percentages(core: u32, user: f64, system: f64, idle: f64, iowait: f64) -> Self {
        let usage = usage_from_idle(idle);
        CoreSample {
            core,
            usage,
            user,
            system,
            idle,
            iowait,
            is_active: usage > ACTIVE_THRESHOLD,
        }
    }
}

/// `clamp(round(100 - idle), 0, 100)`.
pub fn usage_from_idle(idle: f64) -> u8 {
    (100.0 - idle).round().clamp(0.0, 100.0) as u8
}

/// Convert two tick snapshots taken an interval apart into per-core
/// utilization. Cores missing from either snapshot are skipped; the result is
/// sorted by core index.
pub fn compute_core_usage(before: &[CoreTicks], after: &[CoreTicks]) -> Vec<CoreSample> {
    let previous: HashMap<u32, &CoreTicks> = before.iter().map(|t| (t.core, t)).collect();

    let mut cores: Vec<CoreSample> = after
        .iter()
        .filter_map(|curr| {
            previous
                .get(&curr.core)
                .map(|prev| core_delta(prev, curr))
        })
        .collect();

    cores.sort_by_key(|c| c.core);
    cores
}

fn core_delta(prev: &CoreTicks, curr: &CoreTicks) -> CoreSample {
    let (a, b) = (prev.counters(), curr.counters());
    // Counters can go backwards after a CPU hotplug; treat that as no progress.
    let diff: [u64; 7] = std::array::from_fn(|i| b[i].saturating_sub(a[i]));
    let total: u64 = diff.iter().sum();

    if total == 0 {
        return CoreSample::fully_idle(curr.core);
    }

    // user nice system idle iowait irq softirq
    let pct = |ticks: u64| round_1(ticks as f64 / total as f64 * 100.0);
    CoreSample::from_percentages(curr.core, pct(diff[0]), pct(diff[2]), pct(diff[3]), pct(diff[4]))
}

/// Placeholder cores served when the per-core tick source is unreadable.
/// Deterministic for a given build so repeated failures look the same.
pub fn synthetic_cores() -> Vec<CoreSample> {
    let mut rng = StdRng::seed_from_u64(SYNTHETIC_SEED);
    (0..SYNTHETIC_CORES)
        .map(|core| {
            let user = round_1(rng.gen_range(0.0..30.0));
            let system = round_1(rng.gen_range(0.0..20.0));
            let iowait = round_1(rng.gen_range(0.0..5.0));
            let idle = round_1(100.0 - user - system - iowait);
            CoreSample::from_percentages(core, user, system, idle, iowait)
        })
        .collect()
}
