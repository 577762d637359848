use sysinfo::{ProcessStatus, ProcessesToUpdate, System};

use super::PlatformCounters;
use crate::error::SourceError;
use crate::system::snapshot::LoadSample;
use crate::system::source::{CoreTicks, RawMemory};

/// Hosts without /proc. Memory and load come from sysinfo; per-core tick
/// counters are not exposed, so the collector serves its fallback cores.
pub struct Platform;

impl PlatformCounters for Platform {
    fn core_ticks() -> Result<Vec<CoreTicks>, SourceError> {
        Err(SourceError::Unsupported("per-core tick counters"))
    }

    fn memory() -> Result<RawMemory, SourceError> {
        let mut sys = System::new();
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return Err(SourceError::Unsupported("memory counters"));
        }
        Ok(RawMemory {
            total,
            used: sys.used_memory(),
            free: sys.free_memory(),
            available: sys.available_memory(),
            buffers: 0,
            cached: 0,
        })
    }

    fn load() -> Result<LoadSample, SourceError> {
        let avg = System::load_average();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::All, true);
        let processes = sys.processes();
        let running = processes
            .values()
            .filter(|p| p.status() == ProcessStatus::Run)
            .count();

        Ok(LoadSample {
            load1: avg.one,
            load5: avg.five,
            load15: avg.fifteen,
            running_processes: running as u32,
            total_processes: processes.len() as u32,
        })
    }

    fn ps_args() -> &'static [&'static str] {
        // BSD ps: -m sorts by memory usage.
        &["-axm", "-o"]
    }
}
