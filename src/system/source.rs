use async_trait::async_trait;

use crate::error::SourceError;

use super::snapshot::LoadSample;

/// Cumulative tick counters for one core, as read at a single point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreTicks {
    pub core: u32,
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
}

impl CoreTicks {
    pub fn counters(&self) -> [u64; 7] {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
        ]
    }
}

/// Memory counters in bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawMemory {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub available: u64,
    pub buffers: u64,
    pub cached: u64,
}

/// Point-in-time queries against the host. The counter reads are single
/// blocking reads that the orchestrator runs on the blocking pool under a
/// deadline. The process table comes from a child program, so it is async and
/// dropping its future must stop the child.
#[async_trait]
pub trait CounterSource: Send + Sync + 'static {
    /// Human-readable aggregate CPU usage.
    fn cpu_label(&self) -> Result<String, SourceError>;

    /// Per-core cumulative tick counters.
    fn core_ticks(&self) -> Result<Vec<CoreTicks>, SourceError>;

    fn memory(&self) -> Result<RawMemory, SourceError>;

    fn load(&self) -> Result<LoadSample, SourceError>;

    /// Process table rows, ten whitespace-separated fields each
    /// (`pid ppid user %cpu %mem vsz_kb rss_kb state etime command...`),
    /// already ordered by descending memory share.
    async fn process_rows(&self) -> Result<Vec<String>, SourceError>;
}
