#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use webtop::error::SourceError;
use webtop::system::platform::command_output_lines;
use webtop::system::snapshot::LoadSample;
use webtop::system::source::{CoreTicks, CounterSource, RawMemory};

pub const GIB: u64 = 1024 * 1024 * 1024;

/// Test double that replays queued tick snapshots and serves fixed values
/// for everything else.
pub struct ScriptedSource {
    ticks: Mutex<VecDeque<Vec<CoreTicks>>>,
    pub memory: Option<RawMemory>,
    pub rows: Vec<String>,
    pub load: LoadSample,
    pub load_delay: Duration,
    pub ticks_delay: Duration,
    /// When set, process rows come from running this program instead of `rows`.
    pub rows_command: Option<(&'static str, Vec<String>)>,
}

impl ScriptedSource {
    pub fn new(snapshots: Vec<Vec<CoreTicks>>) -> Self {
        ScriptedSource {
            ticks: Mutex::new(snapshots.into()),
            memory: Some(RawMemory {
                total: 8 * GIB,
                used: 4 * GIB,
                free: 2 * GIB,
                available: 3 * GIB,
                buffers: GIB / 4,
                cached: GIB + GIB / 2,
            }),
            rows: vec![
                "101 1 postgres 2.5 3.1 2097152 204800 S 01:02:03 postgres -D /var/lib/postgres"
                    .to_string(),
                "not a process row".to_string(),
                "202 101 www 0.0 1.0 524288 51200 S 10:00 nginx: worker process".to_string(),
            ],
            load: LoadSample {
                load1: 0.5,
                load5: 0.25,
                load15: 0.125,
                running_processes: 2,
                total_processes: 311,
            },
            load_delay: Duration::ZERO,
            ticks_delay: Duration::ZERO,
            rows_command: None,
        }
    }

    /// The two-snapshot window from the delta-calculation worked example.
    pub fn busy_core() -> Self {
        Self::new(vec![
            vec![ticks(0, 100, 50, 800, 10)],
            vec![ticks(0, 150, 70, 810, 20)],
        ])
    }
}

pub fn ticks(core: u32, user: u64, system: u64, idle: u64, iowait: u64) -> CoreTicks {
    CoreTicks {
        core,
        user,
        system,
        idle,
        iowait,
        ..CoreTicks::default()
    }
}

#[async_trait]
impl CounterSource for ScriptedSource {
    fn cpu_label(&self) -> Result<String, SourceError> {
        Ok("12.5%".to_string())
    }

    fn core_ticks(&self) -> Result<Vec<CoreTicks>, SourceError> {
        std::thread::sleep(self.ticks_delay);
        self.ticks
            .lock()
            .expect("tick queue poisoned")
            .pop_front()
            .ok_or(SourceError::Unsupported("per-core tick counters"))
    }

    fn memory(&self) -> Result<RawMemory, SourceError> {
        self.memory.ok_or_else(|| SourceError::Io {
            path: "/proc/meminfo",
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    fn load(&self) -> Result<LoadSample, SourceError> {
        std::thread::sleep(self.load_delay);
        Ok(self.load.clone())
    }

    async fn process_rows(&self) -> Result<Vec<String>, SourceError> {
        match &self.rows_command {
            Some((program, args)) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                command_output_lines(*program, &args).await
            }
            None => Ok(self.rows.clone()),
        }
    }
}
