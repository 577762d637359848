use async_trait::async_trait;
use sysinfo::System;
use tokio::process::Command;

use crate::error::SourceError;
use crate::system::snapshot::LoadSample;
use crate::system::source::{CoreTicks, CounterSource, RawMemory};

/// Column list handed to `ps`; the trailing `=` on every column suppresses
/// the header line.
const PS_COLUMNS: &str = "pid=,ppid=,user=,pcpu=,pmem=,vsz=,rss=,state=,etime=,args=";

pub trait PlatformCounters {
    fn core_ticks() -> Result<Vec<CoreTicks>, SourceError>;
    fn memory() -> Result<RawMemory, SourceError>;
    fn load() -> Result<LoadSample, SourceError>;
    /// Arguments placed before the column list so `ps` lists every process
    /// ordered by descending memory share.
    fn ps_args() -> &'static [&'static str];
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod portable;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use portable as platform_impl;

/// The live host. Every query is a fresh read; nothing is cached between calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostSource;

#[async_trait]
impl CounterSource for HostSource {
    fn cpu_label(&self) -> Result<String, SourceError> {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        if sys.cpus().is_empty() {
            return Err(SourceError::Unsupported("cpu usage"));
        }
        // sysinfo needs two refreshes at least this far apart to compute usage.
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu_usage();
        Ok(format!("{:.1}%", sys.global_cpu_usage()))
    }

    fn core_ticks(&self) -> Result<Vec<CoreTicks>, SourceError> {
        platform_impl::Platform::core_ticks()
    }

    fn memory(&self) -> Result<RawMemory, SourceError> {
        platform_impl::Platform::memory()
    }

    fn load(&self) -> Result<LoadSample, SourceError> {
        platform_impl::Platform::load()
    }

    async fn process_rows(&self) -> Result<Vec<String>, SourceError> {
        let mut args = platform_impl::Platform::ps_args().to_vec();
        args.push(PS_COLUMNS);
        command_output_lines("ps", &args).await
    }
}

/// Run `program` to completion and return its non-empty stdout lines.
///
/// The child is killed if the returned future is dropped before it exits, so
/// a caller's deadline also bounds the child's lifetime.
pub async fn command_output_lines(
    program: &'static str,
    args: &[&str],
) -> Result<Vec<String>, SourceError> {
    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| SourceError::Command {
            program,
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(SourceError::Command {
            program,
            detail: format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}
