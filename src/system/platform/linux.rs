use super::PlatformCounters;
use crate::error::SourceError;
use crate::system::snapshot::LoadSample;
use crate::system::source::{CoreTicks, RawMemory};

const PROC_STAT: &str = "/proc/stat";
const PROC_MEMINFO: &str = "/proc/meminfo";
const PROC_LOADAVG: &str = "/proc/loadavg";

pub struct Platform;

impl PlatformCounters for Platform {
    fn core_ticks() -> Result<Vec<CoreTicks>, SourceError> {
        parse_proc_stat(&read(PROC_STAT)?)
    }

    fn memory() -> Result<RawMemory, SourceError> {
        parse_meminfo(&read(PROC_MEMINFO)?)
    }

    fn load() -> Result<LoadSample, SourceError> {
        parse_loadavg(&read(PROC_LOADAVG)?)
    }

    fn ps_args() -> &'static [&'static str] {
        &["ax", "--sort=-%mem", "-o"]
    }
}

fn read(path: &'static str) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|source| SourceError::Io { path, source })
}

/// Per-core `cpuN` lines of /proc/stat. The aggregate `cpu` line is skipped.
pub fn parse_proc_stat(contents: &str) -> Result<Vec<CoreTicks>, SourceError> {
    let mut cores = Vec::new();
    for line in contents.lines() {
        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else {
            continue;
        };
        let Some(index) = label.strip_prefix("cpu") else {
            continue;
        };
        if index.is_empty() {
            continue;
        }
        let core: u32 = index
            .parse()
            .map_err(|_| SourceError::parse("/proc/stat", format!("bad core label `{label}`")))?;

        // user nice system idle iowait irq softirq
        let mut counters = [0u64; 7];
        for slot in &mut counters {
            let raw = fields.next().ok_or_else(|| {
                SourceError::parse("/proc/stat", format!("`{label}` has fewer than 7 counters"))
            })?;
            *slot = raw.parse().map_err(|_| {
                SourceError::parse("/proc/stat", format!("`{label}` counter `{raw}` is not a number"))
            })?;
        }
        let [user, nice, system, idle, iowait, irq, softirq] = counters;
        cores.push(CoreTicks {
            core,
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        });
    }

    if cores.is_empty() {
        return Err(SourceError::parse("/proc/stat", "no per-core cpu lines"));
    }
    Ok(cores)
}

/// Byte counters from /proc/meminfo, using the same buff/cache split as `free`.
pub fn parse_meminfo(contents: &str) -> Result<RawMemory, SourceError> {
    let mut total = None;
    let mut free = 0;
    let mut available = None;
    let mut buffers = 0;
    let mut cached = 0;
    let mut reclaimable = 0;

    for line in contents.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(kb) = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok())
        else {
            continue;
        };
        let bytes = kb * 1024;
        match key {
            "MemTotal" => total = Some(bytes),
            "MemFree" => free = bytes,
            "MemAvailable" => available = Some(bytes),
            "Buffers" => buffers = bytes,
            "Cached" => cached = bytes,
            "SReclaimable" => reclaimable = bytes,
            _ => {}
        }
    }

    let total = total.ok_or_else(|| SourceError::parse("/proc/meminfo", "missing MemTotal"))?;
    let cached = cached + reclaimable;
    // Kernels before 3.14 have no MemAvailable.
    let available = available.unwrap_or(free + buffers + cached).min(total);
    let used = total.saturating_sub(free + buffers + cached);

    Ok(RawMemory {
        total,
        used,
        free,
        available,
        buffers,
        cached,
    })
}

/// `load1 load5 load15 running/total last_pid`
pub fn parse_loadavg(contents: &str) -> Result<LoadSample, SourceError> {
    let fields: Vec<&str> = contents.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(SourceError::parse(
            "/proc/loadavg",
            format!("expected at least 4 fields, got {}", fields.len()),
        ));
    }

    let load = |i: usize| {
        fields[i]
            .parse::<f64>()
            .map_err(|_| SourceError::parse("/proc/loadavg", format!("bad load `{}`", fields[i])))
    };
    let (running, total) = fields[3]
        .split_once('/')
        .and_then(|(r, t)| Some((r.parse::<u32>().ok()?, t.parse::<u32>().ok()?)))
        .ok_or_else(|| {
            SourceError::parse("/proc/loadavg", format!("bad task counts `{}`", fields[3]))
        })?;

    Ok(LoadSample {
        load1: load(0)?,
        load5: load(1)?,
        load15: load(2)?,
        running_processes: running,
        total_processes: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "\
cpu  4705 356 584 3699176 23060 0 277 0 0 0
cpu0 1393 280 284 924779 5743 0 149 0 0 0
cpu1 1211 20 107 925166 5863 0 52 0 0 0
intr 1462898 21 0 0
ctxt 3431553
processes 8212
procs_running 2
";

    const MEMINFO: &str = "\
MemTotal:       16303488 kB
MemFree:         1220544 kB
MemAvailable:    9542716 kB
Buffers:          473700 kB
Cached:          7663432 kB
SwapCached:            0 kB
SReclaimable:     412356 kB
";

    #[test]
    fn proc_stat_yields_per_core_counters() {
        let cores = parse_proc_stat(STAT).unwrap();
        assert_eq!(cores.len(), 2);
        assert_eq!(
            cores[1],
            CoreTicks {
                core: 1,
                user: 1211,
                nice: 20,
                system: 107,
                idle: 925166,
                iowait: 5863,
                irq: 0,
                softirq: 52,
            }
        );
    }

    #[test]
    fn proc_stat_without_cores_is_an_error() {
        let err = parse_proc_stat("cpu  1 2 3 4 5 6 7\nintr 0\n").unwrap_err();
        assert!(err.to_string().contains("no per-core"));
    }

    #[test]
    fn truncated_core_line_fails_closed() {
        assert!(parse_proc_stat("cpu0 1 2 3\n").is_err());
    }

    #[test]
    fn meminfo_in_bytes() {
        let mem = parse_meminfo(MEMINFO).unwrap();
        assert_eq!(mem.total, 16303488 * 1024);
        assert_eq!(mem.free, 1220544 * 1024);
        assert_eq!(mem.available, 9542716 * 1024);
        assert_eq!(mem.buffers, 473700 * 1024);
        assert_eq!(mem.cached, (7663432 + 412356) * 1024);
        assert_eq!(
            mem.used,
            (16303488 - 1220544 - 473700 - 7663432 - 412356) * 1024
        );
    }

    #[test]
    fn meminfo_requires_total() {
        assert!(parse_meminfo("MemFree: 10 kB\n").is_err());
    }

    #[test]
    fn loadavg_fields() {
        let load = parse_loadavg("0.52 0.58 1.59 3/1234 56789\n").unwrap();
        assert_eq!(load.load1, 0.52);
        assert_eq!(load.load5, 0.58);
        assert_eq!(load.load15, 1.59);
        assert_eq!(load.running_processes, 3);
        assert_eq!(load.total_processes, 1234);
    }

    #[test]
    fn loadavg_rejects_garbage() {
        assert!(parse_loadavg("0.1 0.2").is_err());
        assert!(parse_loadavg("0.1 0.2 0.3 nope 1").is_err());
    }
}
