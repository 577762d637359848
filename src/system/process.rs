use serde::Serialize;

use crate::format::kb_to_mb;

/// Fields in a process row; the last one (command) absorbs any trailing text.
pub const ROW_FIELDS: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSample {
    pub pid: u32,
    pub ppid: u32,
    pub name: String,
    pub user: String,
    pub cpu: f64,
    /// Share of physical memory, percent.
    pub memory: f64,
    #[serde(rename = "memoryMB")]
    pub memory_mb: u64,
    /// Virtual size in MB.
    pub virtual_memory: u64,
    /// Resident size in KB.
    pub resident_memory: u64,
    pub state: String,
    pub start_time: String,
}

/// Parse one process row. Rows that do not match the schema yield `None`.
pub fn parse_row(line: &str) -> Option<ProcessSample> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < ROW_FIELDS {
        return None;
    }

    let pid: u32 = parts[0].parse().ok()?;
    if pid == 0 {
        return None;
    }
    let virtual_kb: u64 = parts[5].parse().ok()?;
    let resident_kb: u64 = parts[6].parse().ok()?;

    Some(ProcessSample {
        pid,
        ppid: parts[1].parse().ok()?,
        user: parts[2].to_string(),
        cpu: parts[3].parse().ok()?,
        memory: parts[4].parse().ok()?,
        memory_mb: kb_to_mb(resident_kb),
        virtual_memory: kb_to_mb(virtual_kb),
        resident_memory: resident_kb,
        state: parts[7].to_string(),
        start_time: parts[8].to_string(),
        name: parts[ROW_FIELDS - 1..].join(" "),
    })
}

/// Parse rows in source order and keep the first `limit` valid ones. The
/// source is already ordered by memory share, so no sorting happens here.
pub fn rank_processes<S: AsRef<str>>(rows: &[S], limit: usize) -> Vec<ProcessSample> {
    let mut dropped = 0usize;
    let ranked: Vec<ProcessSample> = rows
        .iter()
        .filter_map(|row| {
            let parsed = parse_row(row.as_ref());
            if parsed.is_none() && !row.as_ref().trim().is_empty() {
                dropped += 1;
            }
            parsed
        })
        .take(limit)
        .collect();

    if dropped > 0 {
        tracing::debug!(dropped, "skipped malformed process rows");
    }
    ranked
}
