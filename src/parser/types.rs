//! Data model for parsed top(1) snapshots.
//!
//! Every record here is built once per snapshot block and never mutated
//! afterwards. All types serialize with serde so callers can emit them as
//! JSON without further conversion.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// One full sample of top output: the summary area plus the process table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub summary: Summary,
    pub processes: Vec<ProcessFields>,
}

/// Column title mapped to the trimmed cell value of one process row.
///
/// Duplicate column titles overwrite in column order (last wins). A BTreeMap
/// keeps serialization deterministic.
pub type ProcessFields = BTreeMap<String, String>;

/// The five fixed summary lines at the top of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub uptime_and_load: UptimeAndLoad,
    pub task_states: TaskStates,
    /// One aggregate entry, or one entry per core, in document order.
    pub cpu_states: Vec<CpuState>,
    pub physical_memory: PhysicalMemory,
    pub virtual_memory: VirtualMemory,
}

/// Parsed `top - HH:MM:SS up ...` line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UptimeAndLoad {
    /// Wall-clock time-of-day from the snapshot header.
    pub time: NaiveTime,
    /// Uptime normalized to seconds from the day/hour/minute composite.
    pub uptime_seconds: u64,
    pub users: u32,
    pub load_avg_1m: f64,
    pub load_avg_5m: f64,
    pub load_avg_15m: f64,
}

/// Parsed `Tasks: ...` line. No cross-field consistency is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStates {
    pub total: u64,
    pub running: u64,
    pub sleeping: u64,
    pub stopped: u64,
    pub zombie: u64,
}

/// Parsed `%Cpu(s):` or `%CpuN :` line.
///
/// Percentages are taken verbatim; they are not required to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuState {
    /// Core index, or [`CpuState::AGGREGATE`] for the combined `%Cpu(s)` line.
    pub core: i32,
    pub us: f64,
    pub sy: f64,
    pub ni: f64,
    pub id: f64,
    pub wa: f64,
    pub hi: f64,
    pub si: f64,
    pub st: f64,
}

impl CpuState {
    /// Core index used for the aggregate `%Cpu(s)` line.
    pub const AGGREGATE: i32 = -1;
}

/// Parsed `MiB Mem : ...` line, values in the unit top printed (MiB).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalMemory {
    pub total: f64,
    pub free: f64,
    pub used: f64,
    pub buff_cache: f64,
}

/// Parsed `MiB Swap: ...` line, values in the unit top printed (MiB).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualMemory {
    pub total: f64,
    pub free: f64,
    pub used: f64,
    pub available: f64,
}

/// Character span of one column, derived from the process-table header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpan {
    pub title: String,
    pub start: usize,
    pub end: usize,
}

/// Ordered column spans covering the process-table header.
///
/// Spans are contiguous and monotonically increasing: each span starts where
/// the previous one ended, so slicing the header at the recorded offsets and
/// concatenating the pieces reproduces the tokenized prefix verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub spans: Vec<ColumnSpan>,
}
