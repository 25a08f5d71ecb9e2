//! Grammars for the five fixed summary lines of a snapshot.
//!
//! Each line is matched by its own anchored pattern over the whole summary
//! block, so the sub-parses are independent of line order and of each other.
//! A missing or malformed line fails with the [`ParseError`] variant naming
//! the grammar that rejected it.

use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;
use crate::parser::types::{
    CpuState, PhysicalMemory, Summary, TaskStates, UptimeAndLoad, VirtualMemory,
};
use crate::parser::uptime::parse_uptime_seconds;

static UPTIME_AND_LOAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^top - ([\d:]+) up (.+?),\s+(\d+)\s+users?,\s+load average:\s*([\d.]+),\s*([\d.]+),\s*([\d.]+)",
    )
    .unwrap()
});

static TASK_STATES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Tasks:\s+(\d+)\s+total,\s+(\d+)\s+running,\s+(\d+)\s+sleeping,\s+(\d+)\s+stopped,\s+(\d+)\s+zombie",
    )
    .unwrap()
});

static CPU_STATES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^%Cpu(\d+|\(s\))\s*:\s*(\d+\.\d+)\s+us,\s*(\d+\.\d+)\s+sy,\s*(\d+\.\d+)\s+ni,\s*(\d+\.\d+)\s+id,\s*(\d+\.\d+)\s+wa,\s*(\d+\.\d+)\s+hi,\s*(\d+\.\d+)\s+si,\s*(\d+\.\d+)\s+st",
    )
    .unwrap()
});

static PHYSICAL_MEMORY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"MiB Mem\s*:\s+([\d.]+)\s+total,\s+([\d.]+)\s+free,\s+([\d.]+)\s+used,\s+([\d.]+)\s+buff/cache",
    )
    .unwrap()
});

static VIRTUAL_MEMORY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"MiB Swap:\s+([\d.]+)\s+total,\s+([\d.]+)\s+free,\s+([\d.]+)\s+used\.\s+([\d.]+)\s+avail Mem",
    )
    .unwrap()
});

/// Parses a complete summary block (the lines above the process table).
pub fn parse_summary(block: &str) -> Result<Summary, ParseError> {
    Ok(Summary {
        uptime_and_load: parse_uptime_and_load(block)?,
        task_states: parse_task_states(block)?,
        cpu_states: parse_cpu_states(block)?,
        physical_memory: parse_physical_memory(block)?,
        virtual_memory: parse_virtual_memory(block)?,
    })
}

/// Parses the `top - HH:MM:SS up ...` header line.
pub fn parse_uptime_and_load(input: &str) -> Result<UptimeAndLoad, ParseError> {
    let fail = || ParseError::UptimeAndLoad(input.to_string());
    let caps = UPTIME_AND_LOAD.captures(input).ok_or_else(fail)?;

    let time = NaiveTime::parse_from_str(&caps[1], "%H:%M:%S").map_err(|_| fail())?;
    let uptime_seconds = parse_uptime_seconds(&caps[2])?;

    Ok(UptimeAndLoad {
        time,
        uptime_seconds,
        users: caps[3].parse().map_err(|_| fail())?,
        load_avg_1m: caps[4].parse().map_err(|_| fail())?,
        load_avg_5m: caps[5].parse().map_err(|_| fail())?,
        load_avg_15m: caps[6].parse().map_err(|_| fail())?,
    })
}

/// Parses the `Tasks: ...` line.
pub fn parse_task_states(input: &str) -> Result<TaskStates, ParseError> {
    let fail = || ParseError::TaskStates(input.to_string());
    let caps = TASK_STATES.captures(input).ok_or_else(fail)?;

    Ok(TaskStates {
        total: caps[1].parse().map_err(|_| fail())?,
        running: caps[2].parse().map_err(|_| fail())?,
        sleeping: caps[3].parse().map_err(|_| fail())?,
        stopped: caps[4].parse().map_err(|_| fail())?,
        zombie: caps[5].parse().map_err(|_| fail())?,
    })
}

/// Parses every CPU state line in the block, in document order.
///
/// A block carries either one aggregate `%Cpu(s)` line or one line per core;
/// at least one must be present.
pub fn parse_cpu_states(input: &str) -> Result<Vec<CpuState>, ParseError> {
    let fail = || ParseError::CpuStates(input.to_string());
    let mut states = Vec::new();

    for caps in CPU_STATES.captures_iter(input) {
        let core = match &caps[1] {
            "(s)" => CpuState::AGGREGATE,
            index => index.parse().map_err(|_| fail())?,
        };
        let percent = |i: usize| -> Result<f64, ParseError> {
            caps[i].parse().map_err(|_| fail())
        };

        states.push(CpuState {
            core,
            us: percent(2)?,
            sy: percent(3)?,
            ni: percent(4)?,
            id: percent(5)?,
            wa: percent(6)?,
            hi: percent(7)?,
            si: percent(8)?,
            st: percent(9)?,
        });
    }

    if states.is_empty() {
        return Err(fail());
    }
    Ok(states)
}

/// Parses the `MiB Mem : ...` line.
pub fn parse_physical_memory(input: &str) -> Result<PhysicalMemory, ParseError> {
    let fail = || ParseError::PhysicalMemory(input.to_string());
    let caps = PHYSICAL_MEMORY.captures(input).ok_or_else(fail)?;

    Ok(PhysicalMemory {
        total: caps[1].parse().map_err(|_| fail())?,
        free: caps[2].parse().map_err(|_| fail())?,
        used: caps[3].parse().map_err(|_| fail())?,
        buff_cache: caps[4].parse().map_err(|_| fail())?,
    })
}

/// Parses the `MiB Swap: ...` line.
pub fn parse_virtual_memory(input: &str) -> Result<VirtualMemory, ParseError> {
    let fail = || ParseError::VirtualMemory(input.to_string());
    let caps = VIRTUAL_MEMORY.captures(input).ok_or_else(fail)?;

    Ok(VirtualMemory {
        total: caps[1].parse().map_err(|_| fail())?,
        free: caps[2].parse().map_err(|_| fail())?,
        used: caps[3].parse().map_err(|_| fail())?,
        available: caps[4].parse().map_err(|_| fail())?,
    })
}
