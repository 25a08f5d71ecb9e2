//! Typed errors for snapshot parsing.
//!
//! Each summary grammar gets its own variant so a failure names the
//! sub-parser that rejected the input, together with the offending text.
//! Malformed input is not recoverable by re-parsing; callers must supply
//! corrected input.

/// Errors raised while parsing top output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,

    #[error("uptime/load line does not match expected format: {0:?}")]
    UptimeAndLoad(String),

    #[error("uptime value does not match any known encoding: {0:?}")]
    Uptime(String),

    #[error("task-states line does not match expected format: {0:?}")]
    TaskStates(String),

    #[error("no CPU state line found in summary block: {0:?}")]
    CpuStates(String),

    #[error("physical-memory line does not match expected format: {0:?}")]
    PhysicalMemory(String),

    #[error("virtual-memory line does not match expected format: {0:?}")]
    VirtualMemory(String),

    #[error("process-table header could not be tokenized: {0:?}")]
    ColumnHeader(String),
}
