//! topsnap — structured parsing for Linux top(1) batch output.
//!
//! The library turns the text printed by `top -b` into typed snapshot
//! records. It works on complete text blobs as well as on live streams
//! whose chunks arrive at arbitrary byte boundaries.
//!
//! # Usage
//!
//! ```rust
//! use topsnap::parse_top_output;
//!
//! let text = "\
//! top - 15:29:38 up 15:54,  0 users,  load average: 0.14, 0.07, 0.06
//! Tasks:  60 total,   1 running,  39 sleeping,   0 stopped,  20 zombie
//! %Cpu(s):  0.4 us,  0.8 sy,  0.1 ni, 98.4 id,  0.2 wa,  0.3 hi,  0.4 si,  0.0 st
//! MiB Mem :   7947.3 total,    408.6 free,   4257.3 used,   3281.4 buff/cache
//! MiB Swap:   2048.0 total,   2048.0 free,      0.0 used.   3392.8 avail Mem
//!
//!   PID USER      PR  NI    VIRT    RES    SHR S  %CPU  %MEM     TIME+ COMMAND
//!     1 root      20   0    1804   1192   1104 S   0.0   0.0   0:00.02 /init
//! ";
//!
//! let snapshots = parse_top_output(text).unwrap();
//! assert_eq!(snapshots.len(), 1);
//! assert_eq!(snapshots[0].summary.task_states.total, 60);
//! assert_eq!(snapshots[0].processes[0]["COMMAND"], "/init");
//! ```
//!
//! For live pipes, [`SnapshotReassembler`] buffers arbitrary chunks until a
//! snapshot boundary is visible and [`stream_blocks`] drives it from any
//! async reader.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod stream;

// Re-export main types for convenience
pub use error::ParseError;
pub use parser::types::{
    ColumnLayout, ColumnSpan, CpuState, PhysicalMemory, ProcessFields, Snapshot, Summary,
    TaskStates, UptimeAndLoad, VirtualMemory,
};
pub use parser::{parse_top_output, split_snapshot_blocks};
pub use stream::{stream_blocks, SnapshotReassembler, StreamOptions};
