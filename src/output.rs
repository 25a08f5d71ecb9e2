//! Option-driven rendering of parsed snapshots.
//!
//! The parser always produces full [`Snapshot`] records; the knobs here are
//! presentation concerns layered on top: keeping only the summary portion,
//! dropping idle process rows, and pretty-printing the JSON text.

use serde::Serialize;

use crate::parser::types::Snapshot;

/// Column title of the CPU-percentage field in the process table.
const CPU_COLUMN: &str = "%CPU";

/// Rendering options resolved from CLI flags and config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Serialize only the summary portion of each snapshot.
    pub summary: bool,
    /// Drop process rows whose `%CPU` value is not greater than zero.
    pub filter: bool,
    /// Human-formatted JSON instead of compact.
    pub pretty: bool,
}

/// Removes process rows whose CPU percentage is absent, unparseable, or <= 0.
pub fn filter_idle_rows(snapshots: &mut [Snapshot]) {
    for snapshot in snapshots {
        snapshot.processes.retain(|row| {
            row.get(CPU_COLUMN)
                .and_then(|value| value.parse::<f64>().ok())
                .is_some_and(|cpu| cpu > 0.0)
        });
    }
}

/// Renders a parsed snapshot sequence as one JSON document.
pub fn render(mut snapshots: Vec<Snapshot>, options: &OutputOptions) -> serde_json::Result<String> {
    if options.filter {
        filter_idle_rows(&mut snapshots);
    }

    if options.summary {
        let summaries: Vec<_> = snapshots.into_iter().map(|s| s.summary).collect();
        to_json(&summaries, options.pretty)
    } else {
        to_json(&snapshots, options.pretty)
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
