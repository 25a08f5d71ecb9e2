//! Snapshot parsing for top(1) batch output.
//!
//! A snapshot block starts at a line beginning with the header token `top`
//! and runs until the next such line (or end of input). Within a block the
//! layout is fixed: summary lines, a blank line, the process-table header,
//! then data rows.

pub mod columns;
pub mod summary;
pub mod types;
pub mod uptime;

use crate::error::ParseError;
use types::Snapshot;

/// Literal line-start marker that begins every snapshot block.
pub const HEADER_TOKEN: &str = "top";

/// Parses a complete text blob into the snapshots it contains.
///
/// Zero-length input is an error; non-empty input without any header-token
/// line yields an empty vector.
pub fn parse_top_output(input: &str) -> Result<Vec<Snapshot>, ParseError> {
    if input.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    split_snapshot_blocks(input)
        .into_iter()
        .map(parse_snapshot_block)
        .collect()
}

/// Byte offsets at which the header token starts a line.
///
/// Offset 0 counts as a line start. A `top` appearing elsewhere in a line
/// (for example inside a COMMAND value) is not a boundary.
pub(crate) fn header_positions(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    text.match_indices(HEADER_TOKEN)
        .filter(|(at, _)| *at == 0 || bytes[at - 1] == b'\n')
        .map(|(at, _)| at)
        .collect()
}

/// Splits a text blob into snapshot blocks, one per header-token line.
pub fn split_snapshot_blocks(input: &str) -> Vec<&str> {
    let starts = header_positions(input);
    starts
        .iter()
        .enumerate()
        .map(|(i, &at)| match starts.get(i + 1) {
            Some(&next) => &input[at..next],
            None => &input[at..],
        })
        .collect()
}

/// Parses one snapshot block: summary lines, blank line, table header, rows.
pub fn parse_snapshot_block(block: &str) -> Result<Snapshot, ParseError> {
    let lines: Vec<&str> = block.lines().collect();

    let first_blank = lines.iter().position(|line| line.is_empty()).unwrap_or(0);
    let summary_text = lines[..first_blank].join("\n");
    let header = lines.get(first_blank + 1).copied().unwrap_or("");
    let rows = lines.get(first_blank + 2..).unwrap_or(&[]);

    let summary = summary::parse_summary(&summary_text)?;
    let layout = columns::resolve_columns(header)?;
    let processes = columns::extract_row_fields(&layout, rows);

    Ok(Snapshot { summary, processes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(parse_top_output(""), Err(ParseError::EmptyInput));
    }

    #[test]
    fn input_without_header_token_yields_no_snapshots() {
        assert_eq!(parse_top_output("no snapshots here\n").unwrap(), vec![]);
    }

    #[test]
    fn header_token_must_start_a_line() {
        // "top" inside a command line is not a block boundary.
        let text = "laptop things\nrun top now\n";
        assert!(header_positions(text).is_empty());

        let text = "top - ...\nfoo\ntop - ...\n";
        assert_eq!(header_positions(text), vec![0, 14]);
    }

    #[test]
    fn splits_blocks_at_header_lines() {
        let input = "\
junk before the first header
top - first
body 1

top - second
body 2
";
        let blocks = split_snapshot_blocks(input);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("top - first"));
        assert!(blocks[0].contains("body 1"));
        assert!(blocks[1].starts_with("top - second"));
    }

    #[test]
    fn block_count_matches_header_line_count() {
        let block = "\
top - 15:29:37 up 15:54,  0 users,  load average: 0.14, 0.07, 0.06
Tasks:  60 total,   1 running,  39 sleeping,   0 stopped,  20 zombie

PID USER      COMMAND
";
        let blob = format!("{block}\n{block}\n{block}");
        assert_eq!(split_snapshot_blocks(&blob).len(), 3);
    }
}
