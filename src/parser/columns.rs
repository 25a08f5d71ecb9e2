//! Process-table column resolution and row slicing.
//!
//! top prints the process table with a fixed-width layout whose geometry is
//! only known at runtime: most columns are right-aligned with leading
//! padding, while COMMAND is left-aligned and soaks up a large run of
//! trailing padding. The header line is the single source of truth for the
//! column boundaries, so the layout is derived from it once and then applied
//! to every data row.

use crate::error::ParseError;
use crate::parser::types::{ColumnLayout, ColumnSpan, ProcessFields};

/// Derives the column layout from the process-table header line.
///
/// Tokenization walks the header left to right. A token is either a
/// whitespace run plus the word that follows it (right-aligned column), or a
/// word reached across a single interior space (or at offset 0) which also
/// absorbs all but one character of a following padding run of length >= 2
/// (left-aligned column). Spans are recorded cumulatively, so they tile the
/// tokenized prefix of the header with no gaps or overlaps; trailing pure
/// whitespace after the last word stays unclaimed.
pub fn resolve_columns(header: &str) -> Result<ColumnLayout, ParseError> {
    let chars: Vec<char> = header.chars().collect();
    let total = chars.len();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < total {
        let token_start = pos;
        let absorbs_padding;

        if chars[pos].is_whitespace() {
            let ws_end = scan_whitespace(&chars, pos);
            if ws_end == total {
                // Trailing padding after the last column.
                break;
            }
            // A single interior space separates two words and belongs to a
            // left-aligned column; a longer run is the leading padding of a
            // right-aligned one.
            absorbs_padding =
                ws_end - pos == 1 && pos > 0 && !chars[pos - 1].is_whitespace();
            pos = scan_word(&chars, ws_end);
        } else {
            // Only reachable at offset 0: a header starting directly with a
            // word behaves like the left-aligned case.
            absorbs_padding = pos == 0;
            pos = scan_word(&chars, pos);
        }

        if absorbs_padding {
            let trail_end = scan_whitespace(&chars, pos);
            if trail_end - pos >= 2 {
                pos = trail_end - 1;
            }
        }

        let title: String = chars[token_start..pos]
            .iter()
            .collect::<String>()
            .trim()
            .to_string();
        spans.push(ColumnSpan {
            title,
            start: token_start,
            end: pos,
        });
    }

    if spans.is_empty() {
        return Err(ParseError::ColumnHeader(header.to_string()));
    }

    Ok(ColumnLayout { spans })
}

fn scan_whitespace(chars: &[char], from: usize) -> usize {
    let mut i = from;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

fn scan_word(chars: &[char], from: usize) -> usize {
    let mut i = from;
    while i < chars.len() && !chars[i].is_whitespace() {
        i += 1;
    }
    i
}

/// Applies a resolved layout to raw data rows.
///
/// Each row is sliced at every column span and the pieces are trimmed. A row
/// shorter than a span simply yields whatever substring remains, which covers
/// both the wide COMMAND column and a trailing single-character column.
/// Rows that are blank after trimming are dropped, never emitted as empty
/// maps. Duplicate column titles overwrite in span order.
pub fn extract_row_fields(layout: &ColumnLayout, rows: &[&str]) -> Vec<ProcessFields> {
    rows.iter()
        .filter(|row| !row.trim().is_empty())
        .map(|row| {
            let chars: Vec<char> = row.chars().collect();
            let mut fields = ProcessFields::new();
            for span in &layout.spans {
                let start = span.start.min(chars.len());
                let end = span.end.min(chars.len());
                let value: String = chars[start..end].iter().collect::<String>().trim().to_string();
                fields.insert(span.title.clone(), value);
            }
            fields
        })
        .collect()
}
