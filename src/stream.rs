//! Stream reassembly for chunked top output.
//!
//! Output read from a live `top -b` pipe arrives in chunks with no alignment
//! guarantees: a chunk may span several snapshots or cut a line, a field, or
//! even a UTF-8 sequence in half. [`SnapshotReassembler`] buffers chunks
//! until the next snapshot boundary is visible and hands out complete block
//! texts; [`stream_blocks`] drives it from any async reader and adds the
//! optional idle-timeout flush.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::sleep;

use crate::parser::{header_positions, HEADER_TOKEN};

/// Buffering state machine that turns arbitrary text fragments into complete
/// snapshot blocks.
///
/// A block is only known to be complete once the next header-token boundary
/// (or end of input) has been seen, so there is always at most one partial
/// block in the buffer. The buffer is taken out before a completed block is
/// handed to the caller, which keeps one bad block from corrupting the
/// state for the ones after it.
#[derive(Debug, Default)]
pub struct SnapshotReassembler {
    buffer: String,
}

impl SnapshotReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns the blocks it completed, in input order.
    ///
    /// The chunk is split with the boundary text attached to what follows it.
    /// A segment starting with the header token closes the current buffer
    /// (emitting it unless it is empty or whitespace-only) and becomes the
    /// new buffer; any other segment is appended.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        let mut completed = Vec::new();

        for segment in split_at_headers(chunk) {
            if segment.starts_with(HEADER_TOKEN) {
                if !self.buffer.trim().is_empty() {
                    completed.push(std::mem::take(&mut self.buffer));
                }
                self.buffer.clear();
                self.buffer.push_str(segment);
            } else {
                self.buffer.push_str(segment);
            }
        }

        completed
    }

    /// Takes the buffered partial block if it holds any non-whitespace text.
    ///
    /// Used by the idle-timeout flush: a stream that stops producing output
    /// would otherwise sit on its last snapshot until end-of-input, because
    /// no following header ever arrives to close it.
    pub fn flush_idle(&mut self) -> Option<String> {
        if self.buffer.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.buffer))
    }

    /// Consumes the reassembler at end-of-input, returning whatever is
    /// buffered. No boundary trim is needed at the end of the stream.
    pub fn finish(self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(self.buffer)
    }
}

/// Splits a chunk into segments at header-token boundaries (lookahead split:
/// the boundary text stays attached to what follows it). The chunk start
/// counts as a line start.
fn split_at_headers(chunk: &str) -> Vec<&str> {
    let mut points = header_positions(chunk);
    if points.first() != Some(&0) {
        points.insert(0, 0);
    }

    points
        .iter()
        .enumerate()
        .map(|(i, &at)| match points.get(i + 1) {
            Some(&next) => &chunk[at..next],
            None => &chunk[at..],
        })
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Options for [`stream_blocks`].
#[derive(Debug, Clone, Default)]
pub struct StreamOptions {
    /// Flush the buffered partial block when no chunk arrives for this long.
    /// `None` disables the idle flush.
    pub idle_timeout: Option<Duration>,
}

/// Reads chunks from `reader` until end-of-input, handing every completed
/// snapshot block to `sink` in arrival order.
///
/// Each chunk is processed synchronously to completion before the next one is
/// read, so the sink provides natural backpressure. Incomplete trailing UTF-8
/// sequences are carried over to the next chunk instead of being decoded
/// lossily.
pub async fn stream_blocks<R, F>(
    mut reader: R,
    options: &StreamOptions,
    mut sink: F,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    F: FnMut(String),
{
    let mut reassembler = SnapshotReassembler::new();
    let mut pending: Vec<u8> = Vec::new();
    let mut chunk = vec![0u8; 8 * 1024];

    loop {
        let read = match options.idle_timeout {
            Some(timeout) => {
                tokio::select! {
                    read = reader.read(&mut chunk) => read?,
                    _ = sleep(timeout) => {
                        if let Some(block) = reassembler.flush_idle() {
                            sink(block);
                        }
                        continue;
                    }
                }
            }
            None => reader.read(&mut chunk).await?,
        };

        if read == 0 {
            break;
        }

        pending.extend_from_slice(&chunk[..read]);
        let text = take_decoded(&mut pending);
        if !text.is_empty() {
            for block in reassembler.push(&text) {
                sink(block);
            }
        }
    }

    if !pending.is_empty() {
        // The stream ended inside a UTF-8 sequence; decode what is there.
        let tail = String::from_utf8_lossy(&pending).into_owned();
        for block in reassembler.push(&tail) {
            sink(block);
        }
    }

    if let Some(block) = reassembler.finish() {
        sink(block);
    }

    Ok(())
}

/// Drains the decodable prefix of `pending`, leaving an incomplete trailing
/// UTF-8 sequence (if any) for the next chunk.
fn take_decoded(pending: &mut Vec<u8>) -> String {
    let valid_len = match std::str::from_utf8(pending) {
        Ok(_) => pending.len(),
        // Incomplete sequence at the end of the buffer: keep it pending.
        Err(err) if err.error_len().is_none() => err.valid_up_to(),
        // Invalid bytes in the middle: substitute and move on.
        Err(_) => {
            let text = String::from_utf8_lossy(pending).into_owned();
            pending.clear();
            return text;
        }
    };

    let rest = pending.split_off(valid_len);
    let decoded = std::mem::replace(pending, rest);
    String::from_utf8(decoded).unwrap_or_default()
}
