//! Stream reassembly tests: chunked input, idle flush, and error isolation.

use std::time::Duration;

use tokio::io::AsyncWriteExt;

use topsnap::{parse_top_output, stream_blocks, SnapshotReassembler, StreamOptions};

const SNAPSHOT: &str = "\
top - 15:29:38 up 15:54,  0 users,  load average: 0.14, 0.07, 0.06
Tasks:  60 total,   1 running,  39 sleeping,   0 stopped,  20 zombie
%Cpu(s):  0.4 us,  0.8 sy,  0.1 ni, 98.4 id,  0.2 wa,  0.3 hi,  0.4 si,  0.0 st
MiB Mem :   7947.3 total,    408.6 free,   4257.3 used,   3281.4 buff/cache
MiB Swap:   2048.0 total,   2048.0 free,      0.0 used.   3392.8 avail Mem

  PID USER      PR  NI    VIRT    RES    SHR S  %CPU  %MEM     TIME+ COMMAND                        
    1 root      20   0    1804   1192   1104 S   0.0   0.0   0:00.02 /init
";

#[test]
fn reassembled_chunks_parse_like_the_whole_blob() {
    let blob = SNAPSHOT.repeat(3);
    let expected = parse_top_output(&blob).unwrap();

    // Cut the blob at awkward places: mid-line, mid-field, single bytes.
    for step in [1, 11, 64, 501] {
        let mut reassembler = SnapshotReassembler::new();
        let mut snapshots = Vec::new();

        let chars: Vec<char> = blob.chars().collect();
        for piece in chars.chunks(step) {
            let chunk: String = piece.iter().collect();
            for block in reassembler.push(&chunk) {
                snapshots.extend(parse_top_output(&block).unwrap());
            }
        }
        if let Some(block) = reassembler.finish() {
            snapshots.extend(parse_top_output(&block).unwrap());
        }

        assert_eq!(snapshots, expected, "chunk step {step}");
    }
}

#[test]
fn malformed_block_does_not_poison_the_following_one() {
    let broken = SNAPSHOT.replace("Tasks:", "Tusks:");
    let mut reassembler = SnapshotReassembler::new();

    let mut blocks = Vec::new();
    blocks.extend(reassembler.push(&broken));
    blocks.extend(reassembler.push(SNAPSHOT));
    blocks.extend(reassembler.finish());
    assert_eq!(blocks.len(), 2);

    assert!(parse_top_output(&blocks[0]).is_err());
    let snapshots = parse_top_output(&blocks[1]).unwrap();
    assert_eq!(snapshots.len(), 1);
}

#[tokio::test]
async fn stream_blocks_reassembles_a_live_pipe() {
    let (mut tx, rx) = tokio::io::duplex(64 * 1024);
    let blob = SNAPSHOT.repeat(2);

    let writer = tokio::spawn(async move {
        for piece in blob.as_bytes().chunks(100) {
            tx.write_all(piece).await.unwrap();
        }
        // Dropping the writer ends the stream.
    });

    let mut blocks = Vec::new();
    stream_blocks(rx, &StreamOptions::default(), |block| blocks.push(block))
        .await
        .unwrap();
    writer.await.unwrap();

    assert_eq!(blocks, vec![SNAPSHOT.to_string(), SNAPSHOT.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn idle_timeout_flushes_a_stalled_trailing_block() {
    let (mut tx, rx) = tokio::io::duplex(64 * 1024);
    let (block_tx, mut block_rx) = tokio::sync::mpsc::unbounded_channel();

    let reader = tokio::spawn(async move {
        let options = StreamOptions {
            idle_timeout: Some(Duration::from_millis(200)),
        };
        stream_blocks(rx, &options, move |block| {
            block_tx.send(block).ok();
        })
        .await
        .unwrap();
    });

    // A lone snapshot with no follow-up: only the idle timer can flush it.
    tx.write_all(SNAPSHOT.as_bytes()).await.unwrap();
    let block = block_rx.recv().await.unwrap();
    assert_eq!(block, SNAPSHOT);

    // After the flush the stream keeps working as usual.
    tx.write_all(SNAPSHOT.as_bytes()).await.unwrap();
    let block = block_rx.recv().await.unwrap();
    assert_eq!(block, SNAPSHOT);

    drop(tx);
    reader.await.unwrap();
    assert!(block_rx.recv().await.is_none());
}

#[tokio::test]
async fn multibyte_text_survives_a_mid_sequence_chunk_cut() {
    let with_unicode = SNAPSHOT.replace("/init", "café-server");
    let blob = format!("{with_unicode}{SNAPSHOT}");

    // Cut the stream between the two bytes of the 'é' sequence.
    let bytes = blob.into_bytes();
    let cut = bytes
        .iter()
        .position(|&b| b == 0xC3)
        .map(|at| at + 1)
        .unwrap();

    let (mut tx, rx) = tokio::io::duplex(64 * 1024);
    let writer = tokio::spawn(async move {
        tx.write_all(&bytes[..cut]).await.unwrap();
        tx.write_all(&bytes[cut..]).await.unwrap();
    });

    let mut blocks = Vec::new();
    stream_blocks(rx, &StreamOptions::default(), |block| blocks.push(block))
        .await
        .unwrap();
    writer.await.unwrap();

    assert_eq!(blocks.len(), 2);
    let snapshots = parse_top_output(&blocks[0]).unwrap();
    assert_eq!(snapshots[0].processes[0]["COMMAND"], "café-server");
}
