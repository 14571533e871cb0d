//! Parallel classification of a text buffer.
//!
//! The buffer is cut into chunks that end just after a newline. A newline is
//! ASCII, so no well-formed or malformed step can straddle a cut; each worker
//! still looks up against the full remaining buffer so lookahead past its
//! chunk sees the same bytes a sequential pass would. A truncated step always
//! runs to the end of the buffer, so every chunk after the one that reports
//! truncation is discarded when the chunk reports are merged.

use crate::trie::{Segment, SegmentKind, Segments, Trie};
use crate::utils::chunk_progress;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::ops::Range;
use tracing::debug;

/// Default chunk size: 1 MiB
pub const DEFAULT_CHUNK_BYTES: usize = 1 << 20;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Target chunk size; chunks are extended to the next newline
    pub chunk_bytes: usize,
    /// Worker threads in a dedicated pool, 0 uses the global rayon pool
    pub threads: usize,
    /// Show a progress bar over chunks
    pub progress: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            threads: 0,
            progress: false,
        }
    }
}

/// Segment and byte count for one [`SegmentKind`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCount {
    pub segments: usize,
    pub bytes: usize,
}

impl KindCount {
    fn add(&mut self, other: KindCount) {
        self.segments += other.segments;
        self.bytes += other.bytes;
    }
}

/// Aggregated result of a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub total_bytes: usize,
    pub mapped: KindCount,
    pub unmapped: KindCount,
    pub malformed: KindCount,
    pub truncated: KindCount,
    /// Offset of the first malformed byte, if any
    pub first_malformed: Option<usize>,
}

impl ScanReport {
    pub fn record(&mut self, seg: &Segment) {
        let count = match seg.kind {
            SegmentKind::Mapped => &mut self.mapped,
            SegmentKind::Unmapped => &mut self.unmapped,
            SegmentKind::Malformed => {
                self.first_malformed.get_or_insert(seg.start);
                &mut self.malformed
            }
            SegmentKind::Truncated => &mut self.truncated,
        };
        count.add(KindCount {
            segments: 1,
            bytes: seg.len,
        });
        self.total_bytes += seg.len;
    }

    /// Fold a later chunk's report into this one
    pub fn merge(&mut self, later: &ScanReport) {
        self.total_bytes += later.total_bytes;
        self.mapped.add(later.mapped);
        self.unmapped.add(later.unmapped);
        self.malformed.add(later.malformed);
        self.truncated.add(later.truncated);
        if self.first_malformed.is_none() {
            self.first_malformed = later.first_malformed;
        }
    }

    /// True when every byte was part of a well-formed step
    pub fn is_clean(&self) -> bool {
        self.malformed.segments == 0 && self.truncated.segments == 0
    }
}

/// Classify `bytes` in a single pass on the current thread
pub fn scan_sequential(trie: Trie<'_>, bytes: &[u8]) -> ScanReport {
    let mut report = ScanReport::default();
    for seg in trie.segments(bytes) {
        report.record(&seg);
    }
    report
}

/// Classify `bytes` in parallel. The result equals [`scan_sequential`].
pub fn scan(trie: Trie<'_>, bytes: &[u8], options: &ScanOptions) -> Result<ScanReport> {
    let chunks = split_chunks(bytes, options.chunk_bytes);
    debug!(bytes = bytes.len(), chunks = chunks.len(), "scanning");

    let pb = options.progress.then(|| chunk_progress(chunks.len() as u64));

    let run = || -> Vec<(ScanReport, bool)> {
        chunks
            .par_iter()
            .map(|range| {
                let out = scan_chunk(trie, bytes, range.clone());
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                out
            })
            .collect()
    };

    let partials = if options.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build()
            .context("Failed to build scan thread pool")?
            .install(run)
    } else {
        run()
    };

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    let mut report = ScanReport::default();
    for (partial, truncated) in &partials {
        report.merge(partial);
        if *truncated {
            break;
        }
    }
    Ok(report)
}

/// Scan the steps that start inside `range`, looking up against the rest of
/// the buffer. Returns the partial report and whether a truncated step was
/// found.
fn scan_chunk(trie: Trie<'_>, bytes: &[u8], range: Range<usize>) -> (ScanReport, bool) {
    let mut report = ScanReport::default();
    let chunk_len = range.end - range.start;
    for mut seg in Segments::new(trie, &bytes[range.start..]) {
        if seg.start >= chunk_len {
            break;
        }
        seg.start += range.start;
        report.record(&seg);
        if seg.kind == SegmentKind::Truncated {
            return (report, true);
        }
    }
    (report, false)
}

/// Cut `bytes` into ranges of at least `target` bytes ending just after a
/// newline (the last range ends at the end of the buffer)
pub fn split_chunks(bytes: &[u8], target: usize) -> Vec<Range<usize>> {
    let target = target.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < bytes.len() {
        let want = start + target;
        if want >= bytes.len() {
            chunks.push(start..bytes.len());
            break;
        }
        let end = match memchr::memchr(b'\n', &bytes[want..]) {
            Some(off) => want + off + 1,
            None => bytes.len(),
        };
        chunks.push(start..end);
        start = end;
    }
    chunks
}
