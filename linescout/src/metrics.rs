use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::scan::reader::{LARGE_FILE_THRESHOLD, SMALL_FILE_THRESHOLD};

/// Tracks throughput counters for a scan.
///
/// These are observability-only: nothing reads them back into the shared
/// counter, so relaxed ordering is enough.
#[derive(Debug, Clone)]
pub struct ScanMetrics {
    lines_scanned: Arc<AtomicU64>,
    matching_lines: Arc<AtomicU64>,
    bytes_read: Arc<AtomicU64>,

    // Read strategy used per file
    small_reads: Arc<AtomicU64>,
    buffered_reads: Arc<AtomicU64>,
    mmap_reads: Arc<AtomicU64>,
}

impl ScanMetrics {
    /// Creates a new ScanMetrics instance
    pub fn new() -> Self {
        Self {
            lines_scanned: Arc::new(AtomicU64::new(0)),
            matching_lines: Arc::new(AtomicU64::new(0)),
            bytes_read: Arc::new(AtomicU64::new(0)),
            small_reads: Arc::new(AtomicU64::new(0)),
            buffered_reads: Arc::new(AtomicU64::new(0)),
            mmap_reads: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records one scanned line
    pub fn record_line(&self, matched: bool) {
        self.lines_scanned.fetch_add(1, Ordering::Relaxed);
        if matched {
            self.matching_lines.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records a file read and the strategy its size selects
    pub fn record_file_read(&self, size: u64) {
        self.bytes_read.fetch_add(size, Ordering::Relaxed);
        if size < SMALL_FILE_THRESHOLD {
            self.small_reads.fetch_add(1, Ordering::Relaxed);
        } else if size >= LARGE_FILE_THRESHOLD {
            self.mmap_reads.fetch_add(1, Ordering::Relaxed);
        } else {
            self.buffered_reads.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Gets current statistics
    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            matching_lines: self.matching_lines.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            small_reads: self.small_reads.load(Ordering::Relaxed),
            buffered_reads: self.buffered_reads.load(Ordering::Relaxed),
            mmap_reads: self.mmap_reads.load(Ordering::Relaxed),
        }
    }

    /// Logs current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        debug!(
            "Scan stats:\n\
             Lines scanned: {}\n\
             Matching lines: {}\n\
             Bytes read: {}\n\
             Reads (small/buffered/mmap): {}/{}/{}",
            stats.lines_scanned,
            stats.matching_lines,
            stats.bytes_read,
            stats.small_reads,
            stats.buffered_reads,
            stats.mmap_reads
        );
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`ScanMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub lines_scanned: u64,
    pub matching_lines: u64,
    pub bytes_read: u64,
    pub small_reads: u64,
    pub buffered_reads: u64,
    pub mmap_reads: u64,
}
