use std::any::Any;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::matcher::KeywordMatcher;
use super::reader;
use crate::config::{EncodingMode, ScanConfig};
use crate::counter::{CompletionGuard, CounterSnapshot, SharedCounter};
use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanMetrics;

const WORKER_THREAD_NAME: &str = "scan-worker";

/// Outcome of one completed scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// Lines examined
    pub lines: u64,
    /// Lines containing the keyword
    pub matches: u64,
    pub elapsed: Duration,
}

/// State of a single file scan.
///
/// `local_matches` is private to the thread running the task; it only
/// becomes visible to other threads when the worker publishes it.
#[derive(Debug)]
pub struct ScanTask {
    file_path: PathBuf,
    keyword: String,
    encoding_mode: EncodingMode,
    progress_interval: usize,
    line_delay: Duration,
    lines_processed: u64,
    local_matches: u64,
    metrics: ScanMetrics,
}

impl ScanTask {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            file_path: config.file_path.clone(),
            keyword: config.keyword.clone(),
            encoding_mode: config.encoding_mode,
            progress_interval: config.progress_interval.max(1),
            line_delay: config.line_delay(),
            lines_processed: 0,
            local_matches: 0,
            metrics: ScanMetrics::new(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn lines_processed(&self) -> u64 {
        self.lines_processed
    }

    pub fn local_matches(&self) -> u64 {
        self.local_matches
    }

    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Scans the file on the calling thread and returns the tally.
    ///
    /// Progress notices are emitted every `progress_interval` lines. The
    /// per-line delay, if any, is applied before each line is tested.
    pub fn run(&mut self) -> ScanResult<ScanReport> {
        let started = Instant::now();
        let matcher = KeywordMatcher::new(self.keyword.as_str())?;
        let contents = reader::read_to_string(&self.file_path, self.encoding_mode, &self.metrics)?;

        let lines: Vec<&str> = reader::split_lines(&contents).collect();
        let total_lines = lines.len();
        debug!(
            "Scanning {} lines of {} for '{}'",
            total_lines,
            self.file_path.display(),
            matcher.keyword()
        );

        for line in lines {
            if !self.line_delay.is_zero() {
                thread::sleep(self.line_delay);
            }

            let matched = matcher.is_match(line);
            if matched {
                self.local_matches += 1;
            }
            self.lines_processed += 1;
            self.metrics.record_line(matched);

            if self.lines_processed % self.progress_interval as u64 == 0 {
                info!(
                    "Progress: {}/{} lines processed",
                    self.lines_processed, total_lines
                );
            }
        }

        self.metrics.log_stats();

        Ok(ScanReport {
            lines: self.lines_processed,
            matches: self.local_matches,
            elapsed: started.elapsed(),
        })
    }
}

/// Runs a [`ScanTask`] on a background thread and publishes its result to a
/// [`SharedCounter`].
#[derive(Debug)]
pub struct ScanWorker {
    task: ScanTask,
    counter: SharedCounter,
}

impl ScanWorker {
    pub fn new(config: &ScanConfig, counter: SharedCounter) -> Self {
        Self {
            task: ScanTask::new(config),
            counter,
        }
    }

    /// Starts the scan thread. The worker counts as launched once the
    /// thread has been accepted by the OS.
    pub fn spawn(self) -> ScanResult<ScanHandle> {
        let counter = self.counter.clone();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || self.run())
            .map_err(ScanError::IoError)?;

        Ok(ScanHandle { handle, counter })
    }

    fn run(mut self) {
        // Dropped last, after the write below.
        let _completion = CompletionGuard::new(self.counter.clone());

        info!(
            "Scan worker started. Searching '{}' for '{}'",
            self.task.file_path().display(),
            self.task.keyword()
        );

        match self.task.run() {
            Ok(report) => {
                self.counter.write(report.matches);
                info!(
                    "Scan worker finished. Found {} lines containing '{}' in {} lines ({})",
                    report.matches,
                    self.task.keyword(),
                    report.lines,
                    humantime::format_duration(truncate_to_millis(report.elapsed))
                );
            }
            Err(e) => {
                error!(
                    "Scan of {} failed: {}",
                    self.task.file_path().display(),
                    e
                );
            }
        }
    }
}

fn truncate_to_millis(elapsed: Duration) -> Duration {
    Duration::from_millis(elapsed.as_millis() as u64)
}

/// Handle to a running scan
#[derive(Debug)]
pub struct ScanHandle {
    handle: JoinHandle<()>,
    counter: SharedCounter,
}

impl ScanHandle {
    pub fn counter(&self) -> &SharedCounter {
        &self.counter
    }

    /// Returns true once the worker thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the worker thread exits and returns the final snapshot.
    ///
    /// A panic on the worker thread is logged rather than propagated.
    pub fn join(self) -> CounterSnapshot {
        if let Err(panic) = self.handle.join() {
            error!("Scan worker panicked: {}", panic_message(panic.as_ref()));
        }
        self.counter.read()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic payload"
    }
}
