/// Background scanning of a single file.
///
/// A [`ScanWorker`] owns one [`ScanTask`] and runs it on a dedicated thread.
/// The task keeps its running tally private; the worker copies it into the
/// [`crate::counter::SharedCounter`] exactly once when the scan ends, then marks
/// the counter done. Failures are logged on the worker thread and still end
/// with the counter marked done, so whoever joins the worker never waits on a
/// result that will not arrive.
///
/// ```rust,ignore
/// let counter = SharedCounter::new();
/// let handle = ScanWorker::new(&config, counter.clone()).spawn()?;
/// // ... stay responsive, call counter.read() as needed ...
/// let snapshot = handle.join();
/// ```
pub mod matcher;
pub mod reader;
pub mod worker;

pub use matcher::KeywordMatcher;
pub use worker::{ScanHandle, ScanReport, ScanTask, ScanWorker};
