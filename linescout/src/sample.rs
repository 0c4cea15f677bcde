use rand::seq::IndexedRandom;
use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::errors::{ScanError, ScanResult};

/// Messages a generated log line is drawn from. Four of ten contain `ERROR`.
pub const SAMPLE_MESSAGES: &[&str] = &[
    "INFO: System started successfully",
    "ERROR: Could not connect to the database",
    "WARNING: Available memory is low",
    "ERROR: Request timed out",
    "INFO: User authenticated",
    "DEBUG: Processing request",
    "ERROR: File not found",
    "INFO: Operation completed successfully",
    "WARNING: SSL certificate about to expire",
    "ERROR: Permission denied",
];

/// Writes `lines` random log records to `path`, replacing any existing file.
pub fn write_sample_log(path: &Path, lines: usize) -> ScanResult<()> {
    write_sample_log_with(path, lines, &mut rand::rng())
}

/// Same as [`write_sample_log`] with a caller-supplied RNG
pub fn write_sample_log_with<R: Rng + ?Sized>(
    path: &Path,
    lines: usize,
    rng: &mut R,
) -> ScanResult<()> {
    info!("Generating {} lines into {}", lines, path.display());

    let file = File::create(path).map_err(|e| ScanError::from_open_error(path, e))?;
    let mut writer = BufWriter::new(file);
    for i in 0..lines {
        let message = SAMPLE_MESSAGES.choose(rng).copied().unwrap_or_default();
        writeln!(writer, "[{}] {}", i + 1, message)?;
    }
    writer.flush()?;
    Ok(())
}
