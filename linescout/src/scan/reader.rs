use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{trace, warn};

use crate::config::EncodingMode;
use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanMetrics;

const BUFFER_CAPACITY: usize = 65536;
pub(crate) const SMALL_FILE_THRESHOLD: u64 = 32 * 1024; // 32KB
pub(crate) const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// Decodes file bytes according to the encoding mode
fn decode_bytes(bytes: &[u8], path: &Path, encoding_mode: EncodingMode) -> ScanResult<String> {
    match encoding_mode {
        EncodingMode::FailFast => {
            String::from_utf8(bytes.to_vec()).map_err(|e| ScanError::encoding_error(path, e))
        }
        EncodingMode::Lossy => {
            let cow = String::from_utf8_lossy(bytes);
            if let std::borrow::Cow::Owned(_) = cow {
                warn!("Invalid UTF-8 replaced in file: {}", path.display());
            }
            Ok(cow.into_owned())
        }
    }
}

fn open(path: &Path) -> ScanResult<File> {
    File::open(path).map_err(|e| ScanError::from_open_error(path, e))
}

fn read_small(path: &Path) -> ScanResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| ScanError::from_open_error(path, e))
}

fn read_buffered(path: &Path) -> ScanResult<Vec<u8>> {
    let file = open(path)?;
    let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn read_mmap(path: &Path, encoding_mode: EncodingMode) -> ScanResult<String> {
    let file = open(path)?;
    // The mapping is read-only and dropped before this function returns.
    let mmap = unsafe { Mmap::map(&file) }?;
    decode_bytes(&mmap, path, encoding_mode)
}

/// Reads and decodes a whole file, picking a strategy by file size
pub fn read_to_string(
    path: &Path,
    encoding_mode: EncodingMode,
    metrics: &ScanMetrics,
) -> ScanResult<String> {
    trace!("Reading file: {}", path.display());

    let size = match path.metadata() {
        Ok(metadata) => metadata.len(),
        Err(e) => return Err(ScanError::from_open_error(path, e)),
    };
    metrics.record_file_read(size);

    if size < SMALL_FILE_THRESHOLD {
        let bytes = read_small(path)?;
        decode_bytes(&bytes, path, encoding_mode)
    } else if size >= LARGE_FILE_THRESHOLD {
        read_mmap(path, encoding_mode)
    } else {
        let bytes = read_buffered(path)?;
        decode_bytes(&bytes, path, encoding_mode)
    }
}

/// Splits decoded contents into lines.
///
/// `\n`, `\r\n` and a lone `\r` each end a line. Terminators are not part
/// of the yielded lines, and a final line without a terminator is still
/// yielded.
pub fn split_lines(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .split_terminator('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}
