use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{ScanError, ScanResult};

/// Configuration for a scan session.
///
/// # Configuration Locations
///
/// The configuration is assembled from these sources, later ones overriding earlier ones:
/// 1. Global `$HOME/.config/linescout/config.yaml`
/// 2. Local `.linescout.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// Command-line flags are applied last through [`ScanConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # File to scan
/// file_path: "log_grande.txt"
///
/// # Substring to count (case-sensitive)
/// keyword: "ERROR"
///
/// # Emit a progress notice every N lines
/// progress_interval: 1000
///
/// # Artificial per-line processing cost in milliseconds (0 disables it)
/// line_delay_ms: 1
///
/// # Pause after each menu command in milliseconds (0 disables it)
/// menu_pause_ms: 500
///
/// # How to treat invalid UTF-8 (failfast, lossy)
/// encoding_mode: "failfast"
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Path of the text file to scan
    pub file_path: PathBuf,

    /// Keyword counted as a case-sensitive substring of each line
    pub keyword: String,

    /// Number of lines between two progress notices
    pub progress_interval: usize,

    /// Per-line delay in milliseconds
    pub line_delay_ms: u64,

    /// Pause after each menu command in milliseconds
    pub menu_pause_ms: u64,

    /// How invalid UTF-8 in the scanned file is handled
    pub encoding_mode: EncodingMode,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Handling of byte sequences that are not valid UTF-8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    /// Invalid UTF-8 fails the scan
    #[default]
    FailFast,
    /// Invalid sequences are replaced with U+FFFD
    Lossy,
}

impl std::str::FromStr for EncodingMode {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "failfast" => Ok(Self::FailFast),
            "lossy" => Ok(Self::Lossy),
            other => Err(ScanError::config_error(format!(
                "unknown encoding mode '{}' (expected failfast or lossy)",
                other
            ))),
        }
    }
}

pub const DEFAULT_KEYWORD: &str = "ERROR";
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("scan.log"),
            keyword: DEFAULT_KEYWORD.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            line_delay_ms: 1,
            menu_pause_ms: 500,
            encoding_mode: EncodingMode::FailFast,
            log_level: "info".to_string(),
        }
    }
}

/// Values supplied on the command line. `None` leaves the file value untouched.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub file_path: Option<PathBuf>,
    pub keyword: Option<String>,
    pub progress_interval: Option<usize>,
    pub line_delay_ms: Option<u64>,
    pub menu_pause_ms: Option<u64>,
    pub encoding_mode: Option<EncodingMode>,
    pub log_level: Option<String>,
}

impl ScanConfig {
    /// Creates a configuration for scanning `file_path` for `keyword`
    pub fn new(file_path: impl Into<PathBuf>, keyword: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            keyword: keyword.into(),
            ..Default::default()
        }
    }

    /// Builder method to set the per-line delay
    pub fn with_line_delay_ms(mut self, millis: u64) -> Self {
        self.line_delay_ms = millis;
        self
    }

    /// Builder method to set the progress interval
    pub fn with_progress_interval(mut self, lines: usize) -> Self {
        self.progress_interval = lines;
        self
    }

    /// Builder method to set the pause after each menu command
    pub fn with_menu_pause_ms(mut self, millis: u64) -> Self {
        self.menu_pause_ms = millis;
        self
    }

    /// Builder method to set the encoding mode
    pub fn with_encoding_mode(mut self, mode: EncodingMode) -> Self {
        self.encoding_mode = mode;
        self
    }

    pub fn line_delay(&self) -> Duration {
        Duration::from_millis(self.line_delay_ms)
    }

    pub fn menu_pause(&self) -> Duration {
        Duration::from_millis(self.menu_pause_ms)
    }

    /// Loads configuration from the default locations plus an explicit file.
    /// The explicit file must exist.
    pub fn load_from(config_path: Option<&Path>) -> ScanResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let default_files = [
            dirs::config_dir().map(|p| p.join("linescout/config.yaml")),
            Some(PathBuf::from(".linescout.yaml")),
        ];

        for path in default_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        let config: ScanConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(path) = cli.file_path {
            self.file_path = path;
        }
        if let Some(keyword) = cli.keyword {
            self.keyword = keyword;
        }
        if let Some(interval) = cli.progress_interval {
            self.progress_interval = interval;
        }
        if let Some(delay) = cli.line_delay_ms {
            self.line_delay_ms = delay;
        }
        if let Some(pause) = cli.menu_pause_ms {
            self.menu_pause_ms = pause;
        }
        if let Some(mode) = cli.encoding_mode {
            self.encoding_mode = mode;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Checks values that deserialization alone cannot reject
    pub fn validate(&self) -> ScanResult<()> {
        if self.keyword.is_empty() {
            return Err(ScanError::config_error("keyword must not be empty"));
        }
        if self.progress_interval == 0 {
            return Err(ScanError::config_error(
                "progress_interval must be at least 1",
            ));
        }
        Ok(())
    }
}
