use clap::Parser;
use colored::Colorize;
use linescout::{
    config::{CliOverrides, EncodingMode, ScanConfig},
    sample::write_sample_log,
    Controller, ScanError,
};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, ScanError>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to scan
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Keyword to count (case-sensitive substring)
    #[arg(short = 'k', long)]
    keyword: Option<String>,

    /// Write a sample log with this many lines to the scan file first
    #[arg(short = 'g', long, value_name = "LINES")]
    generate: Option<usize>,

    /// Emit a progress notice every N lines
    #[arg(long, value_name = "N")]
    progress_every: Option<usize>,

    /// Artificial per-line delay in milliseconds (0 disables it)
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Pause after each menu command in milliseconds (0 disables it)
    #[arg(long, value_name = "MS")]
    pause_ms: Option<u64>,

    /// How to handle invalid UTF-8 sequences (failfast|lossy)
    #[arg(long)]
    encoding: Option<String>,

    /// Configuration file (YAML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let encoding_mode = cli
        .encoding
        .as_deref()
        .map(str::parse::<EncodingMode>)
        .transpose()?;

    let config = ScanConfig::load_from(cli.config.as_deref())?.merge_with_cli(CliOverrides {
        file_path: cli.file,
        keyword: cli.keyword,
        progress_interval: cli.progress_every,
        line_delay_ms: cli.delay_ms,
        menu_pause_ms: cli.pause_ms,
        encoding_mode,
        log_level: cli.log_level,
    });
    config.validate()?;

    init_tracing(&config.log_level, !cli.no_color);
    if cli.no_color {
        colored::control::set_override(false);
    }
    debug!("Effective configuration: {:?}", config);

    if let Some(lines) = cli.generate {
        write_sample_log(&config.file_path, lines)?;
        info!("Sample log written to {}", config.file_path.display());
    }

    print_banner(&config);

    let mut controller = Controller::new(config, io::stdin().lock(), io::stdout().lock())
        .with_color(!cli.no_color);
    controller.run()?;
    drop(controller);

    println!("Done. Goodbye!");
    Ok(())
}

fn init_tracing(level: &str, use_ansi: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(use_ansi)
        .with_target(false)
        .init();
}

fn print_banner(config: &ScanConfig) {
    let title = format!("{:^50}", "LINESCOUT: CONCURRENT KEYWORD COUNTER");
    println!("\n{}", title.bold());
    println!("{}", "=".repeat(50));
    println!(
        "Scanning {} for '{}' in the background.",
        config.file_path.display().to_string().blue(),
        config.keyword.green()
    );
}
