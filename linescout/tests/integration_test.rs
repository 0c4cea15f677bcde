use anyhow::Result;
use linescout::sample::write_sample_log;
use linescout::{Controller, CounterSnapshot, ScanConfig, ScanWorker, SharedCounter};
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

// Independent ground truth: no shared code with the scanner.
fn naive_count(path: &Path, keyword: &str) -> Result<u64> {
    let contents = fs::read_to_string(path)?;
    let mut count = 0;
    for line in contents.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.find(keyword).is_some() {
            count += 1;
        }
    }
    Ok(count)
}

fn fast_config(path: &Path, keyword: &str) -> ScanConfig {
    ScanConfig::new(path, keyword)
        .with_line_delay_ms(0)
        .with_menu_pause_ms(0)
}

fn scan(config: &ScanConfig) -> Result<CounterSnapshot> {
    let counter = SharedCounter::new();
    let handle = ScanWorker::new(config, counter.clone()).spawn()?;
    Ok(handle.join())
}

fn run_controller(config: ScanConfig, input: &str) -> Result<(u64, String)> {
    let mut output = Vec::new();
    let mut controller = Controller::new(config, Cursor::new(input.to_string()), &mut output);
    let report = controller.run()?;
    drop(controller);
    Ok((report.count, String::from_utf8(output)?))
}

#[test]
fn test_count_matches_naive_scan() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("generated.log");
    write_sample_log(&path, 5000)?;

    for keyword in ["ERROR", "INFO", "WARNING", "DEBUG", "denied", "]"] {
        let snapshot = scan(&fast_config(&path, keyword))?;
        assert!(snapshot.done);
        assert_eq!(
            snapshot.count,
            naive_count(&path, keyword)?,
            "keyword {}",
            keyword
        );
    }
    Ok(())
}

#[test]
fn test_crlf_and_missing_trailing_newline() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("crlf.log");
    fs::write(&path, "ERROR one\r\nINFO two\r\nERROR three")?;

    let snapshot = scan(&fast_config(&path, "ERROR"))?;
    assert_eq!(snapshot.count, 2);
    assert_eq!(snapshot.count, naive_count(&path, "ERROR")?);
    Ok(())
}

#[test]
fn test_large_file_uses_full_contents() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("large.log");
    let mut file = File::create(&path)?;
    // Past the small-file threshold, so the buffered read path is used.
    for i in 0..40_000 {
        if i % 4 == 0 {
            writeln!(file, "[{}] ERROR: Request timed out", i)?;
        } else {
            writeln!(file, "[{}] INFO: Operation completed successfully", i)?;
        }
    }
    drop(file);

    let snapshot = scan(&fast_config(&path, "ERROR"))?;
    assert_eq!(snapshot.count, 10_000);
    Ok(())
}

#[test]
fn test_concurrent_readers_never_see_torn_state() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("slow.log");
    let content: String = (0..400)
        .map(|i| {
            if i % 2 == 0 {
                format!("[{}] ERROR\n", i)
            } else {
                format!("[{}] INFO\n", i)
            }
        })
        .collect();
    fs::write(&path, content)?;
    let expected = 200;

    let counter = SharedCounter::new();
    let config = ScanConfig::new(&path, "ERROR").with_line_delay_ms(1);
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let counter = counter.clone();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut seen_done = false;
                let mut last_count = 0;
                while !stop.load(Ordering::Relaxed) {
                    let snapshot = counter.read();
                    // done is one-way
                    assert!(!(seen_done && !snapshot.done));
                    // count never goes backwards
                    assert!(snapshot.count >= last_count);
                    if snapshot.done {
                        assert_eq!(snapshot.count, expected);
                        seen_done = true;
                    } else {
                        // single publication: nothing visible before completion
                        assert_eq!(snapshot.count, 0);
                    }
                    last_count = snapshot.count;
                }
            })
        })
        .collect();

    let handle = ScanWorker::new(&config, counter.clone()).spawn()?;
    let snapshot = handle.join();
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }
    assert_eq!(
        snapshot,
        CounterSnapshot {
            count: expected,
            done: true
        }
    );
    Ok(())
}

#[test]
fn test_exit_waits_for_slow_scan() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("slow.log");
    let content: String = (0..500).map(|i| format!("[{}] ERROR: slow\n", i)).collect();
    fs::write(&path, content)?;

    let config = ScanConfig::new(&path, "ERROR")
        .with_line_delay_ms(1)
        .with_menu_pause_ms(0);
    let (count, output) = run_controller(config, "5\n")?;

    assert_eq!(count, 500);
    assert!(output.contains("Waiting for the scan worker to finish"));
    assert!(output.contains("Total lines containing 'ERROR': 500"));
    Ok(())
}

#[test]
fn test_missing_file_reports_zero() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("does-not-exist.log");

    let snapshot = scan(&fast_config(&path, "ERROR"))?;
    assert_eq!(
        snapshot,
        CounterSnapshot {
            count: 0,
            done: true
        }
    );

    let (count, output) = run_controller(fast_config(&path, "ERROR"), "3\n5\n")?;
    assert_eq!(count, 0);
    assert!(output.contains("Total lines containing 'ERROR': 0"));
    Ok(())
}

#[test]
fn test_read_idempotent_after_completion() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("app.log");
    fs::write(&path, "ERROR\nINFO\nERROR\n")?;

    let counter = SharedCounter::new();
    ScanWorker::new(&fast_config(&path, "ERROR"), counter.clone())
        .spawn()?
        .join();

    let first = counter.read();
    for _ in 0..10 {
        assert_eq!(counter.read(), first);
    }
    assert_eq!(first.count, 2);
    Ok(())
}

#[test]
fn test_ten_lines_three_errors() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("ten.log");
    let lines = [
        "[1] INFO: System started successfully",
        "[2] ERROR: Could not connect to the database",
        "[3] WARNING: Available memory is low",
        "[4] INFO: User authenticated",
        "[5] ERROR: Request timed out",
        "[6] DEBUG: Processing request",
        "[7] INFO: Operation completed successfully",
        "[8] WARNING: SSL certificate about to expire",
        "[9] ERROR: Permission denied",
        "[10] INFO: User authenticated",
    ];
    fs::write(&path, lines.join("\n") + "\n")?;

    let (count, output) = run_controller(fast_config(&path, "ERROR"), "5\n")?;
    assert_eq!(count, 3);
    assert!(output.contains("Total lines containing 'ERROR': 3"));
    Ok(())
}

#[test]
fn test_empty_file_reports_zero() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("empty.log");
    fs::write(&path, "")?;

    let (count, _) = run_controller(fast_config(&path, "ERROR"), "5\n")?;
    assert_eq!(count, 0);
    Ok(())
}

#[test]
fn test_absent_keyword_reports_zero() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("clean.log");
    fs::write(&path, "INFO: fine\nDEBUG: fine\nWARNING: fine\n")?;

    let (count, _) = run_controller(fast_config(&path, "ERROR"), "5\n")?;
    assert_eq!(count, 0);
    Ok(())
}
