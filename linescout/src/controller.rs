use std::io::{BufRead, Write};
use std::thread;
use std::time::SystemTime;

use colored::{ColoredString, Colorize};
use rand::seq::IndexedRandom;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::counter::{CounterSnapshot, SharedCounter};
use crate::errors::{ScanError, ScanResult};
use crate::scan::{ScanHandle, ScanWorker};

const RULE_WIDTH: usize = 50;

const GREETINGS: &[&str] = &[
    "Have a great day!",
    "Hard work always pays off.",
    "Keep learning, you are doing great!",
    "Remember to take breaks while you code.",
    "Practice makes perfect.",
];

/// Commands accepted by the interactive menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ShowTime,
    ShowGreeting,
    ShowStatus,
    Sum,
    Exit,
}

impl Command {
    /// Parses a menu selection. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::ShowTime),
            "2" => Some(Self::ShowGreeting),
            "3" => Some(Self::ShowStatus),
            "4" => Some(Self::Sum),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Lifecycle of a controller session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Worker not yet launched
    Idle,
    /// Worker launched, menu accepting commands
    Running,
    /// Exit requested, waiting for the worker
    Draining,
    /// Final report produced
    Terminated,
}

/// Result printed when the session ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalReport {
    pub keyword: String,
    pub count: u64,
    /// False only if the worker never reached completion, which the join rules out
    pub done: bool,
}

/// Interactive command loop that launches the scan worker and reports on it.
///
/// The controller reads commands from `input` and writes everything it shows
/// to `output`, so a terminal, a pipe or an in-memory buffer all work.
pub struct Controller<R, W> {
    config: ScanConfig,
    counter: SharedCounter,
    input: R,
    output: W,
    state: ControllerState,
    use_color: bool,
}

impl<R: BufRead, W: Write> Controller<R, W> {
    pub fn new(config: ScanConfig, input: R, output: W) -> Self {
        Self {
            config,
            counter: SharedCounter::new(),
            input,
            output,
            state: ControllerState::Idle,
            use_color: false,
        }
    }

    /// Enables colored headings
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn counter(&self) -> &SharedCounter {
        &self.counter
    }

    fn transition(&mut self, next: ControllerState) {
        debug!("Controller state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Runs the whole session: launch, command loop, drain, final report.
    ///
    /// Worker failures never surface here; the report always uses whatever
    /// the shared counter holds once the worker is done. Errors come only
    /// from the controller's own input and output, and even then the worker
    /// is joined before the error is returned.
    pub fn run(&mut self) -> ScanResult<FinalReport> {
        if self.state != ControllerState::Idle {
            return Err(ScanError::controller_error(
                "a controller session can only be run once",
            ));
        }

        let handle = ScanWorker::new(&self.config, self.counter.clone()).spawn()?;
        self.transition(ControllerState::Running);

        let outcome = self.command_loop();
        if let Err(e) = &outcome {
            warn!("Command loop stopped early: {}", e);
        }

        let drained = self.drain(handle);
        let report = self.finish();
        outcome?;
        drained?;
        report
    }

    fn command_loop(&mut self) -> ScanResult<()> {
        loop {
            self.print_menu()?;
            let Some(selection) = self.prompt("Choose an option (1-5): ")? else {
                info!("Input closed, exiting");
                return Ok(());
            };

            match Command::parse(&selection) {
                Some(Command::Exit) => return Ok(()),
                Some(command) => self.execute(command)?,
                None => {
                    writeln!(self.output, "\nInvalid option. Please try again.\n")?;
                }
            }

            let pause = self.config.menu_pause();
            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }
    }

    fn execute(&mut self, command: Command) -> ScanResult<()> {
        match command {
            Command::ShowTime => self.show_time(),
            Command::ShowGreeting => self.show_greeting(),
            Command::ShowStatus => self.show_status(),
            Command::Sum => self.sum(),
            Command::Exit => Ok(()),
        }
    }

    fn show_time(&mut self) -> ScanResult<()> {
        let now = humantime::format_rfc3339_seconds(SystemTime::now());
        writeln!(self.output, "\nCurrent time: {}\n", now)?;
        Ok(())
    }

    fn show_greeting(&mut self) -> ScanResult<()> {
        let greeting = GREETINGS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or("Hello!");
        writeln!(self.output, "\n{}\n", greeting)?;
        Ok(())
    }

    fn show_status(&mut self) -> ScanResult<()> {
        let CounterSnapshot { count, done } = self.counter.read();
        if done {
            writeln!(
                self.output,
                "\nScan finished: {} lines contain '{}'.\n",
                count, self.config.keyword
            )?;
        } else {
            writeln!(
                self.output,
                "\nScan in progress... current count: {}\n",
                count
            )?;
        }
        Ok(())
    }

    fn sum(&mut self) -> ScanResult<()> {
        let first = self.prompt("Enter the first number: ")?;
        let second = match first {
            Some(_) => self.prompt("Enter the second number: ")?,
            None => None,
        };

        let parsed = first
            .zip(second)
            .and_then(|(a, b)| Some((a.parse::<f64>().ok()?, b.parse::<f64>().ok()?)));

        match parsed {
            Some((a, b)) => writeln!(self.output, "\n{} + {} = {}\n", a, b, a + b)?,
            None => writeln!(self.output, "\nError: please enter valid numbers.\n")?,
        }
        Ok(())
    }

    /// Joins the worker unless it already reported done. The join happens
    /// even when the notices cannot be written.
    fn drain(&mut self, handle: ScanHandle) -> ScanResult<()> {
        self.transition(ControllerState::Draining);
        let done = self.counter.read().done;
        debug!(
            "Draining: done={}, worker thread finished={}",
            done,
            handle.is_finished()
        );

        let notice = self.write_drain_notice(done);
        if done {
            debug!("Scan already complete, skipping join");
        } else {
            info!("Waiting for scan worker to finish");
            handle.join();
        }
        notice
    }

    fn write_drain_notice(&mut self, done: bool) -> ScanResult<()> {
        writeln!(self.output, "\nExiting...")?;
        if !done {
            writeln!(self.output, "Waiting for the scan worker to finish...\n")?;
        }
        self.output.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> ScanResult<FinalReport> {
        let CounterSnapshot { count, done } = self.counter.read();
        self.transition(ControllerState::Terminated);

        let rule = "=".repeat(RULE_WIDTH);
        let title = self.heading(&format!("{:^width$}", "FINAL RESULT", width = RULE_WIDTH));

        writeln!(self.output, "\n{}", rule)?;
        writeln!(self.output, "{}", title)?;
        writeln!(self.output, "{}", rule)?;
        writeln!(
            self.output,
            "Total lines containing '{}': {}",
            self.config.keyword, count
        )?;
        writeln!(self.output, "{}\n", rule)?;
        self.output.flush()?;

        Ok(FinalReport {
            keyword: self.config.keyword.clone(),
            count,
            done,
        })
    }

    fn print_menu(&mut self) -> ScanResult<()> {
        let rule = "=".repeat(RULE_WIDTH);
        let title = self.heading("MAIN MENU");
        writeln!(self.output, "\n{}", rule)?;
        writeln!(self.output, "{}", title)?;
        writeln!(self.output, "{}", rule)?;
        writeln!(self.output, "1. Show current time")?;
        writeln!(self.output, "2. Show a greeting")?;
        writeln!(self.output, "3. Show counter status")?;
        writeln!(self.output, "4. Add two numbers")?;
        writeln!(self.output, "5. Exit")?;
        writeln!(self.output, "{}", rule)?;
        Ok(())
    }

    fn heading(&self, text: &str) -> ColoredString {
        if self.use_color {
            text.bright_blue().bold()
        } else {
            text.normal()
        }
    }

    /// Writes `text`, then reads one trimmed line. `None` means end of input.
    ///
    /// Bytes that are not UTF-8 become replacement characters, so they parse
    /// as an invalid selection instead of ending the session.
    fn prompt(&mut self, text: &str) -> ScanResult<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }
}
