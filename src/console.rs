// src/console.rs

//! User-facing status output.
//!
//! These are the messages a person watching the update reads (start and
//! restart notices, apt's own output, final timings). Diagnostics go through
//! `tracing` on stderr instead.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use owo_colors::{OwoColorize, Style};

/// `DD/MM/YYYY, HH:MM:SS`
pub const DATED_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";
/// `HH:MM:SS`
pub const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Named styles used for console messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Error,
    Notice,
    Success,
    Emphasis,
}

impl Tone {
    fn palette(self) -> Style {
        match self {
            Tone::Plain => Style::new(),
            Tone::Error => Style::new().bold().red(),
            Tone::Notice => Style::new().yellow(),
            Tone::Success => Style::new().bold().green(),
            Tone::Emphasis => Style::new().bold().underline().white(),
        }
    }
}

/// Shared writer a console can be pointed at instead of stdout.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

#[derive(Clone)]
enum Sink {
    Stdout,
    Quiet,
    Writer(SharedWriter),
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => f.write_str("Stdout"),
            Sink::Quiet => f.write_str("Quiet"),
            Sink::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Cheap, cloneable handle for printing themed messages.
#[derive(Debug, Clone)]
pub struct Console {
    color: bool,
    sink: Sink,
}

impl Console {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            sink: Sink::Stdout,
        }
    }

    /// A console that prints nothing.
    pub fn quiet() -> Self {
        Self {
            color: false,
            sink: Sink::Quiet,
        }
    }

    /// Uncoloured console writing every line to `writer`.
    pub fn with_writer(writer: SharedWriter) -> Self {
        Self {
            color: false,
            sink: Sink::Writer(writer),
        }
    }

    pub fn print(&self, message: &str, tone: Tone) {
        self.emit(&self.paint(message, tone));
    }

    fn emit(&self, line: &str) {
        match &self.sink {
            Sink::Stdout => println!("{line}"),
            Sink::Quiet => {}
            Sink::Writer(writer) => {
                // A broken status sink must never stop the update itself.
                if let Ok(mut w) = writer.lock() {
                    let _ = writeln!(w, "{line}");
                }
            }
        }
    }

    pub fn paint(&self, message: &str, tone: Tone) -> String {
        if self.color {
            message.style(tone.palette()).to_string()
        } else {
            message.to_string()
        }
    }

    /// `HH:MM:SS - <problem>` used for probe tiers and dropped connections.
    pub fn print_timestamped_problem(&self, problem: &str) {
        let stamp = clock_stamp(Local::now());
        self.emit(&format!(
            "{} - {}",
            self.paint(&stamp, Tone::Notice),
            self.paint(problem, Tone::Error)
        ));
    }

    /// Echo the captured output of one attempt.
    pub fn print_attempt_output(&self, stdout: &str, stderr: &str) {
        if !stdout.is_empty() {
            self.print("\nDetails:\n", Tone::Plain);
            self.print(stdout, Tone::Plain);
        }
        if !stderr.is_empty() {
            self.print("\nErrors:\n", Tone::Error);
            self.print(stderr, Tone::Error);
        }
    }

    pub fn print_dated(&self, label: &str, tone: Tone) {
        self.print(&dated_message(label, Local::now()), tone);
    }

    pub fn print_elapsed(&self, elapsed: Duration) {
        let rendered = self.paint(&format_elapsed(elapsed), Tone::Emphasis);
        self.emit(&format!("Total time spent on process: {rendered}"));
    }
}

pub fn dated_message(label: &str, at: DateTime<Local>) -> String {
    format!("\n\n{label}: {}", at.format(DATED_FORMAT))
}

pub fn clock_stamp(at: DateTime<Local>) -> String {
    at.format(CLOCK_FORMAT).to_string()
}

/// Render as `H:MM:SS`; hours are not padded and may exceed 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}
