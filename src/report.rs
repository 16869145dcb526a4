//! Rendering recorded outcomes for human inspection.
//!
//! The diagnostic sink is a line-oriented text consumer. The runner renders a
//! terminal outcome into at most a handful of lines (classification plus
//! expression text, location, operand values) and hands them to whichever
//! sink the embedder chose: stderr for interactive runs, an in-memory buffer
//! for tests and programmatic capture, or a color-capable terminal stream.
//!
//! [`CaseDiagnostic`] is the same information shaped as a `miette` diagnostic
//! so embedding applications can fold check failures into their own error
//! reports; the sink path stays plain text.

use std::io::Write;

use miette::Diagnostic;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use thiserror::Error;

use crate::outcome::{Location, Outcome, Status};

// ============================================================================
// DIAGNOSTIC SINKS
// ============================================================================

/// Line-oriented consumer of rendered diagnostics.
///
/// Invoked at most once per test-body termination, with the lines of that
/// body's report.
pub trait DiagnosticSink {
    fn emit(&mut self, line: &str);
}

/// Collects lines into a `String` for testing or programmatic capture.
pub struct BufferSink {
    pub buffer: String,
}

impl BufferSink {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for BufferSink {
    fn emit(&mut self, line: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(line);
    }
}

/// Writes lines to stderr for plain interactive runs.
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn emit(&mut self, line: &str) {
        eprintln!("{}", line);
    }
}

/// Writes lines to a color-capable stderr stream, highlighting the
/// classification line of each report.
pub struct TerminalSink {
    stream: StandardStream,
}

impl TerminalSink {
    pub fn stderr() -> Self {
        Self {
            stream: StandardStream::stderr(ColorChoice::Auto),
        }
    }
}

impl DiagnosticSink for TerminalSink {
    fn emit(&mut self, line: &str) {
        // Classification lines start a report; continuation lines are
        // indented and stay uncolored.
        let color = if line.starts_with("check failed") {
            Some(Color::Red)
        } else if line.starts_with("check skipped") {
            Some(Color::Yellow)
        } else {
            None
        };
        if let Some(color) = color {
            let _ = self
                .stream
                .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        }
        let _ = writeln!(self.stream, "{}", line);
        let _ = self.stream.reset();
    }
}

// ============================================================================
// REPORT CONFIGURATION
// ============================================================================

// Color constants for terminal output
pub(crate) const RESET: &str = "\x1b[0m";
pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const GREEN: &str = "\x1b[32m";
pub(crate) const YELLOW: &str = "\x1b[33m";

/// Configuration for suite reporting.
pub struct ReportConfig {
    pub use_colors: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
        }
    }
}

impl ReportConfig {
    /// Apply color formatting to text if colors are enabled.
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// OUTCOME RENDERING
// ============================================================================

/// Render a terminal outcome as report lines.
///
/// A running or passed outcome renders as no lines at all; failures and
/// skips render the classification with the expression text, then the
/// location, then both operands when the check had them.
pub fn render_outcome(outcome: &Outcome) -> Vec<String> {
    let mut lines = Vec::new();
    let label = match outcome.status() {
        Status::Failed => "check failed",
        Status::Skipped => "check skipped",
        Status::Running | Status::Passed => return lines,
    };
    if let Some(text) = outcome.text() {
        lines.push(format!("{}: {}", label, text));
    }
    if let Some(location) = outcome.location() {
        lines.push(format!("  at {}", location));
    }
    if let Some(values) = outcome.values() {
        lines.push(format!("  {}", values.lhs_line()));
        lines.push(format!("  {}", values.rhs_line()));
    }
    lines
}

/// Render `outcome` and hand each line to `sink`. A non-terminal outcome
/// emits nothing.
pub fn emit_outcome(outcome: &Outcome, sink: &mut dyn DiagnosticSink) {
    for line in render_outcome(outcome) {
        sink.emit(&line);
    }
}

// ============================================================================
// MIETTE DIAGNOSTIC
// ============================================================================

/// A terminal outcome shaped as a `miette` diagnostic.
///
/// Failures report at error severity, skips at warning severity, so an
/// embedding application's reporter sorts them the way the summary does.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum CaseDiagnostic {
    #[error("check failed: {text} at {location}")]
    #[diagnostic(code(verdict::check::failed), severity(Error))]
    Failed {
        text: &'static str,
        location: Location,
        #[help]
        operands: Option<String>,
    },

    #[error("check skipped: {text} at {location}")]
    #[diagnostic(code(verdict::check::skipped), severity(Warning))]
    Skipped {
        text: &'static str,
        location: Location,
    },
}

impl CaseDiagnostic {
    /// Build a diagnostic from a terminal outcome; `None` for a body that is
    /// still running or passed.
    pub fn from_outcome(outcome: &Outcome) -> Option<Self> {
        let text = outcome.text()?;
        let location = outcome.location()?;
        match outcome.status() {
            Status::Failed => Some(CaseDiagnostic::Failed {
                text,
                location,
                operands: outcome
                    .values()
                    .map(|v| format!("{}\n{}", v.lhs_line(), v.rhs_line())),
            }),
            Status::Skipped => Some(CaseDiagnostic::Skipped { text, location }),
            Status::Running | Status::Passed => None,
        }
    }
}

// ============================================================================
// FATAL INVARIANT GUARD
// ============================================================================

/// Line printed by [`enforce!`](crate::enforce) before the process
/// terminates.
pub fn fatal_line(text: &str, location: Location) -> String {
    format!("Assertion Failed at {} - {}", location, text)
}

/// Guard for invariants of the harness itself, as opposed to properties of
/// the code under test.
///
/// A violated invariant means outcome records can no longer be trusted, so
/// this prints one line to stderr and terminates the process instead of
/// recording anything.
#[macro_export]
macro_rules! enforce {
    ($cond:expr) => {
        if !$cond {
            eprintln!(
                "{}",
                $crate::report::fatal_line(
                    stringify!($cond),
                    $crate::Location::new(file!(), line!()),
                )
            );
            ::std::process::exit(1);
        }
    };
}
