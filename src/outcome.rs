//! Outcome recording for a single test body.
//!
//! One [`Outcome`] belongs to exactly one test body invocation at a time.
//! Assertions write into it at the moment they fail or skip; the runner reads
//! it back after the body has returned and resets it (or builds a fresh one)
//! before the next body. Nothing in here locks: sequential ownership is the
//! contract, and a parallel runner must give every worker its own recorder.
//!
//! A terminal record is write-once. The first failure or skip wins and later
//! calls leave the stored diagnostic untouched, so a misbehaving body that
//! keeps asserting after its first failure cannot rewrite history.

use std::fmt;

use crate::compare::ValuePair;

// ============================================================================
// STATUS
// ============================================================================

/// Lifecycle state of one test body invocation.
///
/// `Running` is the initial state. `Passed` is only ever set by [`Outcome::finish`]
/// when the body reached its natural end. `Failed` and `Skipped` are terminal:
/// once either is recorded the status never changes until [`Outcome::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The body is executing and nothing has gone wrong yet.
    Running,
    /// The body reached its natural end with every assertion holding.
    Passed,
    /// An assertion was false; the body exited at that assertion.
    Failed,
    /// A precondition for running the body at all was unavailable.
    Skipped,
}

impl Status {
    /// True for `Failed` and `Skipped`, the two states that end a body early.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Failed | Status::Skipped)
    }

    /// Short uppercase label used in report lines.
    pub fn label(self) -> &'static str {
        match self {
            Status::Running => "RUNNING",
            Status::Passed => "PASS",
            Status::Failed => "FAIL",
            Status::Skipped => "SKIP",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// LOCATION
// ============================================================================

/// Source position captured at an assertion site via `file!()` and `line!()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

impl Location {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

// ============================================================================
// OUTCOME RECORDER
// ============================================================================

/// Recorder for the test body currently being executed.
///
/// Stores the classification plus the diagnostic triple of the first failing
/// or skipping assertion: the checked expression's text, where it sits, and
/// (for comparison assertions) both operand values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    status: Status,
    text: Option<&'static str>,
    location: Option<Location>,
    values: Option<ValuePair>,
}

impl Outcome {
    /// A fresh recorder in the `Running` state with no diagnostic.
    pub fn new() -> Self {
        Self {
            status: Status::Running,
            text: None,
            location: None,
            values: None,
        }
    }

    /// Classify the current body as failed and store the diagnostic triple.
    ///
    /// The caller is responsible for exiting the body immediately afterwards;
    /// recording alone does not transfer control.
    pub fn record_failure(&mut self, text: &'static str, location: Location) {
        self.record(Status::Failed, text, location, None);
    }

    /// Like [`Outcome::record_failure`], additionally storing both operands
    /// of the comparison that failed.
    pub fn record_failure_values(
        &mut self,
        text: &'static str,
        location: Location,
        values: ValuePair,
    ) {
        self.record(Status::Failed, text, location, Some(values));
    }

    /// Classify the current body as skipped and store the diagnostic triple.
    pub fn record_skip(&mut self, text: &'static str, location: Location) {
        self.record(Status::Skipped, text, location, None);
    }

    /// Promote `Running` to `Passed` when the body reached its natural end.
    ///
    /// A terminal status is left alone, so a body that failed but returned
    /// normally anyway still reads back as failed.
    pub fn finish(&mut self) {
        if self.status == Status::Running {
            self.status = Status::Passed;
        }
    }

    /// Return to the initial `Running` state, clearing any diagnostic.
    ///
    /// Runners call this between body invocations when they reuse a recorder.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Text of the expression whose check ended the body, if any.
    pub fn text(&self) -> Option<&'static str> {
        self.text
    }

    /// Where that expression sits in the test source, if recorded.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Both operands of the failed comparison, when the assertion had them.
    pub fn values(&self) -> Option<&ValuePair> {
        self.values.as_ref()
    }

    // Keep the first terminal record; later calls must not rewrite an
    // earlier diagnostic.
    fn record(
        &mut self,
        status: Status,
        text: &'static str,
        location: Location,
        values: Option<ValuePair>,
    ) {
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        self.text = Some(text);
        self.location = Some(location);
        self.values = values;
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::new()
    }
}
