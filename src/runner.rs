//! Sequential execution of test bodies and suite-level reporting.
//!
//! The runner's contract with the recorder is narrow: invoke bodies one at a
//! time, read the final status and message back after each body returns,
//! aggregate pass/fail/skip counts, and reset the recorder before the next
//! body. Everything else (enumeration, filtering, parameters, retries,
//! parallelism, timing) belongs to whatever embeds this crate.

use crate::check::{Check, TestContext};
use crate::outcome::{Outcome, Status};
use crate::report::{render_outcome, DiagnosticSink, ReportConfig, StderrSink};
use crate::report::{GREEN, RED, YELLOW};

/// Signature of a test body: runs against one context, exits early through
/// `?` on the first unsatisfied check.
pub type TestBody = fn(&mut TestContext) -> Check;

/// A named test body awaiting execution.
#[derive(Debug, Clone, Copy)]
pub struct TestCase {
    pub name: &'static str,
    pub body: TestBody,
}

impl TestCase {
    pub const fn new(name: &'static str, body: TestBody) -> Self {
        Self { name, body }
    }
}

/// What one body invocation left behind: its name and the full recorded
/// outcome, read back after the body returned.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub name: &'static str,
    pub outcome: Outcome,
}

impl CaseReport {
    pub fn status(&self) -> Status {
        self.outcome.status()
    }
}

/// Aggregated counts for one suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Count reports by final status.
pub fn summarize(reports: &[CaseReport]) -> Summary {
    let passed = reports
        .iter()
        .filter(|r| r.status() == Status::Passed)
        .count();
    let failed = reports
        .iter()
        .filter(|r| r.status() == Status::Failed)
        .count();
    let skipped = reports
        .iter()
        .filter(|r| r.status() == Status::Skipped)
        .count();
    Summary {
        passed,
        failed,
        skipped,
    }
}

/// Run a single body against `ctx` and read the outcome back.
///
/// The context is reset first, so a recorder reused across bodies starts
/// every invocation clean. The body's `Err` return is deliberately dropped:
/// it only signals the early exit, and the record it corresponds to is
/// already in the outcome.
pub fn run_case(case: &TestCase, ctx: &mut TestContext) -> CaseReport {
    ctx.reset();
    let _ = (case.body)(ctx);
    ctx.finish();
    CaseReport {
        name: case.name,
        outcome: ctx.outcome().clone(),
    }
}

/// Execute every case in order against one shared context, report each
/// result into `sink`, and return the aggregated counts.
pub fn run_suite(
    cases: &[TestCase],
    config: &ReportConfig,
    sink: &mut dyn DiagnosticSink,
) -> Summary {
    let mut ctx = TestContext::new();
    let reports: Vec<CaseReport> = cases.iter().map(|case| run_case(case, &mut ctx)).collect();
    report_results(&reports, config, sink);
    summarize(&reports)
}

/// [`run_suite`] with default configuration and stderr output.
pub fn run_suite_with_defaults(cases: &[TestCase]) -> Summary {
    let config = ReportConfig::default();
    let mut sink = StderrSink;
    run_suite(cases, &config, &mut sink)
}

/// Emit one line per case plus the suite summary line.
///
/// Failed and skipped cases additionally carry their rendered diagnostic,
/// indented under the case line.
pub fn report_results(reports: &[CaseReport], config: &ReportConfig, sink: &mut dyn DiagnosticSink) {
    for report in reports {
        match report.status() {
            Status::Passed => {
                sink.emit(&format!("{}: {}", config.colorize("PASS", GREEN), report.name));
            }
            Status::Failed => {
                sink.emit(&format!("{}: {}", config.colorize("FAIL", RED), report.name));
                for line in render_outcome(&report.outcome) {
                    sink.emit(&format!("  {}", line));
                }
            }
            Status::Skipped => {
                sink.emit(&format!("{}: {}", config.colorize("SKIP", YELLOW), report.name));
                for line in render_outcome(&report.outcome) {
                    sink.emit(&format!("  {}", line));
                }
            }
            // run_case promotes every body to a terminal state or Passed.
            Status::Running => {}
        }
    }

    let summary = summarize(reports);
    sink.emit("");
    sink.emit(&format!(
        "Suite summary: total {}, {} {}, {} {}, {} {}",
        summary.total(),
        config.colorize("passed", GREEN),
        summary.passed,
        config.colorize("failed", RED),
        summary.failed,
        config.colorize("skipped", YELLOW),
        summary.skipped,
    ));
}
