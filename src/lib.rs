pub use crate::buffer::{Allocator, BufferMismatch, DenyAllocator, ScopedBuffer, SystemAllocator};
pub use crate::check::{Check, Interrupt, TestContext};
pub use crate::compare::ValuePair;
pub use crate::outcome::{Location, Outcome, Status};
pub use crate::report::{
    emit_outcome, render_outcome, BufferSink, CaseDiagnostic, DiagnosticSink, ReportConfig,
    StderrSink, TerminalSink,
};
pub use crate::runner::{
    report_results, run_case, run_suite, run_suite_with_defaults, summarize, CaseReport, Summary,
    TestBody, TestCase,
};

pub mod buffer;
pub mod check;
pub mod compare;
pub mod outcome;
pub mod report;
pub mod runner;
