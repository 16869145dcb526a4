//! The assertion surface: [`TestContext`], [`Interrupt`], and the check macros.
//!
//! A test body is any function or closure of shape
//! `FnOnce(&mut TestContext) -> Check`. Inside it, assertions are macro
//! invocations that evaluate a predicate, record into the context's
//! [`Outcome`] on failure or skip, and exit the body with `?`. Control
//! therefore leaves the body at the first unsatisfied check, and the end of
//! the body's scope is the single cleanup point: everything the body owns,
//! [`ScopedBuffer`]s included, is dropped on every exit path.
//!
//! The macros capture the checked expression's text with `stringify!` and the
//! call site with `file!()`/`line!()`, then delegate to a context method that
//! does the recording. Comparison macros widen their operands at the call
//! site, `as u64` for equality and unsigned ordering, `as i64` for signed
//! ordering; picking the right variant for the operands' signedness is the
//! caller's job. Operand expressions may be evaluated more than once, so
//! they must not have side effects.

use thiserror::Error;

use crate::buffer::{self, Allocator, BufferMismatch, ScopedBuffer, SystemAllocator};
use crate::compare::{self, ValuePair};
use crate::outcome::{Location, Outcome};

/// Result type of a test body and of every assertion method.
pub type Check = Result<(), Interrupt>;

/// Control-flow signal that ends a test body early.
///
/// Carries no data: by the time an assertion produces one, the diagnostic is
/// already recorded in the context. It exists so `?` can unwind the body to
/// its cleanup point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("test body interrupted")]
pub struct Interrupt;

// ============================================================================
// TEST CONTEXT
// ============================================================================

/// Per-invocation state handed to a test body: one outcome recorder plus the
/// allocator behind allocation assertions.
///
/// A context belongs to one body invocation at a time. Runners either build
/// a fresh context per body or call [`TestContext::reset`] in between; the
/// protocol never shares one across concurrent bodies.
pub struct TestContext {
    outcome: Outcome,
    allocator: Box<dyn Allocator>,
}

impl TestContext {
    /// A fresh context backed by the system allocator.
    pub fn new() -> Self {
        Self::with_allocator(Box::new(SystemAllocator))
    }

    /// A fresh context with an injected allocator, used to exercise the
    /// refusal paths of allocation assertions.
    pub fn with_allocator(allocator: Box<dyn Allocator>) -> Self {
        Self {
            outcome: Outcome::new(),
            allocator,
        }
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Promote a still-running outcome to passed; called by runners after
    /// the body has returned.
    pub fn finish(&mut self) {
        self.outcome.finish();
    }

    /// Clear the outcome for the next body invocation.
    pub fn reset(&mut self) {
        self.outcome.reset();
    }

    /// Plain condition check: record a failure and interrupt unless
    /// `condition` holds.
    pub fn check(&mut self, condition: bool, text: &'static str, location: Location) -> Check {
        if condition {
            Ok(())
        } else {
            self.outcome.record_failure(text, location);
            Err(Interrupt)
        }
    }

    /// Precondition check: record a skip and interrupt unless `condition`
    /// holds. The body is classified as skipped, not failed.
    pub fn assume(&mut self, condition: bool, text: &'static str, location: Location) -> Check {
        if condition {
            Ok(())
        } else {
            self.outcome.record_skip(text, location);
            Err(Interrupt)
        }
    }

    /// Equality over operands already widened to `u64`; both operands are
    /// stored for the report when they differ.
    pub fn check_eq(&mut self, lhs: u64, rhs: u64, text: &'static str, location: Location) -> Check {
        if compare::eq_u64(lhs, rhs) {
            Ok(())
        } else {
            self.outcome
                .record_failure_values(text, location, ValuePair::Unsigned { lhs, rhs });
            Err(Interrupt)
        }
    }

    /// Unsigned `lhs <= rhs` over operands already widened to `u64`.
    pub fn check_le_u(
        &mut self,
        lhs: u64,
        rhs: u64,
        text: &'static str,
        location: Location,
    ) -> Check {
        if compare::le_u64(lhs, rhs) {
            Ok(())
        } else {
            self.outcome
                .record_failure_values(text, location, ValuePair::Unsigned { lhs, rhs });
            Err(Interrupt)
        }
    }

    /// Signed `lhs <= rhs` over operands already widened to `i64`.
    pub fn check_le_s(
        &mut self,
        lhs: i64,
        rhs: i64,
        text: &'static str,
        location: Location,
    ) -> Check {
        if compare::le_i64(lhs, rhs) {
            Ok(())
        } else {
            self.outcome
                .record_failure_values(text, location, ValuePair::Signed { lhs, rhs });
            Err(Interrupt)
        }
    }

    /// Fill `buffer` with `elem_size * count` zeroed bytes; an unsatisfiable
    /// request records a failure.
    ///
    /// A zero-byte total leaves the sentinel in place and succeeds. Overflow
    /// of `elem_size * count` reads as the allocator refusing the request.
    pub fn check_alloc(
        &mut self,
        buffer: &mut ScopedBuffer,
        elem_size: usize,
        count: usize,
        text: &'static str,
        location: Location,
    ) -> Check {
        if self.try_fill(buffer, elem_size, count) {
            Ok(())
        } else {
            self.outcome.record_failure(text, location);
            Err(Interrupt)
        }
    }

    /// Like [`TestContext::check_alloc`] but an unsatisfiable request skips
    /// the body instead of failing it, for tests whose fixture sizes are
    /// allowed to exceed the host's memory.
    pub fn check_alloc_or_skip(
        &mut self,
        buffer: &mut ScopedBuffer,
        elem_size: usize,
        count: usize,
        text: &'static str,
        location: Location,
    ) -> Check {
        if self.try_fill(buffer, elem_size, count) {
            Ok(())
        } else {
            self.outcome.record_skip(text, location);
            Err(Interrupt)
        }
    }

    /// Buffer equality via [`buffer::compare_buffers`]: the length check
    /// runs first and reports both lengths as operands; a content mismatch
    /// reports text only. Both surface as one failed transition.
    pub fn check_buffers(
        &mut self,
        left: &[u8],
        right: &[u8],
        size_text: &'static str,
        content_text: &'static str,
        location: Location,
    ) -> Check {
        match buffer::compare_buffers(left, right) {
            None => Ok(()),
            Some(BufferMismatch::Size { left, right }) => {
                self.outcome.record_failure_values(
                    size_text,
                    location,
                    ValuePair::Unsigned {
                        lhs: left as u64,
                        rhs: right as u64,
                    },
                );
                Err(Interrupt)
            }
            Some(BufferMismatch::Content) => {
                self.outcome.record_failure(content_text, location);
                Err(Interrupt)
            }
        }
    }

    fn try_fill(&mut self, buffer: &mut ScopedBuffer, elem_size: usize, count: usize) -> bool {
        let total = match elem_size.checked_mul(count) {
            Some(n) => n,
            None => return false,
        };
        if total == 0 {
            // Zero-length request: the sentinel stays, nothing to allocate.
            return true;
        }
        match self.allocator.allocate_zeroed(total) {
            Some(data) => {
                buffer.install(data);
                true
            }
            None => false,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ASSERTION MACROS
// ============================================================================

/// Assert a condition; on failure, record it and exit the test body.
///
/// Expands to a context method call followed by `?`, so the enclosing body
/// must return [`Check`].
#[macro_export]
macro_rules! check {
    ($ctx:expr, $cond:expr) => {
        $ctx.check(
            $cond,
            stringify!($cond),
            $crate::Location::new(file!(), line!()),
        )?
    };
}

/// Assume a precondition; on failure, classify the body as skipped and exit.
#[macro_export]
macro_rules! assume {
    ($ctx:expr, $cond:expr) => {
        $ctx.assume(
            $cond,
            stringify!($cond),
            $crate::Location::new(file!(), line!()),
        )?
    };
}

/// Assert equality of two integer expressions, widened to `u64` at the call
/// site. On mismatch both values are recorded alongside the expression text.
#[macro_export]
macro_rules! check_eq {
    ($ctx:expr, $lhs:expr, $rhs:expr) => {
        $ctx.check_eq(
            ($lhs) as u64,
            ($rhs) as u64,
            concat!(stringify!($lhs), " == ", stringify!($rhs)),
            $crate::Location::new(file!(), line!()),
        )?
    };
}

/// Assert `lhs <= rhs` under unsigned ordering, operands widened to `u64`.
///
/// A negative operand widens to a large magnitude here; use
/// [`check_le_s!`](crate::check_le_s) when either side can be negative.
#[macro_export]
macro_rules! check_le_u {
    ($ctx:expr, $lhs:expr, $rhs:expr) => {
        $ctx.check_le_u(
            ($lhs) as u64,
            ($rhs) as u64,
            concat!(stringify!($lhs), " <= ", stringify!($rhs)),
            $crate::Location::new(file!(), line!()),
        )?
    };
}

/// Assert `lhs <= rhs` under signed ordering, operands widened to `i64`.
#[macro_export]
macro_rules! check_le_s {
    ($ctx:expr, $lhs:expr, $rhs:expr) => {
        $ctx.check_le_s(
            ($lhs) as i64,
            ($rhs) as i64,
            concat!(stringify!($lhs), " <= ", stringify!($rhs)),
            $crate::Location::new(file!(), line!()),
        )?
    };
}

/// Allocate `elem_size * count` zeroed bytes into a [`ScopedBuffer`].
///
/// The buffer must still hold the unallocated sentinel; a zero-byte total
/// keeps the sentinel and succeeds. An unsatisfiable request fails the body.
#[macro_export]
macro_rules! check_alloc {
    ($ctx:expr, $buf:expr, $elem_size:expr, $count:expr) => {{
        $crate::check!($ctx, $buf.is_unallocated());
        $ctx.check_alloc(
            &mut $buf,
            $elem_size,
            $count,
            concat!(stringify!($buf), " allocated"),
            $crate::Location::new(file!(), line!()),
        )?
    }};
}

/// Like [`check_alloc!`](crate::check_alloc) but an unsatisfiable request
/// skips the body instead of failing it.
#[macro_export]
macro_rules! check_alloc_or_skip {
    ($ctx:expr, $buf:expr, $elem_size:expr, $count:expr) => {{
        $crate::check!($ctx, $buf.is_unallocated());
        $ctx.check_alloc_or_skip(
            &mut $buf,
            $elem_size,
            $count,
            concat!(stringify!($buf), " allocated"),
            $crate::Location::new(file!(), line!()),
        )?
    }};
}

/// Assert two byte buffers are equal: lengths first (reported with both
/// lengths as operands), then contents.
#[macro_export]
macro_rules! check_buffers_eq {
    ($ctx:expr, $left:expr, $right:expr) => {
        $ctx.check_buffers(
            &$left,
            &$right,
            concat!(
                stringify!($left),
                ".len() == ",
                stringify!($right),
                ".len()"
            ),
            concat!(stringify!($left), " == ", stringify!($right)),
            $crate::Location::new(file!(), line!()),
        )?
    };
}
