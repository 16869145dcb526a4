//! Unit tests for allocation and buffer-comparison assertions.
//!
//! The buffer convention under test: a buffer holds the unallocated sentinel
//! until an allocation assertion fills it, a zero-length request keeps the
//! sentinel, and zero-length buffers compare equal wherever they came from.

use verdict::{check, check_alloc, check_alloc_or_skip, check_buffers_eq};
use verdict::{Check, DenyAllocator, ScopedBuffer, Status, TestContext, ValuePair};

#[cfg(test)]
mod allocation_tests {
    use super::*;

    #[test]
    fn test_alloc_fills_the_buffer_with_zeroed_bytes() {
        fn body(ctx: &mut TestContext) -> Check {
            let mut buf = ScopedBuffer::unallocated();
            check_alloc!(ctx, buf, 4, 3);
            check!(ctx, buf.len() == 12);
            check!(ctx, buf.bytes().iter().all(|&b| b == 0));
            Ok(())
        }

        let mut ctx = TestContext::new();
        assert!(body(&mut ctx).is_ok());
    }

    #[test]
    fn test_zero_count_keeps_the_sentinel() {
        fn body(ctx: &mut TestContext) -> Check {
            let mut buf = ScopedBuffer::unallocated();
            check_alloc!(ctx, buf, 4, 0);
            check!(ctx, buf.is_unallocated());
            check!(ctx, buf.bytes().is_empty());
            Ok(())
        }

        let mut ctx = TestContext::new();
        assert!(body(&mut ctx).is_ok());
        ctx.finish();
        assert_eq!(ctx.outcome().status(), Status::Passed);
    }

    #[test]
    fn test_filling_a_filled_buffer_fails_the_sentinel_check() {
        fn body(ctx: &mut TestContext) -> Check {
            let mut buf = ScopedBuffer::unallocated();
            check_alloc!(ctx, buf, 1, 4);
            check_alloc!(ctx, buf, 1, 4);
            Ok(())
        }

        let mut ctx = TestContext::new();
        assert!(body(&mut ctx).is_err());
        assert_eq!(ctx.outcome().status(), Status::Failed);
        assert_eq!(ctx.outcome().text(), Some("buf.is_unallocated()"));
    }

    #[test]
    fn test_release_allows_refilling_within_one_body() {
        fn body(ctx: &mut TestContext) -> Check {
            let mut buf = ScopedBuffer::unallocated();
            check_alloc!(ctx, buf, 1, 4);
            buf.release();
            check_alloc!(ctx, buf, 1, 8);
            check!(ctx, buf.len() == 8);
            Ok(())
        }

        let mut ctx = TestContext::new();
        assert!(body(&mut ctx).is_ok());
    }

    #[test]
    fn test_size_overflow_fails_the_allocation() {
        fn body(ctx: &mut TestContext) -> Check {
            let mut buf = ScopedBuffer::unallocated();
            check_alloc!(ctx, buf, usize::MAX, 2);
            Ok(())
        }

        let mut ctx = TestContext::new();
        assert!(body(&mut ctx).is_err());
        assert_eq!(ctx.outcome().status(), Status::Failed);
        assert_eq!(ctx.outcome().text(), Some("buf allocated"));
    }

    #[test]
    fn test_refused_allocation_fails_the_strict_variant() {
        fn body(ctx: &mut TestContext) -> Check {
            let mut buf = ScopedBuffer::unallocated();
            check_alloc!(ctx, buf, 1, 64);
            Ok(())
        }

        let mut ctx = TestContext::with_allocator(Box::new(DenyAllocator));
        assert!(body(&mut ctx).is_err());
        assert_eq!(ctx.outcome().status(), Status::Failed);
    }

    #[test]
    fn test_refused_allocation_skips_the_weak_variant() {
        fn body(ctx: &mut TestContext) -> Check {
            let mut buf = ScopedBuffer::unallocated();
            check_alloc_or_skip!(ctx, buf, 1, 64);
            Ok(())
        }

        let mut ctx = TestContext::with_allocator(Box::new(DenyAllocator));
        assert!(body(&mut ctx).is_err());
        assert_eq!(ctx.outcome().status(), Status::Skipped);
        assert_eq!(ctx.outcome().text(), Some("buf allocated"));
    }

    #[test]
    fn test_weak_variant_still_fails_a_sentinel_violation() {
        // Only the allocation step is weak; filling a live buffer is a test
        // bug and fails even in the skipping variant.
        fn body(ctx: &mut TestContext) -> Check {
            let mut buf = ScopedBuffer::unallocated();
            buf.install(vec![1]);
            check_alloc_or_skip!(ctx, buf, 1, 4);
            Ok(())
        }

        let mut ctx = TestContext::new();
        assert!(body(&mut ctx).is_err());
        assert_eq!(ctx.outcome().status(), Status::Failed);
    }
}

#[cfg(test)]
mod comparison_tests {
    use super::*;

    #[test]
    fn test_equal_buffers_pass() {
        fn body(ctx: &mut TestContext) -> Check {
            let left = [1u8, 2, 3];
            let right = vec![1u8, 2, 3];
            check_buffers_eq!(ctx, left, right);
            Ok(())
        }

        let mut ctx = TestContext::new();
        assert!(body(&mut ctx).is_ok());
    }

    #[test]
    fn test_size_mismatch_is_reported_before_any_byte_comparison() {
        // The shorter buffer is a strict prefix of the longer one, so only
        // the size check can catch the difference.
        fn body(ctx: &mut TestContext) -> Check {
            let left = [1u8, 2, 3];
            let right = [1u8, 2];
            check_buffers_eq!(ctx, left, right);
            Ok(())
        }

        let mut ctx = TestContext::new();
        assert!(body(&mut ctx).is_err());
        assert_eq!(ctx.outcome().text(), Some("left.len() == right.len()"));
        assert_eq!(
            ctx.outcome().values(),
            Some(&ValuePair::Unsigned { lhs: 3, rhs: 2 })
        );
    }

    #[test]
    fn test_content_mismatch_at_equal_length() {
        fn body(ctx: &mut TestContext) -> Check {
            let left = [1u8, 2, 3];
            let right = [1u8, 2, 4];
            check_buffers_eq!(ctx, left, right);
            Ok(())
        }

        let mut ctx = TestContext::new();
        assert!(body(&mut ctx).is_err());
        assert_eq!(ctx.outcome().text(), Some("left == right"));
        assert!(ctx.outcome().values().is_none());
    }

    #[test]
    fn test_zero_length_buffers_compare_equal_regardless_of_source() {
        fn body(ctx: &mut TestContext) -> Check {
            let array: [u8; 0] = [];
            let vec: Vec<u8> = Vec::new();
            check_buffers_eq!(ctx, array, vec);

            let a = ScopedBuffer::unallocated();
            let b = ScopedBuffer::unallocated();
            check_buffers_eq!(ctx, a.bytes(), b.bytes());
            Ok(())
        }

        let mut ctx = TestContext::new();
        assert!(body(&mut ctx).is_ok());
    }

    #[test]
    fn test_allocated_buffer_compares_against_expected_bytes() {
        fn body(ctx: &mut TestContext) -> Check {
            let mut buf = ScopedBuffer::unallocated();
            check_alloc!(ctx, buf, 1, 4);
            buf.bytes_mut().copy_from_slice(&[9, 8, 7, 6]);

            let expected = [9u8, 8, 7, 6];
            check_buffers_eq!(ctx, buf.bytes(), expected);
            Ok(())
        }

        let mut ctx = TestContext::new();
        assert!(body(&mut ctx).is_ok());
    }
}
