//! Buffer primitives: zero-length-safe allocation and byte-wise comparison.
//!
//! Dynamic test buffers follow one convention throughout the protocol: a
//! buffer variable holds the unallocated sentinel until an allocation
//! assertion fills it, and a zero-length request leaves the sentinel in
//! place. [`ScopedBuffer`] models the sentinel as `Option<Vec<u8>>`, so the
//! buffer frees itself when the test body's scope ends, on every exit path.
//!
//! Comparison works on byte slices. An unallocated buffer exposes the empty
//! slice, which is how "a null pointer is permitted for a zero-length
//! buffer" reads here: two empty slices compare equal no matter where they
//! came from.

// ============================================================================
// ALLOCATOR COLLABORATOR
// ============================================================================

/// Source of zero-initialized storage for allocation assertions.
///
/// Returning `None` means the request cannot be satisfied. The assertion
/// layer decides what that means: a failure for `check_alloc!`, a skip for
/// `check_alloc_or_skip!`. Implementations never panic on refusal.
pub trait Allocator {
    fn allocate_zeroed(&mut self, len: usize) -> Option<Vec<u8>>;
}

/// The default allocator: plain zeroed `Vec` storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    fn allocate_zeroed(&mut self, len: usize) -> Option<Vec<u8>> {
        Some(vec![0u8; len])
    }
}

/// Test double that refuses every request, for exercising the failure and
/// skip paths of allocation assertions.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAllocator;

impl Allocator for DenyAllocator {
    fn allocate_zeroed(&mut self, _len: usize) -> Option<Vec<u8>> {
        None
    }
}

// ============================================================================
// SCOPED BUFFER
// ============================================================================

/// Owned test buffer with an explicit unallocated sentinel.
///
/// `None` is the sentinel. Allocation assertions require the sentinel before
/// they fill a buffer, which catches accidental double allocation the same
/// way a not-null pointer would in a manually managed setting. Storage is
/// dropped when the buffer goes out of scope, so the end of the test body is
/// the single cleanup point for every outcome.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScopedBuffer {
    data: Option<Vec<u8>>,
}

impl ScopedBuffer {
    /// A buffer holding the unallocated sentinel.
    pub fn unallocated() -> Self {
        Self { data: None }
    }

    /// True while the buffer still holds the sentinel.
    pub fn is_unallocated(&self) -> bool {
        self.data.is_none()
    }

    /// Bytes of the buffer; the empty slice while unallocated.
    pub fn bytes(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Mutable bytes of the buffer; the empty slice while unallocated.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    /// Install freshly allocated storage.
    ///
    /// The assertion layer checks the sentinel before calling this; filling
    /// an already-filled buffer without releasing it first is the bug that
    /// check catches.
    pub fn install(&mut self, data: Vec<u8>) {
        self.data = Some(data);
    }

    /// Drop any storage and return to the unallocated sentinel, so the same
    /// variable can be filled again inside one body.
    pub fn release(&mut self) {
        self.data = None;
    }
}

// ============================================================================
// COMPARISON
// ============================================================================

/// How a buffer comparison failed.
///
/// Both variants surface as one FAILED transition at the assertion layer;
/// a content mismatch does not say which byte differed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferMismatch {
    /// Lengths differ; byte comparison never ran.
    Size { left: usize, right: usize },
    /// Lengths match but at least one byte differs.
    Content,
}

/// Compare two buffers the way the comparison assertion does: length first,
/// bytes only when the lengths agree and are non-zero.
///
/// Two zero-length buffers are trivially equal regardless of origin.
pub fn compare_buffers(left: &[u8], right: &[u8]) -> Option<BufferMismatch> {
    if left.len() != right.len() {
        return Some(BufferMismatch::Size {
            left: left.len(),
            right: right.len(),
        });
    }
    if !left.is_empty() && left != right {
        return Some(BufferMismatch::Content);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_starts_at_the_sentinel() {
        let buf = ScopedBuffer::unallocated();
        assert!(buf.is_unallocated());
        assert!(buf.bytes().is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn install_and_release_toggle_the_sentinel() {
        let mut buf = ScopedBuffer::default();
        buf.install(vec![1, 2, 3]);
        assert!(!buf.is_unallocated());
        assert_eq!(buf.bytes(), &[1, 2, 3]);

        buf.bytes_mut()[1] = 9;
        assert_eq!(buf.bytes(), &[1, 9, 3]);

        buf.release();
        assert!(buf.is_unallocated());
    }

    #[test]
    fn releasing_the_sentinel_is_a_tolerated_no_op() {
        let mut buf = ScopedBuffer::unallocated();
        buf.release();
        buf.release();
        assert!(buf.is_unallocated());
    }

    #[test]
    fn system_allocator_hands_out_zeroed_storage() {
        let mut alloc = SystemAllocator;
        let data = alloc.allocate_zeroed(16).unwrap();
        assert_eq!(data.len(), 16);
        assert!(data.iter().all(|&b| b == 0));
    }

    #[test]
    fn deny_allocator_refuses_everything() {
        let mut alloc = DenyAllocator;
        assert!(alloc.allocate_zeroed(1).is_none());
        assert!(alloc.allocate_zeroed(0).is_none());
    }

    #[test]
    fn equal_buffers_compare_clean() {
        assert_eq!(compare_buffers(&[1, 2, 3], &[1, 2, 3]), None);
        assert_eq!(compare_buffers(&[], &[]), None);
    }

    #[test]
    fn length_mismatch_is_reported_before_content() {
        // [1,2,3] vs [1,2]: a byte-wise pass over the shorter length would
        // succeed, so only the size check can catch this.
        assert_eq!(
            compare_buffers(&[1, 2, 3], &[1, 2]),
            Some(BufferMismatch::Size { left: 3, right: 2 })
        );
    }

    #[test]
    fn content_mismatch_at_equal_length() {
        assert_eq!(
            compare_buffers(&[1, 2, 3], &[1, 2, 4]),
            Some(BufferMismatch::Content)
        );
    }
}
