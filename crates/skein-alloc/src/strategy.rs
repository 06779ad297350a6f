//! The allocation strategy seam.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

use skein_core::AllocError;

/// Byte-level allocation strategy used by every internal buffer.
///
/// # Safety
///
/// Implementors must return blocks valid for reads and writes of
/// `layout.size()` bytes and aligned to `layout.align()`, and must accept
/// in [`deallocate`](Self::deallocate) every block they returned that has
/// not been released yet.
pub unsafe trait AllocStrategy {
    /// Allocate a block for `layout`. Never panics on exhaustion.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a block.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this strategy (or an
    /// equal one) with the same `layout`, and not released since.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

// SAFETY: forwards to the referenced strategy unchanged.
unsafe impl<S: AllocStrategy + ?Sized> AllocStrategy for &S {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller contract is forwarded.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}
