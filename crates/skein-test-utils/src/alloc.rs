//! Allocation strategies for leak and failure testing.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::collections::HashMap;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use skein_alloc::{AllocStrategy, HostAllocator};
use skein_core::AllocError;

/// Wraps a [`HostAllocator`] and tracks every live block.
///
/// Releasing an unknown block counts a double free and leaves memory
/// alone; releasing with a different layout counts a mismatch and frees
/// with the recorded one.
#[derive(Default)]
pub struct CountingAllocator {
    inner: HostAllocator,
    live: Mutex<HashMap<usize, Layout>>,
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
    double_frees: AtomicUsize,
    layout_mismatches: AtomicUsize,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count on top of a specific host allocator.
    pub fn wrapping(inner: HostAllocator) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    pub fn deallocations(&self) -> usize {
        self.deallocations.load(Ordering::Relaxed)
    }

    pub fn double_frees(&self) -> usize {
        self.double_frees.load(Ordering::Relaxed)
    }

    pub fn layout_mismatches(&self) -> usize {
        self.layout_mismatches.load(Ordering::Relaxed)
    }

    pub fn live_blocks(&self) -> usize {
        self.live.lock().len()
    }

    pub fn live_bytes(&self) -> usize {
        self.live.lock().values().map(Layout::size).sum()
    }

    /// Panics unless every block was released exactly once.
    pub fn assert_balanced(&self) {
        assert_eq!(self.live_blocks(), 0, "leaked blocks");
        assert_eq!(self.double_frees(), 0, "double frees");
        assert_eq!(self.layout_mismatches(), 0, "layout mismatches");
        assert_eq!(self.allocations(), self.deallocations());
    }
}

// SAFETY: forwards to HostAllocator; deallocate only forwards blocks
// recorded as live.
unsafe impl AllocStrategy for CountingAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let ptr = self.inner.allocate(layout)?;
        if layout.size() != 0 {
            self.allocations.fetch_add(1, Ordering::Relaxed);
            self.live.lock().insert(ptr.as_ptr() as usize, layout);
        }
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        let Some(recorded) = self.live.lock().remove(&(ptr.as_ptr() as usize)) else {
            self.double_frees.fetch_add(1, Ordering::Relaxed);
            return;
        };
        if recorded != layout {
            self.layout_mismatches.fetch_add(1, Ordering::Relaxed);
        }
        self.deallocations.fetch_add(1, Ordering::Relaxed);
        // SAFETY: the block is live and was allocated with `recorded`.
        unsafe { self.inner.deallocate(ptr, recorded) }
    }
}

/// Succeeds for the first `budget` non-empty allocations, then reports
/// out of memory.
pub struct FailingAllocator {
    remaining: AtomicUsize,
    inner: CountingAllocator,
}

impl FailingAllocator {
    pub fn new(budget: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(budget),
            inner: CountingAllocator::new(),
        }
    }

    /// The counting allocator the successful requests went through.
    pub fn counts(&self) -> &CountingAllocator {
        &self.inner
    }
}

// SAFETY: forwards to CountingAllocator.
unsafe impl AllocStrategy for FailingAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() != 0
            && self
                .remaining
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
                .is_err()
        {
            return Err(AllocError::OutOfMemory {
                size: layout.size(),
            });
        }
        self.inner.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller contract is forwarded.
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}
