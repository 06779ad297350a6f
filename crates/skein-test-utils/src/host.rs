//! Fake host allocator callbacks.
//!
//! The counting pair prefixes each block with a 16-byte header holding its
//! size, so the free callback needs only the pointer, as a C host's would.
//! Counters are process-wide statics: tests that read them must run
//! serially.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};

use skein_alloc::CallbackPair;
use skein_core::limits::HOST_ALIGN;

static ALLOCS: AtomicUsize = AtomicUsize::new(0);
static FREES: AtomicUsize = AtomicUsize::new(0);
static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static BUDGET: AtomicUsize = AtomicUsize::new(usize::MAX);

/// Snapshot of the counting pair's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostStats {
    pub allocations: usize,
    pub deallocations: usize,
    pub live_bytes: usize,
}

impl HostStats {
    pub fn live_blocks(&self) -> usize {
        self.allocations - self.deallocations
    }
}

pub fn host_stats() -> HostStats {
    HostStats {
        allocations: ALLOCS.load(Ordering::SeqCst),
        deallocations: FREES.load(Ordering::SeqCst),
        live_bytes: LIVE_BYTES.load(Ordering::SeqCst),
    }
}

/// Zero the counters and lift any budget.
pub fn reset_host_stats() {
    ALLOCS.store(0, Ordering::SeqCst);
    FREES.store(0, Ordering::SeqCst);
    LIVE_BYTES.store(0, Ordering::SeqCst);
    BUDGET.store(usize::MAX, Ordering::SeqCst);
}

/// Let the counting pair satisfy `n` more requests, then return null.
pub fn set_host_budget(n: usize) {
    BUDGET.store(n, Ordering::SeqCst);
}

fn block_layout(size: usize) -> Option<Layout> {
    Layout::from_size_align(size.checked_add(HOST_ALIGN)?, HOST_ALIGN).ok()
}

unsafe extern "C" fn counting_alloc(size: usize) -> *mut c_void {
    if BUDGET
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_err()
    {
        return std::ptr::null_mut();
    }
    let Some(layout) = block_layout(size) else {
        return std::ptr::null_mut();
    };
    // SAFETY: layout has a non-zero size.
    let base = unsafe { std::alloc::alloc(layout) };
    if base.is_null() {
        return std::ptr::null_mut();
    }
    // SAFETY: the block is at least HOST_ALIGN bytes and suitably aligned.
    unsafe { base.cast::<usize>().write(size) };
    ALLOCS.fetch_add(1, Ordering::SeqCst);
    LIVE_BYTES.fetch_add(size, Ordering::SeqCst);
    // SAFETY: stays within the block.
    unsafe { base.add(HOST_ALIGN).cast() }
}

unsafe extern "C" fn counting_free(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: ptr came from counting_alloc, which placed the header
    // HOST_ALIGN bytes before it.
    let base = unsafe { ptr.cast::<u8>().sub(HOST_ALIGN) };
    let size = unsafe { base.cast::<usize>().read() };
    FREES.fetch_add(1, Ordering::SeqCst);
    LIVE_BYTES.fetch_sub(size, Ordering::SeqCst);
    if let Some(layout) = block_layout(size) {
        // SAFETY: matches the layout used in counting_alloc.
        unsafe { std::alloc::dealloc(base, layout) }
    }
}

unsafe extern "C" fn null_alloc(_size: usize) -> *mut c_void {
    std::ptr::null_mut()
}

unsafe extern "C" fn ignore_free(_ptr: *mut c_void) {}

/// A pair backed by the global allocator that counts through [`host_stats`].
pub fn counting_pair() -> CallbackPair {
    CallbackPair::new(counting_alloc, counting_free)
}

/// A pair whose allocate callback always returns null.
pub fn exhausted_pair() -> CallbackPair {
    CallbackPair::new(null_alloc, ignore_free)
}
