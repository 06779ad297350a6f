//! [`HostAllocator`]: the strategy built from a host [`CallbackPair`].

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ffi::c_void;
use std::ptr::{self, NonNull};

use skein_core::limits::HOST_ALIGN;
use skein_core::AllocError;

use crate::callback::CallbackPair;
use crate::strategy::AllocStrategy;

/// Allocation strategy that routes through host callbacks when present and
/// through the global allocator otherwise.
///
/// Stateless beyond its [`CallbackPair`]. Two allocators compare equal when
/// their pairs do; a block may only be released through an allocator equal
/// to the one that produced it.
///
/// A pair with only one callback set cannot be honoured safely (a block
/// from the host would be released by the global allocator, or vice
/// versa), so it is treated as if neither were set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostAllocator {
    pair: CallbackPair,
}

impl HostAllocator {
    /// Build an allocator from a host pair.
    pub fn new(pair: CallbackPair) -> Self {
        if pair.is_complete() || pair.is_empty() {
            return Self { pair };
        }
        tracing::warn!(
            target: "skein::alloc",
            ?pair,
            "incomplete allocator callback pair, using the default allocator"
        );
        Self::default()
    }

    /// Build an allocator from an optional host pair; `None` selects the
    /// default allocator.
    pub fn from_option(pair: Option<CallbackPair>) -> Self {
        pair.map_or_else(Self::default, Self::new)
    }

    /// The (normalized) callback pair this allocator routes through.
    pub fn pair(&self) -> CallbackPair {
        self.pair
    }

    /// Returns `true` if allocations go to the global allocator.
    pub fn is_default(&self) -> bool {
        self.pair.is_empty()
    }

    /// Allocate `size` bytes with byte alignment, for C-visible buffers
    /// whose release site only knows the pointer and length.
    pub fn allocate_bytes(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        let layout = Layout::array::<u8>(size).map_err(|_| AllocError::CapacityOverflow)?;
        self.allocate(layout)
    }

    /// Release a block from [`allocate_bytes`](Self::allocate_bytes).
    /// Null is a no-op.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or have come from `allocate_bytes(size)` on an
    /// allocator equal to this one, and not been released since.
    pub unsafe fn release_bytes(&self, ptr: *mut u8, size: usize) {
        let Some(ptr) = NonNull::new(ptr) else {
            return;
        };
        let Ok(layout) = Layout::array::<u8>(size) else {
            return;
        };
        // SAFETY: forwarded from the caller contract.
        unsafe { self.deallocate(ptr, layout) }
    }
}

// SAFETY: host callbacks promise `max_align_t` alignment, and any layout
// stricter than HOST_ALIGN is refused before reaching them. The global
// path uses the layout unchanged.
unsafe impl AllocStrategy for HostAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }

        let raw = match self.pair.allocate {
            Some(host_alloc) => {
                if layout.align() > HOST_ALIGN {
                    return Err(AllocError::UnsupportedAlignment {
                        align: layout.align(),
                        max: HOST_ALIGN,
                    });
                }
                // SAFETY: host contract; the callback takes any size.
                let p = unsafe { host_alloc(layout.size()) };
                tracing::trace!(target: "skein::alloc", size = layout.size(), ptr = ?p, "host allocate");
                p.cast::<u8>()
            }
            // SAFETY: layout has non-zero size.
            None => unsafe { alloc::alloc(layout) },
        };

        NonNull::new(raw).ok_or(AllocError::OutOfMemory {
            size: layout.size(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        match self.pair.deallocate {
            Some(host_free) => {
                tracing::trace!(target: "skein::alloc", size = layout.size(), ptr = ?ptr, "host deallocate");
                // SAFETY: ptr came from the matching host allocate callback.
                unsafe { host_free(ptr.as_ptr().cast::<c_void>()) }
            }
            // SAFETY: ptr came from alloc::alloc with this layout.
            None => unsafe { alloc::dealloc(ptr.as_ptr(), layout) },
        }
    }
}

fn dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: an alignment is never zero.
    unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(layout.align())) }
}
