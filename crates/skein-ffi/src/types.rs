//! C-compatible allocator callback pair.

use std::ffi::c_void;

use skein_alloc::{CallbackPair, HostAllocator};

/// Host allocate callback: returns at least `size` bytes aligned for any
/// fundamental type, or null.
pub type SkeinAllocateFn = unsafe extern "C" fn(size: usize) -> *mut c_void;

/// Host deallocate callback. Never called with null.
pub type SkeinDeallocateFn = unsafe extern "C" fn(ptr: *mut c_void);

/// Allocator callback pair a host passes to any entry point that
/// allocates.
///
/// Both fields null selects the default allocator. A pair with only one
/// field set is treated the same way.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkeinAllocator {
    /// Allocate callback, or null.
    pub allocate: Option<SkeinAllocateFn>,
    /// Deallocate callback, or null.
    pub deallocate: Option<SkeinDeallocateFn>,
}

// Two nullable function pointers.
const _: () = assert!(std::mem::size_of::<SkeinAllocator>() == 2 * std::mem::size_of::<usize>());

impl From<SkeinAllocator> for CallbackPair {
    fn from(a: SkeinAllocator) -> Self {
        CallbackPair {
            allocate: a.allocate,
            deallocate: a.deallocate,
        }
    }
}

impl From<CallbackPair> for SkeinAllocator {
    fn from(p: CallbackPair) -> Self {
        SkeinAllocator {
            allocate: p.allocate,
            deallocate: p.deallocate,
        }
    }
}

impl From<SkeinAllocator> for HostAllocator {
    fn from(a: SkeinAllocator) -> Self {
        HostAllocator::new(a.into())
    }
}
