//! The host-supplied allocate/deallocate pair.

use std::ffi::c_void;
use std::fmt;

/// Host allocate callback: returns at least `size` bytes aligned for any
/// C type, or null when out of memory.
pub type AllocateFn = unsafe extern "C" fn(size: usize) -> *mut c_void;

/// Host deallocate callback: releases a block returned by the matching
/// [`AllocateFn`].
pub type DeallocateFn = unsafe extern "C" fn(ptr: *mut c_void);

/// A pair of optional host memory callbacks.
///
/// Plain value: copying it copies the function references, which the
/// host owns for the lifetime of the process. Callbacks must be safe to
/// call from any thread that calls into the SDK.
#[derive(Clone, Copy, Default)]
pub struct CallbackPair {
    /// Allocate callback, or `None` for the global allocator.
    pub allocate: Option<AllocateFn>,
    /// Deallocate callback, or `None` for the global allocator.
    pub deallocate: Option<DeallocateFn>,
}

impl CallbackPair {
    /// A pair with both callbacks set.
    pub const fn new(allocate: AllocateFn, deallocate: DeallocateFn) -> Self {
        Self {
            allocate: Some(allocate),
            deallocate: Some(deallocate),
        }
    }

    /// Returns `true` if both callbacks are set.
    pub fn is_complete(&self) -> bool {
        self.allocate.is_some() && self.deallocate.is_some()
    }

    /// Returns `true` if neither callback is set.
    pub fn is_empty(&self) -> bool {
        self.allocate.is_none() && self.deallocate.is_none()
    }

    fn addresses(&self) -> (usize, usize) {
        (
            self.allocate.map_or(0, |f| f as usize),
            self.deallocate.map_or(0, |f| f as usize),
        )
    }
}

// Compared by address: two pairs are equal when they route to the same
// functions, which is what decides whether one may free the other's blocks.
impl PartialEq for CallbackPair {
    fn eq(&self, other: &Self) -> bool {
        self.addresses() == other.addresses()
    }
}

impl Eq for CallbackPair {}

impl fmt::Debug for CallbackPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, d) = self.addresses();
        f.debug_struct("CallbackPair")
            .field("allocate", &(a != 0).then_some(a as *const ()))
            .field("deallocate", &(d != 0).then_some(d as *const ()))
            .finish()
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    unsafe extern "C" fn never_alloc(_size: usize) -> *mut c_void {
        std::ptr::null_mut()
    }

    unsafe extern "C" fn never_free(_ptr: *mut c_void) {}

    unsafe extern "C" fn other_free(ptr: *mut c_void) {
        std::hint::black_box(ptr);
    }

    #[test]
    fn default_pair_is_empty() {
        let p = CallbackPair::default();
        assert!(p.is_empty());
        assert!(!p.is_complete());
    }

    #[test]
    fn complete_pair() {
        let p = CallbackPair::new(never_alloc, never_free);
        assert!(p.is_complete());
        assert!(!p.is_empty());
    }

    #[test]
    fn half_pair_is_neither() {
        let p = CallbackPair {
            allocate: Some(never_alloc),
            deallocate: None,
        };
        assert!(!p.is_complete());
        assert!(!p.is_empty());
    }

    #[test]
    fn equality_follows_function_identity() {
        let a = CallbackPair::new(never_alloc, never_free);
        let b = a;
        let c = CallbackPair::new(never_alloc, other_free);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, CallbackPair::default());
    }
}
