//! [`HostVec`]: growable buffer whose every growth is fallible.
//!
//! Hosts provide no reallocate callback, so growth allocates a new block,
//! moves the elements across, and releases the old block through the same
//! adapter. Each block is released exactly once: on growth or on drop.

#![allow(unsafe_code)]

use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use skein_core::AllocError;

use crate::adapter::Adapter;
use crate::host::HostAllocator;
use crate::strategy::AllocStrategy;

const MIN_NON_ZERO_CAP: usize = 4;

/// Contiguous growable array allocated through an [`AllocStrategy`].
///
/// Mirrors the subset of `Vec` the SDK internals need, with `try_`
/// growth methods returning [`AllocError`] instead of aborting.
pub struct HostVec<T, A: AllocStrategy = HostAllocator> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    alloc: Adapter<T, A>,
}

// SAFETY: HostVec owns its elements; the strategy is moved/shared along
// with it and must itself be Send/Sync.
unsafe impl<T: Send, A: AllocStrategy + Send> Send for HostVec<T, A> {}
unsafe impl<T: Sync, A: AllocStrategy + Sync> Sync for HostVec<T, A> {}

impl<T, A: AllocStrategy> HostVec<T, A> {
    /// An empty buffer. Does not allocate.
    pub fn new_in(strategy: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: if mem::size_of::<T>() == 0 { usize::MAX } else { 0 },
            len: 0,
            alloc: Adapter::new(strategy),
        }
    }

    /// An empty buffer with room for at least `capacity` elements.
    pub fn with_capacity_in(capacity: usize, strategy: A) -> Result<Self, AllocError> {
        let mut v = Self::new_in(strategy);
        v.try_reserve(capacity)?;
        Ok(v)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current block holds.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// The strategy this buffer allocates through.
    pub fn strategy(&self) -> &A {
        self.alloc.strategy()
    }

    /// Make room for `additional` more elements.
    ///
    /// On failure the buffer is unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(AllocError::CapacityOverflow)?;
        if needed <= self.cap {
            return Ok(());
        }
        let new_cap = needed
            .max(self.cap.saturating_mul(2))
            .max(MIN_NON_ZERO_CAP);
        self.grow_to(new_cap)
    }

    /// Append an element. On failure the element is dropped.
    pub fn try_push(&mut self, value: T) -> Result<(), AllocError> {
        if self.len == self.cap {
            self.try_reserve(1)?;
        }
        // SAFETY: len < cap after the reserve above.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at len was initialized and is now logically moved out.
        Some(unsafe { self.ptr.as_ptr().add(self.len).read() })
    }

    /// Drop every element past `len`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = self.len - len;
        self.len = len;
        // SAFETY: the tail slots were initialized and are no longer reachable.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr().add(len),
                tail,
            ));
        }
    }

    /// Drop every element, keeping the block.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid (or dangling with len 0) for len initialized elements.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in as_slice, and we hold &mut self.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    fn grow_to(&mut self, new_cap: usize) -> Result<(), AllocError> {
        debug_assert!(mem::size_of::<T>() != 0);
        let new_ptr = self.alloc.allocate(new_cap)?;
        // SAFETY: the new block is fresh, so the regions do not overlap, and
        // both are valid for len elements.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len) };
        if self.cap != 0 {
            // SAFETY: the old block came from allocate(cap) on this adapter;
            // its elements were moved out above.
            unsafe { self.alloc.deallocate(self.ptr, self.cap) };
        }
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }
}

impl<T: Clone, A: AllocStrategy> HostVec<T, A> {
    /// Append clones of every element of `items`.
    ///
    /// Reserves once up front; on failure nothing is appended.
    pub fn try_extend_from_slice(&mut self, items: &[T]) -> Result<(), AllocError> {
        self.try_reserve(items.len())?;
        for item in items {
            // Cannot fail: room was reserved above.
            self.try_push(item.clone())?;
        }
        Ok(())
    }
}

impl<T> HostVec<T, HostAllocator> {
    /// An empty buffer on the default allocator.
    pub fn new() -> Self {
        Self::new_in(HostAllocator::default())
    }
}

impl<T> Default for HostVec<T, HostAllocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: AllocStrategy> Drop for HostVec<T, A> {
    fn drop(&mut self) {
        self.clear();
        if self.cap != 0 && mem::size_of::<T>() != 0 {
            // SAFETY: the block came from allocate(cap) and every element
            // has been dropped.
            unsafe { self.alloc.deallocate(self.ptr, self.cap) };
        }
    }
}

impl<T, A: AllocStrategy> Deref for HostVec<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: AllocStrategy> DerefMut for HostVec<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, A: AllocStrategy> fmt::Debug for HostVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::CallbackPair;
    use std::ffi::c_void;
    use std::rc::Rc;

    unsafe extern "C" fn null_alloc(_size: usize) -> *mut c_void {
        ptr::null_mut()
    }

    unsafe extern "C" fn ignore_free(_ptr: *mut c_void) {}

    #[test]
    fn push_pop_in_order() {
        let mut v = HostVec::new();
        for i in 0..100u32 {
            v.try_push(i).unwrap();
        }
        assert_eq!(v.len(), 100);
        assert!(v.capacity() >= 100);
        assert_eq!(v[42], 42);
        assert_eq!(v.pop(), Some(99));
        assert_eq!(v.iter().sum::<u32>(), (0..99).sum());
    }

    #[test]
    fn new_does_not_allocate() {
        let v: HostVec<u64> = HostVec::new();
        assert_eq!(v.capacity(), 0);
        assert!(v.is_empty());
        assert_eq!(v.as_slice(), &[] as &[u64]);
    }

    #[test]
    fn exhausted_host_leaves_buffer_untouched() {
        let host = HostAllocator::new(CallbackPair::new(null_alloc, ignore_free));
        let mut v: HostVec<u8, _> = HostVec::new_in(host);
        assert_eq!(
            v.try_push(1).unwrap_err(),
            AllocError::OutOfMemory {
                size: MIN_NON_ZERO_CAP
            }
        );
        assert!(v.is_empty());
        assert_eq!(v.capacity(), 0);
    }

    #[test]
    fn elements_dropped_exactly_once() {
        let marker = Rc::new(());
        {
            let mut v = HostVec::new();
            for _ in 0..10 {
                v.try_push(Rc::clone(&marker)).unwrap();
            }
            assert_eq!(Rc::strong_count(&marker), 11);
            v.truncate(4);
            assert_eq!(Rc::strong_count(&marker), 5);
        }
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    fn zero_sized_elements_never_allocate() {
        let host = HostAllocator::new(CallbackPair::new(null_alloc, ignore_free));
        let mut v: HostVec<(), _> = HostVec::new_in(host);
        for _ in 0..1000 {
            v.try_push(()).unwrap();
        }
        assert_eq!(v.len(), 1000);
        assert_eq!(v.capacity(), usize::MAX);
    }

    #[test]
    fn extend_from_slice_appends_clones() {
        let mut v = HostVec::with_capacity_in(2, HostAllocator::default()).unwrap();
        v.try_extend_from_slice(&["a".to_string(), "b".to_string(), "c".to_string()])
            .unwrap();
        assert_eq!(v.as_slice(), &["a", "b", "c"]);
        v.as_mut_slice()[1].push('!');
        assert_eq!(format!("{v:?}"), r#"["a", "b!", "c"]"#);
    }

    #[test]
    fn reserve_overflow_is_reported() {
        let mut v: HostVec<u32> = HostVec::new();
        v.try_push(1).unwrap();
        assert_eq!(
            v.try_reserve(usize::MAX).unwrap_err(),
            AllocError::CapacityOverflow
        );
        assert_eq!(v.as_slice(), &[1]);
    }
}
