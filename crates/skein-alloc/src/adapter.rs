//! Typed view over an [`AllocStrategy`].

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use skein_core::AllocError;

use crate::host::HostAllocator;
use crate::strategy::AllocStrategy;

/// Allocates arrays of `T` through a strategy.
///
/// Holds nothing but the strategy. [`rebind`](Self::rebind) produces an
/// adapter for another element type that routes through the same
/// strategy, and adapters compare equal exactly when their strategies do,
/// whatever their element types.
pub struct Adapter<T, A: AllocStrategy = HostAllocator> {
    strategy: A,
    _elem: PhantomData<fn() -> T>,
}

impl<T, A: AllocStrategy> Adapter<T, A> {
    /// Wrap a strategy.
    pub const fn new(strategy: A) -> Self {
        Self {
            strategy,
            _elem: PhantomData,
        }
    }

    /// The underlying strategy.
    pub fn strategy(&self) -> &A {
        &self.strategy
    }

    /// An adapter for element type `U` sharing this strategy.
    pub fn rebind<U>(&self) -> Adapter<U, A>
    where
        A: Clone,
    {
        Adapter::new(self.strategy.clone())
    }

    /// Allocate room for `n` elements.
    ///
    /// Zero-sized requests return a dangling pointer without touching the
    /// strategy.
    pub fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let layout = Layout::array::<T>(n).map_err(|_| AllocError::CapacityOverflow)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        self.strategy.allocate(layout).map(NonNull::cast)
    }

    /// Release room for `n` elements.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate(n)` on an adapter with an equal
    /// strategy and not have been released since. Any elements still in
    /// the block are not dropped.
    pub unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        let Ok(layout) = Layout::array::<T>(n) else {
            return;
        };
        if layout.size() == 0 {
            return;
        }
        // SAFETY: same layout as the matching allocate call.
        unsafe { self.strategy.deallocate(ptr.cast(), layout) }
    }
}

impl<T, A: AllocStrategy + Clone> Clone for Adapter<T, A> {
    fn clone(&self) -> Self {
        Self::new(self.strategy.clone())
    }
}

impl<T, A: AllocStrategy + Copy> Copy for Adapter<T, A> {}

impl<T, A: AllocStrategy + Default> Default for Adapter<T, A> {
    fn default() -> Self {
        Self::new(A::default())
    }
}

impl<T, U, A: AllocStrategy + PartialEq> PartialEq<Adapter<U, A>> for Adapter<T, A> {
    fn eq(&self, other: &Adapter<U, A>) -> bool {
        self.strategy == other.strategy
    }
}

impl<T, A: AllocStrategy + Eq> Eq for Adapter<T, A> {}

impl<T, A: AllocStrategy + fmt::Debug> fmt::Debug for Adapter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("elem", &std::any::type_name::<T>())
            .field("strategy", &self.strategy)
            .finish()
    }
}
