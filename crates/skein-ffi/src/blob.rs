//! The error blob: the C side of an [`ErrorSink`].
//!
//! A host passes a `SkeinErrorBlob*` to an entry point. Each diagnostic
//! appended during the call grows `msg`, a NUL-terminated string living in
//! memory from the blob's own allocator, so the host releases it through
//! [`skein_error_blob_free`] (or directly with its deallocate callback).

#![allow(unsafe_code)]

use std::ffi::{c_char, CStr};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use skein_alloc::HostAllocator;
use skein_core::ErrorSink;

use crate::status::SkeinStatus;
use crate::types::SkeinAllocator;

/// Accumulated diagnostic text.
#[repr(C)]
#[derive(Debug)]
pub struct SkeinErrorBlob {
    /// NUL-terminated text, or null when nothing was reported.
    pub msg: *mut c_char,
    /// Allocator `msg` is obtained from and released through.
    pub allocator: SkeinAllocator,
}

impl Default for SkeinErrorBlob {
    fn default() -> Self {
        Self {
            msg: ptr::null_mut(),
            allocator: SkeinAllocator::default(),
        }
    }
}

impl SkeinErrorBlob {
    /// A blob whose text is allocated through `allocator`.
    pub fn with_allocator(allocator: SkeinAllocator) -> Self {
        Self {
            msg: ptr::null_mut(),
            allocator,
        }
    }

    /// The accumulated text, if any.
    pub fn text(&self) -> Option<&str> {
        if self.msg.is_null() {
            return None;
        }
        // SAFETY: a non-null msg is always a NUL-terminated string written
        // by BlobSink.
        unsafe { CStr::from_ptr(self.msg) }.to_str().ok()
    }
}

/// [`ErrorSink`] appending into a borrowed [`SkeinErrorBlob`].
pub struct BlobSink<'a> {
    blob: NonNull<SkeinErrorBlob>,
    host: HostAllocator,
    _blob: PhantomData<&'a mut SkeinErrorBlob>,
}

impl<'a> BlobSink<'a> {
    /// Borrow a blob from the host; `None` if `blob` is null.
    ///
    /// # Safety
    ///
    /// A non-null `blob` must be valid for reads and writes for `'a`, not
    /// be accessed by anything else meanwhile, and hold either a null
    /// `msg` or one produced by an earlier `BlobSink` with the same
    /// allocator.
    pub unsafe fn from_raw(blob: *mut SkeinErrorBlob) -> Option<Self> {
        let blob = NonNull::new(blob)?;
        // SAFETY: non-null blob is readable per the caller contract.
        let allocator = unsafe { (*blob.as_ptr()).allocator };
        Some(Self {
            blob,
            host: HostAllocator::from(allocator),
            _blob: PhantomData,
        })
    }

    /// Borrow a blob owned on the Rust side.
    pub fn new(blob: &'a mut SkeinErrorBlob) -> Self {
        Self {
            host: HostAllocator::from(blob.allocator),
            blob: NonNull::from(blob),
            _blob: PhantomData,
        }
    }

    /// The allocator the text grows through, normalized once at borrow.
    pub fn allocator(&self) -> HostAllocator {
        self.host
    }
}

impl ErrorSink for BlobSink<'_> {
    fn append(&self, text: &str) {
        // Interior NULs would hide everything after them from C readers.
        let text = text.split('\0').next().unwrap_or_default();
        if text.is_empty() {
            return;
        }

        let blob = self.blob.as_ptr();
        // SAFETY: exclusive access for 'a per the constructor contract.
        let old = unsafe { (*blob).msg };
        let host = self.host;
        let old_len = if old.is_null() {
            0
        } else {
            // SAFETY: non-null msg is NUL-terminated.
            unsafe { CStr::from_ptr(old) }.to_bytes().len()
        };

        let new_len = old_len + text.len();
        let new = match host.allocate_bytes(new_len + 1) {
            Ok(p) => p.as_ptr(),
            Err(e) => {
                tracing::warn!(target: "skein::ffi", error = %e, "diagnostic dropped: error blob could not grow");
                return;
            }
        };

        // SAFETY: new holds new_len + 1 bytes; old holds old_len + 1.
        unsafe {
            if !old.is_null() {
                ptr::copy_nonoverlapping(old.cast::<u8>(), new, old_len);
            }
            ptr::copy_nonoverlapping(text.as_ptr(), new.add(old_len), text.len());
            *new.add(new_len) = 0;
            (*blob).msg = new.cast();
            host.release_bytes(old.cast(), old_len + 1);
        }
    }
}

/// Release the text accumulated in `blob` and reset `msg` to null.
///
/// A null `blob` or a blob with null `msg` is a no-op.
#[no_mangle]
pub extern "C" fn skein_error_blob_free(blob: *mut SkeinErrorBlob) -> i32 {
    ffi_guard!({
        // SAFETY: blob is null or valid per caller contract.
        let Some(blob) = (unsafe { blob.as_mut() }) else {
            return SkeinStatus::Ok as i32;
        };
        if blob.msg.is_null() {
            return SkeinStatus::Ok as i32;
        }
        // SAFETY: non-null msg is NUL-terminated.
        let len = unsafe { CStr::from_ptr(blob.msg) }.to_bytes().len();
        let host = HostAllocator::from(blob.allocator);
        // SAFETY: msg came from allocate_bytes(len + 1) on this allocator.
        unsafe { host.release_bytes(blob.msg.cast(), len + 1) };
        blob.msg = ptr::null_mut();
        SkeinStatus::Ok as i32
    })
}
