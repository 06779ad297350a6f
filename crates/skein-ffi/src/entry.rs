//! Per-call context for an SDK entry point.
//!
//! Every export that allocates or reports takes a nullable
//! `const SkeinAllocator*` and a nullable `SkeinErrorBlob*`. [`Entry`]
//! turns that pair into the [`HostAllocator`] and [`Reporter`] internal
//! code works with, and [`Entry::run`] is the failure boundary that turns
//! an allocation error into a status code plus blob text.

#![allow(unsafe_code)]

use skein_alloc::{alloc_boundary, HostAllocator};
use skein_core::{AllocError, ErrorSink, Reporter};

use crate::blob::{BlobSink, SkeinErrorBlob};
use crate::status::SkeinStatus;
use crate::types::SkeinAllocator;

/// Allocator and diagnostic channel for the duration of one call.
pub struct Entry<'a> {
    allocator: HostAllocator,
    sink: Option<BlobSink<'a>>,
}

impl<'a> Entry<'a> {
    /// Build the context from the raw arguments of an export.
    ///
    /// # Safety
    ///
    /// `allocator` must be null or valid for reads. `error_blob` must be
    /// null or satisfy [`BlobSink::from_raw`] for `'a`.
    pub unsafe fn from_raw(
        allocator: *const SkeinAllocator,
        error_blob: *mut SkeinErrorBlob,
    ) -> Self {
        // SAFETY: forwarded from the caller contract.
        let pair = unsafe { allocator.as_ref() }.copied().unwrap_or_default();
        Self {
            allocator: HostAllocator::from(pair),
            // SAFETY: forwarded from the caller contract.
            sink: unsafe { BlobSink::from_raw(error_blob) },
        }
    }

    /// Build the context from Rust-side values.
    pub fn new(allocator: HostAllocator, error_blob: Option<&'a mut SkeinErrorBlob>) -> Self {
        Self {
            allocator,
            sink: error_blob.map(BlobSink::new),
        }
    }

    /// The allocator every buffer of this call goes through.
    pub fn allocator(&self) -> HostAllocator {
        self.allocator
    }

    /// Reporter appending to the host's blob, or discarding if none.
    pub fn reporter(&self) -> Reporter<'_> {
        Reporter::from_option(self.sink.as_ref().map(|s| s as &dyn ErrorSink))
    }

    /// Run `body` behind an allocation failure boundary.
    ///
    /// On failure the error is appended to the blob, prefixed with `what`,
    /// and returned as a status code.
    pub fn run<T>(
        &self,
        what: &str,
        body: impl FnOnce(HostAllocator, Reporter<'_>) -> Result<T, AllocError>,
    ) -> Result<T, SkeinStatus> {
        let reporter = self.reporter();
        alloc_boundary(reporter, what, || body(self.allocator, reporter))
            .map_err(|e| SkeinStatus::from(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_alloc::HostVec;
    use std::ffi::c_void;
    use std::ptr;

    unsafe extern "C" fn null_alloc(_size: usize) -> *mut c_void {
        ptr::null_mut()
    }

    unsafe extern "C" fn ignore_free(_ptr: *mut c_void) {}

    #[test]
    fn null_arguments_use_defaults() {
        // SAFETY: nulls are always accepted.
        let entry = unsafe { Entry::from_raw(ptr::null(), ptr::null_mut()) };
        assert!(entry.allocator().is_default());
        assert!(!entry.reporter().is_attached());
        let sum = entry
            .run("sum", |alloc, _| {
                let mut v = HostVec::new_in(alloc);
                v.try_extend_from_slice(&[1u32, 2, 3])?;
                Ok(v.iter().sum::<u32>())
            })
            .unwrap();
        assert_eq!(sum, 6);
    }

    #[test]
    fn failure_becomes_status_and_blob_text() {
        let exhausted = SkeinAllocator {
            allocate: Some(null_alloc),
            deallocate: Some(ignore_free),
        };
        let mut blob = SkeinErrorBlob::default();
        {
            // SAFETY: both pointers are valid and unaliased for the block.
            let entry = unsafe { Entry::from_raw(&exhausted, &mut blob) };
            let status = entry
                .run("vertex weights", |alloc, _| HostVec::<f64, _>::with_capacity_in(8, alloc))
                .unwrap_err();
            assert_eq!(status, SkeinStatus::AllocationFailed);
        }
        assert_eq!(
            blob.text(),
            Some("Error: vertex weights: out of memory: failed to allocate 64 bytes\n")
        );
        crate::skein_error_blob_free(&mut blob);
    }

    #[test]
    fn body_can_report_warnings() {
        let mut blob = SkeinErrorBlob::default();
        {
            let entry = Entry::new(HostAllocator::default(), Some(&mut blob));
            entry
                .run("smoothing", |_, r| {
                    skein_core::report_warning!(r, "degenerate triangle {} skipped", 7);
                    Ok(())
                })
                .unwrap();
        }
        assert_eq!(blob.text(), Some("Warning: degenerate triangle 7 skipped\n"));
        crate::skein_error_blob_free(&mut blob);
    }
}
