//! Benchmark workloads for the Skein SDK substrate.
//!
//! - [`prefix_sums`]: an instrumented hot path that allocates one buffer
//!   through the caller's allocator, used to compare enabled and disabled
//!   profiling builds.
//! - [`fill_buffer`]: pure container growth, used to compare host
//!   callbacks against the default allocator.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use skein_alloc::{alloc_boundary, AllocError, AllocStrategy, HostVec};
use skein_core::Reporter;

/// Running sums of `input`, in a buffer from `alloc`.
pub fn prefix_sums<A: AllocStrategy>(
    input: &[f32],
    alloc: A,
    reporter: Reporter<'_>,
) -> Result<HostVec<f32, A>, AllocError> {
    skein_profile::profile_scope!(prefix_sums_pass, reporter);
    prefix_sums_pass.start();

    alloc_boundary(reporter, "prefix sums", || {
        let mut out = HostVec::with_capacity_in(input.len(), alloc)?;
        let mut acc = 0.0;
        for x in input {
            acc += x;
            out.try_push(acc)?;
        }
        Ok(out)
    })
}

/// Push `n` elements one at a time, starting from an empty buffer.
pub fn fill_buffer<A: AllocStrategy>(n: usize, alloc: A) -> Result<HostVec<u64, A>, AllocError> {
    let mut out = HostVec::new_in(alloc);
    for i in 0..n as u64 {
        out.try_push(i)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_alloc::HostAllocator;

    #[test]
    fn prefix_sums_accumulate() {
        let out = prefix_sums(&[1.0, 2.0, 3.0], HostAllocator::default(), Reporter::none()).unwrap();
        assert_eq!(out.as_slice(), &[1.0, 3.0, 6.0]);
    }

    #[test]
    fn fill_buffer_counts_up() {
        let out = fill_buffer(100, HostAllocator::default()).unwrap();
        assert_eq!(out.len(), 100);
        assert_eq!(out[99], 99);
    }
}
