//! C-compatible access to the process-wide profile aggregator.
//!
//! Labels keep first-seen order and are never removed, so an index read
//! after [`skein_profile_stat_count`] stays valid even while other threads
//! keep recording.

use std::ffi::c_char;

use skein_profile::{global, ProfileStats};

use crate::blob::SkeinErrorBlob;
use crate::entry::Entry;
use crate::status::SkeinStatus;

/// Statistics for one profiler label.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkeinProfileStat {
    /// Number of samples recorded.
    pub count: u64,
    /// Sum of all samples, in seconds.
    pub total_seconds: f64,
    /// Shortest sample, in seconds.
    pub min_seconds: f64,
    /// Longest sample, in seconds.
    pub max_seconds: f64,
    /// Most recent sample, in seconds.
    pub last_seconds: f64,
}

// 5 × 8-byte fields.
const _: () = assert!(std::mem::size_of::<SkeinProfileStat>() == 40);
const _: () = assert!(std::mem::align_of::<SkeinProfileStat>() == 8);

impl From<&ProfileStats> for SkeinProfileStat {
    fn from(s: &ProfileStats) -> Self {
        Self {
            count: s.count,
            total_seconds: s.total_seconds,
            min_seconds: s.min_seconds,
            max_seconds: s.max_seconds,
            last_seconds: s.last_seconds,
        }
    }
}

/// Number of distinct labels recorded so far.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn skein_profile_stat_count(out: *mut u32) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return SkeinStatus::InvalidArgument as i32;
        }
        let count = u32::try_from(global().label_count()).unwrap_or(u32::MAX);
        // SAFETY: out is valid per caller contract.
        unsafe { *out = count };
        SkeinStatus::Ok as i32
    })
}

/// Read the statistics of the label at `index` (0-based, first-seen order).
///
/// Writes the label into `name_buf` (up to `name_cap` bytes including the
/// NUL terminator; may be null) and the statistics into `out`. Failures
/// are described in `error_blob` when one is supplied.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn skein_profile_stat(
    index: u32,
    name_buf: *mut c_char,
    name_cap: usize,
    out: *mut SkeinProfileStat,
    error_blob: *mut SkeinErrorBlob,
) -> i32 {
    ffi_guard!({
        // SAFETY: error_blob is null or valid and exclusive per caller contract.
        let entry = unsafe { Entry::from_raw(std::ptr::null(), error_blob) };
        let reporter = entry.reporter();

        if out.is_null() {
            skein_core::report_error!(reporter, "skein_profile_stat: out is null");
            return SkeinStatus::InvalidArgument as i32;
        }

        let Some((label, stats)) = global().entry(index as usize) else {
            skein_core::report_error!(
                reporter,
                "skein_profile_stat: index {index} out of range ({} labels)",
                global().label_count()
            );
            return SkeinStatus::NotAvailable as i32;
        };

        // SAFETY: out is valid per caller contract; name_buf is null or
        // points to name_cap bytes.
        unsafe {
            *out = SkeinProfileStat::from(&stats);
            crate::copy_to_c_buf(&label, name_buf, name_cap);
        }
        SkeinStatus::Ok as i32
    })
}
