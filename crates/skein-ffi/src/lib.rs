//! C ABI for the Skein SDK substrate.
//!
//! Exposes allocator injection, the error blob an entry point appends
//! diagnostics to, and read access to the profile aggregator. This crate
//! is one of two that may contain `unsafe` code (along with `skein-alloc`).
//!
//! Every export is wrapped in [`ffi_guard!`]: a Rust panic never unwinds
//! into the host. It is caught, its message is kept for
//! [`skein_last_panic_message`], and the call returns
//! [`SkeinStatus::Panicked`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

thread_local! {
    /// Message of the most recent panic caught by `ffi_guard!` on this thread.
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Run an export body, converting a panic into `SkeinStatus::Panicked`.
///
/// The body must evaluate to an `i32` status; early `return`s inside it
/// leave the guarded closure, not the enclosing function.
macro_rules! ffi_guard {
    ($body:block) => {{
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(status) => status,
            Err(payload) => {
                let msg = $crate::panic_message(payload.as_ref());
                tracing::error!(target: "skein::ffi", panic = %msg, "panic caught at C boundary");
                $crate::LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
                $crate::status::SkeinStatus::Panicked as i32
            }
        }
    }};
}

pub mod blob;
pub mod entry;
pub mod profile;
pub mod status;
pub mod types;

pub use blob::{skein_error_blob_free, BlobSink, SkeinErrorBlob};
pub use entry::Entry;
pub use profile::{skein_profile_stat, skein_profile_stat_count, SkeinProfileStat};
pub use status::SkeinStatus;
pub use types::SkeinAllocator;

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_owned()
    }
}

/// Copy `text` into a caller buffer of `cap` bytes, NUL-terminated.
///
/// Copies at most `cap - 1` bytes, cut back to a UTF-8 boundary. Does
/// nothing when `buf` is null or `cap` is zero.
///
/// # Safety
///
/// `buf` must be null or valid for writes of `cap` bytes.
#[allow(unsafe_code)]
pub(crate) unsafe fn copy_to_c_buf(text: &str, buf: *mut c_char, cap: usize) {
    if buf.is_null() || cap == 0 {
        return;
    }
    let part = skein_core::limits::truncate_utf8(text, cap - 1);
    // SAFETY: buf points to cap valid bytes and part.len() < cap.
    unsafe {
        std::ptr::copy_nonoverlapping(part.as_ptr(), buf.cast::<u8>(), part.len());
        *buf.add(part.len()) = 0;
    }
}

/// Retrieve the message of the most recent panic caught on this thread.
///
/// Returns the full message length in bytes (0 if no panic was caught)
/// and copies as much as fits into `buf`, NUL-terminated. Pass a null
/// `buf` to query the length.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn skein_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        // SAFETY: buf is null or points to cap bytes per caller contract.
        unsafe { copy_to_c_buf(&msg, buf, cap) };
        i32::try_from(msg.len()).unwrap_or(i32::MAX)
    })
}
