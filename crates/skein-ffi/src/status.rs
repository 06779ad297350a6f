//! C-compatible status codes.
//!
//! [`SkeinStatus`] is a `repr(i32)` enum covering every failure an export
//! can return. Allocation errors map through `From<&AllocError>`.

use skein_core::AllocError;

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkeinStatus {
    /// Success.
    Ok = 0,
    /// A required pointer is null or an argument is out of range.
    InvalidArgument = -1,
    /// The host allocator (or the default one) returned null.
    AllocationFailed = -2,
    /// An element type needs more alignment than host callbacks provide.
    UnsupportedAlignment = -3,
    /// A requested size overflows the address space.
    CapacityOverflow = -4,
    /// The requested item does not exist.
    NotAvailable = -5,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&AllocError> for SkeinStatus {
    fn from(e: &AllocError) -> Self {
        match e {
            AllocError::OutOfMemory { .. } => SkeinStatus::AllocationFailed,
            AllocError::CapacityOverflow => SkeinStatus::CapacityOverflow,
            AllocError::UnsupportedAlignment { .. } => SkeinStatus::UnsupportedAlignment,
        }
    }
}

impl From<SkeinStatus> for i32 {
    fn from(s: SkeinStatus) -> Self {
        s as i32
    }
}
