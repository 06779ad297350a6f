//! Error types for the Skein substrate.
//!
//! Organized by subsystem: allocation (host callback routing) and the
//! high-resolution clock behind the scoped profiler. Neither type ever
//! crosses the C boundary directly; `skein-ffi` maps them to status codes.

use thiserror::Error;

/// Errors from routing an allocation through an allocation strategy.
///
/// Returned in place of the out-of-memory exception a container would
/// otherwise raise. Internal code converts it into a status code and a
/// sink message before returning to the host.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AllocError {
    /// The host callback or the default allocator returned null.
    #[error("out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Number of bytes requested.
        size: usize,
    },
    /// The requested element count overflows the address space.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The element type needs a stronger alignment than a host
    /// callback can promise.
    #[error("alignment {align} exceeds the {max} bytes guaranteed by host allocators")]
    UnsupportedAlignment {
        /// Alignment the element type requires.
        align: usize,
        /// Largest alignment a host callback guarantees.
        max: usize,
    },
}

/// Errors from querying the tick clock.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    /// The tick frequency could not be determined.
    #[error("tick frequency query failed with error {code}")]
    FrequencyUnavailable {
        /// Platform error code, `0` when none is available.
        code: u32,
    },
    /// A timestamp could not be read.
    #[error("timestamp query failed with error {code}")]
    TimestampUnavailable {
        /// Platform error code, `0` when none is available.
        code: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_memory_mentions_size() {
        let e = AllocError::OutOfMemory { size: 4096 };
        assert_eq!(e.to_string(), "out of memory: failed to allocate 4096 bytes");
    }

    #[test]
    fn alignment_error_mentions_both_values() {
        let e = AllocError::UnsupportedAlignment { align: 64, max: 16 };
        let msg = e.to_string();
        assert!(msg.contains("64"));
        assert!(msg.contains("16"));
    }

    #[test]
    fn clock_errors_carry_code() {
        assert_eq!(
            ClockError::TimestampUnavailable { code: 87 }.to_string(),
            "timestamp query failed with error 87"
        );
        assert_eq!(
            ClockError::FrequencyUnavailable { code: 0 }.to_string(),
            "tick frequency query failed with error 0"
        );
    }
}
