//! Core types for the Skein SDK substrate.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! error types shared by the allocation and profiling crates, the bounds
//! applied to diagnostic text and profiler labels, and the Error Sink
//! channel through which internal failures reach the host.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod limits;
pub mod sink;

pub use error::{AllocError, ClockError};
pub use sink::{ErrorSink, Reporter, Severity};
