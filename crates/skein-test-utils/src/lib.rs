//! Test utilities and fake hosts for Skein development.
//!
//! - [`alloc`]: allocation strategies that count, verify, or fail.
//! - [`host`]: `extern "C"` callback pairs standing in for a host allocator.
//! - [`profile`]: a scripted clock and a recording sample sink.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod alloc;
pub mod host;
pub mod profile;

pub use alloc::{CountingAllocator, FailingAllocator};
pub use host::{
    counting_pair, exhausted_pair, host_stats, reset_host_stats, set_host_budget, HostStats,
};
pub use profile::{RecordingSink, ScriptedClock};
