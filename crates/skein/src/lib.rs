//! Skein: allocation, diagnostics and profiling substrate for native SDKs.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Skein sub-crates. SDK code that sits behind a C ABI uses it to
//!
//! - route every internal buffer through an allocator the host supplies,
//! - report failures into a caller-owned sink instead of unwinding,
//! - time hot paths with probes that vanish when profiling is compiled out.
//!
//! # Quick start
//!
//! ```rust
//! use skein::prelude::*;
//! use std::cell::RefCell;
//!
//! fn normalize(weights: &[f32], alloc: HostAllocator, reporter: Reporter<'_>)
//!     -> Result<HostVec<f32>, AllocError>
//! {
//!     profile_scope!(normalize_pass, reporter);
//!     normalize_pass.start();
//!
//!     alloc_boundary(reporter, "normalized weights", || {
//!         let total: f32 = weights.iter().sum();
//!         if total == 0.0 {
//!             report_warning!(reporter, "all {} weights are zero", weights.len());
//!         }
//!         let mut out = HostVec::with_capacity_in(weights.len(), alloc)?;
//!         for w in weights {
//!             out.try_push(if total == 0.0 { 0.0 } else { w / total })?;
//!         }
//!         Ok(out)
//!     })
//! }
//!
//! let sink = RefCell::new(String::new());
//! let out = normalize(&[1.0, 3.0], HostAllocator::default(), Reporter::new(&sink)).unwrap();
//! assert_eq!(out.as_slice(), &[0.25, 0.75]);
//!
//! normalize(&[0.0; 2], HostAllocator::default(), Reporter::new(&sink)).unwrap();
//! assert_eq!(*sink.borrow(), "Warning: all 2 weights are zero\n");
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `skein-core` | Error types, the error sink and `Reporter`, limits |
//! | [`alloc`] | `skein-alloc` | Callback pairs, `HostAllocator`, `HostVec`, failure boundary |
//! | [`profile`] | `skein-profile` | Scoped profiler, aggregator, `profile_scope!` |
//! | [`ffi`] | `skein-ffi` | C ABI types and exports |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Error types, diagnostic sinks and limits (`skein-core`).
pub use skein_core as core;

/// Host-routable allocation (`skein-alloc`).
///
/// [`alloc::HostAllocator`] wraps a host callback pair;
/// [`alloc::HostVec`] is the fallible buffer built on it.
pub use skein_alloc as alloc;

/// Scoped instrumentation (`skein-profile`).
///
/// [`profile::ScopedProfiler`] measures one region;
/// [`profile::global`] returns the aggregator samples land in.
pub use skein_profile as profile;

/// C ABI (`skein-ffi`).
pub use skein_ffi as ffi;

pub use skein_core::{report_error, report_warning};
pub use skein_profile::{function_name, profile_scope};

/// Common imports for SDK internals.
///
/// ```rust
/// use skein::prelude::*;
/// ```
pub mod prelude {
    // Diagnostics
    pub use skein_core::{report_error, report_warning, AllocError, ErrorSink, Reporter, Severity};

    // Allocation
    pub use skein_alloc::{alloc_boundary, AllocStrategy, CallbackPair, HostAllocator, HostVec};

    // Profiling
    pub use skein_profile::{profile_scope, Probe, ScopedProfiler};

    // C boundary
    pub use skein_ffi::{Entry, SkeinStatus};
}
