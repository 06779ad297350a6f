//! Host-routable allocation for the Skein SDK substrate.
//!
//! A host may hand the SDK a pair of allocate/deallocate callbacks at any
//! entry point. This crate turns that pair into an allocation strategy the
//! internal code can use for every buffer it creates, and supplies the
//! fallible container those buffers live in. It is one of two crates that
//! may contain `unsafe` code (along with `skein-ffi`).
//!
//! # Layering
//!
//! ```text
//! CallbackPair (host fn pointers, Copy)
//! └── HostAllocator: AllocStrategy (byte-level, falls back to the global allocator)
//!     └── Adapter<T, A> (typed element arrays, rebinding)
//!         └── HostVec<T, A> (growable buffer, every growth returns Result)
//! ```
//!
//! Allocation failure is a value ([`AllocError`]), never a panic. Entry
//! points convert it into a status code plus a sink message with
//! [`alloc_boundary`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod boundary;
pub mod callback;
pub mod host;
pub mod strategy;
pub mod vec;

pub use adapter::Adapter;
pub use boundary::alloc_boundary;
pub use callback::{AllocateFn, CallbackPair, DeallocateFn};
pub use host::HostAllocator;
pub use skein_core::AllocError;
pub use strategy::AllocStrategy;
pub use vec::HostVec;
