//! Scoped instrumentation timers for the Skein SDK substrate.
//!
//! A [`ScopedProfiler`] brackets a code region: it is declared at the top of
//! the region, started explicitly, and finalized when it goes out of scope,
//! on whichever path the region exits by. Finalization forwards one
//! `(label, seconds)` sample to a [`SampleSink`], normally the process-wide
//! [`ProfileAggregator`] returned by [`global`].
//!
//! # Compile-time switch
//!
//! The `profiling` feature selects what [`Probe`] (and so
//! [`profile_scope!`]) expands to:
//!
//! - enabled: [`ScopedProfiler`], which measures and records;
//! - disabled: [`NoopProfiler`], a zero-sized type whose methods are empty.
//!
//! There is no runtime toggle.
//!
//! ```
//! use skein_core::Reporter;
//!
//! fn build_lut(reporter: Reporter<'_>) -> usize {
//!     skein_profile::profile_scope!(lut, reporter);
//!     lut.start();
//!     (0..64).sum()
//! }
//!
//! assert_eq!(build_lut(Reporter::none()), 2016);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aggregator;
pub mod clock;
pub mod label;
pub mod noop;
pub mod scoped;

pub use aggregator::{global, AggregatorConfig, ProfileAggregator, ProfileStats, SampleSink};
pub use clock::{MonotonicClock, TickClock, MONOTONIC};
pub use label::Label;
pub use noop::NoopProfiler;
pub use scoped::{ProfilerState, ScopedProfiler};

/// `true` when the crate was built with the `profiling` feature.
pub const ENABLED: bool = cfg!(feature = "profiling");

/// The probe type [`profile_scope!`] declares.
#[cfg(feature = "profiling")]
pub type Probe<'a> = ScopedProfiler<'a>;

/// The probe type [`profile_scope!`] declares.
#[cfg(not(feature = "profiling"))]
pub type Probe<'a> = NoopProfiler<'a>;

#[doc(hidden)]
pub mod __private {
    pub use skein_core::Reporter;

    /// Last path segment of a `type_name` produced inside a function body.
    pub fn region_name(raw: &'static str) -> &'static str {
        let mut name = raw.strip_suffix("::__region").unwrap_or(raw);
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        name.rsplit("::").next().unwrap_or(name)
    }
}

/// Name of the enclosing function, without its module path.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __region() {}
        $crate::__private::region_name(::std::any::type_name_of_val(&__region))
    }};
}

/// Declare a probe named `$name` for the enclosing function.
///
/// Expands to a `let` binding of [`Probe`]. The label is composed from the
/// binding name and the enclosing function's name. Call `$name.start()` at
/// the point measurement should begin; the sample is recorded when the
/// binding goes out of scope.
#[macro_export]
macro_rules! profile_scope {
    ($name:ident, $reporter:expr) => {
        #[allow(unused_mut)]
        let mut $name = $crate::Probe::declare(
            ::core::stringify!($name),
            $crate::function_name!(),
            $reporter,
        );
    };
    ($name:ident) => {
        $crate::profile_scope!($name, $crate::__private::Reporter::none());
    };
}
