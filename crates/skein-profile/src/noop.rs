//! The probe used when instrumentation is compiled out.

use std::marker::PhantomData;

use skein_core::Reporter;

/// Zero-sized stand-in for [`ScopedProfiler`](crate::ScopedProfiler).
///
/// Has the same declaration and start/stop surface, does nothing, and has
/// no `Drop` impl, so an instrumented region compiles to the code it would
/// be without the probe.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopProfiler<'a> {
    _reporter: PhantomData<Reporter<'a>>,
}

impl<'a> NoopProfiler<'a> {
    /// Declare a probe. Ignores every argument.
    #[inline(always)]
    pub fn declare(_name: &'static str, _region: &'static str, _reporter: Reporter<'a>) -> Self {
        Self {
            _reporter: PhantomData,
        }
    }

    /// Does nothing.
    #[inline(always)]
    pub fn start(&mut self) {}

    /// Does nothing.
    #[inline(always)]
    pub fn stop(&mut self) {}

    /// Always `None`: nothing is measured.
    #[inline(always)]
    pub fn elapsed(&self) -> Option<f64> {
        None
    }
}
