//! The measuring probe.
//!
//! ```text
//!            new(Some, Some)           start()              drop
//! Uninitialized ──────────────► Armed ─────────► Started ─────────► Finalized
//!       │                         │                 │ stop() (end stamp, stays Started)
//!       │ new(None, _)            └── drop: no sample
//!       └──────────────► Disabled (every call is a no-op)
//! ```
//!
//! Finalization happens only in `Drop`, so a region with many exit paths
//! records exactly one sample if it started and none if it did not.

use std::fmt;

use skein_core::Reporter;

use crate::aggregator::{global, SampleSink};
use crate::clock::{TickClock, MONOTONIC};
use crate::label::Label;

/// Lifecycle state of a [`ScopedProfiler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfilerState {
    /// Permanently inert; never records.
    Disabled,
    /// Ready to start.
    Armed,
    /// Measuring (or stopped and waiting for finalization).
    Started,
    /// Sample forwarded; only observable during teardown.
    Finalized,
}

/// RAII timer bound to a labelled code region.
pub struct ScopedProfiler<'a> {
    label: Label,
    state: ProfilerState,
    frequency: Option<u64>,
    start: Option<u64>,
    end: Option<u64>,
    stopped: bool,
    reporter: Reporter<'a>,
    clock: &'a dyn TickClock,
    samples: &'a dyn SampleSink,
}

impl<'a> ScopedProfiler<'a> {
    /// A probe on the monotonic clock that records into the [`global`]
    /// aggregator.
    ///
    /// Without both a name and a region the probe is [`Disabled`](ProfilerState::Disabled).
    pub fn new(name: Option<&str>, region: Option<&str>, reporter: Reporter<'a>) -> Self {
        Self::with_parts(name, region, reporter, &MONOTONIC, global())
    }

    /// Shorthand for [`new`](Self::new) with both components present; the
    /// form `profile_scope!` expands to.
    pub fn declare(name: &'static str, region: &'static str, reporter: Reporter<'a>) -> Self {
        Self::new(Some(name), Some(region), reporter)
    }

    /// A probe with an explicit clock and sample destination.
    ///
    /// Queries the tick frequency once. If that fails the error is
    /// reported and the probe still arms; its samples will read as zero.
    pub fn with_parts(
        name: Option<&str>,
        region: Option<&str>,
        reporter: Reporter<'a>,
        clock: &'a dyn TickClock,
        samples: &'a dyn SampleSink,
    ) -> Self {
        let (Some(name), Some(region)) = (name, region) else {
            return Self {
                label: Label::empty(),
                state: ProfilerState::Disabled,
                frequency: None,
                start: None,
                end: None,
                stopped: false,
                reporter,
                clock,
                samples,
            };
        };

        let label = Label::compose(name, region);
        let frequency = match clock.frequency() {
            Ok(0) => {
                skein_core::report_error!(reporter, "[{label}] tick frequency query returned zero");
                None
            }
            Ok(f) => Some(f),
            Err(e) => {
                skein_core::report_error!(reporter, "[{label}] {e}");
                None
            }
        };

        Self {
            label,
            state: ProfilerState::Armed,
            frequency,
            start: None,
            end: None,
            stopped: false,
            reporter,
            clock,
            samples,
        }
    }

    /// A permanently disabled probe.
    pub fn disabled() -> Self {
        Self::new(None, None, Reporter::none())
    }

    /// Current state.
    pub fn state(&self) -> ProfilerState {
        self.state
    }

    /// The composed label, or `None` when disabled.
    pub fn label(&self) -> Option<&str> {
        (self.state != ProfilerState::Disabled).then(|| self.label.as_str())
    }

    /// Record the start timestamp. Only the first call on an armed probe
    /// has any effect.
    ///
    /// A failed timestamp query is reported and the probe still counts as
    /// started.
    pub fn start(&mut self) {
        if self.state != ProfilerState::Armed {
            return;
        }
        self.start = self.query();
        self.state = ProfilerState::Started;
    }

    /// Record the end timestamp. Only the first call on a started probe
    /// has any effect; the sample is still recorded at drop.
    pub fn stop(&mut self) {
        if self.state != ProfilerState::Started || self.stopped {
            return;
        }
        self.end = self.query();
        self.stopped = true;
    }

    /// Measured interval in seconds, available once stopped.
    pub fn elapsed(&self) -> Option<f64> {
        self.stopped.then(|| self.seconds())
    }

    /// The raw start timestamp, if one was recorded.
    pub fn start_ticks(&self) -> Option<u64> {
        self.start
    }

    fn query(&self) -> Option<u64> {
        match self.clock.now() {
            Ok(t) => Some(t),
            Err(e) => {
                skein_core::report_error!(self.reporter, "[{}] {e}", self.label);
                None
            }
        }
    }

    fn seconds(&self) -> f64 {
        match (self.start, self.end, self.frequency) {
            (Some(start), Some(end), Some(freq)) if end >= start => {
                (end - start) as f64 / freq as f64
            }
            _ => 0.0,
        }
    }
}

impl Drop for ScopedProfiler<'_> {
    fn drop(&mut self) {
        if self.state != ProfilerState::Started {
            return;
        }
        self.stop();
        let seconds = self.seconds();
        self.samples.record(self.label.as_str(), seconds);
        self.state = ProfilerState::Finalized;
    }
}

impl fmt::Debug for ScopedProfiler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedProfiler")
            .field("label", &self.label)
            .field("state", &self.state)
            .field("frequency", &self.frequency)
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}
