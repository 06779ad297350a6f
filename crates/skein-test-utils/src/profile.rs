//! Profiler fakes: a clock that replays a script and a sink that keeps
//! every sample.

use std::collections::VecDeque;

use parking_lot::Mutex;
use skein_core::ClockError;
use skein_profile::{SampleSink, TickClock};

/// A [`TickClock`] that returns scripted readings.
///
/// Once the script runs out, the last reading repeats.
pub struct ScriptedClock {
    frequency: Result<u64, ClockError>,
    ticks: Mutex<(VecDeque<Result<u64, ClockError>>, Result<u64, ClockError>)>,
}

impl ScriptedClock {
    /// A clock at `frequency` ticks per second that always reads zero.
    pub fn new(frequency: u64) -> Self {
        Self {
            frequency: Ok(frequency),
            ticks: Mutex::new((VecDeque::new(), Ok(0))),
        }
    }

    /// Queue successful readings.
    pub fn with_ticks(self, ticks: impl IntoIterator<Item = u64>) -> Self {
        self.ticks.lock().0.extend(ticks.into_iter().map(Ok));
        self
    }

    /// Queue one failing reading.
    pub fn then_fail(self, code: u32) -> Self {
        self.ticks
            .lock()
            .0
            .push_back(Err(ClockError::TimestampUnavailable { code }));
        self
    }

    /// Make the frequency query fail.
    pub fn without_frequency(mut self, code: u32) -> Self {
        self.frequency = Err(ClockError::FrequencyUnavailable { code });
        self
    }
}

impl TickClock for ScriptedClock {
    fn frequency(&self) -> Result<u64, ClockError> {
        self.frequency
    }

    fn now(&self) -> Result<u64, ClockError> {
        let mut guard = self.ticks.lock();
        let (queue, last) = &mut *guard;
        if let Some(next) = queue.pop_front() {
            *last = next;
        }
        *last
    }
}

/// A [`SampleSink`] that keeps every sample in arrival order.
#[derive(Default)]
pub struct RecordingSink {
    samples: Mutex<Vec<(String, f64)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> Vec<(String, f64)> {
        self.samples.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }
}

impl SampleSink for RecordingSink {
    fn record(&self, label: &str, elapsed_seconds: f64) {
        self.samples.lock().push((label.to_owned(), elapsed_seconds));
    }
}
