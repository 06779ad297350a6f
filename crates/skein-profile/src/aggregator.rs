//! Process-wide accumulation of profiler samples.
//!
//! [`ProfileAggregator::record`] is the single entry point and may be
//! called from any thread concurrently; all state sits behind one lock.
//! The aggregator is append-only: statistics grow for the life of the
//! process and are never torn down.

use std::sync::OnceLock;

use indexmap::IndexMap;
use parking_lot::Mutex;

/// Destination for finished profiler samples.
pub trait SampleSink: Sync {
    /// Accept one sample. Must not panic.
    fn record(&self, label: &str, elapsed_seconds: f64);
}

/// Accumulated timing for one label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileStats {
    /// Number of samples.
    pub count: u64,
    /// Sum of all samples, in seconds.
    pub total_seconds: f64,
    /// Shortest sample, in seconds.
    pub min_seconds: f64,
    /// Longest sample, in seconds.
    pub max_seconds: f64,
    /// Most recent sample, in seconds.
    pub last_seconds: f64,
}

impl ProfileStats {
    fn first(seconds: f64) -> Self {
        Self {
            count: 1,
            total_seconds: seconds,
            min_seconds: seconds,
            max_seconds: seconds,
            last_seconds: seconds,
        }
    }

    fn add(&mut self, seconds: f64) {
        self.count += 1;
        self.total_seconds += seconds;
        self.min_seconds = self.min_seconds.min(seconds);
        self.max_seconds = self.max_seconds.max(seconds);
        self.last_seconds = seconds;
    }

    /// Mean sample, in seconds.
    pub fn mean_seconds(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_seconds / self.count as f64
        }
    }
}

/// Aggregator configuration.
#[derive(Clone, Debug)]
pub struct AggregatorConfig {
    /// Maximum number of distinct labels tracked.
    ///
    /// Default: 1024. Samples for labels beyond the limit are counted in
    /// [`ProfileAggregator::dropped_samples`] and otherwise discarded.
    pub max_labels: usize,
}

impl AggregatorConfig {
    /// Default distinct-label limit.
    pub const DEFAULT_MAX_LABELS: usize = 1024;
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_labels: Self::DEFAULT_MAX_LABELS,
        }
    }
}

#[derive(Default)]
struct Inner {
    stats: IndexMap<String, ProfileStats>,
    samples: u64,
    dropped: u64,
}

/// Label → [`ProfileStats`] map shared by every probe that records into it.
///
/// Labels keep the order in which they were first seen.
pub struct ProfileAggregator {
    config: AggregatorConfig,
    inner: Mutex<Inner>,
}

impl ProfileAggregator {
    /// An empty aggregator.
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// The configuration this aggregator was built with.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Add one sample. Negative or non-finite values count as zero.
    pub fn record(&self, label: &str, elapsed_seconds: f64) {
        let seconds = if elapsed_seconds.is_finite() {
            elapsed_seconds.max(0.0)
        } else {
            0.0
        };

        let mut inner = self.inner.lock();
        if let Some(stats) = inner.stats.get_mut(label) {
            stats.add(seconds);
        } else if inner.stats.len() < self.config.max_labels {
            tracing::debug!(target: "skein::profile", label, "new profiler label");
            inner
                .stats
                .insert(label.to_owned(), ProfileStats::first(seconds));
        } else {
            inner.dropped += 1;
            return;
        }
        inner.samples += 1;
    }

    /// Statistics for `label`, if any sample was recorded for it.
    pub fn get(&self, label: &str) -> Option<ProfileStats> {
        self.inner.lock().stats.get(label).copied()
    }

    /// Label and statistics at position `index` in first-seen order.
    pub fn entry(&self, index: usize) -> Option<(String, ProfileStats)> {
        self.inner
            .lock()
            .stats
            .get_index(index)
            .map(|(label, stats)| (label.clone(), *stats))
    }

    /// Copy of every label's statistics, in first-seen order.
    pub fn snapshot(&self) -> Vec<(String, ProfileStats)> {
        self.inner
            .lock()
            .stats
            .iter()
            .map(|(label, stats)| (label.clone(), *stats))
            .collect()
    }

    /// Number of distinct labels.
    pub fn label_count(&self) -> usize {
        self.inner.lock().stats.len()
    }

    /// Number of samples accepted.
    pub fn sample_count(&self) -> u64 {
        self.inner.lock().samples
    }

    /// Number of samples discarded because the label limit was reached.
    pub fn dropped_samples(&self) -> u64 {
        self.inner.lock().dropped
    }

    /// Write one `info` line per label to the `tracing` subscriber.
    pub fn report_to_log(&self) {
        for (label, s) in self.snapshot() {
            tracing::info!(
                target: "skein::profile",
                count = s.count,
                total_s = s.total_seconds,
                mean_s = s.mean_seconds(),
                min_s = s.min_seconds,
                max_s = s.max_seconds,
                "{label}"
            );
        }
    }
}

impl Default for ProfileAggregator {
    fn default() -> Self {
        Self::new(AggregatorConfig::default())
    }
}

impl SampleSink for ProfileAggregator {
    fn record(&self, label: &str, elapsed_seconds: f64) {
        ProfileAggregator::record(self, label, elapsed_seconds);
    }
}

static GLOBAL: OnceLock<ProfileAggregator> = OnceLock::new();

/// The process-wide aggregator, created on first use with the default
/// configuration.
pub fn global() -> &'static ProfileAggregator {
    GLOBAL.get_or_init(ProfileAggregator::default)
}
