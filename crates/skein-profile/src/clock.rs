//! High-resolution tick source.

use std::sync::OnceLock;
use std::time::Instant;

use skein_core::ClockError;

/// A monotonic counter with a known tick rate.
///
/// Either query may fail; callers degrade rather than abort.
pub trait TickClock: Sync {
    /// Ticks per second.
    fn frequency(&self) -> Result<u64, ClockError>;

    /// Current tick count.
    fn now(&self) -> Result<u64, ClockError>;
}

/// Nanosecond ticks since the first query in this process.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

/// Shared instance used by probes that are not given a clock.
pub static MONOTONIC: MonotonicClock = MonotonicClock;

static EPOCH: OnceLock<Instant> = OnceLock::new();

impl TickClock for MonotonicClock {
    fn frequency(&self) -> Result<u64, ClockError> {
        Ok(1_000_000_000)
    }

    fn now(&self) -> Result<u64, ClockError> {
        let epoch = EPOCH.get_or_init(Instant::now);
        // u64 nanoseconds cover ~584 years of uptime.
        Ok(epoch.elapsed().as_nanos() as u64)
    }
}
