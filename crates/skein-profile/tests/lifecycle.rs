//! Integration test: scoped profiler lifecycle against fake clocks and
//! sinks.
//!
//! Covers the recording guarantees a region relies on: a disabled probe
//! never records, a started probe records exactly once on every exit path,
//! an unstarted probe records nothing, and clock failures degrade to a
//! zero sample plus a diagnostic.

use std::cell::RefCell;
use std::thread;

use proptest::prelude::*;
use skein_core::Reporter;
use skein_profile::{ProfileAggregator, ProfilerState, ScopedProfiler, MONOTONIC};
use skein_test_utils::{RecordingSink, ScriptedClock};

const LABEL: &str = "skein_profiler: probe|region";

fn probe<'a>(clock: &'a ScriptedClock, sink: &'a RecordingSink) -> ScopedProfiler<'a> {
    ScopedProfiler::with_parts(Some("probe"), Some("region"), Reporter::none(), clock, sink)
}

// ── Recording guarantees ────────────────────────────────────────────

proptest! {
    #[test]
    fn disabled_probe_never_records(calls in proptest::collection::vec(any::<bool>(), 0..32)) {
        let clock = ScriptedClock::new(1_000);
        let sink = RecordingSink::new();
        {
            let mut p = ScopedProfiler::with_parts(None, Some("region"), Reporter::none(), &clock, &sink);
            for start in calls {
                if start { p.start() } else { p.stop() }
            }
            prop_assert_eq!(p.state(), ProfilerState::Disabled);
        }
        prop_assert!(sink.is_empty());
    }
}

#[test]
fn start_without_stop_records_once() {
    let clock = ScriptedClock::new(1_000).with_ticks([10, 35]);
    let sink = RecordingSink::new();
    {
        let mut p = probe(&clock, &sink);
        p.start();
    }
    assert_eq!(sink.samples(), vec![(LABEL.to_owned(), 0.025)]);
}

#[test]
fn unstarted_probe_records_nothing() {
    let clock = ScriptedClock::new(1_000);
    let sink = RecordingSink::new();
    {
        let mut p = probe(&clock, &sink);
        p.stop();
    }
    assert!(sink.is_empty());
}

#[test]
fn second_start_keeps_first_timestamp() {
    let clock = ScriptedClock::new(1_000).with_ticks([100, 200, 300]);
    let sink = RecordingSink::new();
    {
        let mut p = probe(&clock, &sink);
        p.start();
        p.start();
        assert_eq!(p.start_ticks(), Some(100));
    }
    // 200 is the end stamp: the second start never queried the clock.
    assert_eq!(sink.samples(), vec![(LABEL.to_owned(), 0.1)]);
}

#[test]
fn explicit_stop_fixes_the_end() {
    let clock = ScriptedClock::new(1_000).with_ticks([0, 4, 900]);
    let sink = RecordingSink::new();
    {
        let mut p = probe(&clock, &sink);
        p.start();
        p.stop();
        p.stop();
        assert_eq!(p.elapsed(), Some(0.004));
    }
    assert_eq!(sink.samples(), vec![(LABEL.to_owned(), 0.004)]);
}

#[test]
fn early_return_paths_record_once_each() {
    fn region(sink: &RecordingSink, clock: &ScriptedClock, bail: bool) -> u32 {
        let mut p = ScopedProfiler::with_parts(Some("work"), Some("region"), Reporter::none(), clock, sink);
        p.start();
        if bail {
            return 0;
        }
        1
    }

    let clock = ScriptedClock::new(1_000);
    let sink = RecordingSink::new();
    region(&sink, &clock, true);
    region(&sink, &clock, false);
    assert_eq!(sink.len(), 2);
}

#[test]
fn unwinding_still_records() {
    let clock = ScriptedClock::new(1_000).with_ticks([1, 2]);
    let sink = RecordingSink::new();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut p = probe(&clock, &sink);
        p.start();
        panic!("region failed");
    }));
    assert!(result.is_err());
    assert_eq!(sink.len(), 1);
}

// ── Clock failures ──────────────────────────────────────────────────

#[test]
fn frequency_failure_reports_and_records_zero() {
    let clock = ScriptedClock::new(0).without_frequency(87);
    let sink = RecordingSink::new();
    let diag = RefCell::new(String::new());
    {
        let mut p = ScopedProfiler::with_parts(Some("probe"), Some("region"), Reporter::new(&diag), &clock, &sink);
        assert_eq!(p.state(), ProfilerState::Armed);
        p.start();
    }
    assert_eq!(
        *diag.borrow(),
        format!("Error: [{LABEL}] tick frequency query failed with error 87\n")
    );
    assert_eq!(sink.samples(), vec![(LABEL.to_owned(), 0.0)]);
}

#[test]
fn zero_frequency_reports_and_records_zero() {
    let clock = ScriptedClock::new(0).with_ticks([10, 20]);
    let sink = RecordingSink::new();
    let diag = RefCell::new(String::new());
    {
        let mut p = ScopedProfiler::with_parts(Some("probe"), Some("region"), Reporter::new(&diag), &clock, &sink);
        assert_eq!(p.state(), ProfilerState::Armed);
        p.start();
        p.stop();
        assert_eq!(p.elapsed(), Some(0.0));
    }
    assert_eq!(
        *diag.borrow(),
        format!("Error: [{LABEL}] tick frequency query returned zero\n")
    );
    assert_eq!(sink.samples(), vec![(LABEL.to_owned(), 0.0)]);
}

#[test]
fn timestamp_failure_reports_and_records_zero() {
    let clock = ScriptedClock::new(1_000).then_fail(5).with_ticks([50]);
    let sink = RecordingSink::new();
    let diag = RefCell::new(String::new());
    {
        let mut p = ScopedProfiler::with_parts(Some("probe"), Some("region"), Reporter::new(&diag), &clock, &sink);
        p.start();
        assert_eq!(p.state(), ProfilerState::Started);
        assert_eq!(p.start_ticks(), None);
    }
    assert_eq!(
        *diag.borrow(),
        format!("Error: [{LABEL}] timestamp query failed with error 5\n")
    );
    assert_eq!(sink.samples(), vec![(LABEL.to_owned(), 0.0)]);
}

#[test]
fn backwards_clock_records_zero() {
    let clock = ScriptedClock::new(1_000).with_ticks([500, 100]);
    let sink = RecordingSink::new();
    {
        let mut p = probe(&clock, &sink);
        p.start();
    }
    assert_eq!(sink.samples()[0].1, 0.0);
}

// ── Concurrency ─────────────────────────────────────────────────────

#[test]
fn concurrent_drops_are_all_counted() {
    const N: usize = 1000;
    let agg = ProfileAggregator::default();
    thread::scope(|s| {
        for i in 0..N {
            let agg = &agg;
            s.spawn(move || {
                let region = if i % 2 == 0 { "even" } else { "odd" };
                let mut p =
                    ScopedProfiler::with_parts(Some("worker"), Some(region), Reporter::none(), &MONOTONIC, agg);
                p.start();
            });
        }
    });
    assert_eq!(agg.sample_count(), N as u64);
    assert_eq!(agg.get("skein_profiler: worker|even").unwrap().count, 500);
    assert_eq!(agg.get("skein_profiler: worker|odd").unwrap().count, 500);
    assert_eq!(agg.dropped_samples(), 0);
}
