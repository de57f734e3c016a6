//! Integration tests for the edge-to-measurement pipeline
//!
//! Drives complete edge sequences through `PulsePipeline` and checks the
//! accounting end to end: pulse pairing, accumulation, window closure,
//! derivation and sink handling.

mod common;

use dustpulse_core::derivation::Derivation;
use dustpulse_core::errors::{PipelineError, SinkError};
use dustpulse_core::events::{EdgeTransition, Level};
use dustpulse_core::pipeline::{DrainError, PulsePipeline, Step};
use dustpulse_core::sink::MemorySink;
use dustpulse_core::stream::{MemoryEdgeStream, StreamError};
use dustpulse_core::time::FixedTime;
use dustpulse_core::validators::Plausibility;
use dustpulse_core::window::WindowSummary;
use dustpulse_core::{AqiCategory, MonitorConfig};

use proptest::prelude::*;

use common::{FlakySink, RecordingSink, SyntheticSensor};

/// Window long enough that no test sequence closes it
const NEVER_CLOSES_MS: u64 = 1_000_000_000;

fn feed<C, S>(pipeline: &mut PulsePipeline<C, S>, edges: &[EdgeTransition]) -> Vec<WindowSummary>
where
    C: dustpulse_core::TimeSource,
    S: dustpulse_core::MeasurementSink,
{
    edges
        .iter()
        .filter_map(|edge| match pipeline.process(*edge) {
            Ok(Step::Measured(closed)) => Some(closed.summary),
            Ok(_) => None,
            Err(err) => panic!("unexpected sink failure: {}", err),
        })
        .collect()
}

#[test]
fn fifteen_percent_occupancy_over_thirty_seconds() {
    let clock = FixedTime::new(0);
    let mut pipeline = PulsePipeline::new(&MonitorConfig::default(), &clock, MemorySink::new());

    // 100 pulses of 45 ms spread over the window: 4.5 s of low time
    let mut edges = Vec::new();
    for i in 0..100u64 {
        let low = 10_000 + i * 290_000;
        edges.push(EdgeTransition::low(low));
        edges.push(EdgeTransition::high(low + 45_000));
    }
    // Zero-width pulse just past the deadline closes the window
    edges.push(EdgeTransition::low(30_000_001));
    edges.push(EdgeTransition::high(30_000_001));

    let summaries = feed(&mut pipeline, &edges);
    assert_eq!(summaries.len(), 1);

    let summary = summaries[0];
    assert_eq!(summary.accumulated_low_us, 4_500_000);
    assert_eq!(summary.ratio, 15.0);
    assert_eq!(summary.pulses, 101);
    assert_eq!(summary.implausible_pulses, 1);

    let m = pipeline.sink().measurements()[0];
    assert!((m.concentration_pcs - 10658.12).abs() < 0.01);
    assert!((m.concentration_ugm3 - 22.16).abs() < 0.01);
    assert_eq!(m.aqi, 72);
    assert_eq!(m.category(), AqiCategory::Moderate);

    assert_eq!(pipeline.snapshot().accumulated_low_us, 0);
}

#[test]
fn empty_window_reports_curve_constant() {
    let clock = FixedTime::new(0);
    let config = MonitorConfig::default().with_window_length_ms(1_000);
    let mut pipeline = PulsePipeline::new(&config, &clock, MemorySink::new());

    pipeline.process(EdgeTransition::low(1_000_001)).unwrap();
    let step = pipeline.process(EdgeTransition::high(1_000_001)).unwrap();

    let Step::Measured(closed) = step else {
        panic!("expected closure, got {:?}", step);
    };
    assert_eq!(closed.summary.ratio, 0.0);
    assert_eq!(closed.measurement.concentration_pcs, 0.62);
    assert_eq!(closed.measurement.aqi, 0);
}

#[test]
fn plausibility_is_observational() {
    let clock = FixedTime::new(0);
    let config = MonitorConfig::default().with_window_length_ms(NEVER_CLOSES_MS);
    let mut pipeline = PulsePipeline::new(&config, &clock, MemorySink::new());

    let cases = [
        (5_000, Plausibility::TooShort),
        (8_500, Plausibility::InRange),
        (50_000, Plausibility::InRange),
        (95_000, Plausibility::InRange),
        (95_001, Plausibility::TooLong),
    ];

    let mut t = 0;
    let mut expected_total = 0;
    for (duration, expected) in cases {
        pipeline.process(EdgeTransition::low(t)).unwrap();
        let step = pipeline.process(EdgeTransition::high(t + duration)).unwrap();
        match step {
            Step::Pulse(pulse) => assert_eq!(pulse.plausibility, expected, "{}us", duration),
            other => panic!("expected a pulse for {}us, got {:?}", duration, other),
        }
        t += duration + 100_000;
        expected_total += duration;
    }

    // Flagged pulses are still accumulated
    assert_eq!(pipeline.snapshot().accumulated_low_us, expected_total);
    assert_eq!(pipeline.stats().implausible_pulses, 2);
}

#[test]
fn closures_tile_the_timeline() {
    let clock = FixedTime::new(0);
    let config = MonitorConfig::default().with_window_length_ms(1_000);
    let mut pipeline = PulsePipeline::new(&config, &clock, MemorySink::new());

    let mut sensor = SyntheticSensor::new(0).with_seed(7);
    let edges = sensor.run_until(10_500_000, 200_000);
    let summaries = feed(&mut pipeline, &edges);

    assert!(summaries.len() >= 7, "only {} closures", summaries.len());
    assert_eq!(summaries[0].started_at, 0);
    for pair in summaries.windows(2) {
        assert_eq!(pair[1].started_at, pair[0].closed_at);
    }
    for s in &summaries {
        assert!(s.closed_at - s.started_at > 1_000_000);
    }

    // Every microsecond of low time lands in exactly one window
    let closed_total: u64 = summaries.iter().map(|s| s.accumulated_low_us).sum();
    assert_eq!(closed_total + pipeline.snapshot().accumulated_low_us, sensor.low_total_us());
    assert_eq!(pipeline.sink().measurements().len(), summaries.len());
}

#[test]
fn replay_through_memory_stream() {
    let clock = FixedTime::new(0);
    let config = MonitorConfig::default().with_window_length_ms(2_000);
    let mut pipeline = PulsePipeline::new(&config, &clock, RecordingSink::new());

    let mut sensor = SyntheticSensor::new(0).with_seed(1234);
    let edges = sensor.run_until(9_000_000, 150_000);
    let mut stream = MemoryEdgeStream::new(&edges);

    match pipeline.drain(&mut stream) {
        Err(DrainError::Stream(StreamError::EndOfStream)) => {}
        other => panic!("expected end of stream, got {:?}", other),
    }

    assert!(stream.is_exhausted());
    assert_eq!(pipeline.stats().edges, edges.len() as u64);
    assert_eq!(pipeline.stats().tracker.pulses, sensor.pulses() as u64);
    assert_eq!(pipeline.sink().measurements().len() as u64, pipeline.stats().measurements);
}

#[test]
fn sink_failures_lose_one_reading_each() {
    let clock = FixedTime::new(0);
    let config = MonitorConfig::default().with_window_length_ms(1_000);
    let mut pipeline = PulsePipeline::new(&config, &clock, FlakySink::new(2));

    let mut sensor = SyntheticSensor::new(0).with_seed(99);
    let edges = sensor.run_until(6_500_000, 100_000);

    let mut lost = Vec::new();
    for edge in &edges {
        match pipeline.process(*edge) {
            Ok(_) => {}
            Err(PipelineError::Sink { measurement, error }) => {
                assert_eq!(error, SinkError::Unavailable { reason: "backend restarting" });
                lost.push(measurement);
                // The next window is already running
                assert_eq!(pipeline.snapshot().accumulated_low_us, 0);
            }
        }
    }

    let stats = pipeline.stats();
    let stored = pipeline.sink().inner.measurements();
    assert!(!lost.is_empty());
    assert_eq!(stats.sink_failures, lost.len() as u64);
    assert_eq!(stored.len() + lost.len(), stats.measurements as usize);
}

#[test]
fn on_transition_uses_pipeline_clock() {
    let clock = FixedTime::new(0);
    let config = MonitorConfig::default().with_window_length_ms(1_000);
    let mut pipeline = PulsePipeline::new(&config, &clock, MemorySink::new());

    // 30 ms low every 100 ms for just over one second
    for _ in 0..11 {
        clock.advance_ms(70);
        pipeline.on_transition(Level::Low).unwrap();
        clock.advance_ms(30);
        pipeline.on_transition(Level::High).unwrap();
    }

    let m = pipeline.sink().measurements();
    assert_eq!(m.len(), 1);
    let expected = Derivation::default().derive(330_000, 1_000);
    assert_eq!(m[0], expected);
}

#[derive(Debug, Clone)]
enum Signal {
    /// Full pulse: high for `gap`, low for `duration`
    Pulse { gap: u64, duration: u64 },
    /// Low edge whose rising edge was missed
    Dangling { gap: u64 },
}

fn signal() -> impl Strategy<Value = Signal> {
    prop_oneof![
        3 => (1u64..400_000, 0u64..200_000).prop_map(|(gap, duration)| Signal::Pulse { gap, duration }),
        1 => (1u64..400_000).prop_map(|gap| Signal::Dangling { gap }),
    ]
}

proptest! {
    #[test]
    fn accumulated_equals_sum_of_durations(
        pulses in prop::collection::vec((1u64..500_000, 0u64..200_000), 0..200)
    ) {
        let clock = FixedTime::new(0);
        let config = MonitorConfig::default().with_window_length_ms(NEVER_CLOSES_MS);
        let mut pipeline = PulsePipeline::new(&config, &clock, MemorySink::new());

        let mut t = 0;
        for (gap, duration) in &pulses {
            t += gap;
            pipeline.process(EdgeTransition::low(t)).unwrap();
            t += duration;
            pipeline.process(EdgeTransition::high(t)).unwrap();
        }

        let expected: u64 = pulses.iter().map(|(_, d)| d).sum();
        prop_assert_eq!(pipeline.snapshot().accumulated_low_us, expected);
        prop_assert_eq!(pipeline.stats().tracker.pulses, pulses.len() as u64);
    }

    #[test]
    fn unterminated_pulses_never_contribute(signals in prop::collection::vec(signal(), 0..150)) {
        let clock = FixedTime::new(0);
        let config = MonitorConfig::default().with_window_length_ms(NEVER_CLOSES_MS);
        let mut pipeline = PulsePipeline::new(&config, &clock, MemorySink::new());

        let mut t = 0;
        let mut expected = 0;
        for s in &signals {
            match *s {
                Signal::Pulse { gap, duration } => {
                    t += gap;
                    pipeline.process(EdgeTransition::low(t)).unwrap();
                    t += duration;
                    pipeline.process(EdgeTransition::high(t)).unwrap();
                    expected += duration;
                }
                Signal::Dangling { gap } => {
                    t += gap;
                    pipeline.process(EdgeTransition::low(t)).unwrap();
                }
            }
        }

        let dangling = signals.iter().filter(|s| matches!(s, Signal::Dangling { .. })).count() as u64;
        let open_at_end = matches!(signals.last(), Some(Signal::Dangling { .. }));

        prop_assert_eq!(pipeline.snapshot().accumulated_low_us, expected);
        prop_assert_eq!(pipeline.snapshot().pulse_open, open_at_end);
        prop_assert_eq!(pipeline.stats().tracker.abandoned, dangling - u64::from(open_at_end));
    }

    #[test]
    fn window_resets_after_every_closure(seed in any::<u32>(), length_ms in 200u64..3_000) {
        let clock = FixedTime::new(0);
        let config = MonitorConfig::default().with_window_length_ms(length_ms);
        let mut pipeline = PulsePipeline::new(&config, &clock, MemorySink::new());

        let mut sensor = SyntheticSensor::new(0).with_seed(seed);
        let edges = sensor.run_until(length_ms * 1_000 * 8, 120_000);

        let mut closed_total = 0;
        for edge in &edges {
            if let Step::Measured(closed) = pipeline.process(*edge).unwrap() {
                prop_assert_eq!(pipeline.snapshot().accumulated_low_us, 0);
                prop_assert_eq!(pipeline.snapshot().started_at, edge.timestamp);
                closed_total += closed.summary.accumulated_low_us;
            }
        }
        prop_assert!(pipeline.stats().measurements >= 3);
        prop_assert_eq!(closed_total + pipeline.snapshot().accumulated_low_us, sensor.low_total_us());
    }

    #[test]
    fn aqi_never_decreases_with_occupancy(a in 0u64..30_000_000, b in 0u64..30_000_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let derivation = Derivation::default();

        let low = derivation.derive(lo, 30_000);
        let high = derivation.derive(hi, 30_000);
        prop_assert!(low.concentration_pcs <= high.concentration_pcs);
        prop_assert!(low.aqi <= high.aqi);
        prop_assert_eq!(derivation.derive(lo, 30_000), low);
    }
}
