//! Replaying a Recorded Signal
//!
//! Feeds two minutes of synthetic PPD42NS output through the pipeline and
//! prints one reading per 30 second window.
//!
//! ## What You'll Learn
//!
//! - Building a pipeline from `MonitorConfig`
//! - Replaying timestamped edges with `MemoryEdgeStream`
//! - Reading window summaries and the window in progress
//!
//! ## Signal Model
//!
//! ```text
//!  output  ────┐    ┌──────────┐  ┌─────────
//!              └────┘          └──┘
//!              10-90 ms low, gaps vary with air quality
//! ```
//!
//! The air gets dirtier every window, so the readings climb.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_replay_window
//! ```

use dustpulse_core::{
    events::EdgeTransition,
    pipeline::{DrainError, PulsePipeline},
    sink::MemorySink,
    stream::{MemoryEdgeStream, StreamError},
    time::FixedTime,
    MonitorConfig,
};

/// Edges for `minutes` of signal; mean gap shrinks from 900 ms to 150 ms
fn synthetic_signal(minutes: u64) -> Vec<EdgeTransition> {
    let mut edges = Vec::new();
    let mut seed: u32 = 2024;
    let mut next = |lo: u64, hi: u64| {
        seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
        lo + seed as u64 % (hi - lo + 1)
    };

    let end = minutes * 60_000_000;
    let mut t = 0;
    while t < end {
        let progress = t as f64 / end as f64;
        let mean_gap = (900_000.0 - 750_000.0 * progress) as u64;

        t += next(mean_gap / 2, mean_gap * 3 / 2);
        edges.push(EdgeTransition::low(t));
        t += next(10_000, 90_000);
        edges.push(EdgeTransition::high(t));
    }
    edges
}

fn main() {
    println!("DustPulse Replay Example");
    println!("========================\n");

    let config = MonitorConfig::default();
    println!(
        "Window: {} ms, plausible pulses: {}-{} us, AQI table: {:?}\n",
        config.window_length_ms, config.plausible_min_us, config.plausible_max_us, config.aqi_standard
    );

    let clock = FixedTime::new(0);
    let mut pipeline = PulsePipeline::new(&config, &clock, MemorySink::new());

    let edges = synthetic_signal(2);
    let mut stream = MemoryEdgeStream::new(&edges);
    println!("Replaying {} edges...\n", edges.len());

    match pipeline.drain(&mut stream) {
        Err(DrainError::Stream(StreamError::EndOfStream)) => {}
        Err(DrainError::Pipeline(e)) => println!("Sink failed: {}", e),
        other => println!("Unexpected drain result: {:?}", other),
    }

    println!("{:>8} {:>12} {:>10} {:>5}  {}", "window", "pcs/0.01cf", "ug/m3", "AQI", "category");
    for (i, m) in pipeline.sink().measurements().iter().enumerate() {
        println!(
            "{:>8} {:>12.1} {:>10.2} {:>5}  {}",
            i + 1,
            m.concentration_pcs,
            m.concentration_ugm3,
            m.aqi,
            m.category().name()
        );
    }

    let stats = pipeline.stats();
    clock.set(edges.last().map(|e| e.timestamp).unwrap_or(0));
    let partial = pipeline.snapshot();

    println!("\nTotals:");
    println!("  Edges:              {}", stats.edges);
    println!("  Pulses:             {}", stats.tracker.pulses);
    println!("  Implausible pulses: {}", stats.implausible_pulses);
    println!(
        "  Partial window:     {} pulses, {} us low over {} ms (discarded)",
        partial.pulses,
        partial.accumulated_low_us,
        partial.elapsed_us / 1_000
    );
}
