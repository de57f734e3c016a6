//! Interrupt Handoff and Background Storage
//!
//! A hosted version of the embedded layout: one thread plays the GPIO
//! interrupt, the main loop runs the pipeline, and a sink worker appends
//! readings to a JSON Lines file.
//!
//! ## Architecture
//!
//! ```text
//! "ISR" thread                main loop                     worker thread
//!   on_transition ──► EdgeQueue ──► PulsePipeline ──► QueuedSink ──► JsonLinesSink
//!   (stamps clock)    (spsc)        (drain)            (try_send)     (file I/O)
//! ```
//!
//! The edge path never touches the file. If the worker falls behind, the
//! reading is dropped and reported instead of stalling edge delivery.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_threaded_worker
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use dustpulse_core::{
    constants::EDGE_QUEUE_CAPACITY,
    events::Level,
    pipeline::PulsePipeline,
    sink::{JsonLinesSink, SinkWorker},
    stream::EdgeQueue,
    time::MonotonicClock,
    MonitorConfig,
};

const SENSOR_PIN: u8 = 8;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("DustPulse Threaded Worker Example");
    println!("=================================\n");

    // Short windows so the demo finishes quickly
    let config = MonitorConfig::default().with_window_length_ms(1_000);
    config.validate()?;

    let path = std::env::temp_dir().join("dustpulse-demo.jsonl");
    let (queued, worker) = SinkWorker::spawn(JsonLinesSink::open(&path)?, config.sink_queue_capacity)?;
    println!("Writing readings to {}\n", path.display());

    let clock = MonotonicClock::new();
    let mut queue: EdgeQueue<EDGE_QUEUE_CAPACITY> = EdgeQueue::new();
    let (mut producer, mut consumer) = queue.split(SENSOR_PIN, &clock);
    let mut pipeline = PulsePipeline::new(&config, &clock, queued);
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        // Simulated interrupt: 30 ms low every 150 ms for 4 s
        s.spawn(|| {
            for _ in 0..27 {
                thread::sleep(Duration::from_millis(120));
                producer.on_transition(SENSOR_PIN, Level::Low);
                thread::sleep(Duration::from_millis(30));
                producer.on_transition(SENSOR_PIN, Level::High);
            }
            done.store(true, Ordering::Release);
        });

        loop {
            let finished = done.load(Ordering::Acquire);
            match pipeline.drain(&mut consumer) {
                Ok(_) => {}
                Err(e) => println!("Drain error: {:?}", e),
            }
            if finished && consumer.pending() == 0 {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
    });

    let stats = pipeline.stats();
    println!("Edges processed: {}", stats.edges);
    println!("Edges dropped:   {}", consumer.dropped());
    println!("Measurements:    {}", stats.measurements);
    println!("Sink failures:   {}", stats.sink_failures);

    // Last queue handle goes with the pipeline; the worker drains and exits
    drop(pipeline.finish());
    let (sink, worker_stats) = worker.shutdown()?;
    println!(
        "\nWorker stored {} readings ({} failed) in {}",
        worker_stats.stored,
        worker_stats.failed,
        sink.path().display()
    );

    Ok(())
}
