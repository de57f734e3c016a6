//! Buffer Sizes for the Handoff Paths

/// Edge queue depth between the interrupt context and the pipeline.
///
/// `heapless::spsc` keeps one slot free, so this holds 63 edges. At the
/// sensor's fastest plausible rate (~2 edges per 8.5 ms) that is a quarter
/// second of backlog.
pub const EDGE_QUEUE_CAPACITY: usize = 64;

/// Measurements that may wait for a slow sink.
///
/// One measurement per 30 s window, so 16 slots ride out an eight-minute
/// outage before windows start getting dropped.
pub const SINK_QUEUE_CAPACITY: usize = 16;
