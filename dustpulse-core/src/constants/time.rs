//! Time-Related Constants

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Microseconds per millisecond.
pub const US_PER_MS: u64 = 1000;

/// Microseconds per second.
pub const US_PER_SECOND: u64 = 1_000_000;

// ===== SAMPLING WINDOW =====

/// Default sampling window length (milliseconds).
///
/// The PPD42NS needs on the order of 30 s of occupancy to produce a stable
/// ratio; shorter windows are dominated by counting noise.
///
/// Source: Seeed Grove Dust Sensor reference sketch (`sampletime_ms`)
pub const DEFAULT_WINDOW_LENGTH_MS: u64 = 30_000;
