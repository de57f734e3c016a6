//! Optional logging
//!
//! Expands to `log` calls when the `log` feature is on. Otherwise the
//! arguments are type-checked inside a dead branch, so bare-metal builds
//! carry no formatting code and see no unused bindings.

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    };
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    };
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn arguments_are_consumed_with_or_without_log() {
        // Bindings used only for logging must not trip unused warnings
        let pulses = 3u32;
        let ratio = 1.5f64;
        log_debug!("{} pulses", pulses);
        log_info!("{:.2}% low", ratio);
        log_warn!("{} pulses at {:.1}%", pulses, ratio);
    }
}
