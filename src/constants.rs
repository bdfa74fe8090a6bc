//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Centralized configuration constants for signal-filter.
//!
//! Defaults mirror the reference scenario: 100 signals per 100 seconds,
//! three producers sending 100 signals each with up to 500ms between calls.

/// Default capacity (N): maximum admissions within one window.
pub const DEFAULT_CAPACITY: u64 = 100;

/// Default window length (W), as written in configuration files.
pub const DEFAULT_WINDOW: &str = "100s";

/// Upper bound for capacity.
///
/// The admission log holds up to `capacity` timestamps, so this also caps
/// the memory one limiter can pin.
pub const MAX_CAPACITY: u64 = 10_000_000;

/// Largest log allocation made up front; bigger logs grow on demand.
pub const MAX_PREALLOCATED_LOG: usize = 4096;

// ============================================================================
// Driver Constants
// ============================================================================

/// Default number of concurrent producers.
pub const DEFAULT_PRODUCERS: usize = 3;

/// Default number of signals each producer sends.
pub const DEFAULT_SIGNALS_PER_PRODUCER: usize = 100;

/// Default upper bound (exclusive) of the random delay between two signals.
pub const DEFAULT_MAX_DELAY_MS: u64 = 500;

/// Upper bound for the number of producers.
pub const MAX_PRODUCERS: usize = 1024;

/// Default log level when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";
