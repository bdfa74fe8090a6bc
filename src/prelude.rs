//! Prelude module - Commonly used types for quick imports
//!
//! Re-exports the types most callers need, so a single
//! `use signal_filter::prelude::*;` is enough to build and query a filter.

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::FilterConfig;
pub use crate::error::FilterError;
pub use crate::limiters::{Filter, FilterStats, SlidingWindowLimiter};
