//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! signal-filter - Sliding-Window Signal Filter
//!
//! Decides, for each incoming signal, whether it may pass, based on how many
//! signals were admitted during the trailing time window.
//!
//! # API Layers
//!
//! ## Prelude (Quick Start)
//!
//! Use `use signal_filter::prelude::*;` to import all commonly used types.
//!
//! ## Core API
//!
//! - [`SlidingWindowLimiter`] - Thread-safe sliding-window log limiter
//! - [`Filter`] - Caller-facing admission interface
//! - [`Clock`] - Time source (`SystemClock`, `ManualClock`)
//! - [`FilterError`] - Error types
//!
//! ## Driver
//!
//! [`driver::run_producers`] spawns concurrent producers against one shared
//! filter and reports how many signals passed.
//!
//! # Examples
//!
//! ```rust
//! use signal_filter::prelude::*;
//! use std::time::Duration;
//!
//! // 每 10 秒最多放行 3 个信号
//! let limiter = SlidingWindowLimiter::new(3, Duration::from_secs(10)).unwrap();
//!
//! assert!(limiter.try_admit());
//! assert!(limiter.try_admit());
//! assert!(limiter.try_admit());
//! assert!(!limiter.try_admit());
//! ```

pub mod prelude;

pub mod clock;
pub mod config;
pub mod constants;
pub mod driver;
pub mod error;
pub mod limiters;
pub mod telemetry;

// 重新导出常用类型
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{parse_window_size, AppConfig, DemoConfig, FilterConfig};
pub use driver::{run_producers, DemoReport};
pub use error::FilterError;
pub use limiters::{Filter, FilterStats, SlidingWindowLimiter};
