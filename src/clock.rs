//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 时间源模块
//!
//! 限流器通过 [`Clock`] 读取当前时间，时间以相对于时钟起点的 [`Duration`] 表示。
//!
//! - [`SystemClock`] - 基于 `Instant` 的单调时钟，用于生产环境
//! - [`ManualClock`] - 手动推进的时钟，用于确定性回放测试

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 时间源 trait
///
/// `now()` 返回的值必须单调不减。
pub trait Clock: Send + Sync {
    /// 当前时间（相对于时钟起点）
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// 系统单调时钟
///
/// 起点为创建时刻。
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// 手动时钟
///
/// 时间只在调用 [`set`](ManualClock::set) 或 [`advance`](ManualClock::advance) 时变化。
/// 克隆出的实例共享同一个时间。
///
/// # 示例
/// ```rust
/// use signal_filter::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// clock.advance(Duration::from_secs(3));
/// assert_eq!(clock.now(), Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    /// 当前时间（纳秒）
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置当前时间
    ///
    /// 早于当前值的时间会被忽略，时钟不会倒退。
    pub fn set(&self, now: Duration) {
        self.nanos.fetch_max(to_nanos(now), Ordering::SeqCst);
    }

    /// 设置当前时间（秒）
    pub fn set_secs(&self, secs: u64) {
        self.set(Duration::from_secs(secs));
    }

    /// 向前推进时间
    pub fn advance(&self, delta: Duration) {
        let delta = to_nanos(delta);
        // fetch_update 的闭包总是返回 Some，不会失败
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(delta))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

fn to_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
