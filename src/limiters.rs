//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 限流器模块
//!
//! 实现滑动窗口日志算法的信号过滤器。

use crate::clock::{Clock, SystemClock};
use crate::config::{validate_capacity, FilterConfig};
use crate::constants::MAX_PREALLOCATED_LOG;
use crate::error::FilterError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// 信号过滤器 trait
pub trait Filter: Send + Sync {
    /// 判断当前信号是否放行
    fn is_signal_allowed(&self) -> bool;
}

impl<F: Filter + ?Sized> Filter for Arc<F> {
    fn is_signal_allowed(&self) -> bool {
        (**self).is_signal_allowed()
    }
}

/// 过滤器统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// 放行的信号数
    pub admitted: u64,
    /// 拒绝的信号数
    pub rejected: u64,
}

impl FilterStats {
    /// 总信号数
    pub fn attempted(&self) -> u64 {
        self.admitted + self.rejected
    }

    /// 放行比例，没有信号时为 0
    pub fn pass_ratio(&self) -> f64 {
        match self.attempted() {
            0 => 0.0,
            total => self.admitted as f64 / total as f64,
        }
    }
}

/// 滑动窗口限流器
///
/// 记录每个被放行信号的时间戳，任意长度为 `window` 的尾随窗口内
/// 最多放行 `capacity` 个信号。
///
/// # 特性
/// - 单个互斥锁保护"清理-检查-追加"整个过程
/// - 使用 VecDeque 按时间顺序存储时间戳，从队头清理过期记录
/// - 时间戳恰好等于窗口起点时视为过期
/// - 日志长度不超过 `capacity`
///
/// # 示例
/// ```rust
/// use signal_filter::limiters::SlidingWindowLimiter;
/// use std::time::Duration;
///
/// // 每 100 秒最多放行 100 个信号
/// let limiter = SlidingWindowLimiter::new(100, Duration::from_secs(100)).unwrap();
///
/// assert!(limiter.try_admit());
/// ```
pub struct SlidingWindowLimiter<C: Clock = SystemClock> {
    /// 窗口内最大放行数
    capacity: u64,
    /// 窗口大小
    window: Duration,
    /// 时间源
    clock: C,
    /// 已放行信号的时间戳，按时间升序
    log: Mutex<VecDeque<Duration>>,
    /// 放行计数
    admitted: AtomicU64,
    /// 拒绝计数
    rejected: AtomicU64,
}

impl SlidingWindowLimiter<SystemClock> {
    /// 创建使用系统时钟的滑动窗口限流器
    ///
    /// # 参数
    /// - `capacity`: 窗口内最大放行数，必须大于 0
    /// - `window`: 窗口大小，必须大于 0
    ///
    /// # 返回
    /// - `Err(FilterError::InvalidConfiguration)`: 参数非法
    pub fn new(capacity: u64, window: Duration) -> Result<Self, FilterError> {
        Self::with_clock(capacity, window, SystemClock::new())
    }

    /// 从配置创建
    pub fn from_config(config: &FilterConfig) -> Result<Self, FilterError> {
        Self::new(config.capacity, config.window_duration()?)
    }
}

impl<C: Clock> SlidingWindowLimiter<C> {
    /// 使用指定时钟创建滑动窗口限流器
    ///
    /// # 示例
    /// ```rust
    /// use signal_filter::clock::ManualClock;
    /// use signal_filter::limiters::SlidingWindowLimiter;
    /// use std::time::Duration;
    ///
    /// let clock = ManualClock::new();
    /// let limiter =
    ///     SlidingWindowLimiter::with_clock(1, Duration::from_secs(5), clock.clone()).unwrap();
    ///
    /// assert!(limiter.try_admit());
    /// clock.set_secs(4);
    /// assert!(!limiter.try_admit());
    /// clock.set_secs(5);
    /// assert!(limiter.try_admit());
    /// ```
    pub fn with_clock(capacity: u64, window: Duration, clock: C) -> Result<Self, FilterError> {
        let capacity = validate_capacity(capacity)?;
        if window.is_zero() {
            return Err(FilterError::invalid("窗口大小必须大于0"));
        }

        let preallocated = usize::try_from(capacity)
            .unwrap_or(usize::MAX)
            .min(MAX_PREALLOCATED_LOG);

        debug!(
            "创建滑动窗口限流器: capacity={}, window={:?}",
            capacity, window
        );

        Ok(Self {
            capacity,
            window,
            clock,
            log: Mutex::new(VecDeque::with_capacity(preallocated)),
            admitted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        })
    }

    /// 尝试放行一个信号
    ///
    /// 在同一把锁内完成：清理过期记录、检查容量、记录本次放行。
    ///
    /// # 返回
    /// - `true`: 放行
    /// - `false`: 窗口内放行数已达上限，日志不变
    pub fn try_admit(&self) -> bool {
        let mut log = self.log.lock();
        let now = self.clock.now();

        self.prune(&mut log, now);

        let in_window = log.len() as u64;
        let admitted = in_window < self.capacity;
        if admitted {
            log.push_back(now);
        }
        drop(log);

        if admitted {
            self.admitted.fetch_add(1, Ordering::Relaxed);
            trace!(now = ?now, in_window = in_window + 1, "信号放行");
        } else {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            debug!(now = ?now, in_window, capacity = self.capacity, "信号被拒绝");
        }

        admitted
    }

    /// 从队头移除过期记录
    ///
    /// 时间戳 `t` 满足 `t + window <= now` 即过期；遇到第一个仍在窗口内的记录就停止。
    fn prune(&self, log: &mut VecDeque<Duration>, now: Duration) {
        while let Some(&oldest) = log.front() {
            if oldest.saturating_add(self.window) <= now {
                log.pop_front();
            } else {
                break;
            }
        }
    }

    /// 当前窗口内的放行数
    pub fn in_window(&self) -> usize {
        let mut log = self.log.lock();
        let now = self.clock.now();
        self.prune(&mut log, now);
        log.len()
    }

    /// 当前窗口内剩余的放行数
    pub fn remaining(&self) -> usize {
        let capacity = usize::try_from(self.capacity).unwrap_or(usize::MAX);
        capacity.saturating_sub(self.in_window())
    }

    /// 距离下一次可放行还需等待的时间
    ///
    /// # 返回
    /// - `None`: 现在调用 [`try_admit`](Self::try_admit) 会放行
    /// - `Some(d)`: 最早的记录将在 `d` 后过期
    pub fn retry_after(&self) -> Option<Duration> {
        let mut log = self.log.lock();
        let now = self.clock.now();
        self.prune(&mut log, now);

        if (log.len() as u64) < self.capacity {
            return None;
        }

        log.front()
            .map(|&oldest| oldest.saturating_add(self.window).saturating_sub(now))
    }

    /// 统计信息快照
    pub fn stats(&self) -> FilterStats {
        FilterStats {
            admitted: self.admitted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }

    /// 清空日志和统计
    pub fn reset(&self) {
        let mut log = self.log.lock();
        log.clear();
        self.admitted.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        debug!("滑动窗口限流器已重置");
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> Filter for SlidingWindowLimiter<C> {
    fn is_signal_allowed(&self) -> bool {
        self.try_admit()
    }
}

impl<C: Clock> std::fmt::Debug for SlidingWindowLimiter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlidingWindowLimiter")
            .field("capacity", &self.capacity)
            .field("window", &self.window)
            .field("logged", &self.log.lock().len())
            .field("stats", &self.stats())
            .finish()
    }
}

// ============================================================================
// 单元测试
// ============================================================================
