//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 演示驱动
//!
//! 启动多个并发生产者共享同一个过滤器，每个生产者发送固定数量的信号，
//! 两次信号之间随机等待，最后汇总放行比例。

use crate::config::DemoConfig;
use crate::error::FilterError;
use crate::limiters::Filter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{error, info, instrument};

/// 演示结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoReport {
    /// 发送的信号总数
    pub attempted: u64,
    /// 放行的信号总数
    pub passed: u64,
    /// 总耗时
    pub elapsed: Duration,
}

impl DemoReport {
    /// 放行比例
    pub fn pass_ratio(&self) -> f64 {
        match self.attempted {
            0 => 0.0,
            total => self.passed as f64 / total as f64,
        }
    }
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Filter allowed {} signals out of {}",
            self.passed, self.attempted
        )
    }
}

/// 运行所有生产者并等待结束
///
/// # 参数
/// - `filter`: 共享的过滤器
/// - `config`: 生产者数量、信号数、随机延迟上限
///
/// # 返回
/// - `Ok(DemoReport)`: 所有生产者正常结束
/// - `Err(FilterError::DriverError)`: 有生产者任务异常退出，其余生产者在返回前已全部停止
pub async fn run_producers(
    filter: Arc<dyn Filter>,
    config: &DemoConfig,
) -> Result<DemoReport, FilterError> {
    config.validate()?;

    let total_attempted = Arc::new(AtomicU64::new(0));
    let total_passed = Arc::new(AtomicU64::new(0));
    let started = Instant::now();
    let mut producers = JoinSet::new();

    info!(
        "启动 {} 个生产者，每个发送 {} 个信号，共 {} 个",
        config.producers,
        config.signals_per_producer,
        config.total_signals()
    );

    for id in 0..config.producers {
        let producer = Producer {
            id,
            filter: Arc::clone(&filter),
            total_attempted: Arc::clone(&total_attempted),
            total_passed: Arc::clone(&total_passed),
            signals: config.signals_per_producer,
            max_delay_ms: config.max_delay_ms,
            rng: match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
                None => StdRng::from_entropy(),
            },
        };
        producers.spawn(producer.run());
    }

    while let Some(joined) = producers.join_next().await {
        if let Err(e) = joined {
            error!("生产者任务失败: {}", e);
            producers.shutdown().await;
            return Err(FilterError::DriverError(format!("生产者任务失败: {}", e)));
        }
    }

    let report = DemoReport {
        attempted: total_attempted.load(Ordering::SeqCst),
        passed: total_passed.load(Ordering::SeqCst),
        elapsed: started.elapsed(),
    };

    info!("{}", report);
    Ok(report)
}

/// 单个生产者
struct Producer {
    id: usize,
    filter: Arc<dyn Filter>,
    total_attempted: Arc<AtomicU64>,
    total_passed: Arc<AtomicU64>,
    signals: usize,
    max_delay_ms: u64,
    rng: StdRng,
}

impl Producer {
    #[instrument(name = "producer", skip(self), fields(id = self.id))]
    async fn run(mut self) {
        let started = Instant::now();

        for signal in 0..self.signals {
            let allowed = self.filter.is_signal_allowed();
            self.total_attempted.fetch_add(1, Ordering::SeqCst);
            let total = if allowed {
                self.total_passed.fetch_add(1, Ordering::SeqCst) + 1
            } else {
                self.total_passed.load(Ordering::SeqCst)
            };

            info!(
                elapsed_secs = started.elapsed().as_secs(),
                total, allowed, signal, "收到判定"
            );

            if self.max_delay_ms > 0 {
                let delay = self.rng.gen_range(0..self.max_delay_ms);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }
    }
}
