//! 信号过滤演示
//!
//! 多个生产者并发向同一个滑动窗口过滤器发送信号，最后输出放行统计。
//!
//! 运行方式: `cargo run --bin filter-demo -- --capacity 10 --window 5s`

use anyhow::Context;
use clap::Parser;
use signal_filter::config::{parse_window_size, AppConfig};
use signal_filter::driver::run_producers;
use signal_filter::limiters::{Filter, SlidingWindowLimiter};
use signal_filter::telemetry::init_logging;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "filter-demo", about = "Sliding-window signal filter demo")]
struct Args {
    /// 配置文件（.toml / .yaml / .yml）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 窗口内最大放行数
    #[arg(long)]
    capacity: Option<u64>,

    /// 窗口大小，如 100s、500ms、2m
    #[arg(long)]
    window: Option<String>,

    /// 生产者数量
    #[arg(long)]
    producers: Option<usize>,

    /// 每个生产者发送的信号数
    #[arg(long)]
    signals: Option<usize>,

    /// 随机延迟上限（毫秒）
    #[arg(long)]
    max_delay_ms: Option<u64>,

    /// 随机数种子
    #[arg(long)]
    seed: Option<u64>,

    /// 日志级别
    #[arg(long, default_value = signal_filter::constants::DEFAULT_LOG_LEVEL)]
    log_level: String,
}

impl Args {
    fn into_config(self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)
                .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
            None => AppConfig::default(),
        };

        if let Some(capacity) = self.capacity {
            config.filter.capacity = capacity;
        }
        if let Some(window) = self.window {
            parse_window_size(&window)?;
            config.filter.window = window;
        }
        if let Some(producers) = self.producers {
            config.demo.producers = producers;
        }
        if let Some(signals) = self.signals {
            config.demo.signals_per_producer = signals;
        }
        if let Some(max_delay_ms) = self.max_delay_ms {
            config.demo.max_delay_ms = max_delay_ms;
        }
        if self.seed.is_some() {
            config.demo.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = args.into_config()?;
    let limiter = SlidingWindowLimiter::from_config(&config.filter)?;
    info!(
        "过滤器: 每 {} 最多放行 {} 个信号",
        config.filter.window, config.filter.capacity
    );

    let filter: Arc<dyn Filter> = Arc::new(limiter);
    let report = run_producers(filter, &config.demo).await?;

    println!("{}", report);
    println!("放行率: {:.2}%", report.pass_ratio() * 100.0);

    Ok(())
}
