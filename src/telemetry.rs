//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 日志模块
//!
//! 基于 `tracing-subscriber` 初始化全局日志，`RUST_LOG` 优先于传入的级别。
//!
//! # 示例
//!
//! ```rust
//! use signal_filter::telemetry::init_logging;
//!
//! init_logging("debug");
//! tracing::info!("日志已初始化");
//! ```

use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// # 参数
/// - `level`: 默认日志级别或过滤表达式（如 `"info"`、`"signal_filter=debug"`）
///
/// # 返回
/// - `true`: 本次调用完成了初始化
/// - `false`: 全局订阅者已存在，本次调用不生效
pub fn init_logging(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(crate::constants::DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(false)
        .try_init()
        .is_ok()
}
