//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 配置模块
//!
//! 定义过滤器与演示驱动的配置结构，支持 TOML 和 YAML 两种格式。

use crate::constants::{
    DEFAULT_CAPACITY, DEFAULT_MAX_DELAY_MS, DEFAULT_PRODUCERS, DEFAULT_SIGNALS_PER_PRODUCER,
    DEFAULT_WINDOW, MAX_CAPACITY, MAX_PRODUCERS,
};
use crate::error::FilterError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub filter: FilterConfig,
    pub demo: DemoConfig,
}

impl AppConfig {
    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, FilterError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 YAML 字符串解析并校验
    pub fn from_yaml_str(content: &str) -> Result<Self, FilterError> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    ///
    /// 根据扩展名选择格式：`.toml`、`.yaml`、`.yml`。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FilterError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let content = std::fs::read_to_string(path)?;
        debug!("加载配置文件: {}", path.display());

        match extension.as_str() {
            "toml" => Self::from_toml_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Err(FilterError::UnsupportedFormat(format!(
                "{}（支持: toml, yaml, yml）",
                path.display()
            ))),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), FilterError> {
        self.filter.validate()?;
        self.demo.validate()?;
        Ok(())
    }
}

/// 过滤器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// 窗口内最大放行数
    pub capacity: u64,
    /// 窗口大小（如 "100s"、"500ms"、"2m"）
    pub window: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            window: DEFAULT_WINDOW.to_string(),
        }
    }
}

impl FilterConfig {
    pub fn new(capacity: u64, window: impl Into<String>) -> Self {
        Self {
            capacity,
            window: window.into(),
        }
    }

    /// 校验过滤器配置
    pub fn validate(&self) -> Result<(), FilterError> {
        validate_capacity(self.capacity)?;
        parse_window_size(&self.window)?;
        Ok(())
    }

    /// 解析后的窗口大小
    pub fn window_duration(&self) -> Result<Duration, FilterError> {
        parse_window_size(&self.window)
    }
}

/// 演示驱动配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// 并发生产者数量
    pub producers: usize,
    /// 每个生产者发送的信号数
    pub signals_per_producer: usize,
    /// 两次信号之间随机延迟的上限（毫秒，不含）
    pub max_delay_ms: u64,
    /// 随机数种子，未设置时使用系统熵
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            producers: DEFAULT_PRODUCERS,
            signals_per_producer: DEFAULT_SIGNALS_PER_PRODUCER,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            seed: None,
        }
    }
}

impl DemoConfig {
    /// 校验驱动配置
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.producers == 0 {
            return Err(FilterError::invalid("生产者数量不能为0"));
        }
        if self.producers > MAX_PRODUCERS {
            return Err(FilterError::invalid(format!(
                "生产者数量过大，最大值为{}",
                MAX_PRODUCERS
            )));
        }
        Ok(())
    }

    /// 总信号数
    pub fn total_signals(&self) -> usize {
        self.producers.saturating_mul(self.signals_per_producer)
    }
}

/// 校验容量
pub(crate) fn validate_capacity(capacity: u64) -> Result<u64, FilterError> {
    if capacity == 0 {
        return Err(FilterError::invalid("容量必须大于0"));
    }
    if capacity > MAX_CAPACITY {
        return Err(FilterError::invalid(format!(
            "容量过大，最大值为{}",
            MAX_CAPACITY
        )));
    }
    Ok(capacity)
}

/// 解析窗口大小字符串
///
/// # 支持的格式
///
/// - `250ms` - 250毫秒
/// - `10s` - 10秒
/// - `5m` - 5分钟
/// - `2h` - 2小时
/// - `1d` - 1天
///
/// 不带单位的数字按秒处理。
///
/// # 示例
///
/// ```rust
/// use signal_filter::config::parse_window_size;
/// use std::time::Duration;
///
/// assert_eq!(parse_window_size("5m").unwrap(), Duration::from_secs(300));
/// ```
pub fn parse_window_size(window_size: &str) -> Result<Duration, FilterError> {
    let window_size = window_size.trim();
    if window_size.is_empty() {
        return Err(FilterError::invalid("窗口大小不能为空"));
    }

    let (num_part, unit_part) = window_size.split_at(
        window_size
            .find(|c: char| c.is_alphabetic())
            .unwrap_or(window_size.len()),
    );

    let num_str = num_part.trim();
    let unit = unit_part.trim().to_lowercase();

    if num_str.is_empty() {
        return Err(FilterError::invalid("窗口大小格式错误：缺少数字部分"));
    }

    let num: u64 = num_str
        .parse()
        .map_err(|_| FilterError::invalid(format!("无效的数字格式: {}", num_str)))?;

    if num == 0 {
        return Err(FilterError::invalid("窗口大小必须大于0"));
    }

    let secs = |factor: u64| {
        num.checked_mul(factor)
            .map(Duration::from_secs)
            .ok_or_else(|| FilterError::invalid(format!("窗口大小溢出: {}", window_size)))
    };

    match unit.as_str() {
        "ms" | "millis" | "millisecond" | "milliseconds" => Ok(Duration::from_millis(num)),
        "" | "s" | "sec" | "second" | "seconds" => secs(1),
        "m" | "min" | "minute" | "minutes" => secs(60),
        "h" | "hr" | "hour" | "hours" => secs(3600),
        "d" | "day" | "days" => secs(86400),
        _ => Err(FilterError::invalid(format!(
            "不支持的单位: {}。支持的单位: ms, s, m, h, d",
            unit
        ))),
    }
}
