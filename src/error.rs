//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 错误类型定义
//!
//! 使用thiserror定义所有错误类型。

use thiserror::Error;

/// 过滤器错误类型
#[derive(Error, Debug)]
pub enum FilterError {
    /// 配置无效（容量、窗口大小等）
    #[error("配置无效: {0}")]
    InvalidConfiguration(String),

    /// 不支持的配置文件格式
    #[error("不支持的配置格式: {0}")]
    UnsupportedFormat(String),

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML解析错误
    #[error("TOML解析错误: {0}")]
    TomlError(#[from] toml::de::Error),

    /// YAML解析错误
    #[error("YAML解析错误: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// 生产者任务错误
    #[error("驱动错误: {0}")]
    DriverError(String),
}

impl FilterError {
    /// 构造配置错误
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FilterError::InvalidConfiguration(msg.into())
    }
}
