use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    pub stream: StreamConfig,
    #[serde(default)]
    pub poller: PollerConfig,
}

/// 行情源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub symbol: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// 数据流配置，`name` 与 `region` 没有默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    pub name: String,
    pub region: String,
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// 轮询节奏配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    pub delay_secs: u64,
    pub backoff: BackoffKind,
    pub max_delay_secs: u64,
}

/// 周期间等待策略
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    // 固定间隔
    #[default]
    Fixed,
    // 连续失败时指数退避
    Exponential,
}

/// # Summary
/// 配置加载与校验错误。
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置源读取或反序列化失败
    #[error("Load error: {0}")]
    Load(String),
    /// 配置值不合法
    #[error("Invalid config `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            delay_secs: 30,
            backoff: BackoffKind::Fixed,
            max_delay_secs: 300,
        }
    }
}

impl AppConfig {
    /// # Summary
    /// 启动前校验配置。
    ///
    /// # Logic
    /// 1. 必填字符串去除空白后非空。
    /// 2. 所有时长必须为正数。
    /// 3. 指数退避的上限不得小于初始间隔。
    ///
    /// # Returns
    /// 首个不合法的字段返回 `ConfigError::Invalid`。
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("feed.symbol", &self.feed.symbol)?;
        require_non_empty("feed.base_url", &self.feed.base_url)?;
        require_positive("feed.timeout_secs", self.feed.timeout_secs)?;
        require_non_empty("stream.name", &self.stream.name)?;
        require_non_empty("stream.region", &self.stream.region)?;
        if let Some(endpoint) = &self.stream.endpoint_url {
            require_non_empty("stream.endpoint_url", endpoint)?;
        }
        require_positive("stream.timeout_secs", self.stream.timeout_secs)?;
        require_positive("poller.delay_secs", self.poller.delay_secs)?;
        if self.poller.backoff == BackoffKind::Exponential
            && self.poller.max_delay_secs < self.poller.delay_secs
        {
            return Err(ConfigError::Invalid {
                key: "poller.max_delay_secs",
                reason: format!(
                    "must be >= poller.delay_secs ({})",
                    self.poller.delay_secs
                ),
            });
        }
        Ok(())
    }
}

fn require_non_empty(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            key,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn require_positive(key: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}
