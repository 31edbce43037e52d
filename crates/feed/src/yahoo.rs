use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use quotecast_core::common::Symbol;
use quotecast_core::config::FeedConfig;
use quotecast_core::market::entity::SessionBar;
use quotecast_core::market::error::MarketError;
use quotecast_core::market::port::QuoteProvider;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// 回看窗口覆盖周末与节假日，保证至少能拿到两个完整交易日
const LOOKBACK_RANGE: &str = "5d";

/// # Summary
/// Yahoo Finance 日线行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，客户端在构造时创建一次。
/// - 每个请求都带有显式超时。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// API 根地址，不含结尾斜杠
    base_url: String,
}

impl YahooProvider {
    /// # Summary
    /// 创建一个新的 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 按配置设置请求超时。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    /// 3. 初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `config`: 行情源配置。
    ///
    /// # Returns
    /// 客户端构建失败返回 `MarketError::Network`。
    pub fn new(config: &FeedConfig) -> Result<Self, MarketError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

/// Yahoo API 图表数据部分。
#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

/// Yahoo API 错误详情。
#[derive(Deserialize, Debug)]
struct YahooError {
    description: String,
}

/// Yahoo API 单个时间序列结果。
#[derive(Deserialize, Debug)]
struct YahooResult {
    // 无成交数据时 Yahoo 会省略该字段
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

/// # Summary
/// Yahoo API 原始报价数据，未收盘或停牌的交易日以 null 表示。
#[derive(Deserialize, Debug)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// # Summary
/// 将 chart 响应转换为按时间升序的完整日线。
///
/// # Logic
/// 1. 响应中的 error 对象优先返回（例如代码不存在）。
/// 2. 逐行合并 OHLCV，任一字段为空的行被丢弃。
/// 3. 仅保留最近 `sessions` 根。
fn parse_sessions(json: YahooResponse, sessions: usize) -> Result<Vec<SessionBar>, MarketError> {
    if let Some(err) = json.chart.error {
        return Err(MarketError::Unknown(err.description));
    }

    let result = json
        .chart
        .result
        .ok_or(MarketError::NotFound)?
        .pop()
        .ok_or(MarketError::NotFound)?;

    let quote = result
        .indicators
        .quote
        .first()
        .ok_or(MarketError::Parse("No quote data".into()))?;

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        if let (Some(o), Some(h), Some(l), Some(c), Some(v), Some(time)) = (
            quote.open.get(i).and_then(|x| *x),
            quote.high.get(i).and_then(|x| *x),
            quote.low.get(i).and_then(|x| *x),
            quote.close.get(i).and_then(|x| *x),
            quote.volume.get(i).and_then(|x| *x),
            Utc.timestamp_opt(ts, 0).single(),
        ) {
            bars.push(SessionBar {
                time,
                open: o,
                high: h,
                low: l,
                close: c,
                volume: v,
            });
        }
    }

    let skip = bars.len().saturating_sub(sessions);
    Ok(bars.split_off(skip))
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取最近的日线数据。
    ///
    /// # Logic
    /// 1. 以 5 天窗口、1 天周期请求 chart 接口。
    /// 2. 非 2xx 状态视为网络错误。
    /// 3. 解析嵌套 JSON 并截取最近 `sessions` 根完整日线。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `sessions`: 需要的交易日数量。
    ///
    /// # Returns
    /// 成功返回日线列表，失败返回 MarketError。
    async fn fetch_sessions(
        &self,
        symbol: &Symbol,
        sessions: usize,
    ) -> Result<Vec<SessionBar>, MarketError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[("range", LOOKBACK_RANGE), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        let bars = parse_sessions(json, sessions)?;
        debug!("Yahoo returned {} sessions for {}", bars.len(), symbol);
        Ok(bars)
    }
}
