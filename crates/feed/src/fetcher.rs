use quotecast_core::common::Symbol;
use quotecast_core::common::time::TimeProvider;
use quotecast_core::market::entity::QuoteRecord;
use quotecast_core::market::error::MarketError;
use quotecast_core::market::port::QuoteProvider;
use std::sync::Arc;
use tracing::debug;

/// 计算涨跌所需的交易日数量（最近一日 + 前一日）
pub const REQUIRED_SESSIONS: usize = 2;

/// # Summary
/// 报价抓取器：向数据源请求最近两个交易日并构建报价记录。
///
/// # Invariants
/// - 不缓存、不重试，每次调用恰好发起一次数据源请求。
/// - 失败时返回 `Err`，不会产生部分填充或零值填充的记录。
pub struct QuoteFetcher {
    // 数据源驱动
    provider: Arc<dyn QuoteProvider>,
    // 采集时间来源
    clock: Arc<dyn TimeProvider>,
}

impl QuoteFetcher {
    pub fn new(provider: Arc<dyn QuoteProvider>, clock: Arc<dyn TimeProvider>) -> Self {
        Self { provider, clock }
    }

    /// # Summary
    /// 抓取并构建一条报价记录。
    ///
    /// # Logic
    /// 1. 请求最近 `REQUIRED_SESSIONS` 个交易日。
    /// 2. 不足两日时返回 `MarketError::InsufficientHistory`。
    /// 3. 以最后一日为当前、倒数第二日为前一日构建记录，时间戳取自时钟。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    ///
    /// # Returns
    /// 成功返回报价记录，任何失败都以 `MarketError` 表示。
    pub async fn fetch(&self, symbol: &Symbol) -> Result<QuoteRecord, MarketError> {
        let sessions = self
            .provider
            .fetch_sessions(symbol, REQUIRED_SESSIONS)
            .await?;

        let [.., previous, current] = sessions.as_slice() else {
            return Err(MarketError::InsufficientHistory {
                required: REQUIRED_SESSIONS,
                actual: sessions.len(),
            });
        };

        let record = QuoteRecord::from_sessions(symbol, previous, current, self.clock.now())?;
        debug!(
            "Built quote for {}: price {} change {}",
            record.symbol, record.price, record.change
        );
        Ok(record)
    }
}
