use crate::common::Symbol;
use crate::market::entity::SessionBar;
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 实现者只负责一次请求，不做缓存与重试；重试由轮询循环负责。
/// - 返回的 K 线按时间升序排列，最后一根为最近的交易日。
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// # Summary
    /// 获取特定证券最近若干个交易日的日线数据。
    ///
    /// # Logic
    /// 1. 构建数据源请求。
    /// 2. 执行网络请求并解析响应数据。
    /// 3. 丢弃不完整的交易日，仅保留最近 `sessions` 根。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `sessions`: 需要的交易日数量上限。
    ///
    /// # Returns
    /// 成功返回按时间升序的 K 线列表（可能少于 `sessions` 根）。
    async fn fetch_sessions(
        &self,
        symbol: &Symbol,
        sessions: usize,
    ) -> Result<Vec<SessionBar>, MarketError>;
}
