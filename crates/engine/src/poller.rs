use quotecast_core::common::Symbol;
use quotecast_core::engine::entity::CycleOutcome;
use quotecast_core::engine::error::{CycleError, ErrorKind};
use quotecast_core::engine::port::DelayPolicy;
use quotecast_core::market::codec;
use quotecast_core::stream::entity::PublishOutcome;
use quotecast_feed::fetcher::QuoteFetcher;
use quotecast_stream::publisher::StreamPublisher;
use std::future::Future;
use tracing::{debug, error, info, warn};

/// # Summary
/// 轮询循环：按固定节奏执行 抓取 → 编码 → 投递 → 等待，永不因单个周期失败而退出。
///
/// # Invariants
/// - 周期严格串行，任意时刻最多只有一个周期在执行。
/// - 首个周期在启动时立即执行。
/// - 任何周期失败都只记录日志，随后按延迟策略等待并进入下一周期。
/// - 关闭信号只在空闲等待期间生效，执行中的周期不会被取消。
pub struct Poller {
    // 目标证券，同时作为分区键
    symbol: Symbol,
    // 报价抓取器
    fetcher: QuoteFetcher,
    // 数据流发布器
    publisher: StreamPublisher,
    // 周期间等待策略
    policy: Box<dyn DelayPolicy>,
}

impl Poller {
    pub fn new(
        symbol: Symbol,
        fetcher: QuoteFetcher,
        publisher: StreamPublisher,
        policy: Box<dyn DelayPolicy>,
    ) -> Self {
        Self {
            symbol,
            fetcher,
            publisher,
            policy,
        }
    }

    /// # Summary
    /// 执行单个周期并记录结果。
    ///
    /// # Logic
    /// 1. 抓取报价、编码、投递，任一步失败即结束本周期。
    /// 2. 交易日不足与抓取失败以 warn 记录为跳过；编码与投递失败以 error 记录。
    ///
    /// # Returns
    /// 本周期的结果，不会返回错误。
    pub async fn run_once(&self) -> CycleOutcome {
        let outcome = CycleOutcome::from(self.cycle().await);
        if let CycleOutcome::Failed(e) = &outcome {
            match e.kind() {
                ErrorKind::InsufficientHistory | ErrorKind::Fetch => {
                    warn!("Skipping this cycle for {} ({}): {}", self.symbol, e.kind(), e);
                }
                ErrorKind::Encode | ErrorKind::PublishTransport => {
                    error!("Cycle failed for {} ({}): {}", self.symbol, e.kind(), e);
                }
            }
        }
        outcome
    }

    async fn cycle(&self) -> Result<PublishOutcome, CycleError> {
        let record = self.fetcher.fetch(&self.symbol).await?;
        info!("Sending: {:?}", record);

        let payload = codec::encode(&record)?;
        let outcome = self.publisher.publish(payload, self.symbol.as_str()).await?;
        Ok(outcome)
    }

    /// # Summary
    /// 启动无限轮询，直到 `shutdown` 在空闲期间完成。
    ///
    /// # Logic
    /// 1. 立即执行一个周期。
    /// 2. 由延迟策略根据周期结果给出等待时长。
    /// 3. 等待期间若收到关闭信号则退出，否则进入下一周期。
    ///
    /// # Arguments
    /// * `shutdown`: 关闭信号，例如 `tokio::signal::ctrl_c()` 的包装。
    ///
    /// # Returns
    /// 退出前执行的周期总数。
    pub async fn run<F>(mut self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        info!(
            "Poller started for {} -> stream {}",
            self.symbol,
            self.publisher.stream_name()
        );
        tokio::pin!(shutdown);

        let mut cycles: u64 = 0;
        loop {
            let outcome = self.run_once().await;
            cycles = cycles.saturating_add(1);

            let delay = self.policy.next_delay(&outcome);
            debug!("Cycle {} finished, idle for {:?}", cycles, delay);

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, poller stopped after {} cycles", cycles);
                    return cycles;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
