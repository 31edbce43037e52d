mod settings;

use std::sync::Arc;

use quotecast_core::common::Symbol;
use quotecast_core::common::time::RealTimeProvider;
use quotecast_engine::policy;
use quotecast_engine::poller::Poller;
use quotecast_feed::fetcher::QuoteFetcher;
use quotecast_feed::yahoo::YahooProvider;
use quotecast_stream::kinesis::KinesisSink;
use quotecast_stream::publisher::StreamPublisher;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责加载配置、实例化所有具体实现组件并通过 Arc<dyn Trait> 注入轮询循环。
///
/// # Logic
/// 1. 初始化全局日志（默认 info，可由 RUST_LOG 覆盖）。
/// 2. 加载并校验配置，失败则直接退出。
/// 3. 实例化基础设施层（Yahoo 行情源、Kinesis 投递驱动）。
/// 4. 构造抓取器、发布器与延迟策略，组装轮询循环。
/// 5. 运行直到收到外部退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!("Quotecast starting...");

    // reqwest 使用 rustls-no-provider，需要进程级加密后端
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }

    // 2. 加载配置
    let config = settings::load()?;
    let symbol = Symbol::new(config.feed.symbol.clone())?;
    info!(
        "Config loaded: symbol={} stream={} region={} delay={}s backoff={:?}",
        symbol,
        config.stream.name,
        config.stream.region,
        config.poller.delay_secs,
        config.poller.backoff
    );

    // 3. 实例化基础设施层
    let provider = Arc::new(YahooProvider::new(&config.feed)?);
    let sink = Arc::new(KinesisSink::from_config(&config.stream).await);

    // 4. 组装轮询循环
    let fetcher = QuoteFetcher::new(provider, Arc::new(RealTimeProvider));
    let publisher = StreamPublisher::new(sink, config.stream.name.clone());
    let poller = Poller::new(symbol, fetcher, publisher, policy::from_config(&config.poller));

    // 5. 运行直到外部退出信号
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let cycles = poller.run(shutdown).await;
    info!("Shutdown signal received. Exiting after {} cycles...", cycles);

    Ok(())
}
