use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use quotecast_core::common::Symbol;
use quotecast_core::common::time::FakeClockProvider;
use quotecast_core::engine::entity::CycleOutcome;
use quotecast_core::engine::error::ErrorKind;
use quotecast_core::engine::port::DelayPolicy;
use quotecast_core::market::codec;
use quotecast_core::market::entity::SessionBar;
use quotecast_core::market::error::MarketError;
use quotecast_core::market::port::QuoteProvider;
use quotecast_core::stream::entity::PublishAck;
use quotecast_core::stream::error::StreamError;
use quotecast_core::stream::port::StreamSink;
use quotecast_engine::policy::FixedDelay;
use quotecast_engine::poller::Poller;
use quotecast_feed::fetcher::QuoteFetcher;
use quotecast_stream::publisher::StreamPublisher;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

const STREAM: &str = "stock-market-stream";

type SessionsResult = Result<Vec<SessionBar>, MarketError>;

/// 按脚本依次返回结果的数据源；第 `stop_after` 次调用时触发关闭信号
struct ScriptedProvider {
    script: Mutex<VecDeque<SessionsResult>>,
    calls: AtomicUsize,
    stop_after: usize,
    stop: Mutex<Option<oneshot::Sender<()>>>,
}

impl ScriptedProvider {
    fn new(script: Vec<SessionsResult>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            stop_after: usize::MAX,
            stop: Mutex::new(None),
        })
    }

    fn stopping_after(
        script: Vec<SessionsResult>,
        stop_after: usize,
    ) -> (Arc<Self>, impl Future<Output = ()>) {
        let (tx, rx) = oneshot::channel();
        let provider = Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            stop_after,
            stop: Mutex::new(Some(tx)),
        });
        let shutdown = async move {
            let _ = rx.await;
        };
        (provider, shutdown)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for ScriptedProvider {
    async fn fetch_sessions(&self, _symbol: &Symbol, _sessions: usize) -> SessionsResult {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.stop_after {
            if let Some(tx) = self.stop.lock().unwrap().take() {
                let _ = tx.send(());
            }
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(MarketError::NotFound))
    }
}

/// 记录投递参数并返回固定回执的驱动
struct RecordingSink {
    response: Result<PublishAck, StreamError>,
    records: Mutex<Vec<(String, Vec<u8>, String)>>,
}

impl RecordingSink {
    fn new(response: Result<PublishAck, StreamError>) -> Arc<Self> {
        Arc::new(Self {
            response,
            records: Mutex::new(Vec::new()),
        })
    }

    fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl StreamSink for RecordingSink {
    async fn put_record(
        &self,
        stream_name: &str,
        payload: Vec<u8>,
        partition_key: &str,
    ) -> Result<PublishAck, StreamError> {
        self.records.lock().unwrap().push((
            stream_name.to_string(),
            payload,
            partition_key.to_string(),
        ));
        self.response.clone()
    }
}

/// 记录每个周期结果的固定间隔策略
struct RecordingPolicy {
    delay: Duration,
    seen: Arc<Mutex<Vec<CycleOutcome>>>,
}

impl DelayPolicy for RecordingPolicy {
    fn next_delay(&mut self, outcome: &CycleOutcome) -> Duration {
        self.seen.lock().unwrap().push(outcome.clone());
        self.delay
    }
}

fn two_sessions() -> Vec<SessionBar> {
    vec![
        SessionBar {
            time: Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap(),
            open: 99.0,
            high: 100.2,
            low: 98.4,
            close: 100.00,
            volume: 800.0,
        },
        SessionBar {
            time: Utc.with_ymd_and_hms(2024, 3, 4, 14, 30, 0).unwrap(),
            open: 101.0,
            high: 103.0,
            low: 100.5,
            close: 102.50,
            volume: 1000.0,
        },
    ]
}

fn ok_ack() -> PublishAck {
    PublishAck::accepted("shardId-000000000000", "49590338271490256608559692538361571095921575989136588898")
}

fn poller(
    provider: Arc<ScriptedProvider>,
    sink: Arc<RecordingSink>,
    policy: Box<dyn DelayPolicy>,
) -> Poller {
    let clock = Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2024, 3, 4, 21, 0, 3).unwrap(),
    ));
    Poller::new(
        Symbol::new("AAPL").unwrap(),
        QuoteFetcher::new(provider, clock),
        StreamPublisher::new(sink, STREAM),
        policy,
    )
}

/// # Summary
/// 单周期端到端：行情 → 记录 → JSON → 以证券代码为分区键投递。
#[tokio::test]
async fn test_run_once_publishes_encoded_record() {
    let provider = ScriptedProvider::new(vec![Ok(two_sessions())]);
    let sink = RecordingSink::new(Ok(ok_ack()));
    let poller = poller(provider.clone(), sink.clone(), Box::new(FixedDelay::ZERO));

    let outcome = poller.run_once().await;

    assert_eq!(outcome, CycleOutcome::Sent(ok_ack()));
    let records = sink.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    let (stream, payload, key) = &records[0];
    assert_eq!(stream, STREAM);
    assert_eq!(key, "AAPL");

    let json: serde_json::Value = serde_json::from_slice(payload).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "symbol": "AAPL",
            "open": 101.0,
            "high": 103.0,
            "low": 100.5,
            "price": 102.5,
            "previous_close": 100.0,
            "change": 2.5,
            "change_percent": 2.5,
            "volume": 1000,
            "timestamp": "2024-03-04T21:00:03Z"
        })
    );

    let decoded = codec::decode(payload).unwrap();
    assert_eq!(decoded.symbol, "AAPL");
    assert_eq!(decoded.volume, 1000);
}

/// # Summary
/// 各类失败都被转换为周期结果，不会向外抛出。
#[tokio::test]
async fn test_run_once_classifies_failures() {
    // 交易日不足：不投递
    let provider = ScriptedProvider::new(vec![Ok(two_sessions()[1..].to_vec())]);
    let sink = RecordingSink::new(Ok(ok_ack()));
    let outcome = poller(provider, sink.clone(), Box::new(FixedDelay::ZERO))
        .run_once()
        .await;
    assert_eq!(outcome.error_kind(), Some(ErrorKind::InsufficientHistory));
    assert_eq!(sink.count(), 0);

    // 数据源故障：不投递
    let provider = ScriptedProvider::new(vec![Err(MarketError::Network("HTTP 503".into()))]);
    let sink = RecordingSink::new(Ok(ok_ack()));
    let outcome = poller(provider, sink.clone(), Box::new(FixedDelay::ZERO))
        .run_once()
        .await;
    assert_eq!(outcome.error_kind(), Some(ErrorKind::Fetch));
    assert_eq!(sink.count(), 0);

    // 投递调用失败
    let provider = ScriptedProvider::new(vec![Ok(two_sessions())]);
    let sink = RecordingSink::new(Err(StreamError::Transport("connection reset".into())));
    let outcome = poller(provider, sink.clone(), Box::new(FixedDelay::ZERO))
        .run_once()
        .await;
    assert_eq!(outcome.error_kind(), Some(ErrorKind::PublishTransport));
    assert_eq!(sink.count(), 1);

    // 非成功回执：记录为被拒绝，不算调用失败
    let rejected = PublishAck {
        status: 500,
        shard_id: None,
        sequence_number: None,
    };
    let provider = ScriptedProvider::new(vec![Ok(two_sessions())]);
    let sink = RecordingSink::new(Ok(rejected.clone()));
    let outcome = poller(provider, sink.clone(), Box::new(FixedDelay::ZERO))
        .run_once()
        .await;
    assert_eq!(outcome, CycleOutcome::Rejected(rejected));
    assert_eq!(outcome.error_kind(), None);
}

/// # Summary
/// 抓取失败后跳过本周期，等待配置的间隔，再恰好执行一个周期。
#[tokio::test(start_paused = true)]
async fn test_fetch_fault_waits_then_retries_once() {
    let (provider, shutdown) = ScriptedProvider::stopping_after(
        vec![
            Err(MarketError::Network("HTTP 429".into())),
            Ok(two_sessions()),
        ],
        2,
    );
    let sink = RecordingSink::new(Ok(ok_ack()));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let policy = RecordingPolicy {
        delay: Duration::from_secs(30),
        seen: seen.clone(),
    };
    let poller = poller(provider.clone(), sink.clone(), Box::new(policy));

    let started = tokio::time::Instant::now();
    let cycles = poller.run(shutdown).await;
    let elapsed = started.elapsed();

    assert_eq!(cycles, 2);
    assert_eq!(provider.calls(), 2);
    assert_eq!(sink.count(), 1);
    assert!(elapsed >= Duration::from_secs(30), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(60), "elapsed {elapsed:?}");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].error_kind(), Some(ErrorKind::Fetch));
    assert_eq!(seen[1], CycleOutcome::Sent(ok_ack()));
}

/// # Summary
/// 连续失败不会计数、升级或终止循环。
#[tokio::test]
async fn test_loop_survives_consecutive_failures() {
    let failures = (0..5)
        .map(|_| Err(MarketError::Unknown("No data found, symbol may be delisted".into())))
        .collect();
    let (provider, shutdown) = ScriptedProvider::stopping_after(failures, 5);
    let sink = RecordingSink::new(Ok(ok_ack()));
    let poller = poller(provider.clone(), sink.clone(), Box::new(FixedDelay::ZERO));

    let cycles = poller.run(shutdown).await;

    assert_eq!(cycles, 5);
    assert_eq!(provider.calls(), 5);
    assert_eq!(sink.count(), 0);
}
