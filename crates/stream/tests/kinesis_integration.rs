use quotecast_core::config::StreamConfig;
use quotecast_core::stream::port::StreamSink;
use quotecast_stream::kinesis::KinesisSink;
use std::env;

/// # Summary
/// 集成测试：向真实（或 LocalStack）Kinesis 数据流写入一条记录。
///
/// # Logic
/// 1. 加载 .env 环境变量。
/// 2. 从环境变量获取数据流名称、区域与可选的 endpoint。
/// 3. 写入测试消息并断言回执成功。
#[tokio::test]
#[ignore] // 默认忽略，仅在手动测试时通过环境变量开启
async fn test_kinesis_put_record() {
    let _ = dotenvy::dotenv();
    let config = StreamConfig {
        name: env::var("QUOTECAST_TEST_STREAM").expect("QUOTECAST_TEST_STREAM must be set"),
        region: env::var("QUOTECAST_TEST_REGION").expect("QUOTECAST_TEST_REGION must be set"),
        endpoint_url: env::var("QUOTECAST_TEST_ENDPOINT").ok(),
        timeout_secs: 10,
    };

    let sink = KinesisSink::from_config(&config).await;
    let ack = sink
        .put_record(&config.name, br#"{"symbol":"TEST"}"#.to_vec(), "TEST")
        .await;

    assert!(ack.is_ok(), "PutRecord failed: {:?}", ack);
    let ack = ack.unwrap();
    assert!(ack.is_success());
    assert!(ack.shard_id.is_some());
}
