use quotecast_core::stream::entity::PublishOutcome;
use quotecast_core::stream::error::StreamError;
use quotecast_core::stream::port::StreamSink;
use std::sync::Arc;
use tracing::{error, info};

/// # Summary
/// 数据流发布器：把一条已编码记录投递到配置好的数据流，并对回执分类。
///
/// # Invariants
/// - 每次调用只投递一次，不重试、不缓冲、不批量。
/// - 非成功回执只记录日志，不转换为错误。
/// - 投递调用本身的失败原样向上抛出，由轮询循环处理。
pub struct StreamPublisher {
    // 投递驱动
    sink: Arc<dyn StreamSink>,
    // 预先存在的数据流名称
    stream_name: String,
}

impl StreamPublisher {
    pub fn new(sink: Arc<dyn StreamSink>, stream_name: impl Into<String>) -> Self {
        Self {
            sink,
            stream_name: stream_name.into(),
        }
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    /// # Summary
    /// 投递一条消息。
    ///
    /// # Logic
    /// 1. 以分区键（证券代码）调用投递驱动。
    /// 2. 回执状态码为 200 时记为已发送，否则记为被拒绝并输出错误日志。
    ///
    /// # Arguments
    /// * `payload`: 已编码的记录。
    /// * `partition_key`: 分区键。
    ///
    /// # Returns
    /// 流服务作出应答时返回分类结果，调用失败返回 `StreamError`。
    pub async fn publish(
        &self,
        payload: Vec<u8>,
        partition_key: &str,
    ) -> Result<PublishOutcome, StreamError> {
        let ack = self
            .sink
            .put_record(&self.stream_name, payload, partition_key)
            .await?;

        if ack.is_success() {
            info!(
                "Record sent to {} [key={}] shard={} seq={}",
                self.stream_name,
                partition_key,
                ack.shard_id.as_deref().unwrap_or("-"),
                ack.sequence_number.as_deref().unwrap_or("-"),
            );
            Ok(PublishOutcome::Sent(ack))
        } else {
            error!(
                "Error sending to {} [key={}]: stream answered HTTP {}",
                self.stream_name, partition_key, ack.status
            );
            Ok(PublishOutcome::Rejected(ack))
        }
    }
}
