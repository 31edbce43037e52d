use crate::stream::entity::PublishAck;
use crate::stream::error::StreamError;
use async_trait::async_trait;

/// # Summary
/// 追加写数据流的投递接口。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync`，客户端句柄在进程启动时构建一次。
/// - 单次调用只投递一条消息，不做重试、缓冲或批量合并。
#[async_trait]
pub trait StreamSink: Send + Sync {
    /// # Summary
    /// 向指定数据流写入一条消息。
    ///
    /// # Arguments
    /// * `stream_name` - 预先存在的数据流名称。
    /// * `payload` - 已编码的消息体。
    /// * `partition_key` - 分区键，相同键的消息保持顺序。
    ///
    /// # Returns
    /// * 流服务作出应答时返回 `Ok(PublishAck)`，无论状态码是否成功。
    /// * 调用本身失败返回 `Err(StreamError)`。
    async fn put_record(
        &self,
        stream_name: &str,
        payload: Vec<u8>,
        partition_key: &str,
    ) -> Result<PublishAck, StreamError>;
}
