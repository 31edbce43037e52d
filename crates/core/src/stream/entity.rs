use serde::{Deserialize, Serialize};

/// 流服务确认成功时的状态码
pub const ACK_SUCCESS_STATUS: u16 = 200;

/// # Summary
/// 流服务对单条消息的确认回执。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishAck {
    // HTTP 风格状态码
    pub status: u16,
    // 消息落入的分片
    pub shard_id: Option<String>,
    // 分片内序列号
    pub sequence_number: Option<String>,
}

impl PublishAck {
    /// 构造一个成功回执
    pub fn accepted(shard_id: impl Into<String>, sequence_number: impl Into<String>) -> Self {
        Self {
            status: ACK_SUCCESS_STATUS,
            shard_id: Some(shard_id.into()),
            sequence_number: Some(sequence_number.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ACK_SUCCESS_STATUS
    }
}

/// # Summary
/// 发布器对回执的分类结果。
///
/// # Invariants
/// - 非成功回执只被记录，不会转换成错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// 状态码为 200
    Sent(PublishAck),
    /// 流服务接收了调用但返回了非成功状态
    Rejected(PublishAck),
}

impl PublishOutcome {
    pub fn ack(&self) -> &PublishAck {
        match self {
            PublishOutcome::Sent(ack) | PublishOutcome::Rejected(ack) => ack,
        }
    }
}
