use crate::engine::error::{CycleError, ErrorKind};
use crate::stream::entity::{PublishAck, PublishOutcome};

/// # Summary
/// 单个轮询周期（抓取、编码、投递）的结果。
///
/// # Invariants
/// - 每个周期恰好产生一个结果，随后循环进入等待。
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    // 记录已投递且回执成功
    Sent(PublishAck),
    // 记录已投递但回执为非成功状态
    Rejected(PublishAck),
    // 周期在某个阶段失败
    Failed(CycleError),
}

impl CycleOutcome {
    /// 回执成功才算成功周期
    pub fn is_success(&self) -> bool {
        matches!(self, CycleOutcome::Sent(_))
    }

    /// 失败周期的分类；回执被拒绝不属于调用失败，返回 None
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            CycleOutcome::Failed(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<PublishOutcome> for CycleOutcome {
    fn from(outcome: PublishOutcome) -> Self {
        match outcome {
            PublishOutcome::Sent(ack) => CycleOutcome::Sent(ack),
            PublishOutcome::Rejected(ack) => CycleOutcome::Rejected(ack),
        }
    }
}

impl From<Result<PublishOutcome, CycleError>> for CycleOutcome {
    fn from(result: Result<PublishOutcome, CycleError>) -> Self {
        match result {
            Ok(outcome) => outcome.into(),
            Err(e) => CycleOutcome::Failed(e),
        }
    }
}
