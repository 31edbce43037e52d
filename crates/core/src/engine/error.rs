use crate::market::error::{CodecError, MarketError};
use crate::stream::error::StreamError;
use std::fmt;
use thiserror::Error;

/// # Summary
/// 单个轮询周期的失败原因，按阶段区分。
///
/// # Invariants
/// - 任何变体都只终止当前周期，不会终止轮询循环。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CycleError {
    // 行情抓取失败（含交易日不足）
    #[error("Fetch failed: {0}")]
    Fetch(#[from] MarketError),
    // 记录编码失败
    #[error("Encode failed: {0}")]
    Encode(#[from] CodecError),
    // 投递调用本身失败
    #[error("Publish failed: {0}")]
    Publish(#[from] StreamError),
}

/// # Summary
/// 周期失败类型的扁平分类，供延迟策略按类型分支。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InsufficientHistory,
    Fetch,
    Encode,
    PublishTransport,
}

impl CycleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CycleError::Fetch(MarketError::InsufficientHistory { .. }) => {
                ErrorKind::InsufficientHistory
            }
            CycleError::Fetch(_) => ErrorKind::Fetch,
            CycleError::Encode(_) => ErrorKind::Encode,
            CycleError::Publish(_) => ErrorKind::PublishTransport,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InsufficientHistory => write!(f, "insufficient_history"),
            ErrorKind::Fetch => write!(f, "fetch"),
            ErrorKind::Encode => write!(f, "encode"),
            ErrorKind::PublishTransport => write!(f, "publish_transport"),
        }
    }
}
