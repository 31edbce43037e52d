use thiserror::Error;

/// # Summary
/// 数据流投递错误枚举。
///
/// # Invariants
/// - 两种变体都代表调用本身失败，由轮询循环捕获，发布器不做处理。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    /// 连接、超时或请求构造失败
    #[error("Transport error: {0}")]
    Transport(String),

    /// 流服务返回的错误响应 (限流、流不存在、鉴权失败等)
    #[error("Service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },
}
