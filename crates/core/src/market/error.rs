use thiserror::Error;

/// # Summary
/// 市场数据域错误枚举，处理网络、解析及数据缺失等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 数据解析错误，如 JSON 格式不匹配或数值非法
    #[error("Parse error: {0}")]
    Parse(String),
    // 请求的数据未找到 (404 或内容为空)
    #[error("Data not found")]
    NotFound,
    // 证券代码为空或无法识别
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),
    // 返回的交易日数量不足以计算涨跌
    #[error("Insufficient history: required {required} sessions, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },
    // 未知或未分类的错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// # Summary
/// 报价记录编解码错误。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// 记录不满足线上格式约束 (例如精度超过两位小数)
    #[error("Malformed record: {0}")]
    Malformed(String),
    /// 序列化失败
    #[error("Encode error: {0}")]
    Encode(String),
    /// 反序列化失败
    #[error("Decode error: {0}")]
    Decode(String),
}
