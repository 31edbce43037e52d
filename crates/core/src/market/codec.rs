//! 报价记录的 JSON 线上格式。
//!
//! 价格以 JSON 数字输出（`rust_decimal` 的 `serde-float`），成交量为整数，
//! 时间戳为 `YYYY-MM-DDTHH:MM:SSZ`。

use crate::market::entity::{PRICE_DP, QuoteRecord};
use crate::market::error::CodecError;
use rust_decimal::Decimal;

/// # Summary
/// 将报价记录序列化为推送到数据流的字节。
///
/// # Logic
/// 1. 校验记录满足线上格式约束（代码非空，价格不超过两位小数）。
/// 2. 按字段声明顺序序列化为紧凑 JSON，相同输入得到相同字节。
///
/// # Arguments
/// * `record`: 待编码的报价记录。
///
/// # Returns
/// 成功返回 JSON 字节，不合法的记录返回 `CodecError::Malformed`。
pub fn encode(record: &QuoteRecord) -> Result<Vec<u8>, CodecError> {
    validate(record)?;
    serde_json::to_vec(record).map_err(|e| CodecError::Encode(e.to_string()))
}

/// # Summary
/// 将线上字节解析回报价记录。
pub fn decode(bytes: &[u8]) -> Result<QuoteRecord, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

fn validate(record: &QuoteRecord) -> Result<(), CodecError> {
    if record.symbol.trim().is_empty() {
        return Err(CodecError::Malformed("symbol is empty".into()));
    }

    let prices: [(&str, Decimal); 7] = [
        ("open", record.open),
        ("high", record.high),
        ("low", record.low),
        ("price", record.price),
        ("previous_close", record.previous_close),
        ("change", record.change),
        ("change_percent", record.change_percent),
    ];
    for (field, value) in prices {
        if value.scale() > PRICE_DP {
            return Err(CodecError::Malformed(format!(
                "{field} has more than {PRICE_DP} decimal places: {value}"
            )));
        }
    }

    Ok(())
}
