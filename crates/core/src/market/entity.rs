use crate::common::Symbol;
use crate::market::error::MarketError;
use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// 报价记录中所有价格字段保留的小数位数
pub const PRICE_DP: u32 = 2;

/// # Summary
/// 单个交易日的日线数据，保留数据源原生的浮点表示。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionBar {
    // 交易日开始时间
    pub time: DateTime<Utc>,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量 (数据源以浮点数下发)
    pub volume: f64,
}

/// # Summary
/// 推送到数据流的报价快照，每个轮询周期重新构建。
///
/// # Invariants
/// - 所有价格字段精确到两位小数。
/// - `change == price - previous_close`，`change_percent == change / previous_close * 100`（四舍五入误差内）。
/// - `timestamp` 为采集时刻，精确到秒，而不是行情本身的时间。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub symbol: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub price: Decimal,
    pub previous_close: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub volume: u64,
    #[serde(with = "second_precision")]
    pub timestamp: DateTime<Utc>,
}

impl QuoteRecord {
    /// # Summary
    /// 由相邻两个交易日构建报价记录。
    ///
    /// # Logic
    /// 1. 将数据源浮点数转换为 `Decimal`，拒绝 NaN 与无穷值。
    /// 2. 基于未取整的收盘价计算涨跌额与涨跌幅，再统一取两位小数。
    /// 3. 成交量截断为非负整数。
    /// 4. 采集时间截断到秒。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `previous`: 前一交易日。
    /// * `current`: 最近交易日。
    /// * `captured_at`: 采集时刻。
    ///
    /// # Returns
    /// 任一数值非法时返回 `MarketError::Parse`，不会产生部分填充的记录。
    pub fn from_sessions(
        symbol: &Symbol,
        previous: &SessionBar,
        current: &SessionBar,
        captured_at: DateTime<Utc>,
    ) -> Result<Self, MarketError> {
        let close = to_decimal("close", current.close)?;
        let previous_close = to_decimal("previous close", previous.close)?;
        if previous_close.is_zero() {
            return Err(MarketError::Parse(
                "previous close is zero, change percent undefined".into(),
            ));
        }

        let change = close - previous_close;
        let change_percent = change
            .checked_div(previous_close)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| MarketError::Parse("change percent overflow".into()))?;

        Ok(Self {
            symbol: symbol.to_string(),
            open: round_price(to_decimal("open", current.open)?),
            high: round_price(to_decimal("high", current.high)?),
            low: round_price(to_decimal("low", current.low)?),
            price: round_price(close),
            previous_close: round_price(previous_close),
            change: round_price(change),
            change_percent: round_price(change_percent),
            volume: to_volume(current.volume)?,
            timestamp: captured_at.trunc_subsecs(0),
        })
    }
}

/// # Summary
/// 按银行家舍入法保留两位小数。
///
/// # Invariants
/// - 舍入作用于 `Decimal::from_f64` 得到的十进制值，而不是二进制浮点本身。
///   因此 `1.015` 得到 `1.02`、`2.675` 得到 `2.68`，与直接对 f64 取整
///   （得到 `1.01`、`2.67`）在三位小数中点上有意不同，差值不超过 0.01。
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PRICE_DP, RoundingStrategy::MidpointNearestEven)
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal, MarketError> {
    Decimal::from_f64(value)
        .ok_or_else(|| MarketError::Parse(format!("{field} is not a finite number: {value}")))
}

fn to_volume(value: f64) -> Result<u64, MarketError> {
    to_decimal("volume", value)?
        .trunc()
        .to_u64()
        .ok_or_else(|| MarketError::Parse(format!("volume must be non-negative: {value}")))
}

/// 以 `YYYY-MM-DDTHH:MM:SSZ` 格式读写时间戳
mod second_precision {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
