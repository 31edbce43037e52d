pub mod time;

use crate::market::error::MarketError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// # Summary
/// 证券代码，作为行情请求参数与流分区键。
///
/// # Invariants
/// - 去除首尾空白后非空。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// # Summary
    /// 校验并构造证券代码。
    ///
    /// # Arguments
    /// * `raw`: 原始代码字符串 (例如: AAPL)。
    ///
    /// # Returns
    /// 空白代码返回 `MarketError::InvalidSymbol`。
    pub fn new(raw: impl Into<String>) -> Result<Self, MarketError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MarketError::InvalidSymbol(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = MarketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_trims_whitespace() {
        let symbol: Symbol = "  AAPL ".parse().unwrap();
        assert_eq!(symbol.as_str(), "AAPL");
        assert_eq!(symbol.to_string(), "AAPL");
    }

    #[test]
    fn test_symbol_rejects_blank() {
        assert!(matches!(Symbol::new(""), Err(MarketError::InvalidSymbol(_))));
        assert!(matches!(Symbol::new("   "), Err(MarketError::InvalidSymbol(_))));
    }
}
