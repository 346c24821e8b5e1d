//! Trade Log / Holdings Log - append-only audit history
//!
//! Every buy and sell is recorded as one immutable entry; every buy also
//! appends the touched stock key to the holdings log (one entry per buy,
//! NOT deduplicated). The sequence index is an entry's permanent identity:
//! there is no removal or in-place mutation API at all.

use serde::{Deserialize, Serialize};

use crate::core_types::{HoldingIndex, MarketIndex, Price, Quantity, TradeIndex};
use crate::error::PortfolioError;
use crate::stock_key::StockKey;

/// One executed buy or sell, immutable once appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub market: MarketIndex,
    pub symbol: String,
    pub is_sell: bool,
    pub quantity: Quantity,
    pub price: Price,
}

/// Append-only trade history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeLog {
    entries: Vec<TradeRecord>,
}

impl TradeLog {
    /// Append a record, returning its permanent index.
    /// Only the operation engine calls this, as part of a larger commit.
    pub(crate) fn append(&mut self, record: TradeRecord) -> TradeIndex {
        self.entries.push(record);
        (self.entries.len() - 1) as TradeIndex
    }

    /// Record at an index
    ///
    /// # Errors
    /// `IndexOutOfRange` if index >= len.
    pub fn get(&self, index: TradeIndex) -> Result<&TradeRecord, PortfolioError> {
        self.entries
            .get(index as usize)
            .ok_or(PortfolioError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only iteration for snapshot dumps
    pub fn iter(&self) -> impl Iterator<Item = &TradeRecord> {
        self.entries.iter()
    }
}

/// Append-only record of stock keys touched by buys, in trade order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoldingsLog {
    entries: Vec<StockKey>,
}

impl HoldingsLog {
    pub(crate) fn append(&mut self, key: StockKey) -> HoldingIndex {
        self.entries.push(key);
        (self.entries.len() - 1) as HoldingIndex
    }

    /// Stock key at an index
    ///
    /// # Errors
    /// `IndexOutOfRange` if index >= len.
    pub fn get(&self, index: HoldingIndex) -> Result<&StockKey, PortfolioError> {
        self.entries
            .get(index as usize)
            .ok_or(PortfolioError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StockKey> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, is_sell: bool) -> TradeRecord {
        TradeRecord {
            market: 0,
            symbol: symbol.to_string(),
            is_sell,
            quantity: 10,
            price: 100,
        }
    }

    #[test]
    fn test_append_assigns_sequential_indices() {
        let mut log = TradeLog::default();
        assert_eq!(log.append(record("acb", false)), 0);
        assert_eq!(log.append(record("ry", false)), 1);
        assert_eq!(log.append(record("acb", true)), 2);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_get_out_of_range() {
        let mut log = TradeLog::default();
        log.append(record("acb", false));
        assert!(log.get(0).is_ok());
        assert_eq!(
            log.get(1),
            Err(PortfolioError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_records_are_stable() {
        let mut log = TradeLog::default();
        log.append(record("acb", false));
        log.append(record("ry", true));
        // Later appends never disturb earlier entries
        assert_eq!(log.get(0).unwrap().symbol, "acb");
        assert!(!log.get(0).unwrap().is_sell);
        assert!(log.get(1).unwrap().is_sell);
    }

    #[test]
    fn test_holdings_log_keeps_duplicates() {
        let mut log = HoldingsLog::default();
        let key = StockKey::derive("tsx", "acb");
        log.append(key);
        log.append(key); // same key bought twice → two entries
        assert_eq!(log.len(), 2);
        assert_eq!(log.get(0).unwrap(), log.get(1).unwrap());
    }
}
