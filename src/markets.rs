//! Market Registry - fixed enumerated list of market identifiers
//!
//! The registry is assigned once at construction and read-only afterwards.
//! Every operation resolves its market through `code_at` before touching
//! any other store; an unknown index fails the whole operation.

use serde::{Deserialize, Serialize};

use crate::core_types::MarketIndex;
use crate::error::PortfolioError;

/// Market codes registered by default, in index order.
///
/// Index assignment is part of the durable contract: trade records and the
/// profit ledger reference markets by index, so the order must never change.
pub const DEFAULT_MARKETS: [&str; 5] = ["tsx", "tsxv", "otc", "nyse", "nasdaq"];

/// Immutable market registry
///
/// # Invariants:
/// - Codes are assigned contiguous indices (0, 1, 2, ...) at construction
/// - No insert/remove/update API exists after construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRegistry {
    codes: Vec<String>,
}

impl Default for MarketRegistry {
    fn default() -> Self {
        Self::new(&DEFAULT_MARKETS)
    }
}

impl MarketRegistry {
    /// Build a registry from an ordered list of market codes.
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: codes.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Number of registered markets
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Whether the index refers to a registered market
    #[inline]
    pub fn contains(&self, index: MarketIndex) -> bool {
        (index as usize) < self.codes.len()
    }

    /// Market code at an index
    ///
    /// # Errors
    /// `InvalidMarket` if the index is outside the registered range.
    pub fn code_at(&self, index: MarketIndex) -> Result<&str, PortfolioError> {
        self.codes
            .get(index as usize)
            .map(String::as_str)
            .ok_or(PortfolioError::InvalidMarket(index))
    }

    /// Reverse lookup: code → index. Used by fixture loading, not by the
    /// operation engine (which always works in indices).
    pub fn index_of(&self, code: &str) -> Option<MarketIndex> {
        self.codes
            .iter()
            .position(|c| c == code)
            .map(|i| i as MarketIndex)
    }

    /// Read-only view of all codes, index order
    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let reg = MarketRegistry::default();
        assert_eq!(reg.len(), 5);
        assert_eq!(reg.code_at(0).unwrap(), "tsx");
        assert_eq!(reg.code_at(4).unwrap(), "nasdaq");
    }

    #[test]
    fn test_out_of_range_index() {
        let reg = MarketRegistry::default();
        assert!(!reg.contains(5));
        assert_eq!(reg.code_at(5), Err(PortfolioError::InvalidMarket(5)));
    }

    #[test]
    fn test_index_of() {
        let reg = MarketRegistry::default();
        assert_eq!(reg.index_of("nyse"), Some(3));
        assert_eq!(reg.index_of("lse"), None);
    }
}
