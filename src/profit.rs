//! Profit Ledger - per-market realized P&L accumulators
//!
//! One signed running total per registered market, mutated only by sells
//! and by the forced-liquidation remainder of reverse splits. Never reset;
//! may go negative.
//!
//! # Data Structure:
//! `Vec<Profit>` sized to the registry, with `MarketIndex` used directly
//! as the array index. The market set is fixed at construction, so direct
//! indexing gives O(1) lookup with no hashing and no missing-key case.

use serde::{Deserialize, Serialize};

use crate::core_types::{MarketIndex, Profit};

/// Per-market realized profit/loss totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitLedger {
    totals: Vec<Profit>, // PRIVATE - index == MarketIndex
}

impl ProfitLedger {
    /// Create a ledger with one zeroed accumulator per market.
    pub fn new(market_count: usize) -> Self {
        Self {
            totals: vec![0; market_count],
        }
    }

    /// Running total for a market; zero if never touched.
    /// The engine validates the market index before any call lands here.
    #[inline]
    pub fn get(&self, market: MarketIndex) -> Profit {
        self.totals.get(market as usize).copied().unwrap_or(0)
    }

    /// Add a realized amount (may be negative) to a market's total.
    ///
    /// # Errors
    /// "Profit ledger overflow" if the running total leaves the i64 range.
    pub(crate) fn accumulate(
        &mut self,
        market: MarketIndex,
        amount: Profit,
    ) -> Result<(), &'static str> {
        let slot = self
            .totals
            .get_mut(market as usize)
            .ok_or("Unknown market in profit ledger")?;
        *slot = slot.checked_add(amount).ok_or("Profit ledger overflow")?;
        Ok(())
    }

    /// Read-only view of all totals, index order (for snapshot dumps)
    pub fn totals(&self) -> &[Profit] {
        &self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let ledger = ProfitLedger::new(5);
        for market in 0..5 {
            assert_eq!(ledger.get(market), 0);
        }
    }

    #[test]
    fn test_accumulates_signed() {
        let mut ledger = ProfitLedger::new(2);
        ledger.accumulate(0, 305_600).unwrap();
        ledger.accumulate(0, -5_600).unwrap();
        assert_eq!(ledger.get(0), 300_000);
        assert_eq!(ledger.get(1), 0); // other markets untouched
    }

    #[test]
    fn test_may_go_negative() {
        let mut ledger = ProfitLedger::new(1);
        ledger.accumulate(0, -1_000).unwrap();
        assert_eq!(ledger.get(0), -1_000);
    }

    #[test]
    fn test_overflow_detected() {
        let mut ledger = ProfitLedger::new(1);
        ledger.accumulate(0, i64::MAX).unwrap();
        assert!(ledger.accumulate(0, 1).is_err());
        assert_eq!(ledger.get(0), i64::MAX); // Unchanged
    }
}
