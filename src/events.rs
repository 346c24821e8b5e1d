//! Events - notification values produced alongside committed operations
//!
//! The core PRODUCES these values and returns them to the caller; delivery
//! to any observer is an external collaborator's job. Nothing here is read
//! back by the engine.
//!
//! # Event Flow
//!
//! ```text
//! buy/sell      → PortfolioEvent::Trade
//! split         → PortfolioEvent::Split
//! reverse_split → PortfolioEvent::ReverseSplit
//! ```

use serde::{Deserialize, Serialize};

use crate::core_types::{MarketIndex, Price, Quantity, TradeIndex};

/// Notification emitted for every committed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PortfolioEvent {
    /// Emitted once per buy/sell (including each element of a bulk buy)
    Trade {
        market: MarketIndex,
        symbol: String,
        is_sell: bool,
        quantity: Quantity,
        price: Price,
    },
    /// Forward split: quantity multiplied, cost basis divided
    Split {
        market: MarketIndex,
        symbol: String,
        multiple: u64,
    },
    /// Reverse split: quantity divided, remainder force-liquidated
    ReverseSplit {
        market: MarketIndex,
        symbol: String,
        divisor: u64,
    },
}

/// Result of a committed buy or sell: the permanent trade index plus the
/// notification value for the external observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub trade_index: TradeIndex,
    pub event: PortfolioEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = PortfolioEvent::Split {
            market: 0,
            symbol: "acb".into(),
            multiple: 3,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"split\""));
        assert!(json.contains("\"multiple\":3"));
    }
}
