//! Stock Portfolio - single-writer accounting ledger
//!
//! Tracks stock positions across a fixed set of markets, records an
//! immutable trade history, and computes realized profit/loss including
//! corporate actions (splits, reverse splits). All arithmetic is exact
//! integer minor-units; every operation commits atomically or not at all.
//!
//! # Modules
//!
//! - [`core_types`] - Fundamental type aliases (MarketIndex, Quantity, ...)
//! - [`error`] - Precondition-violation error taxonomy
//! - [`markets`] - Fixed market registry
//! - [`stock_key`] - (market, symbol) → stable 32-byte key derivation
//! - [`position`] - Enforced position type (blended average cost basis)
//! - [`trade_log`] - Append-only trade and holdings logs
//! - [`profit`] - Per-market realized P&L accumulators
//! - [`events`] - Notification values for the external observer
//! - [`portfolio`] - The operation engine (buy/sell/bulk_buy/splits)
//! - [`csv_io`] - Fixture loading and snapshot dumps
//! - [`config`] / [`logging`] - Replay binary plumbing

// Core types - must be first!
pub mod core_types;

// Market/key resolution
pub mod markets;
pub mod stock_key;

// Ledger components
pub mod error;
pub mod events;
pub mod portfolio;
pub mod position;
pub mod profit;
pub mod trade_log;

// Replay binary plumbing
pub mod config;
pub mod csv_io;
pub mod logging;

// Convenient re-exports at crate root
pub use core_types::{HoldingIndex, MarketIndex, Price, Profit, Quantity, TradeIndex};
pub use error::PortfolioError;
pub use events::{PortfolioEvent, TradeReceipt};
pub use markets::{MarketRegistry, DEFAULT_MARKETS};
pub use portfolio::Portfolio;
pub use position::Position;
pub use profit::ProfitLedger;
pub use stock_key::StockKey;
pub use trade_log::{HoldingsLog, TradeLog, TradeRecord};
