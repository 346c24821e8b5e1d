//! Portfolio Error Types
//!
//! Every failure is a precondition violation detected BEFORE any store
//! mutation. There are no retryable or fatal variants - the caller decides
//! whether to resubmit the whole operation.

use thiserror::Error;

use crate::core_types::{MarketIndex, Quantity};

/// Portfolio error taxonomy
///
/// Returned synchronously by every operation; a returned error guarantees
/// zero observable state change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortfolioError {
    // === Lookup Errors ===
    #[error("Unknown market index: {0}")]
    InvalidMarket(MarketIndex),

    #[error("Log index {index} out of range (len {len})")]
    IndexOutOfRange { index: u64, len: u64 },

    // === Precondition Errors ===
    #[error("Sell of {requested} exceeds held quantity {held}")]
    InsufficientHoldings { held: Quantity, requested: Quantity },

    #[error("Bulk buy argument lengths differ: markets={markets}, symbols={symbols}, quantities={quantities}, prices={prices}")]
    ArgumentLengthMismatch {
        markets: usize,
        symbols: usize,
        quantities: usize,
        prices: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),

    // === Arithmetic Errors ===
    #[error("Arithmetic overflow: {0}")]
    Overflow(&'static str),
}
