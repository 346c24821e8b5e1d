//! Core types used throughout the system
//!
//! These are fundamental type aliases used by all modules.
//! They provide semantic meaning and enable future type evolution.

/// Market index - position of a market in the registry.
///
/// # Constraints:
/// - **Immutable**: Assigned once at registry construction, NEVER changes
/// - **Small Values**: Enables O(1) direct array indexing
/// - **Sequential**: Assigned contiguously (0, 1, 2, ...)
///
/// Used as array index for O(1) profit ledger lookup:
/// ```ignore
/// profits[market as usize]  // Direct access, no hash needed
/// ```
pub type MarketIndex = u32;

/// Share quantity - whole units, never fractional
pub type Quantity = u64;

/// Price in minor currency units (hundredths), exact integer arithmetic only
pub type Price = u64;

/// Realized profit/loss in minor currency units - signed, may go negative
pub type Profit = i64;

/// Index into the append-only trade log - permanent identity of a trade
pub type TradeIndex = u64;

/// Index into the append-only holdings log
pub type HoldingIndex = u64;
