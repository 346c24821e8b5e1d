//! Portfolio - the single-writer operation engine
//!
//! Owns ALL portfolio state and is the only component allowed to mutate it.
//!
//! # Responsibilities
//!
//! 1. **Position State Management** - keyed positions with blended cost basis
//! 2. **Audit History** - append-only trade and holdings logs
//! 3. **Realized P&L** - per-market profit accumulation
//!
//! # Thread Safety
//!
//! Portfolio is designed for SINGLE-THREADED execution. One operation fully
//! commits (or fully rejects) before the next begins, which provides:
//! - Natural atomicity (no locks needed)
//! - Totally ordered history (serializable isolation)
//! - Predictable latency
//!
//! A multi-threaded host must wrap the engine in a single global write lock
//! or an actor/queue to preserve this guarantee. Read accessors never
//! mutate and may interleave freely.
//!
//! # Operation Flow
//!
//! ```text
//! op → pre_check (validation only) → stage new values → commit all stores
//!             ↓
//!       Err(PortfolioError) → ZERO observable state change
//! ```

use rustc_hash::FxHashMap;

use crate::core_types::{HoldingIndex, MarketIndex, Price, Profit, Quantity, TradeIndex};
use crate::error::PortfolioError;
use crate::events::{PortfolioEvent, TradeReceipt};
use crate::markets::MarketRegistry;
use crate::position::Position;
use crate::profit::ProfitLedger;
use crate::stock_key::StockKey;
use crate::trade_log::{HoldingsLog, TradeLog, TradeRecord};

/// The portfolio ledger: market registry + four mutable stores
pub struct Portfolio {
    /// Fixed market set, read-only after construction
    registry: MarketRegistry,
    /// Keyed position state - the primary mutable store
    positions: FxHashMap<StockKey, Position>,
    /// Append-only trade history
    trades: TradeLog,
    /// Append-only record of keys touched by buys
    holdings: HoldingsLog,
    /// Per-market realized P&L
    profits: ProfitLedger,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new(MarketRegistry::default())
    }
}

impl Portfolio {
    /// Create an empty portfolio over a fixed market registry.
    pub fn new(registry: MarketRegistry) -> Self {
        let profits = ProfitLedger::new(registry.len());
        Self {
            registry,
            positions: FxHashMap::default(),
            trades: TradeLog::default(),
            holdings: HoldingsLog::default(),
            profits,
        }
    }

    // ============================================================
    // QUERY OPERATIONS (Read-Only)
    // ============================================================

    /// Position for a stock key; the zero position if never touched.
    #[inline]
    pub fn position(&self, key: &StockKey) -> Position {
        self.positions.get(key).copied().unwrap_or_default()
    }

    /// Realized P&L total for a market
    ///
    /// # Errors
    /// `InvalidMarket` for an unregistered index.
    pub fn profits(&self, market: MarketIndex) -> Result<Profit, PortfolioError> {
        if !self.registry.contains(market) {
            return Err(PortfolioError::InvalidMarket(market));
        }
        Ok(self.profits.get(market))
    }

    /// Trade record at a log index
    pub fn trade(&self, index: TradeIndex) -> Result<&TradeRecord, PortfolioError> {
        self.trades.get(index)
    }

    /// Stock key at a holdings-log index
    pub fn holding(&self, index: HoldingIndex) -> Result<&StockKey, PortfolioError> {
        self.holdings.get(index)
    }

    /// Market code at a registry index
    pub fn market(&self, index: MarketIndex) -> Result<&str, PortfolioError> {
        self.registry.code_at(index)
    }

    /// Number of registered markets
    #[inline]
    pub fn markets_len(&self) -> usize {
        self.registry.len()
    }

    /// Number of trade log entries
    #[inline]
    pub fn trades_len(&self) -> u64 {
        self.trades.len()
    }

    /// Number of holdings log entries
    #[inline]
    pub fn holdings_len(&self) -> u64 {
        self.holdings.len()
    }

    /// Derive the stock key for (market, symbol)
    ///
    /// # Errors
    /// `InvalidMarket` for an unregistered index.
    pub fn stock_key(
        &self,
        market: MarketIndex,
        symbol: &str,
    ) -> Result<StockKey, PortfolioError> {
        let code = self.registry.code_at(market)?;
        Ok(StockKey::derive(code, symbol))
    }

    /// Read-only registry view
    pub fn registry(&self) -> &MarketRegistry {
        &self.registry
    }

    /// Read-only trade log view (snapshot dumps)
    pub fn trade_log(&self) -> &TradeLog {
        &self.trades
    }

    /// Read-only holdings log view (snapshot dumps)
    pub fn holdings_log(&self) -> &HoldingsLog {
        &self.holdings
    }

    /// Read-only profit ledger view (snapshot dumps)
    pub fn profit_ledger(&self) -> &ProfitLedger {
        &self.profits
    }

    /// Read-only iteration over all touched positions (snapshot dumps)
    pub fn positions(&self) -> impl Iterator<Item = (&StockKey, &Position)> {
        self.positions.iter()
    }

    // ============================================================
    // OPERATIONS (validate → stage → commit)
    // ============================================================

    /// Buy `quantity` shares of `symbol` on `market` at `price` minor units.
    ///
    /// Updates the position's blended average cost (floor arithmetic) and
    /// appends one trade record and one holdings record.
    ///
    /// # Errors
    /// `InvalidMarket`, `InvalidParameter` (zero quantity), `Overflow`.
    /// A returned error leaves every store unchanged.
    pub fn buy(
        &mut self,
        market: MarketIndex,
        symbol: &str,
        quantity: Quantity,
        price: Price,
    ) -> Result<TradeReceipt, PortfolioError> {
        // 1. Pre-check + stage (validation only, NO state mutation)
        let (key, staged) = self.stage_buy(market, symbol, quantity, price, None)?;

        // 2. Commit all stores in one pass
        let receipt = self.commit_buy(market, symbol, quantity, price, key, staged);

        tracing::debug!(
            market,
            symbol,
            quantity,
            price,
            trade_index = receipt.trade_index,
            "buy committed"
        );
        Ok(receipt)
    }

    /// Sell `quantity` shares, realizing (price - avg_cost) * quantity into
    /// the market's profit ledger. Selling the full position resets its
    /// average cost to zero; a partial sell keeps the blended basis.
    ///
    /// # Errors
    /// `InvalidMarket`, `InvalidParameter` (zero quantity),
    /// `InsufficientHoldings`, `Overflow`. A returned error leaves every
    /// store unchanged.
    pub fn sell(
        &mut self,
        market: MarketIndex,
        symbol: &str,
        quantity: Quantity,
        price: Price,
    ) -> Result<TradeReceipt, PortfolioError> {
        // 1. Pre-check (validation only)
        let code = self.registry.code_at(market)?;
        if quantity == 0 {
            return Err(PortfolioError::InvalidParameter(
                "sell quantity must be positive",
            ));
        }
        let key = StockKey::derive(code, symbol);
        let held = self.position(&key);
        if quantity > held.quantity() {
            return Err(PortfolioError::InsufficientHoldings {
                held: held.quantity(),
                requested: quantity,
            });
        }

        // 2. Stage new values in locals
        let (staged, realized) = held
            .after_sell(quantity, price)
            .map_err(PortfolioError::Overflow)?;

        // 3. Commit. The profit accumulator validates its own overflow
        //    before mutating, so it must be the first store touched.
        self.profits
            .accumulate(market, realized)
            .map_err(PortfolioError::Overflow)?;
        self.positions.insert(key, staged);
        let trade_index = self.trades.append(TradeRecord {
            market,
            symbol: symbol.to_string(),
            is_sell: true,
            quantity,
            price,
        });
        // No holdings entry for sells

        tracing::debug!(
            market,
            symbol,
            quantity,
            price,
            realized,
            trade_index,
            "sell committed"
        );
        Ok(TradeReceipt {
            trade_index,
            event: PortfolioEvent::Trade {
                market,
                symbol: symbol.to_string(),
                is_sell: true,
                quantity,
                price,
            },
        })
    }

    /// Apply several buys as ONE atomic unit.
    ///
    /// All four slices must have equal length. Every element is validated
    /// and staged before anything commits; if any element fails, the whole
    /// batch is rejected with zero state change. Trade and holdings entries
    /// land in input order, immediately adjacent.
    ///
    /// # Errors
    /// `ArgumentLengthMismatch`, plus any per-element `buy` error.
    pub fn bulk_buy(
        &mut self,
        markets: &[MarketIndex],
        symbols: &[&str],
        quantities: &[Quantity],
        prices: &[Price],
    ) -> Result<Vec<TradeReceipt>, PortfolioError> {
        let n = markets.len();
        if symbols.len() != n || quantities.len() != n || prices.len() != n {
            return Err(PortfolioError::ArgumentLengthMismatch {
                markets: n,
                symbols: symbols.len(),
                quantities: quantities.len(),
                prices: prices.len(),
            });
        }

        // 1. Stage every element. A key repeated within the batch compounds
        //    on its own staged value, exactly as sequential buys would.
        let mut staged_positions: FxHashMap<StockKey, Position> = FxHashMap::default();
        let mut staged_keys = Vec::with_capacity(n);
        for i in 0..n {
            let (key, staged) = self.stage_buy(
                markets[i],
                symbols[i],
                quantities[i],
                prices[i],
                Some(&staged_positions),
            )?;
            staged_positions.insert(key, staged);
            staged_keys.push(key);
        }

        // 2. Commit every element in input order
        let mut receipts = Vec::with_capacity(n);
        for i in 0..n {
            let key = staged_keys[i];
            let staged = staged_positions[&key];
            receipts.push(self.commit_buy(
                markets[i],
                symbols[i],
                quantities[i],
                prices[i],
                key,
                staged,
            ));
        }

        tracing::debug!(count = n, "bulk buy committed");
        Ok(receipts)
    }

    /// Forward split: quantity × multiple, average cost ÷ multiple (floor).
    /// No profit impact.
    ///
    /// # Errors
    /// `InvalidMarket`, `InvalidParameter` unless multiple > 1, `Overflow`.
    pub fn split(
        &mut self,
        market: MarketIndex,
        symbol: &str,
        multiple: u64,
    ) -> Result<PortfolioEvent, PortfolioError> {
        let code = self.registry.code_at(market)?;
        if multiple <= 1 {
            return Err(PortfolioError::InvalidParameter(
                "split multiple must be greater than 1",
            ));
        }
        let key = StockKey::derive(code, symbol);

        let staged = self
            .position(&key)
            .after_split(multiple)
            .map_err(PortfolioError::Overflow)?;

        self.positions.insert(key, staged);

        tracing::info!(market, symbol, multiple, "split committed");
        Ok(PortfolioEvent::Split {
            market,
            symbol: symbol.to_string(),
            multiple,
        })
    }

    /// Reverse split: quantity ÷ divisor; shares that do not convert evenly
    /// are force-sold at `liquidation_price` into the market's profit
    /// ledger; the surviving cost basis scales up by the divisor.
    ///
    /// # Errors
    /// `InvalidMarket`, `InvalidParameter` unless divisor > 1, `Overflow`.
    pub fn reverse_split(
        &mut self,
        market: MarketIndex,
        symbol: &str,
        divisor: u64,
        liquidation_price: Price,
    ) -> Result<PortfolioEvent, PortfolioError> {
        let code = self.registry.code_at(market)?;
        if divisor <= 1 {
            return Err(PortfolioError::InvalidParameter(
                "reverse split divisor must be greater than 1",
            ));
        }
        let key = StockKey::derive(code, symbol);

        let (staged, liquidated) = self
            .position(&key)
            .after_reverse_split(divisor, liquidation_price)
            .map_err(PortfolioError::Overflow)?;

        // Profit accumulator validates before mutating; first store touched
        self.profits
            .accumulate(market, liquidated)
            .map_err(PortfolioError::Overflow)?;
        self.positions.insert(key, staged);

        tracing::info!(
            market,
            symbol,
            divisor,
            liquidation_price,
            liquidated,
            "reverse split committed"
        );
        Ok(PortfolioEvent::ReverseSplit {
            market,
            symbol: symbol.to_string(),
            divisor,
        })
    }

    // ============================================================
    // INTERNAL: staged-apply helpers
    // ============================================================

    /// Validate one buy and compute its staged position. NO state mutation.
    ///
    /// `staged` carries positions already staged by earlier elements of a
    /// bulk buy, so repeats of a key inside one batch compound correctly.
    fn stage_buy(
        &self,
        market: MarketIndex,
        symbol: &str,
        quantity: Quantity,
        price: Price,
        staged: Option<&FxHashMap<StockKey, Position>>,
    ) -> Result<(StockKey, Position), PortfolioError> {
        let code = self.registry.code_at(market)?;
        if quantity == 0 {
            return Err(PortfolioError::InvalidParameter(
                "buy quantity must be positive",
            ));
        }
        let key = StockKey::derive(code, symbol);

        let current = staged
            .and_then(|s| s.get(&key).copied())
            .unwrap_or_else(|| self.position(&key));
        let next = current
            .after_buy(quantity, price)
            .map_err(PortfolioError::Overflow)?;
        Ok((key, next))
    }

    /// Commit one staged buy to all stores. Infallible by construction:
    /// everything below is an append or an insert of a validated value.
    fn commit_buy(
        &mut self,
        market: MarketIndex,
        symbol: &str,
        quantity: Quantity,
        price: Price,
        key: StockKey,
        staged: Position,
    ) -> TradeReceipt {
        self.positions.insert(key, staged);
        let trade_index = self.trades.append(TradeRecord {
            market,
            symbol: symbol.to_string(),
            is_sell: false,
            quantity,
            price,
        });
        self.holdings.append(key);

        TradeReceipt {
            trade_index,
            event: PortfolioEvent::Trade {
                market,
                symbol: symbol.to_string(),
                is_sell: false,
                quantity,
                price,
            },
        }
    }
}
