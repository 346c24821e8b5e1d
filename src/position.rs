/// ENFORCED POSITION TYPE - Used by the operation engine
///
/// This is the SINGLE source of truth for position arithmetic.
/// ALL position transitions MUST go through these methods.
///
/// # Enforcement Strategy:
/// 1. Fields are PRIVATE - no direct access
/// 2. Transitions return Result - errors are explicit
/// 3. Transitions return STAGED values - nothing mutates in place, the
///    engine commits a staged Position only after every precondition of
///    the whole operation has passed
/// 4. u128/i128 intermediates + checked narrowing - overflow protection
/// 5. Type system prevents bypassing validation
use serde::{Deserialize, Serialize};

use crate::core_types::{Price, Profit, Quantity};

/// Position for a single instrument
///
/// # Invariants (ENFORCED by private fields):
/// - avg_cost == 0 whenever quantity == 0
/// - Weighted-average cost uses exact integer arithmetic, rounded down;
///   no floating point anywhere (drift across repeated buys is forbidden)
/// - No overflow/underflow (checked arithmetic, wide intermediates)
///
/// # Lifecycle:
/// Created implicitly as the zero position on first reference; never
/// deleted - a position sold down to zero stays addressable with
/// avg_cost reset to 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    quantity: Quantity, // PRIVATE - ONLY changed through after_* transitions
    avg_cost: Price,    // PRIVATE - blended average cost per share
}

impl Position {
    // ============================================================
    // READ-ONLY GETTERS (safe to expose)
    // ============================================================

    /// Held quantity (read-only)
    #[inline(always)]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Blended average cost per share, minor units (read-only)
    #[inline(always)]
    pub const fn avg_cost(&self) -> Price {
        self.avg_cost
    }

    /// True when nothing is held
    #[inline(always)]
    pub const fn is_flat(&self) -> bool {
        self.quantity == 0
    }

    // ============================================================
    // STAGED TRANSITIONS (validated, return new values)
    // ============================================================

    /// Position after buying `qty` shares at `price`.
    ///
    /// new_avg = floor((quantity * avg_cost + qty * price) / new_quantity)
    ///
    /// # Errors
    /// - "Buy quantity must be positive" if qty == 0
    /// - overflow errors on quantity or cost accumulation
    pub fn after_buy(&self, qty: Quantity, price: Price) -> Result<Position, &'static str> {
        if qty == 0 {
            return Err("Buy quantity must be positive");
        }
        let new_quantity = self
            .quantity
            .checked_add(qty)
            .ok_or("Buy quantity overflow")?;

        // u64 * u64 fits u128, but the SUM of two such products can exceed
        // it - keep the addition checked as well.
        let held_cost = (self.quantity as u128) * (self.avg_cost as u128);
        let added_cost = (qty as u128) * (price as u128);
        let total_cost = held_cost
            .checked_add(added_cost)
            .ok_or("Buy cost overflow")?;

        // Floor division; the result is bounded by max(avg_cost, price)
        // so the narrowing cannot actually fail, but stay checked.
        let new_avg = u64::try_from(total_cost / new_quantity as u128)
            .map_err(|_| "Average cost overflow")?;

        Ok(Position {
            quantity: new_quantity,
            avg_cost: new_avg,
        })
    }

    /// Position and realized profit after selling `qty` shares at `price`.
    ///
    /// Profit is (price - avg_cost) * qty, signed. Selling the full
    /// quantity resets avg_cost to 0; a partial sell keeps the blended
    /// cost basis on the remaining shares unchanged.
    ///
    /// # Errors
    /// - "Sell quantity must be positive" if qty == 0
    /// - "Insufficient holdings" if qty > quantity
    /// - "Profit overflow" if the realized amount exceeds the i64 ledger
    pub fn after_sell(
        &self,
        qty: Quantity,
        price: Price,
    ) -> Result<(Position, Profit), &'static str> {
        if qty == 0 {
            return Err("Sell quantity must be positive");
        }
        if qty > self.quantity {
            return Err("Insufficient holdings");
        }

        let profit_wide = (price as i128 - self.avg_cost as i128) * qty as i128;
        let profit = Profit::try_from(profit_wide).map_err(|_| "Profit overflow")?;

        let remaining = self.quantity - qty;
        let avg_cost = if remaining == 0 { 0 } else { self.avg_cost };

        Ok((
            Position {
                quantity: remaining,
                avg_cost,
            },
            profit,
        ))
    }

    /// Position after a forward split by `multiple`.
    ///
    /// Quantity multiplies, cost basis per share divides (rounded down).
    /// No profit impact. The caller validates multiple > 1.
    pub fn after_split(&self, multiple: u64) -> Result<Position, &'static str> {
        let new_quantity = self
            .quantity
            .checked_mul(multiple)
            .ok_or("Split quantity overflow")?;

        Ok(Position {
            quantity: new_quantity,
            avg_cost: self.avg_cost / multiple,
        })
    }

    /// Position and liquidation profit after a reverse split by `divisor`.
    ///
    /// Shares that do not convert evenly (quantity mod divisor) are
    /// force-sold at `liquidation_price` against the current cost basis;
    /// the surviving shares carry avg_cost * divisor. The caller validates
    /// divisor > 1.
    ///
    /// # Errors
    /// - "Reverse split cost overflow" if the scaled cost basis exceeds u64
    /// - "Profit overflow" if the liquidation amount exceeds the i64 ledger
    pub fn after_reverse_split(
        &self,
        divisor: u64,
        liquidation_price: Price,
    ) -> Result<(Position, Profit), &'static str> {
        let remainder = self.quantity % divisor;
        let new_quantity = (self.quantity - remainder) / divisor;

        let profit_wide =
            (liquidation_price as i128 - self.avg_cost as i128) * remainder as i128;
        let profit = Profit::try_from(profit_wide).map_err(|_| "Profit overflow")?;

        // A position liquidated to nothing must not keep a cost basis
        let avg_cost = if new_quantity == 0 {
            0
        } else {
            self.avg_cost
                .checked_mul(divisor)
                .ok_or("Reverse split cost overflow")?
        };

        Ok((
            Position {
                quantity: new_quantity,
                avg_cost,
            },
            profit,
        ))
    }
}

// ============================================================
// TESTS - Prove enforcement works
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(quantity: Quantity, avg_cost: Price) -> Position {
        // Build through the enforced path: one buy at the target average
        if quantity == 0 {
            return Position::default();
        }
        Position::default().after_buy(quantity, avg_cost).unwrap()
    }

    #[test]
    fn test_first_buy_sets_price() {
        let p = Position::default().after_buy(800, 818).unwrap();
        assert_eq!(p.quantity(), 800);
        assert_eq!(p.avg_cost(), 818);
    }

    #[test]
    fn test_weighted_average_rounds_down() {
        // 100 @ 100 + 100 @ 101 → floor(20100 / 200) = 100
        let p = pos(100, 100).after_buy(100, 101).unwrap();
        assert_eq!(p.quantity(), 200);
        assert_eq!(p.avg_cost(), 100);
    }

    #[test]
    fn test_weighted_average_incremental() {
        // Sequential buys must match incremental floor application,
        // not a single batch recomputation
        let p = Position::default()
            .after_buy(3, 10)
            .unwrap()
            .after_buy(3, 21)
            .unwrap();
        // floor((3*10 + 3*21) / 6) = floor(93/6) = 15
        assert_eq!(p.avg_cost(), 15);

        let p = p.after_buy(2, 99).unwrap();
        // floor((6*15 + 2*99) / 8) = floor(288/8) = 36
        assert_eq!(p.avg_cost(), 36);
    }

    #[test]
    fn test_buy_zero_qty_rejected() {
        assert!(Position::default().after_buy(0, 100).is_err());
    }

    #[test]
    fn test_buy_quantity_overflow() {
        let p = pos(u64::MAX, 0);
        assert!(p.after_buy(1, 1).is_err());
    }

    #[test]
    fn test_sell_all_resets_cost() {
        let (p, profit) = pos(800, 818).after_sell(800, 1200).unwrap();
        assert_eq!(p.quantity(), 0);
        assert_eq!(p.avg_cost(), 0);
        assert_eq!(profit, (1200 - 818) * 800);
    }

    #[test]
    fn test_partial_sell_keeps_basis() {
        let (p, profit) = pos(100, 500).after_sell(40, 600).unwrap();
        assert_eq!(p.quantity(), 60);
        assert_eq!(p.avg_cost(), 500); // blended basis preserved
        assert_eq!(profit, 100 * 40);
    }

    #[test]
    fn test_sell_below_cost_is_loss() {
        let (_, profit) = pos(10, 500).after_sell(10, 450).unwrap();
        assert_eq!(profit, -500);
    }

    #[test]
    fn test_sell_more_than_held() {
        let p = pos(10, 100);
        assert!(p.after_sell(11, 100).is_err());
        assert_eq!(p.quantity(), 10); // Unchanged
    }

    #[test]
    fn test_split() {
        let p = pos(100, 500).after_split(3).unwrap();
        assert_eq!(p.quantity(), 300);
        assert_eq!(p.avg_cost(), 166); // floor(500/3)
    }

    #[test]
    fn test_reverse_split_no_remainder() {
        let (p, profit) = pos(300, 166).after_reverse_split(4, 600).unwrap();
        assert_eq!(p.quantity(), 75);
        assert_eq!(p.avg_cost(), 664); // floor(166*4)
        assert_eq!(profit, 0); // 300 mod 4 == 0, nothing liquidated
    }

    #[test]
    fn test_reverse_split_liquidates_remainder() {
        // 10 mod 3 = 1 share force-sold at 700 against basis 500
        let (p, profit) = pos(10, 500).after_reverse_split(3, 700).unwrap();
        assert_eq!(p.quantity(), 3);
        assert_eq!(p.avg_cost(), 1500);
        assert_eq!(profit, 200);
    }

    #[test]
    fn test_reverse_split_wipes_position() {
        // Fewer shares than the divisor: everything is remainder
        let (p, profit) = pos(2, 500).after_reverse_split(5, 400).unwrap();
        assert_eq!(p.quantity(), 0);
        assert_eq!(p.avg_cost(), 0); // flat position carries no basis
        assert_eq!(profit, -200);
    }

    #[test]
    fn test_split_round_trip() {
        // split(m) then reverse_split(m) with zero remainder restores
        // quantity; avg_cost is floor-stable
        let p0 = pos(100, 500);
        let split = p0.after_split(5).unwrap();
        let (back, profit) = split.after_reverse_split(5, p0.avg_cost()).unwrap();
        assert_eq!(back.quantity(), 100);
        assert_eq!(back.avg_cost(), 500);
        assert_eq!(profit, 0);
    }
}
