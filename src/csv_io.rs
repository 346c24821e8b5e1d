//! CSV I/O - Load operation streams and dump portfolio snapshots
//!
//! This module handles all file operations around the core: parsing the
//! replay fixture into operations and writing positions, trades, holdings,
//! profits and the event stream out after a run. The core itself never
//! touches the filesystem; durability is this collaborator's concern.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core_types::{Price, Quantity};
use crate::events::PortfolioEvent;
use crate::portfolio::Portfolio;

// ============================================================
// Constants for file paths
// ============================================================

pub const TRADES_CSV: &str = "fixtures/trades.csv";

pub const ACTION_BUY: &str = "buy";
pub const ACTION_SELL: &str = "sell";
pub const ACTION_SPLIT: &str = "split";
pub const ACTION_REVERSE_SPLIT: &str = "rsplit";

// ============================================================
// Operation Stream Loading
// ============================================================

/// One parsed fixture row. Markets are carried as codes here and resolved
/// to registry indices by the replay driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Buy {
        market: String,
        symbol: String,
        quantity: Quantity,
        price: Price,
    },
    Sell {
        market: String,
        symbol: String,
        quantity: Quantity,
        price: Price,
    },
    Split {
        market: String,
        symbol: String,
        multiple: u64,
    },
    ReverseSplit {
        market: String,
        symbol: String,
        divisor: u64,
        liquidation_price: Price,
    },
}

/// Load operations from a CSV file.
///
/// Format (header skipped): `action,market,symbol,quantity,price`
/// - buy/sell: quantity and price in minor units
/// - split: quantity column carries the multiple, price ignored
/// - rsplit: quantity column carries the divisor, price is the
///   liquidation price for the remainder
pub fn load_operations(path: &str) -> Result<Vec<Operation>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
    let reader = BufReader::new(file);
    let mut operations = Vec::new();

    for (line_num, line) in reader.lines().skip(1).enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 5 {
            bail!("Malformed row at line {}: {:?}", line_num + 2, line);
        }

        let action = parts[0];
        let market = parts[1].to_string();
        let symbol = parts[2].to_string();
        let quantity: u64 = parts[3]
            .parse()
            .with_context(|| format!("Invalid quantity at line {}", line_num + 2))?;
        let price: u64 = parts[4]
            .parse()
            .with_context(|| format!("Invalid price at line {}", line_num + 2))?;

        let op = match action {
            ACTION_BUY => Operation::Buy {
                market,
                symbol,
                quantity,
                price,
            },
            ACTION_SELL => Operation::Sell {
                market,
                symbol,
                quantity,
                price,
            },
            ACTION_SPLIT => Operation::Split {
                market,
                symbol,
                multiple: quantity,
            },
            ACTION_REVERSE_SPLIT => Operation::ReverseSplit {
                market,
                symbol,
                divisor: quantity,
                liquidation_price: price,
            },
            other => bail!("Unknown action {:?} at line {}", other, line_num + 2),
        };
        operations.push(op);
    }

    Ok(operations)
}

// ============================================================
// Snapshot Dumps
// ============================================================

/// Dump all touched positions, sorted by key hex for a stable file.
pub fn dump_positions(portfolio: &Portfolio, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    writeln!(file, "stock_key,quantity,avg_cost")?;

    let mut rows: Vec<_> = portfolio
        .positions()
        .map(|(key, pos)| (key.to_hex(), pos.quantity(), pos.avg_cost()))
        .collect();
    rows.sort();

    for (key, quantity, avg_cost) in rows {
        writeln!(file, "{},{},{}", key, quantity, avg_cost)?;
    }
    Ok(())
}

/// Dump the trade log in index order; the row number IS the trade index.
pub fn dump_trades(portfolio: &Portfolio, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    writeln!(file, "index,market,symbol,side,quantity,price")?;

    for (index, trade) in portfolio.trade_log().iter().enumerate() {
        let side = if trade.is_sell { "sell" } else { "buy" };
        writeln!(
            file,
            "{},{},{},{},{},{}",
            index, trade.market, trade.symbol, side, trade.quantity, trade.price
        )?;
    }
    Ok(())
}

/// Dump the holdings log in index order.
pub fn dump_holdings(portfolio: &Portfolio, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    writeln!(file, "index,stock_key")?;

    for (index, key) in portfolio.holdings_log().iter().enumerate() {
        writeln!(file, "{},{}", index, key)?;
    }
    Ok(())
}

/// Dump per-market realized profit totals, registry order.
pub fn dump_profits(portfolio: &Portfolio, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    writeln!(file, "market_index,market,profit")?;

    for (index, total) in portfolio.profit_ledger().totals().iter().enumerate() {
        let code = &portfolio.registry().codes()[index];
        writeln!(file, "{},{},{}", index, code, total)?;
    }
    Ok(())
}

/// Dump the event stream as JSON lines, one committed notification per row.
pub fn dump_events(events: &[PortfolioEvent], path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for event in events {
        let line = serde_json::to_string(event)?;
        writeln!(file, "{}", line)?;
    }
    Ok(())
}

/// Write a run manifest next to the snapshots: when the dump was taken and
/// what it contains, so output directories are self-describing.
pub fn write_manifest(
    portfolio: &Portfolio,
    applied: usize,
    rejected: usize,
    path: &Path,
) -> Result<()> {
    let manifest = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "markets": portfolio.registry().codes(),
        "applied": applied,
        "rejected": rejected,
        "trades": portfolio.trades_len(),
        "holdings": portfolio.holdings_len(),
    });
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    writeln!(file, "{}", serde_json::to_string_pretty(&manifest)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_operations() {
        let path = write_fixture(
            "stock_portfolio_ops_test.csv",
            "action,market,symbol,quantity,price\n\
             buy,tsx,acb,800,818\n\
             sell,tsx,acb,400,1200\n\
             split,nasdaq,tsla,3,0\n\
             rsplit,nasdaq,tsla,4,60000\n",
        );

        let ops = load_operations(path.to_str().unwrap()).unwrap();
        assert_eq!(ops.len(), 4);
        assert_eq!(
            ops[0],
            Operation::Buy {
                market: "tsx".into(),
                symbol: "acb".into(),
                quantity: 800,
                price: 818
            }
        );
        assert_eq!(
            ops[3],
            Operation::ReverseSplit {
                market: "nasdaq".into(),
                symbol: "tsla".into(),
                divisor: 4,
                liquidation_price: 60000
            }
        );
    }

    #[test]
    fn test_load_rejects_unknown_action() {
        let path = write_fixture(
            "stock_portfolio_bad_action.csv",
            "action,market,symbol,quantity,price\nshort,tsx,acb,1,1\n",
        );
        assert!(load_operations(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_dump_positions_and_profits() {
        let mut portfolio = Portfolio::default();
        portfolio.buy(0, "acb", 800, 818).unwrap();
        portfolio.sell(0, "acb", 800, 1200).unwrap();

        let pos_path = std::env::temp_dir().join("stock_portfolio_positions_test.csv");
        dump_positions(&portfolio, &pos_path).unwrap();
        let content = std::fs::read_to_string(&pos_path).unwrap();
        // Sold to flat, still addressable: one zeroed row
        assert!(content.lines().count() == 2);
        assert!(content.ends_with(",0,0\n"));

        let profit_path = std::env::temp_dir().join("stock_portfolio_profits_test.csv");
        dump_profits(&portfolio, &profit_path).unwrap();
        let content = std::fs::read_to_string(&profit_path).unwrap();
        assert!(content.contains("0,tsx,305600"));
    }
}
