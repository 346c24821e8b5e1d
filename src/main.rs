//! Stock Portfolio - replay driver
//!
//! Architecture:
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌──────────┐
//! │ Fixtures │───▶│ Portfolio │───▶│  Output  │
//! │  (CSV)   │    │ (ledger)  │    │ (CSV/JSON)│
//! └──────────┘    └───────────┘    └──────────┘
//! ```
//!
//! Loads an operation stream, applies it through the single-writer engine
//! (rejected operations are logged and skipped, never partially applied),
//! then dumps position/trade/holdings/profit snapshots and the event
//! stream.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use stock_portfolio::config::AppConfig;
use stock_portfolio::csv_io::{
    dump_events, dump_holdings, dump_positions, dump_profits, dump_trades, load_operations,
    write_manifest, Operation,
};
use stock_portfolio::logging::init_logging;
use stock_portfolio::{Portfolio, PortfolioEvent};

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let env = arg_value(&args, "--env").unwrap_or_else(|| "default".to_string());

    let config = AppConfig::load(&env)?;
    let _guard = init_logging(&config);

    let input = arg_value(&args, "--input").unwrap_or_else(|| config.replay.input.clone());
    let output_dir =
        arg_value(&args, "--output").unwrap_or_else(|| config.replay.output_dir.clone());

    tracing::info!(
        git_hash = env!("GIT_HASH"),
        input,
        output_dir,
        "stock_portfolio replay starting"
    );

    let operations = load_operations(&input)?;
    println!("Loaded {} operations from {}", operations.len(), input);

    let mut portfolio = Portfolio::default();
    let mut events: Vec<PortfolioEvent> = Vec::with_capacity(operations.len());
    let mut applied = 0usize;
    let mut rejected = 0usize;

    let started = Instant::now();
    for (row, op) in operations.into_iter().enumerate() {
        match apply(&mut portfolio, &op) {
            Ok(mut op_events) => {
                applied += 1;
                events.append(&mut op_events);
            }
            Err(err) => {
                rejected += 1;
                tracing::warn!(row, ?op, %err, "operation rejected");
            }
        }
    }
    let elapsed = started.elapsed();

    std::fs::create_dir_all(&output_dir)?;
    let out = Path::new(&output_dir);
    dump_positions(&portfolio, &out.join("positions.csv"))?;
    dump_trades(&portfolio, &out.join("trades.csv"))?;
    dump_holdings(&portfolio, &out.join("holdings.csv"))?;
    dump_profits(&portfolio, &out.join("profits.csv"))?;
    dump_events(&events, &out.join("events.jsonl"))?;
    write_manifest(&portfolio, applied, rejected, &out.join("manifest.json"))?;

    println!(
        "Applied {} operations ({} rejected) in {:?}; {} trades, {} holdings entries",
        applied,
        rejected,
        elapsed,
        portfolio.trades_len(),
        portfolio.holdings_len()
    );
    for (index, code) in portfolio.registry().codes().iter().enumerate() {
        let profit = portfolio.profit_ledger().totals()[index];
        if profit != 0 {
            println!("  {} realized P&L: {}", code, profit);
        }
    }
    println!("Snapshots written to {}", output_dir);

    Ok(())
}

/// Resolve a market code against the registry
fn resolve(portfolio: &Portfolio, code: &str) -> Result<stock_portfolio::MarketIndex> {
    portfolio
        .registry()
        .index_of(code)
        .ok_or_else(|| anyhow::anyhow!("unknown market code {:?}", code))
}

/// Apply one fixture operation, returning the notification values the
/// commit produced.
fn apply(portfolio: &mut Portfolio, op: &Operation) -> Result<Vec<PortfolioEvent>> {
    let events = match op {
        Operation::Buy {
            market,
            symbol,
            quantity,
            price,
        } => {
            let market = resolve(portfolio, market)?;
            vec![portfolio.buy(market, symbol, *quantity, *price)?.event]
        }
        Operation::Sell {
            market,
            symbol,
            quantity,
            price,
        } => {
            let market = resolve(portfolio, market)?;
            vec![portfolio.sell(market, symbol, *quantity, *price)?.event]
        }
        Operation::Split {
            market,
            symbol,
            multiple,
        } => {
            let market = resolve(portfolio, market)?;
            vec![portfolio.split(market, symbol, *multiple)?]
        }
        Operation::ReverseSplit {
            market,
            symbol,
            divisor,
            liquidation_price,
        } => {
            let market = resolve(portfolio, market)?;
            vec![portfolio.reverse_split(market, symbol, *divisor, *liquidation_price)?]
        }
    };
    Ok(events)
}
