//! Account command implementation.

use anyhow::{Context, Result};
use trading_config::{AppConfig, Credentials};
use trading_core::traits::Broker;
use trading_executor::Session;

pub async fn run(config: &AppConfig) -> Result<()> {
    let credentials = Credentials::from_env(&config.alpaca)?;
    let broker = super::build_broker(config, &credentials)?;
    let mode = config.alpaca.mode;

    let session = Session::open(&broker)
        .await
        .with_context(|| format!("Could not connect to Alpaca in {} mode", mode))?;
    let positions = broker
        .get_positions()
        .await
        .context("Could not read open positions")?;

    let account = session.account();
    println!("Alpaca Account ({})", mode);
    println!("═══════════════════════════════════════════════════════════");
    println!("  Cash:          ${:.2}", account.cash);
    println!("  Buying power:  ${:.2}", account.buying_power);
    println!("  Equity:        ${:.2}", account.equity);
    println!();

    println!("Open Positions");
    println!("───────────────────────────────────────────────────────────");
    if positions.is_empty() {
        println!("  None");
    }
    for p in &positions {
        println!(
            "  {:<8} {:>10} @ ${:<10.2} value ${:<12.2} P&L ${:.2}",
            p.symbol, p.quantity, p.avg_entry_price, p.market_value, p.unrealized_pnl
        );
    }

    Ok(())
}
