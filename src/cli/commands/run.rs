//! Run command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use trading_broker::{DryRunBroker, TradingMode};
use trading_config::{AppConfig, Credentials};
use trading_core::traits::{Broker, MarketData};
use trading_executor::{Executor, ExecutorConfig, RunReport, Session};
use trading_monitor::render_journal;
use trading_strategies::CrossoverConfig;

use crate::cli::{OutputFormat, RunArgs};

#[derive(Serialize)]
struct RunOutput<'a> {
    mode: TradingMode,
    dry_run: bool,
    #[serde(flatten)]
    report: &'a RunReport,
}

pub async fn run(args: RunArgs, config: &AppConfig) -> Result<()> {
    let credentials = Credentials::from_env(&config.alpaca)?;
    let broker = super::build_broker(config, &credentials)?;
    let data = super::build_data_source(config, &credentials)?;

    let executor = Executor::new(ExecutorConfig {
        risk_level: config.trading.risk_level,
        crossover: CrossoverConfig {
            fast_period: config.trading.fast_period,
            slow_period: config.trading.slow_period,
        },
        stop_loss_pct: config.trading.stop_loss_pct,
    })?;
    let symbols = config.trading.symbol_list();

    info!(
        mode = %config.alpaca.mode,
        data_source = data.name(),
        dry_run = args.dry_run,
        symbols = ?symbols,
        "starting crossover run"
    );

    if args.dry_run {
        let broker = DryRunBroker::new(broker);
        execute(&executor, &broker, data.as_ref(), &symbols, config.alpaca.mode, &args).await
    } else {
        execute(&executor, &broker, data.as_ref(), &symbols, config.alpaca.mode, &args).await
    }
}

async fn execute<B: Broker>(
    executor: &Executor,
    broker: &B,
    data: &dyn MarketData,
    symbols: &[String],
    mode: TradingMode,
    args: &RunArgs,
) -> Result<()> {
    let session = Session::open(broker)
        .await
        .with_context(|| format!("Could not connect to Alpaca in {} mode", mode))?;

    if args.output == OutputFormat::Text {
        println!("Connected in {} mode with ${:.2} cash", mode, session.capital());
        if args.dry_run {
            println!("Dry run: orders will be logged, not sent");
        }
        println!();
    }

    let report = executor
        .run(broker, data, session.capital(), symbols)
        .await
        .context("Run aborted before any order was placed")?;

    match args.output {
        OutputFormat::Json => {
            let output = RunOutput {
                mode,
                dry_run: args.dry_run,
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            print!("{}", render_journal(&report));
        }
    }

    Ok(())
}
