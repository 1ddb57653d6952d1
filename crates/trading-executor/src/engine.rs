//! Execution loop.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use tracing::{info, warn};
use trading_core::error::TradingError;
use trading_core::traits::{Broker, MarketData};
use trading_core::types::OrderRequest;
use trading_risk::{PositionSizer, RiskLevel, StopLossManager};
use trading_strategies::{CrossoverConfig, MACrossover, SignalEvaluator};

use crate::report::{RunReport, SymbolOutcome};
use crate::session::RunError;

/// Execution configuration.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Aggressiveness used for sizing every entry in the run
    pub risk_level: RiskLevel,
    /// Fast/slow moving-average periods
    pub crossover: CrossoverConfig,
    /// Stop-loss distance below entry, in percent
    pub stop_loss_pct: Decimal,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            risk_level: RiskLevel::default(),
            crossover: CrossoverConfig::default(),
            stop_loss_pct: dec!(3),
        }
    }
}

/// Walks a symbol list once, buying on fresh bullish crossovers.
pub struct Executor {
    config: ExecutorConfig,
    evaluator: SignalEvaluator,
    sizer: PositionSizer,
    stop_loss: StopLossManager,
}

impl Executor {
    /// Create an executor, validating the crossover periods and stop distance.
    pub fn new(config: ExecutorConfig) -> Result<Self, TradingError> {
        let crossover = MACrossover::new(config.crossover.clone())?;
        let stop_loss = StopLossManager::new(config.stop_loss_pct)?;

        Ok(Self {
            config,
            evaluator: SignalEvaluator::new(crossover),
            sizer: PositionSizer::default(),
            stop_loss,
        })
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Process `symbols` in order against a static `capital`.
    ///
    /// Open positions are read once up front; failing to read them aborts the
    /// run before any order. Every other failure is confined to its symbol
    /// and recorded as [`SymbolOutcome::Errored`].
    pub async fn run<B, D>(
        &self,
        broker: &B,
        data: &D,
        capital: Decimal,
        symbols: &[String],
    ) -> Result<RunReport, RunError>
    where
        B: Broker + ?Sized,
        D: MarketData + ?Sized,
    {
        let held = broker.held_symbols().await.map_err(RunError::Positions)?;
        info!(
            symbols = symbols.len(),
            held = held.len(),
            %capital,
            risk_level = %self.config.risk_level,
            "starting run"
        );

        let mut report = RunReport::new(capital, self.config.risk_level.value());

        for symbol in symbols {
            let outcome = match self.trade_symbol(broker, data, symbol, capital, &held).await {
                Ok(outcome) => outcome,
                Err(e) => SymbolOutcome::Errored {
                    reason: e.to_string(),
                },
            };

            match &outcome {
                SymbolOutcome::Bought {
                    qty,
                    price,
                    stop_price,
                    order_id,
                } => info!(
                    symbol = %symbol,
                    outcome = outcome.kind(),
                    qty,
                    %price,
                    %stop_price,
                    %order_id,
                    "bracket order submitted"
                ),
                SymbolOutcome::Errored { reason } => {
                    warn!(symbol = %symbol, outcome = outcome.kind(), reason = %reason, "symbol failed")
                }
                _ => info!(symbol = %symbol, outcome = outcome.kind(), "symbol skipped"),
            }

            report.record(symbol.as_str(), outcome);
        }

        info!(
            orders = report.orders_submitted(),
            errors = report.errors(),
            "run finished"
        );
        Ok(report)
    }

    async fn trade_symbol<B, D>(
        &self,
        broker: &B,
        data: &D,
        symbol: &str,
        capital: Decimal,
        held: &HashSet<String>,
    ) -> Result<SymbolOutcome, TradingError>
    where
        B: Broker + ?Sized,
        D: MarketData + ?Sized,
    {
        if held.contains(symbol) {
            return Ok(SymbolOutcome::AlreadyHeld);
        }

        if !self.evaluator.should_buy(data, symbol).await? {
            return Ok(SymbolOutcome::NoSignal);
        }

        let Some(close) = data.latest_close(symbol).await? else {
            return Ok(SymbolOutcome::NoData);
        };
        let price = Decimal::try_from(close).map_err(|_| {
            TradingError::Validation(format!("invalid price {} for {}", close, symbol))
        })?;

        let qty = self.sizer.compute_qty(price, capital, self.config.risk_level);
        if qty == 0 {
            return Ok(SymbolOutcome::InsufficientCapital);
        }

        let stop_price = self.stop_loss.stop_price(price);
        let order = broker
            .submit_order(OrderRequest::bracket_buy(symbol, qty, stop_price))
            .await?;

        Ok(SymbolOutcome::Bought {
            qty,
            price,
            stop_price,
            order_id: order.id,
        })
    }
}
