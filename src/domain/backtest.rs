//! Strategy engine: one pipeline run per (config, series) pair.
//!
//! Validation happens once in [`StrategyEngine::new`]. Every [`StrategyEngine::run`]
//! builds its signals, trades and positions from scratch, so an engine can be
//! shared across threads and re-run freely.

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

use crate::domain::config_validation::{validate_execution_config, validate_strategy_config};
use crate::domain::error::SignalbenchError;
use crate::domain::execution::{ExecutionConfig, execute};
use crate::domain::metrics::PerformanceSummary;
use crate::domain::ohlcv::Series;
use crate::domain::position::Position;
use crate::domain::signal::{Signal, SignalDetector, detector_for};
use crate::domain::strategy::StrategyConfig;
use crate::domain::trade::Trade;

pub struct StrategyEngine {
    config: StrategyConfig,
    execution: ExecutionConfig,
    detector: Box<dyn SignalDetector>,
}

impl std::fmt::Debug for StrategyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyEngine")
            .field("config", &self.config)
            .field("execution", &self.execution)
            .field("detector", &self.detector.name())
            .finish()
    }
}

impl StrategyEngine {
    pub fn new(config: StrategyConfig, execution: ExecutionConfig) -> Result<Self, SignalbenchError> {
        validate_strategy_config(&config)?;
        validate_execution_config(&execution)?;
        let detector = detector_for(&config.variant);
        Ok(StrategyEngine {
            config,
            execution,
            detector,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn execution_config(&self) -> &ExecutionConfig {
        &self.execution
    }

    pub fn required_lookback(&self) -> usize {
        self.detector.required_lookback()
    }

    pub fn run(&self, series: &Series) -> Result<ExecutionResult, SignalbenchError> {
        let started = Instant::now();
        let lookback = self.required_lookback();
        info!(
            symbol = series.symbol(),
            strategy = %self.config.name,
            variant = self.detector.name(),
            bars = series.len(),
            lookback,
            "run started"
        );

        let mut result = ExecutionResult {
            strategy: self.config.name.clone(),
            variant: self.detector.name(),
            symbol: series.symbol().to_string(),
            bars: series.len(),
            signals: Vec::new(),
            trades: Vec::new(),
            positions: Vec::new(),
            performance: PerformanceSummary::default(),
            execution_time: Duration::ZERO,
        };

        if series.len() < lookback {
            info!(
                symbol = series.symbol(),
                bars = series.len(),
                lookback,
                "series shorter than lookback, nothing to do"
            );
            result.execution_time = started.elapsed();
            return Ok(result);
        }

        let signals = self.detector.detect(series);
        let log = execute(series, &signals, self.detector.exit_rule(), &self.execution)?;
        result.performance = PerformanceSummary::compute(&log.trades, &log.positions);
        result.signals = signals;
        result.trades = log.trades;
        result.positions = log.positions;
        result.execution_time = started.elapsed();

        info!(
            symbol = series.symbol(),
            signals = result.signals.len(),
            trades = result.trades.len(),
            net_pnl = result.performance.net_pnl,
            elapsed_us = result.execution_time.as_micros() as u64,
            "run finished"
        );
        Ok(result)
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub strategy: String,
    pub variant: &'static str,
    pub symbol: String,
    pub bars: usize,
    pub signals: Vec<Signal>,
    pub trades: Vec<Trade>,
    pub positions: Vec<Position>,
    pub performance: PerformanceSummary,
    /// Wall-clock time of the run. Not part of equality.
    pub execution_time: Duration,
}

impl ExecutionResult {
    pub fn open_position(&self) -> Option<&Position> {
        self.positions.iter().find(|p| p.is_open())
    }
}

impl PartialEq for ExecutionResult {
    fn eq(&self, other: &Self) -> bool {
        self.strategy == other.strategy
            && self.variant == other.variant
            && self.symbol == other.symbol
            && self.bars == other.bars
            && self.signals == other.signals
            && self.trades == other.trades
            && self.positions == other.positions
            && self.performance == other.performance
    }
}
