//! Strategy configuration validation.
//!
//! Runs once, before any data is touched. Each check names the parameter and
//! the constraint it failed.

use crate::domain::error::ConfigValidationError;
use crate::domain::execution::ExecutionConfig;
use crate::domain::strategy::{
    BreakoutParams, CrossoverParams, MeanReversionParams, StrategyConfig, StrategyVariant,
};

pub fn validate_strategy_config(config: &StrategyConfig) -> Result<(), ConfigValidationError> {
    match &config.variant {
        StrategyVariant::Crossover(params) => validate_crossover(params),
        StrategyVariant::MeanReversion(params) => validate_mean_reversion(params),
        StrategyVariant::Breakout(params) => validate_breakout(params),
    }
}

/// Costs are rates or fees and may not be negative.
pub fn validate_execution_config(config: &ExecutionConfig) -> Result<(), ConfigValidationError> {
    validate_cost("execution.commission_per_trade", config.commission_per_trade)?;
    validate_cost("execution.commission_pct", config.commission_pct)?;
    validate_cost("execution.slippage_pct", config.slippage_pct)?;
    Ok(())
}

fn validate_crossover(params: &CrossoverParams) -> Result<(), ConfigValidationError> {
    validate_period("crossover.short_period", params.short_period)?;
    validate_period("crossover.long_period", params.long_period)?;
    if params.short_period >= params.long_period {
        return Err(ConfigValidationError::new(
            "crossover.short_period",
            "must be less than crossover.long_period",
        ));
    }
    // signal_delay is unsigned, so >= 0 holds by construction
    if let Some(pct) = params.trailing_stop {
        validate_fraction("crossover.trailing_stop", pct)?;
    }
    Ok(())
}

fn validate_mean_reversion(params: &MeanReversionParams) -> Result<(), ConfigValidationError> {
    validate_period("mean_reversion.period", params.period)?;
    if params.std_dev_multiplier.is_nan() || params.std_dev_multiplier <= 0.0 {
        return Err(ConfigValidationError::new(
            "mean_reversion.std_dev_multiplier",
            "must be > 0",
        ));
    }
    if params.use_rsi {
        validate_period("mean_reversion.rsi_period", params.rsi_period)?;
        validate_rsi_bound("mean_reversion.oversold", params.oversold)?;
        validate_rsi_bound("mean_reversion.overbought", params.overbought)?;
        if params.oversold >= params.overbought {
            return Err(ConfigValidationError::new(
                "mean_reversion.oversold",
                "must be less than mean_reversion.overbought",
            ));
        }
    }
    Ok(())
}

fn validate_breakout(params: &BreakoutParams) -> Result<(), ConfigValidationError> {
    validate_period("breakout.period", params.period)?;
    validate_fraction("breakout.trailing_stop", params.trailing_stop)?;
    validate_period("breakout.atr_period", params.atr_period)?;
    Ok(())
}

fn validate_period(field: &str, period: usize) -> Result<(), ConfigValidationError> {
    if period == 0 {
        return Err(ConfigValidationError::new(field, "must be > 0"));
    }
    Ok(())
}

fn validate_fraction(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if value.is_nan() || value <= 0.0 || value >= 1.0 {
        return Err(ConfigValidationError::new(
            field,
            "must be between 0 and 1 (exclusive)",
        ));
    }
    Ok(())
}

fn validate_cost(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if value.is_nan() || value < 0.0 {
        return Err(ConfigValidationError::new(field, "must be >= 0"));
    }
    Ok(())
}

fn validate_rsi_bound(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ConfigValidationError::new(field, "must be within [0, 100]"));
    }
    Ok(())
}
