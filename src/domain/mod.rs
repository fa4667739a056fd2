//! Core domain types and the backtesting pipeline.

pub mod ohlcv;
pub mod indicator;
pub mod strategy;
pub mod config_validation;
pub mod signal;
pub mod position;
pub mod trade;
pub mod execution;
pub mod metrics;
pub mod backtest;
pub mod error;
