//! signalbench — single-symbol strategy execution and backtesting engine.
//!
//! Hexagonal architecture: the engine lives in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
