//! Signal types and the detector capability shared by all strategy variants.
//!
//! A detector scans a [`Series`] once, left to right, and returns signals in
//! bar order. Close-versus-band comparisons always use the indicator value
//! computed from the window that ends on the previous bar.

pub mod breakout;
pub mod crossover;
pub mod mean_reversion;

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::ohlcv::Series;
use crate::domain::strategy::StrategyVariant;

pub use breakout::BreakoutDetector;
pub use crossover::CrossoverDetector;
pub use mean_reversion::MeanReversionDetector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SignalId(pub u64);

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Buy,
    Sell,
}

impl SignalType {
    pub fn opposite(self) -> Self {
        match self {
            SignalType::Buy => SignalType::Sell,
            SignalType::Sell => SignalType::Buy,
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalType::Buy => f.write_str("BUY"),
            SignalType::Sell => f.write_str("SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalStrength {
    Weak,
    Moderate,
    Strong,
}

/// Indicator readings and boolean conditions that produced a signal.
///
/// Ordered maps keep serialized output stable across runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SignalMetadata {
    pub indicators: BTreeMap<String, f64>,
    pub conditions: BTreeMap<String, bool>,
}

impl SignalMetadata {
    pub fn indicator(mut self, key: &str, value: f64) -> Self {
        self.indicators.insert(key.to_string(), value);
        self
    }

    pub fn condition(mut self, key: &str, value: bool) -> Self {
        self.conditions.insert(key.to_string(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub id: SignalId,
    pub bar_index: usize,
    pub date: NaiveDate,
    pub signal_type: SignalType,
    pub strength: SignalStrength,
    pub price: f64,
    /// Always within [0, 1].
    pub confidence: f64,
    pub metadata: SignalMetadata,
}

/// How an open position may be closed besides an opposing signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ExitRule {
    OpposingSignal,
    /// Close once price gives back this fraction of the best price since entry.
    TrailingStop(f64),
}

/// The capability every strategy variant provides to the engine.
pub trait SignalDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Minimum number of bars before any signal can be produced.
    fn required_lookback(&self) -> usize;

    fn exit_rule(&self) -> ExitRule;

    fn detect(&self, series: &Series) -> Vec<Signal>;
}

/// Build the detector for a (validated) strategy variant.
pub fn detector_for(variant: &StrategyVariant) -> Box<dyn SignalDetector> {
    match variant {
        StrategyVariant::Crossover(params) => Box::new(CrossoverDetector::new(params.clone())),
        StrategyVariant::MeanReversion(params) => {
            Box::new(MeanReversionDetector::new(params.clone()))
        }
        StrategyVariant::Breakout(params) => Box::new(BreakoutDetector::new(params.clone())),
    }
}

/// Append a signal, numbering it after the ones already emitted.
pub(crate) fn push_signal(
    signals: &mut Vec<Signal>,
    series: &Series,
    bar_index: usize,
    signal_type: SignalType,
    strength: SignalStrength,
    confidence: f64,
    metadata: SignalMetadata,
) {
    let bar = &series.bars()[bar_index];
    signals.push(Signal {
        id: SignalId(signals.len() as u64 + 1),
        bar_index,
        date: bar.date,
        signal_type,
        strength,
        price: bar.close,
        confidence: confidence.clamp(0.0, 1.0),
        metadata,
    });
}
