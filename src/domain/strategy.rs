//! Strategy configuration: variant parameters, risk block and metadata.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Trailing stop applied to crossover positions when none is configured.
pub const DEFAULT_TRAILING_STOP: f64 = 0.05;

/// Moving average family used by the crossover variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaType {
    #[default]
    Sma,
    Ema,
    Wma,
}

impl MaType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sma" => Some(MaType::Sma),
            "ema" => Some(MaType::Ema),
            "wma" => Some(MaType::Wma),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossoverParams {
    pub short_period: usize,
    pub long_period: usize,
    pub ma_type: MaType,
    /// Extra bars the cross must persist before the signal is emitted.
    pub signal_delay: usize,
    /// Fraction of the best price given back before a position is stopped out.
    pub trailing_stop: Option<f64>,
}

impl CrossoverParams {
    pub fn trailing_stop(&self) -> f64 {
        self.trailing_stop.unwrap_or(DEFAULT_TRAILING_STOP)
    }
}

impl Default for CrossoverParams {
    fn default() -> Self {
        CrossoverParams {
            short_period: 10,
            long_period: 30,
            ma_type: MaType::Sma,
            signal_delay: 0,
            trailing_stop: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanReversionParams {
    pub period: usize,
    pub std_dev_multiplier: f64,
    pub use_rsi: bool,
    pub rsi_period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for MeanReversionParams {
    fn default() -> Self {
        MeanReversionParams {
            period: 20,
            std_dev_multiplier: 2.0,
            use_rsi: false,
            rsi_period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakoutParams {
    pub period: usize,
    pub trailing_stop: f64,
    pub atr_period: usize,
}

impl Default for BreakoutParams {
    fn default() -> Self {
        BreakoutParams {
            period: 20,
            trailing_stop: 0.05,
            atr_period: 14,
        }
    }
}

/// Variant tag together with its parameter set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum StrategyVariant {
    Crossover(CrossoverParams),
    MeanReversion(MeanReversionParams),
    Breakout(BreakoutParams),
}

impl StrategyVariant {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyVariant::Crossover(_) => "crossover",
            StrategyVariant::MeanReversion(_) => "mean_reversion",
            StrategyVariant::Breakout(_) => "breakout",
        }
    }
}

impl fmt::Display for StrategyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Advisory limits. Carried with the config; the engine does not enforce them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskManagement {
    pub max_position_size: f64,
    pub max_drawdown: f64,
}

impl Default for RiskManagement {
    fn default() -> Self {
        RiskManagement {
            max_position_size: 10_000.0,
            max_drawdown: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StrategyMetadata {
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub version: u32,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyConfig {
    pub name: String,
    #[serde(flatten)]
    pub variant: StrategyVariant,
    pub risk: RiskManagement,
    pub metadata: StrategyMetadata,
}

impl StrategyConfig {
    /// A config with default risk block and empty metadata.
    pub fn new(name: impl Into<String>, variant: StrategyVariant) -> Self {
        StrategyConfig {
            name: name.into(),
            variant,
            risk: RiskManagement::default(),
            metadata: StrategyMetadata::default(),
        }
    }
}
