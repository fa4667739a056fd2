//! Technical indicator implementations.
//!
//! Every indicator is a pure function over a bar slice. The result holds only
//! the bars that have a full lookback window, so it is shorter than the input:
//! `len = bars.len() - lookback + 1`, and `offset` is the bar index of the first
//! value. A slice shorter than the lookback yields an empty series.
//!
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters
//! - `IndicatorSeries`: An aligned time series of indicator values

pub mod atr;
pub mod bollinger;
pub mod donchian;
pub mod ema;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod wma;

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum IndicatorValue {
    Simple(f64),
    Bollinger { upper: f64, middle: f64, lower: f64 },
    Donchian { upper: f64, lower: f64 },
}

impl IndicatorValue {
    pub fn as_simple(&self) -> Option<f64> {
        match self {
            IndicatorValue::Simple(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Wma(usize),
    Rsi(usize),
    Atr(usize),
    Stddev(usize),
    Bollinger { period: usize, stddev_mult: f64 },
    Donchian(usize),
}

impl IndicatorType {
    /// Number of bars needed before the first value can be produced.
    pub fn lookback(&self) -> usize {
        match *self {
            IndicatorType::Sma(p)
            | IndicatorType::Ema(p)
            | IndicatorType::Wma(p)
            | IndicatorType::Atr(p)
            | IndicatorType::Stddev(p)
            | IndicatorType::Bollinger { period: p, .. } => p,
            // RSI needs `p` price changes; Donchian excludes the current bar.
            IndicatorType::Rsi(p) | IndicatorType::Donchian(p) => p + 1,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Wma(period) => write!(f, "WMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult,
            } => write!(f, "BOLLINGER({},{})", period, stddev_mult),
            IndicatorType::Donchian(period) => write!(f, "DONCHIAN({})", period),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    /// Bar index that `values[0]` is aligned with.
    pub offset: usize,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn empty(indicator_type: IndicatorType) -> Self {
        IndicatorSeries {
            indicator_type,
            offset: indicator_type.lookback().saturating_sub(1),
            values: Vec::new(),
        }
    }

    /// Build a series whose first value belongs to `bars[offset]`.
    pub(crate) fn aligned(
        indicator_type: IndicatorType,
        bars: &[OhlcvBar],
        offset: usize,
        values: Vec<IndicatorValue>,
    ) -> Self {
        let values = bars[offset..]
            .iter()
            .zip(values)
            .map(|(bar, value)| IndicatorPoint {
                date: bar.date,
                value,
            })
            .collect();
        IndicatorSeries {
            indicator_type,
            offset,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value aligned with `bar_index` of the source bars, if one was computed.
    pub fn value_at(&self, bar_index: usize) -> Option<&IndicatorValue> {
        bar_index
            .checked_sub(self.offset)
            .and_then(|i| self.values.get(i))
            .map(|p| &p.value)
    }

    pub fn simple_at(&self, bar_index: usize) -> Option<f64> {
        self.value_at(bar_index).and_then(IndicatorValue::as_simple)
    }
}
