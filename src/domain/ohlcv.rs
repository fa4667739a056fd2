//! OHLCV bar and series representation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::error::SignalbenchError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl OhlcvBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    pub fn has_finite_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite())
    }

    /// high >= max(open, close, low) and low <= min(open, close, high).
    ///
    /// A NaN or infinite price fails the check.
    pub fn is_consistent(&self) -> bool {
        self.has_finite_prices()
            && self.high >= self.open.max(self.close).max(self.low)
            && self.low <= self.open.min(self.close).min(self.high)
    }
}

/// Descriptive metadata attached to a [`Series`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesMeta {
    pub symbol: String,
    pub currency: String,
    pub interval: String,
    pub source: String,
}

impl SeriesMeta {
    /// Daily USD bars with an unspecified source.
    pub fn daily(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            currency: "USD".into(),
            interval: "1d".into(),
            source: "unknown".into(),
        }
    }
}

/// An ordered, non-empty, immutable sequence of bars for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    meta: SeriesMeta,
    bars: Vec<OhlcvBar>,
}

impl Series {
    /// Validate and wrap a bar list.
    ///
    /// Rejects an empty list, any NaN or infinite price, any bar violating the
    /// OHLC invariant, any non-positive price, and dates that are not strictly
    /// increasing.
    pub fn new(meta: SeriesMeta, bars: Vec<OhlcvBar>) -> Result<Self, SignalbenchError> {
        if bars.is_empty() {
            return Err(SignalbenchError::InvalidSeries {
                reason: format!("series for {} has no bars", meta.symbol),
            });
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.has_finite_prices() {
                return Err(SignalbenchError::InvalidSeries {
                    reason: format!("bar {} ({}) has a non-finite price", i, bar.date),
                });
            }
            if !bar.is_consistent() {
                return Err(SignalbenchError::InvalidSeries {
                    reason: format!(
                        "bar {} ({}) violates high/low bounds: o={} h={} l={} c={}",
                        i, bar.date, bar.open, bar.high, bar.low, bar.close
                    ),
                });
            }
            if bar.low <= 0.0 {
                return Err(SignalbenchError::InvalidSeries {
                    reason: format!("bar {} ({}) has a non-positive price", i, bar.date),
                });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(SignalbenchError::InvalidSeries {
                    reason: format!(
                        "bar {} ({}) is not after bar {} ({})",
                        i,
                        bar.date,
                        i - 1,
                        bars[i - 1].date
                    ),
                });
            }
        }

        Ok(Self { meta, bars })
    }

    pub fn meta(&self) -> &SeriesMeta {
        &self.meta
    }

    pub fn symbol(&self) -> &str {
        &self.meta.symbol
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for slice-like ergonomics.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last(&self) -> &OhlcvBar {
        &self.bars[self.bars.len() - 1]
    }
}
