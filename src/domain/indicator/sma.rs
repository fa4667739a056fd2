//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = (C[i-n+1] + ... + C[i]) / n, maintained as a running sum.
//! Lookback: n bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Sma(period);
    if period == 0 || bars.len() < period {
        return IndicatorSeries::empty(indicator_type);
    }

    let mut values = Vec::with_capacity(bars.len() - period + 1);
    let mut sum: f64 = bars[..period].iter().map(|b| b.close).sum();
    values.push(IndicatorValue::Simple(sum / period as f64));

    for i in period..bars.len() {
        sum += bars[i].close - bars[i - period].close;
        values.push(IndicatorValue::Simple(sum / period as f64));
    }

    IndicatorSeries::aligned(indicator_type, bars, period - 1, values)
}
