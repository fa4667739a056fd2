//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Lookback: n bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ema(period);
    if period == 0 || bars.len() < period {
        return IndicatorSeries::empty(indicator_type);
    }

    let mut values = Vec::with_capacity(bars.len() - period + 1);
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = bars[..period].iter().map(|b| b.close).sum::<f64>() / period as f64;
    values.push(IndicatorValue::Simple(ema));

    for bar in &bars[period..] {
        ema = bar.close * k + ema * (1.0 - k);
        values.push(IndicatorValue::Simple(ema));
    }

    IndicatorSeries::aligned(indicator_type, bars, period - 1, values)
}
