//! Average True Range indicator.
//!
//! TR[0] = high - low, TR[i] = max(H-L, |H-C[i-1]|, |L-C[i-1]|).
//! Seeded with the mean of the first n true ranges, then Wilder-smoothed:
//! ATR[i] = (ATR[i-1] * (n-1) + TR[i]) / n.
//! Lookback: n bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_atr(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Atr(period);
    if period == 0 || bars.len() < period {
        return IndicatorSeries::empty(indicator_type);
    }

    let tr_values: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();

    let mut values = Vec::with_capacity(bars.len() - period + 1);
    let mut atr = tr_values[..period].iter().sum::<f64>() / period as f64;
    values.push(IndicatorValue::Simple(atr));

    for tr in &tr_values[period..] {
        atr = (atr * (period - 1) as f64 + tr) / period as f64;
        values.push(IndicatorValue::Simple(atr));
    }

    IndicatorSeries::aligned(indicator_type, bars, period - 1, values)
}
