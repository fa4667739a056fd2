//! Standard Deviation indicator.
//!
//! Population standard deviation over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n-1) / n)
//! Lookback: n bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

/// Mean and population standard deviation of the closes in `window`.
pub(crate) fn mean_and_stddev(window: &[OhlcvBar]) -> (f64, f64) {
    let n = window.len() as f64;
    let mean = window.iter().map(|b| b.close).sum::<f64>() / n;
    let variance = window
        .iter()
        .map(|b| {
            let diff = b.close - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

pub fn calculate_stddev(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Stddev(period);
    if period == 0 || bars.len() < period {
        return IndicatorSeries::empty(indicator_type);
    }

    let values = bars
        .windows(period)
        .map(|window| IndicatorValue::Simple(mean_and_stddev(window).1))
        .collect();

    IndicatorSeries::aligned(indicator_type, bars, period - 1, values)
}
