//! Weighted Moving Average indicator.
//!
//! O(n) sliding window: the weighted sum is shifted by adding n*P[i] and
//! removing the previous window's plain sum.
//! WMA(n) = (1*P[i-n+1] + 2*P[i-n+2] + ... + n*P[i]) / (n*(n+1)/2)
//! Lookback: n bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_wma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Wma(period);
    if period == 0 || bars.len() < period {
        return IndicatorSeries::empty(indicator_type);
    }

    let mut values = Vec::with_capacity(bars.len() - period + 1);
    let divisor = (period * (period + 1)) as f64 / 2.0;
    let mut weighted_sum: f64 = 0.0;
    let mut window_sum: f64 = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i < period {
            weighted_sum += (i + 1) as f64 * bar.close;
            window_sum += bar.close;
        } else {
            weighted_sum += period as f64 * bar.close - window_sum;
            window_sum += bar.close - bars[i - period].close;
        }

        if i + 1 >= period {
            values.push(IndicatorValue::Simple(weighted_sum / divisor));
        }
    }

    IndicatorSeries::aligned(indicator_type, bars, period - 1, values)
}
