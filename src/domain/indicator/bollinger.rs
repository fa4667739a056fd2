//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//! Lookback: n bars.

use crate::domain::indicator::stddev::mean_and_stddev;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_bollinger(bars: &[OhlcvBar], period: usize, stddev_mult: f64) -> IndicatorSeries {
    let indicator_type = IndicatorType::Bollinger {
        period,
        stddev_mult,
    };
    if period == 0 || bars.len() < period {
        return IndicatorSeries::empty(indicator_type);
    }

    let values = bars
        .windows(period)
        .map(|window| {
            let (middle, stddev) = mean_and_stddev(window);
            IndicatorValue::Bollinger {
                upper: middle + stddev_mult * stddev,
                middle,
                lower: middle - stddev_mult * stddev,
            }
        })
        .collect();

    IndicatorSeries::aligned(indicator_type, bars, period - 1, values)
}
