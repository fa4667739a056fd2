//! Donchian Channel — highest high / lowest low over the previous n bars.
//!
//! The window ends one bar before the value's own bar:
//! - Upper[i] = max(high[i-n..i])
//! - Lower[i] = min(low[i-n..i])
//!
//! so a close can be compared with its channel without seeing its own range.
//! Lookback: n + 1 bars. The first value sits on bar n.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_donchian(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Donchian(period);
    if period == 0 || bars.len() < period + 1 {
        return IndicatorSeries::empty(indicator_type);
    }

    let values = bars
        .windows(period)
        .take(bars.len() - period)
        .map(|window| {
            let upper = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
            let lower = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            IndicatorValue::Donchian { upper, lower }
        })
        .collect();

    IndicatorSeries::aligned(indicator_type, bars, period, values)
}
