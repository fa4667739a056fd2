//! RSI (Relative Strength Index) indicator.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Lookback: n + 1 bars (n price changes). The first value sits on bar n.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi(period);
    if period == 0 || bars.len() < period + 1 {
        return IndicatorSeries::empty(indicator_type);
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = bars
        .windows(2)
        .map(|w| {
            let change = w[1].close - w[0].close;
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let mut values = Vec::with_capacity(bars.len() - period);
    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    values.push(IndicatorValue::Simple(rsi_from_averages(avg_gain, avg_loss)));

    for idx in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[idx]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[idx]) / period as f64;
        values.push(IndicatorValue::Simple(rsi_from_averages(avg_gain, avg_loss)));
    }

    IndicatorSeries::aligned(indicator_type, bars, period, values)
}
