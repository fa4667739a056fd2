//! Bollinger band mean reversion.
//!
//! BUY when the close falls below the lower band, SELL when it rises above the
//! upper band. The bands come from the window ending on the previous bar, so a
//! bar never moves the band it is tested against. With RSI confirmation on, a
//! band break also needs RSI below `oversold` (BUY) or above `overbought`
//! (SELL) on the same bar.

use tracing::debug;

use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::{IndicatorSeries, IndicatorValue};
use crate::domain::ohlcv::Series;
use crate::domain::signal::{
    ExitRule, Signal, SignalDetector, SignalMetadata, SignalStrength, SignalType, push_signal,
};
use crate::domain::strategy::MeanReversionParams;

/// Deviation beyond the band, as a fraction of price, that makes a signal strong.
const STRONG_DEVIATION: f64 = 0.02;

pub struct MeanReversionDetector {
    params: MeanReversionParams,
}

impl MeanReversionDetector {
    pub fn new(params: MeanReversionParams) -> Self {
        MeanReversionDetector { params }
    }

    fn rsi_series(&self, series: &Series) -> Option<IndicatorSeries> {
        self.params
            .use_rsi
            .then(|| calculate_rsi(series.bars(), self.params.rsi_period))
    }
}

impl SignalDetector for MeanReversionDetector {
    fn name(&self) -> &'static str {
        "mean_reversion"
    }

    fn required_lookback(&self) -> usize {
        let bands = self.params.period + 1;
        if self.params.use_rsi {
            bands.max(self.params.rsi_period + 1)
        } else {
            bands
        }
    }

    fn exit_rule(&self) -> ExitRule {
        ExitRule::OpposingSignal
    }

    fn detect(&self, series: &Series) -> Vec<Signal> {
        let mut signals = Vec::new();
        if series.len() < self.required_lookback() {
            return signals;
        }

        let bars = series.bars();
        let bands = calculate_bollinger(bars, self.params.period, self.params.std_dev_multiplier);
        let rsi = self.rsi_series(series);

        for (i, bar) in bars.iter().enumerate().skip(1) {
            let Some(&IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            }) = bands.value_at(i - 1)
            else {
                continue;
            };

            let close = bar.close;
            let (signal_type, deviation) = if close < lower {
                (SignalType::Buy, lower - close)
            } else if close > upper {
                (SignalType::Sell, close - upper)
            } else {
                continue;
            };

            let mut metadata = SignalMetadata::default()
                .indicator("upper_band", upper)
                .indicator("middle_band", middle)
                .indicator("lower_band", lower)
                .condition("below_lower", close < lower)
                .condition("above_upper", close > upper);

            let mut confidence = 0.5;
            if let Some(rsi) = &rsi {
                let Some(value) = rsi.simple_at(i) else {
                    continue;
                };
                let confirmed = match signal_type {
                    SignalType::Buy => value < self.params.oversold,
                    SignalType::Sell => value > self.params.overbought,
                };
                if !confirmed {
                    debug!(bar = i, rsi = value, %signal_type, "band break not confirmed by RSI");
                    continue;
                }
                metadata = metadata.indicator("rsi", value).condition("rsi_confirmed", true);
                confidence += 0.1;
            }

            let deviation_pct = deviation / close;
            let strength = if deviation_pct > STRONG_DEVIATION {
                SignalStrength::Strong
            } else {
                SignalStrength::Moderate
            };
            metadata = metadata.indicator("deviation_pct", deviation_pct * 100.0);
            push_signal(
                &mut signals,
                series,
                i,
                signal_type,
                strength,
                confidence + deviation_pct * 10.0,
                metadata,
            );
        }

        signals
    }
}
