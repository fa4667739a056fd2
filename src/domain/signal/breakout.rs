//! Donchian channel breakout.
//!
//! BUY when the close exceeds the highest high of the previous `period` bars,
//! SELL when it drops below the lowest low. Every qualifying bar emits a
//! signal; the executor ignores the ones that arrive while a position is open.

use crate::domain::indicator::IndicatorValue;
use crate::domain::indicator::atr::calculate_atr;
use crate::domain::indicator::donchian::calculate_donchian;
use crate::domain::ohlcv::Series;
use crate::domain::signal::{
    ExitRule, Signal, SignalDetector, SignalMetadata, SignalStrength, SignalType, push_signal,
};
use crate::domain::strategy::BreakoutParams;

pub struct BreakoutDetector {
    params: BreakoutParams,
}

impl BreakoutDetector {
    pub fn new(params: BreakoutParams) -> Self {
        BreakoutDetector { params }
    }
}

impl SignalDetector for BreakoutDetector {
    fn name(&self) -> &'static str {
        "breakout"
    }

    fn required_lookback(&self) -> usize {
        self.params.period + 1
    }

    fn exit_rule(&self) -> ExitRule {
        ExitRule::TrailingStop(self.params.trailing_stop)
    }

    fn detect(&self, series: &Series) -> Vec<Signal> {
        let mut signals = Vec::new();
        if series.len() < self.required_lookback() {
            return signals;
        }

        let bars = series.bars();
        let channel = calculate_donchian(bars, self.params.period);
        let atr = calculate_atr(bars, self.params.atr_period);

        for (i, bar) in bars.iter().enumerate() {
            let Some(&IndicatorValue::Donchian { upper, lower }) = channel.value_at(i) else {
                continue;
            };

            let (signal_type, breakout_pct) = if bar.close > upper {
                (SignalType::Buy, (bar.close - upper) / upper)
            } else if bar.close < lower {
                (SignalType::Sell, (lower - bar.close) / lower)
            } else {
                continue;
            };

            let mut metadata = SignalMetadata::default()
                .indicator("upper_channel", upper)
                .indicator("lower_channel", lower)
                .indicator("breakout_pct", breakout_pct * 100.0)
                .condition("above_upper", bar.close > upper)
                .condition("below_lower", bar.close < lower);
            if let Some(atr) = atr.simple_at(i) {
                metadata = metadata.indicator("atr", atr);
            }

            push_signal(
                &mut signals,
                series,
                i,
                signal_type,
                SignalStrength::Strong,
                0.6 + breakout_pct * 10.0,
                metadata,
            );
        }

        signals
    }
}
