//! Moving-average crossover detection.
//!
//! A BUY cross happens on the bar where the short MA moves above the long MA;
//! a SELL cross where it moves below. With `signal_delay = d` a cross on bar
//! `c` is held pending and emitted on bar `c + d` at that bar's close, but only
//! if the short MA stays on the crossed side on every bar in between. A cross
//! that reverses first is dropped.

use tracing::debug;

use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::wma::calculate_wma;
use crate::domain::ohlcv::{OhlcvBar, Series};
use crate::domain::signal::{
    ExitRule, Signal, SignalDetector, SignalMetadata, SignalStrength, SignalType, push_signal,
};
use crate::domain::strategy::{CrossoverParams, MaType};

const STRONG_SEPARATION: f64 = 0.02;
const MODERATE_SEPARATION: f64 = 0.005;

pub struct CrossoverDetector {
    params: CrossoverParams,
}

struct PendingCross {
    direction: SignalType,
    cross_bar: usize,
}

impl CrossoverDetector {
    pub fn new(params: CrossoverParams) -> Self {
        CrossoverDetector { params }
    }

    fn moving_average(&self, bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
        match self.params.ma_type {
            MaType::Sma => calculate_sma(bars, period),
            MaType::Ema => calculate_ema(bars, period),
            MaType::Wma => calculate_wma(bars, period),
        }
    }
}

fn strength_for(separation: f64) -> SignalStrength {
    if separation > STRONG_SEPARATION {
        SignalStrength::Strong
    } else if separation > MODERATE_SEPARATION {
        SignalStrength::Moderate
    } else {
        SignalStrength::Weak
    }
}

impl SignalDetector for CrossoverDetector {
    fn name(&self) -> &'static str {
        "crossover"
    }

    /// The long MA plus one prior bar to compare against.
    fn required_lookback(&self) -> usize {
        self.params.long_period + 1
    }

    fn exit_rule(&self) -> ExitRule {
        ExitRule::TrailingStop(self.params.trailing_stop())
    }

    fn detect(&self, series: &Series) -> Vec<Signal> {
        let mut signals = Vec::new();
        if series.len() < self.required_lookback() {
            return signals;
        }

        let bars = series.bars();
        let short = self.moving_average(bars, self.params.short_period);
        let long = self.moving_average(bars, self.params.long_period);
        let delay = self.params.signal_delay;
        let mut pending: Option<PendingCross> = None;

        for i in 1..bars.len() {
            let (Some(s), Some(l), Some(prev_s), Some(prev_l)) = (
                short.simple_at(i),
                long.simple_at(i),
                short.simple_at(i - 1),
                long.simple_at(i - 1),
            ) else {
                continue;
            };

            let above = s > l;
            let below = s < l;

            if above && prev_s <= prev_l {
                pending = Some(PendingCross {
                    direction: SignalType::Buy,
                    cross_bar: i,
                });
            } else if below && prev_s >= prev_l {
                pending = Some(PendingCross {
                    direction: SignalType::Sell,
                    cross_bar: i,
                });
            } else if let Some(p) = &pending {
                let holds = match p.direction {
                    SignalType::Buy => above,
                    SignalType::Sell => below,
                };
                if !holds {
                    debug!(
                        cross_bar = p.cross_bar,
                        reversed_at = i,
                        direction = %p.direction,
                        "crossover reversed before delay elapsed"
                    );
                    pending = None;
                }
            }

            let Some(p) = pending.as_ref() else {
                continue;
            };
            if i - p.cross_bar < delay {
                continue;
            }

            let separation = (s - l).abs() / l;
            let metadata = SignalMetadata::default()
                .indicator("short_ma", s)
                .indicator("long_ma", l)
                .indicator("prev_short_ma", prev_s)
                .indicator("prev_long_ma", prev_l)
                .indicator("separation_pct", separation * 100.0)
                .indicator("cross_bar", p.cross_bar as f64)
                .condition("short_above_long", above)
                .condition("delay_satisfied", true);
            push_signal(
                &mut signals,
                series,
                i,
                p.direction,
                strength_for(separation),
                0.5 + separation * 10.0,
                metadata,
            );
            pending = None;
        }

        signals
    }
}
