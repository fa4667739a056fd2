//! Trade execution: the cost model and the position state machine.
//!
//! The executor walks the bars once with at most one open position. On each
//! bar the trailing stop is checked first, then that bar's signals. A bar makes
//! at most one transition: a position closed on a bar (by stop or by an
//! opposing signal) is not replaced on the same bar, and signals that arrive
//! after the bar's transition are ignored. Fills are at the bar close; costs
//! are recorded on each trade and never feed back into decisions.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::error::SignalbenchError;
use crate::domain::ohlcv::{OhlcvBar, Series};
use crate::domain::position::{Direction, ExitReason, Position, PositionId};
use crate::domain::signal::{ExitRule, Signal, SignalId, SignalType};
use crate::domain::trade::{Trade, TradeId, TradeSide};

/// Notional committed to every entry, shared by all variants.
pub const NOTIONAL_UNIT: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExecutionConfig {
    pub commission_per_trade: f64,
    pub commission_pct: f64,
    pub slippage_pct: f64,
    /// Close a position still open after the last bar at the last close.
    pub close_at_end: bool,
}

/// Calculate commission: flat_fee + (notional * pct / 100).
pub fn calculate_commission(notional: f64, config: &ExecutionConfig) -> f64 {
    config.commission_per_trade + (notional * config.commission_pct / 100.0)
}

/// Slippage cost charged on a fill: notional * pct / 100.
pub fn calculate_slippage(notional: f64, config: &ExecutionConfig) -> f64 {
    notional * config.slippage_pct / 100.0
}

/// Whole units the fixed notional buys at `price`.
pub fn position_quantity(price: f64) -> u64 {
    (NOTIONAL_UNIT / price).floor() as u64
}

/// Trades and positions produced by one run, in creation order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExecutionLog {
    pub trades: Vec<Trade>,
    pub positions: Vec<Position>,
}

/// Simulate fills for `signals` over `series`.
///
/// Signals must be in bar order and reference bars of `series`.
pub fn execute(
    series: &Series,
    signals: &[Signal],
    exit_rule: ExitRule,
    config: &ExecutionConfig,
) -> Result<ExecutionLog, SignalbenchError> {
    check_signals(series, signals)?;

    let bars = series.bars();
    let mut executor = Executor {
        config,
        log: ExecutionLog::default(),
        open: None,
    };
    let mut pending = signals.iter().peekable();

    for (i, bar) in bars.iter().enumerate() {
        let mut transitioned = false;

        if let (Some(idx), ExitRule::TrailingStop(pct)) = (executor.open, exit_rule) {
            let position = &mut executor.log.positions[idx];
            position.track_best(bar.close);
            if position.should_trail_stop(bar.close, pct) {
                debug!(
                    bar = i,
                    position = %position.id,
                    best = position.best_price,
                    close = bar.close,
                    "trailing stop hit"
                );
                executor.close_open(i, bar, ExitReason::TrailingStop, None);
                transitioned = true;
            }
        }

        while let Some(signal) = pending.next_if(|s| s.bar_index == i) {
            if transitioned {
                debug!(bar = i, signal = %signal.id, "bar already transitioned, signal ignored");
                continue;
            }
            transitioned = executor.on_signal(signal, bar)?;
        }
    }

    if config.close_at_end && executor.open.is_some() {
        let last = bars.len() - 1;
        executor.close_open(last, &bars[last], ExitReason::EndOfData, None);
    }

    Ok(executor.log)
}

fn check_signals(series: &Series, signals: &[Signal]) -> Result<(), SignalbenchError> {
    let mut previous = 0;
    for signal in signals {
        if signal.bar_index >= series.len() {
            return Err(SignalbenchError::Execution {
                bar_index: signal.bar_index,
                reason: format!(
                    "signal {} is past the last bar ({} bars)",
                    signal.id,
                    series.len()
                ),
            });
        }
        if signal.bar_index < previous {
            return Err(SignalbenchError::Execution {
                bar_index: signal.bar_index,
                reason: format!("signal {} is out of bar order", signal.id),
            });
        }
        previous = signal.bar_index;
    }
    Ok(())
}

fn entry_signal(direction: Direction) -> SignalType {
    match direction {
        Direction::Long => SignalType::Buy,
        Direction::Short => SignalType::Sell,
    }
}

struct Executor<'a> {
    config: &'a ExecutionConfig,
    log: ExecutionLog,
    /// Index into `log.positions` of the open position.
    open: Option<usize>,
}

impl Executor<'_> {
    /// Apply one signal. Returns whether the bar transitioned.
    fn on_signal(&mut self, signal: &Signal, bar: &OhlcvBar) -> Result<bool, SignalbenchError> {
        let i = signal.bar_index;
        match self.open {
            Some(idx) => {
                let position = &self.log.positions[idx];
                if signal.signal_type != entry_signal(position.direction).opposite() {
                    debug!(bar = i, signal = %signal.id, position = %position.id, "position open, entry signal ignored");
                    return Ok(false);
                }
                self.close_open(i, bar, ExitReason::OpposingSignal, Some(signal.id));
                Ok(true)
            }
            None => self.open_position(signal, bar),
        }
    }

    fn open_position(&mut self, signal: &Signal, bar: &OhlcvBar) -> Result<bool, SignalbenchError> {
        let i = signal.bar_index;
        let price = bar.close;
        if !price.is_finite() || price <= 0.0 {
            return Err(SignalbenchError::Execution {
                bar_index: i,
                reason: format!("cannot enter at non-positive price {price}"),
            });
        }

        let quantity = position_quantity(price);
        if quantity == 0 {
            warn!(bar = i, price, notional = NOTIONAL_UNIT, "notional buys zero units, entry skipped");
            return Ok(false);
        }

        let direction = match signal.signal_type {
            SignalType::Buy => Direction::Long,
            SignalType::Sell => Direction::Short,
        };
        let id = PositionId(self.log.positions.len() as u64 + 1);
        self.log
            .positions
            .push(Position::open(id, direction, i, bar.date, price, quantity));
        self.open = Some(self.log.positions.len() - 1);
        self.record_trade(
            TradeSide::entry(direction),
            i,
            bar.date,
            price,
            quantity,
            Some(signal.id),
            id,
        );
        debug!(bar = i, position = %id, %direction, price, quantity, "position opened");
        Ok(true)
    }

    fn close_open(
        &mut self,
        bar_index: usize,
        bar: &OhlcvBar,
        reason: ExitReason,
        signal_id: Option<SignalId>,
    ) {
        let Some(idx) = self.open.take() else {
            return;
        };
        let position = &mut self.log.positions[idx];
        let pnl = position.close(bar_index, bar.date, bar.close, reason);
        let (id, direction, quantity) = (position.id, position.direction, position.quantity);
        self.record_trade(
            TradeSide::exit(direction),
            bar_index,
            bar.date,
            bar.close,
            quantity,
            signal_id,
            id,
        );
        debug!(bar = bar_index, position = %id, ?reason, pnl, "position closed");
    }

    #[allow(clippy::too_many_arguments)]
    fn record_trade(
        &mut self,
        side: TradeSide,
        bar_index: usize,
        date: NaiveDate,
        price: f64,
        quantity: u64,
        signal_id: Option<SignalId>,
        position_id: PositionId,
    ) {
        let notional = price * quantity as f64;
        let commission = calculate_commission(notional, self.config);
        let slippage = calculate_slippage(notional, self.config);
        self.log.trades.push(Trade {
            id: TradeId(self.log.trades.len() as u64 + 1),
            side,
            bar_index,
            date,
            price,
            quantity,
            commission,
            slippage,
            total_cost: notional + commission + slippage,
            signal_id,
            position_id,
        });
    }
}
