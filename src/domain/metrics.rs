//! Performance summary over one run's trade and position logs.

use serde::Serialize;

use crate::domain::position::Position;
use crate::domain::trade::Trade;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PerformanceSummary {
    /// Entry trades (BUY or SHORT).
    pub total_trades: usize,
    /// Closed positions with positive realized PnL.
    pub winning_trades: usize,
    /// `total_trades - winning_trades`, so open positions count here.
    pub losing_trades: usize,
    pub win_rate: f64,
    /// Realized PnL over closed positions.
    pub total_pnl: f64,
    pub total_commissions: f64,
    pub total_slippage: f64,
    pub total_transaction_costs: f64,
    /// `total_pnl - total_commissions`; slippage is reported separately.
    pub net_pnl: f64,
    /// Mean price * quantity over all trades.
    pub average_trade_size: f64,
    pub largest_win: f64,
    /// Magnitude of the worst realized loss.
    pub largest_loss: f64,
    pub open_positions: usize,
}

impl PerformanceSummary {
    pub fn compute(trades: &[Trade], positions: &[Position]) -> Self {
        let total_trades = trades.iter().filter(|t| t.side.is_entry()).count();

        let mut winning_trades = 0usize;
        let mut total_pnl = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut open_positions = 0usize;

        for position in positions {
            if position.is_open() {
                open_positions += 1;
            }
            if !position.is_closed() {
                continue;
            }
            let pnl = position.realized_pnl.unwrap_or(0.0);
            total_pnl += pnl;
            if pnl > 0.0 {
                winning_trades += 1;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                largest_loss = largest_loss.max(pnl.abs());
            }
        }

        let total_commissions: f64 = trades.iter().map(|t| t.commission).sum();
        let total_slippage: f64 = trades.iter().map(|t| t.slippage).sum();

        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64
        } else {
            0.0
        };

        let average_trade_size = if trades.is_empty() {
            0.0
        } else {
            trades.iter().map(Trade::notional).sum::<f64>() / trades.len() as f64
        };

        PerformanceSummary {
            total_trades,
            winning_trades,
            losing_trades: total_trades.saturating_sub(winning_trades),
            win_rate,
            total_pnl,
            total_commissions,
            total_slippage,
            total_transaction_costs: total_commissions + total_slippage,
            net_pnl: total_pnl - total_commissions,
            average_trade_size,
            largest_win,
            largest_loss,
            open_positions,
        }
    }
}
