//! Immutable execution records.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::domain::position::{Direction, PositionId};
use crate::domain::signal::SignalId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TradeId(pub u64);

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
    Short,
    Cover,
}

impl TradeSide {
    pub fn entry(direction: Direction) -> Self {
        match direction {
            Direction::Long => TradeSide::Buy,
            Direction::Short => TradeSide::Short,
        }
    }

    pub fn exit(direction: Direction) -> Self {
        match direction {
            Direction::Long => TradeSide::Sell,
            Direction::Short => TradeSide::Cover,
        }
    }

    /// BUY and SHORT open positions.
    pub fn is_entry(self) -> bool {
        matches!(self, TradeSide::Buy | TradeSide::Short)
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
            TradeSide::Short => "SHORT",
            TradeSide::Cover => "COVER",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub id: TradeId,
    pub side: TradeSide,
    pub bar_index: usize,
    pub date: NaiveDate,
    pub price: f64,
    pub quantity: u64,
    pub commission: f64,
    pub slippage: f64,
    /// price * quantity + commission + slippage
    pub total_cost: f64,
    /// None for exits not triggered by a signal (trailing stop, end of data).
    pub signal_id: Option<SignalId>,
    pub position_id: PositionId,
}

impl Trade {
    pub fn notional(&self) -> f64 {
        self.price * self.quantity as f64
    }
}
