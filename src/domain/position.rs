//! Simulated positions and their lifecycle.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PositionId(pub u64);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1 for long, -1 for short.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("LONG"),
            Direction::Short => f.write_str("SHORT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionStatus {
    Open,
    Closed,
    /// Reserved for scaled exits; no variant produces it.
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    OpposingSignal,
    TrailingStop,
    EndOfData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub id: PositionId,
    pub direction: Direction,
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub quantity: u64,
    pub status: PositionStatus,
    pub exit_bar: Option<usize>,
    pub exit_date: Option<NaiveDate>,
    pub exit_price: Option<f64>,
    pub realized_pnl: Option<f64>,
    pub exit_reason: Option<ExitReason>,
    /// Most favourable close seen since entry, entry bar included.
    pub best_price: f64,
}

impl Position {
    pub fn open(
        id: PositionId,
        direction: Direction,
        entry_bar: usize,
        entry_date: NaiveDate,
        entry_price: f64,
        quantity: u64,
    ) -> Self {
        Position {
            id,
            direction,
            entry_bar,
            entry_date,
            entry_price,
            quantity,
            status: PositionStatus::Open,
            exit_bar: None,
            exit_date: None,
            exit_price: None,
            realized_pnl: None,
            exit_reason: None,
            best_price: entry_price,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == PositionStatus::Closed
    }

    pub fn is_long(&self) -> bool {
        self.direction == Direction::Long
    }

    pub fn is_short(&self) -> bool {
        self.direction == Direction::Short
    }

    /// (price - entry) * quantity, sign-adjusted for direction.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.quantity as f64 * self.direction.sign()
    }

    pub fn track_best(&mut self, price: f64) {
        self.best_price = match self.direction {
            Direction::Long => self.best_price.max(price),
            Direction::Short => self.best_price.min(price),
        };
    }

    /// True once `price` has given back `pct` of the best price since entry.
    pub fn should_trail_stop(&self, price: f64, pct: f64) -> bool {
        match self.direction {
            Direction::Long => price <= self.best_price * (1.0 - pct),
            Direction::Short => price >= self.best_price * (1.0 + pct),
        }
    }

    /// Mark the position closed and return its realized PnL.
    pub fn close(
        &mut self,
        exit_bar: usize,
        exit_date: NaiveDate,
        exit_price: f64,
        reason: ExitReason,
    ) -> f64 {
        let pnl = self.unrealized_pnl(exit_price);
        self.status = PositionStatus::Closed;
        self.exit_bar = Some(exit_bar);
        self.exit_date = Some(exit_date);
        self.exit_price = Some(exit_price);
        self.realized_pnl = Some(pnl);
        self.exit_reason = Some(reason);
        pnl
    }

    /// Whether the position was open at the end of `bar_index`.
    pub fn is_open_at(&self, bar_index: usize) -> bool {
        bar_index >= self.entry_bar && self.exit_bar.is_none_or(|exit| bar_index < exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample_long_position() -> Position {
        Position::open(PositionId(1), Direction::Long, 3, date(15), 50.0, 100)
    }

    fn sample_short_position() -> Position {
        Position::open(PositionId(2), Direction::Short, 3, date(15), 100.0, 100)
    }

    #[test]
    fn opens_with_entry_as_best_price() {
        let pos = sample_long_position();
        assert!(pos.is_open());
        assert!(pos.is_long());
        assert!(!pos.is_short());
        assert!((pos.best_price - 50.0).abs() < f64::EPSILON);
        assert!(pos.realized_pnl.is_none());
    }

    #[test]
    fn unrealized_pnl_long_profit() {
        let pos = sample_long_position();
        assert!((pos.unrealized_pnl(55.0) - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unrealized_pnl_short_profit() {
        let pos = sample_short_position();
        assert!((pos.unrealized_pnl(90.0) - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unrealized_pnl_short_loss() {
        let pos = sample_short_position();
        assert!((pos.unrealized_pnl(110.0) - (-1000.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn long_trailing_stop_follows_peak() {
        let mut pos = sample_long_position();
        pos.track_best(60.0);
        pos.track_best(55.0);
        assert!((pos.best_price - 60.0).abs() < f64::EPSILON);

        // 10% below the 60 peak is 54
        assert!(!pos.should_trail_stop(54.5, 0.1));
        assert!(pos.should_trail_stop(54.0, 0.1));
        assert!(pos.should_trail_stop(40.0, 0.1));
    }

    #[test]
    fn short_trailing_stop_follows_trough() {
        let mut pos = sample_short_position();
        pos.track_best(80.0);
        pos.track_best(90.0);
        assert!((pos.best_price - 80.0).abs() < f64::EPSILON);

        assert!(!pos.should_trail_stop(87.0, 0.1));
        assert!(pos.should_trail_stop(88.0, 0.1));
    }

    #[test]
    fn close_records_exit_and_pnl() {
        let mut pos = sample_short_position();
        let pnl = pos.close(8, date(20), 92.0, ExitReason::OpposingSignal);

        assert!((pnl - 800.0).abs() < f64::EPSILON);
        assert!(pos.is_closed());
        assert_eq!(pos.exit_bar, Some(8));
        assert_eq!(pos.exit_date, Some(date(20)));
        assert_eq!(pos.exit_price, Some(92.0));
        assert_eq!(pos.realized_pnl, Some(pnl));
        assert_eq!(pos.exit_reason, Some(ExitReason::OpposingSignal));
    }

    #[test]
    fn open_window_excludes_exit_bar() {
        let mut pos = sample_long_position();
        assert!(!pos.is_open_at(2));
        assert!(pos.is_open_at(3));
        assert!(pos.is_open_at(100));

        pos.close(6, date(18), 51.0, ExitReason::TrailingStop);
        assert!(pos.is_open_at(5));
        assert!(!pos.is_open_at(6));
    }

    #[test]
    fn direction_serializes_uppercase() {
        assert_eq!(serde_json::to_value(Direction::Long).unwrap(), "LONG");
        assert_eq!(
            serde_json::to_value(ExitReason::EndOfData).unwrap(),
            "end_of_data"
        );
    }
}
