#![allow(dead_code)]

use chrono::NaiveDate;
use signalbench::domain::backtest::ExecutionResult;
use signalbench::domain::error::SignalbenchError;
pub use signalbench::domain::ohlcv::{OhlcvBar, Series, SeriesMeta};
use signalbench::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn load_series(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Series, SignalbenchError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SignalbenchError::Data {
                reason: reason.clone(),
            });
        }
        let bars: Vec<OhlcvBar> = self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| start.is_none_or(|s| b.date >= s) && end.is_none_or(|e| b.date <= e))
            .collect();
        Series::new(SeriesMeta::daily(symbol), bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalbenchError> {
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A bar whose range is close ± 0.5.
pub fn make_bar(date: NaiveDate, close: f64) -> OhlcvBar {
    OhlcvBar {
        date,
        open: close,
        high: close + 0.5,
        low: close - 0.5,
        close,
        volume: 1000,
    }
}

/// Daily bars starting 2024-01-01, one per close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(start + chrono::Duration::days(i as i64), close))
        .collect()
}

pub fn series_from_closes(symbol: &str, closes: &[f64]) -> Series {
    Series::new(SeriesMeta::daily(symbol), bars_from_closes(closes)).unwrap()
}

/// 15 bars falling 110 → 103, then 20 bars rising from 102.5 by 1.2 per bar.
pub fn downtrend_then_uptrend() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..15).map(|i| 110.0 - 0.5 * i as f64).collect();
    closes.extend((0..20).map(|i| 102.5 + 1.2 * i as f64));
    closes
}

/// A drifting sine wave with enough swings to exercise every variant.
pub fn oscillating_closes(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            100.0 + 10.0 * (t / 5.0).sin() + 3.0 * (t / 1.7).sin() + 0.05 * t
        })
        .collect()
}

/// Invariants every run must satisfy, whatever the config.
pub fn assert_run_invariants(result: &ExecutionResult) {
    let p = &result.performance;
    assert!((p.net_pnl - (p.total_pnl - p.total_commissions)).abs() < 1e-6);
    assert_eq!(p.winning_trades + p.losing_trades, p.total_trades);

    for bar in 0..result.bars {
        let open = result
            .positions
            .iter()
            .filter(|pos| pos.is_open_at(bar))
            .count();
        assert!(open <= 1, "{open} positions open at bar {bar}");
    }

    for pos in result.positions.iter().filter(|p| p.is_closed()) {
        let expected = (pos.exit_price.unwrap() - pos.entry_price)
            * pos.quantity as f64
            * pos.direction.sign();
        assert!((pos.realized_pnl.unwrap() - expected).abs() < 1e-6);
    }

    for pair in result.signals.windows(2) {
        assert!(pair[0].bar_index <= pair[1].bar_index);
    }
    for s in &result.signals {
        assert!((0.0..=1.0).contains(&s.confidence));
    }
}
