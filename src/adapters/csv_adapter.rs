//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row and the
//! columns `date,open,high,low,close,volume` (dates as `YYYY-MM-DD`).

use crate::domain::error::SignalbenchError;
use crate::domain::ohlcv::{OhlcvBar, Series, SeriesMeta};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, SignalbenchError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SignalbenchError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SignalbenchError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            // header is line 1
            let row = line + 2;

            let date_str = field(&record, 0, "date", row)?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                SignalbenchError::Data {
                    reason: format!("row {}: invalid date {:?}: {}", row, date_str, e),
                }
            })?;

            bars.push(OhlcvBar {
                date,
                open: parse_field(&record, 1, "open", row)?,
                high: parse_field(&record, 2, "high", row)?,
                low: parse_field(&record, 3, "low", row)?,
                close: parse_field(&record, 4, "close", row)?,
                volume: parse_field(&record, 5, "volume", row)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    row: usize,
) -> Result<&'r str, SignalbenchError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| SignalbenchError::Data {
            reason: format!("row {}: missing {} column", row, name),
        })
}

fn parse_field<T>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    row: usize,
) -> Result<T, SignalbenchError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field(record, index, name, row)?;
    raw.parse().map_err(|e| SignalbenchError::Data {
        reason: format!("row {}: invalid {} value {:?}: {}", row, name, raw, e),
    })
}

impl DataPort for CsvAdapter {
    fn load_series(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Series, SignalbenchError> {
        let mut bars = self.read_bars(symbol)?;
        bars.retain(|b| start.is_none_or(|s| b.date >= s) && end.is_none_or(|e| b.date <= e));
        if bars.is_empty() {
            return Err(SignalbenchError::Data {
                reason: format!("no bars for {} in the requested range", symbol),
            });
        }
        debug!(symbol, bars = bars.len(), "loaded series from csv");

        let meta = SeriesMeta {
            source: format!("csv:{}", self.csv_path(symbol).display()),
            ..SeriesMeta::daily(symbol)
        };
        Series::new(meta, bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SignalbenchError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| SignalbenchError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalbenchError> {
        let bars = self.read_bars(symbol)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
