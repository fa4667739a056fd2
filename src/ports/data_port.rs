//! Price data access port trait.

use crate::domain::error::SignalbenchError;
use crate::domain::ohlcv::Series;
use chrono::NaiveDate;

pub trait DataPort {
    /// Load the bars for `symbol`, optionally limited to `[start, end]`.
    fn load_series(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Series, SignalbenchError>;

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError>;

    /// First date, last date and bar count for `symbol`.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalbenchError>;
}
