//! Configuration access port trait.
//!
//! Values are addressed by `[section] key`. Typed getters return the supplied
//! default when the key is missing or empty, and `ConfigInvalid` when a value
//! is present but does not parse.

use crate::domain::error::SignalbenchError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, SignalbenchError>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, SignalbenchError>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, SignalbenchError>;
}
