//! INI file configuration adapter.

use crate::domain::error::SignalbenchError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SignalbenchError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| SignalbenchError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, SignalbenchError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| SignalbenchError::ConfigParse {
                file: "<string>".into(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// Raw value with surrounding whitespace removed; blank counts as unset.
    fn raw(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_typed<T: FromStr>(
        &self,
        section: &str,
        key: &str,
        default: T,
        expected: &str,
    ) -> Result<T, SignalbenchError> {
        match self.raw(section, key) {
            None => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| invalid_value(section, key, expected, &raw)),
        }
    }
}

fn invalid_value(section: &str, key: &str, expected: &str, raw: &str) -> SignalbenchError {
    SignalbenchError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: format!("expected {expected}, got {raw:?}"),
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, SignalbenchError> {
        self.parse_typed(section, key, default, "an integer")
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, SignalbenchError> {
        self.parse_typed(section, key, default, "a number")
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, SignalbenchError> {
        let Some(raw) = self.raw(section, key) else {
            return Ok(default);
        };
        match raw.to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(invalid_value(section, key, "true/false", &raw)),
        }
    }
}
