//! Engine configuration
//!
//! Loaded from TOML; every field has a default so an empty document is a
//! valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use types::errors::EngineError;
use types::ids::Symbol;

/// Pairs listed by the exchange out of the box
pub const DEFAULT_SYMBOLS: [&str; 13] = [
    "ADA/USDT",
    "BNB/USDT",
    "BTC/USDT",
    "CTSI/USDT",
    "DAI/USDT",
    "DOGE/USDT",
    "SOL/USDT",
    "TON/USDT",
    "XRP/USDT",
    "ADA/BTC",
    "BNB/BTC",
    "CTSI/BTC",
    "XRP/BTC",
];

/// Upper bound on entries in a book report
pub const MAX_REPORT_ENTRIES: usize = inspect_codec::MAX_BOOK_ENTRIES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Symbols that get a book; anything else is unknown
    pub symbols: Vec<String>,
    /// Pending updates buffered per subscriber before new ones are dropped
    pub subscriber_capacity: usize,
    /// Entries per book report, clamped to [`MAX_REPORT_ENTRIES`]
    pub max_report_entries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            subscriber_capacity: 64,
            max_report_entries: MAX_REPORT_ENTRIES,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        let config: Self =
            toml::from_str(source).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    /// Symbols must fit the 10-byte wire slot; capacity must be non-zero
    pub fn validate(&self) -> Result<(), EngineError> {
        for symbol in &self.symbols {
            Symbol::try_new(symbol.as_str())?;
        }
        if self.subscriber_capacity == 0 {
            return Err(EngineError::Config("subscriber_capacity must be at least 1".into()));
        }
        Ok(())
    }

    pub fn report_limit(&self) -> usize {
        self.max_report_entries.min(MAX_REPORT_ENTRIES)
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().map(|s| Symbol::new(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.symbols.len(), 13);
        assert!(config.symbols.contains(&"CTSI/USDT".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
            symbols = ["CTSI/USDC"]
            subscriber_capacity = 8
            max_report_entries = 1000
            "#,
        )
        .unwrap();
        assert_eq!(config.symbols, vec!["CTSI/USDC".to_string()]);
        assert_eq!(config.subscriber_capacity, 8);
        assert_eq!(config.report_limit(), 200);
    }

    #[test]
    fn test_oversized_symbol_rejected() {
        let err = EngineConfig::from_toml_str(r#"symbols = ["LONGSYMBOL/USDT"]"#).unwrap_err();
        assert!(matches!(err, EngineError::Encoding(_)));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = EngineConfig::from_toml_str("subscriber_capacity = 0").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            EngineConfig::from_toml_str("symbols = 3"),
            Err(EngineError::Config(_))
        ));
    }
}
