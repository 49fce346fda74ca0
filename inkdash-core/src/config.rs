//! Configuration types
//!
//! Assembled once at startup by the daemon and handed to the aggregator and
//! pipeline. Nothing in this module reads the environment or the filesystem.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::identity::{SourceId, SourceKind};
use crate::profile::DeviceProfile;

/// Master configuration for one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    /// Seconds between two aggregation cycles.
    pub refresh_interval_secs: u64,
    /// Upper bound for a fetch when the source does not set its own.
    pub default_timeout_secs: u64,
    /// How long a processed image is reused for the same capture.
    pub render_cache_ttl_secs: u64,
    /// Where the daemon writes the latest snapshot as JSON, if anywhere.
    pub snapshot_path: Option<PathBuf>,
    pub display: DisplayConfig,
    pub sources: Vec<SourceConfig>,
    pub finance_tickers: Vec<TickerSpec>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60,
            default_timeout_secs: 15,
            render_cache_ttl_secs: 60,
            snapshot_path: None,
            display: DisplayConfig::default(),
            sources: vec![
                SourceConfig::new(SourceKind::Weather.as_str(), 600),
                SourceConfig::new(SourceKind::Financial.as_str(), 900),
                SourceConfig::new(SourceKind::News.as_str(), 300),
                SourceConfig::new(SourceKind::Calendar.as_str(), 86_400).with_timeout(5),
            ],
            finance_tickers: vec![
                TickerSpec::new("SGDCNY=X", "SGD/CNY"),
                TickerSpec::new("CNY=X", "USD/CNY"),
                TickerSpec::new("BTC-USD", "BTC/USD"),
            ],
        }
    }
}

impl PanelConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    pub fn render_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.render_cache_ttl_secs)
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - all intervals and TTLs are positive
    /// - display dimensions are positive
    /// - source ids are non-empty and unique, URLs non-empty when given
    /// - ticker symbols are non-empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::invalid(
                "refresh_interval_secs",
                self.refresh_interval_secs,
                "must be > 0",
            ));
        }
        if self.default_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "default_timeout_secs",
                self.default_timeout_secs,
                "must be > 0",
            ));
        }
        if self.render_cache_ttl_secs == 0 {
            return Err(ConfigError::invalid(
                "render_cache_ttl_secs",
                self.render_cache_ttl_secs,
                "must be > 0",
            ));
        }

        self.display.validate()?;

        let mut seen = HashSet::new();
        for source in &self.sources {
            source.validate()?;
            if !seen.insert(source.id.as_str()) {
                return Err(ConfigError::DuplicateSource {
                    id: source.id.to_string(),
                });
            }
        }

        for ticker in &self.finance_tickers {
            if ticker.symbol.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "finance_tickers.symbol",
                    &ticker.symbol,
                    "must not be empty",
                ));
            }
        }

        Ok(())
    }
}

/// Canvas and panel resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub target_width: u32,
    pub target_height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let profile = DeviceProfile::oasis_landscape();
        Self {
            canvas_width: profile.canvas_width,
            canvas_height: profile.canvas_height,
            target_width: profile.target_width,
            target_height: profile.target_height,
        }
    }
}

impl DisplayConfig {
    pub fn profile(&self) -> DeviceProfile {
        DeviceProfile::new(
            self.canvas_width,
            self.canvas_height,
            self.target_width,
            self.target_height,
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let dims = [
            ("display.canvas_width", self.canvas_width),
            ("display.canvas_height", self.canvas_height),
            ("display.target_width", self.target_width),
            ("display.target_height", self.target_height),
        ];
        for (field, value) in dims {
            if value == 0 {
                return Err(ConfigError::invalid(field, value, "must be > 0"));
            }
        }
        Ok(())
    }
}

/// One data source: identity, volatility class and where to fetch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub id: SourceId,
    /// Endpoint returning the source's JSON payload. Sources without a URL
    /// must be registered in code.
    #[serde(default)]
    pub url: Option<String>,
    pub ttl_secs: u64,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl SourceConfig {
    pub fn new(id: impl Into<SourceId>, ttl_secs: u64) -> Self {
        Self {
            id: id.into(),
            url: None,
            ttl_secs,
            timeout_secs: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// The source's own timeout, if it overrides the aggregator default.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "sources.id".to_string(),
            });
        }
        if self.ttl_secs == 0 {
            return Err(ConfigError::invalid(
                format!("sources.{}.ttl_secs", self.id),
                self.ttl_secs,
                "must be > 0",
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::invalid(
                format!("sources.{}.timeout_secs", self.id),
                0,
                "must be > 0",
            ));
        }
        if matches!(self.url.as_deref(), Some(url) if url.trim().is_empty()) {
            return Err(ConfigError::invalid(
                format!("sources.{}.url", self.id),
                "",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// A market symbol and the label shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSpec {
    pub symbol: String,
    pub name: String,
}

impl TickerSpec {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }

    /// Parse a ticker list from either encoding accepted on the command line
    /// or in the environment:
    ///
    /// - a JSON list: `[{"symbol": "BTC-USD", "name": "BTC/USD"}]`
    /// - comma-separated symbols: `SGDCNY=X,BTC-USD` (the symbol doubles as name)
    pub fn parse_list(raw: &str) -> Vec<TickerSpec> {
        if let Ok(list) = serde_json::from_str::<Vec<TickerSpec>>(raw) {
            return list;
        }
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| TickerSpec::new(s, s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PanelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sources.len(), 4);
        assert_eq!(config.display.profile(), DeviceProfile::oasis_landscape());
    }

    #[test]
    fn test_default_ttls_follow_volatility() {
        let config = PanelConfig::default();
        let ttl = |id: &str| {
            config
                .sources
                .iter()
                .find(|s| s.id.as_str() == id)
                .map(SourceConfig::ttl)
                .unwrap()
        };
        assert!(ttl("news") < ttl("weather"));
        assert!(ttl("financial") < ttl("calendar"));
    }

    #[test]
    fn test_validate_rejects_duplicate_source() {
        let mut config = PanelConfig::default();
        config.sources.push(SourceConfig::new("news", 60));
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateSource {
                id: "news".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_zero_timeout_override() {
        let mut config = PanelConfig::default();
        config.sources[0].timeout_secs = Some(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sources.weather.timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_zero_display() {
        let mut config = PanelConfig::default();
        config.display.target_height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_ticker_list_json() {
        let tickers =
            TickerSpec::parse_list(r#"[{"symbol": "BTC-USD", "name": "BTC/USD"}]"#);
        assert_eq!(tickers, vec![TickerSpec::new("BTC-USD", "BTC/USD")]);
    }

    #[test]
    fn test_parse_ticker_list_comma_separated() {
        let tickers = TickerSpec::parse_list(" SGDCNY=X, ,BTC-USD ");
        assert_eq!(
            tickers,
            vec![
                TickerSpec::new("SGDCNY=X", "SGDCNY=X"),
                TickerSpec::new("BTC-USD", "BTC-USD"),
            ]
        );
    }

    #[test]
    fn test_toml_partial_config_fills_defaults() {
        let config: PanelConfig = toml::from_str(
            r#"
            refresh_interval_secs = 120

            [display]
            target_width = 758
            target_height = 1024

            [[sources]]
            id = "weather"
            url = "https://example.invalid/weather.json"
            ttl_secs = 600
            "#,
        )
        .unwrap();

        assert_eq!(config.refresh_interval_secs, 120);
        assert_eq!(config.default_timeout_secs, 15);
        assert_eq!(config.display.canvas_width, 1680);
        assert_eq!(config.display.target_width, 758);
        assert_eq!(config.sources.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_rejects_unknown_field() {
        let result: Result<PanelConfig, _> = toml::from_str("refresh_every = 5");
        assert!(result.is_err());
    }
}
