//! TOML configuration for the AVMET daemon

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A station the daemon polls and the API lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub icao: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Report source: "awc" (default) or "canned"
    pub source: Option<String>,
    pub base_url: Option<String>,
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluxConfig {
    pub url: String,
    pub org: String,
    pub bucket: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinksConfig {
    pub fs_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub airports: Option<Vec<Airport>>,
    pub http: Option<HttpConfig>,
    pub fetch: Option<FetchConfig>,
    pub influx: Option<InfluxConfig>,
    pub sinks: Option<SinksConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from the AVMET_CONFIG path (TOML) if present,
    /// with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("AVMET_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let cfg = if Path::new(path).exists() {
            toml::from_str::<AppConfig>(&fs::read_to_string(path)?)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    /// HTTP bind address (default 0.0.0.0:8080)
    pub fn http_bind(&self) -> String {
        self.http
            .as_ref()
            .and_then(|http| http.bind.clone())
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
    }

    /// Report source selector (default "awc")
    pub fn fetch_source(&self) -> String {
        self.fetch
            .as_ref()
            .and_then(|fetch| fetch.source.clone())
            .unwrap_or_else(|| "awc".to_string())
    }

    /// Report source base URL (default aviationweather.gov)
    pub fn fetch_base_url(&self) -> String {
        self.fetch
            .as_ref()
            .and_then(|fetch| fetch.base_url.clone())
            .unwrap_or_else(|| "https://aviationweather.gov".to_string())
    }

    /// Seconds between decode cycles (default 300)
    pub fn fetch_interval_secs(&self) -> u64 {
        self.fetch
            .as_ref()
            .and_then(|fetch| fetch.interval_secs)
            .unwrap_or(300)
    }

    /// Stations to poll; defaults to Vienna when none are configured
    pub fn airports(&self) -> Vec<Airport> {
        match &self.airports {
            Some(list) if !list.is_empty() => list.clone(),
            _ => vec![Airport {
                icao: "LOWW".to_string(),
                name: "Vienna".to_string(),
            }],
        }
    }

    /// Directory for the JSONL fallback sink, when configured
    pub fn fs_dir(&self) -> Option<String> {
        self.sinks.as_ref().and_then(|sinks| sinks.fs_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_a_config_file() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.http_bind(), "0.0.0.0:8080");
        assert_eq!(cfg.fetch_source(), "awc");
        assert_eq!(cfg.fetch_base_url(), "https://aviationweather.gov");
        assert_eq!(cfg.fetch_interval_secs(), 300);
        assert_eq!(
            cfg.airports(),
            vec![Airport {
                icao: "LOWW".to_string(),
                name: "Vienna".to_string(),
            }]
        );
        assert_eq!(cfg.fs_dir(), None);
    }

    #[test]
    fn parses_a_full_config() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [[airports]]
            icao = "KJFK"
            name = "New York JFK"

            [[airports]]
            icao = "LOWW"
            name = "Vienna"

            [http]
            bind = "127.0.0.1:9090"

            [fetch]
            source = "canned"
            interval_secs = 60

            [influx]
            url = "http://localhost:8086"
            org = "avmet"
            bucket = "metar"
            token = "secret"

            [sinks]
            fs_dir = "/var/lib/avmet"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.airports().len(), 2);
        assert_eq!(cfg.airports()[0].icao, "KJFK");
        assert_eq!(cfg.http_bind(), "127.0.0.1:9090");
        assert_eq!(cfg.fetch_source(), "canned");
        assert_eq!(cfg.fetch_interval_secs(), 60);
        assert_eq!(cfg.influx.as_ref().unwrap().bucket, "metar");
        assert_eq!(cfg.fs_dir(), Some("/var/lib/avmet".to_string()));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load_from("/nonexistent/avmet.toml").unwrap();
        assert_eq!(cfg.http_bind(), "0.0.0.0:8080");
    }
}
