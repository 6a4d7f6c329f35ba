//! Configuration module for the openaid backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;
use crate::presentation::CurrencyFormat;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote activity API (resources are joined onto it)
    pub api_url: String,
    /// Path to SQLite database file holding the country border table
    pub db_path: PathBuf,
    /// Optional CSV file to (re)load the country border table from at startup
    pub borders_csv: Option<PathBuf>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Lifetime of the cached unfiltered activity list, in seconds
    pub cache_ttl_secs: u64,
    /// Number of activities per listing page
    pub page_size: usize,
    /// Prefix used when rendering amounts
    pub currency_symbol: String,
    /// Thousands separator used when rendering amounts
    pub thousand_separator: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_url = env::var("OPENAID_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/api/".to_string());

        let db_path = env::var("OPENAID_DB_PATH")
            .unwrap_or_else(|_| "./data/world.sqlite".to_string())
            .into();

        let borders_csv = env::var("OPENAID_BORDERS_CSV").ok().map(PathBuf::from);

        let bind_addr = env::var("OPENAID_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid OPENAID_BIND_ADDR: {}", e)))?;

        let log_level = env::var("OPENAID_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cache_ttl_secs = parse_var("OPENAID_CACHE_TTL_SECS", 60 * 60 * 24)?;
        let page_size = parse_var("OPENAID_PAGE_SIZE", 15)?;
        if page_size == 0 {
            return Err(AppError::Config(
                "OPENAID_PAGE_SIZE must be at least 1".to_string(),
            ));
        }

        let currency_symbol =
            env::var("OPENAID_CURRENCY_SYMBOL").unwrap_or_else(|_| "€ ".to_string());
        let thousand_separator =
            env::var("OPENAID_THOUSAND_SEPARATOR").unwrap_or_else(|_| ".".to_string());

        Ok(Self {
            api_url,
            db_path,
            borders_csv,
            bind_addr,
            log_level,
            cache_ttl_secs,
            page_size,
            currency_symbol,
            thousand_separator,
        })
    }

    /// Currency rendering settings.
    pub fn currency(&self) -> CurrencyFormat {
        CurrencyFormat::new(&self.currency_symbol, &self.thousand_separator)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
