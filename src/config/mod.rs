//! Process settings read from the environment at startup.

pub mod loader;

pub use loader::{int_or_default, int_or_fail, string_or_default};

use crate::error::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_DATA_PATH: &str = "state.db";

/// Log output selected by `SERVE_LOG_ENV`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogProfile {
    /// JSON lines at info.
    Production,
    /// Human-readable at debug.
    Development,
    /// No subscriber.
    Off,
}

impl std::str::FromStr for LogProfile {
    type Err = std::convert::Infallible;

    /// Unknown values turn logging off rather than failing startup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "production" => LogProfile::Production,
            "development" => LogProfile::Development,
            _ => LogProfile::Off,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    pub log_profile: LogProfile,
}

impl ServerConfig {
    /// `SERVE_PORT` (required), `SERVE_HOST`, `SERVE_DATA`, `SERVE_LOG_ENV`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = int_or_fail(&lookup, "SERVE_PORT", "a port number")?;
        let host = string_or_default(&lookup, "SERVE_HOST", DEFAULT_HOST);
        let data_path = PathBuf::from(string_or_default(&lookup, "SERVE_DATA", DEFAULT_DATA_PATH));
        let log_profile = string_or_default(&lookup, "SERVE_LOG_ENV", "development")
            .parse()
            .unwrap_or(LogProfile::Off);
        Ok(Self {
            host,
            port,
            data_path,
            log_profile,
        })
    }

    /// `host:port`, with IPv6 literals bracketed.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
