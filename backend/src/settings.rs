//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `STUDIO_*` environment variables and an
//! optional configuration file, in that order of precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::ports::DEFAULT_PAGE_SIZE;
use crate::domain::{DEFAULT_LOG_LIMIT, MAX_PAGE_SIZE};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {message}")]
    InvalidBindAddr { value: String, message: String },
    /// The remote request timeout must be positive.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Runtime configuration for the studio server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STUDIO")]
pub struct StudioSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; in-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Timeout applied to every call against a remote deployment.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
    /// Documents requested per browser page.
    pub page_size: Option<u32>,
    /// Default number of log entries returned when no limit is given.
    pub log_limit: Option<usize>,
}

impl StudioSettings {
    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not
    /// parse as a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Timeout for remote deployment calls.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero timeout.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Browser page size clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Log limit used when a request does not name one.
    #[must_use]
    pub fn log_limit(&self) -> usize {
        self.log_limit.unwrap_or(DEFAULT_LOG_LIMIT)
    }
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            page_size: None,
            log_limit: None,
        }
    }
}
