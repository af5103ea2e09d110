// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into [`ServerConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `DATA_DIR` | Directory holding the redb database | `./data` |
//! | `ACCESS_TOKEN` | Secret used to sign session tokens | Required |
//! | `APP_ENV` | `production` enables cross-site secure cookies | `development` |
//! | `CORS_ORIGINS` | Comma-separated origins allowed to send credentials | `http://localhost:5173` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Environment variable name for the bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the database directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the session signing secret.
///
/// Tokens signed with one secret never verify under another, so rotating
/// this value logs every user out.
pub const ACCESS_TOKEN_ENV: &str = "ACCESS_TOKEN";

/// Environment variable name for the deployment environment.
pub const APP_ENV_ENV: &str = "APP_ENV";

/// Environment variable name for the CORS origin allow-list.
pub const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Deployment environment. Drives the session cookie flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    /// Anything other than `production` (case-insensitive) is development.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Server configuration resolved at startup.
#[derive(Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub access_token_secret: String,
    pub environment: Environment,
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("access_token_secret", &"<redacted>")
            .field("environment", &self.environment)
            .field("cors_origins", &self.cors_origins)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host_raw = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host_raw.parse().map_err(|_| ConfigError::Invalid {
            var: HOST_ENV,
            value: host_raw.clone(),
        })?;

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let access_token_secret = lookup(ACCESS_TOKEN_ENV)
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing(ACCESS_TOKEN_ENV))?;

        let data_dir = lookup(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let environment = lookup(APP_ENV_ENV)
            .map(|raw| Environment::parse(&raw))
            .unwrap_or_default();

        let cors_origins = lookup(CORS_ORIGINS_ENV)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_CORS_ORIGIN.to_string()]);

        let log_format = lookup(LOG_FORMAT_ENV)
            .map(|raw| LogFormat::parse(&raw))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            data_dir,
            access_token_secret,
            environment,
            cors_origins,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
