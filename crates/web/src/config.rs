//! Startup configuration and the registry of hostable applications.
//!
//! The application to serve is named by `TONKEY_APP` and looked up once, at
//! startup, in an [`AppRegistry`] the binary fills with router factories.
//!
//! | variable         | default          |
//! |------------------|------------------|
//! | `TONKEY_APP`     | required         |
//! | `TONKEY_ADDRESS` | `127.0.0.1:8080` |
//! | `TONKEY_LOG`     | `info`           |

use std::collections::HashMap;
use std::env;
use std::fmt::{Debug, Formatter};
use std::net::{AddrParseError, SocketAddr};

use serde::Deserialize;
use thiserror::Error;
use tracing::Level;

use crate::router::{RouteError, Router};

pub const APP_VAR: &str = "TONKEY_APP";
pub const ADDRESS_VAR: &str = "TONKEY_ADDRESS";
pub const LOG_VAR: &str = "TONKEY_LOG";

const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_LOG: &str = "info";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {name} is not set")]
    MissingVar { name: String },

    #[error("invalid listen address '{value}': {source}")]
    InvalidAddress {
        value: String,
        #[source]
        source: AddrParseError,
    },

    #[error("invalid log level '{value}', expect one of trace, debug, info, warn or error")]
    InvalidLogLevel { value: String },

    #[error("no application registered as '{name}'")]
    UnknownApp { name: String },

    #[error("invalid json config: {source}")]
    InvalidJson {
        #[from]
        source: serde_json::Error,
    },

    #[error("application '{app}' has invalid routes: {source}")]
    InvalidRoutes {
        app: String,
        #[source]
        source: RouteError,
    },
}

impl ConfigError {
    pub fn missing_var<S: ToString>(name: S) -> Self {
        Self::MissingVar { name: name.to_string() }
    }

    pub fn unknown_app<S: ToString>(name: S) -> Self {
        Self::UnknownApp { name: name.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    app: String,
    address: SocketAddr,
    log_level: Level,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    app: String,
    #[serde(default = "default_address")]
    address: String,
    #[serde(default = "default_log")]
    log_level: String,
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_log() -> String {
    DEFAULT_LOG.to_string()
}

impl Config {
    pub fn new(app: impl Into<String>, address: SocketAddr, log_level: Level) -> Self {
        Self { app: app.into(), address, log_level }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app = lookup(APP_VAR).ok_or_else(|| ConfigError::missing_var(APP_VAR))?;
        let address = lookup(ADDRESS_VAR).unwrap_or_else(default_address);
        let log_level = lookup(LOG_VAR).unwrap_or_else(default_log);

        RawConfig { app, address, log_level }.try_into()
    }

    /// Reads the configuration from a json object with the keys `app`,
    /// `address` and `log_level`; the last two are optional.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        raw.try_into()
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn log_level(&self) -> Level {
        self.log_level
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let address = raw
            .address
            .trim()
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidAddress { value: raw.address.clone(), source })?;
        let log_level = raw
            .log_level
            .trim()
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidLogLevel { value: raw.log_level.clone() })?;

        Ok(Self { app: raw.app, address, log_level })
    }
}

type RouterFactory = Box<dyn Fn() -> Result<Router, RouteError> + Send + Sync>;

/// Named router factories, one per hostable application
#[derive(Default)]
pub struct AppRegistry {
    apps: HashMap<String, RouterFactory>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`, replacing an earlier registration.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Router, RouteError> + Send + Sync + 'static,
    {
        self.apps.insert(name.into(), Box::new(factory));
        self
    }

    /// Builds the route table of the application registered as `name`.
    pub fn resolve(&self, name: &str) -> Result<Router, ConfigError> {
        let factory = self.apps.get(name).ok_or_else(|| ConfigError::unknown_app(name))?;
        factory().map_err(|source| ConfigError::InvalidRoutes { app: name.to_string(), source })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }
}

impl Debug for AppRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRegistry").field("apps", &self.apps.keys().collect::<Vec<_>>()).finish()
    }
}
