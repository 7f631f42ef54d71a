//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CONGRUENCE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID, DEFAULT_MODEL_REVISION};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CONGRUENCE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Hub identifier of the causal language model.
    pub model_id: String,

    /// Hub revision (branch, tag or commit). Default: `main`.
    pub model_revision: String,

    /// Local model directory. When set, the Hub is never contacted.
    pub model_dir: Option<PathBuf>,

    /// Tokens kept per request before inference. Default: `512`.
    pub max_tokens: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            model_id: DEFAULT_MODEL_ID.to_string(),
            model_revision: DEFAULT_MODEL_REVISION.to_string(),
            model_dir: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl Config {
    pub const ENV_PORT: &'static str = "CONGRUENCE_PORT";
    const ENV_BIND_ADDR: &'static str = "CONGRUENCE_BIND_ADDR";
    const ENV_MODEL_ID: &'static str = "CONGRUENCE_MODEL_ID";
    const ENV_MODEL_REVISION: &'static str = "CONGRUENCE_MODEL_REVISION";
    const ENV_MODEL_DIR: &'static str = "CONGRUENCE_MODEL_DIR";
    const ENV_MAX_TOKENS: &'static str = "CONGRUENCE_MAX_TOKENS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_id = Self::parse_string_from_env(Self::ENV_MODEL_ID, defaults.model_id);
        let model_revision =
            Self::parse_string_from_env(Self::ENV_MODEL_REVISION, defaults.model_revision);
        let model_dir = Self::parse_optional_path_from_env(Self::ENV_MODEL_DIR);
        let max_tokens = Self::parse_max_tokens_from_env(defaults.max_tokens)?;

        Ok(Self {
            port,
            bind_addr,
            model_id,
            model_revision,
            model_dir,
            max_tokens,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_id.trim().is_empty() {
            return Err(ConfigError::EmptyModelId);
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens {
                value: self.max_tokens.to_string(),
            });
        }

        if let Some(ref path) = self.model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_max_tokens_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_MAX_TOKENS) {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(0) | Err(_) => Err(ConfigError::InvalidMaxTokens { value }),
                Ok(n) => Ok(n),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}
