//! Server configuration from environment variables.
//!
//! - `TYPED_ROUTER_HOST`: listen address (default: "0.0.0.0")
//! - `TYPED_ROUTER_PORT`: listen port (default: "3000")
//! - `TYPED_ROUTER_DISPATCH`: `native` or `catch-all` (default: "native")

use typed_router::DispatchMode;

/// Invalid configuration values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid TYPED_ROUTER_PORT '{0}': expected a number between 1 and 65535")]
    InvalidPort(String),

    #[error("invalid TYPED_ROUTER_DISPATCH '{0}': expected 'native' or 'catch-all'")]
    InvalidDispatch(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dispatch: DispatchMode,
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("TYPED_ROUTER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("TYPED_ROUTER_PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => 3000,
        };

        let dispatch = match lookup("TYPED_ROUTER_DISPATCH").as_deref().map(str::trim) {
            None | Some("") | Some("native") => DispatchMode::Native,
            Some("catch-all") | Some("catch_all") => DispatchMode::CatchAll,
            Some(other) => return Err(ConfigError::InvalidDispatch(other.to_string())),
        };

        Ok(ServerConfig {
            host,
            port,
            dispatch,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
