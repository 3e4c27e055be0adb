//! Server configuration

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{DatePredictionError, Result};

/// Default listening port
pub const DEFAULT_PORT: u16 = 8006;

/// Default RPC path
pub const DEFAULT_PATH: &str = "/rpc";

/// How method handlers treat fields missing from the `data` object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamPolicy {
    /// Absent or non-string values are formatted with a placeholder
    #[default]
    Lenient,
    /// Every field a method reads must be a present string
    Strict,
}

impl FromStr for ParamPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(ParamPolicy::Lenient),
            "strict" => Ok(ParamPolicy::Strict),
            other => Err(format!(
                "unknown param policy '{}' (expected lenient or strict)",
                other
            )),
        }
    }
}

impl fmt::Display for ParamPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamPolicy::Lenient => write!(f, "lenient"),
            ParamPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Configuration for the RPC server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind
    pub host: String,
    /// Port to bind (0 picks an ephemeral port)
    pub port: u16,
    /// Path the dispatcher is mounted on
    pub path: String,
    /// Deadline for a whole request, body read included
    pub request_timeout_secs: u64,
    /// Largest accepted request body
    pub max_body_bytes: usize,
    /// Attach a permissive CORS layer
    pub allow_cors: bool,
    /// Parameter handling for built-in methods
    pub param_policy: ParamPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
            allow_cors: false,
            param_policy: ParamPolicy::Lenient,
        }
    }
}

impl ServerConfig {
    /// Loopback config on an ephemeral port, for test harnesses
    pub fn ephemeral() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Self::default()
        }
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(DatePredictionError::Config(format!(
                "path must start with '/': {}",
                self.path
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(DatePredictionError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(DatePredictionError::Config(
                "max_body_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Socket address built from `host` and `port`
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let raw = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        };
        raw.parse().map_err(|e| {
            DatePredictionError::Config(format!("invalid listen address '{}': {}", raw, e))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
