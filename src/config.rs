//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default hosted model for the chat assistant.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default simulated latency of a lead submission.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1500);

/// Default time the export layout is given to settle before printing.
pub const DEFAULT_PRINT_SETTLE: Duration = Duration::from_millis(500);

/// Default idle time before a visitor's intake flow or chat widget is dropped.
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Credential for the remote conversational service. `None` = demo mode.
    pub api_key: Option<SecretString>,
    /// Model identifier sent to the remote service.
    pub model: String,
    /// HTTP listen port.
    pub port: u16,
    /// Address visitors use to reach the deck (copied by the share action).
    pub public_url: String,
    /// Simulated network latency for lead submission.
    pub submit_delay: Duration,
    /// Delay between entering export mode and requesting a print.
    pub print_settle: Duration,
    /// Idle time after which per-visitor state is pruned.
    pub session_idle_timeout: Duration,
    /// Override for the model API host. Unset uses the public endpoint.
    pub api_base_url: Option<String>,
    /// Directory for rolling log files. Console only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            port: 8080,
            public_url: "http://localhost:8080".to_string(),
            submit_delay: DEFAULT_SUBMIT_DELAY,
            print_settle: DEFAULT_PRINT_SETTLE,
            session_idle_timeout: DEFAULT_SESSION_IDLE_TIMEOUT,
            api_base_url: None,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Build config from environment variables.
    ///
    /// The credential is read from `GEMINI_API_KEY`, falling back to
    /// `API_KEY`. Empty values count as unset.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from);

        let model = std::env::var("ESTATE_FLOW_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let port: u16 = std::env::var("ESTATE_FLOW_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let public_url = std::env::var("ESTATE_FLOW_PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        let submit_delay = env_millis("ESTATE_FLOW_SUBMIT_DELAY_MS").unwrap_or(DEFAULT_SUBMIT_DELAY);
        let print_settle = env_millis("ESTATE_FLOW_PRINT_SETTLE_MS").unwrap_or(DEFAULT_PRINT_SETTLE);

        let session_idle_timeout = std::env::var("ESTATE_FLOW_SESSION_IDLE_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SESSION_IDLE_TIMEOUT);

        let api_base_url = std::env::var("GEMINI_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        let log_dir = std::env::var("ESTATE_FLOW_LOG_DIR").ok().map(PathBuf::from);

        Self {
            api_key,
            model,
            port,
            public_url,
            submit_delay,
            print_settle,
            session_idle_timeout,
            api_base_url,
            log_dir,
        }
    }

    /// Whether a live model is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Reject values that would only fail later at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "ESTATE_FLOW_MODEL".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if !(self.public_url.starts_with("http://") || self.public_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "ESTATE_FLOW_PUBLIC_URL".to_string(),
                message: format!("expected an http(s) URL, got {:?}", self.public_url),
            });
        }
        if self.session_idle_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "ESTATE_FLOW_SESSION_IDLE_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}
