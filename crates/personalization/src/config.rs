// personalization/crates/personalization/src/config.rs

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_host: String,
    pub api_port: u16,
    pub request_timeout_seconds: u64,
    pub max_body_bytes: usize,
    pub strict_event_validation: bool,
    pub roadmap_seed_path: Option<PathBuf>,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: "127.0.0.1".to_string(),
            api_port: 8000,
            request_timeout_seconds: 30,
            max_body_bytes: 64 * 1024,
            strict_event_validation: false,
            roadmap_seed_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    ///
    /// `.env` loading is left to the binary so library callers and tests see
    /// only the real environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup, falling back to
    /// defaults for anything unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_host = lookup("API_HOST").unwrap_or(defaults.api_host);
        let api_port = parse_var(&lookup, "API_PORT", defaults.api_port)?;
        let request_timeout_seconds = parse_var(
            &lookup,
            "REQUEST_TIMEOUT_SECONDS",
            defaults.request_timeout_seconds,
        )?;
        let max_body_bytes = parse_var(&lookup, "MAX_BODY_BYTES", defaults.max_body_bytes)?;
        let strict_event_validation = match lookup("STRICT_EVENT_VALIDATION") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("STRICT_EVENT_VALIDATION has invalid value '{}'", raw))?,
            None => defaults.strict_event_validation,
        };
        let roadmap_seed_path = lookup("ROADMAP_SEED_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let log_level = lookup("LOG_LEVEL")
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or(defaults.log_level);

        if request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECONDS must be greater than zero"));
        }

        Ok(Self {
            api_host,
            api_port,
            request_timeout_seconds,
            max_body_bytes,
            strict_event_validation,
            roadmap_seed_path,
            log_level,
        })
    }

    pub fn print_config(&self) {
        info!("Current Configuration:");
        info!("- API: {}:{}", self.api_host, self.api_port);
        info!("- Request Timeout: {}s", self.request_timeout_seconds);
        info!("- Max Body Size: {} bytes", self.max_body_bytes);
        info!("- Strict Event Validation: {}", self.strict_event_validation);
        match &self.roadmap_seed_path {
            Some(path) => info!("- Roadmap Seed: {}", path.display()),
            None => info!("- Roadmap Seed: built-in"),
        }
        info!("- Log Level: {}", self.log_level);
    }

    pub fn api_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.api_host, self.api_port)
            .parse()
            .with_context(|| format!("Invalid API address {}:{}", self.api_host, self.api_port))
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!("expected true or false")),
    }
}
