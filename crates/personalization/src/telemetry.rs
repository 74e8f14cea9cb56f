// personalization/crates/personalization/src/telemetry.rs

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// Filter used for the subscriber. `RUST_LOG` wins when it is set and valid,
/// otherwise the configured log level applies.
pub fn log_filter(cfg: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_level))
        .unwrap_or_else(|e| {
            eprintln!("Invalid LOG_LEVEL '{}' ({}), using info", cfg.log_level, e);
            EnvFilter::new("info")
        })
}

pub fn init_tracing(cfg: &Config) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(log_filter(cfg))
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .compact()
        .finish();

    // Keeps the first subscriber if one is already installed.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_becomes_filter() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let cfg = Config {
            log_level: "personalization=debug,tower_http=warn".to_string(),
            ..Config::default()
        };
        let filter = log_filter(&cfg).to_string();
        assert!(filter.contains("personalization=debug"));
        assert!(filter.contains("tower_http=warn"));
    }

    #[test]
    fn test_unparseable_level_falls_back_to_info() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let cfg = Config {
            log_level: "personalization=loud".to_string(),
            ..Config::default()
        };
        let filter = log_filter(&cfg).to_string();
        assert!(filter.contains("info"));
        assert!(!filter.contains("personalization"));
    }
}
