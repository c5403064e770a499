//! env_logger setup for hosts that do not bring their own logger.

use std::sync::OnceLock;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// env_logger filter directives, e.g. "penumbra_renderer=debug".
    /// Falls back to `RUST_LOG`, then to `info`.
    pub filter: Option<String>,
    /// Drop timestamps, useful when the host already prefixes lines.
    pub bare: bool,
}

impl LoggingConfig {
    fn resolve_filter(&self, from_env: Option<String>) -> String {
        self.filter
            .clone()
            .or(from_env)
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Installs env_logger on first call and returns whether penumbra owns the
/// global logger. Later calls return the first outcome unchanged.
pub fn init_logging(config: LoggingConfig) -> bool {
    *INSTALLED.get_or_init(|| {
        let filter = config.resolve_filter(std::env::var("RUST_LOG").ok());
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        if config.bare {
            builder.format_timestamp(None);
        }

        match builder.try_init() {
            Ok(()) => {
                log::debug!("logging to stderr with filter {filter:?}");
                true
            }
            Err(_) => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_environment() {
        let config = LoggingConfig {
            filter: Some("penumbra_core=trace".to_string()),
            ..LoggingConfig::default()
        };
        assert_eq!(config.resolve_filter(Some("warn".to_string())), "penumbra_core=trace");
        assert_eq!(LoggingConfig::default().resolve_filter(Some("warn".to_string())), "warn");
        assert_eq!(LoggingConfig::default().resolve_filter(None), "info");
    }

    #[test]
    fn second_init_repeats_first_outcome() {
        let first = init_logging(LoggingConfig::default());
        let second = init_logging(LoggingConfig {
            bare: true,
            ..LoggingConfig::default()
        });
        assert_eq!(first, second);
        log::info!("still logging");
    }
}
