use tracing_subscriber::EnvFilter;

use crate::logging::config::LoggingConfig;

/// `RUST_LOG`, если задан, иначе директива из конфигурации. Неверная
/// директива заменяется на `info`.
pub fn build_filter_from_config(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let directive = config.build_filter_directive();
    EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("invalid log filter directive '{directive}': {e}; falling back to 'info'");
        EnvFilter::new("info")
    })
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    /// Тест проверяет, что некорректная директива не приводит к панике.
    #[test]
    #[serial]
    fn test_invalid_directive_falls_back() {
        env::remove_var("RUST_LOG");
        let cfg = LoggingConfig {
            directives: vec!["this_is=not=valid".to_string()],
            ..Default::default()
        };
        let filter = build_filter_from_config(&cfg);
        assert_eq!(filter.to_string(), "info");
    }

    /// Тест проверяет, что `RUST_LOG` важнее конфигурации.
    #[test]
    #[serial]
    fn test_rust_log_wins() {
        env::set_var("RUST_LOG", "debug");
        let filter = build_filter_from_config(&LoggingConfig::default());
        env::remove_var("RUST_LOG");
        assert_eq!(filter.to_string(), "debug");
    }
}
