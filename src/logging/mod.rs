//! Инициализация логирования на `tracing`.
//!
//! Консоль и файл с ежедневной ротацией настраиваются через
//! [`LoggingConfig`]; `RUST_LOG` имеет приоритет над уровнем из
//! конфигурации.

pub mod config;
mod filters;
mod formatter;
pub mod handle;
pub mod sinks;

pub use config::{ConsoleConfig, FileSinkConfig, LogFormat, LoggingConfig};
pub use handle::{LoggingHandle, LoggingMetrics};
use pubhub_error::ConfigurationError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

use self::formatter::BoxedLayer;

/// Устанавливает глобальный subscriber.
///
/// Повторный вызов в том же процессе вернёт
/// [`ConfigurationError::Settings`].
pub fn init_logging(mut config: LoggingConfig) -> Result<LoggingHandle, ConfigurationError> {
    config.apply_env_overrides();
    config.validate()?;
    config
        .ensure_log_dir()
        .map_err(|e| ConfigurationError::Settings {
            reason: format!("cannot create log dir {}: {e}", config.log_dir.display()),
        })?;

    let env_filter = filters::build_filter_from_config(&config);
    let mut layers: Vec<BoxedLayer<Registry>> = Vec::new();

    if config.console.enabled {
        layers.push(sinks::console::layer_with_config(&config));
    }

    let file_guard = if config.file.enabled {
        let (layer, guard) = sinks::file::layer_with_config(&config);
        layers.push(layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| ConfigurationError::Settings {
            reason: format!("logging already initialized: {e}"),
        })?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        format = %config.format,
        console = config.console.enabled,
        file = config.file.enabled,
        log_dir = %config.log_dir.display(),
        "logging initialized"
    );

    Ok(LoggingHandle::new(file_guard))
}
