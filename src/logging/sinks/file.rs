use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::registry::LookupSpan;

use crate::logging::{
    config::{ConsoleConfig, LoggingConfig},
    formatter::{self, BoxedLayer},
};

/// Файловый слой с ежедневной ротацией. Guard нужно держать живым до
/// завершения процесса, иначе хвост буфера потеряется.
pub fn layer_with_config<S>(config: &LoggingConfig) -> (BoxedLayer<S>, WorkerGuard)
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let appender = rolling::daily(&config.log_dir, &config.file.filename);
    let (writer, guard) = non_blocking(appender);

    let options = ConsoleConfig {
        with_ansi: false,
        ..config.console.clone()
    };
    let layer = formatter::build_layer(config.file.format, writer, false, &options);
    (layer, guard)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tracing::info;
    use tracing_subscriber::{prelude::*, registry::Registry};

    use super::*;

    /// Тест проверяет, что события попадают в файл в каталоге логов.
    #[test]
    fn test_file_layer_writes_to_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = LoggingConfig {
            log_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        cfg.file.enabled = true;
        cfg.file.filename = "test.log".to_string();

        let (layer, guard) = layer_with_config::<Registry>(&cfg);
        tracing::subscriber::with_default(Registry::default().with(layer), || {
            info!(queue = "jobs", "file smoke");
        });
        drop(guard);

        let written: String = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("test.log"))
            .map(|e| fs::read_to_string(e.path()).unwrap())
            .collect();
        assert!(written.contains("file smoke"), "got: {written}");
    }
}
