use std::{env, fmt, fs, io, path::PathBuf, str::FromStr};

use pubhub_error::ConfigurationError;
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Формат вывода логов.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigurationError::Settings {
                reason: format!("unknown log format '{other}'"),
            }),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        })
    }
}

/// Настройки вывода в консоль.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// Формат консоли; если не задан, используется общий.
    pub format: Option<LogFormat>,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_line_numbers: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: None,
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            with_line_numbers: false,
        }
    }
}

/// Настройки файлового вывода с ежедневной ротацией.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSinkConfig {
    pub enabled: bool,
    pub filename: String,
    pub format: LogFormat,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: "pubhub.log".to_string(),
            format: LogFormat::Json,
        }
    }
}

/// Конфигурация логирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Базовый уровень: `trace`, `debug`, `info`, `warn`, `error`, `off`.
    pub level: String,
    pub format: LogFormat,
    pub log_dir: PathBuf,
    /// Дополнительные директивы фильтра, например `pubhub::transport=debug`.
    pub directives: Vec<String>,
    pub console: ConsoleConfig,
    pub file: FileSinkConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            log_dir: PathBuf::from("logs"),
            directives: Vec::new(),
            console: ConsoleConfig::default(),
            file: FileSinkConfig::default(),
        }
    }
}

impl LoggingConfig {
    pub const ENV_LEVEL: &'static str = "PUBHUB_LOG_LEVEL";
    pub const ENV_FORMAT: &'static str = "PUBHUB_LOG_FORMAT";
    pub const ENV_DIR: &'static str = "PUBHUB_LOG_DIR";
    pub const ENV_CONSOLE: &'static str = "PUBHUB_LOG_CONSOLE";
    pub const ENV_FILE: &'static str = "PUBHUB_LOG_FILE";

    /// Переопределения из `PUBHUB_LOG_*`. Нераспознанные значения
    /// пропускаются с предупреждением в stderr.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var(Self::ENV_LEVEL) {
            self.level = level;
        }
        if let Ok(format) = env::var(Self::ENV_FORMAT) {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => eprintln!("ignoring {}: {e}", Self::ENV_FORMAT),
            }
        }
        if let Ok(dir) = env::var(Self::ENV_DIR) {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(enabled) = env_flag(Self::ENV_CONSOLE) {
            self.console.enabled = enabled;
        }
        if let Some(enabled) = env_flag(Self::ENV_FILE) {
            self.file.enabled = enabled;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let level = self.level.trim();
        if !level.eq_ignore_ascii_case("off") && level.parse::<Level>().is_err() {
            return Err(ConfigurationError::Settings {
                reason: format!("invalid log level '{}'", self.level),
            });
        }
        if self.file.enabled && self.file.filename.trim().is_empty() {
            return Err(ConfigurationError::Settings {
                reason: "log file name must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn ensure_log_dir(&self) -> io::Result<()> {
        if self.file.enabled {
            fs::create_dir_all(&self.log_dir)?;
        }
        Ok(())
    }

    /// Директива `EnvFilter`: базовый уровень плюс дополнительные
    /// директивы через запятую.
    pub fn build_filter_directive(&self) -> String {
        std::iter::once(self.level.trim().to_ascii_lowercase())
            .chain(self.directives.iter().map(|d| d.trim().to_string()))
            .filter(|d| !d.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn console_format(&self) -> LogFormat {
        self.console.format.unwrap_or(self.format)
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            eprintln!("ignoring {name}: expected a boolean, got '{value}'");
            None
        }
    }
}
