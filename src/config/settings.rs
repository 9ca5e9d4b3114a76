use std::{collections::HashSet, path::Path, time::Duration};

use config::{Config, ConfigError, Environment, File};
use pubhub_error::ConfigurationError;
use serde::{Deserialize, Serialize};

use crate::{
    logging::LoggingConfig,
    pubsub::{DispatchPolicy, StrategyConfig},
    queue::PriorityOrder,
};

/// Префикс переменных окружения: `PUBHUB_DISPATCH__MAX_IN_FLIGHT=8`.
pub const ENV_PREFIX: &str = "PUBHUB";

/// Параметры исполнения публикаций.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    pub concurrent: bool,
    pub max_in_flight: usize,
    pub strategy_timeout_ms: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        let policy = DispatchPolicy::default();
        Self {
            concurrent: policy.concurrent,
            max_in_flight: policy.max_in_flight,
            strategy_timeout_ms: policy.strategy_timeout.as_millis() as u64,
        }
    }
}

impl DispatchSettings {
    pub fn policy(&self) -> DispatchPolicy {
        DispatchPolicy {
            concurrent: self.concurrent,
            max_in_flight: self.max_in_flight,
            strategy_timeout: Duration::from_millis(self.strategy_timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    pub priority_order: PriorityOrder,
}

/// Подписчик, объявленный в конфигурации.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriberSettings {
    pub name: String,
    #[serde(default)]
    pub strategies: Vec<StrategyConfig>,
}

/// Топик, объявленный в конфигурации.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSettings {
    pub name: String,
    #[serde(default)]
    pub subscribers: Vec<SubscriberSettings>,
}

/// Настройки приложения.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub dispatch: DispatchSettings,
    pub queues: QueueSettings,
    pub topics: Vec<TopicSettings>,
}

impl Settings {
    /// Загружает настройки: значения по умолчанию, затем файл (если
    /// указан), затем окружение `PUBHUB_*` с разделителем `__`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        Self::build(path).map_err(settings_error).and_then(|settings| {
            settings.validate()?;
            Ok(settings)
        })
    }

    fn build(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = DispatchSettings::default();
        let mut builder = Config::builder()
            .set_default("dispatch.concurrent", defaults.concurrent)?
            .set_default("dispatch.max_in_flight", defaults.max_in_flight as u64)?
            .set_default("dispatch.strategy_timeout_ms", defaults.strategy_timeout_ms)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let cfg = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        cfg.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |reason: String| Err(ConfigurationError::Settings { reason });

        if self.dispatch.max_in_flight == 0 {
            return invalid("dispatch.max_in_flight must be positive".to_string());
        }
        if self.dispatch.strategy_timeout_ms == 0 {
            return invalid("dispatch.strategy_timeout_ms must be positive".to_string());
        }

        let mut seen = HashSet::new();
        for topic in &self.topics {
            if topic.name.trim().is_empty() {
                return invalid("topic name must not be empty".to_string());
            }
            if !seen.insert(topic.name.as_str()) {
                return invalid(format!("topic '{}' is declared twice", topic.name));
            }
        }

        self.logging.validate()
    }
}

fn settings_error(err: ConfigError) -> ConfigurationError {
    ConfigurationError::Settings {
        reason: err.to_string(),
    }
}
