use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки конфигурации: неизвестные имена, неверные литералы и
/// некорректные настройки стратегий доставки.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Запрошен топик, которого нет, через API без ленивого создания.
    #[error("unknown topic '{name}'")]
    UnknownTopic { name: String },

    /// Неизвестный литерал вида контейнера.
    #[error("invalid queue kind '{literal}' (expected queue, stack or priority_queue)")]
    InvalidQueueKind { literal: String },

    /// Конфигурация стратегии не прошла проверку при создании.
    #[error("invalid {kind} strategy: {reason}")]
    InvalidStrategy { kind: String, reason: String },

    /// `run_type` скрипта не зарегистрирован в реестре функций.
    #[error("script function '{run_type}' is not registered")]
    UnknownScript { run_type: String },

    /// Для вида стратегии не задан транспорт.
    #[error("no transport registered for {kind} strategies")]
    MissingTransport { kind: String },

    /// Ошибка загрузки или проверки настроек.
    #[error("settings error: {reason}")]
    Settings { reason: String },
}

impl ErrorExt for ConfigurationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownTopic { .. } => StatusCode::UnknownTopic,
            Self::InvalidQueueKind { .. } => StatusCode::InvalidQueueKind,
            Self::InvalidStrategy { .. } | Self::Settings { .. } => StatusCode::InvalidConfig,
            Self::UnknownScript { .. } => StatusCode::UnknownScript,
            Self::MissingTransport { .. } => StatusCode::MissingTransport,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "configuration".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        match self {
            Self::UnknownTopic { name } => tags.push(("topic", name.clone())),
            Self::InvalidStrategy { kind, .. } | Self::MissingTransport { kind } => {
                tags.push(("strategy_kind", kind.clone()))
            }
            _ => {}
        }

        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_queue_kind_display() {
        let err = ConfigurationError::InvalidQueueKind {
            literal: "heap".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::InvalidQueueKind);
        assert!(err.to_string().contains("'heap'"));
    }

    #[test]
    fn test_unknown_topic_tags() {
        let err = ConfigurationError::UnknownTopic {
            name: "alerts".to_string(),
        };
        let tags = err.metrics_tags();
        assert!(tags.iter().any(|(k, v)| *k == "topic" && v == "alerts"));
        assert!(err.status_code().is_client_error());
    }
}
