use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки менеджера очередей.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Контейнер `(kind, name)` никогда не создавался.
    #[error("{kind} '{name}' does not exist")]
    NotFound { kind: String, name: String },

    /// Контейнер существует, но пуст.
    #[error("{kind} '{name}' is empty")]
    Underflow { kind: String, name: String },

    /// Событие для очереди с приоритетом не несёт приоритета.
    #[error("event #{index} for {kind} '{name}' has no priority")]
    MissingPriority {
        kind: String,
        name: String,
        index: usize,
    },

    /// Приоритет события равен `NaN` и не упорядочивается.
    #[error("event #{index} for {kind} '{name}' has a NaN priority")]
    InvalidPriority {
        kind: String,
        name: String,
        index: usize,
    },

    /// Ожидание события истекло.
    #[error("no event arrived in {kind} '{name}' within {limit_ms} ms")]
    Timeout {
        kind: String,
        name: String,
        limit_ms: u64,
    },
}

impl QueueError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_underflow(&self) -> bool {
        matches!(self, Self::Underflow { .. })
    }
}

impl ErrorExt for QueueError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::QueueNotFound,
            Self::Underflow { .. } => StatusCode::QueueUnderflow,
            Self::MissingPriority { .. } => StatusCode::MissingPriority,
            Self::InvalidPriority { .. } => StatusCode::InvalidData,
            Self::Timeout { .. } => StatusCode::Timeout,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "queue".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        match self {
            Self::NotFound { kind, name }
            | Self::Underflow { kind, name }
            | Self::MissingPriority { kind, name, .. }
            | Self::InvalidPriority { kind, name, .. }
            | Self::Timeout { kind, name, .. } => {
                tags.push(("queue_kind", kind.clone()));
                tags.push(("queue_name", name.clone()));
            }
        }

        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_error_codes() {
        let nf = QueueError::NotFound {
            kind: "stack".to_string(),
            name: "jobs".to_string(),
        };
        assert!(nf.is_not_found());
        assert_eq!(nf.status_code(), StatusCode::QueueNotFound);
        assert_eq!(nf.to_string(), "stack 'jobs' does not exist");

        let uf = QueueError::Underflow {
            kind: "queue".to_string(),
            name: "default".to_string(),
        };
        assert!(uf.is_underflow());
        assert_eq!(uf.status_code(), StatusCode::QueueUnderflow);
    }

    #[test]
    fn test_queue_error_tags() {
        let err = QueueError::MissingPriority {
            kind: "priority_queue".to_string(),
            name: "alerts".to_string(),
            index: 2,
        };
        let tags = err.metrics_tags();
        assert!(tags.iter().any(|(k, v)| *k == "queue_name" && v == "alerts"));
        assert!(tags
            .iter()
            .any(|(k, v)| *k == "queue_kind" && v == "priority_queue"));
    }
}
