use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, FormatError, QueueError, StatusCode};

/// Стратегия вызвана в направлении, которое она не поддерживает
/// (например, отправка через канал только для чтения).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} strategy does not support '{capability}'")]
pub struct UnsupportedOperationError {
    pub kind: String,
    pub capability: String,
}

impl UnsupportedOperationError {
    pub fn new(
        kind: impl Into<String>,
        capability: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            capability: capability.into(),
        }
    }
}

impl ErrorExt for UnsupportedOperationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::Unsupported
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Стратегия не уложилась в отведённое время.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} strategy timed out after {limit_ms} ms")]
pub struct TimeoutError {
    pub kind: String,
    pub limit_ms: u64,
}

impl ErrorExt for TimeoutError {
    fn status_code(&self) -> StatusCode {
        StatusCode::Timeout
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Ошибка, которую возвращает внешний транспорт.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Транспорт не смог выполнить запрос.
    #[error("transport failed: {reason}")]
    Failed { reason: String },

    /// Транспорт не поддерживает запрошенное направление.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedOperationError),

    /// Менеджер очередей отклонил событие.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl TransportError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

/// Причина неудачной доставки одной стратегией.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryFailure {
    #[error("{reason}")]
    Transport { reason: String },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedOperationError),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Обработчик запаниковал.
    #[error("handler panicked: {reason}")]
    Panicked { reason: String },

    /// Вызов был отменён до завершения.
    #[error("delivery was cancelled")]
    Cancelled,
}

impl From<TransportError> for DeliveryFailure {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Failed { reason } => Self::Transport { reason },
            TransportError::Unsupported(e) => Self::Unsupported(e),
            TransportError::Queue(e) => Self::Queue(e),
        }
    }
}

/// Ошибка доставки, привязанная к подписчику и стратегии, которая её
/// вызвала. Не прерывает соседние доставки.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("delivery to '{subscriber}' via {kind} failed: {failure}")]
pub struct DeliveryError {
    pub subscriber: String,
    pub kind: String,
    pub strategy_id: String,
    #[source]
    pub failure: DeliveryFailure,
}

impl DeliveryError {
    pub fn is_timeout(&self) -> bool {
        matches!(self.failure, DeliveryFailure::Timeout(_))
    }
}

impl ErrorExt for DeliveryError {
    fn status_code(&self) -> StatusCode {
        match &self.failure {
            DeliveryFailure::Transport { .. } => StatusCode::DeliveryFailed,
            DeliveryFailure::Format(e) => e.status_code(),
            DeliveryFailure::Unsupported(e) => e.status_code(),
            DeliveryFailure::Timeout(e) => e.status_code(),
            DeliveryFailure::Queue(e) => e.status_code(),
            DeliveryFailure::Panicked { .. } => StatusCode::HandlerPanicked,
            DeliveryFailure::Cancelled => StatusCode::DeliveryFailed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("error_type", "delivery".to_string()),
            ("status_code", self.status_code().to_string()),
            ("subscriber", self.subscriber.clone()),
            ("strategy_kind", self.kind.clone()),
        ]
    }
}

/// Сводная ошибка публикации: все сбои, собранные после полного fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("publish to '{topic}' failed for {} of {attempted} deliveries", .failures.len())]
pub struct PublishError {
    pub topic: String,
    pub attempted: usize,
    pub failures: Vec<DeliveryError>,
}

impl ErrorExt for PublishError {
    fn status_code(&self) -> StatusCode {
        StatusCode::PartialDelivery
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        format!(
            "{} of {} deliveries failed",
            self.failures.len(),
            self.attempted
        )
    }
}
