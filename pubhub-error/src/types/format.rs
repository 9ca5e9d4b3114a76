use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки рендеринга шаблона сообщения.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// В записи нет поля, на которое ссылается шаблон.
    #[error("template field '{field}' is missing from the message")]
    MissingField { field: String },

    /// Позиционная подстановка вне диапазона доступных значений.
    #[error("template position {index} is out of range ({available} value(s) available)")]
    PositionOutOfRange { index: usize, available: usize },

    /// Шаблон синтаксически некорректен.
    #[error("malformed template at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },
}

impl ErrorExt for FormatError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField { .. } | Self::PositionOutOfRange { .. } => {
                StatusCode::MissingField
            }
            Self::Malformed { .. } => StatusCode::InvalidTemplate,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_codes() {
        let missing = FormatError::MissingField {
            field: "user".to_string(),
        };
        assert_eq!(missing.status_code(), StatusCode::MissingField);
        assert!(missing.to_string().contains("'user'"));

        let malformed = FormatError::Malformed {
            offset: 3,
            reason: "unmatched '{'".to_string(),
        };
        assert_eq!(malformed.status_code(), StatusCode::InvalidTemplate);
    }
}
