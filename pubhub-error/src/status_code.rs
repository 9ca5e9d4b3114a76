use std::fmt;

use num_enum::TryFromPrimitive;

/// Коды статуса для категоризации ошибок.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки данных и шаблонов
/// - 3xxx: Конфигурация
/// - 4xxx: Доставка сообщений
/// - 5xxx: Очереди
///
/// `num_enum::TryFromPrimitive` даёт нативную реализацию `TryFrom<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Unknown = 1000,
    Unsupported = 1001,
    Unexpected = 1002,
    Internal = 1003,
    InvalidArgs = 1004,

    // === 2xxx: Ошибки данных ===
    NotFound = 2000,
    InvalidData = 2001,
    MissingField = 2002,
    InvalidTemplate = 2003,

    // === 3xxx: Конфигурация ===
    InvalidConfig = 3000,
    UnknownTopic = 3001,
    InvalidQueueKind = 3002,
    UnknownScript = 3003,
    MissingTransport = 3004,

    // === 4xxx: Доставка ===
    DeliveryFailed = 4000,
    Timeout = 4001,
    PartialDelivery = 4002,
    HandlerPanicked = 4003,

    // === 5xxx: Очереди ===
    QueueNotFound = 5000,
    QueueUnderflow = 5001,
    MissingPriority = 5002,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Пытается получить вариант `StatusCode` из `u32`.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Возвращает `true`, если операцию с этим кодом имеет смысл повторить.
    ///
    /// Повтор доставки имеет смысл только для временных сбоев транспорта.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::DeliveryFailed | Self::PartialDelivery | Self::QueueUnderflow
        )
    }

    /// Вернёт `true`, если переданный `code` означает успешный результат.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// Ошибка вызвана данными или конфигурацией вызывающей стороны
    /// (диапазоны `2xxx..3xxx` и `InvalidArgs`).
    pub fn is_client_error(&self) -> bool {
        let c = self.code();
        if (2000..=3999).contains(&c) {
            return true;
        }
        matches!(self, Self::InvalidArgs)
    }

    /// Ошибка доставки сообщения (диапазон 4xxx).
    pub fn is_delivery_error(&self) -> bool {
        (4000..=4999).contains(&self.code())
    }

    /// Рекомендуемый уровень логирования для данного кода.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::NotFound | Self::QueueNotFound | Self::QueueUnderflow => LogLevel::Debug,
            Self::InvalidArgs
            | Self::InvalidData
            | Self::MissingField
            | Self::InvalidTemplate
            | Self::MissingPriority => LogLevel::Info,
            Self::Timeout | Self::DeliveryFailed | Self::PartialDelivery => LogLevel::Warn,
            Self::Internal | Self::HandlerPanicked | Self::Unexpected => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
