use std::{fmt, str::FromStr};

use pubhub_error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Вид упорядочивающего контейнера.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    /// FIFO: извлекается самый ранний элемент.
    Queue,
    /// LIFO: извлекается последний добавленный элемент.
    Stack,
    /// Извлекается элемент с наивысшим приоритетом.
    PriorityQueue,
}

/// Порядок извлечения в очереди с приоритетом.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityOrder {
    /// Первым выходит наименьший приоритет (min-heap).
    #[default]
    MinFirst,
    /// Первым выходит наибольший приоритет.
    MaxFirst,
}

impl QueueKind {
    pub const ALL: [QueueKind; 3] = [Self::Queue, Self::Stack, Self::PriorityQueue];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Stack => "stack",
            Self::PriorityQueue => "priority_queue",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queue" => Ok(Self::Queue),
            "stack" => Ok(Self::Stack),
            "priority_queue" => Ok(Self::PriorityQueue),
            other => Err(ConfigurationError::InvalidQueueKind {
                literal: other.to_string(),
            }),
        }
    }
}
