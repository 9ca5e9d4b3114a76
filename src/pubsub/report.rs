use std::time::Duration;

use pubhub_error::{DeliveryError, PublishError};
use serde_json::Value;

use super::{StrategyId, StrategyKind};

/// Результат одного вызова стратегии.
#[derive(Debug, Clone)]
pub struct DeliveryRecord {
    pub subscriber: String,
    pub kind: StrategyKind,
    pub strategy_id: StrategyId,
    pub elapsed: Duration,
    pub outcome: Result<Value, DeliveryError>,
}

impl DeliveryRecord {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&DeliveryError> {
        self.outcome.as_ref().err()
    }
}

/// Итог рассылки одного подписчика. Записи идут в порядке привязки
/// стратегий.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub subscriber: String,
    pub records: Vec<DeliveryRecord>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.records.len()
    }

    pub fn delivered(&self) -> usize {
        self.records.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeliveryError> {
        self.records.iter().filter_map(DeliveryRecord::error)
    }

    pub fn is_success(&self) -> bool {
        self.records.iter().all(DeliveryRecord::is_ok)
    }
}

/// Итог публикации в топик после полного fan-out.
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub topic: String,
    /// Размер снимка подписчиков.
    pub subscribers: usize,
    pub records: Vec<DeliveryRecord>,
    pub elapsed: Duration,
}

impl PublishReport {
    pub fn attempted(&self) -> usize {
        self.records.len()
    }

    pub fn delivered(&self) -> usize {
        self.records.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeliveryError> {
        self.records.iter().filter_map(DeliveryRecord::error)
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.records.iter().all(DeliveryRecord::is_ok)
    }

    /// Записи одного подписчика.
    pub fn for_subscriber<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a DeliveryRecord> + 'a {
        self.records.iter().filter(move |r| r.subscriber == name)
    }

    /// Превращает отчёт со сбоями в [`PublishError`].
    pub fn into_result(self) -> Result<Self, PublishError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(PublishError {
            topic: self.topic.clone(),
            attempted: self.attempted(),
            failures: self.failures().cloned().collect(),
        })
    }
}
