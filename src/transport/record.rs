use std::{
    collections::VecDeque,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use parking_lot::Mutex;
use pubhub_error::TransportError;
use serde_json::{json, Value};
use tracing::info;

use super::{Envelope, Transport};

/// Транспорт, который записывает доставку в лог и хранит последние
/// конверты в памяти.
#[derive(Debug)]
pub struct RecordingTransport {
    name: String,
    capacity: usize,
    recent: Mutex<VecDeque<Envelope>>,
    total: AtomicU64,
}

impl RecordingTransport {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(
        name: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            name: name.into(),
            capacity: capacity.max(1),
            recent: Mutex::new(VecDeque::new()),
            total: AtomicU64::new(0),
        }
    }

    /// Последние записанные конверты, от старых к новым.
    pub fn deliveries(&self) -> Vec<Envelope> {
        self.recent.lock().iter().cloned().collect()
    }

    /// Сколько конвертов прошло через транспорт за всё время.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    fn record(
        &self,
        envelope: &Envelope,
    ) {
        info!(
            transport = %self.name,
            kind = %envelope.kind,
            strategy = %envelope.strategy_id,
            direction = %envelope.direction,
            payload = %envelope.payload,
            "delivery recorded"
        );

        self.total.fetch_add(1, Ordering::Relaxed);
        let mut recent = self.recent.lock();
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(envelope.clone());
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        envelope: &Envelope,
    ) -> Result<Value, TransportError> {
        self.record(envelope);
        Ok(json!({ "transport": self.name, "recorded": true }))
    }

    /// Читающие каналы ничего не получают: транспорт только фиксирует запрос.
    async fn receive(
        &self,
        envelope: &Envelope,
    ) -> Result<Value, TransportError> {
        self.record(envelope);
        Ok(json!({ "transport": self.name, "messages": [] }))
    }
}
