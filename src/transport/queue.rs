use std::sync::Arc;

use async_trait::async_trait;
use pubhub_error::TransportError;
use serde_json::{json, Value};

use super::{Envelope, Transport};
use crate::{
    pubsub::StrategyConfig,
    queue::{Event, QueueManager},
};

/// Транспорт стратегий `message_queue`: отправка кладёт событие в
/// контейнер менеджера очередей.
#[derive(Debug, Clone)]
pub struct QueueTransport {
    queues: Arc<QueueManager>,
}

impl QueueTransport {
    pub fn new(queues: Arc<QueueManager>) -> Self {
        Self { queues }
    }

    pub fn queues(&self) -> &Arc<QueueManager> {
        &self.queues
    }
}

#[async_trait]
impl Transport for QueueTransport {
    fn name(&self) -> &str {
        "queue"
    }

    async fn send(
        &self,
        envelope: &Envelope,
    ) -> Result<Value, TransportError> {
        let StrategyConfig::MessageQueue(config) = envelope.config.as_ref() else {
            return Err(TransportError::failed(format!(
                "queue transport cannot deliver {} strategies",
                envelope.kind
            )));
        };
        let kind = config
            .kind()
            .map_err(|e| TransportError::failed(e.to_string()))?;

        let body = envelope.payload.get("event").cloned().unwrap_or(Value::Null);
        // Приоритет уже вычислен стратегией до рендеринга шаблона.
        let priority = envelope
            .payload
            .get("priority")
            .and_then(Value::as_f64)
            .or(config.priority);
        let event = match priority {
            Some(priority) => Event::with_priority(body, priority),
            None => Event::new(body),
        };

        let len = self
            .queues
            .enqueue(kind, &config.queue_name, vec![event])?;

        Ok(json!({
            "queue_kind": kind,
            "queue_name": config.queue_name,
            "len": len,
        }))
    }
}
