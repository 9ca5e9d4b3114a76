//! Транспорты: внешняя сторона стратегий доставки.
//!
//! Стратегия проверяет направление, рендерит сообщение и упаковывает его в
//! [`Envelope`]; дальше работает транспорт, выбранный по виду стратегии
//! из [`TransportSet`].

pub mod queue;
pub mod record;
pub mod script;

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use pubhub_error::{ConfigurationError, TransportError, UnsupportedOperationError};
use serde_json::Value;

pub use queue::*;
pub use record::*;
pub use script::*;

use crate::{
    pubsub::{Direction, DispatchContext, StrategyConfig, StrategyId, StrategyKind},
    queue::QueueManager,
};

/// Готовый к отправке вызов стратегии.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub strategy_id: StrategyId,
    pub kind: StrategyKind,
    pub direction: Direction,
    /// Тело, собранное стратегией (с уже отрендеренным сообщением).
    pub payload: Value,
    pub context: DispatchContext,
    pub config: Arc<StrategyConfig>,
}

/// Внешний исполнитель доставки.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    fn name(&self) -> &str;

    async fn send(
        &self,
        envelope: &Envelope,
    ) -> Result<Value, TransportError>;

    /// По умолчанию транспорт только отправляет.
    async fn receive(
        &self,
        envelope: &Envelope,
    ) -> Result<Value, TransportError> {
        Err(UnsupportedOperationError::new(envelope.kind.as_str(), "receive").into())
    }
}

/// Явное соответствие вида стратегии и транспорта.
#[derive(Clone, Default)]
pub struct TransportSet {
    transports: HashMap<StrategyKind, Arc<dyn Transport>>,
    scripts: ScriptRegistry,
}

impl TransportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Набор, где HTTP, Email, SMS, File и SQL записываются в лог через
    /// [`RecordingTransport`]. Очереди и скрипты подключаются отдельно.
    pub fn recording() -> Self {
        let recorder: Arc<dyn Transport> = Arc::new(RecordingTransport::new("recording"));
        let mut set = Self::new();
        for kind in [
            StrategyKind::Http,
            StrategyKind::Email,
            StrategyKind::Sms,
            StrategyKind::File,
            StrategyKind::Sql,
        ] {
            set.register(kind, recorder.clone());
        }
        set
    }

    pub fn register(
        &mut self,
        kind: StrategyKind,
        transport: Arc<dyn Transport>,
    ) -> Option<Arc<dyn Transport>> {
        self.transports.insert(kind, transport)
    }

    pub fn with(
        mut self,
        kind: StrategyKind,
        transport: Arc<dyn Transport>,
    ) -> Self {
        self.register(kind, transport);
        self
    }

    /// Подключает менеджер очередей к стратегиям `message_queue`.
    pub fn with_queue_manager(
        self,
        queues: Arc<QueueManager>,
    ) -> Self {
        self.with(StrategyKind::MessageQueue, Arc::new(QueueTransport::new(queues)))
    }

    /// Подключает реестр функций к стратегиям `script`.
    pub fn with_scripts(
        mut self,
        scripts: ScriptRegistry,
    ) -> Self {
        self.scripts = scripts.clone();
        self.with(StrategyKind::Script, Arc::new(ScriptRunner::new(scripts)))
    }

    pub fn get(
        &self,
        kind: StrategyKind,
    ) -> Result<Arc<dyn Transport>, ConfigurationError> {
        self.transports
            .get(&kind)
            .cloned()
            .ok_or_else(|| ConfigurationError::MissingTransport {
                kind: kind.to_string(),
            })
    }

    pub fn scripts(&self) -> &ScriptRegistry {
        &self.scripts
    }
}

impl fmt::Debug for TransportSet {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut kinds: Vec<_> = self.transports.keys().copied().collect();
        kinds.sort();
        f.debug_struct("TransportSet")
            .field("kinds", &kinds)
            .field("scripts", &self.scripts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет, что для незарегистрированного вида возвращается
    /// `MissingTransport`.
    #[test]
    fn test_missing_transport() {
        let set = TransportSet::recording();
        assert!(set.get(StrategyKind::Http).is_ok());
        let err = set.get(StrategyKind::MessageQueue).err().unwrap();
        assert_eq!(
            err,
            ConfigurationError::MissingTransport {
                kind: "message_queue".to_string()
            }
        );
    }

    /// Тест проверяет подключение очередей и скриптов.
    #[test]
    fn test_with_queue_manager_and_scripts() {
        let set = TransportSet::recording()
            .with_queue_manager(Arc::new(QueueManager::new()))
            .with_scripts(ScriptRegistry::builtin());
        assert_eq!(set.get(StrategyKind::MessageQueue).unwrap().name(), "queue");
        assert_eq!(set.get(StrategyKind::Script).unwrap().name(), "script");
        assert!(set.scripts().contains("echo"));
    }
}
