use std::sync::Arc;

use pubhub_error::ConfigurationError;
use tracing::info;

use crate::{
    config::{Settings, SubscriberSettings},
    pubsub::{DeliveryStrategy, Subscriber, TopicRegistry},
    queue::QueueManager,
    transport::{ScriptRegistry, TransportSet},
};

/// Реестр топиков, менеджер очередей и транспорты, собранные вместе.
#[derive(Debug)]
pub struct Hub {
    registry: Arc<TopicRegistry>,
    queues: Arc<QueueManager>,
    transports: TransportSet,
}

impl Hub {
    /// Собирает хаб из настроек: стратегии `message_queue` пишут в
    /// собственный менеджер очередей, `script` - в переданный реестр
    /// функций, остальные виды записываются в лог.
    pub fn from_settings(
        settings: &Settings,
        scripts: ScriptRegistry,
    ) -> Result<Self, ConfigurationError> {
        let queues = Arc::new(QueueManager::with_order(settings.queues.priority_order));
        let transports = TransportSet::recording()
            .with_queue_manager(queues.clone())
            .with_scripts(scripts);
        let registry = Arc::new(TopicRegistry::with_policy(settings.dispatch.policy()));

        let hub = Self {
            registry,
            queues,
            transports,
        };

        for topic in &settings.topics {
            let subscribers = topic
                .subscribers
                .iter()
                .map(|decl| hub.build_subscriber(decl).map(Arc::new))
                .collect::<Result<Vec<_>, _>>()?;
            let count = subscribers.len();
            let created = hub.registry.add_topic(&topic.name, subscribers);
            info!(
                topic = %topic.name,
                subscribers = created.len(),
                declared = count,
                "topic configured"
            );
        }

        Ok(hub)
    }

    /// Создаёт подписчика по объявлению, проверяя каждую стратегию.
    pub fn build_subscriber(
        &self,
        decl: &SubscriberSettings,
    ) -> Result<Subscriber, ConfigurationError> {
        let strategies = decl
            .strategies
            .iter()
            .cloned()
            .map(|config| DeliveryStrategy::new(config, &self.transports))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Subscriber::new(decl.name.as_str(), strategies))
    }

    pub fn registry(&self) -> &Arc<TopicRegistry> {
        &self.registry
    }

    pub fn queues(&self) -> &Arc<QueueManager> {
        &self.queues
    }

    pub fn transports(&self) -> &TransportSet {
        &self.transports
    }
}
