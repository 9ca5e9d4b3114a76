use std::sync::Arc;

use dashmap::DashMap;
use pubhub_error::ConfigurationError;
use tracing::debug;

use super::{DispatchContext, DispatchPolicy, Message, PublishReport, StrategyKind, Subscriber, Topic};

/// Имя топика, который есть в любом реестре.
pub const DEFAULT_TOPIC: &str = "default";

/// Реестр именованных топиков с ленивым созданием.
///
/// Любое имя, в которое публиковали, на которое подписывались или от
/// которого отписывались, после вызова присутствует в реестре.
#[derive(Debug)]
pub struct TopicRegistry {
    topics: DashMap<Arc<str>, Arc<Topic>>,
    policy: DispatchPolicy,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::with_policy(DispatchPolicy::default())
    }

    pub fn with_policy(policy: DispatchPolicy) -> Self {
        let topics = DashMap::new();
        topics.insert(
            Arc::from(DEFAULT_TOPIC),
            Arc::new(Topic::new(DEFAULT_TOPIC)),
        );
        Self { topics, policy }
    }

    pub fn policy(&self) -> &DispatchPolicy {
        &self.policy
    }

    /// Возвращает топик, создавая пустой при отсутствии.
    pub fn ensure(
        &self,
        name: &str,
    ) -> Arc<Topic> {
        if let Some(topic) = self.topics.get(name) {
            return topic.value().clone();
        }
        self.topics
            .entry(Arc::from(name))
            .or_insert_with(|| {
                debug!(topic = name, "creating topic");
                Arc::new(Topic::new(name))
            })
            .clone()
    }

    /// Строгий поиск без ленивого создания.
    pub fn get(
        &self,
        name: &str,
    ) -> Result<Arc<Topic>, ConfigurationError> {
        self.topics
            .get(name)
            .map(|topic| topic.value().clone())
            .ok_or_else(|| ConfigurationError::UnknownTopic {
                name: name.to_string(),
            })
    }

    /// Создаёт топик с начальным набором подписчиков. Если топик уже
    /// есть, ничего не меняет и возвращает существующий.
    pub fn add_topic(
        &self,
        name: &str,
        subscribers: impl IntoIterator<Item = Arc<Subscriber>>,
    ) -> Arc<Topic> {
        self.topics
            .entry(Arc::from(name))
            .or_insert_with(|| {
                let topic = Topic::with_subscribers(name, subscribers);
                debug!(topic = name, subscribers = topic.len(), "topic added");
                Arc::new(topic)
            })
            .clone()
    }

    pub fn remove_topic(
        &self,
        name: &str,
    ) -> Option<Arc<Topic>> {
        let removed = self.topics.remove(name).map(|(_, topic)| topic);
        if removed.is_some() {
            debug!(topic = name, "topic removed");
        }
        removed
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.topics.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Отсортированные имена топиков.
    pub fn topic_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.topics.iter().map(|e| e.key().to_string()).collect();
        names.sort();
        names
    }

    pub fn subscribe(
        &self,
        name: &str,
        subscriber: Arc<Subscriber>,
    ) -> bool {
        self.ensure(name).subscribe(subscriber)
    }

    pub fn unsubscribe(
        &self,
        name: &str,
        subscriber: &Subscriber,
    ) -> bool {
        self.ensure(name).unsubscribe(subscriber)
    }

    pub async fn publish(
        &self,
        name: &str,
        message: impl Into<Message>,
        context: DispatchContext,
    ) -> PublishReport {
        self.ensure(name)
            .publish(message.into(), None, context, &self.policy)
            .await
    }

    /// Публикация только в стратегии перечисленных видов.
    pub async fn publish_selected(
        &self,
        name: &str,
        message: impl Into<Message>,
        kinds: &[StrategyKind],
        context: DispatchContext,
    ) -> PublishReport {
        self.ensure(name)
            .publish(message.into(), Some(kinds), context, &self.policy)
            .await
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new()
    }
}
