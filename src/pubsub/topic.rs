use std::{collections::HashMap, sync::Arc, time::Instant};

use parking_lot::RwLock;
use tracing::{debug, info};

use super::{
    dispatch, DispatchContext, DispatchPolicy, Message, PublishReport, StrategyKind, Subscriber,
    SubscriberId,
};

/// Топик: неупорядоченное множество подписчиков без повторов.
#[derive(Debug)]
pub struct Topic {
    name: Arc<str>,
    subscribers: RwLock<HashMap<SubscriberId, Arc<Subscriber>>>,
}

impl Topic {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_subscribers(
        name: impl Into<Arc<str>>,
        subscribers: impl IntoIterator<Item = Arc<Subscriber>>,
    ) -> Self {
        let subscribers = subscribers.into_iter().map(|s| (s.id(), s)).collect();
        Self {
            name: name.into(),
            subscribers: RwLock::new(subscribers),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Добавляет подписчика. Возвращает `false`, если он уже был.
    pub fn subscribe(
        &self,
        subscriber: Arc<Subscriber>,
    ) -> bool {
        let id = subscriber.id();
        let name = subscriber.name().to_string();
        let added = {
            let mut subs = self.subscribers.write();
            if subs.contains_key(&id) {
                false
            } else {
                subs.insert(id, subscriber);
                true
            }
        };
        if added {
            info!(topic = %self.name, subscriber = %name, "subscribed");
        }
        added
    }

    /// Удаляет подписчика. Отсутствующий подписчик - не ошибка.
    pub fn unsubscribe(
        &self,
        subscriber: &Subscriber,
    ) -> bool {
        let removed = self.subscribers.write().remove(&subscriber.id()).is_some();
        if removed {
            info!(topic = %self.name, subscriber = %subscriber.name(), "unsubscribed");
        }
        removed
    }

    pub fn contains(
        &self,
        id: SubscriberId,
    ) -> bool {
        self.subscribers.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.read().is_empty()
    }

    /// Снимок текущего множества подписчиков.
    pub fn subscribers(&self) -> Vec<Arc<Subscriber>> {
        self.subscribers.read().values().cloned().collect()
    }

    /// Рассылает сообщение всем подписчикам из снимка.
    ///
    /// Снимок берётся под блокировкой, которая отпускается до первого
    /// вызова стратегии: подписчик, удалённый после снимка, получит эту
    /// публикацию, но не последующие. Сбои собираются в отчёт после
    /// завершения всего fan-out.
    pub async fn publish(
        &self,
        message: Message,
        selected: Option<&[StrategyKind]>,
        context: DispatchContext,
        policy: &DispatchPolicy,
    ) -> PublishReport {
        let started = Instant::now();
        let snapshot = self.subscribers();

        let invocations = snapshot
            .iter()
            .flat_map(|subscriber| subscriber.invocations(selected))
            .collect();
        let records = dispatch::run(invocations, Arc::new(message), Arc::new(context), policy).await;

        let report = PublishReport {
            topic: self.name.to_string(),
            subscribers: snapshot.len(),
            records,
            elapsed: started.elapsed(),
        };

        debug!(
            topic = %self.name,
            subscribers = report.subscribers,
            attempted = report.attempted(),
            failed = report.failure_count(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "published"
        );
        report
    }
}
