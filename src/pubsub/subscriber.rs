use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    dispatch::{self, Invocation},
    DeliveryStrategy, DispatchContext, DispatchPolicy, DispatchReport, Message, StrategyKind,
};

/// Идентификатор подписчика.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Именованный подписчик с упорядоченным набором стратегий доставки.
///
/// Равенство и хеш определяются только по [`SubscriberId`]: два
/// подписчика с одинаковым именем и стратегиями различны.
#[derive(Debug, Clone)]
pub struct Subscriber {
    id: SubscriberId,
    name: Arc<str>,
    strategies: Vec<DeliveryStrategy>,
}

impl Subscriber {
    pub fn new(
        name: impl Into<Arc<str>>,
        strategies: Vec<DeliveryStrategy>,
    ) -> Self {
        Self {
            id: SubscriberId::new(),
            name: name.into(),
            strategies,
        }
    }

    pub fn with_strategy(
        mut self,
        strategy: DeliveryStrategy,
    ) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategies(&self) -> &[DeliveryStrategy] {
        &self.strategies
    }

    /// Стратегии, которые будут вызваны: все при `selected == None`,
    /// иначе те, чей вид входит в `selected`. Порядок привязки сохраняется.
    pub fn select<'a>(
        &'a self,
        selected: Option<&'a [StrategyKind]>,
    ) -> impl Iterator<Item = &'a DeliveryStrategy> + 'a {
        self.strategies
            .iter()
            .filter(move |s| selected.map_or(true, |kinds| kinds.contains(&s.kind())))
    }

    pub(crate) fn invocations(
        &self,
        selected: Option<&[StrategyKind]>,
    ) -> Vec<Invocation> {
        self.select(selected)
            .map(|strategy| Invocation {
                subscriber: self.name.clone(),
                strategy: strategy.clone(),
            })
            .collect()
    }

    /// Передаёт сообщение выбранным стратегиям.
    ///
    /// Сбой одной стратегии не прерывает остальные; каждый сбой
    /// приписывается своей стратегии и этому подписчику.
    pub async fn dispatch(
        &self,
        message: Message,
        selected: Option<&[StrategyKind]>,
        context: DispatchContext,
        policy: &DispatchPolicy,
    ) -> DispatchReport {
        let records = dispatch::run(
            self.invocations(selected),
            Arc::new(message),
            Arc::new(context),
            policy,
        )
        .await;

        DispatchReport {
            subscriber: self.name.to_string(),
            records,
        }
    }
}

impl PartialEq for Subscriber {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.id == other.id
    }
}

impl Eq for Subscriber {}

impl Hash for Subscriber {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use pubhub_error::DeliveryFailure;
    use serde_json::json;

    use super::*;
    use crate::{
        pubsub::{EmailConfig, EmailProtocol, HttpConfig, HttpRequest, StrategyConfig},
        transport::RecordingTransport,
    };

    fn http(url: &str) -> StrategyConfig {
        StrategyConfig::Http(HttpConfig {
            requests: vec![HttpRequest {
                method: "POST".to_string(),
                url: url.to_string(),
                headers: Default::default(),
            }],
            message_format: None,
        })
    }

    fn smtp(format: Option<&str>) -> StrategyConfig {
        StrategyConfig::Email(EmailConfig {
            protocol: EmailProtocol::Smtp,
            host: "smtp.example".to_string(),
            user: None,
            receiver: Some("ops@example.com".to_string()),
            subject: Some("event".to_string()),
            folders: vec![],
            message_format: format.map(str::to_string),
        })
    }

    fn bind(
        config: StrategyConfig,
        transport: &Arc<RecordingTransport>,
    ) -> DeliveryStrategy {
        DeliveryStrategy::with_transport(config, transport.clone()).unwrap()
    }

    /// Тест проверяет выбор стратегий по пересечению видов.
    #[tokio::test]
    async fn test_dispatch_selected_kinds() {
        let transport = Arc::new(RecordingTransport::new("rec"));
        let sub = Subscriber::new(
            "ops",
            vec![bind(http("http://h/1"), &transport), bind(smtp(None), &transport)],
        );

        let report = sub
            .dispatch(
                Message::from("ping"),
                Some(&[StrategyKind::Email][..]),
                DispatchContext::new(),
                &DispatchPolicy::default(),
            )
            .await;

        assert_eq!(report.attempted(), 1);
        assert_eq!(report.records[0].kind, StrategyKind::Email);
        let sent = transport.deliveries();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, StrategyKind::Email);

        assert_eq!(sub.select(None).count(), 2);
        assert_eq!(sub.select(Some(&[StrategyKind::Sms][..])).count(), 0);
    }

    /// Тест проверяет, что сбой первой стратегии не мешает второй.
    #[tokio::test]
    async fn test_first_failure_does_not_stop_second() {
        let transport = Arc::new(RecordingTransport::new("rec"));
        let sub = Subscriber::new("billing", vec![])
            .with_strategy(bind(smtp(Some("{absent}")), &transport))
            .with_strategy(bind(http("http://h/2"), &transport));

        let report = sub
            .dispatch(
                Message::new(json!({"id": 1})),
                None,
                DispatchContext::new(),
                &DispatchPolicy::sequential(),
            )
            .await;

        assert_eq!(report.attempted(), 2);
        assert_eq!(report.delivered(), 1);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].subscriber, "billing");
        assert_eq!(failures[0].kind, "email");
        assert!(matches!(failures[0].failure, DeliveryFailure::Format(_)));
        assert_eq!(transport.deliveries()[0].kind, StrategyKind::Http);
    }

    /// Тест проверяет, что равенство подписчиков определяется id.
    #[test]
    fn test_identity_by_id() {
        let a = Subscriber::new("same", vec![]);
        let b = Subscriber::new("same", vec![]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
