use std::{collections::BTreeMap, fmt, path::PathBuf, str::FromStr, sync::Arc};

use pubhub_error::{ConfigurationError, DeliveryFailure, UnsupportedOperationError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{DispatchContext, Message, Template};
use crate::{
    queue::{QueueKind, DEFAULT_QUEUE, PRIORITY_FIELD},
    transport::{Envelope, Transport, TransportSet},
};

////////////////////////////////////////////////////////////////////////////////
// Виды и направления
////////////////////////////////////////////////////////////////////////////////

/// Тег вида стратегии доставки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Http,
    Email,
    Sms,
    File,
    Sql,
    MessageQueue,
    Script,
}

/// Направление вызова стратегии.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Send,
    Receive,
}

/// Почтовый протокол: SMTP только отправляет, POP3 и IMAP только читают.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailProtocol {
    #[default]
    Smtp,
    Pop3,
    Imap,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 7] = [
        Self::Http,
        Self::Email,
        Self::Sms,
        Self::File,
        Self::Sql,
        Self::MessageQueue,
        Self::Script,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Email => "email",
            Self::Sms => "sms",
            Self::File => "file",
            Self::Sql => "sql",
            Self::MessageQueue => "message_queue",
            Self::Script => "script",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigurationError::InvalidStrategy {
                kind: s.to_string(),
                reason: "unknown strategy kind".to_string(),
            })
    }
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Receive => "receive",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EmailProtocol {
    pub const fn direction(self) -> Direction {
        match self {
            Self::Smtp => Direction::Send,
            Self::Pop3 | Self::Imap => Direction::Receive,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Конфигурации стратегий
////////////////////////////////////////////////////////////////////////////////

fn default_method() -> String {
    "POST".to_string()
}

fn default_folders() -> Vec<String> {
    vec!["INBOX".to_string()]
}

fn default_queue_name() -> String {
    DEFAULT_QUEUE.to_string()
}

/// Один HTTP-запрос; отрендеренное сообщение подставляется в поле `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    #[serde(default = "default_method")]
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub requests: Vec<HttpRequest>,
    #[serde(default)]
    pub message_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub protocol: EmailProtocol,
    pub host: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    /// Папки, из которых читают POP3/IMAP.
    #[serde(default = "default_folders")]
    pub folders: Vec<String>,
    #[serde(default)]
    pub message_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsConfig {
    #[serde(default)]
    pub from: Option<String>,
    pub to: String,
    #[serde(default)]
    pub message_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub message_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlConfig {
    pub dsn: String,
    pub table: String,
    #[serde(default)]
    pub message_format: Option<String>,
}

/// Стратегия, которая кладёт сообщение в контейнер менеджера очередей.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageQueueConfig {
    /// Литерал вида контейнера: `queue`, `stack` или `priority_queue`.
    pub queue_kind: String,
    #[serde(default = "default_queue_name")]
    pub queue_name: String,
    /// Приоритет события для `priority_queue`. Если не задан, берётся поле
    /// `priority` сообщения.
    #[serde(default)]
    pub priority: Option<f64>,
    #[serde(default)]
    pub message_format: Option<String>,
}

impl MessageQueueConfig {
    pub fn kind(&self) -> Result<QueueKind, ConfigurationError> {
        self.queue_kind.parse()
    }
}

/// Вызов функции из [`crate::transport::ScriptRegistry`] по имени `run_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptConfig {
    pub run_type: String,
    pub target: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub message_format: Option<String>,
}

/// Конфигурация стратегии доставки, помеченная видом.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    Http(HttpConfig),
    Email(EmailConfig),
    Sms(SmsConfig),
    File(FileConfig),
    Sql(SqlConfig),
    MessageQueue(MessageQueueConfig),
    Script(ScriptConfig),
}

impl StrategyConfig {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Http(_) => StrategyKind::Http,
            Self::Email(_) => StrategyKind::Email,
            Self::Sms(_) => StrategyKind::Sms,
            Self::File(_) => StrategyKind::File,
            Self::Sql(_) => StrategyKind::Sql,
            Self::MessageQueue(_) => StrategyKind::MessageQueue,
            Self::Script(_) => StrategyKind::Script,
        }
    }

    pub fn message_format(&self) -> Option<&str> {
        match self {
            Self::Http(c) => c.message_format.as_deref(),
            Self::Email(c) => c.message_format.as_deref(),
            Self::Sms(c) => c.message_format.as_deref(),
            Self::File(c) => c.message_format.as_deref(),
            Self::Sql(c) => c.message_format.as_deref(),
            Self::MessageQueue(c) => c.message_format.as_deref(),
            Self::Script(c) => c.message_format.as_deref(),
        }
    }

    /// Направление, в котором действует `process`.
    pub fn natural_direction(&self) -> Direction {
        match self {
            Self::Email(c) => c.protocol.direction(),
            _ => Direction::Send,
        }
    }

    pub fn supports(
        &self,
        direction: Direction,
    ) -> bool {
        match self {
            Self::Email(c) => c.protocol.direction() == direction,
            Self::Sms(_) => true,
            _ => direction == Direction::Send,
        }
    }

    /// Проверяет конфигурацию без учёта внешних реестров.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidStrategy {
            kind: self.kind().to_string(),
            reason: reason.to_string(),
        };

        match self {
            Self::Http(c) => {
                if c.requests.is_empty() {
                    return Err(invalid("at least one request is required"));
                }
                if c.requests.iter().any(|r| r.url.trim().is_empty()) {
                    return Err(invalid("every request needs a url"));
                }
            }
            Self::Email(c) => {
                if c.host.trim().is_empty() {
                    return Err(invalid("host is required"));
                }
                if c.protocol == EmailProtocol::Smtp {
                    if c.receiver.as_deref().map_or(true, |r| r.trim().is_empty()) {
                        return Err(invalid("smtp requires a receiver"));
                    }
                    if c.subject.is_none() {
                        return Err(invalid("smtp requires a subject"));
                    }
                } else if c.folders.is_empty() {
                    return Err(invalid("pop3/imap require at least one folder"));
                }
            }
            Self::Sms(c) => {
                if c.to.trim().is_empty() {
                    return Err(invalid("recipient number is required"));
                }
            }
            Self::File(c) => {
                if c.path.as_os_str().is_empty() {
                    return Err(invalid("path is required"));
                }
            }
            Self::Sql(c) => {
                if c.dsn.trim().is_empty() || c.table.trim().is_empty() {
                    return Err(invalid("dsn and table are required"));
                }
            }
            Self::MessageQueue(c) => {
                let kind = c.kind().map_err(|e| invalid(&e.to_string()))?;
                if c.queue_name.is_empty() {
                    return Err(invalid("queue_name must not be empty"));
                }
                if c.priority.is_some_and(f64::is_nan) {
                    return Err(invalid("priority must be a number"));
                }
                if c.priority.is_some() && kind != QueueKind::PriorityQueue {
                    return Err(invalid("priority is only valid for priority_queue"));
                }
            }
            Self::Script(c) => {
                if c.run_type.is_empty() || c.target.is_empty() {
                    return Err(invalid("run_type and target are required"));
                }
            }
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Стратегия доставки
////////////////////////////////////////////////////////////////////////////////

/// Идентификатор стратегии. Две стратегии с одинаковой конфигурацией
/// различаются по id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StrategyId(Uuid);

impl StrategyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StrategyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StrategyId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Проверенная стратегия доставки, связанная со своим транспортом.
///
/// Клонирование дешёвое: конфигурация и транспорт лежат за `Arc`, а клон
/// сохраняет тот же [`StrategyId`].
#[derive(Clone)]
pub struct DeliveryStrategy {
    id: StrategyId,
    config: Arc<StrategyConfig>,
    template: Option<Template>,
    transport: Arc<dyn Transport>,
}

impl DeliveryStrategy {
    /// Проверяет конфигурацию, разбирает шаблон и выбирает транспорт по
    /// виду стратегии.
    pub fn new(
        config: StrategyConfig,
        transports: &TransportSet,
    ) -> Result<Self, ConfigurationError> {
        if let StrategyConfig::Script(script) = &config {
            if !transports.scripts().contains(&script.run_type) {
                return Err(ConfigurationError::UnknownScript {
                    run_type: script.run_type.clone(),
                });
            }
        }
        let transport = transports.get(config.kind())?;
        Self::with_transport(config, transport)
    }

    /// То же, что [`DeliveryStrategy::new`], но с явным транспортом. Имя
    /// скрипта здесь не сверяется с реестром.
    pub fn with_transport(
        config: StrategyConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let template = config
            .message_format()
            .map(Template::parse)
            .transpose()
            .map_err(|e| ConfigurationError::InvalidStrategy {
                kind: config.kind().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            id: StrategyId::new(),
            config: Arc::new(config),
            template,
            transport,
        })
    }

    pub fn id(&self) -> StrategyId {
        self.id
    }

    pub fn kind(&self) -> StrategyKind {
        self.config.kind()
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// Обрабатывает сообщение в естественном для стратегии направлении.
    pub async fn process(
        &self,
        message: &Message,
        context: &DispatchContext,
    ) -> Result<Value, DeliveryFailure> {
        self.invoke(self.config.natural_direction(), message, context)
            .await
    }

    pub async fn send(
        &self,
        message: &Message,
        context: &DispatchContext,
    ) -> Result<Value, DeliveryFailure> {
        self.invoke(Direction::Send, message, context).await
    }

    pub async fn receive(
        &self,
        message: &Message,
        context: &DispatchContext,
    ) -> Result<Value, DeliveryFailure> {
        self.invoke(Direction::Receive, message, context).await
    }

    pub async fn invoke(
        &self,
        direction: Direction,
        message: &Message,
        context: &DispatchContext,
    ) -> Result<Value, DeliveryFailure> {
        if !self.config.supports(direction) {
            let err = UnsupportedOperationError::new(self.kind().as_str(), direction.as_str());
            return Err(err.into());
        }

        let envelope = Envelope {
            strategy_id: self.id,
            kind: self.kind(),
            direction,
            payload: self.payload(direction, message)?,
            context: context.clone(),
            config: self.config.clone(),
        };

        let result = match direction {
            Direction::Send => self.transport.send(&envelope).await,
            Direction::Receive => self.transport.receive(&envelope).await,
        };
        result.map_err(DeliveryFailure::from)
    }

    /// Тело отправки: отрендеренная строка или исходное значение.
    fn body(
        &self,
        message: &Message,
    ) -> Result<Value, DeliveryFailure> {
        match &self.template {
            Some(template) => Ok(Value::String(template.render(message)?)),
            None => Ok(message.value().clone()),
        }
    }

    fn payload(
        &self,
        direction: Direction,
        message: &Message,
    ) -> Result<Value, DeliveryFailure> {
        if direction == Direction::Receive {
            return Ok(match self.config.as_ref() {
                StrategyConfig::Email(c) => json!({
                    "protocol": c.protocol,
                    "host": c.host,
                    "user": c.user,
                    "folders": c.folders,
                }),
                StrategyConfig::Sms(c) => json!({ "from": c.from, "to": c.to }),
                _ => Value::Null,
            });
        }

        let body = self.body(message)?;
        let payload = match self.config.as_ref() {
            StrategyConfig::Http(c) => {
                let requests: Vec<Value> = c
                    .requests
                    .iter()
                    .map(|r| {
                        json!({
                            "method": r.method,
                            "url": r.url,
                            "headers": r.headers,
                            "data": body,
                        })
                    })
                    .collect();
                json!({ "requests": requests })
            }
            StrategyConfig::Email(c) => json!({
                "protocol": c.protocol,
                "host": c.host,
                "user": c.user,
                "receiver": c.receiver,
                "subject": c.subject,
                "body": body,
            }),
            StrategyConfig::Sms(c) => json!({ "from": c.from, "to": c.to, "body": body }),
            StrategyConfig::File(c) => json!({ "path": c.path, "body": body }),
            StrategyConfig::Sql(c) => json!({ "dsn": c.dsn, "table": c.table, "row": body }),
            StrategyConfig::MessageQueue(c) => json!({
                "queue_kind": c.queue_kind,
                "queue_name": c.queue_name,
                "priority": c.priority.or_else(|| message_priority(message)),
                "event": body,
            }),
            StrategyConfig::Script(c) => json!({
                "run_type": c.run_type,
                "target": c.target,
                "args": c.args,
                "message": body,
            }),
        };
        Ok(payload)
    }
}

/// Числовое поле `priority` исходного сообщения. Читается до рендеринга,
/// потому что шаблон превращает тело в строку.
fn message_priority(message: &Message) -> Option<f64> {
    message.value().get(PRIORITY_FIELD).and_then(Value::as_f64)
}

impl fmt::Debug for DeliveryStrategy {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("DeliveryStrategy")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("transport", &self.transport.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pubhub_error::FormatError;

    use super::*;
    use crate::transport::RecordingTransport;

    fn http(format: Option<&str>) -> StrategyConfig {
        StrategyConfig::Http(HttpConfig {
            requests: vec![
                HttpRequest {
                    method: "POST".to_string(),
                    url: "http://a.example/hook".to_string(),
                    headers: BTreeMap::new(),
                },
                HttpRequest {
                    method: "PUT".to_string(),
                    url: "http://b.example/hook".to_string(),
                    headers: BTreeMap::new(),
                },
            ],
            message_format: format.map(str::to_string),
        })
    }

    fn email(protocol: EmailProtocol) -> StrategyConfig {
        StrategyConfig::Email(EmailConfig {
            protocol,
            host: "mail.example".to_string(),
            user: Some("robot".to_string()),
            receiver: Some("ops@example.com".to_string()),
            subject: Some("alert".to_string()),
            folders: default_folders(),
            message_format: None,
        })
    }

    fn strategy(config: StrategyConfig) -> (DeliveryStrategy, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new("test"));
        let strategy = DeliveryStrategy::with_transport(config, transport.clone()).unwrap();
        (strategy, transport)
    }

    /// Тест проверяет разбор стратегии из конфигурации с тегом `kind`.
    #[test]
    fn test_strategy_config_serde() {
        let cfg: StrategyConfig = serde_json::from_value(json!({
            "kind": "email",
            "protocol": "imap",
            "host": "imap.example",
        }))
        .unwrap();
        assert_eq!(cfg.kind(), StrategyKind::Email);
        assert_eq!(cfg.natural_direction(), Direction::Receive);
        let StrategyConfig::Email(email) = &cfg else {
            panic!("expected email config");
        };
        assert_eq!(email.folders, vec!["INBOX".to_string()]);

        let cfg: StrategyConfig = serde_json::from_value(json!({
            "kind": "message_queue",
            "queue_kind": "stack",
        }))
        .unwrap();
        let StrategyConfig::MessageQueue(mq) = &cfg else {
            panic!("expected message_queue config");
        };
        assert_eq!(mq.queue_name, "default");
        assert_eq!(mq.kind().unwrap(), QueueKind::Stack);
    }

    /// Тест проверяет проверки конфигурации при создании стратегии.
    #[test]
    fn test_validation_failures() {
        let no_requests = StrategyConfig::Http(HttpConfig {
            requests: vec![],
            message_format: None,
        });
        assert!(matches!(
            no_requests.validate(),
            Err(ConfigurationError::InvalidStrategy { ref kind, .. }) if kind == "http"
        ));

        let mut smtp = email(EmailProtocol::Smtp);
        if let StrategyConfig::Email(c) = &mut smtp {
            c.receiver = None;
        }
        assert!(smtp.validate().is_err());

        let bad_queue = StrategyConfig::MessageQueue(MessageQueueConfig {
            queue_kind: "heap".to_string(),
            queue_name: "jobs".to_string(),
            priority: None,
            message_format: None,
        });
        let err = bad_queue.validate().unwrap_err();
        assert!(err.to_string().contains("heap"), "{err}");

        let bad_template = DeliveryStrategy::with_transport(
            http(Some("{unclosed")),
            Arc::new(RecordingTransport::new("test")),
        );
        assert!(matches!(
            bad_template,
            Err(ConfigurationError::InvalidStrategy { .. })
        ));
    }

    /// Тест проверяет, что неизвестный `run_type` отклоняется реестром.
    #[test]
    fn test_unknown_script_rejected() {
        let cfg = StrategyConfig::Script(ScriptConfig {
            run_type: "run_module".to_string(),
            target: "reports.daily".to_string(),
            args: vec![],
            message_format: None,
        });
        let err = DeliveryStrategy::new(cfg, &TransportSet::recording()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownScript {
                run_type: "run_module".to_string()
            }
        );
    }

    /// Тест проверяет, что приоритет для `message_queue` берётся из
    /// исходного сообщения до рендеринга, а явный приоритет важнее.
    #[tokio::test]
    async fn test_message_queue_payload_priority() {
        let config = |priority: Option<f64>| {
            StrategyConfig::MessageQueue(MessageQueueConfig {
                queue_kind: "priority_queue".to_string(),
                queue_name: "jobs".to_string(),
                priority,
                message_format: Some("job {id}".to_string()),
            })
        };
        let msg = Message::new(json!({"id": 1, "priority": 3}));
        let ctx = DispatchContext::new();

        let (from_message, transport) = strategy(config(None));
        from_message.process(&msg, &ctx).await.unwrap();
        let (explicit, explicit_transport) = strategy(config(Some(0.5)));
        explicit.process(&msg, &ctx).await.unwrap();

        let payload = &transport.deliveries()[0].payload;
        assert_eq!(payload["event"], json!("job 1"));
        assert_eq!(payload["priority"], json!(3.0));
        assert_eq!(explicit_transport.deliveries()[0].payload["priority"], json!(0.5));
    }

    /// Тест проверяет, что HTTP-стратегия подставляет отрендеренное
    /// сообщение в `data` каждого запроса.
    #[tokio::test]
    async fn test_http_injects_rendered_data() {
        let (s, transport) = strategy(http(Some("order {id}")));
        s.process(&Message::new(json!({"id": 5})), &DispatchContext::new())
            .await
            .unwrap();

        let sent = transport.deliveries();
        assert_eq!(sent.len(), 1);
        let requests = sent[0].payload["requests"].as_array().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r["data"] == json!("order 5")));
        assert_eq!(requests[1]["method"], json!("PUT"));
    }

    /// Тест проверяет ошибку рендеринга на отсутствующем поле.
    #[tokio::test]
    async fn test_format_failure_surfaces() {
        let (s, transport) = strategy(http(Some("{missing}")));
        let err = s
            .process(&Message::new(json!({"id": 5})), &DispatchContext::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DeliveryFailure::Format(FormatError::MissingField {
                field: "missing".to_string()
            })
        );
        assert!(transport.deliveries().is_empty());
    }

    /// Тест проверяет ограничения направлений для почтовых протоколов.
    #[tokio::test]
    async fn test_email_direction_restrictions() {
        let msg = Message::from("hello");
        let ctx = DispatchContext::new();

        let (smtp, _) = strategy(email(EmailProtocol::Smtp));
        assert!(smtp.send(&msg, &ctx).await.is_ok());
        assert_eq!(
            smtp.receive(&msg, &ctx).await.unwrap_err(),
            DeliveryFailure::Unsupported(UnsupportedOperationError::new("email", "receive"))
        );

        let (imap, transport) = strategy(email(EmailProtocol::Imap));
        assert_eq!(
            imap.send(&msg, &ctx).await.unwrap_err(),
            DeliveryFailure::Unsupported(UnsupportedOperationError::new("email", "send"))
        );
        imap.process(&msg, &ctx).await.unwrap();
        let received = transport.deliveries();
        assert_eq!(received[0].direction, Direction::Receive);
        assert_eq!(received[0].payload["folders"], json!(["INBOX"]));
    }

    /// Тест проверяет, что одинаковые конфигурации дают разные стратегии.
    #[test]
    fn test_identity_is_generated() {
        let (a, _) = strategy(http(None));
        let (b, _) = strategy(http(None));
        assert_ne!(a.id(), b.id());
        assert_eq!(a.config(), b.config());
        assert_eq!(a.clone().id(), a.id());
    }

    /// Тест проверяет разбор имени вида стратегии.
    #[test]
    fn test_kind_from_str() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.as_str().parse::<StrategyKind>().unwrap(), kind);
        }
        assert!("pigeon".parse::<StrategyKind>().is_err());
    }
}
