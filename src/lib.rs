/// Загрузка настроек приложения.
pub mod config;
/// Хаб: реестр топиков, очереди и транспорты вместе.
pub mod hub;
/// Логирование (форматы, фильтры, консоль и файл).
pub mod logging;
/// Именованный pub/sub: топики, подписчики, стратегии доставки.
pub mod pubsub;
/// Менеджер очередей и упорядочивающие контейнеры.
pub mod queue;
/// Транспорты стратегий доставки.
pub mod transport;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

pub use hub::Hub;
pub use logging::{init_logging, LoggingConfig, LoggingHandle};
/// Ошибки всех уровней.
pub use pubhub_error::{
    ConfigurationError, DeliveryError, DeliveryFailure, ErrorExt, FormatError, PublishError,
    QueueError, StatusCode, TimeoutError, TransportError, UnsupportedOperationError,
};
/// Pub/Sub API.
pub use pubsub::{
    DeliveryStrategy, DispatchContext, DispatchPolicy, Message, PublishReport, StrategyConfig,
    StrategyKind, Subscriber, Topic, TopicRegistry, DEFAULT_TOPIC,
};
/// Queue Manager API.
pub use queue::{Event, PriorityOrder, QueueKind, QueueManager, DEFAULT_QUEUE};
/// Транспорты.
pub use transport::{Envelope, RecordingTransport, ScriptRegistry, Transport, TransportSet};
