//! Именованный pub/sub: топики, подписчики и стратегии доставки.
//!
//! - `message`: публикуемое сообщение и контекст вызова.
//! - `template`: шаблоны `message_format`.
//! - `strategy`: виды, конфигурации и сама стратегия доставки.
//! - `policy`: параметры исполнения (параллельность, таймаут).
//! - `dispatch` (приватный): исполнитель вызовов стратегий.
//! - `report`: отчёты о доставке.
//! - `subscriber`, `topic`, `registry`: подписчик, топик и реестр топиков.

mod dispatch;
pub mod message;
pub mod policy;
pub mod registry;
pub mod report;
pub mod strategy;
pub mod subscriber;
pub mod template;
pub mod topic;

pub use message::*;
pub use policy::*;
pub use registry::*;
pub use report::*;
pub use strategy::*;
pub use subscriber::*;
pub use template::*;
pub use topic::*;
