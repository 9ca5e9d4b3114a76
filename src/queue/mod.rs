//! Менеджер очередей: именованные упорядочивающие контейнеры.
//!
//! - `kind`: виды контейнеров и порядок приоритета.
//! - `event`: буферизуемое событие.
//! - `fifo`, `stack`, `priority`: реализации контейнеров.
//! - `container`: общий enum над контейнерами.
//! - `manager`: реестр `(вид, имя) -> контейнер` с ленивым созданием.

pub mod container;
pub mod event;
pub mod fifo;
pub mod kind;
pub mod manager;
pub mod priority;
pub mod stack;

pub use container::*;
pub use event::*;
pub use fifo::*;
pub use kind::*;
pub use manager::*;
pub use priority::*;
pub use stack::*;
