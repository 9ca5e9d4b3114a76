use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use parking_lot::Mutex;
use pubhub_error::QueueError;
use tokio::sync::Notify;
use tracing::{debug, trace};

use super::{Container, Event, PriorityDefect, PriorityOrder, QueueKind};

/// Имя контейнера, который создаётся для каждого вида при инициализации.
pub const DEFAULT_QUEUE: &str = "default";

type SlotKey = (QueueKind, Arc<str>);

/// Контейнер вместе с уведомлением для ожидающих потребителей.
#[derive(Debug)]
struct QueueSlot {
    container: Mutex<Container>,
    notify: Notify,
}

impl QueueSlot {
    fn new(
        kind: QueueKind,
        order: PriorityOrder,
    ) -> Self {
        Self {
            container: Mutex::new(Container::new(kind, order)),
            notify: Notify::new(),
        }
    }
}

/// Менеджер именованных упорядочивающих контейнеров.
///
/// Ключ - пара `(вид, имя)`. Каждый контейнер защищён собственным
/// мьютексом, поэтому операции над разными именами не блокируют друг
/// друга. Любая операция выполняется одной критической секцией: пачка
/// событий либо вставляется целиком, либо не вставляется вовсе.
#[derive(Debug)]
pub struct QueueManager {
    slots: DashMap<SlotKey, Arc<QueueSlot>>,
    order: PriorityOrder,
}

impl QueueManager {
    /// Создаёт менеджер с порядком приоритета по умолчанию (`MinFirst`).
    pub fn new() -> Self {
        Self::with_order(PriorityOrder::default())
    }

    /// Создаёт менеджер с заданным порядком для очередей с приоритетом и
    /// контейнером `"default"` каждого вида.
    pub fn with_order(order: PriorityOrder) -> Self {
        let slots = DashMap::new();
        for kind in QueueKind::ALL {
            slots.insert(
                (kind, Arc::from(DEFAULT_QUEUE)),
                Arc::new(QueueSlot::new(kind, order)),
            );
        }
        Self { slots, order }
    }

    pub fn order(&self) -> PriorityOrder {
        self.order
    }

    /// Добавляет события в контейнер `(kind, name)`, создавая его при
    /// необходимости. Возвращает длину контейнера после вставки.
    ///
    /// Для очереди с приоритетом все события проверяются до вставки:
    /// событие без приоритета даёт [`QueueError::MissingPriority`],
    /// приоритет `NaN` даёт [`QueueError::InvalidPriority`], и контейнер
    /// остаётся нетронутым (и не создаётся, если его не было).
    ///
    /// Вставка идёт под guard'ом записи карты, поэтому параллельный
    /// [`QueueManager::remove`] видит пачку либо целиком, либо не видит.
    pub fn enqueue(
        &self,
        kind: QueueKind,
        name: &str,
        events: Vec<Event>,
    ) -> Result<usize, QueueError> {
        if let Some((index, defect)) = Container::first_priority_defect(kind, &events) {
            let (kind, name) = (kind.to_string(), name.to_string());
            return Err(match defect {
                PriorityDefect::Missing => QueueError::MissingPriority { kind, name, index },
                PriorityDefect::NotANumber => QueueError::InvalidPriority { kind, name, index },
            });
        }

        let added = events.len();
        let (slot, len) = {
            let entry = self
                .slots
                .entry((kind, Arc::from(name)))
                .or_insert_with(|| {
                    debug!(%kind, queue = name, "creating container");
                    Arc::new(QueueSlot::new(kind, self.order))
                });
            let mut container = entry.container.lock();
            container.push_all(events);
            let len = container.len();
            drop(container);
            (entry.value().clone(), len)
        };
        if added > 0 {
            slot.notify.notify_waiters();
        }

        trace!(%kind, queue = name, added, len, "enqueued");
        Ok(len)
    }

    /// Извлекает следующее событие согласно порядку контейнера.
    pub fn dequeue(
        &self,
        kind: QueueKind,
        name: &str,
    ) -> Result<Event, QueueError> {
        self.with_slot(kind, name, |slot| slot.container.lock().pop())?
            .ok_or_else(|| QueueError::Underflow {
                kind: kind.to_string(),
                name: name.to_string(),
            })
    }

    /// Ждёт событие не дольше `limit`.
    ///
    /// Контейнер должен существовать к моменту вызова; если его удалят во
    /// время ожидания, вернётся [`QueueError::NotFound`]. Отмена future
    /// безопасна: событие извлекается только в момент возврата.
    pub async fn dequeue_timeout(
        &self,
        kind: QueueKind,
        name: &str,
        limit: Duration,
    ) -> Result<Event, QueueError> {
        let slot = self.with_slot(kind, name, |slot| slot.clone())?;

        let wait = async {
            loop {
                let notified = slot.notify.notified();
                tokio::pin!(notified);
                // Подписываемся до проверки, чтобы не потерять уведомление
                // между `pop` и `await`.
                notified.as_mut().enable();

                // `None` снаружи: под тем же именем уже другой контейнер.
                let popped = self.with_slot(kind, name, |current| {
                    Arc::ptr_eq(current, &slot).then(|| current.container.lock().pop())
                });
                match popped {
                    Ok(Some(Some(event))) => return Ok(event),
                    Ok(Some(None)) => {}
                    Ok(None) | Err(_) => {
                        return Err(QueueError::NotFound {
                            kind: kind.to_string(),
                            name: name.to_string(),
                        })
                    }
                }
                notified.await;
            }
        };

        tokio::time::timeout(limit, wait)
            .await
            .map_err(|_| QueueError::Timeout {
                kind: kind.to_string(),
                name: name.to_string(),
                limit_ms: limit.as_millis() as u64,
            })?
    }

    /// Копия следующего события без извлечения.
    pub fn peek(
        &self,
        kind: QueueKind,
        name: &str,
    ) -> Result<Option<Event>, QueueError> {
        self.with_slot(kind, name, |slot| slot.container.lock().peek().cloned())
    }

    pub fn len(
        &self,
        kind: QueueKind,
        name: &str,
    ) -> Result<usize, QueueError> {
        self.with_slot(kind, name, |slot| slot.container.lock().len())
    }

    pub fn contains(
        &self,
        kind: QueueKind,
        name: &str,
    ) -> bool {
        self.slots.contains_key(&(kind, Arc::from(name)))
    }

    /// Отсортированные имена контейнеров заданного вида.
    pub fn names(
        &self,
        kind: QueueKind,
    ) -> Vec<String> {
        let mut names: Vec<String> = self
            .slots
            .iter()
            .filter(|entry| entry.key().0 == kind)
            .map(|entry| entry.key().1.to_string())
            .collect();
        names.sort();
        names
    }

    /// Удаляет контейнер вместе с содержимым. Возвращает число событий,
    /// которые в нём оставались, или `None`, если контейнера не было.
    /// Ожидающие `dequeue_timeout` получают [`QueueError::NotFound`].
    pub fn remove(
        &self,
        kind: QueueKind,
        name: &str,
    ) -> Option<usize> {
        let (_, slot) = self.slots.remove(&(kind, Arc::from(name)))?;
        let dropped = slot.container.lock().len();
        slot.notify.notify_waiters();
        debug!(%kind, queue = name, dropped, "container removed");
        Some(dropped)
    }

    /// Выполняет `f` над контейнером, удерживая guard чтения карты:
    /// пока `f` работает, контейнер не может быть удалён.
    fn with_slot<R>(
        &self,
        kind: QueueKind,
        name: &str,
        f: impl FnOnce(&Arc<QueueSlot>) -> R,
    ) -> Result<R, QueueError> {
        let entry = self
            .slots
            .get(&(kind, Arc::from(name)))
            .ok_or_else(|| QueueError::NotFound {
                kind: kind.to_string(),
                name: name.to_string(),
            })?;
        Ok(f(entry.value()))
    }
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new()
    }
}
