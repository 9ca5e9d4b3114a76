use ordered_float::OrderedFloat;

use super::{Event, FifoQueue, PriorityOrder, PriorityQueue, QueueKind, Stack};

/// Почему событие нельзя положить в очередь с приоритетом.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityDefect {
    Missing,
    NotANumber,
}

/// Упорядочивающий контейнер одного из трёх видов.
#[derive(Debug, Clone)]
pub enum Container {
    Queue(FifoQueue),
    Stack(Stack),
    Priority(PriorityQueue),
}

impl Container {
    pub fn new(
        kind: QueueKind,
        order: PriorityOrder,
    ) -> Self {
        match kind {
            QueueKind::Queue => Self::Queue(FifoQueue::new()),
            QueueKind::Stack => Self::Stack(Stack::new()),
            QueueKind::PriorityQueue => Self::Priority(PriorityQueue::new(order)),
        }
    }

    pub fn kind(&self) -> QueueKind {
        match self {
            Self::Queue(_) => QueueKind::Queue,
            Self::Stack(_) => QueueKind::Stack,
            Self::Priority(_) => QueueKind::PriorityQueue,
        }
    }

    /// Первое событие без пригодного приоритета, если контейнер его
    /// требует. `NaN` не упорядочивается и отклоняется так же, как
    /// отсутствующий приоритет.
    ///
    /// Проверка выполняется до любой вставки, чтобы `push_all` применял
    /// пачку событий целиком или не применял вовсе.
    pub fn first_priority_defect(
        kind: QueueKind,
        events: &[Event],
    ) -> Option<(usize, PriorityDefect)> {
        if kind != QueueKind::PriorityQueue {
            return None;
        }
        events
            .iter()
            .enumerate()
            .find_map(|(index, event)| match event.priority() {
                None => Some((index, PriorityDefect::Missing)),
                Some(p) if p.is_nan() => Some((index, PriorityDefect::NotANumber)),
                Some(_) => None,
            })
    }

    /// Вставляет события в порядке вызова. Для очереди с приоритетом
    /// события без приоритета должны быть отсеяны заранее через
    /// [`Container::first_priority_defect`]; такие события получают
    /// приоритет `0`.
    pub fn push_all(
        &mut self,
        events: Vec<Event>,
    ) {
        match self {
            Self::Queue(q) => events.into_iter().for_each(|e| q.push(e)),
            Self::Stack(s) => events.into_iter().for_each(|e| s.push(e)),
            Self::Priority(p) => {
                for event in events {
                    let priority = event.priority().unwrap_or(OrderedFloat(0.0));
                    p.push(priority, event);
                }
            }
        }
    }

    pub fn pop(&mut self) -> Option<Event> {
        match self {
            Self::Queue(q) => q.pop(),
            Self::Stack(s) => s.pop(),
            Self::Priority(p) => p.pop(),
        }
    }

    pub fn peek(&self) -> Option<&Event> {
        match self {
            Self::Queue(q) => q.peek(),
            Self::Stack(s) => s.peek(),
            Self::Priority(p) => p.peek(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Queue(q) => q.len(),
            Self::Stack(s) => s.len(),
            Self::Priority(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
