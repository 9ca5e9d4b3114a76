use std::collections::VecDeque;

use super::Event;

/// Строгая FIFO-очередь: запись в хвост, чтение из головы.
#[derive(Debug, Clone, Default)]
pub struct FifoQueue {
    items: VecDeque<Event>,
}

impl FifoQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        event: Event,
    ) {
        self.items.push_back(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.items.pop_front()
    }

    pub fn peek(&self) -> Option<&Event> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// Тест проверяет порядок FIFO: 1, 2, 3 -> 1, 2, 3.
    #[test]
    fn test_fifo_order() {
        let mut q = FifoQueue::new();
        for i in 1..=3 {
            q.push(Event::new(json!(i)));
        }
        assert_eq!(q.peek().map(|e| &e.payload), Some(&json!(1)));
        let out: Vec<_> = std::iter::from_fn(|| q.pop()).map(|e| e.payload).collect();
        assert_eq!(out, vec![json!(1), json!(2), json!(3)]);
        assert!(q.is_empty());
    }
}
