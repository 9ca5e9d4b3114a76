use super::Event;

/// Строгий LIFO-стек.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    items: Vec<Event>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        event: Event,
    ) {
        self.items.push(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&Event> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
