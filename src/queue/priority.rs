use std::{cmp::Ordering, collections::BinaryHeap};

use ordered_float::OrderedFloat;

use super::{Event, PriorityOrder};

/// Элемент кучи. `rank` уже учитывает направление порядка, поэтому
/// `BinaryHeap` (max-heap) всегда отдаёт наибольший `rank`; при равенстве
/// первым выходит меньший `seq`.
#[derive(Debug, Clone)]
struct Entry {
    rank: OrderedFloat<f64>,
    seq: u64,
    event: Event,
}

impl PartialEq for Entry {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Очередь с приоритетом со стабильным порядком для равных приоритетов.
#[derive(Debug, Clone, Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<Entry>,
    order: PriorityOrder,
    next_seq: u64,
}

impl PriorityQueue {
    pub fn new(order: PriorityOrder) -> Self {
        Self {
            heap: BinaryHeap::new(),
            order,
            next_seq: 0,
        }
    }

    pub fn order(&self) -> PriorityOrder {
        self.order
    }

    pub fn push(
        &mut self,
        priority: OrderedFloat<f64>,
        event: Event,
    ) {
        let rank = match self.order {
            PriorityOrder::MinFirst => OrderedFloat(-priority.0),
            PriorityOrder::MaxFirst => priority,
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { rank, seq, event });
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|entry| entry.event)
    }

    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek().map(|entry| &entry.event)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
