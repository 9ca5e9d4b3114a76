use ordered_float::OrderedFloat;
use proptest::prelude::*;
use pubhub::{
    queue::PriorityQueue, Event, PriorityOrder, QueueKind, QueueManager, DEFAULT_QUEUE,
};
use serde_json::json;

proptest! {
    #[test]
    fn prop_priority_queue_matches_stable_sort(
        priorities in prop::collection::vec(-20i32..20, 0..200),
        max_first in any::<bool>(),
    ) {
        let order = if max_first { PriorityOrder::MaxFirst } else { PriorityOrder::MinFirst };
        let mut pq = PriorityQueue::new(order);
        for (i, p) in priorities.iter().enumerate() {
            pq.push(OrderedFloat(*p as f64), Event::new(i));
        }
        prop_assert_eq!(pq.len(), priorities.len());

        // эталон: стабильная сортировка по приоритету
        let mut expected: Vec<(i32, usize)> =
            priorities.iter().copied().zip(0..).collect();
        if max_first {
            expected.sort_by(|a, b| b.0.cmp(&a.0));
        } else {
            expected.sort_by(|a, b| a.0.cmp(&b.0));
        }

        for (_, index) in expected {
            let event = pq.pop();
            prop_assert_eq!(event.map(|e| e.payload), Some(json!(index)));
        }
        prop_assert!(pq.is_empty());
        prop_assert!(pq.pop().is_none());
    }

    #[test]
    fn prop_manager_len_tracks_operations(
        ops in prop::collection::vec((0u8..2, 0usize..3), 0..150)
    ) {
        let manager = QueueManager::new();
        let mut model = [0usize; 3];

        for (op, k) in ops {
            let kind = QueueKind::ALL[k];
            match op {
                0 => {
                    let len = manager
                        .enqueue(kind, DEFAULT_QUEUE, vec![Event::with_priority(1, 1.0)])
                        .unwrap();
                    model[k] += 1;
                    prop_assert_eq!(len, model[k]);
                }
                1 => {
                    let popped = manager.dequeue(kind, DEFAULT_QUEUE);
                    if model[k] == 0 {
                        prop_assert!(popped.unwrap_err().is_underflow());
                    } else {
                        prop_assert!(popped.is_ok());
                        model[k] -= 1;
                    }
                }
                _ => unreachable!(),
            }
            prop_assert_eq!(manager.len(kind, DEFAULT_QUEUE).unwrap(), model[k]);
        }
    }
}
