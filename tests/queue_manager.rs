use std::{sync::Arc, time::Duration};

use pubhub::{
    pubsub::MessageQueueConfig, ConfigurationError, DeliveryStrategy, DispatchContext, Event,
    PriorityOrder, QueueError, QueueKind, QueueManager, StrategyConfig, Subscriber,
    TopicRegistry, TransportSet, DEFAULT_QUEUE,
};
use serde_json::json;

fn payloads(
    manager: &QueueManager,
    kind: QueueKind,
    name: &str,
) -> Vec<serde_json::Value> {
    std::iter::from_fn(|| manager.dequeue(kind, name).ok())
        .map(|e| e.payload)
        .collect()
}

/// Тест проверяет, что FIFO-очередь отдаёт события в порядке вставки.
#[test]
fn test_fifo_order() {
    let manager = QueueManager::new();
    let events = vec![Event::new(1), Event::new(2), Event::new(3)];
    assert_eq!(manager.enqueue(QueueKind::Queue, "jobs", events).unwrap(), 3);

    assert_eq!(
        payloads(&manager, QueueKind::Queue, "jobs"),
        vec![json!(1), json!(2), json!(3)]
    );
}

/// Тест проверяет, что стек отдаёт события в обратном порядке.
#[test]
fn test_stack_order() {
    let manager = QueueManager::new();
    let events = vec![Event::new(1), Event::new(2), Event::new(3)];
    manager.enqueue(QueueKind::Stack, "undo", events).unwrap();

    assert_eq!(
        payloads(&manager, QueueKind::Stack, "undo"),
        vec![json!(3), json!(2), json!(1)]
    );
}

/// Тест проверяет порядок очереди с приоритетом в обоих режимах.
#[test]
fn test_priority_order_both_directions() {
    let events = || {
        vec![
            Event::with_priority("five", 5.0),
            Event::with_priority("one", 1.0),
            Event::with_priority("three", 3.0),
        ]
    };

    let min_first = QueueManager::new();
    min_first
        .enqueue(QueueKind::PriorityQueue, "p", events())
        .unwrap();
    assert_eq!(
        payloads(&min_first, QueueKind::PriorityQueue, "p"),
        vec![json!("one"), json!("three"), json!("five")]
    );

    let max_first = QueueManager::with_order(PriorityOrder::MaxFirst);
    max_first
        .enqueue(QueueKind::PriorityQueue, "p", events())
        .unwrap();
    assert_eq!(
        payloads(&max_first, QueueKind::PriorityQueue, "p"),
        vec![json!("five"), json!("three"), json!("one")]
    );
}

/// Тест проверяет, что приоритет можно передать полем `priority` payload.
#[test]
fn test_priority_from_payload_field() {
    let manager = QueueManager::new();
    let events = vec![
        Event::new(json!({ "id": "b", "priority": 2 })),
        Event::new(json!({ "id": "a", "priority": 1 })),
    ];
    manager
        .enqueue(QueueKind::PriorityQueue, DEFAULT_QUEUE, events)
        .unwrap();

    let first = manager
        .dequeue(QueueKind::PriorityQueue, DEFAULT_QUEUE)
        .unwrap();
    assert_eq!(first.payload["id"], json!("a"));
}

/// Тест проверяет различие между отсутствующим и пустым контейнером.
#[test]
fn test_not_found_vs_underflow() {
    let manager = QueueManager::new();

    let err = manager.dequeue(QueueKind::Queue, "ghost").unwrap_err();
    assert!(err.is_not_found());

    for kind in QueueKind::ALL {
        let err = manager.dequeue(kind, DEFAULT_QUEUE).unwrap_err();
        assert!(err.is_underflow(), "{kind}: {err}");
    }
}

/// Тест проверяет, что неизвестный литерал вида контейнера отклоняется.
#[test]
fn test_invalid_kind_literal() {
    let err = "deque".parse::<QueueKind>().unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::InvalidQueueKind {
            literal: "deque".to_string()
        }
    );
    assert_eq!("priority_queue".parse::<QueueKind>().unwrap(), QueueKind::PriorityQueue);
}

/// Тест проверяет, что событие без приоритета не попадает в очередь с
/// приоритетом и не создаёт контейнер.
#[test]
fn test_missing_priority_rejects_batch() {
    let manager = QueueManager::new();
    let events = vec![Event::with_priority("ok", 1.0), Event::new("no priority")];

    let err = manager
        .enqueue(QueueKind::PriorityQueue, "strict", events)
        .unwrap_err();
    assert!(matches!(err, QueueError::MissingPriority { index: 1, .. }));
    assert!(!manager.contains(QueueKind::PriorityQueue, "strict"));
}

/// Тест проверяет, что ожидающий `dequeue_timeout` просыпается при
/// появлении события из другой задачи.
#[tokio::test]
async fn test_dequeue_timeout_wakes_on_enqueue() {
    let manager = Arc::new(QueueManager::new());
    let producer = {
        let manager = manager.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            manager
                .enqueue(QueueKind::Queue, DEFAULT_QUEUE, vec![Event::new("late")])
                .unwrap();
        })
    };

    let event = manager
        .dequeue_timeout(QueueKind::Queue, DEFAULT_QUEUE, Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(event.payload, json!("late"));
    producer.await.unwrap();
}

/// Тест проверяет истечение `dequeue_timeout` на пустом контейнере.
#[tokio::test]
async fn test_dequeue_timeout_expires() {
    let manager = QueueManager::new();
    let err = manager
        .dequeue_timeout(QueueKind::Stack, DEFAULT_QUEUE, Duration::from_millis(10))
        .await
        .unwrap_err();
    assert!(matches!(err, QueueError::Timeout { limit_ms: 10, .. }));
}

/// Тест проверяет, что стратегия `message_queue` кладёт опубликованное
/// сообщение в менеджер очередей.
#[tokio::test]
async fn test_message_queue_strategy_feeds_manager() {
    let queues = Arc::new(QueueManager::new());
    let transports = TransportSet::recording().with_queue_manager(queues.clone());

    let config = StrategyConfig::MessageQueue(MessageQueueConfig {
        queue_kind: "priority_queue".to_string(),
        queue_name: "urgent".to_string(),
        priority: Some(0.5),
        message_format: Some("{} needs attention".to_string()),
    });
    let strategy = DeliveryStrategy::new(config, &transports).unwrap();

    let registry = TopicRegistry::new();
    registry.subscribe("incidents", Arc::new(Subscriber::new("pager", vec![strategy])));

    let report = registry
        .publish("incidents", "db-1", DispatchContext::new())
        .await;
    assert!(report.is_success(), "{:?}", report.records);

    let event = queues.dequeue(QueueKind::PriorityQueue, "urgent").unwrap();
    assert_eq!(event.payload, json!("db-1 needs attention"));
    assert_eq!(event.priority().map(|p| p.0), Some(0.5));
}
