//! Исполнитель вызовов стратегий.
//!
//! Один вызов `run` обслуживает одну публикацию: все вызовы делят общий
//! семафор, каждый ограничен таймаутом и изолирован от паники.

use std::{
    any::Any,
    panic::AssertUnwindSafe,
    sync::Arc,
    time::{Duration, Instant},
};

use futures::FutureExt;
use pubhub_error::{DeliveryError, DeliveryFailure, TimeoutError};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, warn};

use super::{DeliveryRecord, DeliveryStrategy, DispatchContext, DispatchPolicy, Message};

/// Вызов одной стратегии от имени подписчика.
#[derive(Debug, Clone)]
pub(crate) struct Invocation {
    pub subscriber: Arc<str>,
    pub strategy: DeliveryStrategy,
}

/// Выполняет вызовы и возвращает записи в порядке `invocations`.
pub(crate) async fn run(
    invocations: Vec<Invocation>,
    message: Arc<Message>,
    context: Arc<DispatchContext>,
    policy: &DispatchPolicy,
) -> Vec<DeliveryRecord> {
    if !policy.concurrent || invocations.len() <= 1 {
        let mut records = Vec::with_capacity(invocations.len());
        for invocation in invocations {
            let record = run_one(invocation, &message, &context, policy.strategy_timeout).await;
            records.push(record);
        }
        return records;
    }

    let semaphore = Arc::new(Semaphore::new(policy.max_in_flight.max(1)));
    let mut set = JoinSet::new();
    let mut pending: Vec<Option<Invocation>> = Vec::with_capacity(invocations.len());

    for (index, invocation) in invocations.into_iter().enumerate() {
        pending.push(Some(invocation.clone()));

        let semaphore = semaphore.clone();
        let message = message.clone();
        let context = context.clone();
        let limit = policy.strategy_timeout;
        set.spawn(async move {
            // Семафор не закрывается, пока жив `run`.
            let _permit = semaphore.acquire_owned().await.ok();
            (index, run_one(invocation, &message, &context, limit).await)
        });
    }

    let mut records: Vec<Option<DeliveryRecord>> = vec![None; pending.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, record)) => {
                pending[index] = None;
                records[index] = Some(record);
            }
            Err(e) => warn!(error = %e, "delivery task did not complete"),
        }
    }

    finish(records, pending)
}

/// Сводит результаты по индексам. Вызов без результата (задача прервана
/// до завершения) записывается как [`DeliveryFailure::Cancelled`].
fn finish(
    records: Vec<Option<DeliveryRecord>>,
    pending: Vec<Option<Invocation>>,
) -> Vec<DeliveryRecord> {
    records
        .into_iter()
        .zip(pending)
        .filter_map(|(record, invocation)| match (record, invocation) {
            (Some(record), _) => Some(record),
            (None, Some(invocation)) => Some(failed(
                &invocation,
                Duration::ZERO,
                DeliveryFailure::Cancelled,
            )),
            (None, None) => None,
        })
        .collect()
}

async fn run_one(
    invocation: Invocation,
    message: &Message,
    context: &DispatchContext,
    limit: Duration,
) -> DeliveryRecord {
    let strategy = &invocation.strategy;
    let started = Instant::now();

    let call = AssertUnwindSafe(strategy.process(message, context)).catch_unwind();
    let outcome = match tokio::time::timeout(limit, call).await {
        Ok(Ok(result)) => result,
        Ok(Err(panic)) => Err(DeliveryFailure::Panicked {
            reason: panic_message(panic.as_ref()),
        }),
        Err(_) => Err(DeliveryFailure::Timeout(TimeoutError {
            kind: strategy.kind().to_string(),
            limit_ms: limit.as_millis() as u64,
        })),
    };
    let elapsed = started.elapsed();

    match outcome {
        Ok(value) => {
            debug!(
                subscriber = %invocation.subscriber,
                kind = %strategy.kind(),
                strategy = %strategy.id(),
                elapsed_ms = elapsed.as_millis() as u64,
                "delivered"
            );
            DeliveryRecord {
                subscriber: invocation.subscriber.to_string(),
                kind: strategy.kind(),
                strategy_id: strategy.id(),
                elapsed,
                outcome: Ok(value),
            }
        }
        Err(failure) => {
            warn!(
                subscriber = %invocation.subscriber,
                kind = %strategy.kind(),
                strategy = %strategy.id(),
                elapsed_ms = elapsed.as_millis() as u64,
                error = %failure,
                "delivery failed"
            );
            failed(&invocation, elapsed, failure)
        }
    }
}

fn failed(
    invocation: &Invocation,
    elapsed: Duration,
    failure: DeliveryFailure,
) -> DeliveryRecord {
    let strategy = &invocation.strategy;
    DeliveryRecord {
        subscriber: invocation.subscriber.to_string(),
        kind: strategy.kind(),
        strategy_id: strategy.id(),
        elapsed,
        outcome: Err(DeliveryError {
            subscriber: invocation.subscriber.to_string(),
            kind: strategy.kind().to_string(),
            strategy_id: strategy.id().to_string(),
            failure,
        }),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
