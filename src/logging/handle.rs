use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::{Duration, Instant},
};

use tracing_appender::non_blocking::WorkerGuard;

/// Счётчики жизненного цикла логирования.
#[derive(Debug, Default)]
pub struct LoggingMetrics {
    flush_count: AtomicU64,
    shutdown_in_progress: AtomicBool,
}

impl LoggingMetrics {
    pub fn flush_count(&self) -> u64 {
        self.flush_count.load(Ordering::Relaxed)
    }

    pub fn is_shutdown_in_progress(&self) -> bool {
        self.shutdown_in_progress.load(Ordering::Acquire)
    }
}

/// Handle для управления жизненным циклом логирования.
///
/// Держит guard файлового writer'а: пока handle жив, фоновый поток
/// записи работает.
#[derive(Debug)]
pub struct LoggingHandle {
    file_guard: Option<WorkerGuard>,
    metrics: LoggingMetrics,
    flush_timeout: Duration,
}

impl LoggingHandle {
    pub fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self {
            file_guard,
            metrics: LoggingMetrics::default(),
            flush_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_flush_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.flush_timeout = timeout;
        self
    }

    pub fn has_file_sink(&self) -> bool {
        self.file_guard.is_some()
    }

    pub fn metrics(&self) -> &LoggingMetrics {
        &self.metrics
    }

    /// Только увеличивает счётчик `flush_count` и пишет debug-событие.
    /// Буферы не сбрасываются: неблокирующий writer записывает их сам, а
    /// остаток дописывается при [`LoggingHandle::shutdown`] или drop.
    pub fn flush(&self) {
        self.metrics.flush_count.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            flush_count = self.metrics.flush_count(),
            "logging flush requested"
        );
    }

    /// Завершает логирование, дожидаясь записи буфера.
    pub fn shutdown(mut self) {
        self.metrics
            .shutdown_in_progress
            .store(true, Ordering::Release);
        tracing::info!(
            flushes = self.metrics.flush_count(),
            "logging shutdown"
        );

        let started = Instant::now();
        drop(self.file_guard.take());
        let elapsed = started.elapsed();

        if elapsed > self.flush_timeout {
            eprintln!(
                "WARNING: logging shutdown took {}ms (timeout: {}ms)",
                elapsed.as_millis(),
                self.flush_timeout.as_millis()
            );
        }
    }
}

impl Drop for LoggingHandle {
    fn drop(&mut self) {
        if self.file_guard.is_some() && !self.metrics.is_shutdown_in_progress() {
            eprintln!(
                "WARNING: LoggingHandle dropped without shutdown(); \
                 buffered log lines may be lost"
            );
        }
    }
}
