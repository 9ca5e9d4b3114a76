use std::time::Duration;

/// Как выполнять вызовы стратегий при публикации.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Запускать вызовы параллельно. При `false` стратегии вызываются в
    /// порядке привязки, подписчики - по очереди.
    pub concurrent: bool,
    /// Предел одновременных вызовов в рамках одной публикации.
    pub max_in_flight: usize,
    /// Лимит времени на один вызов стратегии.
    pub strategy_timeout: Duration,
}

impl DispatchPolicy {
    pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn sequential() -> Self {
        Self {
            concurrent: false,
            ..Self::default()
        }
    }

    pub fn with_max_in_flight(
        mut self,
        max_in_flight: usize,
    ) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn with_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.strategy_timeout = timeout;
        self
    }
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            concurrent: true,
            max_in_flight: Self::DEFAULT_MAX_IN_FLIGHT,
            strategy_timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}
