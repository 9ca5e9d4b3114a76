use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use pubhub_error::{GenericError, TransportError};
use serde_json::{json, Value};
use tracing::debug;

use super::{Envelope, Transport};
use crate::pubsub::{DispatchContext, StrategyConfig};

/// Аргументы вызова функции скрипта.
#[derive(Debug, Clone)]
pub struct ScriptCall {
    pub target: String,
    pub args: Vec<Value>,
    pub message: Value,
    pub context: DispatchContext,
}

/// Функция, исполняющая скрипт. Вызывается в блокирующем потоке.
pub type ScriptFn = Arc<dyn Fn(ScriptCall) -> Result<Value, GenericError> + Send + Sync>;

/// Явный реестр функций скриптов: `run_type -> функция`.
#[derive(Clone, Default)]
pub struct ScriptRegistry {
    functions: HashMap<String, ScriptFn>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Реестр со встроенной функцией `echo`, которая возвращает свои
    /// аргументы.
    pub fn builtin() -> Self {
        Self::new().register("echo", |call: ScriptCall| {
            Ok(json!({
                "target": call.target,
                "args": call.args,
                "message": call.message,
            }))
        })
    }

    pub fn register<F>(
        mut self,
        run_type: impl Into<String>,
        function: F,
    ) -> Self
    where
        F: Fn(ScriptCall) -> Result<Value, GenericError> + Send + Sync + 'static,
    {
        self.functions.insert(run_type.into(), Arc::new(function));
        self
    }

    pub fn get(
        &self,
        run_type: &str,
    ) -> Option<ScriptFn> {
        self.functions.get(run_type).cloned()
    }

    pub fn contains(
        &self,
        run_type: &str,
    ) -> bool {
        self.functions.contains_key(run_type)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Транспорт стратегий `script`.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    registry: ScriptRegistry,
}

impl ScriptRunner {
    pub fn new(registry: ScriptRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Transport for ScriptRunner {
    fn name(&self) -> &str {
        "script"
    }

    async fn send(
        &self,
        envelope: &Envelope,
    ) -> Result<Value, TransportError> {
        let StrategyConfig::Script(config) = envelope.config.as_ref() else {
            return Err(TransportError::failed(format!(
                "script runner cannot deliver {} strategies",
                envelope.kind
            )));
        };
        let function = self.registry.get(&config.run_type).ok_or_else(|| {
            TransportError::failed(format!("script function '{}' is not registered", config.run_type))
        })?;

        let call = ScriptCall {
            target: config.target.clone(),
            args: config.args.clone(),
            message: envelope.payload.get("message").cloned().unwrap_or(Value::Null),
            context: envelope.context.clone(),
        };
        debug!(run_type = %config.run_type, target = %call.target, "running script");

        match tokio::task::spawn_blocking(move || function(call)).await {
            Ok(result) => result.map_err(|e| TransportError::failed(e.to_string())),
            // Паника функции пробрасывается дальше, чтобы исполнитель
            // отметил вызов как `Panicked`.
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(TransportError::failed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pubhub_error::{DeliveryFailure, StatusCode};

    use super::*;
    use crate::{
        pubsub::{DeliveryStrategy, Message, ScriptConfig},
        transport::TransportSet,
    };

    fn script(
        run_type: &str,
        transports: &TransportSet,
    ) -> DeliveryStrategy {
        let config = StrategyConfig::Script(ScriptConfig {
            run_type: run_type.to_string(),
            target: "reports.daily".to_string(),
            args: vec![json!("--dry-run")],
            message_format: Some("run for {}".to_string()),
        });
        DeliveryStrategy::new(config, transports).unwrap()
    }

    /// Тест проверяет вызов встроенной функции `echo`.
    #[tokio::test]
    async fn test_echo_script() {
        let transports = TransportSet::new().with_scripts(ScriptRegistry::builtin());
        let out = script("echo", &transports)
            .process(&Message::from("today"), &DispatchContext::new())
            .await
            .unwrap();
        assert_eq!(
            out,
            json!({
                "target": "reports.daily",
                "args": ["--dry-run"],
                "message": "run for today",
            })
        );
    }

    /// Тест проверяет, что ошибка функции становится ошибкой транспорта.
    #[tokio::test]
    async fn test_script_error() {
        let registry = ScriptRegistry::new().register("fail", |_call: ScriptCall| {
            Err(GenericError::new(StatusCode::InvalidArgs, "bad target"))
        });
        let transports = TransportSet::new().with_scripts(registry);
        let err = script("fail", &transports)
            .process(&Message::from("x"), &DispatchContext::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DeliveryFailure::Transport {
                reason: "bad target".to_string()
            }
        );
    }
}
