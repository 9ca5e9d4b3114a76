use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Поле объекта, из которого извлекается приоритет, если он не задан явно.
pub const PRIORITY_FIELD: &str = "priority";

/// Дискретное событие, буферизуемое менеджером очередей.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<OrderedFloat<f64>>,
}

impl Event {
    pub fn new(payload: impl Into<Value>) -> Self {
        Self {
            payload: payload.into(),
            priority: None,
        }
    }

    pub fn with_priority(
        payload: impl Into<Value>,
        priority: f64,
    ) -> Self {
        Self {
            payload: payload.into(),
            priority: Some(OrderedFloat(priority)),
        }
    }

    /// Приоритет события: явно прикреплённый или числовое поле
    /// `"priority"` объекта-payload.
    pub fn priority(&self) -> Option<OrderedFloat<f64>> {
        self.priority.or_else(|| {
            self.payload
                .get(PRIORITY_FIELD)
                .and_then(Value::as_f64)
                .map(OrderedFloat)
        })
    }
}

impl From<Value> for Event {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}
