use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Форма сообщения, определяющая способ подстановки в шаблон.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageShape {
    /// Строка, число, bool или null.
    Scalar,
    /// Структурированная запись (JSON-объект).
    Record,
    /// Последовательность значений.
    Sequence,
}

/// Публикуемое сообщение. Передаётся стратегиям без изменений, если у
/// стратегии нет шаблона.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(Value);

impl Message {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Разбирает строку как JSON; если это не JSON, сообщение становится
    /// строковым скаляром.
    pub fn parse_line(line: &str) -> Self {
        serde_json::from_str(line).unwrap_or_else(|_| Self(Value::String(line.to_string())))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn shape(&self) -> MessageShape {
        match &self.0 {
            Value::Object(_) => MessageShape::Record,
            Value::Array(_) => MessageShape::Sequence,
            _ => MessageShape::Scalar,
        }
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

/// Позиционные и именованные аргументы, которые передаются стратегиям
/// вместе с сообщением.
///
/// Каждый вызов получает собственный экземпляр; общий изменяемый
/// контекст по умолчанию не используется.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchContext {
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

impl DispatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(
        mut self,
        value: impl Into<Value>,
    ) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn kwarg(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// Тест проверяет определение формы сообщения.
    #[test]
    fn test_message_shape() {
        assert_eq!(Message::new(json!({"a": 1})).shape(), MessageShape::Record);
        assert_eq!(Message::new(json!([1, 2])).shape(), MessageShape::Sequence);
        assert_eq!(Message::from("hi").shape(), MessageShape::Scalar);
        assert_eq!(Message::new(json!(null)).shape(), MessageShape::Scalar);
    }

    /// Тест проверяет разбор строки: JSON, если получится, иначе строка.
    #[test]
    fn test_parse_line() {
        assert_eq!(Message::parse_line(r#"{"id": 7}"#).value(), &json!({"id": 7}));
        assert_eq!(Message::parse_line("42").value(), &json!(42));
        assert_eq!(
            Message::parse_line("hello world").value(),
            &json!("hello world")
        );
    }

    /// Тест проверяет, что контекст по умолчанию пуст и что каждый
    /// экземпляр независим.
    #[test]
    fn test_context_builder() {
        let a = DispatchContext::new().arg(1).kwarg("retry", true);
        let b = DispatchContext::default();
        assert!(!a.is_empty());
        assert!(b.is_empty());
        assert_eq!(a.args, vec![json!(1)]);
        assert_eq!(a.kwargs.get("retry"), Some(&json!(true)));
    }
}
