use std::fmt;

use pubhub_error::FormatError;
use serde_json::Value;

use super::{Message, MessageShape};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Named(String),
    Positional(usize),
}

/// Разобранный шаблон сообщения.
///
/// Синтаксис:
/// - `{field}` - поле записи;
/// - `{}` или `{0}` - значение целиком для скаляров и последовательностей;
/// - `{{` и `}}` - литеральные фигурные скобки.
///
/// Спецификаторы формата (`{x:>10}`, `{x!r}`) не поддерживаются, как и
/// смешение автоматической и явной нумерации.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Unset,
    Auto,
    Manual,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut numbering = Numbering::Unset;
        let mut next_auto = 0usize;

        let mut chars = source.char_indices().peekable();
        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(malformed(offset, "single '}' encountered"));
                }
                '{' => {
                    let mut field = String::new();
                    let mut closed = false;
                    for (inner_offset, inner) in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(malformed(inner_offset, "nested '{' in field")),
                            ':' | '!' => {
                                return Err(malformed(
                                    inner_offset,
                                    "format specs and conversions are not supported",
                                ))
                            }
                            other => field.push(other),
                        }
                    }
                    if !closed {
                        return Err(malformed(offset, "unmatched '{'"));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }

                    let field = field.trim();
                    let segment = if field.is_empty() {
                        if numbering == Numbering::Manual {
                            return Err(malformed(
                                offset,
                                "cannot switch from manual to automatic numbering",
                            ));
                        }
                        numbering = Numbering::Auto;
                        next_auto += 1;
                        Segment::Positional(next_auto - 1)
                    } else if let Ok(index) = field.parse::<usize>() {
                        if numbering == Numbering::Auto {
                            return Err(malformed(
                                offset,
                                "cannot switch from automatic to manual numbering",
                            ));
                        }
                        numbering = Numbering::Manual;
                        Segment::Positional(index)
                    } else {
                        Segment::Named(field.to_string())
                    };
                    segments.push(segment);
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Подставляет сообщение в шаблон.
    ///
    /// Запись подставляется по именам полей, скаляр или последовательность
    /// - как единственное позиционное значение.
    pub fn render(
        &self,
        message: &Message,
    ) -> Result<String, FormatError> {
        let value = message.value();
        let mut out = String::with_capacity(self.source.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Named(field) => {
                    let found = match message.shape() {
                        MessageShape::Record => value.get(field.as_str()),
                        MessageShape::Scalar | MessageShape::Sequence => None,
                    };
                    let found = found.ok_or_else(|| FormatError::MissingField {
                        field: field.clone(),
                    })?;
                    push_value(&mut out, found);
                }
                Segment::Positional(index) => {
                    let available = match message.shape() {
                        MessageShape::Record => 0,
                        MessageShape::Scalar | MessageShape::Sequence => 1,
                    };
                    if *index >= available {
                        return Err(FormatError::PositionOutOfRange {
                            index: *index,
                            available,
                        });
                    }
                    push_value(&mut out, value);
                }
            }
        }

        Ok(out)
    }
}

impl fmt::Display for Template {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn push_value(
    out: &mut String,
    value: &Value,
) {
    match value {
        Value::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}

fn malformed(
    offset: usize,
    reason: &str,
) -> FormatError {
    FormatError::Malformed {
        offset,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn render(
        template: &str,
        message: Value,
    ) -> Result<String, FormatError> {
        Template::parse(template)?.render(&Message::new(message))
    }

    /// Тест проверяет подстановку полей записи.
    #[test]
    fn test_render_record_fields() {
        let out = render(
            "order {id} for {user}: {total}",
            json!({"id": 17, "user": "ann", "total": 9.5}),
        )
        .unwrap();
        assert_eq!(out, "order 17 for ann: 9.5");
    }

    /// Тест проверяет позиционную подстановку скаляров и последовательностей.
    #[rstest]
    #[case("value={}", json!("x"), "value=x")]
    #[case("value={0}/{0}", json!(3), "value=3/3")]
    #[case("list {}", json!([1, "a"]), r#"list [1,"a"]"#)]
    #[case("{{literal}} {}", json!(true), "{literal} true")]
    fn test_render_positional(
        #[case] template: &str,
        #[case] message: Value,
        #[case] expected: &str,
    ) {
        assert_eq!(render(template, message).unwrap(), expected);
    }

    /// Тест проверяет ошибки подстановки.
    #[test]
    fn test_render_errors() {
        assert_eq!(
            render("{missing}", json!({"id": 1})).unwrap_err(),
            FormatError::MissingField {
                field: "missing".to_string()
            }
        );
        assert_eq!(
            render("{name}", json!("scalar")).unwrap_err(),
            FormatError::MissingField {
                field: "name".to_string()
            }
        );
        assert_eq!(
            render("{1}", json!("scalar")).unwrap_err(),
            FormatError::PositionOutOfRange {
                index: 1,
                available: 1
            }
        );
        assert_eq!(
            render("{}", json!({"a": 1})).unwrap_err(),
            FormatError::PositionOutOfRange {
                index: 0,
                available: 0
            }
        );
    }

    /// Тест проверяет отказ на синтаксически неверных шаблонах.
    #[rstest]
    #[case("unclosed {field")]
    #[case("stray } brace")]
    #[case("{x:>10}")]
    #[case("{x!r}")]
    #[case("{} and {0}")]
    #[case("{0} and {}")]
    #[case("{a{b}}")]
    fn test_parse_malformed(#[case] template: &str) {
        let err = Template::parse(template).unwrap_err();
        assert!(
            matches!(err, FormatError::Malformed { .. }),
            "{template}: {err:?}"
        );
    }

    /// Тест проверяет, что шаблон без подстановок остаётся как есть.
    #[test]
    fn test_plain_template() {
        let t = Template::parse("static text").unwrap();
        assert_eq!(t.to_string(), "static text");
        assert_eq!(
            t.render(&Message::new(json!({"ignored": 1}))).unwrap(),
            "static text"
        );
    }
}
