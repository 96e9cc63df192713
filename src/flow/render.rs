//! Human-readable rendering of values reported by flows.

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use std::io;

/// JSON formatter that separates items with `", "` and keys with `": "`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Render a value for display. Strings print verbatim, everything else as
/// spaced JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => to_spaced_json(other),
    }
}

fn to_spaced_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_uses_spaced_separators() {
        assert_eq!(render_value(&json!({"ok": true})), r#"{"ok": true}"#);
    }

    #[test]
    fn test_nested_values() {
        let value = json!({"items": [1, 2, {"name": "a"}], "count": 3});
        assert_eq!(
            render_value(&value),
            r#"{"items": [1, 2, {"name": "a"}], "count": 3}"#
        );
    }

    #[test]
    fn test_strings_are_verbatim() {
        assert_eq!(render_value(&json!("hello world")), "hello world");
    }

    #[test]
    fn test_scalars_and_empty_containers() {
        assert_eq!(render_value(&json!(42)), "42");
        assert_eq!(render_value(&json!(false)), "false");
        assert_eq!(render_value(&Value::Null), "null");
        assert_eq!(render_value(&json!([])), "[]");
        assert_eq!(render_value(&json!({})), "{}");
        assert_eq!(render_value(&json!(["a"])), r#"["a"]"#);
    }
}
