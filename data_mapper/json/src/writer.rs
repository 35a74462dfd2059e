//! JSON text output.

use data_mapper::GenericValue;
use std::fmt::Write;

/// Writes [`GenericValue`] trees as JSON text, compact or indented.
///
/// A top-level [`GenericValue::Null`] writes nothing. Map entries come out in the map's
/// iteration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter {
    indent: Option<usize>,
}

impl JsonWriter {
    /// A compact writer: no whitespace between tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// A multi-line writer with `indent` spaces per nesting level.
    pub fn pretty(indent: usize) -> Self {
        Self {
            indent: Some(indent),
        }
    }

    pub fn write(&self, value: &GenericValue) -> String {
        let mut out = String::new();
        if !value.is_null() {
            self.write_value(&mut out, value, 0);
        }
        out
    }

    fn write_value(&self, out: &mut String, value: &GenericValue, depth: usize) {
        match value {
            GenericValue::Null => out.push_str("null"),
            GenericValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            GenericValue::Int(i) => {
                let _ = write!(out, "{}", i);
            }
            GenericValue::Double(d) => write_double(out, *d),
            GenericValue::Number(number) => {
                if let Some(int) = number.as_int() {
                    let _ = write!(out, "{}", int);
                } else if let Some(double) = number.as_double() {
                    write_double(out, double);
                } else if let Some(b) = number.as_bool() {
                    out.push_str(if b { "true" } else { "false" });
                } else {
                    out.push_str("null");
                }
            }
            GenericValue::String(s) => write_string(out, s),
            GenericValue::Array(items) => {
                if items.is_empty() {
                    out.push_str("[]");
                    return;
                }
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.newline(out, depth + 1);
                    self.write_value(out, item, depth + 1);
                }
                self.newline(out, depth);
                out.push(']');
            }
            GenericValue::Map(map) => {
                if map.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push('{');
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.newline(out, depth + 1);
                    write_string(out, key);
                    out.push(':');
                    if self.indent.is_some() {
                        out.push(' ');
                    }
                    self.write_value(out, item, depth + 1);
                }
                self.newline(out, depth);
                out.push('}');
            }
        }
    }

    fn newline(&self, out: &mut String, depth: usize) {
        if let Some(indent) = self.indent {
            out.push('\n');
            out.push_str(&" ".repeat(indent * depth));
        }
    }
}

/// NaN and infinities have no JSON form.
fn write_double(out: &mut String, value: f64) {
    if value.is_finite() {
        let _ = write!(out, "{:?}", value);
    } else {
        out.push_str("null");
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if (ch as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", ch as u32);
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_mapper::SupportedNumber;
    use std::collections::HashMap;

    fn compact(value: &GenericValue) -> String {
        JsonWriter::new().write(value)
    }

    #[test]
    fn test_write_scalars() {
        assert_eq!(compact(&GenericValue::Bool(true)), "true");
        assert_eq!(compact(&GenericValue::Int(-42)), "-42");
        assert_eq!(compact(&GenericValue::Double(1.5)), "1.5");
        assert_eq!(compact(&GenericValue::Double(2.0)), "2.0");
        assert_eq!(compact(&GenericValue::from("hi")), "\"hi\"");
    }

    #[test]
    fn test_top_level_null_writes_nothing() {
        assert_eq!(compact(&GenericValue::Null), "");
        assert_eq!(
            compact(&GenericValue::Array(vec![GenericValue::Null])),
            "[null]"
        );
    }

    #[test]
    fn test_non_finite_doubles_write_null() {
        let value = GenericValue::Array(vec![
            GenericValue::Double(f64::NAN),
            GenericValue::Double(f64::INFINITY),
        ]);
        assert_eq!(compact(&value), "[null,null]");
    }

    #[test]
    fn test_ambiguous_numbers() {
        assert_eq!(
            compact(&GenericValue::Number(SupportedNumber::from_int(7))),
            "7"
        );
        let boolean_only = SupportedNumber::new(Some(false), None, None);
        assert_eq!(compact(&GenericValue::Number(boolean_only)), "false");
        assert_eq!(
            compact(&GenericValue::Number(SupportedNumber::default())),
            "null"
        );
    }

    #[test]
    fn test_escape_string() {
        let value = GenericValue::from("a\"b\\c\nd\re\tf\x08g\x0ch\x01é/");
        assert_eq!(
            compact(&value),
            r#""a\"b\\c\nd\re\tf\bg\fh\u0001é/""#
        );
    }

    #[test]
    fn test_compact_containers() {
        let mut map = HashMap::new();
        map.insert(
            "list".to_string(),
            GenericValue::Array(vec![GenericValue::Int(1), GenericValue::Int(2)]),
        );
        assert_eq!(compact(&GenericValue::Map(map)), r#"{"list":[1,2]}"#);
        assert_eq!(compact(&GenericValue::empty_map()), "{}");
        assert_eq!(compact(&GenericValue::Array(Vec::new())), "[]");
    }

    #[test]
    fn test_pretty_print_nested() {
        let mut inner = HashMap::new();
        inner.insert(
            "tags".to_string(),
            GenericValue::Array(vec![GenericValue::from("a"), GenericValue::from("b")]),
        );
        let mut outer = HashMap::new();
        outer.insert("inner".to_string(), GenericValue::Map(inner));

        let text = JsonWriter::pretty(2).write(&GenericValue::Map(outer));
        assert_eq!(
            text,
            "{\n  \"inner\": {\n    \"tags\": [\n      \"a\",\n      \"b\"\n    ]\n  }\n}"
        );
    }

    #[test]
    fn test_pretty_empty_containers() {
        let value = GenericValue::Array(vec![GenericValue::empty_map()]);
        assert_eq!(JsonWriter::pretty(4).write(&value), "[\n    {}\n]");
    }
}
