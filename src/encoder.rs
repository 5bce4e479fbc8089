//! Value tree to JSON encoder that re-quotes embedded subtrees

use crate::common::{plain_depth, DEFAULT_MAX_DEPTH, STACK_GROWTH, STACK_RED_ZONE};
use crate::error::{Error, Result};
use crate::value::Value;
use log::debug;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Encoder configuration options
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    /// Nesting limit covering arrays, objects and embedded-string hops (default: 512)
    pub max_depth: usize,
    /// Multi-line output, applied to every serialized level (default: false)
    pub pretty: bool,
    /// Spaces per indentation level when `pretty` is set (default: 2)
    pub indent: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
            indent: 2,
        }
    }
}

/// Anything [`encode`] accepts
#[derive(Debug, Clone, Copy)]
pub enum Encodable<'a> {
    /// A tagged tree; embedded subtrees are written as JSON strings
    Tree(&'a Value),
    /// Plain JSON, written as-is
    Plain(&'a serde_json::Value),
}

impl<'a> From<&'a Value> for Encodable<'a> {
    fn from(value: &'a Value) -> Self {
        Encodable::Tree(value)
    }
}

impl<'a> From<&'a serde_json::Value> for Encodable<'a> {
    fn from(value: &'a serde_json::Value) -> Self {
        Encodable::Plain(value)
    }
}

/// Encode a value to JSON text.
///
/// Arrays and objects tagged as embedded become quoted JSON strings inside their
/// parent; native ones stay inline. The outermost value is always written as text.
pub fn encode<'a>(value: impl Into<Encodable<'a>>, options: &EncoderOptions) -> Result<String> {
    let encoder = Encoder::new(options);
    match value.into() {
        Encodable::Tree(value) => encoder.encode_tree(value),
        Encodable::Plain(value) => encoder.encode_plain(value),
    }
}

struct Encoder<'a> {
    options: &'a EncoderOptions,
}

impl<'a> Encoder<'a> {
    fn new(options: &'a EncoderOptions) -> Self {
        Self { options }
    }

    fn encode_plain(&self, value: &serde_json::Value) -> Result<String> {
        if plain_depth(value) > self.options.max_depth {
            return Err(self.depth_exceeded());
        }
        self.write(value)
    }

    fn encode_tree(&self, top: &Value) -> Result<String> {
        if !top.is_composite() {
            return self.write(&top.to_plain());
        }

        let mut path = Vec::new();
        match self.resolve(top, 0, true, &mut path)? {
            serde_json::Value::String(text) => Ok(text),
            other => self.write(&other),
        }
    }

    /// Resolve `node`, whose parent sits at level `parent`, children first.
    ///
    /// The top node and embedded nodes come back as `Value::String` holding their
    /// serialized text; native nodes come back as inline plain structures.
    /// `path` holds the ancestors of `node`.
    fn resolve<'v>(
        &self,
        node: &'v Value,
        parent: usize,
        is_top: bool,
        path: &mut Vec<&'v Value>,
    ) -> Result<serde_json::Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.resolve_node(node, parent, is_top, path)
        })
    }

    fn resolve_node<'v>(
        &self,
        node: &'v Value,
        parent: usize,
        is_top: bool,
        path: &mut Vec<&'v Value>,
    ) -> Result<serde_json::Value> {
        let quote = is_top || node.is_embedded_origin();

        // An embedded node sits one hop below its parent, as on decode.
        let level = if node.is_embedded_origin() && !is_top {
            parent + 2
        } else {
            parent + 1
        };

        let plain = match node {
            Value::Array(arr) => {
                self.enter(node, level, path)?;
                let items = arr
                    .items()
                    .iter()
                    .map(|item| self.resolve(item, level, false, path))
                    .collect::<Result<Vec<_>>>()?;
                path.pop();
                serde_json::Value::Array(items)
            }
            Value::Object(obj) => {
                self.enter(node, level, path)?;
                let map = obj
                    .iter()
                    .map(|(k, v)| {
                        self.resolve(v, level, false, path)
                            .map(|v| (k.clone(), v))
                    })
                    .collect::<Result<serde_json::Map<_, _>>>()?;
                path.pop();
                serde_json::Value::Object(map)
            }
            scalar => return Ok(scalar.to_plain()),
        };

        if quote {
            Ok(serde_json::Value::String(self.write(&plain)?))
        } else {
            Ok(plain)
        }
    }

    /// Check depth and cycles before descending into `node`.
    fn enter<'v>(&self, node: &'v Value, level: usize, path: &mut Vec<&'v Value>) -> Result<()> {
        if level > self.options.max_depth {
            return Err(self.depth_exceeded());
        }
        if path.iter().any(|ancestor| std::ptr::eq(*ancestor, node)) {
            debug!("cycle at level {}", level);
            return Err(Error::CycleDetected);
        }
        path.push(node);
        Ok(())
    }

    fn depth_exceeded(&self) -> Error {
        debug!("nesting exceeds {} levels", self.options.max_depth);
        Error::DepthExceeded {
            max_depth: self.options.max_depth,
        }
    }

    /// Serialize plain JSON with the configured formatting
    fn write(&self, value: &serde_json::Value) -> Result<String> {
        if !self.options.pretty {
            return serde_json::to_string(value).map_err(|e| Error::Serialize(e.to_string()));
        }

        let indent = " ".repeat(self.options.indent);
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value
            .serialize(&mut ser)
            .map_err(|e| Error::Serialize(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| Error::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Array, Object};
    use serde_json::json;

    fn nested(inner_embedded: bool) -> Value {
        let inner = Value::from_plain(json!({"b": 2}), inner_embedded).unwrap();
        Value::Object([("a", inner)].into_iter().collect::<Object>())
    }

    #[test]
    fn test_encode_like_serde_json() {
        let opts = EncoderOptions::default();
        for value in [
            json!("null"),
            json!(""),
            json!(1),
            json!("abc"),
            json!([1, 2, 3]),
            json!({"a": 1, "b": [2, 3], "c": {"d": 4}}),
        ] {
            assert_eq!(encode(&value, &opts).unwrap(), value.to_string());
        }
    }

    #[test]
    fn test_encode_scalar_tree() {
        let opts = EncoderOptions::default();
        assert_eq!(encode(&Value::Null, &opts).unwrap(), "null");
        assert_eq!(encode(&Value::from("a\"b"), &opts).unwrap(), r#""a\"b""#);
        assert_eq!(encode(&Value::from(1.5), &opts).unwrap(), "1.5");
    }

    #[test]
    fn test_encode_normal_nested_json() {
        let json = encode(&nested(false), &EncoderOptions::default()).unwrap();
        assert_eq!(json, r#"{"a":{"b":2}}"#);
    }

    #[test]
    fn test_encode_keeps_inside_json() {
        let json = encode(&nested(true), &EncoderOptions::default()).unwrap();
        assert_eq!(json, r#"{"a":"{\"b\":2}"}"#);
    }

    #[test]
    fn test_encode_plain_conversion_expands() {
        let json = encode(&nested(true).to_plain(), &EncoderOptions::default()).unwrap();
        assert_eq!(json, r#"{"a":{"b":2}}"#);
    }

    #[test]
    fn test_encode_embedded_top_is_not_double_quoted() {
        let value = Value::from_plain(json!([1, 2]), true).unwrap();
        assert_eq!(encode(&value, &EncoderOptions::default()).unwrap(), "[1,2]");
    }

    #[test]
    fn test_encode_embedded_inside_embedded() {
        let inner = Value::from_plain(json!([1]), true).unwrap();
        let middle = Value::Object([("x", inner)].into_iter().collect::<Object>())
            .with_origin(true);
        let top = Value::Object([("m", middle)].into_iter().collect::<Object>());
        let json = encode(&top, &EncoderOptions::default()).unwrap();
        assert_eq!(json, r#"{"m":"{\"x\":\"[1]\"}"}"#);
    }

    #[test]
    fn test_encode_native_inside_embedded_stays_inline() {
        let mut value = Value::from_plain(json!({"a": {"b": [1]}}), false).unwrap();
        let a = value.remove("a").unwrap().with_origin(true);
        value.set("a", a).unwrap();
        let json = encode(&value, &EncoderOptions::default()).unwrap();
        assert_eq!(json, r#"{"a":"{\"b\":[1]}"}"#);
    }

    #[test]
    fn test_encode_pretty() {
        let opts = EncoderOptions {
            pretty: true,
            indent: 4,
            ..EncoderOptions::default()
        };
        let json = encode(&nested(false), &opts).unwrap();
        assert_eq!(json, "{\n    \"a\": {\n        \"b\": 2\n    }\n}");
    }

    #[test]
    fn test_encode_depth_limit() {
        let opts = EncoderOptions {
            max_depth: 2,
            ..EncoderOptions::default()
        };
        assert!(encode(&nested(false), &opts).is_ok());
        assert_eq!(
            encode(&nested(true), &opts),
            Err(Error::DepthExceeded { max_depth: 2 })
        );
        assert_eq!(
            encode(&json!([[[1]]]), &opts),
            Err(Error::DepthExceeded { max_depth: 2 })
        );
    }

    #[test]
    fn test_encode_at_default_depth_limit() {
        let mut value = Value::Array(Array::default());
        for _ in 1..DEFAULT_MAX_DEPTH {
            value = Value::Array([value].into_iter().collect());
        }
        let json = encode(&value, &EncoderOptions::default()).unwrap();
        let depth = DEFAULT_MAX_DEPTH;
        assert_eq!(json, format!("{}{}", "[".repeat(depth), "]".repeat(depth)));

        let deeper = Value::Array([value].into_iter().collect());
        assert_eq!(
            encode(&deeper, &EncoderOptions::default()),
            Err(Error::DepthExceeded { max_depth: DEFAULT_MAX_DEPTH })
        );
    }

    #[test]
    fn test_encode_does_not_mutate_tree() {
        let value = nested(true);
        let before = value.clone();
        let first = encode(&value, &EncoderOptions::default()).unwrap();
        let second = encode(&value, &EncoderOptions::default()).unwrap();
        assert_eq!(value, before);
        assert_eq!(first, second);
    }
}
