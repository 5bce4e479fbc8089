//! JSON to value tree decoder with embedded-string expansion

use crate::common::{
    looks_like_json, nesting_depth, InvalidEmbedded, DEFAULT_MAX_DEPTH, STACK_GROWTH,
    STACK_RED_ZONE,
};
use crate::error::{Error, Result};
use crate::value::{Array, Object, Value};
use log::{debug, trace};
use serde::Deserialize;

/// Decoder configuration options
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// Nesting limit covering arrays, objects and embedded-string hops (default: 512)
    pub max_depth: usize,
    /// Expand string values that hold JSON (default: true)
    pub expand_embedded: bool,
    /// Handling of strings that start like JSON but do not parse (default: KeepString)
    pub invalid_embedded: InvalidEmbedded,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            expand_embedded: true,
            invalid_embedded: InvalidEmbedded::KeepString,
        }
    }
}

/// Decode JSON text, expanding string values that are themselves JSON.
///
/// A scalar document (including a string) is returned as-is.
pub fn decode(input: &str, options: &DecoderOptions) -> Result<Value> {
    Decoder::new(options).decode(input)
}

struct Decoder<'a> {
    options: &'a DecoderOptions,
}

impl<'a> Decoder<'a> {
    fn new(options: &'a DecoderOptions) -> Self {
        Self { options }
    }

    fn decode(&self, input: &str) -> Result<Value> {
        let plain = self.parse(input, 0)?;
        match plain {
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                self.materialize(plain, 0, false)
            }
            scalar => Ok(Value::from(scalar)),
        }
    }

    /// Parse `text` whose outermost container would sit at level `used + 1`.
    ///
    /// Nesting is measured on the raw text first, so the parser never recurses
    /// past `max_depth`. The parser runs on a growable stack.
    fn parse(&self, text: &str, used: usize) -> Result<serde_json::Value> {
        let max_depth = self.options.max_depth;
        if used + nesting_depth(text) > max_depth {
            debug!("nesting exceeds {} levels", max_depth);
            return Err(Error::DepthExceeded { max_depth });
        }

        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let value = serde_json::Value::deserialize(serde_stacker::Deserializer::new(&mut de))
            .map_err(|e| Error::ParseError(e.to_string()))?;
        de.end().map_err(|e| Error::ParseError(e.to_string()))?;
        Ok(value)
    }

    /// Convert a plain value whose parent sits at level `parent`.
    ///
    /// `embedded` applies to this node only; nested containers are native.
    fn materialize(
        &self,
        plain: serde_json::Value,
        parent: usize,
        embedded: bool,
    ) -> Result<Value> {
        let level = parent + 1;
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || match plain {
            serde_json::Value::String(s) => self.expand_string(s, parent),
            serde_json::Value::Array(items) => {
                let items = items
                    .into_iter()
                    .map(|item| self.materialize(item, level, false))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Array(Array::new(items, embedded)))
            }
            serde_json::Value::Object(map) => {
                let entries = map
                    .into_iter()
                    .map(|(k, v)| self.materialize(v, level, false).map(|v| (k, v)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Object(Object::new(entries, embedded)))
            }
            scalar => Ok(Value::from(scalar)),
        })
    }

    /// Expand a string leaf held by a container at level `parent`.
    ///
    /// The hop into the string's contents costs one level of the budget.
    fn expand_string(&self, text: String, parent: usize) -> Result<Value> {
        if !self.options.expand_embedded || !looks_like_json(&text) {
            return Ok(Value::String(text));
        }

        let hop = parent + 1;
        match self.parse(&text, hop) {
            // Text opening with a bracket only parses to an array or object.
            Ok(plain) => {
                trace!("expanding embedded JSON at level {}", hop);
                self.materialize(plain, hop, true)
            }
            Err(Error::ParseError(msg)) => {
                debug!(
                    "embedded JSON did not parse ({}), {:?}",
                    msg, self.options.invalid_embedded
                );
                match self.options.invalid_embedded {
                    InvalidEmbedded::KeepString => Ok(Value::String(text)),
                    InvalidEmbedded::Null => Ok(Value::Null),
                }
            }
            Err(e) => Err(e),
        }
    }
}
