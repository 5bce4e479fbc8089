//! # embedded_json_rs
//!
//! Lossless decoding and encoding of JSON documents whose string values hold
//! JSON text of their own, such as `{"payload":"{\"id\":1}"}`.
//!
//! Decoding expands those strings into real arrays and objects and tags them as
//! embedded. Encoding writes tagged subtrees back as quoted JSON strings and
//! leaves everything else inline, so a decode/encode round trip reproduces the
//! original shape.
//!
//! ## Example
//!
//! ```rust
//! use embedded_json_rs::{decode, encode, DecoderOptions, EncoderOptions};
//!
//! let text = r#"{"id":7,"payload":"{\"tags\":[\"a\",\"b\"]}"}"#;
//!
//! let mut value = decode(text, &DecoderOptions::default()).unwrap();
//! let payload = value.get_mut("payload").unwrap();
//! assert!(payload.is_embedded_origin());
//! payload.set("seen", true).unwrap();
//!
//! let encoded = encode(&value, &EncoderOptions::default()).unwrap();
//! assert_eq!(
//!     encoded,
//!     r#"{"id":7,"payload":"{\"tags\":[\"a\",\"b\"],\"seen\":true}"}"#
//! );
//!
//! // Dropping provenance writes everything inline
//! let flat = encode(&value.to_plain(), &EncoderOptions::default()).unwrap();
//! assert_eq!(flat, r#"{"id":7,"payload":{"tags":["a","b"],"seen":true}}"#);
//! ```

mod common;
mod decoder;
mod encoder;
mod error;
mod value;

// Re-export public API
pub use common::{InvalidEmbedded, DEFAULT_MAX_DEPTH};
pub use decoder::{decode, DecoderOptions};
pub use encoder::{encode, Encodable, EncoderOptions};
pub use error::{Error, Result};
pub use value::{Array, Iter, Key, Object, Value};
