//! Error type shared by the decoder, the encoder and the value accessors.

use std::fmt;

/// An error that can occur while decoding, encoding or editing a value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The input text is not valid JSON.
    ParseError(String),
    /// A composite value was requested from something that is not an array or object.
    /// Holds the kind that was rejected (`"null"`, `"boolean"`, `"number"`, `"string"`).
    InvalidConstruction(&'static str),
    /// Structural nesting plus embedded-string hops went past the configured limit.
    DepthExceeded { max_depth: usize },
    /// A node appears among its own ancestors. Each node owns its children, so
    /// only a tree built outside the safe API can produce this.
    CycleDetected,
    /// A key does not address a slot in the value (wrong key kind, index past the end,
    /// or a scalar receiver).
    InvalidKey(String),
    /// The JSON serializer failed to produce text.
    Serialize(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ParseError(msg) => write!(f, "Parse error: {}", msg),
            Error::InvalidConstruction(kind) => {
                write!(f, "Cannot build an array or object from {}", kind)
            }
            Error::DepthExceeded { max_depth } => {
                write!(f, "Nesting depth exceeds the limit of {}", max_depth)
            }
            Error::CycleDetected => write!(f, "Value tree contains a cycle"),
            Error::InvalidKey(key) => write!(f, "Invalid key: {}", key),
            Error::Serialize(msg) => write!(f, "Serialize error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
