//! Unified error type for all collection operations.

/// Things that can go wrong when using a synced collection.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// File system problem (read, write, rename). Never retried internally.
    Io(String),
    /// Failed to serialize the document to bytes.
    Serialize(String),
    /// Failed to deserialize bytes back into a document.
    Deserialize(String),
    /// Document structure doesn't match what the collection expects: wrong
    /// root shape on reload, index out of bounds, or a stale nested handle
    /// whose slot was removed or retyped.
    Validation(String),
    /// A key that cannot be normalized to a string (or a non-string key
    /// under [`KeyPolicy::Reject`](crate::key::KeyPolicy::Reject)).
    KeyType(String),
    /// Attribute access for a name that is neither a stored key nor
    /// reachable attribute-style (reserved operation names, missing keys).
    Attribute(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::Deserialize(msg) => write!(f, "deserialization error: {msg}"),
            Error::Validation(msg) => write!(f, "validation error: {msg}"),
            Error::KeyType(msg) => write!(f, "key type error: {msg}"),
            Error::Attribute(msg) => write!(f, "attribute error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() {
            Error::Deserialize(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
