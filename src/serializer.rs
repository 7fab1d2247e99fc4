//! Serialization layer. Defaults to JSON via serde_json.
//!
//! Implement [`Serializer`] if you need an augmented encoding (for example a
//! shim that widens non-standard numeric types before writing).

use crate::error::{Error, Result};
use serde_json::Value;

/// Converts a document to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode a document to bytes.
    fn serialize(&self, doc: &Value) -> Result<Vec<u8>>;

    /// Decode bytes back into a document.
    fn deserialize(&self, bytes: &[u8]) -> Result<Value>;
}

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with indentation — easier to read by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, doc: &Value) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(doc)
        } else {
            serde_json::to_vec(doc)
        };
        bytes.map_err(Error::from)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        serde_json::from_slice(bytes).map_err(Error::from)
    }
}
