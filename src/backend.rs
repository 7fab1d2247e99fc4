//! Pluggable storage backends.
//!
//! Implement [`StorageBackend`] to persist the root document somewhere other
//! than a JSON file. One backend instance is bound to exactly one resource
//! and stores exactly one root document; it is injected into the collection
//! at construction time (no global registry).

use crate::error::{Error, Result};
use crate::persist::{atomic_replace, load, overwrite};
use crate::serializer::{JsonSerializer, Serializer};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reads and writes one serialized root document to a named resource.
///
/// `write` applies the backend's durability policy and must either persist
/// the complete document or fail with an error; partial success is not a
/// legal outcome to report.
pub trait StorageBackend: Send + Sync {
    /// Read the document, or `None` if the resource does not exist yet.
    fn read(&self) -> Result<Option<Value>>;

    /// Serialize and persist the whole document.
    fn write(&self, doc: &Value) -> Result<()>;

    /// Human-readable name of the resource, for error messages and logs.
    fn resource(&self) -> String;
}

/// File-backed JSON storage.
///
/// With `write_concern` set, every write goes to a flushed temp file that is
/// renamed over the original, so a crash never leaves partial content. Without
/// it, writes truncate-and-overwrite in place — cheaper, crash-unsafe.
///
/// No handle to the file is held between operations; each read/write opens
/// and closes the file on its own.
pub struct JsonFileBackend {
    path: PathBuf,
    write_concern: bool,
    serializer: Box<dyn Serializer>,
}

impl JsonFileBackend {
    /// Bind to `path` with the default compact JSON serializer.
    pub fn new(path: impl AsRef<Path>, write_concern: bool) -> Self {
        Self::with_serializer(path, write_concern, Box::new(JsonSerializer::new()))
    }

    /// Bind to `path` with a caller-supplied serializer.
    pub fn with_serializer(
        path: impl AsRef<Path>,
        write_concern: bool,
        serializer: Box<dyn Serializer>,
    ) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_concern,
            serializer,
        }
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonFileBackend {
    fn read(&self) -> Result<Option<Value>> {
        match load(&self.path)? {
            Some(bytes) => Ok(Some(self.serializer.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, doc: &Value) -> Result<()> {
        let bytes = self.serializer.serialize(doc)?;
        log::debug!(
            "writing {} bytes to {} (write_concern: {})",
            bytes.len(),
            self.path.display(),
            self.write_concern
        );
        if self.write_concern {
            atomic_replace(&self.path, &bytes)
        } else {
            overwrite(&self.path, &bytes)
        }
    }

    fn resource(&self) -> String {
        self.path.display().to_string()
    }
}

impl std::fmt::Debug for JsonFileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileBackend")
            .field("path", &self.path)
            .field("write_concern", &self.write_concern)
            .finish_non_exhaustive()
    }
}

/// Reports the expected vs found root shape as a validation error.
pub(crate) fn shape_error(expected: &str, found: &Value, resource: &str) -> Error {
    let found = match found {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
    };
    Error::Validation(format!(
        "expected root {expected} in {resource}, found {found}"
    ))
}
