//! Core synced-collection plumbing shared by [`SyncedDict`](crate::SyncedDict)
//! and [`SyncedList`](crate::SyncedList).
//!
//! One root document lives behind an `Arc<RwLock<..>>` together with its
//! backend. Collection handles hold the shared root plus a path into the
//! document; nested handles are just deeper paths over the same root. Any
//! mutation anywhere in the tree re-serializes the whole root document and
//! hands it to the backend — there is no partial-document patching, so the
//! cost of a mutation grows with the document, by design.
//!
//! Mutation order is cache-first: the in-memory document is updated, then the
//! write is attempted. A failed write leaves the mutated cache in place and
//! propagates the error; call `reload` to resynchronize with disk truth.

use crate::backend::{shape_error, JsonFileBackend, StorageBackend};
use crate::error::{Error, Result};
use crate::key::KeyPolicy;
use crate::serializer::JsonSerializer;
use parking_lot::RwLock;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Root shape fixed at construction: object for dicts, array for lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Object,
    Array,
}

impl Shape {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Shape::Object => "object",
            Shape::Array => "array",
        }
    }

    pub(crate) fn empty(self) -> Value {
        match self {
            Shape::Object => Value::Object(serde_json::Map::new()),
            Shape::Array => Value::Array(Vec::new()),
        }
    }

    pub(crate) fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Shape::Object, Value::Object(_)) | (Shape::Array, Value::Array(_))
        )
    }
}

/// One step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathSegment {
    Key(String),
    Index(usize),
}

/// The root document plus its backend binding. Shared by every handle over
/// the same document tree.
pub(crate) struct Root {
    pub(crate) backend: Box<dyn StorageBackend>,
    pub(crate) doc: Value,
    pub(crate) shape: Shape,
    pub(crate) key_policy: KeyPolicy,
}

pub(crate) type SharedRoot = Arc<RwLock<Root>>;

/// Walk `path` down from `doc`, immutably.
///
/// Fails with a validation error when a segment no longer resolves — the
/// handle has gone stale because its slot was removed or retyped.
pub(crate) fn resolve<'a>(doc: &'a Value, path: &[PathSegment]) -> Result<&'a Value> {
    let mut node = doc;
    for seg in path {
        node = match (seg, node) {
            (PathSegment::Key(k), Value::Object(map)) => map.get(k).ok_or_else(|| stale(seg))?,
            (PathSegment::Index(i), Value::Array(items)) => items.get(*i).ok_or_else(|| stale(seg))?,
            _ => return Err(stale(seg)),
        };
    }
    Ok(node)
}

/// Walk `path` down from `doc`, mutably.
pub(crate) fn resolve_mut<'a>(doc: &'a mut Value, path: &[PathSegment]) -> Result<&'a mut Value> {
    let mut node = doc;
    for seg in path {
        node = match (seg, node) {
            (PathSegment::Key(k), Value::Object(map)) => map.get_mut(k).ok_or_else(|| stale(seg))?,
            (PathSegment::Index(i), Value::Array(items)) => {
                items.get_mut(*i).ok_or_else(|| stale(seg))?
            }
            _ => return Err(stale(seg)),
        };
    }
    Ok(node)
}

fn stale(seg: &PathSegment) -> Error {
    Error::Validation(format!("stale handle: {seg:?} no longer resolves"))
}

/// Read-only access to the node at `path`. No I/O.
pub(crate) fn read_at<T>(
    root: &SharedRoot,
    path: &[PathSegment],
    f: impl FnOnce(&Value) -> T,
) -> Result<T> {
    let guard = root.read();
    let node = resolve(&guard.doc, path)?;
    Ok(f(node))
}

/// Outcome of a mutation closure: whether the document actually changed.
/// `Noop` skips the commit, so operations like removing an absent key never
/// rewrite an unchanged document.
pub(crate) enum Applied<T> {
    Changed(T),
    Noop(T),
}

/// Mutate the node at `path`, then commit the whole root document.
///
/// The closure runs before the write, under the same lock acquisition as
/// the commit; if the write fails the in-memory mutation is NOT rolled back
/// and the error propagates. If the closure itself fails (bad key, bad
/// index) or reports [`Applied::Noop`], nothing is written and the cache is
/// untouched.
pub(crate) fn mutate_at<T>(
    root: &SharedRoot,
    path: &[PathSegment],
    f: impl FnOnce(&mut Value) -> Result<Applied<T>>,
) -> Result<T> {
    let mut guard = root.write();
    let Root { backend, doc, .. } = &mut *guard;
    let node = resolve_mut(doc, path)?;
    match f(node)? {
        Applied::Changed(out) => {
            backend.write(doc)?;
            Ok(out)
        }
        Applied::Noop(out) => Ok(out),
    }
}

/// Re-read the backend and replace the entire in-memory document,
/// discarding any uncommitted local state. A missing resource resets the
/// document to empty. Fails with a validation error when the stored root
/// shape doesn't match the collection type.
pub(crate) fn reload_root(root: &SharedRoot) -> Result<()> {
    let mut guard = root.write();
    let loaded = match guard.backend.read()? {
        Some(value) => {
            if !guard.shape.matches(&value) {
                return Err(shape_error(
                    guard.shape.name(),
                    &value,
                    &guard.backend.resource(),
                ));
            }
            value
        }
        None => guard.shape.empty(),
    };
    guard.doc = loaded;
    Ok(())
}

/// Load (or start empty) a root document of the given shape.
pub(crate) fn open_root(
    backend: Box<dyn StorageBackend>,
    shape: Shape,
    key_policy: KeyPolicy,
) -> Result<SharedRoot> {
    let doc = match backend.read()? {
        Some(value) => {
            if !shape.matches(&value) {
                return Err(shape_error(shape.name(), &value, &backend.resource()));
            }
            value
        }
        None => shape.empty(),
    };
    Ok(Arc::new(RwLock::new(Root {
        backend,
        doc,
        shape,
        key_policy,
    })))
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a synced collection over one resource.
///
/// ```rust,no_run
/// use synced_json::{DocumentBuilder, KeyPolicy};
///
/// let doc = DocumentBuilder::new("state.json")
///     .write_concern(true)
///     .pretty(true)
///     .key_policy(KeyPolicy::Reject)
///     .open_dict()
///     .unwrap();
/// ```
pub struct DocumentBuilder {
    path: PathBuf,
    write_concern: bool,
    pretty: bool,
    key_policy: KeyPolicy,
    backend: Option<Box<dyn StorageBackend>>,
}

impl DocumentBuilder {
    /// Start configuring a collection bound to the JSON file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_concern: false,
            pretty: false,
            key_policy: KeyPolicy::default(),
            backend: None,
        }
    }

    /// Durable writes: temp file + flush + atomic rename (default: plain
    /// overwrite).
    pub fn write_concern(mut self, yes: bool) -> Self {
        self.write_concern = yes;
        self
    }

    /// Write human-readable JSON with indentation (default: compact).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// How non-string mapping keys are handled (default: [`KeyPolicy::Coerce`]).
    pub fn key_policy(mut self, policy: KeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }

    /// Persist through a caller-supplied backend instead of a JSON file.
    /// `path`, `write_concern`, and `pretty` are ignored when set.
    pub fn backend(mut self, backend: Box<dyn StorageBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Open a mapping-shaped collection.
    pub fn open_dict(self) -> Result<crate::SyncedDict> {
        let (backend, key_policy) = self.into_backend();
        let root = open_root(backend, Shape::Object, key_policy)?;
        Ok(crate::SyncedDict::from_root(root, Vec::new()))
    }

    /// Open a sequence-shaped collection.
    pub fn open_list(self) -> Result<crate::SyncedList> {
        let (backend, key_policy) = self.into_backend();
        let root = open_root(backend, Shape::Array, key_policy)?;
        Ok(crate::SyncedList::from_root(root, Vec::new()))
    }

    fn into_backend(self) -> (Box<dyn StorageBackend>, KeyPolicy) {
        let DocumentBuilder {
            path,
            write_concern,
            pretty,
            key_policy,
            backend,
        } = self;
        let backend = backend.unwrap_or_else(move || {
            let serializer = if pretty {
                JsonSerializer::pretty()
            } else {
                JsonSerializer::new()
            };
            Box::new(JsonFileBackend::with_serializer(
                &path,
                write_concern,
                Box::new(serializer),
            ))
        });
        (backend, key_policy)
    }
}

impl std::fmt::Debug for DocumentBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentBuilder")
            .field("path", &self.path)
            .field("write_concern", &self.write_concern)
            .field("pretty", &self.pretty)
            .field("key_policy", &self.key_policy)
            .finish_non_exhaustive()
    }
}
