//! Mapping-shaped synced collection.

use crate::collection::{
    mutate_at, read_at, reload_root, Applied, DocumentBuilder, PathSegment, SharedRoot,
};
use crate::error::{Error, Result};
use crate::key::{normalize, RawKey};
use serde_json::Value;
use std::path::Path;

/// A string-keyed mapping mirrored to a persistent JSON object.
///
/// Every mutation updates the in-memory document and immediately
/// re-serializes and writes the *entire* root document — even when this
/// handle points at a nested object, the write happens at the root. A failed
/// write leaves the mutated value in the cache; call [`reload`](Self::reload)
/// to resynchronize with what's actually on disk.
///
/// Handles are cheap to clone and all clones share one root document.
/// The internal lock makes shared access memory-safe, but concurrent writers
/// are not otherwise coordinated: serialize mutations externally if ordering
/// matters. Independent collections opened over the same file are entirely
/// unaware of each other — last completed write wins.
#[derive(Clone)]
pub struct SyncedDict {
    root: SharedRoot,
    path: Vec<PathSegment>,
}

impl SyncedDict {
    /// Open (or create) a dict bound to the JSON file at `path`.
    ///
    /// With `write_concern` set, writes are durable (temp file + atomic
    /// rename); otherwise they overwrite in place. An existing file whose
    /// root is not an object fails with [`Error::Validation`]. A missing
    /// file starts the dict empty; nothing is written until the first
    /// mutation.
    pub fn open(path: impl AsRef<Path>, write_concern: bool) -> Result<Self> {
        DocumentBuilder::new(path)
            .write_concern(write_concern)
            .open_dict()
    }

    /// Start configuring a dict. Call
    /// [`.open_dict()`](DocumentBuilder::open_dict) when ready.
    pub fn builder(path: impl AsRef<Path>) -> DocumentBuilder {
        DocumentBuilder::new(path)
    }

    pub(crate) fn from_root(root: SharedRoot, path: Vec<PathSegment>) -> Self {
        Self { root, path }
    }

    // ---- reads ----

    /// Get the value for `key`, or `None` if absent. Served from the cache;
    /// no I/O. Lookup never coerces: a key stored via legacy coercion is
    /// only reachable under its string form.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.with_map(|map| map.get(key).cloned())
    }

    /// `true` if the key exists.
    pub fn contains_key(&self, key: &str) -> Result<bool> {
        self.with_map(|map| map.contains_key(key))
    }

    /// Number of entries.
    pub fn len(&self) -> Result<usize> {
        self.with_map(|map| map.len())
    }

    /// `true` when the dict has no entries.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Snapshot of all keys, in document order. Taken at call time; later
    /// mutations don't show up in an already-returned snapshot.
    pub fn keys(&self) -> Result<Vec<String>> {
        self.with_map(|map| map.keys().cloned().collect())
    }

    /// Snapshot of all values, in document order.
    pub fn values(&self) -> Result<Vec<Value>> {
        self.with_map(|map| map.values().cloned().collect())
    }

    /// Snapshot of all key-value pairs, in document order.
    pub fn items(&self) -> Result<Vec<(String, Value)>> {
        self.with_map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    /// Plain JSON snapshot of this dict (the subtree this handle points at).
    pub fn to_base(&self) -> Result<Value> {
        read_at(&self.root, &self.path, Value::clone)
    }

    /// Name of the resource this dict's root document is bound to.
    pub fn resource(&self) -> String {
        self.root.read().backend.resource()
    }

    // ---- writes ----

    /// Insert a key-value pair and commit, returning the previous value if
    /// the key existed.
    ///
    /// The key is normalized first: non-string keys are coerced to text (with
    /// a deprecation notice) or rejected, depending on the key policy the
    /// dict was opened with. Normalization failures happen before anything
    /// is written.
    pub fn insert(&self, key: impl Into<RawKey>, value: impl Into<Value>) -> Result<Option<Value>> {
        let key = self.normalize_key(&key.into())?;
        let value = value.into();
        self.mutate(move |map| Ok(map.insert(key, value)))
    }

    /// Remove a key and commit, returning its value if it was present.
    /// Removing an absent key is a no-op and doesn't touch the file.
    pub fn remove(&self, key: &str) -> Result<Option<Value>> {
        self.mutate_if(|map| {
            Ok(match map.remove(key) {
                Some(v) => Applied::Changed(Some(v)),
                None => Applied::Noop(None),
            })
        })
    }

    /// Drop all entries and commit.
    pub fn clear(&self) -> Result<()> {
        self.mutate(|map| {
            map.clear();
            Ok(())
        })
    }

    /// Bulk-insert from an iterator with a single commit at the end.
    ///
    /// All keys are normalized up front, so a bad key fails the whole batch
    /// before any of it lands in the cache or on disk.
    pub fn extend<K, V, I>(&self, iter: I) -> Result<()>
    where
        K: Into<RawKey>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut batch = Vec::new();
        for (k, v) in iter {
            batch.push((self.normalize_key(&k.into())?, v.into()));
        }
        self.mutate(move |map| {
            for (k, v) in batch {
                map.insert(k, v);
            }
            Ok(())
        })
    }

    /// Return the existing value for `key`, or insert `default` and return
    /// it. Only writes when the key was actually missing.
    pub fn get_or_insert(&self, key: impl Into<RawKey>, default: impl Into<Value>) -> Result<Value> {
        let key = self.normalize_key(&key.into())?;
        let value = default.into();
        self.mutate_if(move |map| {
            if let Some(v) = map.get(&key) {
                return Ok(Applied::Noop(v.clone()));
            }
            let ret = value.clone();
            map.insert(key, value);
            Ok(Applied::Changed(ret))
        })
    }

    // ---- nesting ----

    /// Handle to the nested object stored at `key`. Mutations through the
    /// child commit the whole root document.
    ///
    /// The handle tracks the slot, not the value: if the slot is later
    /// removed or replaced with a non-object, the handle goes stale and its
    /// operations fail with [`Error::Validation`].
    pub fn dict(&self, key: &str) -> Result<SyncedDict> {
        let child = self.child_path(key, "object", Value::is_object)?;
        Ok(SyncedDict::from_root(self.root.clone(), child))
    }

    /// Handle to the nested array stored at `key`.
    pub fn list(&self, key: &str) -> Result<crate::SyncedList> {
        let child = self.child_path(key, "array", Value::is_array)?;
        Ok(crate::SyncedList::from_root(self.root.clone(), child))
    }

    // ---- persistence ----

    /// Re-read the resource and replace the entire in-memory document,
    /// discarding uncommitted local state. Called on a nested handle this
    /// still reloads the whole root. Fails with [`Error::Validation`] if the
    /// stored root shape doesn't match.
    pub fn reload(&self) -> Result<()> {
        reload_root(&self.root)
    }

    // ---- internal ----

    fn normalize_key(&self, key: &RawKey) -> Result<String> {
        let policy = self.root.read().key_policy;
        normalize(key, policy)
    }

    fn with_map<T>(&self, f: impl FnOnce(&serde_json::Map<String, Value>) -> T) -> Result<T> {
        read_at(&self.root, &self.path, |node| {
            node.as_object()
                .map(f)
                .ok_or_else(|| Error::Validation("stale handle: expected an object".into()))
        })?
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut serde_json::Map<String, Value>) -> Result<T>,
    ) -> Result<T> {
        self.mutate_if(|map| f(map).map(Applied::Changed))
    }

    fn mutate_if<T>(
        &self,
        f: impl FnOnce(&mut serde_json::Map<String, Value>) -> Result<Applied<T>>,
    ) -> Result<T> {
        mutate_at(&self.root, &self.path, |node| match node.as_object_mut() {
            Some(map) => f(map),
            None => Err(Error::Validation("stale handle: expected an object".into())),
        })
    }

    fn child_path(
        &self,
        key: &str,
        expected: &str,
        check: impl Fn(&Value) -> bool,
    ) -> Result<Vec<PathSegment>> {
        let ok = self.with_map(|map| map.get(key).map(|v| check(v)))?;
        match ok {
            Some(true) => {
                let mut path = self.path.clone();
                path.push(PathSegment::Key(key.to_owned()));
                Ok(path)
            }
            Some(false) => Err(Error::Validation(format!(
                "value at \"{key}\" is not an {expected}"
            ))),
            None => Err(Error::Validation(format!("no value at \"{key}\""))),
        }
    }
}

impl PartialEq<Value> for SyncedDict {
    fn eq(&self, other: &Value) -> bool {
        self.to_base().map(|v| v == *other).unwrap_or(false)
    }
}

impl std::fmt::Debug for SyncedDict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncedDict")
            .field("resource", &self.resource())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
