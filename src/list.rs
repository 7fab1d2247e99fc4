//! Sequence-shaped synced collection.

use crate::collection::{
    mutate_at, read_at, reload_root, Applied, DocumentBuilder, PathSegment, SharedRoot,
};
use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// A sequence mirrored to a persistent JSON array.
///
/// Same persistence model as [`SyncedDict`](crate::SyncedDict): every
/// mutation commits the entire root document, a failed write leaves the
/// cache mutated, and nested handles share one root. Positional handles
/// track an index, not a value — removing or reordering elements can leave
/// previously-taken nested handles pointing at a different slot, or at
/// nothing. Take nested handles fresh when in doubt.
#[derive(Clone)]
pub struct SyncedList {
    root: SharedRoot,
    path: Vec<PathSegment>,
}

impl SyncedList {
    /// Open (or create) a list bound to the JSON file at `path`.
    ///
    /// An existing file whose root is not an array fails with
    /// [`Error::Validation`]. A missing file starts the list empty.
    pub fn open(path: impl AsRef<Path>, write_concern: bool) -> Result<Self> {
        DocumentBuilder::new(path)
            .write_concern(write_concern)
            .open_list()
    }

    /// Start configuring a list. Call
    /// [`.open_list()`](DocumentBuilder::open_list) when ready.
    pub fn builder(path: impl AsRef<Path>) -> DocumentBuilder {
        DocumentBuilder::new(path)
    }

    pub(crate) fn from_root(root: SharedRoot, path: Vec<PathSegment>) -> Self {
        Self { root, path }
    }

    // ---- reads ----

    /// Get the value at `index`, or `None` if out of bounds. No I/O.
    pub fn get(&self, index: usize) -> Result<Option<Value>> {
        self.with_items(|items| items.get(index).cloned())
    }

    /// Number of elements.
    pub fn len(&self) -> Result<usize> {
        self.with_items(|items| items.len())
    }

    /// `true` when the list has no elements.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Snapshot of all elements. Taken at call time; later mutations don't
    /// show up in an already-returned snapshot.
    pub fn iter(&self) -> Result<Vec<Value>> {
        self.with_items(|items| items.to_vec())
    }

    /// Plain JSON snapshot of this list (the subtree this handle points at).
    pub fn to_base(&self) -> Result<Value> {
        read_at(&self.root, &self.path, Value::clone)
    }

    /// Name of the resource this list's root document is bound to.
    pub fn resource(&self) -> String {
        self.root.read().backend.resource()
    }

    // ---- writes ----

    /// Append an element and commit.
    pub fn push(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.mutate(move |items| {
            items.push(value);
            Ok(())
        })
    }

    /// Replace the element at `index` and commit. Fails with
    /// [`Error::Validation`] (before writing) if `index` is out of bounds.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.mutate(move |items| match items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(out_of_bounds(index, items.len())),
        })
    }

    /// Insert an element at `index`, shifting the rest right, and commit.
    /// `index == len` appends. Fails if `index > len`.
    pub fn insert(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.mutate(move |items| {
            if index > items.len() {
                return Err(out_of_bounds(index, items.len()));
            }
            items.insert(index, value);
            Ok(())
        })
    }

    /// Remove and return the element at `index`, committing. Fails with
    /// [`Error::Validation`] (before writing) if `index` is out of bounds.
    pub fn remove(&self, index: usize) -> Result<Value> {
        self.mutate(move |items| {
            if index >= items.len() {
                return Err(out_of_bounds(index, items.len()));
            }
            Ok(items.remove(index))
        })
    }

    /// Remove and return the last element, or `None` on an empty list
    /// (no write in that case).
    pub fn pop(&self) -> Result<Option<Value>> {
        self.mutate_if(|items| {
            Ok(match items.pop() {
                Some(v) => Applied::Changed(Some(v)),
                None => Applied::Noop(None),
            })
        })
    }

    /// Drop all elements and commit.
    pub fn clear(&self) -> Result<()> {
        self.mutate(|items| {
            items.clear();
            Ok(())
        })
    }

    /// Append every element from an iterator with a single commit at the end.
    pub fn extend<V, I>(&self, iter: I) -> Result<()>
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let batch: Vec<Value> = iter.into_iter().map(Into::into).collect();
        self.mutate(move |items| {
            items.extend(batch);
            Ok(())
        })
    }

    // ---- nesting ----

    /// Handle to the nested object stored at `index`.
    pub fn dict(&self, index: usize) -> Result<crate::SyncedDict> {
        let child = self.child_path(index, "object", Value::is_object)?;
        Ok(crate::SyncedDict::from_root(self.root.clone(), child))
    }

    /// Handle to the nested array stored at `index`.
    pub fn list(&self, index: usize) -> Result<SyncedList> {
        let child = self.child_path(index, "array", Value::is_array)?;
        Ok(SyncedList::from_root(self.root.clone(), child))
    }

    // ---- persistence ----

    /// Re-read the resource and replace the entire in-memory document,
    /// discarding uncommitted local state. Reloads the whole root even when
    /// called on a nested handle.
    pub fn reload(&self) -> Result<()> {
        reload_root(&self.root)
    }

    // ---- internal ----

    fn with_items<T>(&self, f: impl FnOnce(&Vec<Value>) -> T) -> Result<T> {
        read_at(&self.root, &self.path, |node| {
            node.as_array()
                .map(f)
                .ok_or_else(|| Error::Validation("stale handle: expected an array".into()))
        })?
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Value>) -> Result<T>) -> Result<T> {
        self.mutate_if(|items| f(items).map(Applied::Changed))
    }

    fn mutate_if<T>(
        &self,
        f: impl FnOnce(&mut Vec<Value>) -> Result<Applied<T>>,
    ) -> Result<T> {
        mutate_at(&self.root, &self.path, |node| match node.as_array_mut() {
            Some(items) => f(items),
            None => Err(Error::Validation("stale handle: expected an array".into())),
        })
    }

    fn child_path(
        &self,
        index: usize,
        expected: &str,
        check: impl Fn(&Value) -> bool,
    ) -> Result<Vec<PathSegment>> {
        let (ok, len) =
            self.with_items(|items| (items.get(index).map(|v| check(v)), items.len()))?;
        match ok {
            Some(true) => {
                let mut path = self.path.clone();
                path.push(PathSegment::Index(index));
                Ok(path)
            }
            Some(false) => Err(Error::Validation(format!(
                "value at index {index} is not an {expected}"
            ))),
            None => Err(out_of_bounds(index, len)),
        }
    }
}

fn out_of_bounds(index: usize, len: usize) -> Error {
    Error::Validation(format!("index {index} out of bounds (len {len})"))
}

impl PartialEq<Value> for SyncedList {
    fn eq(&self, other: &Value) -> bool {
        self.to_base().map(|v| v == *other).unwrap_or(false)
    }
}

impl std::fmt::Debug for SyncedList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncedList")
            .field("resource", &self.resource())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
