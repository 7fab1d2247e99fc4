//! Attribute-style views over synced collections.
//!
//! Rust has no runtime attribute interception, so these are explicit
//! wrappers: [`AttrDict`] resolves a name by first checking a fixed table of
//! the wrapper's own operation names and then falling back to key lookup.
//! A stored key that happens to spell an operation name ([`RESERVED_NAMES`])
//! is reachable only through item-style access — a documented limitation,
//! not something the wrapper tries to paper over.

use crate::error::{Error, Result};
use crate::{SyncedDict, SyncedList};
use serde_json::Value;

/// Operation names that attribute access refuses to treat as keys.
pub const RESERVED_NAMES: &[&str] = &[
    "attr",
    "set_attr",
    "remove_attr",
    "get",
    "insert",
    "remove",
    "contains_key",
    "len",
    "is_empty",
    "keys",
    "values",
    "items",
    "iter",
    "clear",
    "extend",
    "get_or_insert",
    "dict",
    "list",
    "push",
    "set",
    "pop",
    "reload",
    "to_base",
    "resource",
    "open",
    "builder",
];

fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// [`SyncedDict`] with attribute-style accessors.
///
/// `d.attr("k")` and `d.get("k")` observe the same entry; `d.set_attr("k", v)`
/// has the same effect as `d.insert("k", v)`. The wrapper derefs to the
/// underlying dict, so the full item-style API stays available.
#[derive(Clone, Debug)]
pub struct AttrDict {
    inner: SyncedDict,
}

impl AttrDict {
    /// Wrap a dict in an attribute-access view.
    pub fn new(inner: SyncedDict) -> Self {
        Self { inner }
    }

    /// Read the attribute `name`.
    ///
    /// Fails with [`Error::Attribute`] when `name` is a reserved operation
    /// name (use item access instead) or when no such key is stored.
    pub fn attr(&self, name: &str) -> Result<Value> {
        if is_reserved(name) {
            return Err(Error::Attribute(format!(
                "\"{name}\" is an operation name; use item access"
            )));
        }
        self.inner
            .get(name)?
            .ok_or_else(|| Error::Attribute(format!("no attribute \"{name}\"")))
    }

    /// Write the attribute `name`. Same observable effect as
    /// [`SyncedDict::insert`] with a string key.
    pub fn set_attr(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        if is_reserved(name) {
            return Err(Error::Attribute(format!(
                "\"{name}\" is an operation name; use item access"
            )));
        }
        self.inner.insert(name, value)?;
        Ok(())
    }

    /// Remove the attribute `name`, returning its value.
    pub fn remove_attr(&self, name: &str) -> Result<Value> {
        if is_reserved(name) {
            return Err(Error::Attribute(format!(
                "\"{name}\" is an operation name; use item access"
            )));
        }
        self.inner
            .remove(name)?
            .ok_or_else(|| Error::Attribute(format!("no attribute \"{name}\"")))
    }

    /// Nested object at `key`, attribute-enabled.
    pub fn dict(&self, key: &str) -> Result<AttrDict> {
        Ok(AttrDict::new(self.inner.dict(key)?))
    }

    /// Nested array at `key`, attribute-enabled.
    pub fn list(&self, key: &str) -> Result<AttrList> {
        Ok(AttrList::new(self.inner.list(key)?))
    }
}

impl From<SyncedDict> for AttrDict {
    fn from(inner: SyncedDict) -> Self {
        Self::new(inner)
    }
}

impl std::ops::Deref for AttrDict {
    type Target = SyncedDict;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl PartialEq<Value> for AttrDict {
    fn eq(&self, other: &Value) -> bool {
        self.inner == *other
    }
}

/// [`SyncedList`] whose nested objects come back as [`AttrDict`]s.
///
/// Lists have no named members, so the view only changes what nesting
/// accessors return; everything else derefs to the underlying list.
#[derive(Clone, Debug)]
pub struct AttrList {
    inner: SyncedList,
}

impl AttrList {
    /// Wrap a list in an attribute-access view.
    pub fn new(inner: SyncedList) -> Self {
        Self { inner }
    }

    /// Nested object at `index`, attribute-enabled.
    pub fn dict(&self, index: usize) -> Result<AttrDict> {
        Ok(AttrDict::new(self.inner.dict(index)?))
    }

    /// Nested array at `index`, attribute-enabled.
    pub fn list(&self, index: usize) -> Result<AttrList> {
        Ok(AttrList::new(self.inner.list(index)?))
    }
}

impl From<SyncedList> for AttrList {
    fn from(inner: SyncedList) -> Self {
        Self::new(inner)
    }
}

impl std::ops::Deref for AttrList {
    type Target = SyncedList;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl PartialEq<Value> for AttrList {
    fn eq(&self, other: &Value) -> bool {
        self.inner == *other
    }
}
