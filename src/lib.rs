//! File-synced JSON document collections.
//!
//! A [`SyncedDict`] or [`SyncedList`] mirrors an in-memory JSON document to a
//! file: every mutation updates the cache and immediately rewrites the whole
//! document, optionally through a durable temp-file-and-rename path.
//!
//! ```rust,no_run
//! use synced_json::SyncedDict;
//!
//! let doc = SyncedDict::open("state.json", true).unwrap();
//! doc.insert("hello", "world").unwrap();
//! assert_eq!(doc.get("hello").unwrap(), Some("world".into()));
//! ```
//!
//! Nested objects and arrays are reached through handles that share the same
//! root, so mutating a nested value also rewrites the root document:
//!
//! ```rust,no_run
//! # use synced_json::SyncedDict;
//! # let doc = SyncedDict::open("state.json", true).unwrap();
//! doc.insert("tags", serde_json::json!(["a", "b"])).unwrap();
//! doc.list("tags").unwrap().push("c").unwrap();
//! ```
//!
//! **Uncoordinated by design.** Collections opened over the same file — in
//! one process or several — don't know about each other: no file locking, no
//! conflict detection. Concurrent writers race and the last completed write
//! wins. Every mutation rewrites the whole document, so write cost grows
//! with document size.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod attr;
pub mod backend;
pub mod collection;
pub mod dict;
pub mod error;
pub mod key;
pub mod list;
pub mod persist;
pub mod serializer;

pub use attr::{AttrDict, AttrList, RESERVED_NAMES};
pub use backend::{JsonFileBackend, StorageBackend};
pub use collection::DocumentBuilder;
pub use dict::SyncedDict;
pub use error::{Error, Result};
pub use key::{KeyPolicy, RawKey};
pub use list::SyncedList;
pub use serializer::{JsonSerializer, Serializer};

pub use serde_json::Value;
