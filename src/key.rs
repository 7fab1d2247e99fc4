//! Mapping-key normalization.
//!
//! JSON object keys must be strings. Non-string keys (integers, booleans,
//! null) are accepted as a legacy convenience and coerced to their textual
//! form with a deprecation notice, or rejected outright — pick with
//! [`KeyPolicy`]. Coercion happens at this one boundary so every mapping
//! operation inherits identical collision behavior: `0` and `"0"` land on
//! the same stored key and the later write wins.

use crate::error::{Error, Result};
use serde_json::Value;

/// A candidate mapping key before normalization.
///
/// Built via `From` impls so call sites can pass `&str`, `String`, `i64`,
/// `bool`, or `()` (null) directly to [`SyncedDict::insert`](crate::SyncedDict::insert).
#[derive(Debug, Clone, PartialEq)]
pub enum RawKey {
    /// Already a string; used as-is.
    Str(String),
    /// Integer key, coerced to its decimal form under [`KeyPolicy::Coerce`].
    Int(i64),
    /// Boolean key, coerced to `"true"` / `"false"`.
    Bool(bool),
    /// Null key, coerced to `"null"`.
    Null,
}

impl RawKey {
    /// Convert a JSON value into a candidate key.
    ///
    /// Only strings, integers, booleans, and null are candidate keys; arrays,
    /// objects, and non-integer numbers fail with [`Error::KeyType`].
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(RawKey::Str(s.clone())),
            Value::Number(n) => n.as_i64().map(RawKey::Int).ok_or_else(|| {
                Error::KeyType(format!("{n} is not an integer and cannot be used as a key"))
            }),
            Value::Bool(b) => Ok(RawKey::Bool(*b)),
            Value::Null => Ok(RawKey::Null),
            other => Err(Error::KeyType(format!(
                "keys must be str, int, bool or null, not {}",
                type_name(other)
            ))),
        }
    }
}

impl From<&str> for RawKey {
    fn from(s: &str) -> Self {
        RawKey::Str(s.to_owned())
    }
}

impl From<String> for RawKey {
    fn from(s: String) -> Self {
        RawKey::Str(s)
    }
}

impl From<i64> for RawKey {
    fn from(n: i64) -> Self {
        RawKey::Int(n)
    }
}

impl From<i32> for RawKey {
    fn from(n: i32) -> Self {
        RawKey::Int(n.into())
    }
}

impl From<bool> for RawKey {
    fn from(b: bool) -> Self {
        RawKey::Bool(b)
    }
}

impl From<()> for RawKey {
    fn from(_: ()) -> Self {
        RawKey::Null
    }
}

/// Whether non-string keys are coerced or rejected.
///
/// `Coerce` is the current default for compatibility with documents written
/// by older tooling; `Reject` is the intended future default.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Coerce non-string keys to text, emitting a deprecation notice via
    /// the `log` facade.
    #[default]
    Coerce,
    /// Fail non-string keys with [`Error::KeyType`].
    Reject,
}

/// Normalize a candidate key to the string form stored in the document.
pub fn normalize(key: &RawKey, policy: KeyPolicy) -> Result<String> {
    match key {
        RawKey::Str(s) => Ok(s.clone()),
        other => {
            let coerced = match other {
                RawKey::Int(n) => n.to_string(),
                RawKey::Bool(b) => b.to_string(),
                RawKey::Null => "null".to_owned(),
                RawKey::Str(_) => unreachable!(),
            };
            match policy {
                KeyPolicy::Coerce => {
                    log::warn!(
                        "use of {other:?} as key is deprecated and will be removed; \
                         stored as \"{coerced}\""
                    );
                    Ok(coerced)
                }
                KeyPolicy::Reject => Err(Error::KeyType(format!(
                    "keys must be strings, got {other:?}"
                ))),
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_pass_through() {
        assert_eq!(normalize(&"a".into(), KeyPolicy::Coerce).unwrap(), "a");
        assert_eq!(normalize(&"a".into(), KeyPolicy::Reject).unwrap(), "a");
    }

    #[test]
    fn coerce_textual_forms() {
        assert_eq!(normalize(&0.into(), KeyPolicy::Coerce).unwrap(), "0");
        assert_eq!(normalize(&true.into(), KeyPolicy::Coerce).unwrap(), "true");
        assert_eq!(normalize(&().into(), KeyPolicy::Coerce).unwrap(), "null");
    }

    #[test]
    fn reject_policy_fails_non_strings() {
        let err = normalize(&0.into(), KeyPolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::KeyType(_)));
    }

    #[test]
    fn from_json_rejects_compound_keys() {
        assert!(matches!(
            RawKey::from_json(&json!({"a": 1})),
            Err(Error::KeyType(_))
        ));
        assert!(matches!(
            RawKey::from_json(&json!([1])),
            Err(Error::KeyType(_))
        ));
        assert!(matches!(
            RawKey::from_json(&json!(1.5)),
            Err(Error::KeyType(_))
        ));
        assert_eq!(RawKey::from_json(&json!(3)).unwrap(), RawKey::Int(3));
    }
}
