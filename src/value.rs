//! Dynamic value representation for VDF data.
//!
//! VDF has exactly two kinds of values: quoted strings and nested objects.
//! [`Value`] models both and can be decoded from any VDF document whose
//! shape is not known at compile time.
//!
//! ## Examples
//!
//! ```rust
//! use serde_vdf::{from_str, Value};
//!
//! let value: Value = from_str(r#"{ "AppState" { "appid" "440" } }"#).unwrap();
//!
//! let appid = value
//!     .get("AppState")
//!     .and_then(|state| state.get("appid"))
//!     .and_then(Value::as_str);
//! assert_eq!(appid, Some("440"));
//! ```

use crate::VdfMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Any value that can appear in a VDF document.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::{Value, VdfMap};
///
/// let text = Value::from("hello");
/// let object = Value::Object(VdfMap::new());
///
/// assert!(text.is_string());
/// assert!(object.is_object());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    String(String),
    Object(VdfMap),
}

impl Value {
    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::{Value, VdfMap};
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::Object(VdfMap::new()).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Object(_) => None,
        }
    }

    /// If the value is an object, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&VdfMap> {
        match self {
            Value::Object(obj) => Some(obj),
            Value::String(_) => None,
        }
    }

    /// Looks up `key` if the value is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Returns `true` if every key and string can be written as VDF text.
    ///
    /// Quoted text has no escape mechanism, so neither keys nor strings may
    /// contain `"`, and keys must not be empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::vdf;
    ///
    /// assert!(vdf!({ "name" "Widget" }).is_representable());
    /// assert!(!vdf!({ "name" "say \"hi\"" }).is_representable());
    /// assert!(!vdf!({ "" "empty key" }).is_representable());
    /// ```
    #[must_use]
    pub fn is_representable(&self) -> bool {
        match self {
            Value::String(s) => !s.contains('"'),
            Value::Object(obj) => obj
                .iter()
                .all(|(k, v)| !k.is_empty() && !k.contains('"') && v.is_representable()),
        }
    }
}

/// Renders the value as single-line VDF text.
///
/// Strings are written verbatim between quotes. For an object whose
/// [`Value::is_representable`] is `true` the output decodes back to an equal
/// value; otherwise it is only a readable rendering.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Object(obj) => {
                write!(f, "{{")?;
                for (key, value) in obj.iter() {
                    write!(f, " \"{}\" {}", key, value)?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a quoted string or an object")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = VdfMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            Value::Object(_) => Err(crate::Error::custom("expected string, found object")),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<VdfMap> for Value {
    fn from(value: VdfMap) -> Self {
        Value::Object(value)
    }
}
