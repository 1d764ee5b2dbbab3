//! # serde_vdf
//!
//! A streaming Serde deserializer for VDF, the quoted key/value text format
//! (also known as KeyValues) used by Valve's tooling and Steam manifests.
//!
//! ## What does VDF look like?
//!
//! ```text
//! "AppState"
//! {
//!     "appid"     "440"
//!     "name"      "Team Fortress 2"
//!     "UserConfig"
//!     {
//!         "language"  "english"
//!     }
//! }
//! ```
//!
//! Every key and every value is a quoted string; a value may instead be a
//! nested brace-delimited object. There are no arrays, numbers or booleans in
//! the grammar: numeric and boolean typing comes from the destination type.
//! This crate decodes documents that start with the opening brace of the
//! root object.
//!
//! ## Key Features
//!
//! - **Streaming**: reads any [`std::io::Read`] in small chunks, never
//!   buffering the whole document
//! - **No intermediate tree**: tokens are bound into the destination as soon
//!   as they are recognised
//! - **Serde Compatible**: works with `#[derive(Deserialize)]`; use
//!   `#[serde(rename = "...")]` to bind a field to a differently named key
//! - **Forgiving of unknown keys**: unmatched keys are skipped
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Deserialize;
//! use std::collections::HashMap;
//!
//! #[derive(Deserialize, Debug)]
//! struct Depot {
//!     manifest: u64,
//!     size: u64,
//! }
//!
//! #[derive(Deserialize, Debug)]
//! struct AppState {
//!     appid: u32,
//!     name: String,
//!     #[serde(rename = "InstalledDepots")]
//!     installed_depots: HashMap<String, Depot>,
//!     #[serde(rename = "UserConfig")]
//!     user_config: Option<HashMap<String, String>>,
//! }
//!
//! let input = r#"{
//!     "appid"     "440"
//!     "name"      "Team Fortress 2"
//!     "StateFlags" "4"
//!     "InstalledDepots"
//!     {
//!         "441" { "manifest" "7707612755105232421" "size" "27039879806" }
//!     }
//! }"#;
//!
//! let state: AppState = serde_vdf::from_str(input).unwrap();
//! assert_eq!(state.appid, 440);
//! assert_eq!(state.installed_depots["441"].size, 27039879806);
//! assert!(state.user_config.is_none());
//! ```
//!
//! ## Destination Types
//!
//! | Rust type | VDF value |
//! |---|---|
//! | `String`, `char` | quoted string, verbatim |
//! | `i8`..`i128`, `u8`..`u128` | quoted base-10 integer |
//! | `f32`, `f64` | quoted float |
//! | `bool` | `"1"`/`"0"`, `"true"`/`"false"` (and `t`/`f`, `TRUE`/`FALSE`, `True`/`False`) |
//! | structs, maps | nested object |
//! | `Option<T>` | `Some` when the key is present |
//! | unit enum variants | quoted variant name |
//! | [`Value`] | anything |
//!
//! Sequences, tuples and byte arrays have no representation and fail with
//! [`Error::UnsupportedType`].
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Errors are returned as [`Result`]s; nothing in the decoding path panics on
//!   malformed input

pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod value;

mod cursor;

pub use de::Deserializer;
pub use error::{Error, Result};
pub use map::VdfMap;
pub use options::{DecoderOptions, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
pub use value::Value;

use serde::de::DeserializeOwned;
use std::io;

/// Deserialize an instance of type `T` from an I/O stream of VDF.
///
/// The reader is consumed in chunks of [`DEFAULT_CHUNK_SIZE`] bytes. Input
/// following the top-level object is left unread.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_vdf::from_reader;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_reader(Cursor::new(b"{ \"x\" \"1\" \"y\" \"2\" }")).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid VDF, or the data
/// cannot be bound to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    from_reader_with_options(reader, DecoderOptions::default())
}

/// Deserialize an instance of type `T` from an I/O stream of VDF with custom options.
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid VDF, or the data
/// cannot be bound to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R, T>(reader: R, options: DecoderOptions) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    Deserializer::with_options(reader, options).decode()
}

/// Deserialize an instance of type `T` from bytes of VDF text.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::from_slice;
/// use std::collections::HashMap;
///
/// let map: HashMap<String, String> = from_slice(b"{ \"key\" \"value\" }").unwrap();
/// assert_eq!(map["key"], "value");
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid VDF or cannot be bound to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    Deserializer::from_slice(v).decode()
}

/// Deserialize an instance of type `T` from a string of VDF text.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_vdf::from_str;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{\n\t\"x\"\t\"1\"\n\t\"y\"\t\"2\"\n}").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid VDF or cannot be bound to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice(s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Shape {
        name: String,
        origin: Point,
        #[serde(default)]
        labels: HashMap<String, String>,
    }

    #[test]
    fn test_deserialize_point() {
        let point: Point = from_str("{ \"x\" \"1\" \"y\" \"-2\" }").unwrap();
        assert_eq!(point, Point { x: 1, y: -2 });
    }

    #[test]
    fn test_deserialize_nested() {
        let input = "{\n\"name\" \"square\"\n\"origin\" { \"x\" \"0\" \"y\" \"5\" }\n\"labels\" { \"a\" \"b\" }\n}";
        let shape: Shape = from_str(input).unwrap();
        assert_eq!(shape.name, "square");
        assert_eq!(shape.origin, Point { x: 0, y: 5 });
        assert_eq!(shape.labels["a"], "b");
    }

    #[test]
    fn test_from_reader_with_options() {
        let options = DecoderOptions::new().with_chunk_size(1);
        let point: Point =
            from_reader_with_options(&b"{ \"x\" \"10\" \"y\" \"20\" }"[..], options).unwrap();
        assert_eq!(point, Point { x: 10, y: 20 });
    }

    #[test]
    fn test_missing_field() {
        let err = from_str::<Point>("{ \"x\" \"1\" }").unwrap_err();
        assert!(matches!(err, Error::Custom(ref msg) if msg.contains("missing field")));
    }

    #[test]
    fn test_empty_input() {
        let err = from_str::<Point>("   ").unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { .. }));
    }
}
