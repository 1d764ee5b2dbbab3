/// Builds a [`Value`](crate::Value) using VDF-like syntax.
///
/// Keys are string literals; values are either nested `{ ... }` blocks or
/// any expression convertible into a `Value` (string literals, `String`s).
///
/// ```rust
/// use serde_vdf::{vdf, Value};
///
/// let name = String::from("Widget");
/// let value = vdf!({
///     "Name" name
///     "Meta" {
///         "Tag" "x"
///     }
/// });
///
/// assert_eq!(value.get("Name").and_then(Value::as_str), Some("Widget"));
/// ```
#[macro_export]
macro_rules! vdf {
    // Object, possibly empty
    ({ $($key:literal $value:tt)* }) => {{
        #[allow(unused_mut)]
        let mut object = $crate::VdfMap::new();
        $(
            object.insert($key.to_string(), $crate::vdf!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Anything convertible into a string value
    ($s:expr) => {
        $crate::Value::from($s)
    };
}

#[cfg(test)]
mod tests {
    use crate::{VdfMap, Value};

    #[test]
    fn test_vdf_macro_scalars() {
        assert_eq!(vdf!("hello"), Value::String("hello".to_string()));
        assert_eq!(vdf!(""), Value::String(String::new()));
    }

    #[test]
    fn test_vdf_macro_objects() {
        assert_eq!(vdf!({}), Value::Object(VdfMap::new()));

        let obj = vdf!({
            "name" "Alice"
            "age" "30"
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("name"), Some(&Value::String("Alice".to_string())));
                assert_eq!(map.get("age"), Some(&Value::String("30".to_string())));
            }
            _ => panic!("Expected object"),
        }
    }
}
