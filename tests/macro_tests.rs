use serde_vdf::{from_str, vdf, Value, VdfMap};

#[test]
fn test_vdf_macro_strings() {
    assert_eq!(vdf!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(vdf!(""), Value::String(String::new()));

    let owned = String::from("owned");
    assert_eq!(vdf!(owned), Value::String("owned".to_string()));
}

#[test]
fn test_vdf_macro_empty_object() {
    assert_eq!(vdf!({}), Value::Object(VdfMap::new()));
}

#[test]
fn test_vdf_macro_nested() {
    let value = vdf!({
        "AppState" {
            "appid" "440"
            "UserConfig" {
                "language" "english"
            }
        }
    });

    let state = value.get("AppState").unwrap();
    assert_eq!(state.get("appid").and_then(Value::as_str), Some("440"));
    assert_eq!(
        state
            .get("UserConfig")
            .and_then(|c| c.get("language"))
            .and_then(Value::as_str),
        Some("english")
    );
}

#[test]
fn test_vdf_macro_matches_decoded() {
    let built = vdf!({
        "Name" "Widget"
        "Meta" { "Tag" "x" }
    });
    let decoded: Value = from_str(r#"{"Name" "Widget" "Meta" {"Tag" "x"}}"#).unwrap();
    assert_eq!(built, decoded);
}
