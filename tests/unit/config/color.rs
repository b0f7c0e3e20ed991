use super::*;
use serde_json::json;

#[test]
fn parses_hex_and_array() {
    let c: Rgb8 = serde_json::from_value(json!("#FF8000")).unwrap();
    assert_eq!(c, Rgb8::new(255, 128, 0));

    let c: Rgb8 = serde_json::from_value(json!("00ff00")).unwrap();
    assert_eq!(c, Rgb8::new(0, 255, 0));

    let c: Rgb8 = serde_json::from_value(json!([1, 2, 3])).unwrap();
    assert_eq!(c, Rgb8::new(1, 2, 3));
}

#[test]
fn rejects_malformed_colors() {
    assert!(serde_json::from_value::<Rgb8>(json!("#fff")).is_err());
    assert!(serde_json::from_value::<Rgb8>(json!("#gg0000")).is_err());
    assert!(serde_json::from_value::<Rgb8>(json!([1, 2])).is_err());
    assert!(serde_json::from_value::<Rgb8>(json!([1, 2, 300])).is_err());
}

#[test]
fn serializes_as_lowercase_hex() {
    let v = serde_json::to_value(Rgb8::new(255, 0, 16)).unwrap();
    assert_eq!(v, json!("#ff0010"));
}
