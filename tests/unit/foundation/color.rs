use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Rgba8 = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 0, 0));

    let c: Rgba8 = serde_json::from_value(json!("#0000FF80")).unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 255, 128));
}

#[test]
fn parses_css_functional_forms() {
    assert_eq!(
        "rgba(10, 20, 30, 0.5)".parse::<Rgba8>().unwrap(),
        Rgba8::rgba(10, 20, 30, 128)
    );
    assert_eq!(
        "rgb(1,2,3)".parse::<Rgba8>().unwrap(),
        Rgba8::rgb(1, 2, 3)
    );
}

#[test]
fn rejects_garbage() {
    assert!("#12345".parse::<Rgba8>().is_err());
    assert!("orange".parse::<Rgba8>().is_err());
    assert!("rgb(1,2)".parse::<Rgba8>().is_err());
    assert!(serde_json::from_value::<Rgba8>(json!(12)).is_err());
}

#[test]
fn serializes_back_to_hex() {
    assert_eq!(
        serde_json::to_value(Rgba8::rgb(0x12, 0xab, 0x00)).unwrap(),
        json!("#12ab00")
    );
    assert_eq!(Rgba8::rgba(1, 2, 3, 4).to_string(), "#01020304");
}

#[test]
fn rgb_distance_ignores_alpha() {
    let a = Rgba8::rgba(0, 0, 0, 10);
    let b = Rgba8::rgba(3, 4, 0, 200);
    assert!((a.rgb_distance(b) - 5.0).abs() < 1e-12);
}
