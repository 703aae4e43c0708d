use std::fs;

use digest_core::TransformConfig;
use digest_fhir::transform_bundle_str;
use serde_json::Value;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn prescription_bundle_matches_golden() {
    let bundle = fs::read_to_string(fixture_path("prescription_bundle.json"))
        .expect("failed to read sample bundle");

    let transformed = transform_bundle_str(&bundle, &TransformConfig::default())
        .expect("failed to transform bundle");

    let mut actual = serde_json::to_value(transformed).expect("failed to serialize output");
    normalize_dynamic_fields(&mut actual);

    let expected = fs::read_to_string(fixture_path("prescription_transformed.json"))
        .expect("failed to read golden output");

    let mut expected_value: Value = serde_json::from_str(&expected).expect("invalid golden file");
    normalize_dynamic_fields(&mut expected_value);

    assert_eq!(actual, expected_value);
}

fn normalize_dynamic_fields(value: &mut Value) {
    if let Some(obj) = value.as_object_mut() {
        if obj.contains_key("generatedAt") {
            obj.insert(
                "generatedAt".to_string(),
                Value::String("__DYNAMIC_TIMESTAMP__".to_string()),
            );
        }
    }
}
