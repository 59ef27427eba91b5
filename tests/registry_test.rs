//! Tests for the named codec registry.

use rivet::{
    array, integer, nullable, number_from_string, record, string, CodecRegistry, RegistryError,
};
use serde_json::json;

fn registry() -> CodecRegistry {
    let registry = CodecRegistry::new();
    registry
        .register(
            "Product",
            record((
                ("sku", string()),
                ("price", number_from_string()),
                ("tags", nullable(array(string()))),
            )),
        )
        .unwrap();
    registry.register("Quantity", integer()).unwrap();
    registry
}

#[test]
fn test_decode_normalizes_payload() {
    let result = registry()
        .decode(
            "Product",
            &json!({"sku": "X-1", "price": "10.50", "unused": true}),
        )
        .unwrap();

    assert_eq!(
        result.into_result().unwrap(),
        json!({"sku": "X-1", "price": "10.5", "tags": null})
    );
}

#[test]
fn test_decode_reports_all_errors() {
    let result = registry()
        .decode("Product", &json!({"sku": 1, "price": "free", "tags": [1]}))
        .unwrap();

    let errors = result.into_result().unwrap_err();
    let paths: Vec<_> = errors.iter().map(|e| e.context.to_string()).collect();
    assert_eq!(paths, vec!["sku", "price", "tags[0]"]);
}

#[test]
fn test_missing_codec() {
    let err = registry().decode("Order", &json!({})).unwrap_err();
    assert_eq!(err, RegistryError::CodecNotFound("Order".to_string()));
}

#[test]
fn test_duplicate_registration() {
    let registry = registry();
    let result = registry.register("Quantity", string());

    assert!(matches!(result, Err(RegistryError::DuplicateName(name)) if name == "Quantity"));
}

#[test]
fn test_names_are_sorted() {
    assert_eq!(registry().names(), vec!["Product", "Quantity"]);
}

#[test]
fn test_get_returns_normalizer() {
    let normalizer = registry().get("Quantity").unwrap();
    let result = normalizer(&json!(3), &rivet::Context::root());
    assert_eq!(result.into_result().unwrap(), json!(3));
}

#[test]
fn test_default_is_empty() {
    let registry = CodecRegistry::default();
    assert!(registry.is_empty());
    assert!(registry.names().is_empty());
}
