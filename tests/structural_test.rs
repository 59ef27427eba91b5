//! Tests for structural codecs: records, arrays, dictionaries and unions.

use rivet::{
    array, boolean, dictionary, integer, integer_from_string, literal, null, nullable, number,
    record, string, string_matching, union, Either,
};
use serde_json::json;

#[test]
fn test_record_decodes_typed_tuple() {
    let user = record((
        ("id", integer()),
        ("name", string()),
        ("admin", boolean()),
    ));

    let (id, name, admin) = user
        .decode(&json!({"id": 7, "name": "Ada", "admin": false}))
        .into_result()
        .unwrap();

    assert_eq!(id, 7);
    assert_eq!(name, "Ada");
    assert!(!admin);
}

#[test]
fn test_record_accumulates_sibling_errors() {
    let user = record((
        ("id", integer()),
        ("name", string()),
        ("email", string_matching(r"^[^@]+@[^@]+$").unwrap()),
    ));

    let errors = user
        .decode(&json!({"id": "seven", "name": null, "email": "nope"}))
        .into_result()
        .unwrap_err();

    assert_eq!(errors.len(), 3);
    assert_eq!(errors.at_path("id").len(), 1);
    assert_eq!(errors.at_path("name").len(), 1);

    let email = errors.at_path("email");
    assert_eq!(email.len(), 1);
    assert!(email[0]
        .message
        .as_deref()
        .unwrap()
        .starts_with("must match pattern"));
}

#[test]
fn test_deeply_nested_paths() {
    let line = record((("sku", string()), ("qty", integer_from_string())));
    let order = record((("id", integer()), ("lines", array(line))));

    let errors = order
        .decode(&json!({
            "id": 1,
            "lines": [
                {"sku": "A", "qty": "2"},
                {"sku": 5, "qty": "two"}
            ]
        }))
        .into_result()
        .unwrap_err();

    let paths: Vec<_> = errors.iter().map(|e| e.context.to_string()).collect();
    assert_eq!(paths, vec!["lines[1].sku", "lines[1].qty"]);

    let qty = errors.at_path("lines[1].qty")[0];
    assert_eq!(qty.value, json!("two"));
    assert_eq!(qty.expected(), Some("pipe(string, IntegerFromString)"));
}

#[test]
fn test_context_names_record_each_step() {
    let inner = record((("n", number()),));
    let outer = record((("inner", inner),));

    let errors = outer
        .decode(&json!({"inner": {"n": "x"}}))
        .into_result()
        .unwrap_err();

    let names: Vec<_> = errors
        .first()
        .context
        .entries()
        .map(|entry| entry.name.clone())
        .collect();
    assert_eq!(names, vec!["{ n: number }", "number"]);
}

#[test]
fn test_record_round_trip_with_parsed_fields() {
    let codec = record((("count", integer_from_string()), ("tags", array(string()))));
    let input = json!({"count": "3", "tags": ["a", "b"]});

    let decoded = codec.decode(&input).into_result().unwrap();
    assert_eq!(decoded.0, 3);
    assert_eq!(codec.encode(&decoded), input);
}

#[test]
fn test_dictionary_of_records() {
    let point = record((("x", number()), ("y", number())));
    let codec = dictionary(point);

    let decoded = codec
        .decode(&json!({"a": {"x": 1, "y": 2}, "b": {"x": 3, "y": 4}}))
        .into_result()
        .unwrap();
    assert_eq!(decoded["b"], (3.0, 4.0));

    let errors = codec
        .decode(&json!({"a": {"x": 1}, "b": 2}))
        .into_result()
        .unwrap_err();
    let paths: Vec<_> = errors.iter().map(|e| e.context.to_string()).collect();
    assert_eq!(paths, vec!["a.y", "b"]);
}

#[test]
fn test_tagged_union() {
    let circle = record((("kind", literal(json!("circle"))), ("radius", number())));
    let square = record((("kind", literal(json!("square"))), ("side", number())));
    let shape = union(circle, square);

    match shape
        .decode(&json!({"kind": "square", "side": 2}))
        .into_result()
        .unwrap()
    {
        Either::Right((_, side)) => assert_eq!(side, 2.0),
        other => panic!("expected a square, got {:?}", other),
    }

    let errors = shape
        .decode(&json!({"kind": "triangle"}))
        .into_result()
        .unwrap_err();
    // Both members report both of their fields.
    assert_eq!(errors.len(), 4);
}

#[test]
fn test_nullable_and_null() {
    let codec = record((("a", nullable(integer())), ("b", null())));
    let (a, ()) = codec
        .decode(&json!({"a": null, "b": null}))
        .into_result()
        .unwrap();
    assert_eq!(a, None);

    assert!(codec.decode(&json!({"a": 1, "b": 0})).is_failure());
}

#[test]
fn test_array_of_arrays() {
    let matrix = array(array(number()));
    let errors = matrix
        .decode(&json!([[1, 2], [3, "x"], "row"]))
        .into_result()
        .unwrap_err();

    let paths: Vec<_> = errors.iter().map(|e| e.context.to_string()).collect();
    assert_eq!(paths, vec!["[1][1]", "[2]"]);
    assert_eq!(matrix.name(), "Array<Array<number>>");
}
