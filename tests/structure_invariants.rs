//! Structure Invariant Tests
//!
//! - Declarations must be mappings
//! - Skeletons fill every declared leaf with unset
//! - Seeded documents are taken as-is
//! - Missing and undeclared fields are structure errors
//! - Wrong value and key types are schema type errors
//! - Namespaces list containers before leaves

use docshape::document::mapping_from_json;
use docshape::{
    Declaration, DocumentOptions, FieldType, Key, Mapping, SchemaDocument, SchemaTree, Value,
};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn mapping(json: serde_json::Value) -> Mapping {
    mapping_from_json(json).unwrap()
}

fn int_map(entries: &[(i64, Value)]) -> Value {
    Value::Map(entries.iter().map(|(k, v)| (Key::from(*k), v.clone())).collect())
}

fn unicode_map(entries: &[(&str, Value)]) -> Value {
    Value::Map(entries.iter().map(|(k, v)| (Key::from(*k), v.clone())).collect())
}

// =============================================================================
// Declaration Tests
// =============================================================================

struct NoStructure;

impl SchemaDocument for NoStructure {
    fn structure() -> Option<Declaration> {
        None
    }
}

struct NotAMapping;

impl SchemaDocument for NotAMapping {
    fn structure() -> Option<Declaration> {
        Some(Declaration::Type(FieldType::Int))
    }
}

struct Empty;

impl SchemaDocument for Empty {
    fn structure() -> Option<Declaration> {
        Some(Declaration::map())
    }
}

#[test]
fn test_no_structure() {
    let err = NoStructure::create().unwrap_err();
    assert!(err.is_structure_error());
}

#[test]
fn test_structure_not_mapping() {
    let err = NotAMapping::create().unwrap_err();
    assert!(err.is_structure_error());
}

#[test]
fn test_structure_not_mapping_from_json() {
    for raw in [json!(3), json!("unicode"), json!([1, 2]), json!(null), json!(true)] {
        let result = Declaration::from_json(&raw)
            .and_then(|decl| SchemaTree::declare(Some(&decl), DocumentOptions::default()));
        assert!(result.unwrap_err().is_structure_error(), "accepted {}", raw);
    }
}

#[test]
fn test_empty_structure() {
    let doc = Empty::create().unwrap();
    assert_eq!(doc, Mapping::new());
    assert!(doc.validate().is_ok());
    assert!(doc.namespaces().is_empty());
}

// =============================================================================
// Construction Tests
// =============================================================================

struct Simple;

impl SchemaDocument for Simple {
    fn structure() -> Option<Declaration> {
        Some(
            Declaration::map()
                .field("foo", FieldType::Unicode)
                .field("bar", FieldType::Int),
        )
    }
}

#[test]
fn test_simple_structure() {
    let doc = Simple::create().unwrap();
    assert_eq!(doc, json!({ "foo": null, "bar": null }));
    assert!(doc["foo"].is_unset());
}

struct Loadable;

impl SchemaDocument for Loadable {
    fn structure() -> Option<Declaration> {
        Some(
            Declaration::map()
                .field("foo", FieldType::Int)
                .field("bla", Declaration::map().field("bar", FieldType::Unicode)),
        )
    }
}

#[test]
fn test_load_with_mapping() {
    let data = mapping(json!({ "foo": 1, "bla": { "bar": "spam" } }));
    let doc = Loadable::from_mapping(data.clone()).unwrap();
    assert_eq!(doc, data);
    assert!(doc.validate().is_ok());
}

#[test]
fn test_seeded_document_is_not_defaulted() {
    let data = mapping(json!({ "foo": 1 }));
    let doc = Loadable::from_mapping(data.clone()).unwrap();
    assert_eq!(doc, data);
    assert!(!doc.contains_key("bla"));
}

#[test]
fn test_skeleton_is_deterministic() {
    let a = Loadable::create().unwrap();
    let b = Loadable::create().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.as_mapping(), b.as_mapping());
}

// =============================================================================
// Validation Tests
// =============================================================================

struct Missed;

impl SchemaDocument for Missed {
    fn structure() -> Option<Declaration> {
        Some(
            Declaration::map()
                .field("foo", FieldType::Unicode)
                .field("bar", Declaration::map().field("bla", FieldType::Int)),
        )
    }
}

#[test]
fn test_missed_field() {
    let doc = Missed::from_mapping(mapping(json!({ "foo": "arf" }))).unwrap();
    let err = doc.validate().unwrap_err();
    assert!(err.is_structure_error());
    assert_eq!(err.details().unwrap().path, "bar");
}

struct Unknown;

impl SchemaDocument for Unknown {
    fn structure() -> Option<Declaration> {
        Some(Declaration::map().field("foo", FieldType::Unicode))
    }
}

#[test]
fn test_unknown_field() {
    let mut doc = Unknown::create().unwrap();
    doc.insert("bar", 4);
    let err = doc.validate().unwrap_err();
    assert!(err.is_structure_error());
    assert_eq!(err.details().unwrap().path, "bar");
}

#[test]
fn test_unset_leaf_must_still_be_present() {
    let mut doc = Unknown::create().unwrap();
    assert!(doc.validate().is_ok());
    doc.remove("foo");
    assert!(doc.validate().unwrap_err().is_structure_error());
}

struct BigNested;

impl SchemaDocument for BigNested {
    fn structure() -> Option<Declaration> {
        let six = Declaration::map().field("7", FieldType::Int).field(
            "8",
            Declaration::map().wildcard(
                FieldType::Unicode,
                Declaration::map().wildcard(FieldType::Int, FieldType::Int),
            ),
        );
        let mut decl = Declaration::map().field("6", six);
        for name in ["5", "4", "3", "2", "1"] {
            decl = Declaration::map().field(name, decl);
        }
        Some(decl)
    }
}

#[test]
fn test_big_nested_structure() {
    let mut doc = BigNested::create().unwrap();
    assert_eq!(
        doc.namespaces(),
        [
            "1",
            "1.2",
            "1.2.3",
            "1.2.3.4",
            "1.2.3.4.5",
            "1.2.3.4.5.6",
            "1.2.3.4.5.6.8",
            "1.2.3.4.5.6.8.$unicode",
            "1.2.3.4.5.6.8.$unicode.$int",
            "1.2.3.4.5.6.7",
        ]
    );

    doc["1"]["2"]["3"]["4"]["5"]["6"]["7"] = Value::Int(8);
    doc["1"]["2"]["3"]["4"]["5"]["6"]["8"] =
        unicode_map(&[("bla", int_map(&[(3, Value::from("bla"))]))]);
    assert!(doc.validate().unwrap_err().is_schema_type_error());

    doc["1"]["2"]["3"]["4"]["5"]["6"]["8"] = int_map(&[(9, int_map(&[(3, Value::Int(10))]))]);
    let err = doc.validate().unwrap_err();
    assert!(err.is_schema_type_error());
    assert_eq!(err.details().unwrap().path, "1.2.3.4.5.6.8.9");

    doc["1"]["2"]["3"]["4"]["5"]["6"]["8"] =
        unicode_map(&[("bla", int_map(&[(3, Value::Int(4))]))]);
    assert!(doc.validate().is_ok());
}

#[test]
fn test_wildcard_starts_empty_and_validates() {
    let doc = BigNested::create().unwrap();
    let wildcard = doc.get_path(&["1", "2", "3", "4", "5", "6", "8"].map(Key::from)).unwrap();
    assert_eq!(wildcard, &Value::map());
    assert!(doc.validate().is_ok());
}

#[test]
fn test_every_namespace_leaf_is_unset_in_skeleton() {
    let doc = BigNested::create().unwrap();
    for ns in doc.namespaces() {
        if ns.contains('$') {
            continue;
        }
        let path: Vec<Key> = ns.split('.').map(Key::from).collect();
        let value = doc.get_path(&path).unwrap();
        assert!(value.is_unset() || value.is_map(), "{} -> {:?}", ns, value);
    }
}

struct Typed;

impl SchemaDocument for Typed {
    fn structure() -> Option<Declaration> {
        Some(
            Declaration::map()
                .field("when", FieldType::DateTime)
                .field("id", FieldType::Uuid)
                .field("ratio", FieldType::Float)
                .field("ok", FieldType::Bool)
                .field("items", FieldType::List),
        )
    }
}

#[test]
fn test_leaf_types_are_exact() {
    let mut doc = Typed::create().unwrap();
    doc.insert("when", chrono::Utc::now());
    doc.insert("id", uuid::Uuid::new_v4());
    doc.insert("ratio", 0.5);
    doc.insert("ok", true);
    doc.insert("items", vec![Value::Int(1), Value::from("two")]);
    assert!(doc.validate().is_ok());

    doc.insert("ratio", 1);
    let err = doc.validate().unwrap_err();
    assert!(err.is_schema_type_error());
    assert_eq!(err.details().unwrap().expected, "float");
    assert_eq!(err.details().unwrap().actual, "int");
}
