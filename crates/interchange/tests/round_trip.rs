//! Encode/decode behaviour of whole documents.

use std::collections::BTreeMap;

use serde_json::json;
use tfvalue_core::{
    format_number, parse_number, type_from_elements, BigDecimal, Decimal, ObjectType, Type, Value,
};
use tfvalue_interchange::{
    value_from_json, value_from_json_with_options, value_to_json, value_to_json_bytes,
    DecodeOptions, InterchangeError,
};

fn string(s: &str) -> Value {
    Value::new(Type::String, s).unwrap()
}

fn number(n: i64) -> Value {
    Value::new(Type::Number, n).unwrap()
}

fn assert_round_trips(v: &Value) {
    let bytes = value_to_json_bytes(v).unwrap();
    let back = value_from_json(&bytes, v.ty()).unwrap();
    assert!(
        back.equal(v),
        "{} came back as {} via {}",
        v,
        back,
        String::from_utf8_lossy(&bytes)
    );
}

#[test]
fn string_encodes_and_decodes() {
    let v = string("hello");
    assert_eq!(value_to_json(&v).unwrap(), json!("hello"));
    let back = value_from_json(br#""hello""#, &Type::String).unwrap();
    assert!(back.equal(&v));
}

#[test]
fn number_list_has_common_element_type() {
    let elements = vec![number(1), number(2)];
    assert!(type_from_elements(&elements).unwrap().equal(&Type::Number));
    let list = Value::new(Type::list(Type::Number), elements).unwrap();
    assert_eq!(value_to_json_bytes(&list).unwrap(), b"[1,2]".to_vec());
}

#[test]
fn undefined_attribute_rejected_unless_ignored() {
    let ty = Type::object([("a", Type::Number)]);
    let input = br#"{"a":1,"b":2}"#;

    let err = value_from_json(input, &ty).unwrap_err();
    assert_eq!(err.to_string(), "unsupported attribute \"b\"");
    assert!(matches!(
        InterchangeError::from_path_error(&err),
        Some(InterchangeError::UnsupportedAttribute(name)) if name == "b"
    ));

    let opts = DecodeOptions::new().ignore_undefined_attributes(true);
    let v = value_from_json_with_options(input, &ty, &opts).unwrap();
    let attrs = v.as_map().unwrap();
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs["a"].as_number().unwrap(), BigDecimal::from(1));
}

#[test]
fn undefined_attribute_in_nested_object_reports_path() {
    let ty = Type::object([("inner", Type::object([("a", Type::Number)]))]);
    let err = value_from_json(br#"{"inner":{"a":1,"zz":true}}"#, &ty).unwrap_err();
    assert_eq!(err.to_string(), "inner: unsupported attribute \"zz\"");
}

#[test]
fn round_trip_every_kind() {
    let object_ty = Type::object([
        ("name", Type::String),
        ("size", Type::Number),
        ("tags", Type::map(Type::String)),
    ]);
    let object = Value::new(
        object_ty.clone(),
        BTreeMap::from([
            ("name".to_string(), string("box")),
            ("size".to_string(), Value::new(Type::Number, Decimal::new(125, 1)).unwrap()),
            (
                "tags".to_string(),
                Value::new(
                    Type::map(Type::String),
                    BTreeMap::from([("k".to_string(), string("v"))]),
                )
                .unwrap(),
            ),
        ]),
    )
    .unwrap();

    let values = vec![
        string(""),
        number(-42),
        Value::new(Type::Bool, true).unwrap(),
        Value::null(Type::String),
        Value::null(object_ty.clone()),
        Value::new(Type::list(Type::String), Vec::new()).unwrap(),
        Value::new(Type::set(Type::Number), vec![number(3), number(1)]).unwrap(),
        Value::new(
            Type::tuple([Type::String, Type::Bool]),
            vec![string("x"), Value::null(Type::Bool)],
        )
        .unwrap(),
        object.clone(),
        Value::new(Type::list(object_ty), vec![object]).unwrap(),
    ];
    for v in &values {
        assert_round_trips(v);
    }
}

#[test]
fn round_trip_through_dynamic_attribute() {
    let ty = Type::object([("payload", Type::DynamicPseudoType)]);
    let v = Value::new(
        ty.clone(),
        BTreeMap::from([(
            "payload".to_string(),
            Value::new(Type::tuple([Type::Number]), vec![number(9)]).unwrap(),
        )]),
    )
    .unwrap();
    let bytes = value_to_json_bytes(&v).unwrap();
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&bytes).unwrap(),
        json!({"payload": {"type": ["tuple", ["number"]], "value": [9]}})
    );
    let back = value_from_json(&bytes, &ty).unwrap();
    assert!(back.equal(&v));
}

#[test]
fn optional_attribute_omitted_decodes_as_null() {
    let ty = Type::Object(
        ObjectType::new([("a", Type::String), ("b", Type::Number)])
            .with_optional(["b"])
            .unwrap(),
    );
    let v = value_from_json(br#"{"a":"x"}"#, &ty).unwrap();
    let attrs = v.as_map().unwrap();
    assert!(attrs["b"].is_null());
}

#[test]
fn large_numbers_are_exact() {
    let v = value_from_json(b"123456789012345678901234567", &Type::Number).unwrap();
    assert_eq!(
        value_to_json_bytes(&v).unwrap(),
        b"123456789012345678901234567".to_vec()
    );
}

#[test]
fn wide_numbers_and_large_exponents_round_trip() {
    let texts = [
        "1234567890123456789012345678901234567890.0000000001",
        "-98765432109876543210987654321098765432109876543210",
        "1267650600228229401496703205376",
        "1e30",
        "6.02214076e500",
        "-1.5e-400",
    ];
    for text in texts {
        let v = value_from_json(text.as_bytes(), &Type::Number).unwrap();
        let n = v.as_number().unwrap();
        assert_eq!(format_number(&n), format_number(&parse_number(text).unwrap()));
        assert_round_trips(&v);
    }

    let v = value_from_json(b"1e30", &Type::Number).unwrap();
    assert_eq!(value_to_json_bytes(&v).unwrap(), b"1e30".to_vec());
    let forty = b"1234567890123456789012345678901234567890";
    let v = value_from_json(forty, &Type::Number).unwrap();
    assert_eq!(value_to_json_bytes(&v).unwrap(), forty.to_vec());
}

#[test]
fn long_scientific_mantissa_is_not_rounded() {
    let v = value_from_json(b"1.2345678901234567890123456789012345e0", &Type::Number).unwrap();
    assert_eq!(
        value_to_json_bytes(&v).unwrap(),
        b"1.2345678901234567890123456789012345".to_vec()
    );
    let rounded = value_from_json(b"1.234567890123456789012345678901234", &Type::Number).unwrap();
    assert!(!v.equal(&rounded));
}

#[test]
fn round_trip_nested_set_of_objects() {
    let member_ty = Type::object([
        ("name", Type::String),
        ("ports", Type::set(Type::Number)),
        ("meta", Type::map(Type::String)),
    ]);
    let member = |name: &str, ports: Vec<Value>| {
        Value::new(
            member_ty.clone(),
            BTreeMap::from([
                ("name".to_string(), string(name)),
                (
                    "ports".to_string(),
                    Value::new(Type::set(Type::Number), ports).unwrap(),
                ),
                (
                    "meta".to_string(),
                    Value::new(
                        Type::map(Type::String),
                        BTreeMap::from([("zone".to_string(), string("b"))]),
                    )
                    .unwrap(),
                ),
            ]),
        )
        .unwrap()
    };
    let ty = Type::object([("members", Type::set(member_ty.clone()))]);
    let v = Value::new(
        ty.clone(),
        BTreeMap::from([(
            "members".to_string(),
            Value::new(
                Type::set(member_ty.clone()),
                vec![
                    member("web", vec![number(443), number(80)]),
                    member("db", vec![number(5432)]),
                    member("cache", Vec::new()),
                ],
            )
            .unwrap(),
        )]),
    )
    .unwrap();
    assert_round_trips(&v);

    let reordered = value_from_json(
        br#"{"members":[
            {"name":"cache","ports":[],"meta":{"zone":"b"}},
            {"name":"db","ports":[5432],"meta":{"zone":"b"}},
            {"name":"web","ports":[80,443],"meta":{"zone":"b"}}
        ]}"#,
        &ty,
    )
    .unwrap();
    assert!(reordered.equal(&v));
    assert!(v.equal(&reordered));
    assert!(v.diff(&reordered).unwrap().is_empty());
}

#[test]
fn round_trip_tuple_with_dynamic_element() {
    let ty = Type::tuple([Type::String, Type::DynamicPseudoType]);
    let payloads = vec![
        number(7),
        Value::new(
            Type::list(Type::String),
            vec![string("a"), string("b")],
        )
        .unwrap(),
        Value::new(
            Type::object([("on", Type::Bool)]),
            BTreeMap::from([("on".to_string(), Value::new(Type::Bool, true).unwrap())]),
        )
        .unwrap(),
        Value::null(Type::DynamicPseudoType),
    ];
    for payload in payloads {
        let v = Value::new(ty.clone(), vec![string("label"), payload]).unwrap();
        assert_round_trips(&v);
    }

    let v = Value::new(
        ty.clone(),
        vec![string("label"), Value::new(Type::set(Type::Number), vec![number(2)]).unwrap()],
    )
    .unwrap();
    assert_eq!(
        value_to_json(&v).unwrap(),
        json!(["label", {"type": ["set", "number"], "value": [2]}])
    );
    let back = value_from_json(&value_to_json_bytes(&v).unwrap(), &ty).unwrap();
    let items = back.as_list().unwrap();
    assert!(items[1].ty().equal(&Type::set(Type::Number)));
}

#[test]
fn scientific_notation_decodes() {
    let v = value_from_json(b"1.5e3", &Type::Number).unwrap();
    assert_eq!(v.as_number().unwrap(), BigDecimal::from(1500));
}
