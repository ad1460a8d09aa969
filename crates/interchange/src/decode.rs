//! Decoding JSON into values of a known type.
//!
//! The target [`Type`] drives decoding. Scalars are accepted in their string
//! spellings as well (`"12.5"` for a number, `"true"`, `"T"` or `"1"` and
//! their false counterparts for a bool, any scalar for a string). JSON `null` is a null of the target type at any
//! position. Lists, sets and maps declared with a `DynamicPseudoType`
//! element type take the common type of their decoded elements.

use std::collections::BTreeMap;

use tfvalue_core::{
    parse_number, type_from_elements, AttributePath, AttributePathError, ObjectType, Type, Value,
};

use crate::error::InterchangeError;
use crate::options::DecodeOptions;

/// Decodes JSON `bytes` as a value of type `ty` with default options.
pub fn value_from_json(bytes: &[u8], ty: &Type) -> Result<Value, AttributePathError> {
    value_from_json_with_options(bytes, ty, &DecodeOptions::default())
}

/// Decodes JSON `bytes` as a value of type `ty`.
pub fn value_from_json_with_options(
    bytes: &[u8],
    ty: &Type,
    opts: &DecodeOptions,
) -> Result<Value, AttributePathError> {
    let json: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|err| AttributePath::new().new_error(InterchangeError::InvalidJson(err)))?;
    value_from_json_value(&json, ty, opts)
}

/// Decodes an already-parsed JSON document as a value of type `ty`.
pub fn value_from_json_value(
    json: &serde_json::Value,
    ty: &Type,
    opts: &DecodeOptions,
) -> Result<Value, AttributePathError> {
    tracing::trace!(ty = %ty, "decoding value from JSON");
    decode(json, ty, &AttributePath::new(), opts)
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn unexpected(path: &AttributePath, expected: &'static str, json: &serde_json::Value) -> AttributePathError {
    path.new_error(InterchangeError::UnexpectedJson {
        expected,
        found: json_kind(json),
    })
}

/// Builds a value at `path`, re-rooting construction errors there.
fn build(
    path: &AttributePath,
    ty: Type,
    raw: impl Into<tfvalue_core::RawValue>,
) -> Result<Value, AttributePathError> {
    Value::new(ty, raw).map_err(|err| err.under(path))
}

fn decode(
    json: &serde_json::Value,
    ty: &Type,
    path: &AttributePath,
    opts: &DecodeOptions,
) -> Result<Value, AttributePathError> {
    if json.is_null() {
        return Ok(Value::null(ty.clone()));
    }
    match ty {
        Type::String => decode_string(json, path),
        Type::Number => decode_number(json, path),
        Type::Bool => decode_bool(json, path),
        Type::DynamicPseudoType => decode_dynamic(json, path, opts),
        Type::List(element) => {
            let items = decode_elements(json, element, path, opts, |pos| {
                path.with_element_key_int(pos as i64)
            })?;
            let ty = Type::list(narrow(element, &items, path)?);
            build(path, ty, items)
        }
        Type::Set(element) => {
            let items = decode_elements(json, element, path, opts, |pos| {
                path.with_element_key_int(pos as i64)
            })?;
            let ty = Type::set(narrow(element, &items, path)?);
            build(path, ty, items)
        }
        Type::Map(element) => {
            let serde_json::Value::Object(entries) = json else {
                return Err(unexpected(path, "object", json));
            };
            let mut decoded = BTreeMap::new();
            for (key, item) in entries {
                let value = decode(item, element, &path.with_element_key_string(key), opts)?;
                decoded.insert(key.clone(), value);
            }
            let values: Vec<Value> = decoded.values().cloned().collect();
            let ty = Type::map(narrow(element, &values, path)?);
            build(path, ty, decoded)
        }
        Type::Tuple(types) => {
            let serde_json::Value::Array(items) = json else {
                return Err(unexpected(path, "array", json));
            };
            if items.len() != types.len() {
                return Err(path.new_error(InterchangeError::TupleArity {
                    expected: types.len(),
                    got: items.len(),
                }));
            }
            let mut decoded = Vec::with_capacity(items.len());
            for (pos, (item, item_ty)) in items.iter().zip(types.iter()).enumerate() {
                decoded.push(decode(item, item_ty, &path.with_element_key_int(pos as i64), opts)?);
            }
            build(path, ty.clone(), decoded)
        }
        Type::Object(obj) => decode_object(json, ty, obj, path, opts),
    }
}

fn decode_string(json: &serde_json::Value, path: &AttributePath) -> Result<Value, AttributePathError> {
    let text = match json {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => return Err(unexpected(path, "string", other)),
    };
    build(path, Type::String, text)
}

fn decode_number(json: &serde_json::Value, path: &AttributePath) -> Result<Value, AttributePathError> {
    let text = match json {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => return Err(unexpected(path, "number", other)),
    };
    let n = parse_number(&text).map_err(|err| {
        path.new_error(InterchangeError::InvalidNumber {
            text: text.clone(),
            reason: match err {
                tfvalue_core::ValueError::InvalidNumber { reason, .. } => reason,
                other => other.to_string(),
            },
        })
    })?;
    build(path, Type::Number, n)
}

fn decode_bool(json: &serde_json::Value, path: &AttributePath) -> Result<Value, AttributePathError> {
    let b = match json {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::String(s) => match s.as_str() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
            "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
            _ => return Err(path.new_error(InterchangeError::InvalidBool(s.clone()))),
        },
        other => return Err(unexpected(path, "bool", other)),
    };
    build(path, Type::Bool, b)
}

/// `{"type": <signature>, "value": <payload>}`; the payload is decoded as
/// the signature's type.
fn decode_dynamic(
    json: &serde_json::Value,
    path: &AttributePath,
    opts: &DecodeOptions,
) -> Result<Value, AttributePathError> {
    let serde_json::Value::Object(wrapper) = json else {
        return Err(unexpected(path, "object", json));
    };
    if let Some(key) = wrapper.keys().find(|k| *k != "type" && *k != "value") {
        return Err(path.new_error(InterchangeError::UnsupportedDynamicKey(key.clone())));
    }
    let sig = wrapper
        .get("type")
        .ok_or_else(|| path.new_error(InterchangeError::MissingDynamicKey("type")))?;
    let payload = wrapper
        .get("value")
        .ok_or_else(|| path.new_error(InterchangeError::MissingDynamicKey("value")))?;
    let ty = Type::from_json_value(sig).map_err(|err| path.new_error(err))?;
    decode(payload, &ty, path, opts)
}

fn decode_elements(
    json: &serde_json::Value,
    element: &Type,
    path: &AttributePath,
    opts: &DecodeOptions,
    element_path: impl Fn(usize) -> AttributePath,
) -> Result<Vec<Value>, AttributePathError> {
    let serde_json::Value::Array(items) = json else {
        return Err(unexpected(path, "array", json));
    };
    let mut decoded = Vec::with_capacity(items.len());
    for (pos, item) in items.iter().enumerate() {
        decoded.push(decode(item, element, &element_path(pos), opts)?);
    }
    Ok(decoded)
}

/// The element type to build a container with: the declared one, or the
/// common type of `items` when the declared one is `DynamicPseudoType`.
fn narrow(declared: &Type, items: &[Value], path: &AttributePath) -> Result<Type, AttributePathError> {
    if !matches!(declared, Type::DynamicPseudoType) {
        return Ok(declared.clone());
    }
    let narrowed = type_from_elements(items).map_err(|err| path.new_error(err))?;
    tracing::debug!(path = %path, element = %narrowed, "narrowed dynamic element type");
    Ok(narrowed)
}

fn decode_object(
    json: &serde_json::Value,
    ty: &Type,
    obj: &ObjectType,
    path: &AttributePath,
    opts: &DecodeOptions,
) -> Result<Value, AttributePathError> {
    let serde_json::Value::Object(entries) = json else {
        return Err(unexpected(path, "object", json));
    };
    let mut decoded = BTreeMap::new();
    for (name, item) in entries {
        let Some(attr_ty) = obj.attribute_type(name) else {
            if opts.ignore_undefined_attributes {
                tracing::debug!(path = %path, attribute = %name, "discarding undefined attribute");
                continue;
            }
            return Err(path.new_error(InterchangeError::UnsupportedAttribute(name.clone())));
        };
        let value = decode(item, attr_ty, &path.with_attribute_name(name), opts)?;
        decoded.insert(name.clone(), value);
    }
    for (name, attr_ty) in obj.attribute_types() {
        decoded
            .entry(name.clone())
            .or_insert_with(|| Value::null(attr_ty.clone()));
    }
    build(path, ty.clone(), decoded)
}
