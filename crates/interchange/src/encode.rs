//! Encoding values as JSON.
//!
//! The inverse of [`crate::decode`]: a value encoded here decodes back to an
//! equal value when decoded against its own type. Where the declared type at
//! a position is `DynamicPseudoType`, the value is wrapped as
//! `{"type": <signature>, "value": <payload>}` so its concrete type survives.

use tfvalue_core::{format_number, AttributePath, AttributePathError, RawValue, Type, Value};

use crate::error::InterchangeError;

/// Encodes `value` as a JSON document.
pub fn value_to_json(value: &Value) -> Result<serde_json::Value, AttributePathError> {
    encode(value, value.ty(), &AttributePath::new())
}

/// Encodes `value` as compact JSON bytes.
pub fn value_to_json_bytes(value: &Value) -> Result<Vec<u8>, AttributePathError> {
    let json = value_to_json(value)?;
    serde_json::to_vec(&json)
        .map_err(|err| AttributePath::new().new_error(InterchangeError::InvalidJson(err)))
}

fn encode(
    value: &Value,
    declared: &Type,
    path: &AttributePath,
) -> Result<serde_json::Value, AttributePathError> {
    if !value.is_known() {
        return Err(path.new_error(InterchangeError::UnknownValue));
    }
    if value.is_null() {
        return Ok(serde_json::Value::Null);
    }
    if matches!(declared, Type::DynamicPseudoType) {
        let mut wrapper = serde_json::Map::new();
        wrapper.insert("type".to_string(), value.ty().to_json_value());
        wrapper.insert("value".to_string(), encode(value, value.ty(), path)?);
        return Ok(serde_json::Value::Object(wrapper));
    }

    match (value.ty(), value.raw()) {
        (_, RawValue::Bool(b)) => Ok(serde_json::Value::Bool(*b)),
        (_, RawValue::String(s)) => Ok(serde_json::Value::String(s.clone())),
        (_, RawValue::Number(n)) => {
            let text = format_number(n);
            let number = text.parse::<serde_json::Number>().map_err(|err| {
                path.new_error(InterchangeError::InvalidNumber {
                    text: text.clone(),
                    reason: err.to_string(),
                })
            })?;
            Ok(serde_json::Value::Number(number))
        }
        (Type::Tuple(types), RawValue::List(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (pos, (item, item_ty)) in items.iter().zip(types.iter()).enumerate() {
                out.push(encode(item, item_ty, &path.with_element_key_int(pos as i64))?);
            }
            Ok(serde_json::Value::Array(out))
        }
        (Type::List(element), RawValue::List(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (pos, item) in items.iter().enumerate() {
                out.push(encode(item, element, &path.with_element_key_int(pos as i64))?);
            }
            Ok(serde_json::Value::Array(out))
        }
        (Type::Set(element), RawValue::List(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(encode(item, element, &path.with_element_key_value(item.clone()))?);
            }
            Ok(serde_json::Value::Array(out))
        }
        (Type::Map(element), RawValue::Map(entries)) => {
            let mut out = serde_json::Map::new();
            for (key, item) in entries {
                out.insert(key.clone(), encode(item, element, &path.with_element_key_string(key))?);
            }
            Ok(serde_json::Value::Object(out))
        }
        (Type::Object(obj), RawValue::Map(entries)) => {
            let mut out = serde_json::Map::new();
            for (name, item) in entries {
                let attr_ty = obj.attribute_type(name).unwrap_or(item.ty());
                out.insert(name.clone(), encode(item, attr_ty, &path.with_attribute_name(name))?);
            }
            Ok(serde_json::Value::Object(out))
        }
        (ty, raw) => Err(path.new_error(tfvalue_core::ValueError::UnsupportedRaw {
            ty: ty.to_string(),
            got: raw.kind_name(),
            expected: "a datum matching the value's type",
        })),
    }
}
