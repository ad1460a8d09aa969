//! Conversion of a value's datum into plain Rust types.

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use rust_decimal::Decimal;

use super::{number, RawValue, Value};
use crate::error::ValueError;
use crate::types::Type;

/// A Rust type a [`Value`] can be converted into with [`Value::extract`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

/// Destinations a value of `ty` converts into, for error messages.
fn destinations(ty: &Type) -> &'static str {
    match ty {
        Type::String => "String or Option<String>",
        Type::Number => "BigDecimal, Decimal or an Option of either",
        Type::Bool => "bool or Option<bool>",
        Type::List(_) | Type::Set(_) | Type::Tuple(_) => "Vec<Value> or Option<Vec<Value>>",
        Type::Map(_) | Type::Object(_) => {
            "BTreeMap<String, Value> or Option<BTreeMap<String, Value>>"
        }
        Type::DynamicPseudoType => "any destination when null",
    }
}

/// Refuses unknown values and type mismatches. A null of
/// `DynamicPseudoType` converts into anything.
fn check(value: &Value, accepts: fn(&Type) -> bool, target: &'static str) -> Result<(), ValueError> {
    if !value.is_known() {
        return Err(ValueError::UnknownConversion);
    }
    if accepts(value.ty()) || (value.is_null() && matches!(value.ty(), Type::DynamicPseudoType)) {
        return Ok(());
    }
    Err(ValueError::Conversion {
        ty: value.ty().to_string(),
        target,
        expected: destinations(value.ty()),
    })
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        check(value, |ty| matches!(ty, Type::String), "String")?;
        match value.raw() {
            RawValue::String(s) => Ok(s.clone()),
            _ => Ok(String::new()),
        }
    }
}

impl FromValue for BigDecimal {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        check(value, |ty| matches!(ty, Type::Number), "BigDecimal")?;
        match value.raw() {
            RawValue::Number(n) => Ok(n.clone()),
            _ => Ok(BigDecimal::from(0)),
        }
    }
}

/// Fails with `InvalidNumber` when the number does not fit a `Decimal`.
impl FromValue for Decimal {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        check(value, |ty| matches!(ty, Type::Number), "Decimal")?;
        match value.raw() {
            RawValue::Number(n) => number::to_decimal(n).ok_or_else(|| ValueError::InvalidNumber {
                text: number::format_number(n),
                reason: "out of range for Decimal".to_string(),
            }),
            _ => Ok(Decimal::ZERO),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        check(value, |ty| matches!(ty, Type::Bool), "bool")?;
        match value.raw() {
            RawValue::Bool(b) => Ok(*b),
            _ => Ok(false),
        }
    }
}

impl FromValue for Vec<Value> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        check(
            value,
            |ty| matches!(ty, Type::List(_) | Type::Set(_) | Type::Tuple(_)),
            "Vec<Value>",
        )?;
        match value.raw() {
            RawValue::List(items) => Ok(items.clone()),
            _ => Ok(Vec::new()),
        }
    }
}

impl FromValue for BTreeMap<String, Value> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        check(
            value,
            |ty| matches!(ty, Type::Map(_) | Type::Object(_)),
            "BTreeMap<String, Value>",
        )?;
        match value.raw() {
            RawValue::Map(entries) => Ok(entries.clone()),
            _ => Ok(BTreeMap::new()),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let inner = T::from_value(value)?;
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(inner))
        }
    }
}
