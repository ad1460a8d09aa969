//! Values: a [`Type`] paired with a datum that is known, unknown or null.
//!
//! Every `Value` is validated against its type when it is built; there is no
//! way to hold a value whose datum disagrees with its type. Values are
//! immutable. Traversals that rewrite a tree build new values through the
//! same validation.

mod convert;
pub mod number;

pub use convert::FromValue;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use bigdecimal::BigDecimal;
use rust_decimal::Decimal;

use crate::error::{AttributePathError, ValueError};
use crate::path::{AttributePath, AttributePathStep, AttributePathStepper};
use crate::types::Type;

// ── Raw data ─────────────────────────────────────

/// The datum carried by a [`Value`].
///
/// Lists, sets and tuples share the sequence form; maps and objects share
/// the keyed form. Which one applies is decided by the value's type.
#[derive(Debug, Clone)]
pub enum RawValue {
    Unknown,
    Null,
    Bool(bool),
    Number(BigDecimal),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl RawValue {
    /// Rust-side name of the datum, used in construction errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawValue::Unknown => "unknown",
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Number(_) => "BigDecimal",
            RawValue::String(_) => "String",
            RawValue::List(_) => "Vec<Value>",
            RawValue::Map(_) => "BTreeMap<String, Value>",
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<BigDecimal> for RawValue {
    fn from(n: BigDecimal) -> Self {
        RawValue::Number(n)
    }
}

impl From<Decimal> for RawValue {
    fn from(n: Decimal) -> Self {
        RawValue::Number(number::from_decimal(n))
    }
}

macro_rules! raw_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RawValue {
                fn from(n: $t) -> Self {
                    RawValue::Number(BigDecimal::from(n))
                }
            }
        )*
    };
}

raw_from_int!(i32, i64, u32, u64);

impl From<Vec<Value>> for RawValue {
    fn from(items: Vec<Value>) -> Self {
        RawValue::List(items)
    }
}

impl From<BTreeMap<String, Value>> for RawValue {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        RawValue::Map(entries)
    }
}

impl From<HashMap<String, Value>> for RawValue {
    fn from(entries: HashMap<String, Value>) -> Self {
        RawValue::Map(entries.into_iter().collect())
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(RawValue::Null, Into::into)
    }
}

/// Accepted raw forms for a type, used in construction errors.
fn expected_raw(ty: &Type) -> &'static str {
    match ty {
        Type::Bool => "bool",
        Type::Number => "BigDecimal, Decimal or an integer",
        Type::String => "&str or String",
        Type::DynamicPseudoType => "unknown or null",
        Type::List(_) | Type::Set(_) | Type::Tuple(_) => "Vec<Value>",
        Type::Map(_) | Type::Object(_) => "BTreeMap<String, Value> or HashMap<String, Value>",
    }
}

// ── Value ────────────────────────────────────────

/// A typed datum.
#[derive(Debug, Clone)]
pub struct Value {
    ty: Type,
    raw: RawValue,
}

impl Value {
    /// Builds a value, checking `raw` against `ty`.
    ///
    /// Lists, sets and maps need every element to fit the element type and
    /// all elements to share one type. Tuples need the declared arity.
    /// Objects need every required attribute and no undeclared ones.
    /// `DynamicPseudoType` only accepts unknown or null. Errors inside a
    /// container carry the path of the offending element.
    pub fn new(ty: Type, raw: impl Into<RawValue>) -> Result<Value, AttributePathError> {
        let raw = raw.into();
        validate(&ty, &raw)?;
        Ok(Value { ty, raw })
    }

    /// A value whose datum is not determined yet.
    pub fn unknown(ty: Type) -> Value {
        Value {
            ty,
            raw: RawValue::Unknown,
        }
    }

    /// A value known to be absent.
    pub fn null(ty: Type) -> Value {
        Value {
            ty,
            raw: RawValue::Null,
        }
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    pub fn into_parts(self) -> (Type, RawValue) {
        (self.ty, self.raw)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self.raw, RawValue::Unknown)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.raw, RawValue::Null)
    }

    /// Known, and every descendant known too.
    pub fn is_fully_known(&self) -> bool {
        match &self.raw {
            RawValue::Unknown => false,
            RawValue::List(items) => items.iter().all(Value::is_fully_known),
            RawValue::Map(entries) => entries.values().all(Value::is_fully_known),
            _ => true,
        }
    }

    /// Converts the datum into `T`.
    ///
    /// Unknown values are refused. A null value becomes `None` for
    /// `Option<T>` and the zero value otherwise.
    pub fn extract<T: FromValue>(&self) -> Result<T, ValueError> {
        T::from_value(self)
    }

    pub fn as_string(&self) -> Result<String, ValueError> {
        self.extract()
    }

    pub fn as_number(&self) -> Result<BigDecimal, ValueError> {
        self.extract()
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        self.extract()
    }

    pub fn as_list(&self) -> Result<Vec<Value>, ValueError> {
        self.extract()
    }

    pub fn as_map(&self) -> Result<BTreeMap<String, Value>, ValueError> {
        self.extract()
    }

    /// Deep equality.
    ///
    /// Types must be the same variant at every node; element types are not
    /// otherwise compared. Set elements match regardless of order. Stops at
    /// the first difference.
    pub fn equal(&self, other: &Value) -> bool {
        if !self.ty.is(&other.ty) {
            return false;
        }
        match (&self.raw, &other.raw) {
            (RawValue::Unknown, RawValue::Unknown) | (RawValue::Null, RawValue::Null) => true,
            (RawValue::Bool(a), RawValue::Bool(b)) => a == b,
            (RawValue::Number(a), RawValue::Number(b)) => number::numbers_equal(a, b),
            (RawValue::String(a), RawValue::String(b)) => a == b,
            (RawValue::List(a), RawValue::List(b)) if matches!(self.ty, Type::Set(_)) => {
                same_elements(a, b)
            }
            (RawValue::List(a), RawValue::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equal(y))
            }
            (RawValue::Map(a), RawValue::Map(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .all(|(k, x)| b.get(k).is_some_and(|y| x.equal(y)))
            }
            _ => false,
        }
    }

    /// Equality of this node alone: same variant, same known/null state,
    /// equal primitive data. Lists and tuples compare their lengths, maps
    /// and objects their keys, and sets their elements, which are a set's
    /// keys.
    pub(crate) fn shallow_equal(&self, other: &Value) -> bool {
        if !self.ty.is(&other.ty) {
            return false;
        }
        match (&self.raw, &other.raw) {
            (RawValue::Unknown, RawValue::Unknown) | (RawValue::Null, RawValue::Null) => true,
            (RawValue::Bool(a), RawValue::Bool(b)) => a == b,
            (RawValue::Number(a), RawValue::Number(b)) => number::numbers_equal(a, b),
            (RawValue::String(a), RawValue::String(b)) => a == b,
            (RawValue::List(a), RawValue::List(b)) if matches!(self.ty, Type::Set(_)) => {
                same_elements(a, b)
            }
            (RawValue::List(a), RawValue::List(b)) => a.len() == b.len(),
            (RawValue::Map(a), RawValue::Map(b)) => {
                a.len() == b.len() && a.keys().all(|k| b.contains_key(k))
            }
            _ => false,
        }
    }

    /// Direct children with the step that reaches each one, in traversal
    /// order. Unknown and null values have none.
    pub(crate) fn children(&self) -> Vec<(AttributePathStep, &Value)> {
        match (&self.ty, &self.raw) {
            (Type::Set(_), RawValue::List(items)) => items
                .iter()
                .map(|item| (AttributePathStep::ElementKeyValue(item.clone()), item))
                .collect(),
            (_, RawValue::List(items)) => items
                .iter()
                .enumerate()
                .map(|(pos, item)| (AttributePathStep::ElementKeyInt(pos as i64), item))
                .collect(),
            (Type::Object(_), RawValue::Map(entries)) => entries
                .iter()
                .map(|(name, item)| (AttributePathStep::AttributeName(name.clone()), item))
                .collect(),
            (_, RawValue::Map(entries)) => entries
                .iter()
                .map(|(key, item)| (AttributePathStep::ElementKeyString(key.clone()), item))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Rebuilds this container with `children` in place of its current
    /// children, in the order [`Value::children`] yields them. The result is
    /// validated like any new value.
    pub(crate) fn with_children(&self, children: Vec<Value>) -> Result<Value, AttributePathError> {
        let raw = match &self.raw {
            RawValue::List(_) => RawValue::List(children),
            RawValue::Map(entries) => {
                RawValue::Map(entries.keys().cloned().zip(children).collect())
            }
            other => other.clone(),
        };
        Value::new(self.ty.clone(), raw)
    }
}

/// Order-insensitive comparison pairing each element of `a` with a distinct
/// equal element of `b`, so repeated elements must repeat equally often.
fn same_elements(a: &[Value], b: &[Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|x| {
        let found = b
            .iter()
            .enumerate()
            .find(|(pos, y)| !used[*pos] && x.equal(y))
            .map(|(pos, _)| pos);
        match found {
            Some(pos) => {
                used[pos] = true;
                true
            }
            None => false,
        }
    })
}

fn validate(ty: &Type, raw: &RawValue) -> Result<(), AttributePathError> {
    let unsupported = || ValueError::UnsupportedRaw {
        ty: ty.to_string(),
        got: raw.kind_name(),
        expected: expected_raw(ty),
    };

    match (ty, raw) {
        (_, RawValue::Unknown) | (_, RawValue::Null) => Ok(()),
        (Type::DynamicPseudoType, _) => Err(ValueError::KnownDynamic.into()),
        (Type::Bool, RawValue::Bool(_))
        | (Type::Number, RawValue::Number(_))
        | (Type::String, RawValue::String(_)) => Ok(()),
        (Type::List(element), RawValue::List(items)) => check_homogeneous(
            "list",
            element,
            items
                .iter()
                .enumerate()
                .map(|(pos, item)| (AttributePath::new().with_element_key_int(pos as i64), item)),
        ),
        (Type::Set(element), RawValue::List(items)) => check_homogeneous(
            "set",
            element,
            items
                .iter()
                .map(|item| (AttributePath::new().with_element_key_value(item.clone()), item)),
        ),
        (Type::Map(element), RawValue::Map(entries)) => check_homogeneous(
            "map",
            element,
            entries
                .iter()
                .map(|(key, item)| (AttributePath::new().with_element_key_string(key), item)),
        ),
        (Type::Tuple(types), RawValue::List(items)) => {
            if types.len() != items.len() {
                return Err(ValueError::TupleArity {
                    expected: types.len(),
                    got: items.len(),
                }
                .into());
            }
            for (pos, (declared, item)) in types.iter().zip(items.iter()).enumerate() {
                check_element(
                    declared,
                    item,
                    &AttributePath::new().with_element_key_int(pos as i64),
                )?;
            }
            Ok(())
        }
        (Type::Object(obj), RawValue::Map(entries)) => {
            for (name, item) in entries {
                let Some(declared) = obj.attribute_type(name) else {
                    return Err(ValueError::UndefinedAttribute {
                        name: name.clone(),
                        ty: ty.to_string(),
                    }
                    .into());
                };
                check_element(declared, item, &AttributePath::new().with_attribute_name(name))?;
            }
            for name in obj.attribute_types().keys() {
                if !entries.contains_key(name) && !obj.is_optional(name) {
                    return Err(ValueError::MissingAttribute {
                        name: name.clone(),
                        ty: ty.to_string(),
                    }
                    .into());
                }
            }
            Ok(())
        }
        _ => Err(unsupported().into()),
    }
}

fn check_element(declared: &Type, item: &Value, path: &AttributePath) -> Result<(), AttributePathError> {
    if item.ty.conforms_to(declared) {
        Ok(())
    } else {
        Err(path.new_error(ValueError::ElementType {
            got: item.ty.to_string(),
            expected: declared.to_string(),
        }))
    }
}

fn check_homogeneous<'a>(
    container: &'static str,
    element: &Type,
    items: impl Iterator<Item = (AttributePath, &'a Value)>,
) -> Result<(), AttributePathError> {
    let mut first: Option<&Type> = None;
    for (path, item) in items {
        check_element(element, item, &path)?;
        match first {
            None => first = Some(&item.ty),
            Some(first) if !item.ty.equal(first) => {
                return Err(path.new_error(ValueError::Heterogeneous {
                    container,
                    first: first.to_string(),
                    second: item.ty.to_string(),
                }));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

impl AttributePathStepper for Value {
    fn apply_attribute_path_step(&self, step: &AttributePathStep) -> Result<&Value, ValueError> {
        match (&self.ty, &self.raw, step) {
            (Type::List(_) | Type::Tuple(_), RawValue::List(items), AttributePathStep::ElementKeyInt(pos)) => {
                usize::try_from(*pos)
                    .ok()
                    .and_then(|pos| items.get(pos))
                    .ok_or(ValueError::InvalidStep)
            }
            (Type::Set(_), RawValue::List(items), AttributePathStep::ElementKeyValue(key)) => items
                .iter()
                .find(|item| item.equal(key))
                .ok_or(ValueError::InvalidStep),
            (Type::Map(_), RawValue::Map(entries), AttributePathStep::ElementKeyString(key))
            | (Type::Object(_), RawValue::Map(entries), AttributePathStep::AttributeName(key)) => {
                entries.get(key).ok_or(ValueError::InvalidStep)
            }
            _ => Err(ValueError::InvalidStep),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<", self.ty)?;
        match &self.raw {
            RawValue::Unknown => write!(f, "unknown")?,
            RawValue::Null => write!(f, "null")?,
            RawValue::Bool(b) => write!(f, "{}", b)?,
            RawValue::Number(n) => write!(f, "{}", number::format_number(n))?,
            RawValue::String(s) => write!(f, "{:?}", s)?,
            RawValue::List(items) => {
                for (pos, item) in items.iter().enumerate() {
                    if pos > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
            }
            RawValue::Map(entries) => {
                for (pos, (key, item)) in entries.iter().enumerate() {
                    if pos > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}:{}", key, item)?;
                }
            }
        }
        write!(f, ">")
    }
}
