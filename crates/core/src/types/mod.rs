//! The closed set of value types.
//!
//! `Type` has no `PartialEq`. Compare with [`Type::is`] (same variant),
//! [`Type::equal`] (same tree) or [`Type::usable_as`] (directional
//! compatibility).

mod signature;

pub use signature::parse_json_type;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::ValueError;
use crate::path::{AttributePathStep, AttributePathStepper};
use crate::value::Value;

// ── Type ─────────────────────────────────────────

/// A value type.
#[derive(Debug, Clone)]
pub enum Type {
    Bool,
    Number,
    String,
    /// Wildcard: any concrete type is usable as it.
    DynamicPseudoType,
    List(Box<Type>),
    Set(Box<Type>),
    Map(Box<Type>),
    Tuple(Vec<Type>),
    Object(ObjectType),
}

/// Attribute types of an object, plus the names of the optional ones.
///
/// Optional attribute names are always a subset of the attribute names.
#[derive(Debug, Clone, Default)]
pub struct ObjectType {
    attribute_types: BTreeMap<String, Type>,
    optional_attributes: BTreeSet<String>,
}

impl ObjectType {
    pub fn new<K: Into<String>>(attribute_types: impl IntoIterator<Item = (K, Type)>) -> Self {
        ObjectType {
            attribute_types: attribute_types
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
            optional_attributes: BTreeSet::new(),
        }
    }

    /// Marks `names` as optional. Every name must already be an attribute.
    pub fn with_optional<K: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = K>,
    ) -> Result<Self, ValueError> {
        for name in names {
            let name = name.into();
            if !self.attribute_types.contains_key(&name) {
                return Err(ValueError::UndefinedOptionalAttribute { name });
            }
            self.optional_attributes.insert(name);
        }
        Ok(self)
    }

    pub fn attribute_types(&self) -> &BTreeMap<String, Type> {
        &self.attribute_types
    }

    pub fn attribute_type(&self, name: &str) -> Option<&Type> {
        self.attribute_types.get(name)
    }

    pub fn optional_attributes(&self) -> &BTreeSet<String> {
        &self.optional_attributes
    }

    pub fn is_optional(&self, name: &str) -> bool {
        self.optional_attributes.contains(name)
    }

    fn equal(&self, other: &ObjectType) -> bool {
        self.attribute_types.len() == other.attribute_types.len()
            && self.optional_attributes == other.optional_attributes
            && self.attribute_types.iter().all(|(name, ty)| {
                other
                    .attribute_types
                    .get(name)
                    .is_some_and(|other_ty| ty.equal(other_ty))
            })
    }
}

impl Type {
    pub fn list(element: Type) -> Type {
        Type::List(Box::new(element))
    }

    pub fn set(element: Type) -> Type {
        Type::Set(Box::new(element))
    }

    pub fn map(element: Type) -> Type {
        Type::Map(Box::new(element))
    }

    pub fn tuple(elements: impl IntoIterator<Item = Type>) -> Type {
        Type::Tuple(elements.into_iter().collect())
    }

    pub fn object<K: Into<String>>(attribute_types: impl IntoIterator<Item = (K, Type)>) -> Type {
        Type::Object(ObjectType::new(attribute_types))
    }

    /// Same variant, ignoring element and attribute types.
    pub fn is(&self, other: &Type) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Same variant and structurally identical element/attribute types,
    /// including optional attribute flags.
    pub fn equal(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Bool, Type::Bool)
            | (Type::Number, Type::Number)
            | (Type::String, Type::String)
            | (Type::DynamicPseudoType, Type::DynamicPseudoType) => true,
            (Type::List(a), Type::List(b))
            | (Type::Set(a), Type::Set(b))
            | (Type::Map(a), Type::Map(b)) => a.equal(b),
            (Type::Tuple(a), Type::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equal(y))
            }
            (Type::Object(a), Type::Object(b)) => a.equal(b),
            _ => false,
        }
    }

    /// Whether a value of this type can stand in where `other` is expected.
    ///
    /// Every type is usable as `DynamicPseudoType`. Containers compare
    /// element-wise; tuples and objects also need the same arity or
    /// attribute names.
    ///
    /// # Panics
    ///
    /// Panics when `self` is an object type with optional attributes and
    /// `other` is an object type. Optional attributes describe a type
    /// constraint, not the type of a concrete value. Use
    /// [`Type::try_usable_as`] to get an error instead.
    pub fn usable_as(&self, other: &Type) -> bool {
        match self.try_usable_as(other) {
            Ok(usable) => usable,
            Err(err) => panic!("{}", err),
        }
    }

    /// [`Type::usable_as`], reporting the optional-attribute precondition as
    /// [`ValueError::OptionalAttributesNotUsable`].
    pub fn try_usable_as(&self, other: &Type) -> Result<bool, ValueError> {
        if let Type::DynamicPseudoType = other {
            return Ok(true);
        }
        match (self, other) {
            (Type::Bool, Type::Bool)
            | (Type::Number, Type::Number)
            | (Type::String, Type::String) => Ok(true),
            (Type::List(a), Type::List(b))
            | (Type::Set(a), Type::Set(b))
            | (Type::Map(a), Type::Map(b)) => a.try_usable_as(b),
            (Type::Tuple(a), Type::Tuple(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (x, y) in a.iter().zip(b.iter()) {
                    if !x.try_usable_as(y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Type::Object(a), Type::Object(b)) => {
                if !a.optional_attributes.is_empty() {
                    return Err(ValueError::OptionalAttributesNotUsable);
                }
                if a.attribute_types.len() != b.attribute_types.len() {
                    return Ok(false);
                }
                for (name, ty) in &a.attribute_types {
                    let Some(other_ty) = b.attribute_types.get(name) else {
                        return Ok(false);
                    };
                    if !ty.try_usable_as(other_ty)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Whether a value of this type may be placed where `declared` is
    /// expected: an exact match, or usable-as. Never panics; an object with
    /// optional attributes that is not an exact match does not conform.
    pub(crate) fn conforms_to(&self, declared: &Type) -> bool {
        self.equal(declared) || self.try_usable_as(declared).unwrap_or(false)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Type::Bool | Type::Number | Type::String | Type::DynamicPseudoType
        )
    }
}

/// The single type shared by every element, or `DynamicPseudoType` when
/// there are no elements.
pub fn type_from_elements(elements: &[Value]) -> Result<Type, ValueError> {
    let mut iter = elements.iter();
    let Some(first) = iter.next() else {
        return Ok(Type::DynamicPseudoType);
    };
    for element in iter {
        if !element.ty().equal(first.ty()) {
            return Err(ValueError::MixedElementTypes);
        }
    }
    Ok(first.ty().clone())
}

impl AttributePathStepper for Type {
    fn apply_attribute_path_step(&self, step: &AttributePathStep) -> Result<&Type, ValueError> {
        match (self, step) {
            (Type::List(element), AttributePathStep::ElementKeyInt(_))
            | (Type::Set(element), AttributePathStep::ElementKeyValue(_))
            | (Type::Map(element), AttributePathStep::ElementKeyString(_)) => Ok(element.as_ref()),
            (Type::Tuple(elements), AttributePathStep::ElementKeyInt(pos)) => usize::try_from(*pos)
                .ok()
                .and_then(|pos| elements.get(pos))
                .ok_or(ValueError::InvalidStep),
            (Type::Object(obj), AttributePathStep::AttributeName(name)) => {
                obj.attribute_type(name).ok_or(ValueError::InvalidStep)
            }
            _ => Err(ValueError::InvalidStep),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "Bool"),
            Type::Number => write!(f, "Number"),
            Type::String => write!(f, "String"),
            Type::DynamicPseudoType => write!(f, "DynamicPseudoType"),
            Type::List(element) => write!(f, "List[{}]", element),
            Type::Set(element) => write!(f, "Set[{}]", element),
            Type::Map(element) => write!(f, "Map[{}]", element),
            Type::Tuple(elements) => {
                write!(f, "Tuple[")?;
                for (pos, element) in elements.iter().enumerate() {
                    if pos > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Type::Object(obj) => {
                write!(f, "Object[")?;
                for (pos, (name, ty)) in obj.attribute_types.iter().enumerate() {
                    if pos > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}:{}", name, ty)?;
                    if obj.is_optional(name) {
                        write!(f, "?")?;
                    }
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_types() -> Vec<Type> {
        vec![
            Type::Bool,
            Type::Number,
            Type::String,
            Type::DynamicPseudoType,
            Type::list(Type::String),
            Type::set(Type::Number),
            Type::map(Type::Bool),
            Type::tuple([Type::String, Type::list(Type::Number)]),
            Type::object([("a", Type::String), ("b", Type::map(Type::Number))]),
        ]
    }

    #[test]
    fn test_is_ignores_element_types() {
        assert!(Type::list(Type::String).is(&Type::list(Type::Number)));
        assert!(!Type::list(Type::String).is(&Type::set(Type::String)));
        assert!(Type::object([("a", Type::Bool)]).is(&Type::object(Vec::<(String, Type)>::new())));
    }

    #[test]
    fn test_equal_is_structural() {
        assert!(Type::list(Type::String).equal(&Type::list(Type::String)));
        assert!(!Type::list(Type::String).equal(&Type::list(Type::Number)));
        assert!(!Type::tuple([Type::String]).equal(&Type::tuple([Type::String, Type::String])));
        assert!(!Type::String.equal(&Type::DynamicPseudoType));
    }

    #[test]
    fn test_object_equal_ignores_declaration_order() {
        let a = Type::object([("a", Type::String), ("b", Type::Number)]);
        let b = Type::object([("b", Type::Number), ("a", Type::String)]);
        assert!(a.equal(&b));
        assert!(b.equal(&a));
    }

    #[test]
    fn test_object_equal_requires_same_optional_attributes() {
        let required = ObjectType::new([("a", Type::String), ("b", Type::Number)]);
        let optional = required.clone().with_optional(["b"]).unwrap();
        assert!(!Type::Object(required.clone()).equal(&Type::Object(optional.clone())));
        assert!(!Type::Object(optional.clone()).equal(&Type::Object(required)));
        assert!(Type::Object(optional.clone()).equal(&Type::Object(optional)));
    }

    #[test]
    fn test_with_optional_rejects_unknown_names() {
        let err = ObjectType::new([("a", Type::String)])
            .with_optional(["missing"])
            .unwrap_err();
        assert_eq!(
            err,
            ValueError::UndefinedOptionalAttribute {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_usable_as_reflexive_and_dynamic_absorbs() {
        for ty in all_types() {
            assert!(ty.usable_as(&Type::DynamicPseudoType), "{} as dynamic", ty);
            if !matches!(ty, Type::DynamicPseudoType) {
                assert!(ty.usable_as(&ty), "{} as itself", ty);
            }
        }
    }

    #[test]
    fn test_usable_as_is_directional() {
        assert!(Type::list(Type::String).usable_as(&Type::list(Type::DynamicPseudoType)));
        assert!(!Type::list(Type::DynamicPseudoType).usable_as(&Type::list(Type::String)));
        assert!(!Type::DynamicPseudoType.usable_as(&Type::String));
        assert!(!Type::String.usable_as(&Type::Number));
    }

    #[test]
    fn test_usable_as_tuple_and_object_need_same_shape() {
        let t2 = Type::tuple([Type::String, Type::Number]);
        assert!(t2.usable_as(&Type::tuple([Type::DynamicPseudoType, Type::Number])));
        assert!(!t2.usable_as(&Type::tuple([Type::String])));

        let obj = Type::object([("a", Type::String)]);
        assert!(obj.usable_as(&Type::object([("a", Type::DynamicPseudoType)])));
        assert!(!obj.usable_as(&Type::object([("a", Type::String), ("b", Type::String)])));
        assert!(!obj.usable_as(&Type::object([("b", Type::String)])));
    }

    #[test]
    #[should_panic(expected = "optional attributes")]
    fn test_usable_as_panics_on_optional_receiver() {
        let obj = Type::Object(
            ObjectType::new([("a", Type::String)])
                .with_optional(["a"])
                .unwrap(),
        );
        obj.usable_as(&Type::object([("a", Type::String)]));
    }

    #[test]
    fn test_try_usable_as_reports_optional_receiver() {
        let obj = Type::Object(
            ObjectType::new([("a", Type::String)])
                .with_optional(["a"])
                .unwrap(),
        );
        assert_eq!(
            obj.try_usable_as(&Type::object([("a", Type::String)])),
            Err(ValueError::OptionalAttributesNotUsable)
        );
        assert_eq!(obj.try_usable_as(&Type::DynamicPseudoType), Ok(true));
        assert!(obj.conforms_to(&obj.clone()));
    }

    #[test]
    fn test_apply_step_to_types() {
        let tuple = Type::tuple([Type::String, Type::Bool]);
        assert!(tuple
            .apply_attribute_path_step(&AttributePathStep::ElementKeyInt(1))
            .unwrap()
            .equal(&Type::Bool));
        assert_eq!(
            tuple
                .apply_attribute_path_step(&AttributePathStep::ElementKeyInt(2))
                .unwrap_err(),
            ValueError::InvalidStep
        );
        assert_eq!(
            tuple
                .apply_attribute_path_step(&AttributePathStep::ElementKeyInt(-1))
                .unwrap_err(),
            ValueError::InvalidStep
        );
        assert_eq!(
            Type::list(Type::String)
                .apply_attribute_path_step(&AttributePathStep::AttributeName("x".into()))
                .unwrap_err(),
            ValueError::InvalidStep
        );
        assert_eq!(
            Type::String
                .apply_attribute_path_step(&AttributePathStep::ElementKeyInt(0))
                .unwrap_err(),
            ValueError::InvalidStep
        );
    }

    #[test]
    fn test_display() {
        let obj = Type::Object(
            ObjectType::new([("b", Type::Number), ("a", Type::list(Type::String))])
                .with_optional(["b"])
                .unwrap(),
        );
        assert_eq!(obj.to_string(), "Object[\"a\":List[String], \"b\":Number?]");
        assert_eq!(
            Type::tuple([Type::Bool, Type::map(Type::DynamicPseudoType)]).to_string(),
            "Tuple[Bool, Map[DynamicPseudoType]]"
        );
    }

    #[test]
    fn test_type_from_elements() {
        assert!(type_from_elements(&[])
            .unwrap()
            .equal(&Type::DynamicPseudoType));

        let strings = vec![
            Value::new(Type::String, "a").unwrap(),
            Value::null(Type::String),
        ];
        assert!(type_from_elements(&strings).unwrap().equal(&Type::String));

        let mixed = vec![
            Value::new(Type::String, "a").unwrap(),
            Value::new(Type::Bool, true).unwrap(),
        ];
        assert_eq!(
            type_from_elements(&mixed).unwrap_err(),
            ValueError::MixedElementTypes
        );
    }
}
