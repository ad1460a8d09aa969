//! Error types shared by the type model, values and traversal.
//!
//! Leaf conditions are [`ValueError`] variants. Anything that happens at a
//! location inside a value or type tree is reported as an
//! [`AttributePathError`], which carries the path to that location and the
//! underlying cause.

use std::error::Error as StdError;
use std::fmt;

use crate::path::AttributePath;

/// Boxed error accepted as the cause of an [`AttributePathError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Leaf error conditions raised by types, values and traversal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// An attribute path step does not apply to the container it was used on,
    /// or the key/index it names does not exist.
    #[error("step cannot be applied to this value")]
    InvalidStep,

    /// The raw input has the wrong shape for the declared type.
    #[error("can't create a value of type {ty} from {got}, expected {expected}")]
    UnsupportedRaw {
        ty: String,
        got: &'static str,
        expected: &'static str,
    },

    /// DynamicPseudoType values may only be null or unknown.
    #[error("DynamicPseudoType can only contain null or unknown values")]
    KnownDynamic,

    /// A child value's type cannot stand in for the declared element type.
    #[error("can't use {got} as {expected}")]
    ElementType { got: String, expected: String },

    /// A list, set or map was built from elements of differing types.
    #[error("{container}s must only contain one type of element, saw {first} and {second}")]
    Heterogeneous {
        container: &'static str,
        first: String,
        second: String,
    },

    /// A tuple was built from the wrong number of elements.
    #[error("can't create a tuple of {expected} elements from {got} elements")]
    TupleArity { expected: usize, got: usize },

    /// A non-optional object attribute was not supplied.
    #[error("required attribute \"{name}\" not set on {ty}")]
    MissingAttribute { name: String, ty: String },

    /// An object value named an attribute its type does not declare.
    #[error("can't set a value on \"{name}\", key not part of the object type {ty}")]
    UndefinedAttribute { name: String, ty: String },

    /// An optional attribute was declared that is not one of the object's attributes.
    #[error("optional attribute \"{name}\" is not an attribute of the object type")]
    UndefinedOptionalAttribute { name: String },

    /// Unknown values have no datum to convert.
    #[error("unmarshaling unknown values is not supported")]
    UnknownConversion,

    /// The destination of a conversion does not match the value's type.
    #[error("can't unmarshal {ty} into {target}, expected {expected}")]
    Conversion {
        ty: String,
        target: &'static str,
        expected: &'static str,
    },

    /// `usable_as` was asked about an object type that carries optional attributes.
    #[error("objects with optional attributes cannot be checked for usability")]
    OptionalAttributesNotUsable,

    /// A transform returned a value whose type cannot stand in for the original.
    #[error("invalid transform: value changed type from {from} to {to}")]
    InvalidTransform { from: String, to: String },

    /// Diffing requires both values to have equal types.
    #[error("can't diff values of different types: {left} and {right}")]
    DiffTypeMismatch { left: String, right: String },

    /// `type_from_elements` saw more than one element type.
    #[error("elements do not all have the same types")]
    MixedElementTypes,

    /// Text that could not be parsed as a decimal number.
    #[error("invalid number {text:?}: {reason}")]
    InvalidNumber { text: String, reason: String },
}

/// Errors parsing the JSON type signature format.
#[derive(Debug, thiserror::Error)]
pub enum TypeParseError {
    #[error("invalid JSON type signature: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown primitive type {0:?}")]
    UnknownPrimitive(String),

    #[error("unknown type kind {0:?}")]
    UnknownKind(String),

    #[error("{kind} type signature expects {expected} elements, got {got}")]
    Arity {
        kind: String,
        expected: &'static str,
        got: usize,
    },

    #[error("invalid {kind} type payload: {reason}")]
    InvalidPayload { kind: String, reason: String },

    #[error("type signature must be a string or an array, got {0}")]
    UnexpectedToken(String),
}

/// An error tied to a location inside a value or type tree.
///
/// Renders as `"<path>: <cause>"` when the path is non-empty and as the bare
/// cause at the root.
#[derive(Debug)]
pub struct AttributePathError {
    path: AttributePath,
    source: Option<BoxError>,
}

impl AttributePathError {
    pub fn new(path: AttributePath, source: impl Into<BoxError>) -> Self {
        AttributePathError {
            path,
            source: Some(source.into()),
        }
    }

    /// An error that names a location but carries no cause.
    pub fn without_source(path: AttributePath) -> Self {
        AttributePathError { path, source: None }
    }

    pub fn path(&self) -> &AttributePath {
        &self.path
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// The underlying [`ValueError`], if that is what the cause is.
    pub fn value_error(&self) -> Option<&ValueError> {
        self.source.as_deref()?.downcast_ref::<ValueError>()
    }

    /// True when the cause is [`ValueError::InvalidStep`].
    pub fn is_invalid_step(&self) -> bool {
        matches!(self.value_error(), Some(ValueError::InvalidStep))
    }

    /// Re-roots this error below `prefix`, so a path relative to a child
    /// becomes a path relative to the child's ancestor.
    pub fn under(self, prefix: &AttributePath) -> Self {
        AttributePathError {
            path: prefix.join(&self.path),
            source: self.source,
        }
    }

    /// Equal paths and equal cause messages (or both without a cause).
    pub fn equal(&self, other: &AttributePathError) -> bool {
        if !self.path.equal(&other.path) {
            return false;
        }
        match (&self.source, &other.source) {
            (None, None) => true,
            (Some(a), Some(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl fmt::Display for AttributePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source, self.path.is_empty()) {
            (Some(source), true) => write!(f, "{}", source),
            (Some(source), false) => write!(f, "{}: {}", self.path, source),
            (None, _) => write!(f, "{}", self.path),
        }
    }
}

impl StdError for AttributePathError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn StdError + 'static))
    }
}

impl From<ValueError> for AttributePathError {
    fn from(err: ValueError) -> Self {
        AttributePathError::new(AttributePath::new(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_error_renders_bare_message() {
        let err = AttributePathError::from(ValueError::InvalidStep);
        assert_eq!(err.to_string(), "step cannot be applied to this value");
        assert!(err.is_invalid_step());
    }

    #[test]
    fn test_nested_error_renders_path_prefix() {
        let path = AttributePath::new()
            .with_attribute_name("tags")
            .with_element_key_string("Name");
        let err = path.new_error("boom");
        assert_eq!(err.to_string(), "tags[\"Name\"]: boom");
        assert!(!err.is_invalid_step());
        assert!(err.value_error().is_none());
    }

    #[test]
    fn test_equal_compares_path_and_message() {
        let path = AttributePath::new().with_attribute_name("a");
        let a = path.new_error("same");
        let b = AttributePath::new().with_attribute_name("a").new_error("same");
        let c = path.new_error("different");
        let d = AttributePath::new().with_attribute_name("b").new_error("same");
        assert!(a.equal(&b));
        assert!(!a.equal(&c));
        assert!(!a.equal(&d));

        let empty1 = AttributePathError::without_source(path.clone());
        let empty2 = AttributePathError::without_source(path);
        assert!(empty1.equal(&empty2));
        assert!(!empty1.equal(&a));
    }

    #[test]
    fn test_under_prefixes_path() {
        let inner = AttributePath::new().with_element_key_int(2).new_error("bad");
        let outer = inner.under(&AttributePath::new().with_attribute_name("list"));
        assert_eq!(outer.to_string(), "list[2]: bad");
    }
}
