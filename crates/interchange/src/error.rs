use std::fmt;

use tfvalue_core::AttributePathError;

/// Errors specific to the JSON wire encoding.
///
/// These are always reported as the cause of an [`AttributePathError`] that
/// locates the offending JSON element. Type signature and value
/// construction failures keep their own core error types as the cause.
#[derive(Debug)]
pub enum InterchangeError {
    /// The input is not well-formed JSON.
    InvalidJson(serde_json::Error),
    /// The JSON element has the wrong shape for the target type.
    UnexpectedJson {
        expected: &'static str,
        found: &'static str,
    },
    /// An object attribute the target object type does not declare.
    UnsupportedAttribute(String),
    /// A tuple array with the wrong number of elements.
    TupleArity { expected: usize, got: usize },
    /// Number text that does not parse as a decimal.
    InvalidNumber { text: String, reason: String },
    /// A string that was expected to spell a boolean.
    InvalidBool(String),
    /// A dynamic value wrapper with a key other than `type` or `value`.
    UnsupportedDynamicKey(String),
    /// A dynamic value wrapper without one of its two keys.
    MissingDynamicKey(&'static str),
    /// Unknown values have no wire representation.
    UnknownValue,
}

impl InterchangeError {
    /// The interchange cause of `err`, if it has one.
    pub fn from_path_error(err: &AttributePathError) -> Option<&InterchangeError> {
        err.cause()?.downcast_ref::<InterchangeError>()
    }
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::InvalidJson(err) => write!(f, "invalid JSON: {}", err),
            InterchangeError::UnexpectedJson { expected, found } => {
                write!(f, "expected JSON {}, got {}", expected, found)
            }
            InterchangeError::UnsupportedAttribute(name) => {
                write!(f, "unsupported attribute {:?}", name)
            }
            InterchangeError::TupleArity { expected, got } => write!(
                f,
                "can't decode a tuple of {} elements from {} elements",
                expected, got
            ),
            InterchangeError::InvalidNumber { text, reason } => {
                write!(f, "invalid number {:?}: {}", text, reason)
            }
            InterchangeError::InvalidBool(text) => {
                write!(f, "can't read {:?} as a bool", text)
            }
            InterchangeError::UnsupportedDynamicKey(key) => write!(
                f,
                "unsupported key {:?} in dynamic value, expected \"type\" and \"value\"",
                key
            ),
            InterchangeError::MissingDynamicKey(key) => {
                write!(f, "dynamic value is missing the {:?} key", key)
            }
            InterchangeError::UnknownValue => {
                write!(f, "unknown values can't be encoded as JSON")
            }
        }
    }
}

impl std::error::Error for InterchangeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InterchangeError::InvalidJson(err) => Some(err),
            _ => None,
        }
    }
}
