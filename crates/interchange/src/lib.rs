//! tfvalue-interchange: JSON wire encoding for tfvalue values.
//!
//! Values travel as plain JSON shaped by their type: strings, numbers and
//! bools as JSON scalars, lists, sets and tuples as arrays, maps and objects
//! as objects, and null as `null`. Positions typed `DynamicPseudoType` carry
//! their concrete type alongside the payload. Type signatures use the format
//! implemented by [`tfvalue_core::parse_json_type`].
//!
//! Decoding needs the target type; encoding reads it from the value.
//! Every error is an [`AttributePathError`](tfvalue_core::AttributePathError)
//! locating the offending element, with an [`InterchangeError`] or a core
//! error as its cause.

pub mod decode;
pub mod encode;
pub mod error;
pub mod options;

pub use decode::{value_from_json, value_from_json_value, value_from_json_with_options};
pub use encode::{value_to_json, value_to_json_bytes};
pub use error::InterchangeError;
pub use options::DecodeOptions;
