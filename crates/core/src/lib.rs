//! tfvalue-core: typed dynamic values.
//!
//! A closed [`Type`] model, [`Value`]s that are known, unknown or null, and
//! [`AttributePath`]s that locate positions inside either. On top of those:
//! pre-order [`walk`], post-order [`transform`], and location-by-location
//! [`diff`].
//!
//! # Public API
//!
//! - [`Type`], [`ObjectType`], [`type_from_elements`], [`parse_json_type`]
//! - [`Value`], [`RawValue`], [`FromValue`]
//! - [`AttributePath`], [`AttributePathStep`], [`AttributePathStepper`],
//!   [`walk_attribute_path`]
//! - [`walk()`], [`WalkAction`], [`transform()`]
//! - [`diff()`], [`ValueDiff`]
//! - [`parse_number`], [`format_number`], [`BigDecimal`], [`Decimal`]
//! - [`ValueError`], [`TypeParseError`], [`AttributePathError`], [`BoxError`]
//!
//! Numbers are arbitrary-precision [`BigDecimal`]s. [`Decimal`] is accepted
//! when building values and as an [`Value::extract`] destination for
//! numbers that fit it.
//!
//! Neither `Type` nor `Value` implements `PartialEq`. Compare with
//! `is`, `equal` or `usable_as`.

pub mod diff;
pub mod error;
pub mod path;
pub mod types;
pub mod value;
pub mod walk;

// ── Convenience re-exports ───────────────────────────────────────────

pub use diff::{diff, ValueDiff};
pub use error::{AttributePathError, BoxError, TypeParseError, ValueError};
pub use path::{walk_attribute_path, AttributePath, AttributePathStep, AttributePathStepper};
pub use types::{parse_json_type, type_from_elements, ObjectType, Type};
pub use value::number::{format_number, parse_number};
pub use value::{FromValue, RawValue, Value};
pub use walk::{transform, walk, WalkAction};

pub use bigdecimal::BigDecimal;
pub use rust_decimal::Decimal;
