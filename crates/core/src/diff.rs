//! Location-by-location differences between two values of the same type.

use std::convert::Infallible;
use std::fmt;

use crate::error::{AttributePathError, ValueError};
use crate::path::{walk_attribute_path, AttributePath};
use crate::value::Value;
use crate::walk::{walk, WalkAction};

/// A single difference. A side is `None` when the location does not exist
/// in that value.
#[derive(Debug, Clone)]
pub struct ValueDiff {
    pub path: AttributePath,
    pub value1: Option<Value>,
    pub value2: Option<Value>,
}

impl ValueDiff {
    pub fn equal(&self, other: &ValueDiff) -> bool {
        fn side_equal(a: &Option<Value>, b: &Option<Value>) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a.equal(b),
                _ => false,
            }
        }
        self.path.equal(&other.path)
            && side_equal(&self.value1, &other.value1)
            && side_equal(&self.value2, &other.value2)
    }
}

impl fmt::Display for ValueDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |v: &Option<Value>| match v {
            Some(v) => v.to_string(),
            None => "absent".to_string(),
        };
        write!(f, "{}: {} => {}", self.path, side(&self.value1), side(&self.value2))
    }
}

/// Every location where `value1` and `value2` differ.
///
/// Locations present only in `value2` come first, then the rest in
/// pre-order over `value1`. A container whose length or key set changed is
/// reported itself and its common children are still compared. Both values
/// must have equal types.
pub fn diff(value1: &Value, value2: &Value) -> Result<Vec<ValueDiff>, AttributePathError> {
    if !value1.ty().equal(value2.ty()) {
        return Err(ValueError::DiffTypeMismatch {
            left: value1.ty().to_string(),
            right: value2.ty().to_string(),
        }
        .into());
    }

    let mut diffs = Vec::new();

    walk(value2, |path, v2| {
        match walk_attribute_path(value1, path) {
            Ok(v1) if v1.is_known() && !v1.is_null() => Ok::<_, Infallible>(WalkAction::Descend),
            Ok(_) => Ok(WalkAction::SkipChildren),
            Err(_) => {
                diffs.push(ValueDiff {
                    path: path.clone(),
                    value1: None,
                    value2: Some(v2.clone()),
                });
                Ok(WalkAction::SkipChildren)
            }
        }
    })?;

    walk(value1, |path, v1| {
        let Ok(v2) = walk_attribute_path(value2, path) else {
            diffs.push(ValueDiff {
                path: path.clone(),
                value1: Some(v1.clone()),
                value2: None,
            });
            return Ok::<_, Infallible>(WalkAction::SkipChildren);
        };
        if !v1.shallow_equal(v2) {
            diffs.push(ValueDiff {
                path: path.clone(),
                value1: Some(v1.clone()),
                value2: Some(v2.clone()),
            });
        }
        if v1.ty().is(v2.ty()) && v2.is_known() && !v2.is_null() {
            Ok(WalkAction::Descend)
        } else {
            Ok(WalkAction::SkipChildren)
        }
    })?;

    Ok(diffs)
}

impl Value {
    /// See [`diff`].
    pub fn diff(&self, other: &Value) -> Result<Vec<ValueDiff>, AttributePathError> {
        diff(self, other)
    }
}
