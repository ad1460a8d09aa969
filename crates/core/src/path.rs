//! Attribute paths: ordered steps locating a position inside a type or value tree.
//!
//! A path is built with the immutable `with_*` builders, starting from the
//! root (`AttributePath::new()`). Containers resolve one step at a time
//! through [`AttributePathStepper`]; [`walk_attribute_path`] applies a whole
//! path.
//!
//! Rendering uses `.name` for attributes (no leading dot at the root),
//! `[2]` for positions, `["key"]` for map keys and `[<value>]` for set
//! elements, e.g. `foo[2].bar["k"]`.

use std::fmt;

use crate::error::{AttributePathError, BoxError, ValueError};
use crate::value::Value;

// ── Steps ────────────────────────────────────────

/// One step of an [`AttributePath`].
#[derive(Debug, Clone)]
pub enum AttributePathStep {
    /// An object attribute.
    AttributeName(String),
    /// A map element.
    ElementKeyString(String),
    /// A list or tuple position.
    ElementKeyInt(i64),
    /// A set element, identified by its own value.
    ElementKeyValue(Value),
}

impl AttributePathStep {
    /// Same step kind and same key.
    pub fn equal(&self, other: &AttributePathStep) -> bool {
        match (self, other) {
            (AttributePathStep::AttributeName(a), AttributePathStep::AttributeName(b)) => a == b,
            (AttributePathStep::ElementKeyString(a), AttributePathStep::ElementKeyString(b)) => {
                a == b
            }
            (AttributePathStep::ElementKeyInt(a), AttributePathStep::ElementKeyInt(b)) => a == b,
            (AttributePathStep::ElementKeyValue(a), AttributePathStep::ElementKeyValue(b)) => {
                a.equal(b)
            }
            _ => false,
        }
    }
}

impl fmt::Display for AttributePathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributePathStep::AttributeName(name) => write!(f, ".{}", name),
            AttributePathStep::ElementKeyString(key) => write!(f, "[{:?}]", key),
            AttributePathStep::ElementKeyInt(pos) => write!(f, "[{}]", pos),
            AttributePathStep::ElementKeyValue(value) => write!(f, "[{}]", value),
        }
    }
}

// ── Paths ────────────────────────────────────────

/// An ordered sequence of steps from the root of a tree.
#[derive(Debug, Clone, Default)]
pub struct AttributePath {
    steps: Vec<AttributePathStep>,
}

impl AttributePath {
    /// The root path.
    pub fn new() -> Self {
        AttributePath { steps: Vec::new() }
    }

    pub fn from_steps(steps: Vec<AttributePathStep>) -> Self {
        AttributePath { steps }
    }

    pub fn steps(&self) -> &[AttributePathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_step(&self) -> Option<&AttributePathStep> {
        self.steps.last()
    }

    /// The parent path; the root stays the root.
    pub fn without_last_step(&self) -> AttributePath {
        let mut steps = self.steps.clone();
        steps.pop();
        AttributePath { steps }
    }

    pub fn with_step(&self, step: AttributePathStep) -> AttributePath {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend(self.steps.iter().cloned());
        steps.push(step);
        AttributePath { steps }
    }

    pub fn with_attribute_name(&self, name: impl Into<String>) -> AttributePath {
        self.with_step(AttributePathStep::AttributeName(name.into()))
    }

    pub fn with_element_key_string(&self, key: impl Into<String>) -> AttributePath {
        self.with_step(AttributePathStep::ElementKeyString(key.into()))
    }

    pub fn with_element_key_int(&self, pos: i64) -> AttributePath {
        self.with_step(AttributePathStep::ElementKeyInt(pos))
    }

    pub fn with_element_key_value(&self, value: Value) -> AttributePath {
        self.with_step(AttributePathStep::ElementKeyValue(value))
    }

    /// This path followed by every step of `rest`.
    pub fn join(&self, rest: &AttributePath) -> AttributePath {
        let mut steps = self.steps.clone();
        steps.extend(rest.steps.iter().cloned());
        AttributePath { steps }
    }

    /// Same length and pairwise-equal steps.
    pub fn equal(&self, other: &AttributePath) -> bool {
        self.steps.len() == other.steps.len()
            && self
                .steps
                .iter()
                .zip(other.steps.iter())
                .all(|(a, b)| a.equal(b))
    }

    /// Wraps `err` with this path as its location.
    pub fn new_error(&self, err: impl Into<BoxError>) -> AttributePathError {
        AttributePathError::new(self.clone(), err)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, step) in self.steps.iter().enumerate() {
            match step {
                AttributePathStep::AttributeName(name) if pos == 0 => write!(f, "{}", name)?,
                step => write!(f, "{}", step)?,
            }
        }
        Ok(())
    }
}

// ── Step application ─────────────────────────────

/// A node that can resolve a single path step to one of its children.
///
/// Implemented by [`crate::Type`] and [`Value`]. Steps that do not fit the
/// container, or that name a missing key, yield [`ValueError::InvalidStep`].
pub trait AttributePathStepper {
    fn apply_attribute_path_step(&self, step: &AttributePathStep) -> Result<&Self, ValueError>;
}

/// Applies every step of `path` to `root` and returns the node reached.
///
/// On failure the error's path is the prefix of `path` up to and including
/// the step that could not be applied.
pub fn walk_attribute_path<'a, T>(
    root: &'a T,
    path: &AttributePath,
) -> Result<&'a T, AttributePathError>
where
    T: AttributePathStepper + ?Sized,
{
    let mut current = root;
    for (pos, step) in path.steps.iter().enumerate() {
        current = current.apply_attribute_path_step(step).map_err(|err| {
            AttributePath::from_steps(path.steps[..=pos].to_vec()).new_error(err)
        })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    #[test]
    fn test_render_attribute_then_index() {
        let path = AttributePath::new()
            .with_attribute_name("foo")
            .with_element_key_int(2);
        assert_eq!(path.to_string(), "foo[2]");
    }

    #[test]
    fn test_render_mixed_steps() {
        let path = AttributePath::new()
            .with_element_key_int(0)
            .with_attribute_name("bar")
            .with_element_key_string("k")
            .with_element_key_value(Value::new(Type::String, "x").unwrap());
        assert_eq!(path.to_string(), "[0].bar[\"k\"][String<\"x\">]");
        assert_eq!(AttributePath::new().to_string(), "");
    }

    #[test]
    fn test_equal_paths() {
        let a = AttributePath::new()
            .with_attribute_name("foo")
            .with_element_key_int(2);
        let b = AttributePath::new()
            .with_attribute_name("foo")
            .with_element_key_int(2);
        assert!(a.equal(&b));
        assert!(b.equal(&a));
    }

    #[test]
    fn test_step_kind_mismatch_not_equal() {
        let a = AttributePath::new().with_element_key_string("2");
        let b = AttributePath::new().with_element_key_int(2);
        assert!(!a.equal(&b));

        let shorter = AttributePath::new().with_attribute_name("foo");
        let longer = shorter.with_element_key_int(0);
        assert!(!shorter.equal(&longer));
    }

    #[test]
    fn test_builders_do_not_mutate_receiver() {
        let base = AttributePath::new().with_attribute_name("a");
        let _child = base.with_attribute_name("b");
        assert_eq!(base.len(), 1);
        assert!(base.without_last_step().is_empty());
        assert!(AttributePath::new().without_last_step().is_empty());
    }

    #[test]
    fn test_walk_attribute_path_over_types() {
        let ty = Type::object([(
            "tags",
            Type::map(Type::list(Type::Number)),
        )]);
        let path = AttributePath::new()
            .with_attribute_name("tags")
            .with_element_key_string("anything")
            .with_element_key_int(7);
        let reached = walk_attribute_path(&ty, &path).unwrap();
        assert!(reached.equal(&Type::Number));
    }

    #[test]
    fn test_walk_attribute_path_reports_failing_prefix() {
        let ty = Type::object([("name", Type::String)]);
        let path = AttributePath::new()
            .with_attribute_name("name")
            .with_element_key_int(0)
            .with_attribute_name("never");
        let err = walk_attribute_path(&ty, &path).unwrap_err();
        assert!(err.is_invalid_step());
        assert_eq!(err.path().len(), 2);
        assert_eq!(err.to_string(), "name[0]: step cannot be applied to this value");
    }
}
