//! Depth-first traversal and rewriting of value trees.
//!
//! [`walk`] visits nodes in pre-order and lets the visitor prune or stop.
//! [`transform`] rewrites in post-order: children are rewritten before the
//! parent sees them, and every rebuilt container is validated again.
//!
//! Children are visited in a fixed order: lists and tuples by position,
//! maps and objects by key, sets in element order. A set element's path
//! step is the element itself.

use crate::error::{AttributePathError, BoxError, ValueError};
use crate::path::AttributePath;
use crate::value::Value;

/// What [`walk`] does after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Visit this node's children next.
    Descend,
    /// Continue with the next sibling, skipping this node's children.
    SkipChildren,
    /// End the walk. [`walk`] returns `Ok(())`.
    Stop,
}

enum Flow {
    Continue,
    Stop,
}

/// Visits `value` and its descendants in depth-first pre-order.
///
/// A visitor error aborts the walk and comes back carrying the path of the
/// node being visited. Unknown and null values have no children.
pub fn walk<F, E>(value: &Value, mut visitor: F) -> Result<(), AttributePathError>
where
    F: FnMut(&AttributePath, &Value) -> Result<WalkAction, E>,
    E: Into<BoxError>,
{
    walk_node(&AttributePath::new(), value, &mut visitor)?;
    Ok(())
}

fn walk_node<F, E>(path: &AttributePath, value: &Value, visitor: &mut F) -> Result<Flow, AttributePathError>
where
    F: FnMut(&AttributePath, &Value) -> Result<WalkAction, E>,
    E: Into<BoxError>,
{
    match visitor(path, value).map_err(|err| path.new_error(err))? {
        WalkAction::Stop => return Ok(Flow::Stop),
        WalkAction::SkipChildren => return Ok(Flow::Continue),
        WalkAction::Descend => {}
    }
    for (step, child) in value.children() {
        if let Flow::Stop = walk_node(&path.with_step(step), child, visitor)? {
            return Ok(Flow::Stop);
        }
    }
    Ok(Flow::Continue)
}

/// Rewrites `value` bottom-up.
///
/// The visitor receives each node after its children have been rewritten
/// and returns the node's replacement. A replacement whose type cannot stand
/// in for the original type aborts the transform with
/// [`ValueError::InvalidTransform`] at that node's path.
pub fn transform<F, E>(value: &Value, mut visitor: F) -> Result<Value, AttributePathError>
where
    F: FnMut(&AttributePath, Value) -> Result<Value, E>,
    E: Into<BoxError>,
{
    transform_node(&AttributePath::new(), value, &mut visitor)
}

fn transform_node<F, E>(path: &AttributePath, value: &Value, visitor: &mut F) -> Result<Value, AttributePathError>
where
    F: FnMut(&AttributePath, Value) -> Result<Value, E>,
    E: Into<BoxError>,
{
    let children = value.children();
    let rebuilt = if children.is_empty() {
        value.clone()
    } else {
        let mut rewritten = Vec::with_capacity(children.len());
        for (step, child) in children {
            rewritten.push(transform_node(&path.with_step(step), child, visitor)?);
        }
        value.with_children(rewritten).map_err(|err| err.under(path))?
    };

    let replacement = visitor(path, rebuilt).map_err(|err| path.new_error(err))?;
    if !replacement.ty().conforms_to(value.ty()) {
        tracing::debug!(
            path = %path,
            from = %value.ty(),
            to = %replacement.ty(),
            "transform changed value type"
        );
        return Err(path.new_error(ValueError::InvalidTransform {
            from: value.ty().to_string(),
            to: replacement.ty().to_string(),
        }));
    }
    Ok(replacement)
}
