//! Decode configuration.

use serde::Deserialize;

/// Options for [`crate::value_from_json_with_options`].
///
/// Deserializable so an embedding application can keep it in its own
/// configuration file; absent fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Parse and discard object attributes the type does not declare,
    /// instead of failing. Useful for reading state written before an
    /// attribute was removed from a schema.
    pub ignore_undefined_attributes: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_undefined_attributes(mut self, ignore: bool) -> Self {
        self.ignore_undefined_attributes = ignore;
        self
    }
}
