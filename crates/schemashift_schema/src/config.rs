//! Conversion options.

use crate::defaults::{DEFAULT_MAX_DEPTH, DEFAULT_RECORD_NAME};
use crate::error::{ConvertError, Result};
use crate::format::SchemaFormat;
use tracing::warn;

/// What to do with a source type that has no equivalent in the destination format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedTypePolicy {
    /// Fail the conversion with [`ConvertError::UnsupportedType`] (default)
    #[default]
    Reject,
    /// Emit an empty-string type and keep going
    Placeholder,
}

impl UnsupportedTypePolicy {
    /// Apply the policy to an unsupported type found at `path`.
    ///
    /// Returns `Ok(())` when the caller should emit the placeholder type.
    pub(crate) fn apply(&self, path: &str, type_name: &str, target: SchemaFormat) -> Result<()> {
        match self {
            UnsupportedTypePolicy::Reject => Err(ConvertError::UnsupportedType {
                path: path.to_string(),
                type_name: type_name.to_string(),
                target,
            }),
            UnsupportedTypePolicy::Placeholder => {
                warn!(
                    field = path,
                    type_name,
                    %target,
                    "No equivalent type, emitting empty placeholder"
                );
                Ok(())
            }
        }
    }
}

/// Options controlling a single conversion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Name of the top-level Avro record produced from a BigQuery schema
    pub record_name: String,
    /// Namespace of the top-level Avro record, if any
    pub namespace: Option<String>,
    /// Deepest nesting accepted while decoding the input schema
    pub max_depth: usize,
    /// Handling of types without a destination equivalent
    pub unsupported: UnsupportedTypePolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            record_name: DEFAULT_RECORD_NAME.to_string(),
            namespace: None,
            max_depth: DEFAULT_MAX_DEPTH,
            unsupported: UnsupportedTypePolicy::default(),
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the top-level record name
    pub fn with_record_name(mut self, name: impl Into<String>) -> Self {
        self.record_name = name.into();
        self
    }

    /// Set the top-level record namespace
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace.filter(|ns| !ns.is_empty());
        self
    }

    /// Set the maximum decoding depth (clamped to at least 1)
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Set the unsupported-type policy
    pub fn with_unsupported(mut self, policy: UnsupportedTypePolicy) -> Self {
        self.unsupported = policy;
        self
    }
}
