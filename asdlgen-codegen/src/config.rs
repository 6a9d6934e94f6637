//! Generator configuration.

use crate::error::CodegenError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Options controlling what the generator emits.
///
/// Missing keys take their default when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Append `_e` / `_i` to generated enumeration names.
    pub strong_enum_suffix: bool,
    /// Generate tree-serialization methods.
    pub emit_debug_methods: bool,
    /// Simple sums rendered as integer constants instead of typed enums.
    pub flat_integer_sums: BTreeSet<String>,
    /// Collect the tag-to-class tables for external tooling.
    pub debug_sidecar: bool,
    /// Generated classes whose abbreviated tree first consults a hand-written
    /// hook named `_<Class>`.
    pub abbreviation_hooks: BTreeSet<String>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            strong_enum_suffix: true,
            emit_debug_methods: true,
            flat_integer_sums: BTreeSet::new(),
            debug_sidecar: false,
            abbreviation_hooks: BTreeSet::new(),
        }
    }
}

impl GenConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from JSON text.
    ///
    /// # Errors
    /// Returns `CodegenError::Json` if the text is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, CodegenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets whether enumeration names carry a suffix.
    #[must_use]
    pub fn strong_enum_suffix(mut self, enabled: bool) -> Self {
        self.strong_enum_suffix = enabled;
        self
    }

    /// Sets whether tree-serialization methods are generated.
    #[must_use]
    pub fn emit_debug_methods(mut self, enabled: bool) -> Self {
        self.emit_debug_methods = enabled;
        self
    }

    /// Marks a simple sum as flat-integer.
    #[must_use]
    pub fn flat_integer_sum(mut self, name: impl Into<String>) -> Self {
        self.flat_integer_sums.insert(name.into());
        self
    }

    /// Sets whether the debug sidecar is produced.
    #[must_use]
    pub fn debug_sidecar(mut self, enabled: bool) -> Self {
        self.debug_sidecar = enabled;
        self
    }

    /// Registers a hand-written abbreviation hook for a generated class.
    #[must_use]
    pub fn abbreviation_hook(mut self, class_name: impl Into<String>) -> Self {
        self.abbreviation_hooks.insert(class_name.into());
        self
    }

    /// Returns true if the named simple sum is flat-integer.
    #[must_use]
    pub fn is_flat(&self, sum_name: &str) -> bool {
        self.flat_integer_sums.contains(sum_name)
    }

    /// Returns true if the named class has an abbreviation hook.
    #[must_use]
    pub fn has_abbreviation_hook(&self, class_name: &str) -> bool {
        self.abbreviation_hooks.contains(class_name)
    }
}
