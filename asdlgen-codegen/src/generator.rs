//! Main code generator.

use crate::config::GenConfig;
use crate::cpp::{CppTypes, DeclPass, EnumTablePass, ForwardDeclPass, MethodPass};
use crate::error::CodegenError;
use crate::visitor::Walker;
use asdlgen_schema::ir::{Definition, SchemaIr};
use serde::Serialize;
use std::collections::BTreeMap;

/// Tag-to-class tables of every compound sum, keyed by base class name.
///
/// Used by debuggers to find the concrete class behind a base pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DebugInfo {
    bases: BTreeMap<String, BTreeMap<u32, String>>,
}

impl DebugInfo {
    /// Records the tag table of one base class.
    pub fn insert(&mut self, base: impl Into<String>, tags: BTreeMap<u32, String>) {
        self.bases.insert(base.into(), tags);
    }

    /// Returns the tag table of a base class.
    #[must_use]
    pub fn tags(&self, base: &str) -> Option<&BTreeMap<u32, String>> {
        self.bases.get(base)
    }

    /// Returns true if no base class was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Serializes the tables as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `CodegenError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, CodegenError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct Output {
    /// Generated C++ declarations and definitions.
    pub code: String,
    /// Tag tables, present when the debug sidecar is enabled.
    pub debug_info: Option<DebugInfo>,
}

/// Main code generator for C++ from a resolved ASDL schema.
pub struct Generator<'a> {
    ir: &'a SchemaIr,
    config: &'a GenConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new generator for the given schema and options.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, config: &'a GenConfig) -> Self {
        Self { ir, config }
    }

    /// Generates the complete C++ code for the schema.
    ///
    /// The output holds, in order: forward declarations, discriminants and
    /// stringify prototypes, data classes, then method bodies.
    ///
    /// # Errors
    /// Returns `CodegenError::InvariantViolation` if a pass emits a
    /// declaration before one it depends on.
    pub fn generate(&self) -> Result<Output, CodegenError> {
        self.check_config();
        let types = CppTypes::new(self.ir, self.config);
        let mut walker = Walker::new();

        let mut forward = ForwardDeclPass::new();
        walker.walk(self.ir, &mut forward)?;
        tracing::debug!(module = %self.ir.name, "forward declaration pass done");

        let mut decls = DeclPass::new(self.ir, types);
        walker.walk(self.ir, &mut decls)?;
        tracing::debug!(module = %self.ir.name, "declaration pass done");

        let mut methods = MethodPass::new(types);
        walker.walk(self.ir, &mut methods)?;
        tracing::debug!(module = %self.ir.name, "method pass done");

        let (decl_code, debug_info) = decls.into_parts();
        let mut code = forward.into_string();
        code.push_str(&decl_code);
        code.push_str(&methods.into_string());

        Ok(Output {
            code,
            debug_info: self.config.debug_sidecar.then_some(debug_info),
        })
    }

    /// Generates the `#define` table of simple-sum tags.
    ///
    /// # Errors
    /// Propagates errors from the traversal.
    pub fn generate_enum_table(&self) -> Result<String, CodegenError> {
        let mut pass = EnumTablePass::new();
        Walker::new().walk(self.ir, &mut pass)?;
        Ok(pass.into_string())
    }

    /// Warns about flat-integer entries that cannot apply to this module.
    fn check_config(&self) {
        for name in &self.config.flat_integer_sums {
            match self.ir.get(name) {
                Some(Definition::SimpleSum(_)) => {}
                Some(_) => {
                    tracing::warn!(name = %name, "flat-integer option ignored: not a simple sum");
                }
                None => {
                    tracing::warn!(name = %name, "flat-integer option ignored: no such type");
                }
            }
        }
    }
}
