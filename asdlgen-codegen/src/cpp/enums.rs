//! Auxiliary `#define` table for simple sums.

use crate::error::CodegenError;
use crate::visitor::SchemaVisitor;
use crate::writer::CodeWriter;
use asdlgen_schema::ir::SimpleSum;

/// Emits one `#define <Sum>__<Variant> <tag>` per simple-sum variant, for
/// code that needs the tags as preprocessor constants.
#[derive(Debug, Default)]
pub struct EnumTablePass {
    out: CodeWriter,
}

impl EnumTablePass {
    /// Creates the pass.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the emitted text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.out.into_string()
    }
}

impl SchemaVisitor for EnumTablePass {
    fn visit_simple_sum(&mut self, sum: &SimpleSum, depth: usize) -> Result<(), CodegenError> {
        for v in &sum.variants {
            self.out
                .emit(&format!("#define {}__{} {}", sum.name, v.name, v.tag), depth);
        }
        self.out.blank();
        Ok(())
    }
}
