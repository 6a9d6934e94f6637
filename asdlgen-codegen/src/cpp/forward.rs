//! Forward declarations.

use crate::error::CodegenError;
use crate::visitor::SchemaVisitor;
use crate::writer::CodeWriter;
use asdlgen_schema::ir::{CompoundSum, Product};

/// Declares every compound-sum base class and every product up front, so the
/// declaration pass may reference them in any order.
#[derive(Debug, Default)]
pub struct ForwardDeclPass {
    out: CodeWriter,
}

impl ForwardDeclPass {
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

impl SchemaVisitor for ForwardDeclPass {
    fn visit_compound_sum(&mut self, sum: &CompoundSum, depth: usize) -> Result<(), CodegenError> {
        self.out.emit(&format!("class {}_t;", sum.name), depth);
        Ok(())
    }

    fn visit_product(&mut self, product: &Product, depth: usize) -> Result<(), CodegenError> {
        self.out.emit(&format!("class {};", product.name), depth);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), CodegenError> {
        self.out.blank();
        Ok(())
    }
}
