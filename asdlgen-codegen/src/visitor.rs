//! Traversal driver shared by every generation pass.
//!
//! Each pass is a [`SchemaVisitor`]; [`Walker`] feeds it every top-level
//! definition once, in module declaration order, then calls
//! [`SchemaVisitor::finish`]. Passes that must see the whole module before
//! emitting something (products and their base lists) queue work in the
//! per-kind callbacks and flush it in `finish`.

use crate::error::CodegenError;
use asdlgen_schema::ir::{CompoundSum, Definition, Product, SchemaIr, SimpleSum};

/// Per-kind callbacks invoked by [`Walker`].
pub trait SchemaVisitor {
    /// Called for a sum whose variants carry no fields.
    fn visit_simple_sum(&mut self, sum: &SimpleSum, depth: usize) -> Result<(), CodegenError> {
        let _ = (sum, depth);
        Ok(())
    }

    /// Called for a sum with data-carrying or shared-case variants.
    fn visit_compound_sum(&mut self, sum: &CompoundSum, depth: usize) -> Result<(), CodegenError> {
        let _ = (sum, depth);
        Ok(())
    }

    /// Called for a product.
    fn visit_product(&mut self, product: &Product, depth: usize) -> Result<(), CodegenError> {
        let _ = (product, depth);
        Ok(())
    }

    /// Called once after every definition has been visited.
    fn finish(&mut self) -> Result<(), CodegenError> {
        Ok(())
    }
}

/// Depth-first walker over a resolved schema.
#[derive(Debug, Default)]
pub struct Walker {
    depth: usize,
}

impl Walker {
    /// Creates a walker starting at depth zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Visits every definition of `ir` in declaration order, then finishes.
    ///
    /// # Errors
    /// Propagates the first error returned by the visitor.
    pub fn walk<V>(&mut self, ir: &SchemaIr, visitor: &mut V) -> Result<(), CodegenError>
    where
        V: SchemaVisitor + ?Sized,
    {
        for def in &ir.definitions {
            match def {
                Definition::SimpleSum(sum) => visitor.visit_simple_sum(sum, self.depth)?,
                Definition::CompoundSum(sum) => visitor.visit_compound_sum(sum, self.depth)?,
                Definition::Product(product) => visitor.visit_product(product, self.depth)?,
            }
        }
        visitor.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asdlgen_schema::parse_schema;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl SchemaVisitor for Recorder {
        fn visit_simple_sum(&mut self, sum: &SimpleSum, _depth: usize) -> Result<(), CodegenError> {
            self.events.push(format!("simple:{}", sum.name));
            Ok(())
        }

        fn visit_compound_sum(
            &mut self,
            sum: &CompoundSum,
            _depth: usize,
        ) -> Result<(), CodegenError> {
            self.events.push(format!("compound:{}", sum.name));
            Ok(())
        }

        fn visit_product(&mut self, product: &Product, _depth: usize) -> Result<(), CodegenError> {
            self.events.push(format!("product:{}", product.name));
            Ok(())
        }

        fn finish(&mut self) -> Result<(), CodegenError> {
            self.events.push("finish".to_string());
            Ok(())
        }
    }

    struct FailOnProduct;

    impl SchemaVisitor for FailOnProduct {
        fn visit_product(&mut self, product: &Product, _depth: usize) -> Result<(), CodegenError> {
            Err(CodegenError::invariant(format!("refused {}", product.name)))
        }
    }

    fn ir(source: &str) -> SchemaIr {
        let schema = parse_schema(source).expect("Failed to parse");
        SchemaIr::from_schema(&schema).expect("Failed to resolve")
    }

    #[test]
    fn test_walk_visits_in_declaration_order() {
        let ir = ir("module m {
            P = (int x)
            Color = Red | Blue
            Expr = Num(int n) | %P
        }");

        let mut recorder = Recorder::default();
        Walker::new()
            .walk(&ir, &mut recorder)
            .expect("walk should succeed");

        assert_eq!(
            recorder.events,
            ["product:P", "simple:Color", "compound:Expr", "finish"]
        );
    }

    #[test]
    fn test_walk_stops_on_error() {
        let ir = ir("module m { P = (int x) }");
        let err = Walker::new().walk(&ir, &mut FailOnProduct).unwrap_err();
        assert!(matches!(err, CodegenError::InvariantViolation { .. }));
    }

    #[test]
    fn test_default_callbacks_are_noops() {
        struct Nothing;
        impl SchemaVisitor for Nothing {}

        let ir = ir("module m { Color = Red P = (int x) }");
        assert!(Walker::new().walk(&ir, &mut Nothing).is_ok());
    }
}
