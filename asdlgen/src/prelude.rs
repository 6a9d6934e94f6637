//! Prelude module for convenient imports.
//!
//! ```ignore
//! use asdlgen::prelude::*;
//! ```

// Schema types
pub use asdlgen_schema::ir::{
    CompoundSum, Definition, Field, FieldType, PRODUCT_TAG_BASE, Product, SimpleSum, TypeRef,
    Variant,
};
pub use asdlgen_schema::{ParseError, Schema, SchemaError, SchemaIr, parse_schema};

// Codegen types
pub use asdlgen_codegen::visitor::{SchemaVisitor, Walker};
pub use asdlgen_codegen::{
    CodegenError, DebugInfo, GenConfig, Generator, Output, generate_from_file, generate_from_str,
};

pub use crate::with_include_guard;
