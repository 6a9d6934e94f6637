//! # asdlgen Schema
//!
//! ASDL schema front end and resolved schema model.
//!
//! This crate provides:
//! - A lexer and parser for ASDL schema text
//! - Unresolved definitions for modules, sums, products, and fields
//! - Validation of names that would clash in generated code
//! - The resolved, read-only schema model consumed by code generation

pub mod error;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use ir::SchemaIr;
pub use parser::parse_schema;
pub use types::{
    FieldDef, Multiplicity, Primitive, ProductDef, Schema, SumDef, TypeDef, TypeExpr, UseDecl,
    VariantDef,
};
