//! # asdlgen Codegen
//!
//! C++ code generation from ASDL schemas.
//!
//! This crate provides:
//! - A traversal driver shared by every generation pass
//! - Forward-declaration, declaration and method passes for C++
//! - An auxiliary `#define` table for simple sums
//! - A debug sidecar mapping runtime tags to generated classes

pub mod config;
pub mod cpp;
pub mod error;
pub mod generator;
pub mod visitor;
pub mod writer;

pub use config::GenConfig;
pub use error::CodegenError;
pub use generator::{DebugInfo, Generator, Output};

/// Generates C++ code from ASDL schema text.
///
/// # Arguments
/// * `source` - ASDL schema content
/// * `config` - Generation options
///
/// # Returns
/// Generated code, plus the debug sidecar when enabled.
///
/// # Errors
/// Returns `CodegenError` if parsing, resolution, or generation fails.
pub fn generate_from_str(source: &str, config: &GenConfig) -> Result<Output, CodegenError> {
    let schema = asdlgen_schema::parse_schema(source)?;
    let ir = asdlgen_schema::SchemaIr::from_schema(&schema)?;
    Generator::new(&ir, config).generate()
}

/// Generates C++ code from an ASDL schema file.
///
/// # Arguments
/// * `path` - Path to the ASDL schema file
/// * `config` - Generation options
///
/// # Returns
/// Generated code, plus the debug sidecar when enabled.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, resolution, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    config: &GenConfig,
) -> Result<Output, CodegenError> {
    let source = std::fs::read_to_string(path)?;
    generate_from_str(&source, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_generate_from_str() {
        let output = generate_from_str(
            "module m { Color = Red | Green | Blue }",
            &GenConfig::new(),
        )
        .expect("Failed to generate");

        assert!(output.code.contains("  Green = 2,"));
        assert!(output.code.contains("  case Color_e::Green:\n    return \"Color.Green\";"));
        assert!(output.code.contains("  default:\n    std::abort();"));
    }

    #[test]
    fn test_generate_from_str_parse_error() {
        let err = generate_from_str("module m { Color = }", &GenConfig::new()).unwrap_err();
        assert!(matches!(err, CodegenError::Parse(_)));
    }

    #[test]
    fn test_generate_from_str_schema_error() {
        let err = generate_from_str("module m { P = (Missing m) }", &GenConfig::new()).unwrap_err();
        assert!(matches!(err, CodegenError::Schema(_)));
    }

    #[test]
    fn test_duplicate_base_fails_without_output() {
        let err = generate_from_str(
            "module m { Expr = A %P | B %P  P = (int x) }",
            &GenConfig::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CodegenError::Schema(asdlgen_schema::SchemaError::DuplicateBase { .. })
        ));
    }

    #[test]
    fn test_generate_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "-- shapes").expect("Failed to write");
        writeln!(file, "module shapes {{ Shape = Circle(float r) | Square(float s) }}")
            .expect("Failed to write");

        let output =
            generate_from_file(file.path(), &GenConfig::new()).expect("Failed to generate");
        assert!(output.code.contains(
            "  Shape__Circle() : tag(static_cast<uint16_t>(Shape_e::Circle)), r(0.0) {}"
        ));
        assert!(output.code.contains("runtime::NewRecord(new Str(\"Shape.Circle\"))"));
    }

    #[test]
    fn test_generate_from_missing_file() {
        let err = generate_from_file(
            std::path::Path::new("/nonexistent/schema.asdl"),
            &GenConfig::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CodegenError::Io(_)));
    }
}
