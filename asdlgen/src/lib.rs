//! # asdlgen
//!
//! Schema compiler from ASDL type definitions to tagged C++ classes.
//!
//! An ASDL module declares sum types (tagged unions of variants) and product
//! types (plain records). `asdlgen` resolves the module, forward references
//! included, and emits C++ declarations, discriminant enumerations,
//! stringify functions and tree-serialization methods for it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use asdlgen::prelude::*;
//!
//! let config = GenConfig::new().flat_integer_sum("lex_mode");
//! let output = generate_from_str(
//!     "module demo { Shape = Circle(float r) | Square(float s) }",
//!     &config,
//! )?;
//! println!("{}", output.code);
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - ASDL parsing, validation and the resolved schema model
//! - [`codegen`] - C++ generation passes and options

pub mod prelude;

/// Schema parsing, validation and resolution.
pub mod schema {
    pub use asdlgen_schema::*;
}

/// C++ code generation from resolved schemas.
pub mod codegen {
    pub use asdlgen_codegen::*;
}

/// Wraps generated code in an include guard derived from the module name.
///
/// # Arguments
/// * `module` - ASDL module name
/// * `code` - Generated code
///
/// # Returns
/// The code, guarded against multiple inclusion.
#[must_use]
pub fn with_include_guard(module: &str, code: &str) -> String {
    let guard: String = module
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "// Generated by asdlgen from module {module}. Do not edit.\n\n\
         #ifndef ASDL_{guard}_H\n#define ASDL_{guard}_H\n\n\
         {code}\
         #endif  // ASDL_{guard}_H\n"
    )
}
