//! Error types for schema parsing and resolution.

use thiserror::Error;

/// Error type for schema parsing operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input contains a character sequence that is not a token.
    #[error("invalid token '{text}' at line {line}")]
    InvalidToken {
        /// Offending source text.
        text: String,
        /// 1-based line number.
        line: usize,
    },

    /// A token other than the expected one was found.
    #[error("expected {expected}, found '{found}' at line {line}")]
    UnexpectedToken {
        /// Description of what the parser expected.
        expected: String,
        /// Text of the token actually found.
        found: String,
        /// 1-based line number.
        line: usize,
    },

    /// Input ended while the parser still expected more.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// Description of what the parser expected.
        expected: String,
    },

    /// Tokens found after the closing brace of the module.
    #[error("trailing input '{found}' at line {line} after module")]
    TrailingInput {
        /// Text of the first trailing token.
        found: String,
        /// 1-based line number.
        line: usize,
    },
}

/// Error type for schema validation and resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A field references a type name that is neither primitive, external,
    /// nor declared in the module.
    #[error("unknown type '{type_name}' in field '{field}' of '{owner}'")]
    UnknownType {
        /// Type name.
        type_name: String,
        /// Field name.
        field: String,
        /// Constructor or product owning the field.
        owner: String,
    },

    /// The same product is the shared case of two variants of one sum.
    #[error("duplicate base: two variants of sum '{sum}' refer to product '{product}'")]
    DuplicateBase {
        /// Sum name.
        sum: String,
        /// Product name.
        product: String,
    },

    /// A shared-case variant names something other than a product.
    #[error("variant '{variant}' of sum '{sum}' shares '{target}', which is not a product")]
    SharedCaseNotProduct {
        /// Sum name.
        sum: String,
        /// Variant name.
        variant: String,
        /// Referenced name.
        target: String,
    },

    /// A field uses a type combination the generator cannot express.
    #[error("unsupported type for field '{field}' of '{owner}': {message}")]
    UnsupportedFieldType {
        /// Field name.
        field: String,
        /// Constructor or product owning the field.
        owner: String,
        /// Why the combination is rejected.
        message: String,
    },

    /// Two top-level definitions share a name.
    #[error("duplicate definition: '{name}'")]
    DuplicateDefinition {
        /// Name of the duplicate.
        name: String,
    },

    /// A sum declares no variants.
    #[error("sum '{sum}' has no variants")]
    EmptySum {
        /// Sum name.
        sum: String,
    },

    /// Two variants of one sum share a name.
    #[error("duplicate variant '{variant}' in sum '{sum}'")]
    DuplicateVariant {
        /// Sum name.
        sum: String,
        /// Variant name.
        variant: String,
    },

    /// Two fields (attributes included) of one type share a name.
    #[error("duplicate field '{field}' in '{owner}'")]
    DuplicateField {
        /// Constructor or product name.
        owner: String,
        /// Field name.
        field: String,
    },

    /// A definition shadows a primitive or external type name.
    #[error("definition '{name}' shadows a built-in or external type")]
    ReservedName {
        /// Offending name.
        name: String,
    },

    /// A sum has so many variants that its tags would reach the product tag space.
    #[error("sum '{sum}' has {variants} variants, which overlaps the product tag space")]
    TagSpaceOverflow {
        /// Sum name.
        sum: String,
        /// Number of variants.
        variants: usize,
    },

    /// The module declares more products than the 16-bit tag field can number.
    #[error("product '{product}' would get tag {tag}, above the 16-bit tag limit")]
    ProductTagOverflow {
        /// First product whose tag does not fit.
        product: String,
        /// Tag it would have received.
        tag: u32,
    },

    /// A name collides with a declaration the generator derives from another
    /// definition.
    #[error("'{name}' clashes with the generated declaration of '{owner}'")]
    NameClash {
        /// Offending name.
        name: String,
        /// Definition whose generated code uses the same name.
        owner: String,
    },
}

impl ParseError {
    /// Creates an unexpected token error.
    pub fn unexpected(expected: impl Into<String>, found: impl Into<String>, line: usize) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            line,
        }
    }

    /// Creates an unexpected end of input error.
    pub fn eof(expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            expected: expected.into(),
        }
    }
}

impl SchemaError {
    /// Creates an unknown type error.
    pub fn unknown_type(
        type_name: impl Into<String>,
        field: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
            field: field.into(),
            owner: owner.into(),
        }
    }

    /// Creates an unsupported field type error.
    pub fn unsupported(
        field: impl Into<String>,
        owner: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::UnsupportedFieldType {
            field: field.into(),
            owner: owner.into(),
            message: message.into(),
        }
    }
}
