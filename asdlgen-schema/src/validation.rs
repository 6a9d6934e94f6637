//! Schema validation utilities.
//!
//! Only the checks needed to emit correct code live here: duplicate names,
//! names that shadow built-in or external types, and names that collide with
//! the declarations derived from other definitions (`<S>_t`, `<S>_e`, `<S>_i`,
//! `<S>_str`, `<S>__<V>`, and the `ARRAY_SIZE` constant of flat enums). Type
//! resolution errors are reported by [`crate::ir::SchemaIr::from_schema`].

use crate::error::SchemaError;
use crate::types::{FieldDef, Primitive, Schema, SumDef, TypeDef};
use std::collections::{HashMap, HashSet};

/// Validates a parsed schema for correctness.
///
/// # Arguments
/// * `schema` - The schema to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the issue.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_schema(schema: &Schema) -> Result<(), SchemaError> {
    validate_names(schema)?;
    validate_generated_names(schema)?;
    for def in &schema.definitions {
        match def {
            TypeDef::Sum(sum) => validate_sum(sum)?,
            TypeDef::Product(product) => {
                validate_fields(&product.name, &product.fields, &product.attributes)?;
            }
        }
    }
    Ok(())
}

/// Validates top-level names: unique, and not shadowing built-ins or externals.
fn validate_names(schema: &Schema) -> Result<(), SchemaError> {
    let externals = schema.external_names();
    let mut seen = HashSet::new();

    for def in &schema.definitions {
        let name = def.name();
        if Primitive::from_asdl_name(name).is_some()
            || name == "map"
            || externals.iter().any(|e| e == name)
        {
            return Err(SchemaError::ReservedName {
                name: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(SchemaError::DuplicateDefinition {
                name: name.to_string(),
            });
        }
    }

    Ok(())
}

/// Rejects definitions whose generated declarations would collide.
fn validate_generated_names(schema: &Schema) -> Result<(), SchemaError> {
    let mut generated: HashMap<String, &str> = HashMap::new();

    for def in &schema.definitions {
        let owner = def.name();
        let mut names = Vec::new();
        if let TypeDef::Sum(sum) = def {
            for suffix in ["_t", "_e", "_i", "_str"] {
                names.push(format!("{owner}{suffix}"));
            }
            if !sum.is_simple() {
                names.extend(
                    sum.variants
                        .iter()
                        .filter(|v| v.shared_type.is_none())
                        .map(|v| format!("{owner}__{}", v.name)),
                );
            } else if let Some(v) = sum.variants.iter().find(|v| v.name == "ARRAY_SIZE") {
                return Err(SchemaError::NameClash {
                    name: v.name.clone(),
                    owner: owner.to_string(),
                });
            }
        }

        for name in names {
            if let Some(other) = generated.insert(name.clone(), owner) {
                return Err(SchemaError::NameClash {
                    name,
                    owner: other.to_string(),
                });
            }
        }
    }

    for def in &schema.definitions {
        if let Some(owner) = generated.get(def.name()) {
            return Err(SchemaError::NameClash {
                name: def.name().to_string(),
                owner: (*owner).to_string(),
            });
        }
    }

    Ok(())
}

/// Validates variant names and per-constructor field names of a sum.
fn validate_sum(sum: &SumDef) -> Result<(), SchemaError> {
    if sum.variants.is_empty() {
        return Err(SchemaError::EmptySum {
            sum: sum.name.clone(),
        });
    }

    let mut seen = HashSet::new();

    for variant in &sum.variants {
        if !seen.insert(&variant.name) {
            return Err(SchemaError::DuplicateVariant {
                sum: sum.name.clone(),
                variant: variant.name.clone(),
            });
        }
        if variant.shared_type.is_none() {
            validate_fields(&variant.name, &variant.fields, &sum.attributes)?;
        }
    }

    Ok(())
}

/// Validates that fields and attributes of one generated type do not clash.
fn validate_fields(
    owner: &str,
    fields: &[FieldDef],
    attributes: &[FieldDef],
) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();

    for field in fields.iter().chain(attributes) {
        // The discriminant member is always named `tag`.
        if field.name == "tag" || !seen.insert(&field.name) {
            return Err(SchemaError::DuplicateField {
                owner: owner.to_string(),
                field: field.name.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    #[test]
    fn test_validate_valid_schema() {
        let schema = parse_schema(
            "use core { id }
             module m {
               Color = Red | Blue
               Tok = (id kind, string val)
               Expr = Lit(Tok t) | Neg(Expr e) attributes (int spid)
             }",
        )
        .expect("Failed to parse");
        assert!(validate_schema(&schema).is_ok());
    }

    #[test]
    fn test_validate_duplicate_definition() {
        let schema = parse_schema("module m { A = (int x) A = X | Y }").expect("Failed to parse");
        let result = validate_schema(&schema);
        assert_eq!(
            result,
            Err(SchemaError::DuplicateDefinition {
                name: "A".to_string()
            })
        );
    }

    #[test]
    fn test_validate_duplicate_variant() {
        let schema = parse_schema("module m { Color = Red | Red }").expect("Failed to parse");
        assert!(matches!(
            validate_schema(&schema),
            Err(SchemaError::DuplicateVariant { .. })
        ));
    }

    #[test]
    fn test_validate_field_clashes_with_attribute() {
        let schema = parse_schema("module m { Expr = Num(int spid) attributes (int spid) }")
            .expect("Failed to parse");
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::DuplicateField {
                owner: "Num".to_string(),
                field: "spid".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_tag_field_rejected() {
        let schema = parse_schema("module m { P = (int tag) }").expect("Failed to parse");
        assert!(matches!(
            validate_schema(&schema),
            Err(SchemaError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_validate_empty_sum() {
        let mut schema = Schema::new("m");
        schema.add_definition(TypeDef::Sum(SumDef::new("Nothing")));
        assert!(matches!(
            validate_schema(&schema),
            Err(SchemaError::EmptySum { .. })
        ));
    }

    #[test]
    fn test_validate_product_named_like_constructor_class() {
        let schema = parse_schema("module m { Shape = Circle(float r)  Shape__Circle = (int x) }")
            .expect("Failed to parse");
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::NameClash {
                name: "Shape__Circle".to_string(),
                owner: "Shape".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_product_named_like_enum_alias() {
        let schema =
            parse_schema("module m { Color = Red | Blue  Color_t = (int x) }").expect("Failed to parse");
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::NameClash {
                name: "Color_t".to_string(),
                owner: "Color".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_constructor_classes_collide() {
        let schema = parse_schema("module m { A = B__C(int x)  A__B = C(int y) }")
            .expect("Failed to parse");
        assert!(matches!(
            validate_schema(&schema),
            Err(SchemaError::NameClash { .. })
        ));
    }

    #[test]
    fn test_validate_array_size_variant() {
        let schema = parse_schema("module m { Mode = Outer | ARRAY_SIZE }").expect("Failed to parse");
        assert_eq!(
            validate_schema(&schema),
            Err(SchemaError::NameClash {
                name: "ARRAY_SIZE".to_string(),
                owner: "Mode".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_suffixed_name_without_owner() {
        let schema = parse_schema("module m { Point_t = (int x)  Shape = Circle(Point_t p) }")
            .expect("Failed to parse");
        assert!(validate_schema(&schema).is_ok());
    }

    #[test]
    fn test_validate_shadowing_primitive() {
        let schema = parse_schema("module m { int = (string s) }").expect("Failed to parse");
        assert!(matches!(
            validate_schema(&schema),
            Err(SchemaError::ReservedName { .. })
        ));
    }

    #[test]
    fn test_validate_shadowing_external() {
        let schema =
            parse_schema("use core { id } module m { id = A | B }").expect("Failed to parse");
        assert!(matches!(
            validate_schema(&schema),
            Err(SchemaError::ReservedName { .. })
        ));
    }
}
