//! Resolved schema model for code generation.
//!
//! [`SchemaIr`] is built once from a parsed [`Schema`] and is read-only
//! afterward. Construction is two-stage: every declared name is collected
//! first so that forward references resolve, then every field is resolved
//! against that table. Shared-case bookkeeping (which products act as a case
//! of which sums) is completed before the model is handed out.

use crate::error::SchemaError;
use crate::types::{FieldDef, Multiplicity, Primitive, Schema, SumDef, TypeDef, TypeExpr};
use std::collections::HashMap;

/// First tag of the product tag space.
///
/// Ordinary sum variants are tagged from 1, so any sum with fewer variants
/// than this never collides with a product tag.
pub const PRODUCT_TAG_BASE: u32 = 1000;

/// Largest tag the generated `uint16_t tag` member can hold.
pub const MAX_TAG: u32 = u16::MAX as u32;

/// Resolved representation of a schema module.
#[derive(Debug, Clone)]
pub struct SchemaIr {
    /// Module name.
    pub name: String,
    /// Externally-defined opaque type names.
    pub externals: Vec<String>,
    /// Definitions in declaration order.
    pub definitions: Vec<Definition>,
    /// Definition lookup map.
    index: HashMap<String, usize>,
}

impl SchemaIr {
    /// Creates the resolved model from a parsed schema.
    ///
    /// # Errors
    /// Returns `SchemaError` if the schema fails validation, a field names an
    /// unknown type, a map uses non-scalar keys or values, a shared case
    /// names something other than a product, or a product is shared twice
    /// by the same sum.
    pub fn from_schema(schema: &Schema) -> Result<Self, SchemaError> {
        crate::validation::validate_schema(schema)?;

        // Stage one: name table.
        let externals = schema.external_names();
        let mut kinds: HashMap<&str, DeclKind> = HashMap::new();
        let mut product_tags: HashMap<&str, u32> = HashMap::new();
        let mut next_product_tag = PRODUCT_TAG_BASE;
        for def in &schema.definitions {
            let kind = match def {
                TypeDef::Sum(sum) if sum.is_simple() => DeclKind::SimpleSum,
                TypeDef::Sum(_) => DeclKind::CompoundSum,
                TypeDef::Product(_) => {
                    if next_product_tag > MAX_TAG {
                        return Err(SchemaError::ProductTagOverflow {
                            product: def.name().to_string(),
                            tag: next_product_tag,
                        });
                    }
                    product_tags.insert(def.name(), next_product_tag);
                    next_product_tag += 1;
                    DeclKind::Product
                }
            };
            kinds.insert(def.name(), kind);
        }

        let resolver = Resolver {
            kinds: &kinds,
            externals: &externals,
        };

        // Stage two: shared bases, scanned over every compound sum.
        let mut bases: HashMap<&str, Vec<String>> = HashMap::new();
        for def in &schema.definitions {
            let TypeDef::Sum(sum) = def else { continue };
            for variant in &sum.variants {
                let Some(product) = variant.shared_type.as_deref() else {
                    continue;
                };
                if kinds.get(product) != Some(&DeclKind::Product) {
                    return Err(SchemaError::SharedCaseNotProduct {
                        sum: sum.name.clone(),
                        variant: variant.name.clone(),
                        target: product.to_string(),
                    });
                }
                let list = bases.entry(product).or_default();
                if list.iter().any(|b| b == &sum.name) {
                    return Err(SchemaError::DuplicateBase {
                        sum: sum.name.clone(),
                        product: product.to_string(),
                    });
                }
                list.push(sum.name.clone());
            }
        }

        // Stage three: resolve every definition.
        let mut definitions = Vec::with_capacity(schema.definitions.len());
        for def in &schema.definitions {
            let resolved = match def {
                TypeDef::Sum(sum) if sum.is_simple() => Definition::SimpleSum(SimpleSum {
                    name: sum.name.clone(),
                    variants: sum
                        .variants
                        .iter()
                        .enumerate()
                        .map(|(i, v)| EnumVariant {
                            name: v.name.clone(),
                            tag: i as u32 + 1,
                        })
                        .collect(),
                }),
                TypeDef::Sum(sum) => {
                    Definition::CompoundSum(resolver.compound_sum(sum, &product_tags)?)
                }
                TypeDef::Product(product) => Definition::Product(Product {
                    name: product.name.clone(),
                    tag: product_tags[product.name.as_str()],
                    fields: resolver.fields(&product.fields, &product.name)?,
                    attributes: resolver.fields(&product.attributes, &product.name)?,
                    bases: bases.remove(product.name.as_str()).unwrap_or_default(),
                }),
            };
            tracing::trace!(name = resolved.name(), "resolved definition");
            definitions.push(resolved);
        }

        let index = definitions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name().to_string(), i))
            .collect();

        Ok(Self {
            name: schema.name.clone(),
            externals,
            definitions,
            index,
        })
    }

    /// Gets a definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    /// Gets a product by name.
    #[must_use]
    pub fn product(&self, name: &str) -> Option<&Product> {
        match self.get(name) {
            Some(Definition::Product(p)) => Some(p),
            _ => None,
        }
    }

    /// Gets a simple sum by name.
    #[must_use]
    pub fn simple_sum(&self, name: &str) -> Option<&SimpleSum> {
        match self.get(name) {
            Some(Definition::SimpleSum(s)) => Some(s),
            _ => None,
        }
    }

    /// Gets a compound sum by name.
    #[must_use]
    pub fn compound_sum(&self, name: &str) -> Option<&CompoundSum> {
        match self.get(name) {
            Some(Definition::CompoundSum(s)) => Some(s),
            _ => None,
        }
    }

    /// Iterates over simple sums in declaration order.
    pub fn simple_sums(&self) -> impl Iterator<Item = &SimpleSum> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::SimpleSum(s) => Some(s),
            _ => None,
        })
    }

    /// Iterates over compound sums in declaration order.
    pub fn compound_sums(&self) -> impl Iterator<Item = &CompoundSum> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::CompoundSum(s) => Some(s),
            _ => None,
        })
    }

    /// Iterates over products in declaration order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Product(p) => Some(p),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    SimpleSum,
    CompoundSum,
    Product,
}

struct Resolver<'a> {
    kinds: &'a HashMap<&'a str, DeclKind>,
    externals: &'a [String],
}

impl Resolver<'_> {
    fn compound_sum(
        &self,
        sum: &SumDef,
        product_tags: &HashMap<&str, u32>,
    ) -> Result<CompoundSum, SchemaError> {
        if sum.variants.len() >= PRODUCT_TAG_BASE as usize {
            return Err(SchemaError::TagSpaceOverflow {
                sum: sum.name.clone(),
                variants: sum.variants.len(),
            });
        }

        let mut variants = Vec::with_capacity(sum.variants.len());
        for (i, variant) in sum.variants.iter().enumerate() {
            let resolved = match &variant.shared_type {
                Some(product) => Variant::Shared(SharedCase {
                    name: variant.name.clone(),
                    product: product.clone(),
                    tag: product_tags[product.as_str()],
                }),
                None => Variant::Constructor(Constructor {
                    name: variant.name.clone(),
                    tag: i as u32 + 1,
                    fields: self.fields(&variant.fields, &variant.name)?,
                }),
            };
            variants.push(resolved);
        }

        Ok(CompoundSum {
            name: sum.name.clone(),
            variants,
            attributes: self.fields(&sum.attributes, &sum.name)?,
        })
    }

    fn fields(&self, fields: &[FieldDef], owner: &str) -> Result<Vec<Field>, SchemaError> {
        fields
            .iter()
            .map(|f| {
                Ok(Field {
                    name: f.name.clone(),
                    ty: self.field_type(&f.ty, &f.name, owner)?,
                })
            })
            .collect()
    }

    fn field_type(
        &self,
        ty: &TypeExpr,
        field: &str,
        owner: &str,
    ) -> Result<FieldType, SchemaError> {
        match ty {
            TypeExpr::Named { name, multiplicity } => {
                let target = self.type_ref(name, field, owner)?;
                Ok(match multiplicity {
                    Multiplicity::Scalar => FieldType::Scalar(target),
                    Multiplicity::Optional => FieldType::Optional(target),
                    Multiplicity::Repeated => FieldType::Repeated(target),
                    Multiplicity::Map => {
                        return Err(SchemaError::unsupported(
                            field,
                            owner,
                            "map multiplicity on a named type",
                        ));
                    }
                })
            }
            TypeExpr::Map { key, value } => Ok(FieldType::Map {
                key: self.map_operand(key, "key", field, owner)?,
                value: self.map_operand(value, "value", field, owner)?,
            }),
        }
    }

    fn map_operand(
        &self,
        ty: &TypeExpr,
        role: &str,
        field: &str,
        owner: &str,
    ) -> Result<TypeRef, SchemaError> {
        match ty {
            TypeExpr::Named {
                name,
                multiplicity: Multiplicity::Scalar,
            } => self.type_ref(name, field, owner),
            _ => Err(SchemaError::unsupported(
                field,
                owner,
                format!("map {role} must be a plain named type"),
            )),
        }
    }

    fn type_ref(&self, name: &str, field: &str, owner: &str) -> Result<TypeRef, SchemaError> {
        if let Some(prim) = Primitive::from_asdl_name(name) {
            return Ok(TypeRef::Primitive(prim));
        }
        if self.externals.iter().any(|e| e == name) {
            return Ok(TypeRef::External(name.to_string()));
        }
        match self.kinds.get(name) {
            Some(DeclKind::SimpleSum) => Ok(TypeRef::SimpleSum(name.to_string())),
            Some(DeclKind::CompoundSum) => Ok(TypeRef::CompoundSum(name.to_string())),
            Some(DeclKind::Product) => Ok(TypeRef::Product(name.to_string())),
            None => Err(SchemaError::unknown_type(name, field, owner)),
        }
    }
}

/// Resolved top-level definition.
#[derive(Debug, Clone)]
pub enum Definition {
    /// Sum whose variants carry no data.
    SimpleSum(SimpleSum),
    /// Sum whose variants carry data or share products.
    CompoundSum(CompoundSum),
    /// Product type.
    Product(Product),
}

impl Definition {
    /// Returns the name of the definition.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::SimpleSum(s) => &s.name,
            Self::CompoundSum(s) => &s.name,
            Self::Product(p) => &p.name,
        }
    }
}

/// Pure enumeration.
#[derive(Debug, Clone)]
pub struct SimpleSum {
    /// Type name.
    pub name: String,
    /// Variants tagged 1..N in declaration order.
    pub variants: Vec<EnumVariant>,
}

/// One value of a simple sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    /// Variant name.
    pub name: String,
    /// Tag (1-based).
    pub tag: u32,
}

/// Tagged union whose variants carry fields.
#[derive(Debug, Clone)]
pub struct CompoundSum {
    /// Type name.
    pub name: String,
    /// Variants in declaration order.
    pub variants: Vec<Variant>,
    /// Attributes appended to every constructor.
    pub attributes: Vec<Field>,
}

impl CompoundSum {
    /// Iterates over the ordinary constructors, skipping shared cases.
    pub fn constructors(&self) -> impl Iterator<Item = &Constructor> {
        self.variants.iter().filter_map(|v| match v {
            Variant::Constructor(c) => Some(c),
            Variant::Shared(_) => None,
        })
    }
}

/// Variant of a compound sum.
#[derive(Debug, Clone)]
pub enum Variant {
    /// Variant with its own generated type.
    Constructor(Constructor),
    /// Variant backed by an existing product.
    Shared(SharedCase),
}

impl Variant {
    /// Returns the variant name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Constructor(c) => &c.name,
            Self::Shared(s) => &s.name,
        }
    }

    /// Returns the runtime tag.
    #[must_use]
    pub fn tag(&self) -> u32 {
        match self {
            Self::Constructor(c) => c.tag,
            Self::Shared(s) => s.tag,
        }
    }
}

/// Ordinary constructor of a compound sum.
#[derive(Debug, Clone)]
pub struct Constructor {
    /// Variant name.
    pub name: String,
    /// Tag: 1-based position in the sum's variant list.
    pub tag: u32,
    /// Declared fields.
    pub fields: Vec<Field>,
}

/// Variant implemented by a product.
#[derive(Debug, Clone)]
pub struct SharedCase {
    /// Variant name.
    pub name: String,
    /// Product name.
    pub product: String,
    /// The product's own tag.
    pub tag: u32,
}

/// Plain aggregate.
#[derive(Debug, Clone)]
pub struct Product {
    /// Type name.
    pub name: String,
    /// Tag from the product tag space.
    pub tag: u32,
    /// Declared fields.
    pub fields: Vec<Field>,
    /// Attributes.
    pub attributes: Vec<Field>,
    /// Sums this product is a shared case of, in module order.
    pub bases: Vec<String>,
}

/// Resolved field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Resolved type.
    pub ty: FieldType,
}

/// Resolved field type with multiplicity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Exactly one value.
    Scalar(TypeRef),
    /// Zero or one value.
    Optional(TypeRef),
    /// Ordered collection.
    Repeated(TypeRef),
    /// Key/value mapping.
    Map {
        /// Key type.
        key: TypeRef,
        /// Value type.
        value: TypeRef,
    },
}

impl FieldType {
    /// Returns the multiplicity.
    #[must_use]
    pub fn multiplicity(&self) -> Multiplicity {
        match self {
            Self::Scalar(_) => Multiplicity::Scalar,
            Self::Optional(_) => Multiplicity::Optional,
            Self::Repeated(_) => Multiplicity::Repeated,
            Self::Map { .. } => Multiplicity::Map,
        }
    }

    /// Returns the element type for non-map fields.
    #[must_use]
    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            Self::Scalar(t) | Self::Optional(t) | Self::Repeated(t) => Some(t),
            Self::Map { .. } => None,
        }
    }
}

/// What a type name resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Built-in primitive.
    Primitive(Primitive),
    /// Externally-defined opaque id type.
    External(String),
    /// Simple sum in this module.
    SimpleSum(String),
    /// Compound sum in this module.
    CompoundSum(String),
    /// Product in this module.
    Product(String),
}

impl TypeRef {
    /// Returns the schema-level name of the referenced type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(p) => p.asdl_name(),
            Self::External(n) | Self::SimpleSum(n) | Self::CompoundSum(n) | Self::Product(n) => n,
        }
    }
}
