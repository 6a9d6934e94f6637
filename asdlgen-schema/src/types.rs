//! Schema type definitions.
//!
//! This module contains the unresolved data structures produced by the
//! front end: the module, its sum and product definitions, constructors,
//! fields, and type expressions. Names are plain strings here; they are
//! resolved against each other by [`crate::ir::SchemaIr`].

use std::collections::HashMap;

/// Complete ASDL schema: one module plus its external type imports.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Module name.
    pub name: String,
    /// External type imports (`use` blocks).
    pub uses: Vec<UseDecl>,
    /// Top-level definitions in declaration order.
    pub definitions: Vec<TypeDef>,
    /// Definition lookup map (built while adding definitions).
    type_map: HashMap<String, usize>,
}

impl Schema {
    /// Creates a new empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uses: Vec::new(),
            definitions: Vec::new(),
            type_map: HashMap::new(),
        }
    }

    /// Adds an external type import.
    pub fn add_use(&mut self, decl: UseDecl) {
        self.uses.push(decl);
    }

    /// Adds a definition to the schema.
    ///
    /// Duplicate names are kept in `definitions` so that validation can
    /// report them; the lookup map points at the first occurrence.
    pub fn add_definition(&mut self, def: TypeDef) {
        let name = def.name().to_string();
        let index = self.definitions.len();
        self.definitions.push(def);
        self.type_map.entry(name).or_insert(index);
    }

    /// Looks up a definition by name.
    #[must_use]
    pub fn get_definition(&self, name: &str) -> Option<&TypeDef> {
        self.type_map.get(name).map(|&idx| &self.definitions[idx])
    }

    /// Returns true if a definition with the given name exists.
    #[must_use]
    pub fn has_definition(&self, name: &str) -> bool {
        self.type_map.contains_key(name)
    }

    /// Returns every externally-defined type name, in import order.
    #[must_use]
    pub fn external_names(&self) -> Vec<String> {
        self.uses
            .iter()
            .flat_map(|decl| decl.names.iter().cloned())
            .collect()
    }
}

/// `use a.b { X, Y }` import of externally-defined opaque types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseDecl {
    /// Dotted path of the module the names come from.
    pub module: Vec<String>,
    /// Imported type names.
    pub names: Vec<String>,
}

impl UseDecl {
    /// Creates a new import.
    #[must_use]
    pub fn new(module: Vec<String>, names: Vec<String>) -> Self {
        Self { module, names }
    }
}

/// Top-level definition variants.
#[derive(Debug, Clone)]
pub enum TypeDef {
    /// Sum (tagged union) definition.
    Sum(SumDef),
    /// Product (struct) definition.
    Product(ProductDef),
}

impl TypeDef {
    /// Returns the name of the definition.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Sum(s) => &s.name,
            Self::Product(p) => &p.name,
        }
    }

    /// Returns true if this is a product definition.
    #[must_use]
    pub const fn is_product(&self) -> bool {
        matches!(self, Self::Product(_))
    }
}

/// Sum type definition.
#[derive(Debug, Clone)]
pub struct SumDef {
    /// Type name.
    pub name: String,
    /// Variants in declaration order.
    pub variants: Vec<VariantDef>,
    /// Fields appended to every variant.
    pub attributes: Vec<FieldDef>,
}

impl SumDef {
    /// Creates a new sum definition with no variants.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Adds a variant.
    #[must_use]
    pub fn with_variant(mut self, variant: VariantDef) -> Self {
        self.variants.push(variant);
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, field: FieldDef) -> Self {
        self.attributes.push(field);
        self
    }

    /// Returns true if no variant carries fields or shares a product.
    ///
    /// Attributes make a sum compound even when its variants are bare.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.attributes.is_empty()
            && self
                .variants
                .iter()
                .all(|v| v.fields.is_empty() && v.shared_type.is_none())
    }
}

/// One variant of a sum.
#[derive(Debug, Clone)]
pub struct VariantDef {
    /// Variant name.
    pub name: String,
    /// Declared fields (empty for shared cases).
    pub fields: Vec<FieldDef>,
    /// Product reused as this variant, if any.
    pub shared_type: Option<String>,
}

impl VariantDef {
    /// Creates an ordinary constructor with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            shared_type: None,
        }
    }

    /// Creates a shared-case variant backed by an existing product.
    #[must_use]
    pub fn shared(name: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            shared_type: Some(product.into()),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

/// Product type definition.
#[derive(Debug, Clone)]
pub struct ProductDef {
    /// Type name.
    pub name: String,
    /// Declared fields.
    pub fields: Vec<FieldDef>,
    /// Attributes.
    pub attributes: Vec<FieldDef>,
}

impl ProductDef {
    /// Creates a new product definition with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, field: FieldDef) -> Self {
        self.attributes.push(field);
        self
    }
}

/// Field declaration: a type expression and a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub ty: TypeExpr,
}

impl FieldDef {
    /// Creates a new field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Unresolved type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A named type with an optional `?` or `*` suffix.
    Named {
        /// Referenced type name.
        name: String,
        /// Suffix multiplicity.
        multiplicity: Multiplicity,
    },
    /// `map[key, value]`.
    Map {
        /// Key type.
        key: Box<TypeExpr>,
        /// Value type.
        value: Box<TypeExpr>,
    },
}

impl TypeExpr {
    /// A plain named type.
    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            multiplicity: Multiplicity::Scalar,
        }
    }

    /// A `name?` type.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            multiplicity: Multiplicity::Optional,
        }
    }

    /// A `name*` type.
    #[must_use]
    pub fn repeated(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            multiplicity: Multiplicity::Repeated,
        }
    }

    /// A `map[key, value]` type.
    #[must_use]
    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Returns the multiplicity of the expression.
    #[must_use]
    pub fn multiplicity(&self) -> Multiplicity {
        match self {
            Self::Named { multiplicity, .. } => *multiplicity,
            Self::Map { .. } => Multiplicity::Map,
        }
    }
}

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Multiplicity {
    /// Exactly one value.
    #[default]
    Scalar,
    /// Zero or one value (`T?`).
    Optional,
    /// Ordered sequence of values (`T*`).
    Repeated,
    /// Key/value mapping (`map[K, V]`).
    Map,
}

/// Built-in primitive types of the schema language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Text.
    String,
    /// Integer.
    Int,
    /// Floating point.
    Float,
    /// Boolean.
    Bool,
    /// Untyped opaque value.
    Any,
}

impl Primitive {
    /// Returns the schema-language name.
    #[must_use]
    pub const fn asdl_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Any => "any",
        }
    }

    /// Parses a primitive from its schema-language name.
    #[must_use]
    pub fn from_asdl_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            "any" => Some(Self::Any),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lookup() {
        let mut schema = Schema::new("demo");
        schema.add_definition(TypeDef::Product(
            ProductDef::new("Point").with_field(FieldDef::new("x", TypeExpr::scalar("int"))),
        ));
        assert!(schema.has_definition("Point"));
        assert!(schema.get_definition("Point").unwrap().is_product());
        assert!(!schema.has_definition("Missing"));
    }

    #[test]
    fn test_duplicate_definition_keeps_first() {
        let mut schema = Schema::new("demo");
        schema.add_definition(TypeDef::Product(ProductDef::new("A")));
        schema.add_definition(TypeDef::Sum(SumDef::new("A")));
        assert_eq!(schema.definitions.len(), 2);
        assert!(schema.get_definition("A").unwrap().is_product());
    }

    #[test]
    fn test_sum_is_simple() {
        let simple = SumDef::new("color")
            .with_variant(VariantDef::new("Red"))
            .with_variant(VariantDef::new("Blue"));
        assert!(simple.is_simple());

        let with_attr = simple
            .clone()
            .with_attribute(FieldDef::new("spid", TypeExpr::scalar("int")));
        assert!(!with_attr.is_simple());

        let shared = SumDef::new("expr").with_variant(VariantDef::shared("Point", "Point"));
        assert!(!shared.is_simple());
    }

    #[test]
    fn test_external_names() {
        let mut schema = Schema::new("demo");
        schema.add_use(UseDecl::new(
            vec!["frontend".into(), "id_kind".into()],
            vec!["id".into(), "kind".into()],
        ));
        assert_eq!(schema.external_names(), vec!["id", "kind"]);
    }

    #[test]
    fn test_primitive_names() {
        for prim in [
            Primitive::String,
            Primitive::Int,
            Primitive::Float,
            Primitive::Bool,
            Primitive::Any,
        ] {
            assert_eq!(Primitive::from_asdl_name(prim.asdl_name()), Some(prim));
        }
        assert_eq!(Primitive::from_asdl_name("id"), None);
    }

    #[test]
    fn test_type_expr_multiplicity() {
        assert_eq!(TypeExpr::scalar("int").multiplicity(), Multiplicity::Scalar);
        assert_eq!(TypeExpr::optional("int").multiplicity(), Multiplicity::Optional);
        assert_eq!(TypeExpr::repeated("int").multiplicity(), Multiplicity::Repeated);
        let map = TypeExpr::map(TypeExpr::scalar("string"), TypeExpr::scalar("int"));
        assert_eq!(map.multiplicity(), Multiplicity::Map);
    }
}
