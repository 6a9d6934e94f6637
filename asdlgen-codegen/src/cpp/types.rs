//! C++ naming, type mapping and default values.

use crate::config::GenConfig;
use asdlgen_schema::Primitive;
use asdlgen_schema::ir::{FieldType, SchemaIr, TypeRef};

/// Maps resolved schema types onto the C++ runtime vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct CppTypes<'a> {
    ir: &'a SchemaIr,
    config: &'a GenConfig,
}

impl<'a> CppTypes<'a> {
    /// Creates a type mapper.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, config: &'a GenConfig) -> Self {
        Self { ir, config }
    }

    /// Returns the generator configuration.
    #[must_use]
    pub fn config(&self) -> &'a GenConfig {
        self.config
    }

    /// Returns the name of the enumeration (or constant namespace) of a
    /// simple sum.
    #[must_use]
    pub fn simple_enum_name(&self, sum: &str) -> String {
        match (self.config.strong_enum_suffix, self.config.is_flat(sum)) {
            (false, _) => sum.to_string(),
            (true, true) => format!("{sum}_i"),
            (true, false) => format!("{sum}_e"),
        }
    }

    /// Returns the name of the tag namespace of a compound sum.
    ///
    /// Always suffixed: the unsuffixed name is taken by the alias namespace.
    #[must_use]
    pub fn tag_namespace(&self, sum: &str) -> String {
        format!("{sum}_e")
    }

    /// Returns the C++ type of a single value of `ty`.
    #[must_use]
    pub fn element(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Primitive(p) => primitive(*p).to_string(),
            TypeRef::External(name) => format!("{name}_t"),
            TypeRef::SimpleSum(name) if self.config.is_flat(name) => format!("{name}_t"),
            TypeRef::SimpleSum(name) => self.simple_enum_name(name),
            TypeRef::CompoundSum(name) => format!("{name}_t*"),
            TypeRef::Product(name) => format!("{name}*"),
        }
    }

    /// Returns the C++ member type of a field.
    #[must_use]
    pub fn field_type(&self, ty: &FieldType) -> String {
        match ty {
            FieldType::Scalar(t) => self.element(t),
            FieldType::Optional(t) if is_value_kind(t) => {
                format!("Optional<{}>", self.element(t))
            }
            FieldType::Optional(t) => self.element(t),
            FieldType::Repeated(t) => format!("List<{}>*", self.element(t)),
            FieldType::Map { key, value } => {
                format!("Dict<{}, {}>*", self.element(key), self.element(value))
            }
        }
    }

    /// Returns the initializer used when a field is not supplied.
    #[must_use]
    pub fn default_value(&self, ty: &FieldType) -> String {
        match ty {
            FieldType::Repeated(t) => format!("new List<{}>()", self.element(t)),
            FieldType::Optional(t) if is_value_kind(t) => {
                format!("Optional<{}>()", self.element(t))
            }
            FieldType::Optional(_) | FieldType::Map { .. } => "nullptr".to_string(),
            FieldType::Scalar(t) => self.scalar_default(t),
        }
    }

    fn scalar_default(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Primitive(Primitive::Int) | TypeRef::External(_) => "-1".to_string(),
            TypeRef::Primitive(Primitive::Bool) => "false".to_string(),
            TypeRef::Primitive(Primitive::Float) => "0.0".to_string(),
            TypeRef::Primitive(Primitive::String) => "new Str(\"\")".to_string(),
            TypeRef::SimpleSum(name) => {
                let first = self
                    .ir
                    .simple_sum(name)
                    .and_then(|s| s.variants.first())
                    .map(|v| v.name.as_str());
                match first {
                    Some(variant) => format!("{}::{}", self.simple_enum_name(name), variant),
                    // Resolution never yields an empty or missing simple sum.
                    None => "0".to_string(),
                }
            }
            TypeRef::Primitive(Primitive::Any)
            | TypeRef::CompoundSum(_)
            | TypeRef::Product(_) => "nullptr".to_string(),
        }
    }

    /// Returns an expression building the tree node for the value `var`.
    ///
    /// `method` names the tree method invoked on nested sums and products.
    #[must_use]
    pub fn tree_node(&self, ty: &TypeRef, var: &str, method: &str) -> String {
        match ty {
            TypeRef::Primitive(Primitive::Bool) => format!(
                "new hnode__Leaf({var} ? runtime::TRUE_STR : runtime::FALSE_STR, color_e::OtherConst)"
            ),
            TypeRef::Primitive(Primitive::Int | Primitive::Float) => {
                format!("new hnode__Leaf(str({var}), color_e::OtherConst)")
            }
            TypeRef::Primitive(Primitive::String) => {
                format!("runtime::NewLeaf({var}, color_e::StringConst)")
            }
            TypeRef::Primitive(Primitive::Any) | TypeRef::External(_) => {
                format!("new hnode__External({var})")
            }
            TypeRef::SimpleSum(name) => {
                format!("new hnode__Leaf(new Str({name}_str({var})), color_e::TypeName)")
            }
            TypeRef::CompoundSum(_) | TypeRef::Product(_) => format!("{var}->{method}()"),
        }
    }
}

/// Returns true if values of `ty` are held by value rather than by pointer.
#[must_use]
pub fn is_value_kind(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Primitive(p) => matches!(p, Primitive::Int | Primitive::Float | Primitive::Bool),
        TypeRef::External(_) | TypeRef::SimpleSum(_) => true,
        TypeRef::CompoundSum(_) | TypeRef::Product(_) => false,
    }
}

fn primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::String => "Str*",
        Primitive::Int => "int",
        Primitive::Float => "double",
        Primitive::Bool => "bool",
        Primitive::Any => "void*",
    }
}
