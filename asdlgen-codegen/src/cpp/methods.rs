//! Method pass: stringify bodies, tree methods and tag-switch dispatch.
//!
//! Runs after every class has been declared, so bodies may freely call
//! methods of types declared later in the module.

use crate::cpp::decls::TREE_METHODS;
use crate::cpp::types::{CppTypes, is_value_kind};
use crate::error::CodegenError;
use crate::visitor::SchemaVisitor;
use crate::writer::CodeWriter;
use asdlgen_schema::ir::{CompoundSum, Field, FieldType, Product, SimpleSum, TypeRef, Variant};

/// Emits out-of-line method definitions.
pub struct MethodPass<'a> {
    types: CppTypes<'a>,
    out: CodeWriter,
}

impl<'a> MethodPass<'a> {
    /// Creates the pass.
    #[must_use]
    pub fn new(types: CppTypes<'a>) -> Self {
        Self {
            types,
            out: CodeWriter::new(),
        }
    }

    /// Returns the emitted text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.out.into_string()
    }

    /// Writes `<sum>_str`, mapping each tag to `"<sum>.<variant>"`.
    fn emit_str_function<'v>(
        &mut self,
        sum_name: &str,
        signature_type: &str,
        case_prefix: &str,
        variants: impl Iterator<Item = &'v str>,
        depth: usize,
    ) {
        self.out.emit(
            &format!("const char* {sum_name}_str({signature_type} tag) {{"),
            depth,
        );
        self.out.emit("  switch (tag) {", depth);
        for variant in variants {
            self.out
                .emit(&format!("case {case_prefix}::{variant}:"), depth + 1);
            self.out
                .emit(&format!("  return \"{sum_name}.{variant}\";"), depth + 1);
        }
        self.out.emit("default:", depth + 1);
        self.out.emit("  std::abort();", depth + 1);
        self.out.emit("  }", depth);
        self.out.emit("}", depth);
        self.out.blank();
    }

    /// Writes the three tree methods of one generated class.
    fn emit_tree_methods(&mut self, class_name: &str, fields: &[Field], attributes: &[Field]) {
        let record_name = class_name.replace("__", ".");

        self.out
            .emit(&format!("hnode_t* {class_name}::PrettyTree() {{"), 0);
        self.emit_record_body(&record_name, fields.iter().chain(attributes), "PrettyTree");
        self.out.emit("}", 0);
        self.out.blank();

        self.out
            .emit(&format!("hnode_t* {class_name}::_AbbreviatedTree() {{"), 0);
        self.emit_record_body(&record_name, fields.iter(), "AbbreviatedTree");
        self.out.emit("}", 0);
        self.out.blank();

        if self.types.config().has_abbreviation_hook(class_name) {
            self.out
                .emit(&format!("hnode_t* _{class_name}({class_name}* obj);"), 0);
            self.out.blank();
            self.out
                .emit(&format!("hnode_t* {class_name}::AbbreviatedTree() {{"), 0);
            self.out
                .emit(&format!("hnode_t* p = _{class_name}(this);"), 1);
            self.out.emit("return p ? p : _AbbreviatedTree();", 1);
        } else {
            self.out
                .emit(&format!("hnode_t* {class_name}::AbbreviatedTree() {{"), 0);
            self.out.emit("return _AbbreviatedTree();", 1);
        }
        self.out.emit("}", 0);
        self.out.blank();
    }

    fn emit_record_body<'f>(
        &mut self,
        record_name: &str,
        fields: impl Iterator<Item = &'f Field>,
        method: &str,
    ) {
        self.out.emit(
            &format!("hnode__Record* out_node = runtime::NewRecord(new Str(\"{record_name}\"));"),
            1,
        );
        let mut fields = fields.peekable();
        if fields.peek().is_some() {
            self.out.emit("List<field*>* L = out_node->fields;", 1);
        }
        for (counter, field) in fields.enumerate() {
            self.emit_field(field, counter, method);
        }
        self.out.emit("return out_node;", 1);
    }

    /// Appends the tree node of one field to `L`, skipping absent optionals
    /// and empty lists.
    fn emit_field(&mut self, field: &Field, counter: usize, method: &str) {
        let name = &field.name;
        let out_val = format!("x{counter}");
        let append = format!("L->append(new field(new Str(\"{name}\"), {out_val}));");

        match &field.ty {
            FieldType::Scalar(ty) if !is_nested(ty) => {
                let node = self.types.tree_node(ty, &format!("this->{name}"), method);
                self.out.emit(&format!("hnode_t* {out_val} = {node};"), 1);
                self.out.emit(&append, 1);
            }
            FieldType::Scalar(ty) | FieldType::Optional(ty) if !is_value_kind(ty) => {
                let node = self.types.tree_node(ty, &format!("this->{name}"), method);
                self.out.emit(&format!("if (this->{name}) {{"), 1);
                self.out.emit(&format!("hnode_t* {out_val} = {node};"), 2);
                self.out.emit(&append, 2);
                self.out.emit("}", 1);
            }
            FieldType::Scalar(ty) | FieldType::Optional(ty) => {
                let node = self
                    .types
                    .tree_node(ty, &format!("this->{name}.value()"), method);
                self.out.emit(&format!("if (this->{name}.has_value()) {{"), 1);
                self.out.emit(&format!("hnode_t* {out_val} = {node};"), 2);
                self.out.emit(&append, 2);
                self.out.emit("}", 1);
            }
            FieldType::Repeated(ty) => {
                let item_type = self.types.element(ty);
                let item = format!("i{counter}");
                let node = self.types.tree_node(ty, &item, method);
                self.out
                    .emit(&format!("if (this->{name} && len(this->{name})) {{"), 1);
                self.out.emit(
                    &format!("hnode__Array* {out_val} = new hnode__Array(new List<hnode_t*>());"),
                    2,
                );
                self.out.emit(
                    &format!("for (ListIter<{item_type}> it(this->{name}); !it.Done(); it.Next()) {{"),
                    2,
                );
                self.out.emit(&format!("{item_type} {item} = it.Value();"), 3);
                self.out
                    .emit(&format!("{out_val}->children->append({node});"), 3);
                self.out.emit("}", 2);
                self.out.emit(&append, 2);
                self.out.emit("}", 1);
            }
            FieldType::Map { .. } => {
                self.out.emit(
                    &format!("hnode_t* {out_val} = new hnode__External(this->{name});"),
                    1,
                );
                self.out.emit(&append, 1);
            }
        }
    }

    /// Writes the base-class dispatchers, one `switch` on the runtime tag per
    /// tree method.
    fn emit_dispatch(&mut self, sum: &CompoundSum) {
        let ns = self.types.tag_namespace(&sum.name);
        for method in TREE_METHODS {
            self.out
                .emit(&format!("hnode_t* {}_t::{method}() {{", sum.name), 0);
            self.out.emit("switch (this->tag_()) {", 1);
            for variant in &sum.variants {
                let subtype = match variant {
                    Variant::Constructor(c) => format!("{}__{}", sum.name, c.name),
                    Variant::Shared(s) => s.product.clone(),
                };
                self.out
                    .emit(&format!("case {ns}::{}: {{", variant.name()), 1);
                self.out.emit(
                    &format!("{subtype}* obj = static_cast<{subtype}*>(this);"),
                    2,
                );
                self.out.emit(&format!("return obj->{method}();"), 2);
                self.out.emit("}", 1);
            }
            self.out.emit("default:", 1);
            self.out.emit("std::abort();", 2);
            self.out.emit("}", 1);
            self.out.emit("}", 0);
            self.out.blank();
        }
    }
}

/// True for types whose tree call dereferences a pointer.
fn is_nested(ty: &TypeRef) -> bool {
    matches!(ty, TypeRef::CompoundSum(_) | TypeRef::Product(_))
}

impl SchemaVisitor for MethodPass<'_> {
    fn visit_simple_sum(&mut self, sum: &SimpleSum, depth: usize) -> Result<(), CodegenError> {
        let enum_name = self.types.simple_enum_name(&sum.name);
        let signature_type = if self.types.config().is_flat(&sum.name) {
            "int".to_string()
        } else {
            enum_name.clone()
        };
        self.emit_str_function(
            &sum.name,
            &signature_type,
            &enum_name,
            sum.variants.iter().map(|v| v.name.as_str()),
            depth,
        );
        Ok(())
    }

    fn visit_compound_sum(&mut self, sum: &CompoundSum, depth: usize) -> Result<(), CodegenError> {
        let ns = self.types.tag_namespace(&sum.name);
        self.emit_str_function(
            &sum.name,
            "int",
            &ns,
            sum.variants.iter().map(Variant::name),
            depth,
        );

        if !self.types.config().emit_debug_methods {
            return Ok(());
        }

        for ctor in sum.constructors() {
            let class_name = format!("{}__{}", sum.name, ctor.name);
            self.emit_tree_methods(&class_name, &ctor.fields, &sum.attributes);
        }
        self.emit_dispatch(sum);
        Ok(())
    }

    fn visit_product(&mut self, product: &Product, _depth: usize) -> Result<(), CodegenError> {
        if self.types.config().emit_debug_methods {
            self.emit_tree_methods(&product.name, &product.fields, &product.attributes);
        }
        Ok(())
    }
}
