//! Declaration pass: discriminants, data classes and stringify prototypes.
//!
//! Discriminant enumerations and tag namespaces are written as each sum is
//! visited, so every later class may use any of them. Compound-sum classes
//! are written in `finish`, followed by the products: a product derives from
//! every sum it is a shared case of, which is only known once the whole
//! module has been seen.

use crate::cpp::types::CppTypes;
use crate::error::CodegenError;
use crate::generator::DebugInfo;
use crate::visitor::SchemaVisitor;
use crate::writer::CodeWriter;
use asdlgen_schema::ir::{CompoundSum, Field, Product, SchemaIr, SimpleSum, Variant};
use std::collections::{BTreeMap, HashSet};

/// Tree methods declared on every generated class.
pub const TREE_METHODS: [&str; 3] = ["PrettyTree", "_AbbreviatedTree", "AbbreviatedTree"];

/// Emits type declarations.
pub struct DeclPass<'a> {
    ir: &'a SchemaIr,
    types: CppTypes<'a>,
    out: CodeWriter,
    compound_sums: Vec<(String, usize)>,
    products: Vec<(String, usize)>,
    declared_bases: HashSet<String>,
    debug_info: DebugInfo,
}

impl<'a> DeclPass<'a> {
    /// Creates the pass.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, types: CppTypes<'a>) -> Self {
        Self {
            ir,
            types,
            out: CodeWriter::new(),
            compound_sums: Vec::new(),
            products: Vec::new(),
            declared_bases: HashSet::new(),
            debug_info: DebugInfo::default(),
        }
    }

    /// Returns the emitted text and the collected tag tables.
    #[must_use]
    pub fn into_parts(self) -> (String, DebugInfo) {
        (self.out.into_string(), self.debug_info)
    }

    fn emit_compound_classes(&mut self, sum: &CompoundSum, depth: usize) {
        let base = format!("{}_t", sum.name);
        let ns = self.types.tag_namespace(&sum.name);

        self.out.emit(&format!("class {base} {{"), depth);
        self.out.emit(" protected:", depth);
        self.out.emit(&format!("  {base}() {{}}"), depth);
        self.out.emit(" public:", depth);
        self.out.emit("  int tag_() {", depth);
        self.out
            .emit("    return reinterpret_cast<Obj*>(this)->tag;", depth);
        self.out.emit("  }", depth);
        self.emit_method_decls(depth);
        self.out
            .emit(&format!("  DISALLOW_COPY_AND_ASSIGN({base})"), depth);
        self.out.emit("};", depth);
        self.out.blank();
        self.declared_bases.insert(base.clone());

        for ctor in sum.constructors() {
            let class_name = format!("{}__{}", sum.name, ctor.name);
            let tag = format!("static_cast<uint16_t>({ns}::{})", ctor.name);
            self.emit_class(
                &class_name,
                std::slice::from_ref(&base),
                &tag,
                &ctor.fields,
                &sum.attributes,
                depth,
            );
        }

        self.out.emit(&format!("namespace {} {{", sum.name), depth);
        for ctor in sum.constructors() {
            self.out.emit(
                &format!("  typedef {}__{} {};", sum.name, ctor.name, ctor.name),
                depth,
            );
        }
        self.out.emit("}", depth);
        self.out.blank();
    }

    fn emit_product(&mut self, product: &Product, depth: usize) -> Result<(), CodegenError> {
        let bases: Vec<String> = if product.bases.is_empty() {
            vec!["Obj".to_string()]
        } else {
            product.bases.iter().map(|b| format!("{b}_t")).collect()
        };

        if let Some(missing) = bases
            .iter()
            .find(|b| *b != "Obj" && !self.declared_bases.contains(*b))
        {
            return Err(CodegenError::invariant(format!(
                "product '{}' emitted before its base '{missing}'",
                product.name
            )));
        }

        self.emit_class(
            &product.name,
            &bases,
            &product.tag.to_string(),
            &product.fields,
            &product.attributes,
            depth,
        );
        Ok(())
    }

    /// Writes one data class: constructors, members and method prototypes.
    fn emit_class(
        &mut self,
        class_name: &str,
        bases: &[String],
        tag: &str,
        fields: &[Field],
        attributes: &[Field],
        depth: usize,
    ) {
        let bases = bases
            .iter()
            .map(|b| format!("public {b}"))
            .collect::<Vec<_>>()
            .join(", ");
        self.out
            .emit(&format!("class {class_name} : {bases} {{"), depth);
        self.out.emit(" public:", depth);

        let tag_init = format!("tag({tag})");

        // A constructor without fields only gets the N-arg form, which then
        // takes no arguments.
        if !fields.is_empty() {
            let mut inits = vec![tag_init.clone()];
            for f in fields.iter().chain(attributes) {
                inits.push(format!("{}({})", f.name, self.types.default_value(&f.ty)));
            }
            self.out.emit(
                &format!("  {class_name}() : {} {{}}", inits.join(", ")),
                depth,
            );
        }

        let params: Vec<String> = fields
            .iter()
            .map(|f| format!("{} {}", self.types.field_type(&f.ty), f.name))
            .collect();
        let mut inits = vec![tag_init];
        inits.extend(fields.iter().map(|f| format!("{0}({0})", f.name)));
        inits.extend(
            attributes
                .iter()
                .map(|f| format!("{}({})", f.name, self.types.default_value(&f.ty))),
        );
        self.out.emit(
            &format!(
                "  {class_name}({}) : {} {{}}",
                params.join(", "),
                inits.join(", ")
            ),
            depth,
        );

        self.out.emit("  uint16_t tag;", depth);
        for f in fields.iter().chain(attributes) {
            self.out
                .emit(&format!("  {} {};", self.types.field_type(&f.ty), f.name), depth);
        }
        self.emit_method_decls(depth);
        self.out.blank();
        self.out
            .emit(&format!("  DISALLOW_COPY_AND_ASSIGN({class_name})"), depth);
        self.out.emit("};", depth);
        self.out.blank();
    }

    fn emit_method_decls(&mut self, depth: usize) {
        if self.types.config().emit_debug_methods {
            for method in TREE_METHODS {
                self.out.emit(&format!("  hnode_t* {method}();"), depth);
            }
        }
    }
}

impl SchemaVisitor for DeclPass<'_> {
    fn visit_simple_sum(&mut self, sum: &SimpleSum, depth: usize) -> Result<(), CodegenError> {
        let enum_name = self.types.simple_enum_name(&sum.name);

        if self.types.config().is_flat(&sum.name) {
            self.out.emit(&format!("namespace {enum_name} {{"), depth);
            for v in &sum.variants {
                self.out
                    .emit(&format!("const int {} = {};", v.name, v.tag), depth + 1);
            }
            self.out.emit(
                &format!("const int ARRAY_SIZE = {};", sum.variants.len() + 1),
                depth + 1,
            );
            self.out.emit("};", depth);
            self.out.emit(&format!("typedef int {}_t;", sum.name), depth);
            self.out.blank();
            self.out
                .emit(&format!("const char* {}_str(int tag);", sum.name), depth);
        } else {
            self.out.emit(&format!("enum class {enum_name} {{"), depth);
            for v in &sum.variants {
                self.out.emit(&format!("{} = {},", v.name, v.tag), depth + 1);
            }
            self.out.emit("};", depth);
            self.out
                .emit(&format!("typedef {enum_name} {}_t;", sum.name), depth);
            self.out.blank();
            self.out.emit(
                &format!("const char* {}_str({enum_name} tag);", sum.name),
                depth,
            );
        }
        self.out.blank();
        Ok(())
    }

    fn visit_compound_sum(&mut self, sum: &CompoundSum, depth: usize) -> Result<(), CodegenError> {
        let ns = self.types.tag_namespace(&sum.name);
        let mut tags = BTreeMap::new();

        self.out.emit(&format!("namespace {ns} {{"), depth);
        for variant in &sum.variants {
            self.out.emit(
                &format!("const int {} = {};", variant.name(), variant.tag()),
                depth + 1,
            );
            let class_name = match variant {
                Variant::Constructor(c) => format!("{}__{}", sum.name, c.name),
                Variant::Shared(s) => s.product.clone(),
            };
            tags.insert(variant.tag(), class_name);
        }
        self.out.emit("};", depth);
        self.out.blank();
        self.out
            .emit(&format!("const char* {}_str(int tag);", sum.name), depth);
        self.out.blank();

        self.debug_info.insert(format!("{}_t", sum.name), tags);
        self.compound_sums.push((sum.name.clone(), depth));
        Ok(())
    }

    fn visit_product(&mut self, product: &Product, depth: usize) -> Result<(), CodegenError> {
        self.products.push((product.name.clone(), depth));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), CodegenError> {
        let ir = self.ir;

        for (name, depth) in std::mem::take(&mut self.compound_sums) {
            let sum = ir
                .compound_sum(&name)
                .ok_or_else(|| CodegenError::invariant(format!("compound sum '{name}' vanished")))?;
            tracing::trace!(sum = %name, "declaring compound sum classes");
            self.emit_compound_classes(sum, depth);
        }

        for (name, depth) in std::mem::take(&mut self.products) {
            let product = ir
                .product(&name)
                .ok_or_else(|| CodegenError::invariant(format!("product '{name}' vanished")))?;
            tracing::trace!(product = %name, "declaring product");
            self.emit_product(product, depth)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenConfig;
    use crate::visitor::Walker;
    use asdlgen_schema::parse_schema;

    fn ir(source: &str) -> SchemaIr {
        let schema = parse_schema(source).expect("Failed to parse");
        SchemaIr::from_schema(&schema).expect("Failed to resolve")
    }

    fn declare(ir: &SchemaIr, config: &GenConfig) -> (String, DebugInfo) {
        let mut pass = DeclPass::new(ir, CppTypes::new(ir, config));
        Walker::new().walk(ir, &mut pass).expect("walk should succeed");
        pass.into_parts()
    }

    #[test]
    fn test_strong_enum() {
        let ir = ir("module m { Color = Red | Green | Blue }");
        let (code, _) = declare(&ir, &GenConfig::new());

        assert_eq!(
            code,
            "enum class Color_e {\n  Red = 1,\n  Green = 2,\n  Blue = 3,\n};\n\
             typedef Color_e Color_t;\n\n\
             const char* Color_str(Color_e tag);\n\n"
        );
    }

    #[test]
    fn test_flat_enum() {
        let ir = ir("module m { Mode = Outer | Inner }");
        let (code, _) = declare(&ir, &GenConfig::new().flat_integer_sum("Mode"));

        assert!(code.contains("namespace Mode_i {\n  const int Outer = 1;\n"));
        assert!(code.contains("  const int ARRAY_SIZE = 3;\n};\ntypedef int Mode_t;\n"));
        assert!(code.contains("const char* Mode_str(int tag);"));
    }

    #[test]
    fn test_enum_suffix_disabled() {
        let ir = ir("module m { Color = Red | Blue  Mode = A | B }");
        let config = GenConfig::new().strong_enum_suffix(false).flat_integer_sum("Mode");
        let (code, _) = declare(&ir, &config);

        assert!(code.contains("enum class Color {"));
        assert!(code.contains("typedef Color Color_t;"));
        assert!(code.contains("const char* Color_str(Color tag);"));
        assert!(code.contains("namespace Mode {"));
        assert!(!code.contains("Color_e"));
        assert!(!code.contains("Mode_i"));
    }

    #[test]
    fn test_constructor_class() {
        let ir = ir("module m { Shape = Circle(float r) | Square(float s) }");
        let (code, _) = declare(&ir, &GenConfig::new());

        assert!(code.contains("namespace Shape_e {\n  const int Circle = 1;\n  const int Square = 2;\n};"));
        assert!(code.contains("const char* Shape_str(int tag);"));
        assert!(code.contains("class Shape__Circle : public Shape_t {"));
        assert!(code.contains(
            "  Shape__Circle() : tag(static_cast<uint16_t>(Shape_e::Circle)), r(0.0) {}"
        ));
        assert!(code.contains(
            "  Shape__Circle(double r) : tag(static_cast<uint16_t>(Shape_e::Circle)), r(r) {}"
        ));
        assert!(code.contains("  uint16_t tag;\n  double r;\n"));
        assert!(code.contains("  DISALLOW_COPY_AND_ASSIGN(Shape__Circle)"));
        assert!(code.contains("namespace Shape {\n  typedef Shape__Circle Circle;\n  typedef Shape__Square Square;\n}"));
    }

    #[test]
    fn test_base_class() {
        let ir = ir("module m { Shape = Circle(float r) }");
        let (code, _) = declare(&ir, &GenConfig::new());

        assert!(code.contains(
            "class Shape_t {\n protected:\n  Shape_t() {}\n public:\n  int tag_() {\n    \
             return reinterpret_cast<Obj*>(this)->tag;\n  }\n"
        ));
        assert!(code.contains("  hnode_t* PrettyTree();\n  hnode_t* _AbbreviatedTree();\n"));
        assert!(code.contains("  DISALLOW_COPY_AND_ASSIGN(Shape_t)\n};"));
    }

    #[test]
    fn test_fieldless_constructor_with_attributes() {
        let ir = ir("module m { Op = Add | Sub attributes (int spid) }");
        let (code, _) = declare(&ir, &GenConfig::new());

        assert!(code.contains("  Op__Add() : tag(static_cast<uint16_t>(Op_e::Add)), spid(-1) {}"));
        assert_eq!(code.matches("  Op__Add(").count(), 1);
        assert!(code.contains("  uint16_t tag;\n  int spid;\n"));
    }

    #[test]
    fn test_attributes_defaulted_in_n_arg_constructor() {
        let ir = ir("module m { Expr = Num(int n, string* parts) attributes (int line) }");
        let (code, _) = declare(&ir, &GenConfig::new());

        assert!(code.contains(
            "  Expr__Num() : tag(static_cast<uint16_t>(Expr_e::Num)), n(-1), \
             parts(new List<Str*>()), line(-1) {}"
        ));
        assert!(code.contains(
            "  Expr__Num(int n, List<Str*>* parts) : tag(static_cast<uint16_t>(Expr_e::Num)), \
             n(n), parts(parts), line(-1) {}"
        ));
    }

    #[test]
    fn test_shared_product_bases() {
        let ir = ir("module m {
            Point = (int x, int y)
            Expr = Num(int n) | %Point
            Stmt = Pass | Mark %Point
        }");
        let (code, info) = declare(&ir, &GenConfig::new());

        assert!(code.contains("class Point : public Expr_t, public Stmt_t {"));
        assert!(code.contains("  Point() : tag(1000), x(-1), y(-1) {}"));
        assert!(code.contains("  Point(int x, int y) : tag(1000), x(x), y(y) {}"));
        assert!(code.contains("namespace Stmt_e {\n  const int Pass = 1;\n  const int Mark = 1000;\n};"));

        // Products come after every compound-sum class.
        let point = code.find("class Point :").expect("Point class");
        assert!(code.find("class Expr_t {").expect("Expr_t") < point);
        assert!(code.find("class Stmt_t {").expect("Stmt_t") < point);

        // Shared cases get no class of their own.
        assert!(!code.contains("Stmt__Mark"));
        assert_eq!(info.tags("Stmt_t").and_then(|t| t.get(&1000)).map(String::as_str), Some("Point"));
        assert_eq!(info.tags("Stmt_t").and_then(|t| t.get(&1)).map(String::as_str), Some("Stmt__Pass"));
    }

    #[test]
    fn test_unshared_product_derives_from_obj() {
        let ir = ir("module m { Pair = (string a, Pair? next) }");
        let (code, info) = declare(&ir, &GenConfig::new());

        assert!(code.contains("class Pair : public Obj {"));
        assert!(code.contains("  Pair() : tag(1000), a(new Str(\"\")), next(nullptr) {}"));
        assert!(code.contains("  Pair(Str* a, Pair* next) : tag(1000), a(a), next(next) {}"));
        assert!(info.is_empty());
    }

    #[test]
    fn test_debug_methods_disabled() {
        let ir = ir("module m { Shape = Circle(float r)  P = (int x) }");
        let (code, _) = declare(&ir, &GenConfig::new().emit_debug_methods(false));
        assert!(!code.contains("PrettyTree"));
        assert!(!code.contains("AbbreviatedTree"));
    }

    #[test]
    fn test_simple_sum_declared_before_classes() {
        let ir = ir("module m {
            P = (Color c)
            Shape = Circle(Color c)
            Color = Red | Green
        }");
        let (code, _) = declare(&ir, &GenConfig::new());

        let color = code.find("enum class Color_e").expect("Color enum");
        assert!(color < code.find("class Shape__Circle").expect("Circle"));
        assert!(color < code.find("class P :").expect("P"));
        assert!(code.contains("  P() : tag(1000), c(Color_e::Red) {}"));
    }

    #[test]
    fn test_product_before_base_is_invariant_violation() {
        let ir = ir("module m { Point = (int x)  Expr = %Point }");
        let config = GenConfig::new();
        let mut pass = DeclPass::new(&ir, CppTypes::new(&ir, &config));
        let point = ir.product("Point").expect("Point");

        let err = pass.emit_product(point, 0).unwrap_err();
        assert!(matches!(err, CodegenError::InvariantViolation { .. }));
    }
}
