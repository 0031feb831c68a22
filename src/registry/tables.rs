//! Hand-authored per-language schema tables.
//!
//! Each table lists the grammar kinds the engine addresses by name or tags
//! with a capability. Kinds absent from a table still parse; their schema is
//! derived from the node's actual children at query time. Slot names match
//! the grammar's field names, with the trailing `children` variable slot
//! holding everything that occupies no field.

use super::{Capability, SlotArity, TypeSchema};
use crate::language::Language;

use Capability::*;
use SlotArity::{Many, One};

type Row = (&'static str, TypeSchema);

fn row(kind: &'static str, slots: &[(&str, SlotArity)], caps: &[Capability]) -> Row {
    (kind, TypeSchema::new(slots, caps))
}

/// Kinds with no named slots beyond the generic variable slot.
fn plain(kind: &'static str, caps: &[Capability]) -> Row {
    row(kind, &[("children", Many)], caps)
}

/// Get the schema table for a language.
pub fn table_for(language: Language) -> Vec<Row> {
    match language {
        Language::Python => python_table(),
        Language::JavaScript => javascript_table(),
        Language::TypeScript | Language::Tsx => typescript_table(),
        Language::Go => go_table(),
        Language::Rust => rust_table(),
        Language::Java => java_table(),
        Language::C => c_table(),
        Language::Cpp => cpp_table(),
        Language::Ruby => ruby_table(),
    }
}

fn python_table() -> Vec<Row> {
    vec![
        plain("module", &[Root, LexicalScope]),
        plain("block", &[Compound]),
        plain("expression_statement", &[ExpressionStatement]),
        row("identifier", &[], &[Identifier]),
        row(
            "binary_operator",
            &[
                ("left", One),
                ("operator", One),
                ("right", One),
                ("children", Many),
            ],
            &[],
        ),
        row(
            "boolean_operator",
            &[
                ("left", One),
                ("operator", One),
                ("right", One),
                ("children", Many),
            ],
            &[],
        ),
        row(
            "comparison_operator",
            &[("operators", Many), ("children", Many)],
            &[],
        ),
        row(
            "assignment",
            &[
                ("left", One),
                ("type", One),
                ("right", One),
                ("children", Many),
            ],
            &[],
        ),
        row(
            "augmented_assignment",
            &[
                ("left", One),
                ("operator", One),
                ("right", One),
                ("children", Many),
            ],
            &[],
        ),
        row(
            "call",
            &[("function", One), ("arguments", One), ("children", Many)],
            &[CallExpression],
        ),
        plain("argument_list", &[]),
        row(
            "function_definition",
            &[
                ("name", One),
                ("parameters", One),
                ("return_type", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "lambda",
            &[("parameters", One), ("body", One), ("children", Many)],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "class_definition",
            &[
                ("name", One),
                ("superclasses", One),
                ("body", One),
                ("children", Many),
            ],
            &[LexicalScope],
        ),
        plain("parameters", &[]),
        row(
            "import_statement",
            &[("name", Many), ("children", Many)],
            &[ImportStatement],
        ),
        row(
            "import_from_statement",
            &[("module_name", One), ("name", Many), ("children", Many)],
            &[ImportStatement],
        ),
        row(
            "aliased_import",
            &[("name", One), ("alias", One), ("children", Many)],
            &[],
        ),
        row(
            "attribute",
            &[("object", One), ("attribute", One), ("children", Many)],
            &[],
        ),
        row(
            "keyword_argument",
            &[("name", One), ("value", One), ("children", Many)],
            &[],
        ),
        plain("return_statement", &[]),
        plain("dotted_name", &[]),
        row("pass_statement", &[], &[]),
        row("string", &[("children", Many)], &[]),
        row("integer", &[], &[]),
        row("float", &[], &[]),
    ]
}

fn javascript_table() -> Vec<Row> {
    vec![
        plain("program", &[Root, LexicalScope]),
        plain("statement_block", &[Compound]),
        plain("expression_statement", &[ExpressionStatement]),
        row("identifier", &[], &[Identifier]),
        row("property_identifier", &[], &[Identifier]),
        row(
            "function_declaration",
            &[
                ("name", One),
                ("parameters", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "function_expression",
            &[
                ("name", One),
                ("parameters", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "arrow_function",
            &[
                ("parameter", One),
                ("parameters", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "method_definition",
            &[
                ("name", One),
                ("parameters", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "class_declaration",
            &[("name", One), ("body", One), ("children", Many)],
            &[LexicalScope],
        ),
        row(
            "call_expression",
            &[("function", One), ("arguments", One), ("children", Many)],
            &[CallExpression],
        ),
        plain("arguments", &[]),
        row(
            "import_statement",
            &[("source", One), ("children", Many)],
            &[ImportStatement],
        ),
        row(
            "import_specifier",
            &[("name", One), ("alias", One), ("children", Many)],
            &[],
        ),
        row(
            "member_expression",
            &[("object", One), ("property", One), ("children", Many)],
            &[],
        ),
        row(
            "binary_expression",
            &[
                ("left", One),
                ("operator", One),
                ("right", One),
                ("children", Many),
            ],
            &[],
        ),
        row(
            "assignment_expression",
            &[("left", One), ("right", One), ("children", Many)],
            &[],
        ),
        row(
            "variable_declarator",
            &[("name", One), ("value", One), ("children", Many)],
            &[],
        ),
        plain("lexical_declaration", &[]),
        plain("formal_parameters", &[]),
    ]
}

fn typescript_table() -> Vec<Row> {
    let mut table = javascript_table();
    table.extend([
        row(
            "interface_declaration",
            &[("name", One), ("body", One), ("children", Many)],
            &[LexicalScope],
        ),
        row(
            "enum_declaration",
            &[("name", One), ("body", One), ("children", Many)],
            &[LexicalScope],
        ),
        row(
            "type_alias_declaration",
            &[("name", One), ("value", One), ("children", Many)],
            &[],
        ),
    ]);
    table
}

fn go_table() -> Vec<Row> {
    vec![
        plain("source_file", &[Root, LexicalScope]),
        plain("block", &[Compound]),
        plain("expression_statement", &[ExpressionStatement]),
        row("identifier", &[], &[Identifier]),
        row("field_identifier", &[], &[Identifier]),
        row(
            "function_declaration",
            &[
                ("name", One),
                ("parameters", One),
                ("result", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "method_declaration",
            &[
                ("receiver", One),
                ("name", One),
                ("parameters", One),
                ("result", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "call_expression",
            &[("function", One), ("arguments", One), ("children", Many)],
            &[CallExpression],
        ),
        plain("argument_list", &[]),
        plain("import_declaration", &[ImportStatement]),
        row(
            "import_spec",
            &[("name", One), ("path", One), ("children", Many)],
            &[],
        ),
        row(
            "selector_expression",
            &[("operand", One), ("field", One), ("children", Many)],
            &[],
        ),
        row(
            "binary_expression",
            &[
                ("left", One),
                ("operator", One),
                ("right", One),
                ("children", Many),
            ],
            &[],
        ),
        plain("parameter_list", &[]),
    ]
}

fn rust_table() -> Vec<Row> {
    vec![
        plain("source_file", &[Root, LexicalScope]),
        plain("block", &[Compound]),
        plain("expression_statement", &[ExpressionStatement]),
        row("identifier", &[], &[Identifier]),
        row("field_identifier", &[], &[Identifier]),
        row(
            "function_item",
            &[
                ("name", One),
                ("parameters", One),
                ("return_type", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "closure_expression",
            &[("parameters", One), ("body", One), ("children", Many)],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "call_expression",
            &[("function", One), ("arguments", One), ("children", Many)],
            &[CallExpression],
        ),
        plain("arguments", &[]),
        row(
            "use_declaration",
            &[("argument", One), ("children", Many)],
            &[ImportStatement],
        ),
        row(
            "mod_item",
            &[("name", One), ("body", One), ("children", Many)],
            &[LexicalScope],
        ),
        row(
            "impl_item",
            &[("type", One), ("trait", One), ("body", One), ("children", Many)],
            &[LexicalScope],
        ),
        row(
            "let_declaration",
            &[
                ("pattern", One),
                ("type", One),
                ("value", One),
                ("children", Many),
            ],
            &[],
        ),
        row(
            "binary_expression",
            &[
                ("left", One),
                ("operator", One),
                ("right", One),
                ("children", Many),
            ],
            &[],
        ),
        plain("parameters", &[]),
    ]
}

fn java_table() -> Vec<Row> {
    vec![
        plain("program", &[Root, LexicalScope]),
        plain("block", &[Compound]),
        plain("expression_statement", &[ExpressionStatement]),
        row("identifier", &[], &[Identifier]),
        row(
            "method_declaration",
            &[
                ("type", One),
                ("name", One),
                ("parameters", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "constructor_declaration",
            &[
                ("name", One),
                ("parameters", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "class_declaration",
            &[
                ("name", One),
                ("superclass", One),
                ("body", One),
                ("children", Many),
            ],
            &[LexicalScope],
        ),
        row(
            "method_invocation",
            &[
                ("object", One),
                ("name", One),
                ("arguments", One),
                ("children", Many),
            ],
            &[CallExpression],
        ),
        plain("argument_list", &[]),
        plain("import_declaration", &[ImportStatement]),
        row(
            "binary_expression",
            &[
                ("left", One),
                ("operator", One),
                ("right", One),
                ("children", Many),
            ],
            &[],
        ),
        row(
            "assignment_expression",
            &[("left", One), ("right", One), ("children", Many)],
            &[],
        ),
        plain("formal_parameters", &[]),
    ]
}

fn c_table() -> Vec<Row> {
    vec![
        plain("translation_unit", &[Root, LexicalScope]),
        plain("compound_statement", &[Compound]),
        plain("expression_statement", &[ExpressionStatement]),
        row("identifier", &[], &[Identifier]),
        row("field_identifier", &[], &[Identifier]),
        row(
            "function_definition",
            &[
                ("type", One),
                ("declarator", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "function_declarator",
            &[("declarator", One), ("parameters", One), ("children", Many)],
            &[],
        ),
        row(
            "call_expression",
            &[("function", One), ("arguments", One), ("children", Many)],
            &[CallExpression],
        ),
        plain("argument_list", &[]),
        row(
            "preproc_include",
            &[("path", One), ("children", Many)],
            &[ImportStatement],
        ),
        row(
            "binary_expression",
            &[
                ("left", One),
                ("operator", One),
                ("right", One),
                ("children", Many),
            ],
            &[],
        ),
        row(
            "assignment_expression",
            &[
                ("left", One),
                ("operator", One),
                ("right", One),
                ("children", Many),
            ],
            &[],
        ),
        row(
            "cast_expression",
            &[("type", One), ("value", One), ("children", Many)],
            &[],
        ),
        row(
            "declaration",
            &[("type", One), ("declarator", Many), ("children", Many)],
            &[],
        ),
        row(
            "init_declarator",
            &[("declarator", One), ("value", One), ("children", Many)],
            &[],
        ),
        plain("parameter_list", &[]),
        row("string_literal", &[("children", Many)], &[]),
        row("number_literal", &[], &[]),
    ]
}

fn cpp_table() -> Vec<Row> {
    let mut table = c_table();
    table.extend([
        row(
            "class_specifier",
            &[("name", One), ("body", One), ("children", Many)],
            &[LexicalScope],
        ),
        row(
            "namespace_definition",
            &[("name", One), ("body", One), ("children", Many)],
            &[LexicalScope],
        ),
        plain("using_declaration", &[ImportStatement]),
    ]);
    table
}

fn ruby_table() -> Vec<Row> {
    vec![
        plain("program", &[Root, LexicalScope]),
        plain("body_statement", &[Compound]),
        plain("do_block", &[Compound]),
        row("identifier", &[], &[Identifier]),
        row(
            "method",
            &[
                ("name", One),
                ("parameters", One),
                ("body", One),
                ("children", Many),
            ],
            &[FunctionDefinition, LexicalScope],
        ),
        row(
            "class",
            &[
                ("name", One),
                ("superclass", One),
                ("body", One),
                ("children", Many),
            ],
            &[LexicalScope],
        ),
        row(
            "module",
            &[("name", One), ("body", One), ("children", Many)],
            &[LexicalScope],
        ),
        row(
            "call",
            &[
                ("receiver", One),
                ("method", One),
                ("arguments", One),
                ("children", Many),
            ],
            &[CallExpression],
        ),
        plain("argument_list", &[]),
        row(
            "binary",
            &[
                ("left", One),
                ("operator", One),
                ("right", One),
                ("children", Many),
            ],
            &[],
        ),
        plain("method_parameters", &[]),
    ]
}
