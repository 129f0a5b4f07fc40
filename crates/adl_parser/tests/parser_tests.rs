//! Parser integration tests.
//!
//! Exercises the statement and expression grammars, doc comments,
//! projections, error recovery, and the structural invariants every
//! parsed tree must satisfy.

use adl_ast::node::*;
use adl_ast::syntax_kind::SyntaxKind;
use adl_ast::types::{NodeFlags, ParseOptions};
use adl_ast::visitor::{visit_children, Node};
use adl_core::arena::CompilerArena;
use adl_diagnostics::DiagnosticCategory;
use adl_parser::{parse, parse_standalone_type_reference};

fn parse_ok<'a>(arena: &'a CompilerArena, source: &str) -> AdlScript<'a> {
    let script = parse(arena, source, ParseOptions::default());
    assert!(
        script.parse_diagnostics.is_empty(),
        "unexpected diagnostics for {:?}: {:#?}",
        source,
        script.parse_diagnostics
    );
    script
}

fn codes(script: &AdlScript<'_>) -> Vec<&'static str> {
    script.parse_diagnostics.iter().map(|d| d.code).collect()
}

fn first_model<'a, 'b>(script: &'b AdlScript<'a>) -> &'b ModelStatement<'a> {
    for statement in script.statements {
        if let Statement::ModelStatement(model) = statement {
            return model;
        }
    }
    panic!("no model statement");
}

// ============================================================================
// Models
// ============================================================================

#[test]
fn test_parse_model_with_properties() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "model M { x: string; y?: int32 = 3 }");
    assert_eq!(script.statements.len(), 1);
    let model = first_model(&script);
    assert_eq!(model.id.sv, "M");
    assert_eq!(model.properties.len(), 2);

    let ModelPropertyOrSpread::ModelProperty(x) = &model.properties[0] else {
        panic!("expected property");
    };
    let PropertyName::Identifier(x_name) = &x.id else {
        panic!("expected identifier name");
    };
    assert_eq!(x_name.sv, "x");
    assert!(!x.optional);
    assert!(x.default.is_none());

    let ModelPropertyOrSpread::ModelProperty(y) = &model.properties[1] else {
        panic!("expected property");
    };
    assert!(y.optional);
    let Some(Expression::NumericLiteral(default)) = y.default else {
        panic!("expected numeric default");
    };
    assert_eq!(default.value, 3.0);
}

#[test]
fn test_default_on_required_property() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "model M { x: string = 3 }", ParseOptions::default());
    assert_eq!(codes(&script), vec!["default-optional"]);
    // The default expression stays in the tree.
    let model = first_model(&script);
    let ModelPropertyOrSpread::ModelProperty(x) = &model.properties[0] else {
        panic!("expected property");
    };
    assert!(x.default.is_some());
    // Shape errors don't make the tree unprintable.
    assert!(script.printable);
}

#[test]
fn test_model_extends_and_is() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "model A extends B {} model C is D;");
    assert_eq!(script.statements.len(), 2);
    let Statement::ModelStatement(a) = &script.statements[0] else {
        panic!();
    };
    assert!(a.extends.is_some());
    assert!(a.is.is_none());
    let Statement::ModelStatement(c) = &script.statements[1] else {
        panic!();
    };
    assert!(c.is.is_some());
    assert!(c.properties.is_empty());
}

#[test]
fn test_model_spread_and_trailing_delimiter() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "model M { ...Base; x: string; }");
    let model = first_model(&script);
    assert_eq!(model.properties.len(), 2);
    assert!(matches!(
        model.properties[0],
        ModelPropertyOrSpread::ModelSpreadProperty(_)
    ));
}

#[test]
fn test_string_literal_property_name() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "model M { \"a-b\": string }");
    let model = first_model(&script);
    let ModelPropertyOrSpread::ModelProperty(prop) = &model.properties[0] else {
        panic!();
    };
    let PropertyName::StringLiteral(name) = &prop.id else {
        panic!("expected string name");
    };
    assert_eq!(name.value, "a-b");
}

#[test]
fn test_template_parameters() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "model M<T, U extends string = \"x\"> { t: T }");
    let model = first_model(&script);
    assert_eq!(model.template_parameters.len(), 2);
    assert!(model.template_parameters[1].constraint.is_some());
    assert!(model.template_parameters[1].default.is_some());
}

#[test]
fn test_required_template_parameter_after_optional() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "model M<T = string, U> {}", ParseOptions::default());
    assert_eq!(codes(&script), vec!["default-required"]);
}

// ============================================================================
// Namespaces & ordering rules
// ============================================================================

#[test]
fn test_blockless_namespace_chain() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "namespace A.B.C;");
    assert_eq!(script.statements.len(), 1);
    let Statement::NamespaceStatement(a) = &script.statements[0] else {
        panic!();
    };
    assert_eq!(a.id.sv, "A");
    assert!(a.is_blockless());
    let Some(NamespaceBody::Namespace(b)) = &a.statements else {
        panic!("expected nested namespace");
    };
    assert_eq!(b.id.sv, "B");
    let Some(NamespaceBody::Namespace(c)) = &b.statements else {
        panic!("expected nested namespace");
    };
    assert_eq!(c.id.sv, "C");
    assert!(c.statements.is_none());
    // All segments share the statement's source range.
    assert_eq!(a.data.range, c.data.range);
}

#[test]
fn test_namespace_with_body() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "namespace A { model M {} op foo(): void; }");
    let Statement::NamespaceStatement(ns) = &script.statements[0] else {
        panic!();
    };
    assert!(!ns.is_blockless());
    let Some(NamespaceBody::Statements(statements)) = &ns.statements else {
        panic!();
    };
    assert_eq!(statements.len(), 2);
}

#[test]
fn test_import_must_come_first() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "model M {} import \"foo\";", ParseOptions::default());
    assert_eq!(codes(&script), vec!["import-first"]);
    assert!(script.printable);
}

#[test]
fn test_import_inside_namespace() {
    let arena = CompilerArena::new();
    let script = parse(
        &arena,
        "namespace A { import \"foo\"; }",
        ParseOptions::default(),
    );
    assert_eq!(codes(&script), vec!["import-first"]);
}

#[test]
fn test_multiple_blockless_namespaces() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "namespace A; namespace B;", ParseOptions::default());
    assert_eq!(codes(&script), vec!["multiple-blockless-namespace"]);
}

#[test]
fn test_blockless_namespace_after_declaration() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "model M {} namespace A;", ParseOptions::default());
    assert_eq!(codes(&script), vec!["blockless-namespace-first"]);
}

#[test]
fn test_blockless_namespace_inside_block() {
    let arena = CompilerArena::new();
    let script = parse(
        &arena,
        "namespace A { namespace B; }",
        ParseOptions::default(),
    );
    assert_eq!(codes(&script), vec!["blockless-namespace-first"]);
}

// ============================================================================
// Operations & interfaces
// ============================================================================

#[test]
fn test_operation_declaration() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "op foo(a: string, b?: int32): Result;");
    let Statement::OperationStatement(op) = &script.statements[0] else {
        panic!();
    };
    assert_eq!(op.id.sv, "foo");
    let OperationSignature::Declaration(sig) = &op.signature else {
        panic!("expected signature declaration");
    };
    assert_eq!(sig.parameters.properties.len(), 2);
    let ModelPropertyOrSpread::ModelProperty(b) = &sig.parameters.properties[1] else {
        panic!();
    };
    assert!(b.optional);
    let Expression::TypeReference(ret) = sig.return_type else {
        panic!("expected reference return type");
    };
    let Expression::Identifier(ret_id) = ret.target else {
        panic!();
    };
    assert_eq!(ret_id.sv, "Result");
}

#[test]
fn test_operation_signature_reference() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "op foo is Bar;");
    let Statement::OperationStatement(op) = &script.statements[0] else {
        panic!();
    };
    let OperationSignature::Reference(sig) = &op.signature else {
        panic!("expected signature reference");
    };
    let Expression::Identifier(base) = sig.base_operation.target else {
        panic!();
    };
    assert_eq!(base.sv, "Bar");
}

#[test]
fn test_interface_with_operations() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "interface I extends A, B { op a(): void; b(): void; }");
    let Statement::InterfaceStatement(iface) = &script.statements[0] else {
        panic!();
    };
    assert_eq!(iface.extends.len(), 2);
    assert_eq!(iface.operations.len(), 2);
    assert_eq!(iface.operations[1].id.sv, "b");
}

#[test]
fn test_interface_missing_semicolon_between_operations() {
    let arena = CompilerArena::new();
    let script = parse(
        &arena,
        "interface I { op a(): void op b(): void }",
        ParseOptions::default(),
    );
    let Statement::InterfaceStatement(iface) = &script.statements[0] else {
        panic!();
    };
    assert_eq!(iface.operations.len(), 2);
    // Exactly one missing-delimiter diagnostic between the operations.
    assert_eq!(codes(&script), vec!["token-expected"]);
}

#[test]
fn test_interface_comma_separator_reported() {
    let arena = CompilerArena::new();
    let script = parse(
        &arena,
        "interface I { op a(): void, op b(): void }",
        ParseOptions::default(),
    );
    let Statement::InterfaceStatement(iface) = &script.statements[0] else {
        panic!();
    };
    assert_eq!(iface.operations.len(), 2);
    assert_eq!(codes(&script), vec!["trailing-token"]);
}

// ============================================================================
// Other declarations
// ============================================================================

#[test]
fn test_scalar_statement() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "scalar uuid extends string;");
    let Statement::ScalarStatement(scalar) = &script.statements[0] else {
        panic!();
    };
    assert_eq!(scalar.id.sv, "uuid");
    assert!(scalar.extends.is_some());
}

#[test]
fn test_alias_statement() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "alias StringOrInt = string | int32;");
    let Statement::AliasStatement(alias) = &script.statements[0] else {
        panic!();
    };
    let Expression::UnionExpression(value) = alias.value else {
        panic!("expected union");
    };
    assert_eq!(value.options.len(), 2);
}

#[test]
fn test_using_statement() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "using A.B;");
    let Statement::UsingStatement(using) = &script.statements[0] else {
        panic!();
    };
    assert!(matches!(using.name, Expression::MemberExpression(_)));
}

#[test]
fn test_enum_members() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "enum E { a, b: \"x\", c: 3, ...Other }");
    let Statement::EnumStatement(e) = &script.statements[0] else {
        panic!();
    };
    assert_eq!(e.members.len(), 4);
    assert!(matches!(
        e.members[3],
        EnumMemberOrSpread::EnumSpreadMember(_)
    ));
}

#[test]
fn test_enum_member_value_must_be_literal() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "enum E { a: someRef }", ParseOptions::default());
    assert_eq!(codes(&script), vec!["token-expected"]);
}

#[test]
fn test_union_statement_variants() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "union Pet { cat: Cat, dog: Dog }");
    let Statement::UnionStatement(u) = &script.statements[0] else {
        panic!();
    };
    assert_eq!(u.options.len(), 2);
    let Some(PropertyName::Identifier(cat)) = &u.options[0].id else {
        panic!("expected named variant");
    };
    assert_eq!(cat.sv, "cat");
}

#[test]
fn test_union_statement_bare_variants() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "union U { Cat, Dog }");
    let Statement::UnionStatement(u) = &script.statements[0] else {
        panic!();
    };
    assert_eq!(u.options.len(), 2);
    assert!(u.options[0].id.is_none());
}

#[test]
fn test_decorator_declaration() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "extern dec doc(target: unknown, text: string);");
    let Statement::DecoratorDeclarationStatement(dec) = &script.statements[0] else {
        panic!();
    };
    assert!(dec.modifier_flags.contains(adl_ast::types::ModifierFlags::EXTERN));
    assert_eq!(dec.modifiers.len(), 1);
    assert!(dec.target.is_some());
    assert_eq!(dec.parameters.len(), 1);
}

#[test]
fn test_decorator_declaration_requires_target() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "extern dec d();", ParseOptions::default());
    assert_eq!(codes(&script), vec!["decorator-decl-target"]);
}

#[test]
fn test_decorator_declaration_target_not_optional() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "extern dec d(t?: unknown);", ParseOptions::default());
    assert_eq!(codes(&script), vec!["decorator-decl-target"]);
}

#[test]
fn test_function_declaration_with_rest() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "extern fn concat(...args: string[]): string;");
    let Statement::FunctionDeclarationStatement(f) = &script.statements[0] else {
        panic!();
    };
    assert_eq!(f.parameters.len(), 1);
    assert!(f.parameters[0].rest);
    assert!(f.return_type.is_some());
}

#[test]
fn test_function_parameter_ordering_rules() {
    let arena = CompilerArena::new();
    let script = parse(
        &arena,
        "extern fn f(a?: string, b: string): void;",
        ParseOptions::default(),
    );
    assert_eq!(codes(&script), vec!["required-parameter-first"]);

    let script = parse(
        &arena,
        "extern fn g(...a: string[], b: string): void;",
        ParseOptions::default(),
    );
    assert_eq!(codes(&script), vec!["rest-parameter-last"]);

    let script = parse(
        &arena,
        "extern fn h(...a?: string[]): void;",
        ParseOptions::default(),
    );
    assert_eq!(codes(&script), vec!["rest-parameter-required"]);
}

// ============================================================================
// Decorators, directives, augment decorators
// ============================================================================

#[test]
fn test_decorators_attach_to_declaration() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "@tag(\"x\") @other model Pet {}");
    let model = first_model(&script);
    assert_eq!(model.decorators.len(), 2);
    assert_eq!(model.decorators[0].arguments.len(), 1);
    // The statement's range starts at the first decorator.
    assert_eq!(model.data.pos(), 0);
}

#[test]
fn test_decorator_not_valid_on_import() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "@foo import \"x\";", ParseOptions::default());
    assert_eq!(codes(&script), vec!["invalid-decorator-location"]);
}

#[test]
fn test_decorator_in_expression_reported() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "model M { x: @foo string }", ParseOptions::default());
    assert_eq!(codes(&script), vec!["invalid-decorator-location"]);
    // Parsing resumed: the property still has its type.
    let model = first_model(&script);
    assert_eq!(model.properties.len(), 1);
}

#[test]
fn test_member_expression_does_not_recover_from_keyword() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "@Outer.model M {}", ParseOptions::default());
    // `@Outer.` is an incomplete decorator; `model M {}` still parses.
    assert_eq!(script.statements.len(), 1);
    let model = first_model(&script);
    assert_eq!(model.id.sv, "M");
    assert_eq!(model.decorators.len(), 1);
    assert_eq!(codes(&script), vec!["token-expected"]);
}

#[test]
fn test_suppress_directive() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "#suppress \"some-code\" \"message\"\nmodel M {}");
    let model = first_model(&script);
    assert_eq!(model.directives.len(), 1);
    assert_eq!(model.directives[0].target.sv, "suppress");
    assert_eq!(model.directives[0].arguments.len(), 2);
}

#[test]
fn test_unknown_directive() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "#deprecate \"x\"\nmodel M {}", ParseOptions::default());
    assert_eq!(codes(&script), vec!["unknown-directive"]);
}

#[test]
fn test_augment_decorator() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "@@doc(MyModel, \"docs\");");
    let Statement::AugmentDecoratorStatement(aug) = &script.statements[0] else {
        panic!();
    };
    let Expression::Identifier(target) = aug.target else {
        panic!();
    };
    assert_eq!(target.sv, "doc");
    let Expression::Identifier(target_type) = aug.target_type.target else {
        panic!();
    };
    assert_eq!(target_type.sv, "MyModel");
    assert_eq!(aug.arguments.len(), 1);
}

#[test]
fn test_augment_decorator_bad_target() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "@@doc(\"oops\");", ParseOptions::default());
    assert_eq!(codes(&script), vec!["augment-decorator-target"]);
    let Statement::AugmentDecoratorStatement(aug) = &script.statements[0] else {
        panic!();
    };
    assert!(aug
        .target_type
        .data
        .flags()
        .contains(NodeFlags::SYNTHETIC));
    // The bad argument is kept as a regular argument.
    assert_eq!(aug.arguments.len(), 1);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_union_intersection_array_precedence() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "alias A = B | C & D | E[];");
    let Statement::AliasStatement(alias) = &script.statements[0] else {
        panic!();
    };
    let Expression::UnionExpression(union) = alias.value else {
        panic!("expected union at top");
    };
    assert_eq!(union.options.len(), 3);
    assert!(matches!(
        union.options[1],
        Expression::IntersectionExpression(_)
    ));
    assert!(matches!(union.options[2], Expression::ArrayExpression(_)));
}

#[test]
fn test_leading_bar_discarded() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "alias A = | B | C;");
    let Statement::AliasStatement(alias) = &script.statements[0] else {
        panic!();
    };
    let Expression::UnionExpression(union) = alias.value else {
        panic!();
    };
    assert_eq!(union.options.len(), 2);
}

#[test]
fn test_tuple_and_literals() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "alias T = [\"a\", 42, true, void, never, unknown];");
    let Statement::AliasStatement(alias) = &script.statements[0] else {
        panic!();
    };
    let Expression::TupleExpression(tuple) = alias.value else {
        panic!();
    };
    assert_eq!(tuple.values.len(), 6);
    assert!(matches!(tuple.values[0], Expression::StringLiteral(_)));
    assert!(matches!(tuple.values[1], Expression::NumericLiteral(_)));
    assert!(matches!(tuple.values[2], Expression::BooleanLiteral(_)));
    assert!(matches!(tuple.values[3], Expression::VoidKeyword(_)));
    assert!(matches!(tuple.values[4], Expression::NeverKeyword(_)));
    assert!(matches!(tuple.values[5], Expression::UnknownKeyword(_)));
}

#[test]
fn test_reference_with_template_arguments() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "alias A = Map<string, Array<int32>>;");
    let Statement::AliasStatement(alias) = &script.statements[0] else {
        panic!();
    };
    let Expression::TypeReference(reference) = alias.value else {
        panic!();
    };
    assert_eq!(reference.arguments.len(), 2);
}

#[test]
fn test_trailing_template_argument_delimiter_reported() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "alias A = Foo<string,>;", ParseOptions::default());
    assert_eq!(codes(&script), vec!["trailing-token"]);
}

#[test]
fn test_model_expression_value() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "alias A = { x: string, nested: { y: int32 } };");
    let Statement::AliasStatement(alias) = &script.statements[0] else {
        panic!();
    };
    let Expression::ModelExpression(model) = alias.value else {
        panic!();
    };
    assert_eq!(model.properties.len(), 2);
}

#[test]
fn test_standalone_type_reference() {
    let arena = CompilerArena::new();
    let (reference, diagnostics) = parse_standalone_type_reference(&arena, "Foo.Bar<string>");
    assert!(diagnostics.is_empty());
    assert!(matches!(reference.target, Expression::MemberExpression(_)));
    assert_eq!(reference.arguments.len(), 1);

    let (_, diagnostics) = parse_standalone_type_reference(&arena, "Foo bar");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, "token-expected");
}

#[test]
fn test_reserved_identifier_recovers_with_keyword_text() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "model struct {}", ParseOptions::default());
    assert_eq!(codes(&script), vec!["reserved-identifier"]);
    let model = first_model(&script);
    assert_eq!(model.id.sv, "struct");
}

// ============================================================================
// Doc comments
// ============================================================================

#[test]
fn test_doc_comment_parsing() {
    let arena = CompilerArena::new();
    let source = "/** Greets.\n * @param name who to greet\n * @returns a greeting\n */\nmodel M {}";
    let script = parse(
        &arena,
        source,
        ParseOptions {
            docs: true,
            ..Default::default()
        },
    );
    assert!(script.parse_diagnostics.is_empty());
    let model = first_model(&script);
    assert_eq!(model.docs.len(), 1);
    let doc = &model.docs[0];
    assert_eq!(doc.content.len(), 1);
    assert_eq!(doc.content[0].text, "Greets.");
    assert_eq!(doc.tags.len(), 2);
    let DocTag::Param(param) = &doc.tags[0] else {
        panic!("expected @param");
    };
    assert_eq!(param.tag_name.sv, "param");
    assert_eq!(param.param_name.sv, "name");
    assert_eq!(param.content[0].text, "who to greet");
    assert!(matches!(doc.tags[1], DocTag::Returns(_)));
    // The statement's range starts at the doc comment.
    assert_eq!(model.data.pos(), 0);
}

#[test]
fn test_doc_unknown_and_template_tags() {
    let arena = CompilerArena::new();
    let source = "/** @template T the type\n * @custom anything */\nmodel M<T> {}";
    let script = parse(
        &arena,
        source,
        ParseOptions {
            docs: true,
            ..Default::default()
        },
    );
    let model = first_model(&script);
    let doc = &model.docs[0];
    assert!(matches!(doc.tags[0], DocTag::Template(_)));
    assert!(matches!(doc.tags[1], DocTag::Unknown(_)));
}

#[test]
fn test_doc_invalid_param_name_is_warning() {
    let arena = CompilerArena::new();
    let script = parse(
        &arena,
        "/** @param 123 nope */\nmodel M {}",
        ParseOptions {
            docs: true,
            ..Default::default()
        },
    );
    assert_eq!(script.parse_diagnostics.len(), 1);
    let diag = &script.parse_diagnostics[0];
    assert_eq!(diag.code, "doc-invalid-identifier");
    assert_eq!(diag.category, DiagnosticCategory::Warning);
    // Warnings never mark the tree as having parse errors.
    assert!(!adl_ast::visitor::has_parse_error(Node::Script(&script)));
}

#[test]
fn test_unterminated_doc_comment_runs_to_end() {
    let arena = CompilerArena::new();
    let script = parse(
        &arena,
        "/** hello",
        ParseOptions {
            docs: true,
            ..Default::default()
        },
    );
    // Orphan docs (no following statement) attach to the script root, and
    // the interior of the unterminated comment extends to its very end.
    assert_eq!(script.docs.len(), 1);
    assert_eq!(script.docs[0].content[0].text, "hello");
}

#[test]
fn test_comment_collection_opt_in() {
    let arena = CompilerArena::new();
    let source = "// line\nmodel M {} /* block */";
    let script = parse(
        &arena,
        source,
        ParseOptions {
            comments: true,
            ..Default::default()
        },
    );
    assert_eq!(script.comments.len(), 2);
    assert_eq!(script.comments[0].kind, SyntaxKind::SingleLineComment);
    assert_eq!(script.comments[1].kind, SyntaxKind::MultiLineComment);

    let script = parse(&arena, source, ParseOptions::default());
    assert!(script.comments.is_empty());
}

#[test]
fn test_parse_options_snapshot() {
    let arena = CompilerArena::new();
    let options = ParseOptions {
        comments: true,
        docs: true,
    };
    let script = parse(&arena, "model M {}", options);
    assert_eq!(script.parse_options, options);
}

// ============================================================================
// Projections
// ============================================================================

#[test]
fn test_projection_statement() {
    let arena = CompilerArena::new();
    let script = parse_ok(
        &arena,
        "projection model#p { to { return self; } from { return self; } }",
    );
    let Statement::ProjectionStatement(projection) = &script.statements[0] else {
        panic!();
    };
    assert!(matches!(projection.selector, ProjectionSelector::Model(_)));
    assert_eq!(projection.id.sv, "p");
    let to = projection.to.as_ref().expect("to projection");
    assert_eq!(to.direction, ProjectionDirection::To);
    assert_eq!(to.body.len(), 1);
    let from = projection.from.as_ref().expect("from projection");
    assert_eq!(from.direction, ProjectionDirection::From);
}

#[test]
fn test_projection_duplicate_direction() {
    let arena = CompilerArena::new();
    let script = parse(
        &arena,
        "projection model#p { to { } to { } }",
        ParseOptions::default(),
    );
    assert_eq!(codes(&script), vec!["duplicate-symbol"]);
}

#[test]
fn test_projection_with_parameters_and_operators() {
    let arena = CompilerArena::new();
    let script = parse_ok(
        &arena,
        "projection model#v { to(version) { if version > 1 && enabled { self::add(1 + 2 * 3); }; } }",
    );
    let Statement::ProjectionStatement(projection) = &script.statements[0] else {
        panic!();
    };
    let to = projection.to.as_ref().unwrap();
    assert_eq!(to.parameters.len(), 1);
    assert_eq!(to.parameters[0].id.sv, "version");
    let ProjectionExpression::If(if_expr) = to.body[0].expr else {
        panic!("expected if expression");
    };
    // `version > 1 && enabled` parses as (version > 1) && enabled.
    let ProjectionExpression::Logical(test) = if_expr.test else {
        panic!("expected logical test");
    };
    assert!(matches!(test.left, ProjectionExpression::Relational(_)));
}

#[test]
fn test_projection_arithmetic_precedence() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "projection model#m { to { x(1 + 2 * 3); } }");
    let Statement::ProjectionStatement(projection) = &script.statements[0] else {
        panic!();
    };
    let to = projection.to.as_ref().unwrap();
    let ProjectionExpression::Call(call) = to.body[0].expr else {
        panic!("expected call");
    };
    let ProjectionExpression::Arithmetic(sum) = &call.arguments[0] else {
        panic!("expected arithmetic");
    };
    assert_eq!(sum.op, SyntaxKind::Plus);
    // Multiplication binds tighter than addition.
    assert!(matches!(sum.right, ProjectionExpression::Arithmetic(_)));
}

#[test]
fn test_projection_lambda() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "projection model#m { to { map((x, y) => { x; }); } }");
    let Statement::ProjectionStatement(projection) = &script.statements[0] else {
        panic!();
    };
    let to = projection.to.as_ref().unwrap();
    let ProjectionExpression::Call(call) = to.body[0].expr else {
        panic!();
    };
    let ProjectionExpression::Lambda(lambda) = &call.arguments[0] else {
        panic!("expected lambda");
    };
    assert_eq!(lambda.parameters.len(), 2);
    assert_eq!(lambda.parameters[0].id.sv, "x");
    assert_eq!(lambda.body.statements.len(), 1);
}

#[test]
fn test_projection_member_selectors() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "projection model#m { to { a.b::c; } }");
    let Statement::ProjectionStatement(projection) = &script.statements[0] else {
        panic!();
    };
    let to = projection.to.as_ref().unwrap();
    let ProjectionExpression::Member(outer) = to.body[0].expr else {
        panic!();
    };
    assert_eq!(outer.selector, MemberSelector::ColonColon);
    let ProjectionExpression::Member(inner) = outer.base else {
        panic!();
    };
    assert_eq!(inner.selector, MemberSelector::Dot);
}

#[test]
fn test_projection_decorator_reference() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "projection model#m { to { @added(self); } }");
    let Statement::ProjectionStatement(projection) = &script.statements[0] else {
        panic!();
    };
    let to = projection.to.as_ref().unwrap();
    let ProjectionExpression::Call(call) = to.body[0].expr else {
        panic!();
    };
    assert!(matches!(
        call.target,
        ProjectionExpression::DecoratorReference(_)
    ));
}

#[test]
fn test_projection_identifier_selector() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "projection Custom#p { to { } }");
    let Statement::ProjectionStatement(projection) = &script.statements[0] else {
        panic!();
    };
    assert!(matches!(
        projection.selector,
        ProjectionSelector::Identifier(_)
    ));
}

// ============================================================================
// Error recovery & invariants
// ============================================================================

#[test]
fn test_empty_input() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, "");
    assert!(script.statements.is_empty());
    assert!(script.printable);
}

#[test]
fn test_empty_statement() {
    let arena = CompilerArena::new();
    let script = parse_ok(&arena, ";;");
    assert_eq!(script.statements.len(), 2);
    assert!(matches!(script.statements[0], Statement::EmptyStatement(_)));
}

#[test]
fn test_progress_guard_terminates() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "model M { ]", ParseOptions::default());
    // Terminates, and the malformed body produces at most two diagnostics.
    assert!(!script.parse_diagnostics.is_empty());
    assert!(script.parse_diagnostics.len() <= 2);
    assert!(!script.printable);
}

#[test]
fn test_invalid_statement_recovery() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "???? model M {}", ParseOptions::default());
    assert_eq!(script.statements.len(), 2);
    assert!(matches!(script.statements[0], Statement::InvalidStatement(_)));
    let model = first_model(&script);
    assert_eq!(model.id.sv, "M");
    assert_eq!(codes(&script), vec!["token-expected"]);
}

#[test]
fn test_missing_identifiers_are_unique() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "model {} model {}", ParseOptions::default());
    let mut names = Vec::new();
    for statement in script.statements {
        if let Statement::ModelStatement(model) = statement {
            assert!(model.id.sv.starts_with("<missing identifier>"));
            assert!(model.id.data.flags().contains(NodeFlags::SYNTHETIC));
            names.push(model.id.sv);
        }
    }
    assert_eq!(names.len(), 2);
    assert_ne!(names[0], names[1]);
}

#[test]
fn test_unterminated_string_recovers() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "import \"abc", ParseOptions::default());
    assert!(script
        .parse_diagnostics
        .iter()
        .any(|d| d.code == "unterminated"));
    assert!(!script.printable);
}

/// Every node's range must contain its children's ranges, recursively.
fn assert_containment(node: Node<'_>) {
    let range = node.data().range;
    assert!(range.pos <= range.end, "inverted range on {:?}", node);
    visit_children(node, &mut |child| {
        let child_range = child.data().range;
        assert!(
            range.pos <= child_range.pos && child_range.end <= range.end,
            "child {:?} escapes parent {:?}",
            child,
            node
        );
        assert_containment(child);
    });
}

#[test]
fn test_range_containment_invariant() {
    let sources = [
        "model M { x: string; y?: int32 = 3 }",
        "namespace A.B.C;",
        "@tag(\"x\") op foo(a: string): void;",
        "interface I extends A { op a(): void; }",
        "projection model#p { to(v) { if v > 1 { return self; }; } from { } }",
        "union Pet { cat: Cat, dog: Dog }",
        "extern dec doc(target: unknown, ...rest: string[]);",
        "/** docs @param x y */ model D { x: string }",
        "alias T = [A, { b: C }, D | E & F[]];",
        "model Broken { ]",
        "???? model After {}",
    ];
    for source in sources {
        let arena = CompilerArena::new();
        let script = parse(
            &arena,
            source,
            ParseOptions {
                comments: true,
                docs: true,
            },
        );
        assert_containment(Node::Script(&script));
    }
}

#[test]
fn test_script_id_is_file_path() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "model M {}", ParseOptions::default());
    assert_eq!(script.id.sv, script.file.path);
    assert!(script.id.data.flags().contains(NodeFlags::SYNTHETIC));
}

#[test]
fn test_diagnostics_sorted_by_position() {
    let arena = CompilerArena::new();
    let script = parse(
        &arena,
        "model M { x: string = 3 }\nmodel N { y: string = 4 }",
        ParseOptions::default(),
    );
    assert_eq!(codes(&script), vec!["default-optional", "default-optional"]);
    let starts: Vec<_> = script
        .parse_diagnostics
        .iter()
        .map(|d| d.span.unwrap().start)
        .collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}
