//! Tree utility tests: position queries, parse-error propagation, and
//! identifier context classification over parsed trees.

use adl_ast::syntax_kind::SyntaxKind;
use adl_ast::types::ParseOptions;
use adl_ast::visitor::{
    get_first_ancestor, get_identifier_context, get_node_at_position,
    get_node_at_position_filtered, has_parse_error, is_import_statement, statement_node,
    IdentifierKind, Node,
};
use adl_core::arena::CompilerArena;
use adl_parser::parse;

#[test]
fn test_get_node_at_position_resolves_identifier() {
    let arena = CompilerArena::new();
    let source = "model Pet { name: string; }";
    let script = parse(&arena, source, ParseOptions::default());
    assert!(script.parse_diagnostics.is_empty());

    let name_pos = source.find("name").unwrap() as u32;
    let node = get_node_at_position(&script, name_pos);
    let Node::Identifier(id) = node else {
        panic!("expected identifier, got {:?}", node);
    };
    assert_eq!(id.sv, "name");

    let type_pos = source.find("string").unwrap() as u32 + 2;
    let node = get_node_at_position(&script, type_pos);
    let Node::Identifier(id) = node else {
        panic!("expected identifier, got {:?}", node);
    };
    assert_eq!(id.sv, "string");
}

#[test]
fn test_get_node_at_position_prefers_deepest() {
    let arena = CompilerArena::new();
    let source = "namespace A { model M { x: int32; } }";
    let script = parse(&arena, source, ParseOptions::default());
    let x_pos = source.find("x:").unwrap() as u32;
    let node = get_node_at_position(&script, x_pos);
    assert_eq!(node.kind(), SyntaxKind::Identifier);
}

#[test]
fn test_get_node_at_position_filtered_selects_ancestor() {
    let arena = CompilerArena::new();
    let source = "model Pet { name: string; }";
    let script = parse(&arena, source, ParseOptions::default());
    let name_pos = source.find("name").unwrap() as u32;
    let node = get_node_at_position_filtered(&script, name_pos, &|n| {
        matches!(n, Node::ModelProperty(_))
    })
    .expect("property ancestor");
    assert!(matches!(node, Node::ModelProperty(_)));
}

#[test]
fn test_has_parse_error_clean_tree() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "model M { x: string; }", ParseOptions::default());
    assert!(!has_parse_error(Node::Script(&script)));
    // Idempotent after memoization.
    assert!(!has_parse_error(Node::Script(&script)));
}

#[test]
fn test_has_parse_error_propagates_from_descendant() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "model M { x: }", ParseOptions::default());
    assert!(!script.parse_diagnostics.is_empty());
    assert!(has_parse_error(Node::Script(&script)));
    // Memoized result is stable across repeated calls.
    assert!(has_parse_error(Node::Script(&script)));
    // The failing statement carries the error; a sibling in another parse
    // does not exist, so check the statement directly too.
    assert!(has_parse_error(statement_node(&script.statements[0])));
}

#[test]
fn test_get_first_ancestor() {
    let arena = CompilerArena::new();
    let source = "model Pet { name: string; }";
    let script = parse(&arena, source, ParseOptions::default());
    let name_pos = source.find("name").unwrap() as u32;
    let node = get_node_at_position(&script, name_pos);
    let model = get_first_ancestor(&script, node, &|n| matches!(n, Node::Model(_)))
        .expect("model ancestor");
    let Node::Model(model) = model else { panic!() };
    assert_eq!(model.id.sv, "Pet");
    // No ancestor matches an impossible predicate.
    assert!(get_first_ancestor(&script, node, &|n| matches!(n, Node::Enum(_))).is_none());
}

#[test]
fn test_is_import_statement() {
    let arena = CompilerArena::new();
    let script = parse(&arena, "import \"./lib.adl\";\nmodel M {}", ParseOptions::default());
    assert!(is_import_statement(statement_node(&script.statements[0])));
    assert!(!is_import_statement(statement_node(&script.statements[1])));
}

#[test]
fn test_identifier_context_type_reference() {
    let arena = CompilerArena::new();
    let source = "model Pet { name: string; }";
    let script = parse(&arena, source, ParseOptions::default());
    let pos = source.find("string").unwrap() as u32;
    let Node::Identifier(id) = get_node_at_position(&script, pos) else {
        panic!();
    };
    assert_eq!(
        get_identifier_context(&script, id),
        IdentifierKind::TypeReference
    );
}

#[test]
fn test_identifier_context_declaration() {
    let arena = CompilerArena::new();
    let source = "model Pet {}";
    let script = parse(&arena, source, ParseOptions::default());
    let pos = source.find("Pet").unwrap() as u32;
    let Node::Identifier(id) = get_node_at_position(&script, pos) else {
        panic!();
    };
    assert_eq!(
        get_identifier_context(&script, id),
        IdentifierKind::Declaration
    );
}

#[test]
fn test_identifier_context_decorator() {
    let arena = CompilerArena::new();
    let source = "@tag model Pet {}";
    let script = parse(&arena, source, ParseOptions::default());
    let pos = source.find("tag").unwrap() as u32;
    let Node::Identifier(id) = get_node_at_position(&script, pos) else {
        panic!();
    };
    assert_eq!(get_identifier_context(&script, id), IdentifierKind::Decorator);
}

#[test]
fn test_identifier_context_using() {
    let arena = CompilerArena::new();
    let source = "using A.B;";
    let script = parse(&arena, source, ParseOptions::default());
    let pos = source.find('B').unwrap() as u32;
    let Node::Identifier(id) = get_node_at_position(&script, pos) else {
        panic!();
    };
    assert_eq!(get_identifier_context(&script, id), IdentifierKind::Using);
}

#[test]
fn test_identifier_context_projection_call() {
    let arena = CompilerArena::new();
    let source = "projection model#m { to { rename(\"x\"); } }";
    let script = parse(&arena, source, ParseOptions::default());
    let pos = source.find("rename").unwrap() as u32;
    let Node::Identifier(id) = get_node_at_position(&script, pos) else {
        panic!();
    };
    assert_eq!(get_identifier_context(&script, id), IdentifierKind::Function);
}
