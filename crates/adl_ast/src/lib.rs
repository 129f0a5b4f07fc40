//! adl_ast: Concrete syntax tree definitions for the ADL language.
//!
//! Defines all tree node types, the SyntaxKind enum, flag types, and the
//! traversal utilities (child iteration, position queries, parse-error
//! propagation) that language tooling builds on.

pub mod node;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use types::*;
pub use visitor::{
    get_ancestors, get_first_ancestor, get_identifier_context, get_node_at_position,
    get_node_at_position_filtered, has_parse_error, is_import_statement, visit_children,
    IdentifierKind, Node,
};
