//! Flag types and parse options for the syntax tree.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Flags carried by every tree node.
    ///
    /// `DESCENDANT_HAS_ERROR` and `DESCENDANT_ERRORS_EXAMINED` are filled in
    /// lazily by `has_parse_error`; all other bits are set during parsing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        const NONE                      = 0;
        /// A parse diagnostic was reported directly on this node.
        const THIS_NODE_HAS_ERROR       = 1 << 0;
        /// Some descendant carries `THIS_NODE_HAS_ERROR`. Only authoritative
        /// once `DESCENDANT_ERRORS_EXAMINED` is set.
        const DESCENDANT_HAS_ERROR      = 1 << 1;
        /// The lazy descendant scan has run for this node.
        const DESCENDANT_ERRORS_EXAMINED = 1 << 2;
        /// The node was synthesized during error recovery and covers no
        /// source text.
        const SYNTHETIC                 = 1 << 3;
    }
}

bitflags::bitflags! {
    /// Flags describing the token the scanner is currently on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u16 {
        const NONE          = 0;
        /// String literal or multi-line comment ran into end of file.
        const UNTERMINATED  = 1 << 0;
        /// Multi-line comment opened with `/**` (and is not just `/**/`).
        const DOC_COMMENT   = 1 << 1;
    }
}

bitflags::bitflags! {
    /// Modifier keywords accumulated on a declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u32 {
        const NONE   = 0;
        const EXTERN = 1 << 0;
    }
}

/// Options accepted by the parser entry points. The parsed script carries a
/// snapshot of the options it was produced with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Collect comment trivia into the script's comment list.
    #[serde(default)]
    pub comments: bool,
    /// Parse doc comments into structured doc nodes.
    #[serde(default)]
    pub docs: bool,
}
