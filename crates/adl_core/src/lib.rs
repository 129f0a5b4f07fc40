//! adl_core: Core utilities for the ADL language front end.
//!
//! Provides source text handling (positions, spans, line maps) and the
//! bump arena that every syntax tree is allocated into.

pub mod arena;
pub mod text;

// Re-export commonly used types
pub use arena::CompilerArena;
pub use text::{LineAndColumn, LineMap, SourceFile, TextRange, TextSpan};
