//! adl_scanner: Tokenizer for ADL source text.
//!
//! Produces tokens from source text with:
//! - trivia (whitespace, newlines, comments) as real tokens
//! - a secondary doc-comment scanning mode
//! - scoped sub-range scans for doc comment interiors
//! - Unicode identifiers

mod char_codes;
mod scanner;

pub use scanner::{RangeScope, Scanner};
