//! adl_parser: Recursive descent parser for the ADL language.
//!
//! Parses source text into an arena-allocated, lossless concrete syntax
//! tree with aggressive error recovery: the parser never stops at the
//! first error, and every recovery path leaves a well-formed (possibly
//! synthetic) node behind.

mod parser;
mod precedence;

pub use parser::{parse, parse_standalone_type_reference, Parser};
