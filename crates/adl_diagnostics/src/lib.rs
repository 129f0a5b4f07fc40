//! adl_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Defines the string-keyed diagnostic catalog used by the scanner and
//! parser. Diagnostics carry structured information about errors and
//! warnings; parsing never aborts on them, it accumulates them in a
//! [`DiagnosticCollection`] next to the tree.

use adl_core::text::TextSpan;
use std::fmt;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template.
///
/// Several templates may share the same `code`: those are the message-id
/// sub-variants of that code (e.g. `token-expected` with its `statement`
/// and `identifier` forms).
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The string-keyed diagnostic code (e.g. `"token-expected"`).
    pub code: &'static str,
    /// The severity of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc.
    pub message: &'static str,
    /// Whether a tree carrying this diagnostic is still safe to feed to a
    /// pretty-printer. Token-level recovery diagnostics clear the script's
    /// printable bit; ordering and shape diagnostics do not.
    pub printable: bool,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The file path where this diagnostic occurred, if any.
    pub file: Option<String>,
    /// The source text span where this diagnostic occurred, if any.
    pub span: Option<TextSpan>,
    /// The resolved message text.
    pub message_text: String,
    /// The string-keyed diagnostic code.
    pub code: &'static str,
    /// The severity.
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a new diagnostic with file and span info.
    pub fn with_location(
        file: String,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: Some(file),
            span: Some(span),
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Whether this is an error diagnostic.
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} {}: {}", self.category, self.code, self.message_text)
    }
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated during a parse.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category == DiagnosticCategory::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Error)
            .count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let file_cmp = a.file.cmp(&b.file);
            if file_cmp != std::cmp::Ordering::Equal {
                return file_cmp;
            }
            let a_pos = a.span.map(|s| s.start).unwrap_or(0);
            let b_pos = b.span.map(|s| s.start).unwrap_or(0);
            a_pos.cmp(&b_pos)
        });
    }
}

// ============================================================================
// Diagnostic messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::Error,
                message: $msg,
                printable: false,
            }
        };
        ($code:expr, Error, printable, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::Error,
                message: $msg,
                printable: true,
            }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::Warning,
                message: $msg,
                printable: true,
            }
        };
    }

    // ========================================================================
    // Token-level syntax errors
    // ========================================================================
    pub const TOKEN_EXPECTED: DiagnosticMessage = diag!("token-expected", Error, "{0} expected.");
    pub const TOKEN_EXPECTED_UNEXPECTED: DiagnosticMessage =
        diag!("token-expected", Error, "Unexpected token {0}");
    pub const TOKEN_EXPECTED_STATEMENT: DiagnosticMessage =
        diag!("token-expected", Error, "Statement expected.");
    pub const TOKEN_EXPECTED_IDENTIFIER: DiagnosticMessage =
        diag!("token-expected", Error, "Identifier expected.");
    pub const TOKEN_EXPECTED_EXPRESSION: DiagnosticMessage =
        diag!("token-expected", Error, "Expression expected.");
    pub const TOKEN_EXPECTED_PROPERTY: DiagnosticMessage =
        diag!("token-expected", Error, "Property expected.");
    pub const TOKEN_EXPECTED_PROJECTION_DIRECTION: DiagnosticMessage =
        diag!("token-expected", Error, "from or to expected.");
    pub const TRAILING_TOKEN: DiagnosticMessage =
        diag!("trailing-token", Error, "Trailing {0}");
    pub const RESERVED_IDENTIFIER: DiagnosticMessage = diag!(
        "reserved-identifier",
        Error,
        printable,
        "Keyword cannot be used as identifier."
    );
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage =
        diag!("unterminated", Error, "Unterminated string literal.");
    pub const UNTERMINATED_COMMENT: DiagnosticMessage =
        diag!("unterminated", Error, "Unterminated multi-line comment.");
    pub const INVALID_CHARACTER: DiagnosticMessage =
        diag!("invalid-character", Error, "Invalid character.");

    // ========================================================================
    // Statement ordering errors
    // ========================================================================
    pub const IMPORT_FIRST: DiagnosticMessage = diag!(
        "import-first",
        Error,
        printable,
        "Imports must come before any other declaration."
    );
    pub const IMPORT_FIRST_TOP_LEVEL: DiagnosticMessage = diag!(
        "import-first",
        Error,
        printable,
        "Imports must be top-level and come before any other declaration."
    );
    pub const BLOCKLESS_NAMESPACE_FIRST: DiagnosticMessage = diag!(
        "blockless-namespace-first",
        Error,
        printable,
        "Blockless namespaces can't follow other declarations."
    );
    pub const BLOCKLESS_NAMESPACE_FIRST_TOP_LEVEL: DiagnosticMessage = diag!(
        "blockless-namespace-first",
        Error,
        printable,
        "Blockless namespace can only be top-level."
    );
    pub const MULTIPLE_BLOCKLESS_NAMESPACE: DiagnosticMessage = diag!(
        "multiple-blockless-namespace",
        Error,
        printable,
        "Cannot use multiple blockless namespaces."
    );

    // ========================================================================
    // Declaration shape errors
    // ========================================================================
    pub const DUPLICATE_SYMBOL: DiagnosticMessage =
        diag!("duplicate-symbol", Error, printable, "Duplicate name: {0}");
    pub const DEFAULT_REQUIRED: DiagnosticMessage = diag!(
        "default-required",
        Error,
        printable,
        "Required template parameters must not follow optional template parameters"
    );
    pub const DEFAULT_OPTIONAL: DiagnosticMessage = diag!(
        "default-optional",
        Error,
        printable,
        "Cannot use default with non optional properties"
    );
    pub const REQUIRED_PARAMETER_FIRST: DiagnosticMessage = diag!(
        "required-parameter-first",
        Error,
        printable,
        "A required parameter cannot follow an optional parameter"
    );
    pub const REST_PARAMETER_REQUIRED: DiagnosticMessage = diag!(
        "rest-parameter-required",
        Error,
        printable,
        "A rest parameter cannot be optional"
    );
    pub const REST_PARAMETER_LAST: DiagnosticMessage = diag!(
        "rest-parameter-last",
        Error,
        printable,
        "A rest parameter must be last in a parameter list"
    );
    pub const DECORATOR_DECL_TARGET: DiagnosticMessage = diag!(
        "decorator-decl-target",
        Error,
        printable,
        "dec must have at least one parameter."
    );
    pub const DECORATOR_DECL_TARGET_REQUIRED: DiagnosticMessage = diag!(
        "decorator-decl-target",
        Error,
        printable,
        "dec first parameter must be required."
    );
    pub const AUGMENT_DECORATOR_TARGET: DiagnosticMessage = diag!(
        "augment-decorator-target",
        Error,
        "Augment decorator first argument must be a type reference."
    );

    // ========================================================================
    // Decorator / directive placement
    // ========================================================================
    pub const INVALID_DECORATOR_LOCATION: DiagnosticMessage = diag!(
        "invalid-decorator-location",
        Error,
        printable,
        "Cannot decorate {0}."
    );
    pub const INVALID_DIRECTIVE_LOCATION: DiagnosticMessage = diag!(
        "invalid-directive-location",
        Error,
        printable,
        "Cannot place directive on {0}."
    );
    pub const UNKNOWN_DIRECTIVE: DiagnosticMessage = diag!(
        "unknown-directive",
        Error,
        printable,
        "Unknown directive '#{0}'"
    );

    // ========================================================================
    // Doc comment warnings
    // ========================================================================
    pub const DOC_INVALID_IDENTIFIER: DiagnosticMessage =
        diag!("doc-invalid-identifier", Warning, "Invalid identifier.");
    pub const DOC_INVALID_IDENTIFIER_TAG: DiagnosticMessage = diag!(
        "doc-invalid-identifier",
        Warning,
        "Invalid tag name. Must match @identifier."
    );
    pub const DOC_INVALID_IDENTIFIER_PARAM: DiagnosticMessage = diag!(
        "doc-invalid-identifier",
        Warning,
        "Invalid parameter name."
    );
    pub const DOC_INVALID_IDENTIFIER_TEMPLATE_PARAM: DiagnosticMessage = diag!(
        "doc-invalid-identifier",
        Warning,
        "Invalid template parameter name."
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        assert_eq!(format_message("{0} expected.", &["';'"]), "';' expected.");
        assert_eq!(
            format_message("Cannot decorate {0}.", &["import statement"]),
            "Cannot decorate import statement."
        );
    }

    #[test]
    fn test_message_variants_share_code() {
        assert_eq!(messages::TOKEN_EXPECTED.code, "token-expected");
        assert_eq!(messages::TOKEN_EXPECTED_STATEMENT.code, "token-expected");
        assert_eq!(messages::IMPORT_FIRST.code, messages::IMPORT_FIRST_TOP_LEVEL.code);
    }

    #[test]
    fn test_collection_counts_errors() {
        let mut diags = DiagnosticCollection::new();
        diags.add(Diagnostic::new(&messages::TOKEN_EXPECTED, &["';'"]));
        diags.add(Diagnostic::new(&messages::DOC_INVALID_IDENTIFIER, &[]));
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.error_count(), 1);
        assert!(diags.has_errors());
    }
}
