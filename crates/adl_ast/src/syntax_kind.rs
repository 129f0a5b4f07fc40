//! SyntaxKind enum - all token and node kinds in the ADL syntax tree.
//!
//! Tokens and nodes share one flat kind space: the scanner produces the
//! token kinds, the parser produces the node kinds, and a handful of kinds
//! (literals, keyword expressions) serve as both.

/// The kind of a token or node in the syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    /// The "no token" kind: the scanner before the first scan, and list
    /// driver slots that have no delimiter.
    None = 0,
    EndOfFile,

    // Trivia
    SingleLineComment,
    MultiLineComment,
    NewLine,
    Whitespace,

    // Doc-mode content run
    DocText,

    // Literals (token and node kind)
    NumericLiteral,
    StringLiteral,

    // Punctuation
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Dot,
    Ellipsis,
    Semicolon,
    Comma,
    Colon,
    ColonColon,
    LessThan,
    GreaterThan,
    LessThanEquals,
    GreaterThanEquals,
    Equals,
    EqualsEquals,
    ExclamationEquals,
    EqualsGreaterThan,
    Plus,
    Minus,
    Asterisk,
    ForwardSlash,
    Ampersand,
    AmpersandAmpersand,
    Bar,
    BarBar,
    Exclamation,
    Question,
    At,
    AtAt,
    Hash,

    // Keywords
    ImportKeyword,
    ModelKeyword,
    ScalarKeyword,
    NamespaceKeyword,
    UsingKeyword,
    InterfaceKeyword,
    UnionKeyword,
    OpKeyword,
    EnumKeyword,
    AliasKeyword,
    IsKeyword,
    ExtendsKeyword,
    ProjectionKeyword,
    DecKeyword,
    FnKeyword,
    ExternKeyword,
    VoidKeyword,
    NeverKeyword,
    UnknownKeyword,
    IfKeyword,
    ElseKeyword,
    TrueKeyword,
    FalseKeyword,
    ReturnKeyword,

    // Reserved future keywords
    StatementKeyword,
    MacroKeyword,
    PackageKeyword,
    MetadataKeyword,
    EnvKeyword,
    ArgKeyword,
    DeclareKeyword,
    ArrayKeyword,
    StructKeyword,
    RecordKeyword,
    ModuleKeyword,
    ModKeyword,
    SymKeyword,
    ContextKeyword,
    PropKeyword,
    PropertyKeyword,
    ScenarioKeyword,

    // Identifier (token and node kind)
    Identifier,

    // ========================================================================
    // Nodes
    // ========================================================================
    AdlScript,

    // Statements
    ImportStatement,
    ModelStatement,
    ScalarStatement,
    NamespaceStatement,
    InterfaceStatement,
    UnionStatement,
    OperationStatement,
    EnumStatement,
    AliasStatement,
    UsingStatement,
    ProjectionStatement,
    DecoratorDeclarationStatement,
    FunctionDeclarationStatement,
    AugmentDecoratorStatement,
    EmptyStatement,
    InvalidStatement,

    // Expressions
    MemberExpression,
    TypeReference,
    UnionExpression,
    IntersectionExpression,
    ArrayExpression,
    TupleExpression,
    ModelExpression,
    BooleanLiteral,

    // Members
    ModelProperty,
    ModelSpreadProperty,
    EnumMember,
    EnumSpreadMember,
    UnionVariant,
    OperationSignatureDeclaration,
    OperationSignatureReference,
    FunctionParameter,
    TemplateParameterDeclaration,
    Modifier,

    // Decorations
    DecoratorExpression,
    DirectiveExpression,

    // Doc nodes
    Doc,
    DocParamTag,
    DocReturnsTag,
    DocTemplateTag,
    DocUnknownTag,

    // Projections
    Projection,
    ProjectionParameterDeclaration,
    ProjectionModelSelector,
    ProjectionOperationSelector,
    ProjectionUnionSelector,
    ProjectionInterfaceSelector,
    ProjectionEnumSelector,
    ProjectionExpressionStatement,
    ProjectionBlockExpression,
    ProjectionIfExpression,
    ProjectionLambdaExpression,
    ProjectionLambdaParameterDeclaration,
    ProjectionMemberExpression,
    ProjectionCallExpression,
    ProjectionLogicalExpression,
    ProjectionEqualityExpression,
    ProjectionRelationalExpression,
    ProjectionArithmeticExpression,
    ProjectionUnaryExpression,
    ProjectionModelExpression,
    ProjectionModelProperty,
    ProjectionModelSpreadProperty,
    ProjectionTupleExpression,
    ProjectionDecoratorReferenceExpression,
    ReturnExpression,

    Count,
}

// Marker constants for SyntaxKind ranges.
// These can't be enum variants because Rust doesn't allow duplicate
// discriminants.
impl SyntaxKind {
    pub const FIRST_TRIVIA: SyntaxKind = SyntaxKind::SingleLineComment;
    pub const LAST_TRIVIA: SyntaxKind = SyntaxKind::Whitespace;
    pub const FIRST_PUNCTUATION: SyntaxKind = SyntaxKind::OpenBrace;
    pub const LAST_PUNCTUATION: SyntaxKind = SyntaxKind::Hash;
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::ImportKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::ScenarioKeyword;
    pub const FIRST_RESERVED_KEYWORD: SyntaxKind = SyntaxKind::StatementKeyword;
    pub const LAST_RESERVED_KEYWORD: SyntaxKind = SyntaxKind::ScenarioKeyword;
    pub const FIRST_NODE: SyntaxKind = SyntaxKind::AdlScript;
}

impl SyntaxKind {
    /// Whether this kind represents trivia (whitespace, newlines, comments).
    #[inline]
    pub fn is_trivia(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::FIRST_TRIVIA as u16 && v <= SyntaxKind::LAST_TRIVIA as u16
    }

    /// Whether this kind represents a comment token.
    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            SyntaxKind::SingleLineComment | SyntaxKind::MultiLineComment
        )
    }

    /// Whether this kind represents a keyword (including reserved ones).
    #[inline]
    pub fn is_keyword(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::FIRST_KEYWORD as u16 && v <= SyntaxKind::LAST_KEYWORD as u16
    }

    /// Whether this kind is a reserved future keyword: scanned as a keyword
    /// but usable nowhere in the grammar.
    #[inline]
    pub fn is_reserved_keyword(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::FIRST_RESERVED_KEYWORD as u16
            && v <= SyntaxKind::LAST_RESERVED_KEYWORD as u16
    }

    /// Whether this kind represents a punctuation token.
    #[inline]
    pub fn is_punctuation(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::FIRST_PUNCTUATION as u16 && v <= SyntaxKind::LAST_PUNCTUATION as u16
    }

    /// Whether this kind can begin a statement. Used by error recovery to
    /// find a re-synchronization point.
    #[inline]
    pub fn is_statement_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::ImportKeyword
                | SyntaxKind::ModelKeyword
                | SyntaxKind::ScalarKeyword
                | SyntaxKind::NamespaceKeyword
                | SyntaxKind::UsingKeyword
                | SyntaxKind::InterfaceKeyword
                | SyntaxKind::UnionKeyword
                | SyntaxKind::OpKeyword
                | SyntaxKind::EnumKeyword
                | SyntaxKind::AliasKeyword
                | SyntaxKind::ProjectionKeyword
                | SyntaxKind::DecKeyword
                | SyntaxKind::FnKeyword
                | SyntaxKind::ExternKeyword
        )
    }

    /// Map identifier text to its keyword kind, if it is one.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "import" => SyntaxKind::ImportKeyword,
            "model" => SyntaxKind::ModelKeyword,
            "scalar" => SyntaxKind::ScalarKeyword,
            "namespace" => SyntaxKind::NamespaceKeyword,
            "using" => SyntaxKind::UsingKeyword,
            "interface" => SyntaxKind::InterfaceKeyword,
            "union" => SyntaxKind::UnionKeyword,
            "op" => SyntaxKind::OpKeyword,
            "enum" => SyntaxKind::EnumKeyword,
            "alias" => SyntaxKind::AliasKeyword,
            "is" => SyntaxKind::IsKeyword,
            "extends" => SyntaxKind::ExtendsKeyword,
            "projection" => SyntaxKind::ProjectionKeyword,
            "dec" => SyntaxKind::DecKeyword,
            "fn" => SyntaxKind::FnKeyword,
            "extern" => SyntaxKind::ExternKeyword,
            "void" => SyntaxKind::VoidKeyword,
            "never" => SyntaxKind::NeverKeyword,
            "unknown" => SyntaxKind::UnknownKeyword,
            "if" => SyntaxKind::IfKeyword,
            "else" => SyntaxKind::ElseKeyword,
            "true" => SyntaxKind::TrueKeyword,
            "false" => SyntaxKind::FalseKeyword,
            "return" => SyntaxKind::ReturnKeyword,
            "statement" => SyntaxKind::StatementKeyword,
            "macro" => SyntaxKind::MacroKeyword,
            "package" => SyntaxKind::PackageKeyword,
            "metadata" => SyntaxKind::MetadataKeyword,
            "env" => SyntaxKind::EnvKeyword,
            "arg" => SyntaxKind::ArgKeyword,
            "declare" => SyntaxKind::DeclareKeyword,
            "array" => SyntaxKind::ArrayKeyword,
            "struct" => SyntaxKind::StructKeyword,
            "record" => SyntaxKind::RecordKeyword,
            "module" => SyntaxKind::ModuleKeyword,
            "mod" => SyntaxKind::ModKeyword,
            "sym" => SyntaxKind::SymKeyword,
            "context" => SyntaxKind::ContextKeyword,
            "prop" => SyntaxKind::PropKeyword,
            "property" => SyntaxKind::PropertyKeyword,
            "scenario" => SyntaxKind::ScenarioKeyword,
            _ => return None,
        };
        Some(kind)
    }

    /// Source text of a keyword kind.
    pub fn keyword_text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::ImportKeyword => "import",
            SyntaxKind::ModelKeyword => "model",
            SyntaxKind::ScalarKeyword => "scalar",
            SyntaxKind::NamespaceKeyword => "namespace",
            SyntaxKind::UsingKeyword => "using",
            SyntaxKind::InterfaceKeyword => "interface",
            SyntaxKind::UnionKeyword => "union",
            SyntaxKind::OpKeyword => "op",
            SyntaxKind::EnumKeyword => "enum",
            SyntaxKind::AliasKeyword => "alias",
            SyntaxKind::IsKeyword => "is",
            SyntaxKind::ExtendsKeyword => "extends",
            SyntaxKind::ProjectionKeyword => "projection",
            SyntaxKind::DecKeyword => "dec",
            SyntaxKind::FnKeyword => "fn",
            SyntaxKind::ExternKeyword => "extern",
            SyntaxKind::VoidKeyword => "void",
            SyntaxKind::NeverKeyword => "never",
            SyntaxKind::UnknownKeyword => "unknown",
            SyntaxKind::IfKeyword => "if",
            SyntaxKind::ElseKeyword => "else",
            SyntaxKind::TrueKeyword => "true",
            SyntaxKind::FalseKeyword => "false",
            SyntaxKind::ReturnKeyword => "return",
            SyntaxKind::StatementKeyword => "statement",
            SyntaxKind::MacroKeyword => "macro",
            SyntaxKind::PackageKeyword => "package",
            SyntaxKind::MetadataKeyword => "metadata",
            SyntaxKind::EnvKeyword => "env",
            SyntaxKind::ArgKeyword => "arg",
            SyntaxKind::DeclareKeyword => "declare",
            SyntaxKind::ArrayKeyword => "array",
            SyntaxKind::StructKeyword => "struct",
            SyntaxKind::RecordKeyword => "record",
            SyntaxKind::ModuleKeyword => "module",
            SyntaxKind::ModKeyword => "mod",
            SyntaxKind::SymKeyword => "sym",
            SyntaxKind::ContextKeyword => "context",
            SyntaxKind::PropKeyword => "prop",
            SyntaxKind::PropertyKeyword => "property",
            SyntaxKind::ScenarioKeyword => "scenario",
            _ => return None,
        };
        Some(text)
    }

    /// Source text of a punctuation kind.
    pub fn punctuation_text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::OpenBrace => "{",
            SyntaxKind::CloseBrace => "}",
            SyntaxKind::OpenParen => "(",
            SyntaxKind::CloseParen => ")",
            SyntaxKind::OpenBracket => "[",
            SyntaxKind::CloseBracket => "]",
            SyntaxKind::Dot => ".",
            SyntaxKind::Ellipsis => "...",
            SyntaxKind::Semicolon => ";",
            SyntaxKind::Comma => ",",
            SyntaxKind::Colon => ":",
            SyntaxKind::ColonColon => "::",
            SyntaxKind::LessThan => "<",
            SyntaxKind::GreaterThan => ">",
            SyntaxKind::LessThanEquals => "<=",
            SyntaxKind::GreaterThanEquals => ">=",
            SyntaxKind::Equals => "=",
            SyntaxKind::EqualsEquals => "==",
            SyntaxKind::ExclamationEquals => "!=",
            SyntaxKind::EqualsGreaterThan => "=>",
            SyntaxKind::Plus => "+",
            SyntaxKind::Minus => "-",
            SyntaxKind::Asterisk => "*",
            SyntaxKind::ForwardSlash => "/",
            SyntaxKind::Ampersand => "&",
            SyntaxKind::AmpersandAmpersand => "&&",
            SyntaxKind::Bar => "|",
            SyntaxKind::BarBar => "||",
            SyntaxKind::Exclamation => "!",
            SyntaxKind::Question => "?",
            SyntaxKind::At => "@",
            SyntaxKind::AtAt => "@@",
            SyntaxKind::Hash => "#",
            _ => return None,
        };
        Some(text)
    }

    /// Human-readable token description used in diagnostics.
    pub fn text_for_error(self) -> &'static str {
        if let Some(text) = self.punctuation_text() {
            return text;
        }
        if let Some(text) = self.keyword_text() {
            return text;
        }
        match self {
            SyntaxKind::None => "none",
            SyntaxKind::EndOfFile => "end of file",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::StringLiteral => "string literal",
            SyntaxKind::NumericLiteral => "numeric literal",
            SyntaxKind::NewLine => "newline",
            SyntaxKind::Whitespace => "whitespace",
            SyntaxKind::SingleLineComment | SyntaxKind::MultiLineComment => "comment",
            _ => "token",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for kw in ["model", "op", "projection", "extern", "scenario"] {
            let kind = SyntaxKind::from_keyword(kw).unwrap();
            assert!(kind.is_keyword());
            assert_eq!(kind.keyword_text(), Some(kw));
        }
        assert_eq!(SyntaxKind::from_keyword("self"), None);
        assert_eq!(SyntaxKind::from_keyword("to"), None);
    }

    #[test]
    fn test_reserved_keywords() {
        assert!(SyntaxKind::StatementKeyword.is_reserved_keyword());
        assert!(SyntaxKind::ScenarioKeyword.is_reserved_keyword());
        assert!(!SyntaxKind::ModelKeyword.is_reserved_keyword());
        assert!(SyntaxKind::StatementKeyword.is_keyword());
    }

    #[test]
    fn test_trivia_range() {
        assert!(SyntaxKind::Whitespace.is_trivia());
        assert!(SyntaxKind::NewLine.is_trivia());
        assert!(SyntaxKind::SingleLineComment.is_trivia());
        assert!(!SyntaxKind::Identifier.is_trivia());
        assert!(!SyntaxKind::DocText.is_trivia());
    }

    #[test]
    fn test_statement_keywords() {
        assert!(SyntaxKind::ModelKeyword.is_statement_keyword());
        assert!(SyntaxKind::ExternKeyword.is_statement_keyword());
        assert!(!SyntaxKind::IsKeyword.is_statement_keyword());
        assert!(!SyntaxKind::IfKeyword.is_statement_keyword());
    }
}
