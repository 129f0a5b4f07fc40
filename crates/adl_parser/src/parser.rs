//! The ADL parser implementation.
//!
//! A recursive descent parser producing a lossless concrete syntax tree.
//! It never aborts on a syntax error: missing tokens are synthesized, runs
//! of garbage are skipped to a re-synchronization point, and every
//! recovery path produces a well-formed node so later passes can run on
//! the tree.
//!
//! The parser owns trivia handling (the scanner emits trivia as tokens),
//! mode switching between syntax and doc scanning, and the generic
//! delimited-list driver shared by every bracketed construct.

use adl_ast::node::*;
use adl_ast::syntax_kind::SyntaxKind;
use adl_ast::types::{ModifierFlags, NodeFlags, ParseOptions, TokenFlags};
use adl_core::arena::CompilerArena;
use adl_core::text::{SourceFile, TextPos, TextRange};
use adl_diagnostics::{
    messages, Diagnostic, DiagnosticCategory, DiagnosticCollection, DiagnosticMessage,
};
use adl_scanner::Scanner;

use crate::precedence::{get_binary_operator_precedence, OperatorPrecedence};

/// Which token stream the parser is currently consuming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseMode {
    Syntax,
    Doc,
}

/// A doc comment seen in the token stream, waiting to be attached to the
/// next statement (or to the script root at end of file).
struct DocRange {
    range: TextRange,
    unterminated: bool,
}

/// The annotations parsed ahead of a list item, plus the item's start
/// position (which includes them).
struct Prelude<'a> {
    pos: TextPos,
    docs: NodeList<'a, Doc<'a>>,
    directives: NodeList<'a, DirectiveExpression<'a>>,
    decorators: NodeList<'a, DecoratorExpression<'a>>,
}

/// Parameters of one delimited-list grammar position.
struct ListKind {
    open: SyntaxKind,
    close: SyntaxKind,
    delimiter: SyntaxKind,
    tolerated_delimiter: SyntaxKind,
    allow_empty: bool,
    tolerated_delimiter_is_valid: bool,
    trailing_delimiter_is_valid: bool,
    /// When set, doc/decorator/directive preludes are parsed but reported
    /// as misplaced on this target.
    invalid_annotation_target: Option<&'static str>,
    /// A statement keyword that does not trigger end-of-list recovery.
    allowed_statement_keyword: SyntaxKind,
}

impl ListKind {
    const MODEL_PROPERTIES: ListKind = ListKind {
        open: SyntaxKind::OpenBrace,
        close: SyntaxKind::CloseBrace,
        delimiter: SyntaxKind::Semicolon,
        tolerated_delimiter: SyntaxKind::Comma,
        allow_empty: true,
        tolerated_delimiter_is_valid: true,
        trailing_delimiter_is_valid: true,
        invalid_annotation_target: None,
        allowed_statement_keyword: SyntaxKind::None,
    };
    const OPERATION_PARAMETERS: ListKind = ListKind {
        open: SyntaxKind::OpenParen,
        close: SyntaxKind::CloseParen,
        delimiter: SyntaxKind::Comma,
        tolerated_delimiter: SyntaxKind::Semicolon,
        allow_empty: true,
        tolerated_delimiter_is_valid: false,
        trailing_delimiter_is_valid: true,
        invalid_annotation_target: None,
        allowed_statement_keyword: SyntaxKind::None,
    };
    const DECORATOR_ARGUMENTS: ListKind = ListKind {
        invalid_annotation_target: Some("expression"),
        ..ListKind::OPERATION_PARAMETERS
    };
    const INTERFACE_MEMBERS: ListKind = ListKind {
        open: SyntaxKind::OpenBrace,
        close: SyntaxKind::CloseBrace,
        delimiter: SyntaxKind::Semicolon,
        tolerated_delimiter: SyntaxKind::Comma,
        allow_empty: true,
        tolerated_delimiter_is_valid: false,
        trailing_delimiter_is_valid: true,
        invalid_annotation_target: None,
        allowed_statement_keyword: SyntaxKind::OpKeyword,
    };
    const UNION_VARIANTS: ListKind = ListKind {
        ..ListKind::MODEL_PROPERTIES
    };
    const ENUM_MEMBERS: ListKind = ListKind {
        ..ListKind::MODEL_PROPERTIES
    };
    const TEMPLATE_PARAMETERS: ListKind = ListKind {
        open: SyntaxKind::LessThan,
        close: SyntaxKind::GreaterThan,
        delimiter: SyntaxKind::Comma,
        tolerated_delimiter: SyntaxKind::None,
        allow_empty: false,
        tolerated_delimiter_is_valid: false,
        trailing_delimiter_is_valid: false,
        invalid_annotation_target: Some("template parameter"),
        allowed_statement_keyword: SyntaxKind::None,
    };
    const TEMPLATE_ARGUMENTS: ListKind = ListKind {
        invalid_annotation_target: Some("template argument"),
        ..ListKind::TEMPLATE_PARAMETERS
    };
    const CALL_ARGUMENTS: ListKind = ListKind {
        open: SyntaxKind::OpenParen,
        close: SyntaxKind::CloseParen,
        delimiter: SyntaxKind::Comma,
        tolerated_delimiter: SyntaxKind::None,
        allow_empty: true,
        tolerated_delimiter_is_valid: false,
        trailing_delimiter_is_valid: true,
        invalid_annotation_target: Some("expression"),
        allowed_statement_keyword: SyntaxKind::None,
    };
    const TUPLE: ListKind = ListKind {
        open: SyntaxKind::OpenBracket,
        close: SyntaxKind::CloseBracket,
        ..ListKind::CALL_ARGUMENTS
    };
    const HERITAGE: ListKind = ListKind {
        open: SyntaxKind::None,
        close: SyntaxKind::None,
        delimiter: SyntaxKind::Comma,
        tolerated_delimiter: SyntaxKind::None,
        allow_empty: false,
        tolerated_delimiter_is_valid: false,
        trailing_delimiter_is_valid: false,
        invalid_annotation_target: Some("heritage"),
        allowed_statement_keyword: SyntaxKind::None,
    };
    const FUNCTION_PARAMETERS: ListKind = ListKind {
        invalid_annotation_target: Some("function parameter"),
        ..ListKind::CALL_ARGUMENTS
    };
    const PROJECTION_EXPRESSIONS: ListKind = ListKind {
        trailing_delimiter_is_valid: false,
        ..ListKind::CALL_ARGUMENTS
    };
    const PROJECTION_PARAMETERS: ListKind = ListKind {
        invalid_annotation_target: Some("projection parameter"),
        ..ListKind::PROJECTION_EXPRESSIONS
    };
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse source text into a script node. The returned tree borrows only
/// the arena; diagnostics and the source file ride along on the root.
pub fn parse<'a>(arena: &'a CompilerArena, code: &str, options: ParseOptions) -> AdlScript<'a> {
    Parser::new(arena, SourceFile::new("<anonymous>", code), options).parse_script()
}

/// Parse a single reference expression (`Foo.Bar<Baz>`). Anything left
/// before end of file is reported as an unexpected token.
pub fn parse_standalone_type_reference<'a>(
    arena: &'a CompilerArena,
    code: &str,
) -> (TypeReferenceNode<'a>, Vec<Diagnostic>) {
    let mut parser = Parser::new(
        arena,
        SourceFile::new("<anonymous>", code),
        ParseOptions::default(),
    );
    parser.next_token();
    let reference = parser.parse_reference();
    if parser.token() != SyntaxKind::EndOfFile {
        let text = format!("'{}'", parser.token_raw_text());
        parser.report(&messages::TOKEN_EXPECTED_UNEXPECTED, &[&text]);
    }
    let diagnostics = parser.take_diagnostics();
    (reference, diagnostics)
}

/// The parser produces an [`AdlScript`] from ADL source text.
pub struct Parser<'a> {
    arena: &'a CompilerArena,
    scanner: Scanner,
    file: SourceFile,
    options: ParseOptions,
    parse_diagnostics: DiagnosticCollection,
    /// End of the last consumed significant token. Node ranges close here,
    /// and missing-punctuation squiggles sit just past it.
    previous_token_end: TextPos,
    /// Scanner position of the last reported error, for same-position
    /// suppression of recovery cascades.
    real_position_of_last_error: Option<TextPos>,
    missing_identifier_counter: u32,
    /// Highest position a zero-width synthetic node was created at.
    /// `finish` folds this into enclosing ranges so a synthetic child
    /// sitting past the last consumed token (across trivia) cannot escape
    /// its parent's range.
    synthetic_high_water: TextPos,
    tree_printable: bool,
    /// Newlines are trivia except while parsing directive arguments.
    new_line_is_trivia: bool,
    current_mode: ParseMode,
    /// Armed by error reporting; the next finished node takes the
    /// `THIS_NODE_HAS_ERROR` flag.
    parse_error_in_next_finished_node: bool,
    doc_ranges: Vec<DocRange>,
    comments: Vec<Comment>,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a CompilerArena, file: SourceFile, options: ParseOptions) -> Self {
        let scanner = Scanner::new(&file.text);
        Self {
            arena,
            scanner,
            file,
            options,
            parse_diagnostics: DiagnosticCollection::new(),
            previous_token_end: 0,
            real_position_of_last_error: None,
            missing_identifier_counter: 0,
            synthetic_high_water: 0,
            tree_printable: true,
            new_line_is_trivia: true,
            current_mode: ParseMode::Syntax,
            parse_error_in_next_finished_node: false,
            doc_ranges: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Parse the whole file into a script node.
    pub fn parse_script(mut self) -> AdlScript<'a> {
        self.next_token();
        let statements = self.parse_statement_list(true);
        let statements = self.arena.alloc_vec(statements);
        // Doc comments not followed by a statement attach to the root.
        let (_, docs) = self.parse_doc_list();
        let end = self.scanner.text_len() as TextPos;
        let id = IdentifierNode {
            data: NodeData::with_flags(SyntaxKind::Identifier, 0, 0, NodeFlags::SYNTHETIC),
            sv: self.arena.alloc_str(&self.file.path),
        };
        let comments = self.arena.alloc_vec(std::mem::take(&mut self.comments));
        let parse_diagnostics = self.take_diagnostics();
        AdlScript {
            data: NodeData::new(SyntaxKind::AdlScript, 0, end),
            id,
            statements,
            comments,
            docs,
            parse_diagnostics,
            printable: self.tree_printable,
            parse_options: self.options,
            file: self.file,
        }
    }

    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        let mut diagnostics = std::mem::take(&mut self.parse_diagnostics);
        let scanner_diags = self.scanner.take_diagnostics();
        if scanner_diags.has_errors() {
            self.tree_printable = false;
        }
        for mut diag in scanner_diags.into_diagnostics() {
            diag.file = Some(self.file.path.clone());
            diagnostics.add(diag);
        }
        diagnostics.sort();
        diagnostics.into_diagnostics()
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    fn token_pos(&self) -> TextPos {
        self.scanner.token_position()
    }

    #[inline]
    fn token_end(&self) -> TextPos {
        self.scanner.position()
    }

    fn token_raw_text(&self) -> String {
        self.scanner.token_text()
    }

    /// Advance one token in the current mode. In syntax mode trivia is
    /// skipped here: comments are collected, doc comments recorded for the
    /// next statement, and newlines returned only while significant.
    fn next_token(&mut self) {
        self.previous_token_end = self.scanner.position();
        match self.current_mode {
            ParseMode::Syntax => self.next_syntax_token(),
            ParseMode::Doc => {
                self.scanner.scan_doc();
            }
        }
    }

    fn next_syntax_token(&mut self) {
        loop {
            let kind = self.scanner.scan();
            match kind {
                SyntaxKind::Whitespace => {}
                SyntaxKind::NewLine => {
                    if !self.new_line_is_trivia {
                        return;
                    }
                }
                SyntaxKind::SingleLineComment | SyntaxKind::MultiLineComment => {
                    if self.options.comments {
                        self.comments.push(Comment {
                            kind,
                            range: self.scanner.token_range(),
                        });
                    }
                    if kind == SyntaxKind::MultiLineComment
                        && self.options.docs
                        && self.scanner.token_flags().contains(TokenFlags::DOC_COMMENT)
                    {
                        self.doc_ranges.push(DocRange {
                            range: self.scanner.token_range(),
                            unterminated: self
                                .scanner
                                .token_flags()
                                .contains(TokenFlags::UNTERMINATED),
                        });
                    }
                }
                _ => return,
            }
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) {
        if self.token() == kind {
            self.next_token();
        } else {
            self.report_expected_token(kind);
        }
    }

    /// Run `f` with the scanner retargeted at `range` in the given mode,
    /// restoring scanner cursor, mode, and token bookkeeping on exit.
    fn parse_range<T>(
        &mut self,
        mode: ParseMode,
        range: TextRange,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let scope = self.scanner.enter_range(range);
        let saved_mode = std::mem::replace(&mut self.current_mode, mode);
        let saved_prev_end = self.previous_token_end;
        self.previous_token_end = range.pos;
        self.next_token();
        let result = f(self);
        self.current_mode = saved_mode;
        self.previous_token_end = saved_prev_end;
        self.scanner.exit_range(scope);
        result
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Report a diagnostic at the current token.
    fn report(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        self.report_with(message, args, self.scanner.token_range(), self.token_pos());
    }

    /// Report a diagnostic at an explicit range.
    fn report_at(&mut self, range: TextRange, message: &DiagnosticMessage, args: &[&str]) {
        self.report_with(message, args, range, range.pos);
    }

    /// Report a missing token. The squiggle is a single code unit right
    /// after the previous token's end so recovery doesn't paint long
    /// ranges of perfectly fine source.
    fn report_expected_token(&mut self, kind: SyntaxKind) {
        let pos = self.previous_token_end;
        let end = (pos + 1).min(self.scanner.text_len() as TextPos).max(pos);
        let text = format!("'{}'", kind.text_for_error());
        self.report_with(
            &messages::TOKEN_EXPECTED,
            &[&text],
            TextRange::new(pos, end),
            self.token_pos(),
        );
    }

    fn report_with(
        &mut self,
        message: &DiagnosticMessage,
        args: &[&str],
        range: TextRange,
        real_pos: TextPos,
    ) {
        if message.category == DiagnosticCategory::Error {
            self.parse_error_in_next_finished_node = true;
            if !message.printable {
                self.tree_printable = false;
            }
            // Error-recovery cascades report repeatedly from the same
            // position; keep the first diagnostic and drop the rest.
            if self.real_position_of_last_error == Some(real_pos) {
                return;
            }
            self.real_position_of_last_error = Some(real_pos);
        }
        self.parse_diagnostics.add(Diagnostic::with_location(
            self.file.path.clone(),
            range.to_span(),
            message,
            args,
        ));
    }

    fn report_invalid_decorators(
        &mut self,
        decorators: NodeList<'a, DecoratorExpression<'a>>,
        target: &str,
    ) {
        for decorator in decorators {
            self.report_at(
                decorator.data.range,
                &messages::INVALID_DECORATOR_LOCATION,
                &[target],
            );
        }
    }

    fn report_invalid_directives(
        &mut self,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        target: &str,
    ) {
        for directive in directives {
            self.report_at(
                directive.data.range,
                &messages::INVALID_DIRECTIVE_LOCATION,
                &[target],
            );
        }
    }

    /// Make the node data for a node starting at `pos` and ending at the
    /// last consumed token, taking any pending error flag.
    fn finish(&mut self, kind: SyntaxKind, pos: TextPos) -> NodeData {
        let mut end = self.previous_token_end.max(pos);
        if self.synthetic_high_water >= pos {
            end = end.max(self.synthetic_high_water);
        }
        let data = NodeData::new(kind, pos, end);
        if self.parse_error_in_next_finished_node {
            data.add_flags(NodeFlags::THIS_NODE_HAS_ERROR);
            self.parse_error_in_next_finished_node = false;
        }
        data
    }

    // ========================================================================
    // Identifiers & literals
    // ========================================================================

    fn identifier_from_token(&mut self) -> IdentifierNode<'a> {
        IdentifierNode {
            data: NodeData::new(SyntaxKind::Identifier, self.token_pos(), self.token_end()),
            sv: self.arena.alloc_str(self.scanner.token_value()),
        }
    }

    /// Synthesize a unique missing identifier at the current position.
    /// Does not advance; callers' progress guards own forward movement.
    fn create_missing_identifier(&mut self) -> IdentifierNode<'a> {
        self.missing_identifier_counter += 1;
        let pos = self.token_pos();
        self.synthetic_high_water = self.synthetic_high_water.max(pos);
        let data = NodeData::with_flags(SyntaxKind::Identifier, pos, pos, NodeFlags::SYNTHETIC);
        if self.parse_error_in_next_finished_node {
            data.add_flags(NodeFlags::THIS_NODE_HAS_ERROR);
            self.parse_error_in_next_finished_node = false;
        }
        let sv = self
            .arena
            .alloc_str(&format!("<missing identifier>{}", self.missing_identifier_counter));
        IdentifierNode { data, sv }
    }

    fn parse_identifier(&mut self) -> IdentifierNode<'a> {
        match self.token() {
            SyntaxKind::Identifier => {
                let id = self.identifier_from_token();
                self.next_token();
                id
            }
            kind if kind.is_keyword() => {
                // Recover using the keyword's text as the name.
                self.report(&messages::RESERVED_IDENTIFIER, &[]);
                let id = self.identifier_from_token();
                self.next_token();
                id
            }
            _ => {
                self.report(&messages::TOKEN_EXPECTED_IDENTIFIER, &[]);
                self.create_missing_identifier()
            }
        }
    }

    /// Identifiers after `.` never recover from keywords, so
    /// `@Outer.model M {}` parses as an incomplete decorator followed by a
    /// model statement rather than swallowing the keyword.
    fn parse_member_expression_identifier(&mut self) -> IdentifierNode<'a> {
        if self.token() == SyntaxKind::Identifier {
            let id = self.identifier_from_token();
            self.next_token();
            id
        } else {
            self.report(&messages::TOKEN_EXPECTED_IDENTIFIER, &[]);
            self.create_missing_identifier()
        }
    }

    fn parse_string_literal_node(&mut self) -> StringLiteralNode<'a> {
        let data = NodeData::new(SyntaxKind::StringLiteral, self.token_pos(), self.token_end());
        let value = self.arena.alloc_str(self.scanner.token_value());
        self.next_token();
        StringLiteralNode { data, value }
    }

    fn parse_numeric_literal_node(&mut self) -> NumericLiteralNode<'a> {
        let data = NodeData::new(SyntaxKind::NumericLiteral, self.token_pos(), self.token_end());
        let value_as_str = self.arena.alloc_str(self.scanner.token_value());
        let value = numeric_value(value_as_str);
        self.next_token();
        NumericLiteralNode {
            data,
            value,
            value_as_str,
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Parse statements at the top level (`at_top_level`) or inside a
    /// namespace block. Ordering rules (imports first, single blockless
    /// namespace) are enforced here as diagnostics, never as parse stops.
    fn parse_statement_list(&mut self, at_top_level: bool) -> Vec<Statement<'a>> {
        let mut statements = Vec::new();
        let mut seen_blockless_namespace = false;
        let mut seen_declaration = false;
        let mut seen_using = false;
        loop {
            match self.token() {
                SyntaxKind::EndOfFile => break,
                SyntaxKind::CloseBrace if !at_top_level => break,
                _ => {}
            }
            let (doc_pos, docs) = self.parse_doc_list();
            let pos = doc_pos.min(self.token_pos());
            let directives = self.parse_directive_list();
            let decorators = self.parse_decorator_list();
            let statement = match self.token() {
                SyntaxKind::AtAt => {
                    self.report_invalid_decorators(decorators, "augment decorator statement");
                    self.parse_augment_decorator_statement(pos, directives, docs)
                }
                SyntaxKind::ImportKeyword => {
                    self.report_invalid_decorators(decorators, "import statement");
                    let range = self.scanner.token_range();
                    if !at_top_level {
                        self.report_at(range, &messages::IMPORT_FIRST_TOP_LEVEL, &[]);
                    } else if seen_blockless_namespace || seen_declaration || seen_using {
                        self.report_at(range, &messages::IMPORT_FIRST, &[]);
                    }
                    self.parse_import_statement(pos, directives, docs)
                }
                SyntaxKind::ModelKeyword => {
                    seen_declaration = true;
                    self.parse_model_statement(pos, decorators, directives, docs)
                }
                SyntaxKind::ScalarKeyword => {
                    seen_declaration = true;
                    self.parse_scalar_statement(pos, decorators, directives, docs)
                }
                SyntaxKind::NamespaceKeyword => {
                    let range = self.scanner.token_range();
                    let statement =
                        self.parse_namespace_statement(pos, decorators, directives, docs);
                    let blockless = matches!(
                        &statement,
                        Statement::NamespaceStatement(ns) if ns.is_blockless()
                    );
                    if blockless {
                        if !at_top_level {
                            self.report_at(
                                range,
                                &messages::BLOCKLESS_NAMESPACE_FIRST_TOP_LEVEL,
                                &[],
                            );
                        } else if seen_blockless_namespace {
                            self.report_at(range, &messages::MULTIPLE_BLOCKLESS_NAMESPACE, &[]);
                        } else if seen_declaration || seen_using {
                            self.report_at(range, &messages::BLOCKLESS_NAMESPACE_FIRST, &[]);
                        }
                        seen_blockless_namespace = true;
                    } else {
                        seen_declaration = true;
                    }
                    statement
                }
                SyntaxKind::InterfaceKeyword => {
                    seen_declaration = true;
                    self.parse_interface_statement(pos, decorators, directives, docs)
                }
                SyntaxKind::UnionKeyword => {
                    seen_declaration = true;
                    self.parse_union_statement(pos, decorators, directives, docs)
                }
                SyntaxKind::OpKeyword => {
                    seen_declaration = true;
                    self.next_token();
                    let operation =
                        self.parse_operation_common(pos, decorators, directives, docs, true);
                    Statement::OperationStatement(operation)
                }
                SyntaxKind::EnumKeyword => {
                    seen_declaration = true;
                    self.parse_enum_statement(pos, decorators, directives, docs)
                }
                SyntaxKind::AliasKeyword => {
                    self.report_invalid_decorators(decorators, "alias statement");
                    seen_declaration = true;
                    self.parse_alias_statement(pos, directives, docs)
                }
                SyntaxKind::UsingKeyword => {
                    self.report_invalid_decorators(decorators, "using statement");
                    seen_using = true;
                    self.parse_using_statement(pos, directives, docs)
                }
                SyntaxKind::ProjectionKeyword => {
                    self.report_invalid_decorators(decorators, "projection statement");
                    seen_declaration = true;
                    self.parse_projection_statement(pos, directives, docs)
                }
                SyntaxKind::ExternKeyword | SyntaxKind::DecKeyword | SyntaxKind::FnKeyword => {
                    self.report_invalid_decorators(decorators, "declaration");
                    seen_declaration = true;
                    self.parse_declaration_with_modifiers(pos, directives, docs)
                }
                SyntaxKind::Semicolon => {
                    self.report_invalid_decorators(decorators, "empty statement");
                    let data = NodeData::new(
                        SyntaxKind::EmptyStatement,
                        self.token_pos(),
                        self.token_end(),
                    );
                    self.next_token();
                    Statement::EmptyStatement(EmptyStatement { data })
                }
                _ => self.parse_invalid_statement(pos, decorators),
            };
            statements.push(statement);
        }
        statements
    }

    /// A run of tokens that can't start a statement: consume through the
    /// next statement keyword, `@`, `;`, or end of file and report one
    /// diagnostic for the whole span.
    fn parse_invalid_statement(
        &mut self,
        pos: TextPos,
        decorators: NodeList<'a, DecoratorExpression<'a>>,
    ) -> Statement<'a> {
        loop {
            self.next_token();
            match self.token() {
                SyntaxKind::EndOfFile
                | SyntaxKind::At
                | SyntaxKind::AtAt
                | SyntaxKind::Semicolon => break,
                kind if kind.is_statement_keyword() => break,
                _ => {}
            }
        }
        let range = TextRange::new(pos, self.previous_token_end.max(pos));
        self.report_at(range, &messages::TOKEN_EXPECTED_STATEMENT, &[]);
        Statement::InvalidStatement(InvalidStatement {
            data: self.finish(SyntaxKind::InvalidStatement, pos),
            decorators,
        })
    }

    fn parse_import_statement(
        &mut self,
        pos: TextPos,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let path = if self.token() == SyntaxKind::StringLiteral {
            self.parse_string_literal_node()
        } else {
            self.report(&messages::TOKEN_EXPECTED, &["string literal"]);
            let here = self.token_pos();
            self.synthetic_high_water = self.synthetic_high_water.max(here);
            StringLiteralNode {
                data: NodeData::with_flags(
                    SyntaxKind::StringLiteral,
                    here,
                    here,
                    NodeFlags::SYNTHETIC,
                ),
                value: "",
            }
        };
        self.expect(SyntaxKind::Semicolon);
        Statement::ImportStatement(ImportStatement {
            data: self.finish(SyntaxKind::ImportStatement, pos),
            path,
            directives,
            docs,
        })
    }

    fn parse_model_statement(
        &mut self,
        pos: TextPos,
        decorators: NodeList<'a, DecoratorExpression<'a>>,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let id = self.parse_identifier();
        let template_parameters = self.parse_optional_template_parameters();
        // `extends` and `is` are mutually exclusive.
        let mut extends = None;
        let mut is = None;
        if self.eat(SyntaxKind::ExtendsKeyword) {
            extends = Some(self.parse_expression_alloc());
        } else if self.eat(SyntaxKind::IsKeyword) {
            is = Some(self.parse_expression_alloc());
        }
        // With `is` the body may be replaced by a semicolon.
        let properties = if is.is_some() && self.token() != SyntaxKind::OpenBrace {
            self.expect(SyntaxKind::Semicolon);
            &[][..]
        } else {
            let props =
                self.parse_list(&ListKind::MODEL_PROPERTIES, Self::parse_model_property_or_spread);
            self.arena.alloc_vec(props)
        };
        Statement::ModelStatement(ModelStatement {
            data: self.finish(SyntaxKind::ModelStatement, pos),
            id,
            template_parameters,
            extends,
            is,
            properties,
            decorators,
            directives,
            docs,
        })
    }

    fn parse_model_property_or_spread(
        &mut self,
        prelude: Prelude<'a>,
    ) -> ModelPropertyOrSpread<'a> {
        if self.token() == SyntaxKind::Ellipsis {
            self.report_invalid_decorators(prelude.decorators, "spread property");
            self.next_token();
            let target = self.parse_reference();
            ModelPropertyOrSpread::ModelSpreadProperty(ModelSpreadProperty {
                data: self.finish(SyntaxKind::ModelSpreadProperty, prelude.pos),
                target,
            })
        } else {
            ModelPropertyOrSpread::ModelProperty(self.parse_model_property(prelude))
        }
    }

    fn parse_model_property(&mut self, prelude: Prelude<'a>) -> ModelProperty<'a> {
        let id = self.parse_property_name();
        let optional = self.eat(SyntaxKind::Question);
        self.expect(SyntaxKind::Colon);
        let value = self.parse_expression_alloc();
        let default = if self.eat(SyntaxKind::Equals) {
            let expr = self.parse_expression_alloc();
            if !optional {
                self.report_at(expr.data().range, &messages::DEFAULT_OPTIONAL, &[]);
            }
            Some(expr)
        } else {
            None
        };
        ModelProperty {
            data: self.finish(SyntaxKind::ModelProperty, prelude.pos),
            id,
            value,
            optional,
            default,
            decorators: prelude.decorators,
            directives: prelude.directives,
            docs: prelude.docs,
        }
    }

    fn parse_property_name(&mut self) -> PropertyName<'a> {
        match self.token() {
            SyntaxKind::StringLiteral => PropertyName::StringLiteral(self.parse_string_literal_node()),
            SyntaxKind::Identifier => PropertyName::Identifier(self.parse_identifier()),
            kind if kind.is_keyword() => PropertyName::Identifier(self.parse_identifier()),
            _ => {
                self.report(&messages::TOKEN_EXPECTED_PROPERTY, &[]);
                PropertyName::Identifier(self.create_missing_identifier())
            }
        }
    }

    fn parse_scalar_statement(
        &mut self,
        pos: TextPos,
        decorators: NodeList<'a, DecoratorExpression<'a>>,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let id = self.parse_identifier();
        let template_parameters = self.parse_optional_template_parameters();
        let extends = if self.eat(SyntaxKind::ExtendsKeyword) {
            Some(self.parse_reference())
        } else {
            None
        };
        self.expect(SyntaxKind::Semicolon);
        Statement::ScalarStatement(ScalarStatement {
            data: self.finish(SyntaxKind::ScalarStatement, pos),
            id,
            template_parameters,
            extends,
            decorators,
            directives,
            docs,
        })
    }

    fn parse_namespace_statement(
        &mut self,
        pos: TextPos,
        decorators: NodeList<'a, DecoratorExpression<'a>>,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let mut segments = vec![self.parse_identifier()];
        while self.eat(SyntaxKind::Dot) {
            segments.push(self.parse_identifier());
        }
        let body = if self.eat(SyntaxKind::Semicolon) {
            None
        } else {
            self.expect(SyntaxKind::OpenBrace);
            let statements = self.parse_statement_list(false);
            self.expect(SyntaxKind::CloseBrace);
            Some(self.arena.alloc_vec(statements))
        };
        // A dotted name nests one namespace node per segment, innermost
        // first; every node shares the statement's source range and the
        // innermost one carries the annotations and the body.
        let data = self.finish(SyntaxKind::NamespaceStatement, pos);
        let innermost_id = segments.pop().unwrap();
        let mut namespace = NamespaceStatement {
            data: data.clone(),
            id: innermost_id,
            statements: body.map(NamespaceBody::Statements),
            decorators,
            directives,
            docs,
        };
        while let Some(id) = segments.pop() {
            let inner = self.arena.alloc(namespace);
            namespace = NamespaceStatement {
                data: data.clone(),
                id,
                statements: Some(NamespaceBody::Namespace(inner)),
                decorators: &[],
                directives: &[],
                docs: &[],
            };
        }
        Statement::NamespaceStatement(namespace)
    }

    fn parse_interface_statement(
        &mut self,
        pos: TextPos,
        decorators: NodeList<'a, DecoratorExpression<'a>>,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let id = self.parse_identifier();
        let template_parameters = self.parse_optional_template_parameters();
        let extends = if self.eat(SyntaxKind::ExtendsKeyword) {
            let heritage = self.parse_list(&ListKind::HERITAGE, |p, _| p.parse_reference());
            self.arena.alloc_vec(heritage)
        } else {
            &[][..]
        };
        let operations =
            self.parse_list(&ListKind::INTERFACE_MEMBERS, Self::parse_interface_member);
        let operations = self.arena.alloc_vec(operations);
        Statement::InterfaceStatement(InterfaceStatement {
            data: self.finish(SyntaxKind::InterfaceStatement, pos),
            id,
            template_parameters,
            extends,
            operations,
            decorators,
            directives,
            docs,
        })
    }

    fn parse_interface_member(&mut self, prelude: Prelude<'a>) -> OperationStatement<'a> {
        // The `op` keyword is optional inside interfaces.
        self.eat(SyntaxKind::OpKeyword);
        self.parse_operation_common(
            prelude.pos,
            prelude.decorators,
            prelude.directives,
            prelude.docs,
            false,
        )
    }

    fn parse_operation_common(
        &mut self,
        pos: TextPos,
        decorators: NodeList<'a, DecoratorExpression<'a>>,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
        standalone: bool,
    ) -> OperationStatement<'a> {
        let id = self.parse_identifier();
        let template_parameters = self.parse_optional_template_parameters();
        // The signature is either a parameter list with a return type or a
        // reference to another operation via `is`.
        let signature = if self.token() == SyntaxKind::IsKeyword {
            let sig_pos = self.token_pos();
            self.next_token();
            let base_operation = self.parse_reference();
            OperationSignature::Reference(OperationSignatureReference {
                data: self.finish(SyntaxKind::OperationSignatureReference, sig_pos),
                base_operation,
            })
        } else {
            let sig_pos = self.token_pos();
            let props = self.parse_list(
                &ListKind::OPERATION_PARAMETERS,
                Self::parse_model_property_or_spread,
            );
            let properties = self.arena.alloc_vec(props);
            let parameters = ModelExpression {
                data: self.finish(SyntaxKind::ModelExpression, sig_pos),
                properties,
            };
            self.expect(SyntaxKind::Colon);
            let return_type = self.parse_expression_alloc();
            OperationSignature::Declaration(OperationSignatureDeclaration {
                data: self.finish(SyntaxKind::OperationSignatureDeclaration, sig_pos),
                parameters,
                return_type,
            })
        };
        if standalone {
            self.expect(SyntaxKind::Semicolon);
        }
        OperationStatement {
            data: self.finish(SyntaxKind::OperationStatement, pos),
            id,
            template_parameters,
            signature,
            decorators,
            directives,
            docs,
        }
    }

    fn parse_union_statement(
        &mut self,
        pos: TextPos,
        decorators: NodeList<'a, DecoratorExpression<'a>>,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let id = self.parse_identifier();
        let template_parameters = self.parse_optional_template_parameters();
        let options = self.parse_list(&ListKind::UNION_VARIANTS, Self::parse_union_variant);
        let options = self.arena.alloc_vec(options);
        Statement::UnionStatement(UnionStatement {
            data: self.finish(SyntaxKind::UnionStatement, pos),
            id,
            template_parameters,
            options,
            decorators,
            directives,
            docs,
        })
    }

    fn parse_union_variant(&mut self, prelude: Prelude<'a>) -> UnionVariant<'a> {
        // A variant is `name: value` or a bare value; only after parsing
        // can we tell which, so a leading expression that turns out to sit
        // before `:` is reinterpreted as the name.
        let first = self.parse_expression();
        let (id, value) = if self.eat(SyntaxKind::Colon) {
            let id = match &first {
                Expression::StringLiteral(lit) => PropertyName::StringLiteral(lit.clone()),
                Expression::TypeReference(reference) if reference.arguments.is_empty() => {
                    match reference.target {
                        Expression::Identifier(identifier) => {
                            PropertyName::Identifier(identifier.clone())
                        }
                        _ => {
                            self.report_at(
                                first.data().range,
                                &messages::TOKEN_EXPECTED_IDENTIFIER,
                                &[],
                            );
                            PropertyName::Identifier(self.create_missing_identifier())
                        }
                    }
                }
                _ => {
                    self.report_at(first.data().range, &messages::TOKEN_EXPECTED_IDENTIFIER, &[]);
                    PropertyName::Identifier(self.create_missing_identifier())
                }
            };
            (Some(id), self.parse_expression_alloc())
        } else {
            (None, &*self.arena.alloc(first))
        };
        UnionVariant {
            data: self.finish(SyntaxKind::UnionVariant, prelude.pos),
            id,
            value,
            decorators: prelude.decorators,
            directives: prelude.directives,
            docs: prelude.docs,
        }
    }

    fn parse_enum_statement(
        &mut self,
        pos: TextPos,
        decorators: NodeList<'a, DecoratorExpression<'a>>,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let id = self.parse_identifier();
        let members = self.parse_list(&ListKind::ENUM_MEMBERS, Self::parse_enum_member_or_spread);
        let members = self.arena.alloc_vec(members);
        Statement::EnumStatement(EnumStatement {
            data: self.finish(SyntaxKind::EnumStatement, pos),
            id,
            members,
            decorators,
            directives,
            docs,
        })
    }

    fn parse_enum_member_or_spread(&mut self, prelude: Prelude<'a>) -> EnumMemberOrSpread<'a> {
        if self.token() == SyntaxKind::Ellipsis {
            self.report_invalid_decorators(prelude.decorators, "spread member");
            self.next_token();
            let target = self.parse_reference();
            return EnumMemberOrSpread::EnumSpreadMember(EnumSpreadMember {
                data: self.finish(SyntaxKind::EnumSpreadMember, prelude.pos),
                target,
            });
        }
        let id = self.parse_property_name();
        let value = if self.eat(SyntaxKind::Colon) {
            // Member values are restricted to string and numeric literals.
            if !matches!(
                self.token(),
                SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral
            ) {
                self.report(&messages::TOKEN_EXPECTED, &["string or numeric literal"]);
            }
            Some(self.parse_expression_alloc())
        } else {
            None
        };
        EnumMemberOrSpread::EnumMember(EnumMember {
            data: self.finish(SyntaxKind::EnumMember, prelude.pos),
            id,
            value,
            decorators: prelude.decorators,
            directives: prelude.directives,
            docs: prelude.docs,
        })
    }

    fn parse_alias_statement(
        &mut self,
        pos: TextPos,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let id = self.parse_identifier();
        let template_parameters = self.parse_optional_template_parameters();
        self.expect(SyntaxKind::Equals);
        let value = self.parse_expression_alloc();
        self.expect(SyntaxKind::Semicolon);
        Statement::AliasStatement(AliasStatement {
            data: self.finish(SyntaxKind::AliasStatement, pos),
            id,
            template_parameters,
            value,
            directives,
            docs,
        })
    }

    fn parse_using_statement(
        &mut self,
        pos: TextPos,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let name = self.parse_identifier_or_member_expression_alloc();
        self.expect(SyntaxKind::Semicolon);
        Statement::UsingStatement(UsingStatement {
            data: self.finish(SyntaxKind::UsingStatement, pos),
            name,
            directives,
            docs,
        })
    }

    fn parse_augment_decorator_statement(
        &mut self,
        pos: TextPos,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let target = self.parse_identifier_or_member_expression_alloc();
        let mut args = if self.token() == SyntaxKind::OpenParen {
            self.parse_list(&ListKind::DECORATOR_ARGUMENTS, |p, _| p.parse_expression())
        } else {
            self.report_expected_token(SyntaxKind::OpenParen);
            Vec::new()
        };
        // The first argument names the type being augmented and must be a
        // reference; recover with a synthetic one otherwise.
        let target_type = if args.is_empty() {
            self.report(&messages::AUGMENT_DECORATOR_TARGET, &[]);
            self.create_missing_type_reference()
        } else {
            match args.remove(0) {
                Expression::TypeReference(reference) => reference,
                other => {
                    self.report_at(other.data().range, &messages::AUGMENT_DECORATOR_TARGET, &[]);
                    let synthetic = self.create_missing_type_reference();
                    args.insert(0, other);
                    synthetic
                }
            }
        };
        self.expect(SyntaxKind::Semicolon);
        let arguments = self.arena.alloc_vec(args);
        Statement::AugmentDecoratorStatement(AugmentDecoratorStatement {
            data: self.finish(SyntaxKind::AugmentDecoratorStatement, pos),
            target,
            target_type,
            arguments,
            directives,
            docs,
        })
    }

    fn create_missing_type_reference(&mut self) -> TypeReferenceNode<'a> {
        let id = self.create_missing_identifier();
        let pos = id.data.pos();
        TypeReferenceNode {
            data: NodeData::with_flags(SyntaxKind::TypeReference, pos, pos, NodeFlags::SYNTHETIC),
            target: self.arena.alloc(Expression::Identifier(id)),
            arguments: &[],
        }
    }

    fn parse_declaration_with_modifiers(
        &mut self,
        pos: TextPos,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        let mut modifiers = Vec::new();
        let mut modifier_flags = ModifierFlags::NONE;
        while self.token() == SyntaxKind::ExternKeyword {
            modifiers.push(Modifier {
                data: NodeData::new(SyntaxKind::Modifier, self.token_pos(), self.token_end()),
            });
            modifier_flags |= ModifierFlags::EXTERN;
            self.next_token();
        }
        let modifiers = self.arena.alloc_vec(modifiers);
        match self.token() {
            SyntaxKind::DecKeyword => {
                self.parse_decorator_declaration(pos, modifiers, modifier_flags, directives, docs)
            }
            SyntaxKind::FnKeyword => {
                self.parse_function_declaration(pos, modifiers, modifier_flags, directives, docs)
            }
            _ => {
                self.report(&messages::TOKEN_EXPECTED, &["'dec' or 'fn'"]);
                self.parse_invalid_statement(pos, &[])
            }
        }
    }

    fn parse_decorator_declaration(
        &mut self,
        pos: TextPos,
        modifiers: NodeList<'a, Modifier>,
        modifier_flags: ModifierFlags,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let id = self.parse_identifier();
        let params = self.parse_list(&ListKind::FUNCTION_PARAMETERS, Self::parse_function_parameter);
        self.validate_function_parameters(&params);
        self.expect(SyntaxKind::Semicolon);
        let all = self.arena.alloc_vec(params);
        let (target, parameters) = match all.split_first() {
            Some((target, rest)) => (Some(target), rest),
            None => (None, all),
        };
        match target {
            None => self.report_at(id.data.range, &messages::DECORATOR_DECL_TARGET, &[]),
            Some(target) if target.optional => {
                self.report_at(target.data.range, &messages::DECORATOR_DECL_TARGET_REQUIRED, &[])
            }
            _ => {}
        }
        Statement::DecoratorDeclarationStatement(DecoratorDeclarationStatement {
            data: self.finish(SyntaxKind::DecoratorDeclarationStatement, pos),
            modifiers,
            modifier_flags,
            id,
            target,
            parameters,
            directives,
            docs,
        })
    }

    fn parse_function_declaration(
        &mut self,
        pos: TextPos,
        modifiers: NodeList<'a, Modifier>,
        modifier_flags: ModifierFlags,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let id = self.parse_identifier();
        let params = self.parse_list(&ListKind::FUNCTION_PARAMETERS, Self::parse_function_parameter);
        self.validate_function_parameters(&params);
        let parameters = self.arena.alloc_vec(params);
        let return_type = if self.eat(SyntaxKind::Colon) {
            Some(self.parse_expression_alloc())
        } else {
            None
        };
        self.expect(SyntaxKind::Semicolon);
        Statement::FunctionDeclarationStatement(FunctionDeclarationStatement {
            data: self.finish(SyntaxKind::FunctionDeclarationStatement, pos),
            modifiers,
            modifier_flags,
            id,
            parameters,
            return_type,
            directives,
            docs,
        })
    }

    fn parse_function_parameter(&mut self, prelude: Prelude<'a>) -> FunctionParameter<'a> {
        let rest = self.eat(SyntaxKind::Ellipsis);
        let id = self.parse_identifier();
        let optional = self.eat(SyntaxKind::Question);
        let type_annotation = if self.eat(SyntaxKind::Colon) {
            Some(self.parse_expression_alloc())
        } else {
            None
        };
        FunctionParameter {
            data: self.finish(SyntaxKind::FunctionParameter, prelude.pos),
            id,
            type_annotation,
            optional,
            rest,
        }
    }

    fn validate_function_parameters(&mut self, params: &[FunctionParameter<'a>]) {
        let mut seen_optional = false;
        for (index, param) in params.iter().enumerate() {
            if param.rest {
                if param.optional {
                    self.report_at(param.data.range, &messages::REST_PARAMETER_REQUIRED, &[]);
                }
                if index + 1 != params.len() {
                    self.report_at(param.data.range, &messages::REST_PARAMETER_LAST, &[]);
                }
            } else if param.optional {
                seen_optional = true;
            } else if seen_optional {
                self.report_at(param.data.range, &messages::REQUIRED_PARAMETER_FIRST, &[]);
            }
        }
    }

    // ========================================================================
    // Templates
    // ========================================================================

    fn parse_optional_template_parameters(
        &mut self,
    ) -> NodeList<'a, TemplateParameterDeclaration<'a>> {
        if self.token() != SyntaxKind::LessThan {
            return &[];
        }
        let params = self.parse_list(&ListKind::TEMPLATE_PARAMETERS, Self::parse_template_parameter);
        let params = self.arena.alloc_vec(params);
        let mut seen_default = false;
        for param in params {
            if param.default.is_some() {
                seen_default = true;
            } else if seen_default {
                self.report_at(param.data.range, &messages::DEFAULT_REQUIRED, &[]);
            }
        }
        params
    }

    fn parse_template_parameter(
        &mut self,
        prelude: Prelude<'a>,
    ) -> TemplateParameterDeclaration<'a> {
        let id = self.parse_identifier();
        let constraint = if self.eat(SyntaxKind::ExtendsKeyword) {
            Some(self.parse_expression_alloc())
        } else {
            None
        };
        let default = if self.eat(SyntaxKind::Equals) {
            Some(self.parse_expression_alloc())
        } else {
            None
        };
        TemplateParameterDeclaration {
            data: self.finish(SyntaxKind::TemplateParameterDeclaration, prelude.pos),
            id,
            constraint,
            default,
        }
    }

    // ========================================================================
    // Decorators & directives
    // ========================================================================

    fn parse_decorator_list(&mut self) -> NodeList<'a, DecoratorExpression<'a>> {
        if self.token() != SyntaxKind::At {
            return &[];
        }
        let mut decorators = Vec::new();
        while self.token() == SyntaxKind::At {
            decorators.push(self.parse_decorator_expression());
        }
        self.arena.alloc_vec(decorators)
    }

    fn parse_decorator_expression(&mut self) -> DecoratorExpression<'a> {
        let pos = self.token_pos();
        self.next_token();
        let target = self.parse_identifier_or_member_expression_alloc();
        let arguments = if self.token() == SyntaxKind::OpenParen {
            let args = self.parse_list(&ListKind::DECORATOR_ARGUMENTS, |p, _| p.parse_expression());
            self.arena.alloc_vec(args)
        } else {
            &[][..]
        };
        DecoratorExpression {
            data: self.finish(SyntaxKind::DecoratorExpression, pos),
            target,
            arguments,
        }
    }

    fn parse_directive_list(&mut self) -> NodeList<'a, DirectiveExpression<'a>> {
        if self.token() != SyntaxKind::Hash {
            return &[];
        }
        let mut directives = Vec::new();
        while self.token() == SyntaxKind::Hash {
            directives.push(self.parse_directive_expression());
        }
        self.arena.alloc_vec(directives)
    }

    fn parse_directive_expression(&mut self) -> DirectiveExpression<'a> {
        let pos = self.token_pos();
        // Directive arguments run to the end of the line.
        self.new_line_is_trivia = false;
        self.next_token();
        let target = self.parse_identifier();
        if !target.data.flags().contains(NodeFlags::SYNTHETIC) && target.sv != "suppress" {
            self.report_at(target.data.range, &messages::UNKNOWN_DIRECTIVE, &[target.sv]);
        }
        let mut arguments = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::StringLiteral => {
                    arguments.push(DirectiveArgument::StringLiteral(
                        self.parse_string_literal_node(),
                    ));
                }
                SyntaxKind::Identifier => {
                    let id = self.identifier_from_token();
                    self.next_token();
                    arguments.push(DirectiveArgument::Identifier(id));
                }
                SyntaxKind::NewLine | SyntaxKind::EndOfFile => break,
                _ => {
                    let text = format!("'{}'", self.token_raw_text());
                    self.report(&messages::TOKEN_EXPECTED_UNEXPECTED, &[&text]);
                    while !matches!(
                        self.token(),
                        SyntaxKind::NewLine | SyntaxKind::EndOfFile
                    ) {
                        self.next_token();
                    }
                    break;
                }
            }
        }
        let arguments = self.arena.alloc_vec(arguments);
        let data = self.finish(SyntaxKind::DirectiveExpression, pos);
        self.new_line_is_trivia = true;
        if self.token() == SyntaxKind::NewLine {
            self.next_token();
        }
        DirectiveExpression {
            data,
            target,
            arguments,
        }
    }

    // ========================================================================
    // Doc comments
    // ========================================================================

    /// Parse the doc comments collected since the last statement. Returns
    /// the position of the first one so the owning node's range can start
    /// there.
    fn parse_doc_list(&mut self) -> (TextPos, NodeList<'a, Doc<'a>>) {
        if self.doc_ranges.is_empty() {
            return (self.token_pos(), &[]);
        }
        let ranges = std::mem::take(&mut self.doc_ranges);
        let pos = ranges[0].range.pos;
        let mut docs = Vec::new();
        for range in ranges {
            docs.push(self.parse_doc(range));
        }
        (pos, self.arena.alloc_vec(docs))
    }

    fn parse_doc(&mut self, doc_range: DocRange) -> Doc<'a> {
        // Interior range between `/**` and `*/`; an unterminated comment
        // runs to the end of its range.
        let inner_pos = (doc_range.range.pos + 3).min(doc_range.range.end);
        let inner_end = if doc_range.unterminated {
            doc_range.range.end
        } else {
            doc_range.range.end.saturating_sub(2).max(inner_pos)
        };
        let inner = TextRange::new(inner_pos, inner_end);
        self.parse_range(ParseMode::Doc, inner, |p| {
            let content = p.parse_doc_content();
            let mut tags = Vec::new();
            while p.token() == SyntaxKind::At {
                tags.push(p.parse_doc_tag());
            }
            Doc {
                data: NodeData::new(SyntaxKind::Doc, doc_range.range.pos, doc_range.range.end),
                content: p.arena.alloc_vec(content),
                tags: p.arena.alloc_vec(tags),
            }
        })
    }

    /// Accumulate doc text until the next tag or the end of the comment,
    /// stripping each line's leading whitespace-and-`*` margin.
    fn parse_doc_content(&mut self) -> Vec<DocTextNode<'a>> {
        let pos = self.token_pos();
        let mut lines: Vec<String> = Vec::new();
        let mut line = String::new();
        loop {
            match self.token() {
                SyntaxKind::NewLine => {
                    lines.push(std::mem::take(&mut line));
                    self.next_token();
                    if self.token() == SyntaxKind::Whitespace {
                        self.next_token();
                    }
                    if self.token() == SyntaxKind::Asterisk {
                        self.next_token();
                    }
                }
                SyntaxKind::At | SyntaxKind::EndOfFile => break,
                _ => {
                    line.push_str(&self.token_raw_text());
                    self.next_token();
                }
            }
        }
        lines.push(line);
        let text = lines
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join("\n");
        let text = text.trim();
        let end = self.token_pos();
        if text.is_empty() {
            return Vec::new();
        }
        vec![DocTextNode {
            data: NodeData::new(SyntaxKind::DocText, pos, end),
            text: self.arena.alloc_str(text),
        }]
    }

    fn parse_doc_tag(&mut self) -> DocTag<'a> {
        let pos = self.token_pos();
        self.next_token();
        let tag_name = if self.token() == SyntaxKind::Identifier {
            let id = self.identifier_from_token();
            self.next_token();
            id
        } else {
            self.report(&messages::DOC_INVALID_IDENTIFIER_TAG, &[]);
            self.create_missing_identifier()
        };
        match tag_name.sv {
            "param" => {
                let param_name = self.parse_doc_param_name(&messages::DOC_INVALID_IDENTIFIER_PARAM);
                let content = self.parse_doc_content();
                DocTag::Param(DocParamTag {
                    data: self.finish_doc_node(SyntaxKind::DocParamTag, pos),
                    tag_name,
                    param_name,
                    content: self.arena.alloc_vec(content),
                })
            }
            "template" => {
                let param_name =
                    self.parse_doc_param_name(&messages::DOC_INVALID_IDENTIFIER_TEMPLATE_PARAM);
                let content = self.parse_doc_content();
                DocTag::Template(DocTemplateTag {
                    data: self.finish_doc_node(SyntaxKind::DocTemplateTag, pos),
                    tag_name,
                    param_name,
                    content: self.arena.alloc_vec(content),
                })
            }
            "returns" => {
                let content = self.parse_doc_content();
                DocTag::Returns(DocReturnsTag {
                    data: self.finish_doc_node(SyntaxKind::DocReturnsTag, pos),
                    tag_name,
                    content: self.arena.alloc_vec(content),
                })
            }
            _ => {
                let content = self.parse_doc_content();
                DocTag::Unknown(DocUnknownTag {
                    data: self.finish_doc_node(SyntaxKind::DocUnknownTag, pos),
                    tag_name,
                    content: self.arena.alloc_vec(content),
                })
            }
        }
    }

    fn finish_doc_node(&mut self, kind: SyntaxKind, pos: TextPos) -> NodeData {
        let data = NodeData::new(kind, pos, self.token_pos().max(pos));
        if self.parse_error_in_next_finished_node {
            data.add_flags(NodeFlags::THIS_NODE_HAS_ERROR);
            self.parse_error_in_next_finished_node = false;
        }
        data
    }

    fn parse_doc_param_name(&mut self, message: &DiagnosticMessage) -> IdentifierNode<'a> {
        if self.token() == SyntaxKind::Whitespace {
            self.next_token();
        }
        if self.token() == SyntaxKind::Identifier {
            let id = self.identifier_from_token();
            self.next_token();
            id
        } else {
            self.report(message, &[]);
            self.create_missing_identifier()
        }
    }

    // ========================================================================
    // Expressions (primary grammar)
    // ========================================================================

    fn parse_expression_alloc(&mut self) -> &'a Expression<'a> {
        let expr = self.parse_expression();
        self.arena.alloc(expr)
    }

    fn parse_expression(&mut self) -> Expression<'a> {
        self.parse_union_expression_or_higher()
    }

    fn parse_union_expression_or_higher(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        // A leading `|` is permitted and discarded.
        let leading = self.eat(SyntaxKind::Bar);
        let first = self.parse_intersection_expression_or_higher();
        if !leading && self.token() != SyntaxKind::Bar {
            return first;
        }
        let mut options = vec![first];
        while self.eat(SyntaxKind::Bar) {
            options.push(self.parse_intersection_expression_or_higher());
        }
        let options = self.arena.alloc_vec(options);
        Expression::UnionExpression(UnionExpression {
            data: self.finish(SyntaxKind::UnionExpression, pos),
            options,
        })
    }

    fn parse_intersection_expression_or_higher(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let leading = self.eat(SyntaxKind::Ampersand);
        let first = self.parse_array_expression_or_higher();
        if !leading && self.token() != SyntaxKind::Ampersand {
            return first;
        }
        let mut options = vec![first];
        while self.eat(SyntaxKind::Ampersand) {
            options.push(self.parse_array_expression_or_higher());
        }
        let options = self.arena.alloc_vec(options);
        Expression::IntersectionExpression(IntersectionExpression {
            data: self.finish(SyntaxKind::IntersectionExpression, pos),
            options,
        })
    }

    fn parse_array_expression_or_higher(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let mut expr = self.parse_primary_expression();
        while self.token() == SyntaxKind::OpenBracket {
            self.next_token();
            self.expect(SyntaxKind::CloseBracket);
            let element_type = self.arena.alloc(expr);
            expr = Expression::ArrayExpression(ArrayExpression {
                data: self.finish(SyntaxKind::ArrayExpression, pos),
                element_type,
            });
        }
        expr
    }

    fn parse_primary_expression(&mut self) -> Expression<'a> {
        loop {
            match self.token() {
                SyntaxKind::StringLiteral => {
                    return Expression::StringLiteral(self.parse_string_literal_node())
                }
                SyntaxKind::NumericLiteral => {
                    return Expression::NumericLiteral(self.parse_numeric_literal_node())
                }
                SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                    let value = self.token() == SyntaxKind::TrueKeyword;
                    let data = NodeData::new(
                        SyntaxKind::BooleanLiteral,
                        self.token_pos(),
                        self.token_end(),
                    );
                    self.next_token();
                    return Expression::BooleanLiteral(BooleanLiteralNode { data, value });
                }
                SyntaxKind::VoidKeyword => {
                    let data =
                        NodeData::new(SyntaxKind::VoidKeyword, self.token_pos(), self.token_end());
                    self.next_token();
                    return Expression::VoidKeyword(VoidKeywordNode { data });
                }
                SyntaxKind::NeverKeyword => {
                    let data =
                        NodeData::new(SyntaxKind::NeverKeyword, self.token_pos(), self.token_end());
                    self.next_token();
                    return Expression::NeverKeyword(NeverKeywordNode { data });
                }
                SyntaxKind::UnknownKeyword => {
                    let data = NodeData::new(
                        SyntaxKind::UnknownKeyword,
                        self.token_pos(),
                        self.token_end(),
                    );
                    self.next_token();
                    return Expression::UnknownKeyword(UnknownKeywordNode { data });
                }
                SyntaxKind::OpenBrace => {
                    return Expression::ModelExpression(self.parse_model_expression())
                }
                SyntaxKind::OpenBracket => return self.parse_tuple_expression(),
                SyntaxKind::OpenParen => {
                    self.next_token();
                    let expr = self.parse_expression();
                    self.expect(SyntaxKind::CloseParen);
                    return expr;
                }
                SyntaxKind::At => {
                    // Decorators can't appear inside expressions; parse and
                    // flag them, then resume.
                    let decorators = self.parse_decorator_list();
                    self.report_invalid_decorators(decorators, "expression");
                }
                SyntaxKind::Hash => {
                    let directives = self.parse_directive_list();
                    self.report_invalid_directives(directives, "expression");
                }
                _ => return Expression::TypeReference(self.parse_reference()),
            }
        }
    }

    fn parse_model_expression(&mut self) -> ModelExpression<'a> {
        let pos = self.token_pos();
        let props = self.parse_list(&ListKind::MODEL_PROPERTIES, Self::parse_model_property_or_spread);
        let properties = self.arena.alloc_vec(props);
        ModelExpression {
            data: self.finish(SyntaxKind::ModelExpression, pos),
            properties,
        }
    }

    fn parse_tuple_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let values = self.parse_list(&ListKind::TUPLE, |p, _| p.parse_expression());
        let values = self.arena.alloc_vec(values);
        Expression::TupleExpression(TupleExpression {
            data: self.finish(SyntaxKind::TupleExpression, pos),
            values,
        })
    }

    /// `A.B.C<Args>` — a reference expression with optional template
    /// arguments.
    fn parse_reference(&mut self) -> TypeReferenceNode<'a> {
        let pos = self.token_pos();
        let target = self.parse_identifier_or_member_expression_alloc();
        let arguments = if self.token() == SyntaxKind::LessThan {
            let args = self.parse_list(&ListKind::TEMPLATE_ARGUMENTS, |p, _| p.parse_expression());
            self.arena.alloc_vec(args)
        } else {
            &[][..]
        };
        TypeReferenceNode {
            data: self.finish(SyntaxKind::TypeReference, pos),
            target,
            arguments,
        }
    }

    fn parse_identifier_or_member_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let mut expr = Expression::Identifier(self.parse_identifier());
        while self.token() == SyntaxKind::Dot {
            self.next_token();
            let id = self.parse_member_expression_identifier();
            let base = self.arena.alloc(expr);
            expr = Expression::MemberExpression(MemberExpression {
                data: self.finish(SyntaxKind::MemberExpression, pos),
                base,
                id,
            });
        }
        expr
    }

    fn parse_identifier_or_member_expression_alloc(&mut self) -> &'a Expression<'a> {
        let expr = self.parse_identifier_or_member_expression();
        self.arena.alloc(expr)
    }

    // ========================================================================
    // Delimited list driver
    // ========================================================================

    fn parse_list<T>(
        &mut self,
        kind: &ListKind,
        mut parse_item: impl FnMut(&mut Self, Prelude<'a>) -> T,
    ) -> Vec<T> {
        if kind.open != SyntaxKind::None {
            self.expect(kind.open);
        }
        let mut items = Vec::new();
        let mut last_iteration_pos: Option<TextPos> = None;
        loop {
            // Progress guard: an iteration that consumed nothing would
            // loop forever on malformed input; force-close instead and
            // drop the synthetic item it produced.
            if last_iteration_pos == Some(self.token_pos()) {
                items.pop();
                break;
            }
            last_iteration_pos = Some(self.token_pos());

            let (doc_pos, docs) = self.parse_doc_list();
            let pos = doc_pos.min(self.token_pos());
            let directives = self.parse_directive_list();
            let decorators = self.parse_decorator_list();
            if let Some(target) = kind.invalid_annotation_target {
                self.report_invalid_decorators(decorators, target);
                self.report_invalid_directives(directives, target);
            }
            let had_prelude =
                !docs.is_empty() || !directives.is_empty() || !decorators.is_empty();

            if kind.allow_empty
                && !had_prelude
                && kind.close != SyntaxKind::None
                && self.token() == kind.close
            {
                self.next_token();
                break;
            }

            // A statement keyword here means the list was left unclosed;
            // bail out so statement parsing can resume.
            if !had_prelude
                && (self.token() == SyntaxKind::EndOfFile
                    || (self.token().is_statement_keyword()
                        && self.token() != kind.allowed_statement_keyword))
            {
                if kind.close != SyntaxKind::None {
                    self.report_expected_token(kind.close);
                }
                break;
            }

            let item = parse_item(
                self,
                Prelude {
                    pos,
                    docs,
                    directives,
                    decorators,
                },
            );
            items.push(item);

            let mut seen_delimiter = false;
            if kind.delimiter != SyntaxKind::None && self.token() == kind.delimiter {
                self.next_token();
                seen_delimiter = true;
            } else if kind.tolerated_delimiter != SyntaxKind::None
                && self.token() == kind.tolerated_delimiter
            {
                if !kind.tolerated_delimiter_is_valid {
                    let text = format!("'{}'", self.token().text_for_error());
                    self.report(&messages::TRAILING_TOKEN, &[&text]);
                }
                self.next_token();
                seen_delimiter = true;
            }

            if seen_delimiter {
                if kind.close != SyntaxKind::None && self.token() == kind.close {
                    if !kind.trailing_delimiter_is_valid {
                        let text = format!("'{}'", kind.delimiter.text_for_error());
                        self.report(&messages::TRAILING_TOKEN, &[&text]);
                    }
                    self.next_token();
                    break;
                }
                continue;
            }

            if kind.close != SyntaxKind::None && self.token() == kind.close {
                self.next_token();
                break;
            }
            if kind.close == SyntaxKind::None {
                // No delimiter and nothing to close: the list ends here.
                break;
            }
            if self.token() == SyntaxKind::EndOfFile {
                self.report_expected_token(kind.close);
                break;
            }
            if !self.token().is_statement_keyword()
                || self.token() == kind.allowed_statement_keyword
            {
                self.report_expected_token(kind.delimiter);
            }
        }
        items
    }

    // ========================================================================
    // Projections
    // ========================================================================

    fn parse_projection_statement(
        &mut self,
        pos: TextPos,
        directives: NodeList<'a, DirectiveExpression<'a>>,
        docs: NodeList<'a, Doc<'a>>,
    ) -> Statement<'a> {
        self.next_token();
        let selector = self.parse_projection_selector();
        self.expect(SyntaxKind::Hash);
        let id = self.parse_identifier();
        self.expect(SyntaxKind::OpenBrace);
        let mut to: Option<Projection<'a>> = None;
        let mut from: Option<Projection<'a>> = None;
        while self.token() != SyntaxKind::CloseBrace && self.token() != SyntaxKind::EndOfFile {
            let direction = match self.token() {
                SyntaxKind::Identifier if self.scanner.token_value() == "to" => {
                    Some(ProjectionDirection::To)
                }
                SyntaxKind::Identifier if self.scanner.token_value() == "from" => {
                    Some(ProjectionDirection::From)
                }
                _ => None,
            };
            let Some(direction) = direction else {
                self.report(&messages::TOKEN_EXPECTED_PROJECTION_DIRECTION, &[]);
                self.next_token();
                continue;
            };
            let projection = self.parse_projection(direction);
            match direction {
                ProjectionDirection::To => {
                    if to.is_some() {
                        self.report_at(
                            projection.data.range,
                            &messages::DUPLICATE_SYMBOL,
                            &["to"],
                        );
                    } else {
                        to = Some(projection);
                    }
                }
                ProjectionDirection::From => {
                    if from.is_some() {
                        self.report_at(
                            projection.data.range,
                            &messages::DUPLICATE_SYMBOL,
                            &["from"],
                        );
                    } else {
                        from = Some(projection);
                    }
                }
            }
        }
        self.expect(SyntaxKind::CloseBrace);
        Statement::ProjectionStatement(ProjectionStatement {
            data: self.finish(SyntaxKind::ProjectionStatement, pos),
            selector,
            id,
            to,
            from,
            directives,
            docs,
        })
    }

    fn parse_projection_selector(&mut self) -> ProjectionSelector<'a> {
        let range = self.scanner.token_range();
        match self.token() {
            SyntaxKind::ModelKeyword => {
                self.next_token();
                ProjectionSelector::Model(ProjectionModelSelector {
                    data: NodeData::new(SyntaxKind::ProjectionModelSelector, range.pos, range.end),
                })
            }
            SyntaxKind::OpKeyword => {
                self.next_token();
                ProjectionSelector::Operation(ProjectionOperationSelector {
                    data: NodeData::new(
                        SyntaxKind::ProjectionOperationSelector,
                        range.pos,
                        range.end,
                    ),
                })
            }
            SyntaxKind::UnionKeyword => {
                self.next_token();
                ProjectionSelector::Union(ProjectionUnionSelector {
                    data: NodeData::new(SyntaxKind::ProjectionUnionSelector, range.pos, range.end),
                })
            }
            SyntaxKind::InterfaceKeyword => {
                self.next_token();
                ProjectionSelector::Interface(ProjectionInterfaceSelector {
                    data: NodeData::new(
                        SyntaxKind::ProjectionInterfaceSelector,
                        range.pos,
                        range.end,
                    ),
                })
            }
            SyntaxKind::EnumKeyword => {
                self.next_token();
                ProjectionSelector::Enum(ProjectionEnumSelector {
                    data: NodeData::new(SyntaxKind::ProjectionEnumSelector, range.pos, range.end),
                })
            }
            _ => match self.parse_identifier_or_member_expression() {
                Expression::MemberExpression(member) => {
                    ProjectionSelector::MemberExpression(member)
                }
                Expression::Identifier(identifier) => ProjectionSelector::Identifier(identifier),
                // parse_identifier_or_member_expression only produces the
                // two variants above.
                _ => unreachable!("reference parse produced a non-reference"),
            },
        }
    }

    fn parse_projection(&mut self, direction: ProjectionDirection) -> Projection<'a> {
        let pos = self.token_pos();
        let direction_id = self.identifier_from_token();
        self.next_token();
        let parameters = if self.token() == SyntaxKind::OpenParen {
            let params = self.parse_list(&ListKind::PROJECTION_PARAMETERS, |p, _| {
                let param_pos = p.token_pos();
                let id = p.parse_identifier();
                ProjectionParameterDeclaration {
                    data: p.finish(SyntaxKind::ProjectionParameterDeclaration, param_pos),
                    id,
                }
            });
            self.arena.alloc_vec(params)
        } else {
            &[][..]
        };
        self.expect(SyntaxKind::OpenBrace);
        let body = self.parse_projection_statement_items();
        self.expect(SyntaxKind::CloseBrace);
        Projection {
            data: self.finish(SyntaxKind::Projection, pos),
            direction,
            direction_id,
            parameters,
            body,
        }
    }

    fn parse_projection_statement_items(
        &mut self,
    ) -> NodeList<'a, ProjectionExpressionStatement<'a>> {
        let mut items = Vec::new();
        let mut last_iteration_pos: Option<TextPos> = None;
        while self.token() != SyntaxKind::CloseBrace && self.token() != SyntaxKind::EndOfFile {
            // Progress guard, recovering at `}` or end of file.
            if last_iteration_pos == Some(self.token_pos()) {
                items.pop();
                while self.token() != SyntaxKind::CloseBrace
                    && self.token() != SyntaxKind::EndOfFile
                {
                    self.next_token();
                }
                break;
            }
            last_iteration_pos = Some(self.token_pos());
            let pos = self.token_pos();
            let expr = self.parse_projection_expression_alloc();
            self.expect(SyntaxKind::Semicolon);
            items.push(ProjectionExpressionStatement {
                data: self.finish(SyntaxKind::ProjectionExpressionStatement, pos),
                expr,
            });
        }
        self.arena.alloc_vec(items)
    }

    fn parse_projection_expression_alloc(&mut self) -> &'a ProjectionExpression<'a> {
        let expr = self.parse_projection_expression();
        self.arena.alloc(expr)
    }

    fn parse_projection_expression(&mut self) -> ProjectionExpression<'a> {
        if self.token() == SyntaxKind::ReturnKeyword {
            let pos = self.token_pos();
            self.next_token();
            let value = self.parse_projection_expression_alloc();
            return ProjectionExpression::Return(ReturnExpression {
                data: self.finish(SyntaxKind::ReturnExpression, pos),
                value,
            });
        }
        self.parse_projection_binary_expression(OperatorPrecedence::Lowest)
    }

    /// Precedence climbing over the projection binary operators; all are
    /// left associative.
    fn parse_projection_binary_expression(
        &mut self,
        min_precedence: OperatorPrecedence,
    ) -> ProjectionExpression<'a> {
        let pos = self.token_pos();
        let mut left = self.parse_projection_unary_expression();
        while let Some(precedence) = get_binary_operator_precedence(self.token()) {
            if precedence < min_precedence {
                break;
            }
            let op = self.token();
            self.next_token();
            let right = self.parse_projection_binary_expression(precedence.next());
            let left_ref = self.arena.alloc(left);
            let right_ref = self.arena.alloc(right);
            left = match op {
                SyntaxKind::BarBar | SyntaxKind::AmpersandAmpersand => {
                    ProjectionExpression::Logical(ProjectionLogicalExpression {
                        data: self.finish(SyntaxKind::ProjectionLogicalExpression, pos),
                        op,
                        left: left_ref,
                        right: right_ref,
                    })
                }
                SyntaxKind::EqualsEquals | SyntaxKind::ExclamationEquals => {
                    ProjectionExpression::Equality(ProjectionEqualityExpression {
                        data: self.finish(SyntaxKind::ProjectionEqualityExpression, pos),
                        op,
                        left: left_ref,
                        right: right_ref,
                    })
                }
                SyntaxKind::LessThan
                | SyntaxKind::LessThanEquals
                | SyntaxKind::GreaterThan
                | SyntaxKind::GreaterThanEquals => {
                    ProjectionExpression::Relational(ProjectionRelationalExpression {
                        data: self.finish(SyntaxKind::ProjectionRelationalExpression, pos),
                        op,
                        left: left_ref,
                        right: right_ref,
                    })
                }
                _ => ProjectionExpression::Arithmetic(ProjectionArithmeticExpression {
                    data: self.finish(SyntaxKind::ProjectionArithmeticExpression, pos),
                    op,
                    left: left_ref,
                    right: right_ref,
                }),
            };
        }
        left
    }

    fn parse_projection_unary_expression(&mut self) -> ProjectionExpression<'a> {
        if self.token() == SyntaxKind::Exclamation {
            let pos = self.token_pos();
            self.next_token();
            let operand = self.parse_projection_unary_expression();
            let target = self.arena.alloc(operand);
            return ProjectionExpression::Unary(ProjectionUnaryExpression {
                data: self.finish(SyntaxKind::ProjectionUnaryExpression, pos),
                op: SyntaxKind::Exclamation,
                target,
            });
        }
        self.parse_projection_call_expression()
    }

    fn parse_projection_call_expression(&mut self) -> ProjectionExpression<'a> {
        let pos = self.token_pos();
        let mut expr = self.parse_projection_decorator_reference_or_member();
        while self.token() == SyntaxKind::OpenParen {
            let args = self.parse_list(&ListKind::CALL_ARGUMENTS, |p, _| {
                p.parse_projection_expression()
            });
            let arguments = self.arena.alloc_vec(args);
            let target = self.arena.alloc(expr);
            expr = ProjectionExpression::Call(ProjectionCallExpression {
                data: self.finish(SyntaxKind::ProjectionCallExpression, pos),
                target,
                arguments,
            });
        }
        expr
    }

    fn parse_projection_decorator_reference_or_member(&mut self) -> ProjectionExpression<'a> {
        if self.token() != SyntaxKind::At {
            return self.parse_projection_member_expression();
        }
        let pos = self.token_pos();
        self.next_token();
        // The reference names a decorator, so only an identifier chain is
        // meaningful after `@`.
        let mut expr = ProjectionExpression::Identifier(self.parse_identifier());
        loop {
            let selector = match self.token() {
                SyntaxKind::Dot => MemberSelector::Dot,
                SyntaxKind::ColonColon => MemberSelector::ColonColon,
                _ => break,
            };
            self.next_token();
            let id = self.parse_member_expression_identifier();
            let base = self.arena.alloc(expr);
            expr = ProjectionExpression::Member(ProjectionMemberExpression {
                data: self.finish(SyntaxKind::ProjectionMemberExpression, pos),
                base,
                id,
                selector,
            });
        }
        let target = self.arena.alloc(expr);
        ProjectionExpression::DecoratorReference(ProjectionDecoratorReferenceExpression {
            data: self.finish(SyntaxKind::ProjectionDecoratorReferenceExpression, pos),
            target,
        })
    }

    fn parse_projection_member_expression(&mut self) -> ProjectionExpression<'a> {
        let pos = self.token_pos();
        let mut expr = self.parse_projection_primary_expression();
        loop {
            let selector = match self.token() {
                SyntaxKind::Dot => MemberSelector::Dot,
                SyntaxKind::ColonColon => MemberSelector::ColonColon,
                _ => break,
            };
            self.next_token();
            let id = self.parse_member_expression_identifier();
            let base = self.arena.alloc(expr);
            expr = ProjectionExpression::Member(ProjectionMemberExpression {
                data: self.finish(SyntaxKind::ProjectionMemberExpression, pos),
                base,
                id,
                selector,
            });
        }
        expr
    }

    fn parse_projection_primary_expression(&mut self) -> ProjectionExpression<'a> {
        match self.token() {
            SyntaxKind::IfKeyword => {
                ProjectionExpression::If(self.parse_projection_if_expression())
            }
            SyntaxKind::NumericLiteral => {
                ProjectionExpression::NumericLiteral(self.parse_numeric_literal_node())
            }
            SyntaxKind::StringLiteral => {
                ProjectionExpression::StringLiteral(self.parse_string_literal_node())
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let value = self.token() == SyntaxKind::TrueKeyword;
                let data = NodeData::new(
                    SyntaxKind::BooleanLiteral,
                    self.token_pos(),
                    self.token_end(),
                );
                self.next_token();
                ProjectionExpression::BooleanLiteral(BooleanLiteralNode { data, value })
            }
            SyntaxKind::VoidKeyword => {
                let data =
                    NodeData::new(SyntaxKind::VoidKeyword, self.token_pos(), self.token_end());
                self.next_token();
                ProjectionExpression::VoidKeyword(VoidKeywordNode { data })
            }
            SyntaxKind::NeverKeyword => {
                let data =
                    NodeData::new(SyntaxKind::NeverKeyword, self.token_pos(), self.token_end());
                self.next_token();
                ProjectionExpression::NeverKeyword(NeverKeywordNode { data })
            }
            SyntaxKind::UnknownKeyword => {
                let data =
                    NodeData::new(SyntaxKind::UnknownKeyword, self.token_pos(), self.token_end());
                self.next_token();
                ProjectionExpression::UnknownKeyword(UnknownKeywordNode { data })
            }
            SyntaxKind::OpenBracket => {
                let pos = self.token_pos();
                let values =
                    self.parse_list(&ListKind::TUPLE, |p, _| p.parse_projection_expression());
                let values = self.arena.alloc_vec(values);
                ProjectionExpression::Tuple(ProjectionTupleExpression {
                    data: self.finish(SyntaxKind::ProjectionTupleExpression, pos),
                    values,
                })
            }
            SyntaxKind::OpenBrace => {
                ProjectionExpression::Model(self.parse_projection_model_expression())
            }
            SyntaxKind::OpenParen => self.parse_projection_parenthesized_or_lambda(),
            SyntaxKind::Identifier => {
                let id = self.identifier_from_token();
                self.next_token();
                ProjectionExpression::Identifier(id)
            }
            _ => {
                self.report(&messages::TOKEN_EXPECTED_EXPRESSION, &[]);
                ProjectionExpression::Identifier(self.create_missing_identifier())
            }
        }
    }

    fn parse_projection_if_expression(&mut self) -> ProjectionIfExpression<'a> {
        let pos = self.token_pos();
        self.next_token();
        let test = self.parse_projection_expression_alloc();
        let consequent = self.parse_projection_block();
        let alternate = if self.eat(SyntaxKind::ElseKeyword) {
            if self.token() == SyntaxKind::IfKeyword {
                let chained = ProjectionExpression::If(self.parse_projection_if_expression());
                Some(&*self.arena.alloc(chained))
            } else {
                let block = ProjectionExpression::Block(self.parse_projection_block());
                Some(&*self.arena.alloc(block))
            }
        } else {
            None
        };
        ProjectionIfExpression {
            data: self.finish(SyntaxKind::ProjectionIfExpression, pos),
            test,
            consequent,
            alternate,
        }
    }

    fn parse_projection_block(&mut self) -> ProjectionBlockExpression<'a> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBrace);
        let statements = self.parse_projection_statement_items();
        self.expect(SyntaxKind::CloseBrace);
        ProjectionBlockExpression {
            data: self.finish(SyntaxKind::ProjectionBlockExpression, pos),
            statements,
        }
    }

    /// `( … )` is a parenthesized expression unless `=>` follows, in which
    /// case each listed expression must be an identifier naming a lambda
    /// parameter.
    fn parse_projection_parenthesized_or_lambda(&mut self) -> ProjectionExpression<'a> {
        let pos = self.token_pos();
        let mut exprs = self.parse_list(&ListKind::PROJECTION_EXPRESSIONS, |p, _| {
            p.parse_projection_expression()
        });
        if self.token() == SyntaxKind::EqualsGreaterThan {
            self.next_token();
            let mut parameters = Vec::new();
            for expr in exprs {
                match expr {
                    ProjectionExpression::Identifier(id) => {
                        parameters.push(ProjectionLambdaParameterDeclaration {
                            data: NodeData::new(
                                SyntaxKind::ProjectionLambdaParameterDeclaration,
                                id.data.pos(),
                                id.data.end(),
                            ),
                            id,
                        });
                    }
                    other => {
                        self.report_at(
                            other.data().range,
                            &messages::TOKEN_EXPECTED_IDENTIFIER,
                            &[],
                        );
                        let id = self.create_missing_identifier();
                        parameters.push(ProjectionLambdaParameterDeclaration {
                            data: NodeData::new(
                                SyntaxKind::ProjectionLambdaParameterDeclaration,
                                id.data.pos(),
                                id.data.end(),
                            ),
                            id,
                        });
                    }
                }
            }
            let parameters = self.arena.alloc_vec(parameters);
            let body = self.parse_projection_block();
            return ProjectionExpression::Lambda(ProjectionLambdaExpression {
                data: self.finish(SyntaxKind::ProjectionLambdaExpression, pos),
                parameters,
                body,
            });
        }
        if exprs.len() == 1 {
            return exprs.pop().unwrap();
        }
        self.report(&messages::TOKEN_EXPECTED_EXPRESSION, &[]);
        if exprs.is_empty() {
            ProjectionExpression::Identifier(self.create_missing_identifier())
        } else {
            exprs.swap_remove(0)
        }
    }

    fn parse_projection_model_expression(&mut self) -> ProjectionModelExpression<'a> {
        let pos = self.token_pos();
        let props = self.parse_list(
            &ListKind::MODEL_PROPERTIES,
            Self::parse_projection_model_property_or_spread,
        );
        let properties = self.arena.alloc_vec(props);
        ProjectionModelExpression {
            data: self.finish(SyntaxKind::ProjectionModelExpression, pos),
            properties,
        }
    }

    fn parse_projection_model_property_or_spread(
        &mut self,
        prelude: Prelude<'a>,
    ) -> ProjectionModelPropertyOrSpread<'a> {
        if self.token() == SyntaxKind::Ellipsis {
            self.report_invalid_decorators(prelude.decorators, "spread property");
            self.next_token();
            let target = self.parse_projection_expression_alloc();
            return ProjectionModelPropertyOrSpread::Spread(ProjectionModelSpreadProperty {
                data: self.finish(SyntaxKind::ProjectionModelSpreadProperty, prelude.pos),
                target,
            });
        }
        let id = self.parse_property_name();
        let optional = self.eat(SyntaxKind::Question);
        self.expect(SyntaxKind::Colon);
        let value = self.parse_projection_expression_alloc();
        let default = if self.eat(SyntaxKind::Equals) {
            let expr = self.parse_projection_expression_alloc();
            if !optional {
                self.report_at(expr.data().range, &messages::DEFAULT_OPTIONAL, &[]);
            }
            Some(expr)
        } else {
            None
        };
        ProjectionModelPropertyOrSpread::Property(ProjectionModelProperty {
            data: self.finish(SyntaxKind::ProjectionModelProperty, prelude.pos),
            id,
            value,
            optional,
            default,
            decorators: prelude.decorators,
            directives: prelude.directives,
            docs: prelude.docs,
        })
    }
}

/// Numeric token text to value: decimal with optional fraction/exponent,
/// `0x` hex, `0b` binary, `_` separators.
fn numeric_value(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map(|v| v as f64).unwrap_or(f64::NAN);
    }
    if let Some(bin) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        return u64::from_str_radix(bin, 2).map(|v| v as f64).unwrap_or(f64::NAN);
    }
    cleaned.parse().unwrap_or(f64::NAN)
}
