//! Syntax tree node definitions for the ADL language.
//!
//! Every node embeds a [`NodeData`] carrying its kind, source range, and
//! flag bits. Child nodes live in the parse arena and are referenced as
//! `&'a T` / `&'a [T]`; ownership is strictly tree shaped with no parent
//! pointers and no cross-node sharing.

use crate::syntax_kind::SyntaxKind;
use crate::types::*;
use adl_core::text::{SourceFile, TextPos, TextRange};
use adl_diagnostics::Diagnostic;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

// ============================================================================
// Core node data
// ============================================================================

/// Common data shared by all tree nodes.
///
/// Flags are stored atomically: the tree is read-only after parsing except
/// for the lazy error-propagation bits, which are set with monotonic
/// relaxed ORs so trees can be queried from several threads.
pub struct NodeData {
    /// The kind of this node.
    pub kind: SyntaxKind,
    /// Source position range.
    pub range: TextRange,
    flags: AtomicU32,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: TextPos, end: TextPos) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            flags: AtomicU32::new(NodeFlags::NONE.bits()),
        }
    }

    pub fn with_flags(kind: SyntaxKind, pos: TextPos, end: TextPos, flags: NodeFlags) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            flags: AtomicU32::new(flags.bits()),
        }
    }

    #[inline]
    pub fn pos(&self) -> TextPos {
        self.range.pos
    }

    #[inline]
    pub fn end(&self) -> TextPos {
        self.range.end
    }

    /// Read the current flag bits.
    #[inline]
    pub fn flags(&self) -> NodeFlags {
        NodeFlags::from_bits_retain(self.flags.load(Ordering::Relaxed))
    }

    /// Set flag bits. Only ever adds bits; flags are monotonic.
    #[inline]
    pub fn add_flags(&self, flags: NodeFlags) {
        self.flags.fetch_or(flags.bits(), Ordering::Relaxed);
    }
}

impl Clone for NodeData {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            range: self.range,
            flags: AtomicU32::new(self.flags.load(Ordering::Relaxed)),
        }
    }
}

impl fmt::Debug for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeData")
            .field("kind", &self.kind)
            .field("range", &self.range)
            .field("flags", &self.flags())
            .finish()
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

// ============================================================================
// Script root
// ============================================================================

/// A comment trivia token collected during parsing (when
/// `ParseOptions::comments` is set).
#[derive(Debug, Clone, Copy)]
pub struct Comment {
    /// `SingleLineComment` or `MultiLineComment`.
    pub kind: SyntaxKind,
    pub range: TextRange,
}

/// The root node of a parsed source file.
#[derive(Debug)]
pub struct AdlScript<'a> {
    pub data: NodeData,
    /// Synthetic identifier whose value is the file path.
    pub id: IdentifierNode<'a>,
    pub statements: NodeList<'a, Statement<'a>>,
    /// Comment trivia, empty unless `ParseOptions::comments` was set.
    pub comments: NodeList<'a, Comment>,
    /// Doc comments not attached to any statement (e.g. at end of file).
    pub docs: NodeList<'a, Doc<'a>>,
    /// The file this script was parsed from.
    pub file: SourceFile,
    /// Diagnostics produced while parsing, in source order.
    pub parse_diagnostics: Vec<Diagnostic>,
    /// Whether the tree is safe to feed to a pretty-printer. Cleared when
    /// any non-printable parse error was reported.
    pub printable: bool,
    /// Snapshot of the options this script was parsed with.
    pub parse_options: ParseOptions,
}

// ============================================================================
// Identifier & literals
// ============================================================================

/// An identifier. Missing identifiers are synthesized during recovery with
/// `sv` of the form `"<missing identifier>N"` and the `SYNTHETIC` flag.
#[derive(Debug, Clone)]
pub struct IdentifierNode<'a> {
    pub data: NodeData,
    /// The string value of the identifier.
    pub sv: &'a str,
}

#[derive(Debug, Clone)]
pub struct StringLiteralNode<'a> {
    pub data: NodeData,
    /// The unescaped value.
    pub value: &'a str,
}

#[derive(Debug, Clone)]
pub struct NumericLiteralNode<'a> {
    pub data: NodeData,
    pub value: f64,
    /// The literal as written.
    pub value_as_str: &'a str,
}

#[derive(Debug, Clone)]
pub struct BooleanLiteralNode {
    pub data: NodeData,
    pub value: bool,
}

#[derive(Debug, Clone)]
pub struct VoidKeywordNode {
    pub data: NodeData,
}

#[derive(Debug, Clone)]
pub struct NeverKeywordNode {
    pub data: NodeData,
}

#[derive(Debug, Clone)]
pub struct UnknownKeywordNode {
    pub data: NodeData,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug)]
pub enum Expression<'a> {
    Identifier(IdentifierNode<'a>),
    MemberExpression(MemberExpression<'a>),
    TypeReference(TypeReferenceNode<'a>),
    UnionExpression(UnionExpression<'a>),
    IntersectionExpression(IntersectionExpression<'a>),
    ArrayExpression(ArrayExpression<'a>),
    TupleExpression(TupleExpression<'a>),
    ModelExpression(ModelExpression<'a>),
    StringLiteral(StringLiteralNode<'a>),
    NumericLiteral(NumericLiteralNode<'a>),
    BooleanLiteral(BooleanLiteralNode),
    VoidKeyword(VoidKeywordNode),
    NeverKeyword(NeverKeywordNode),
    UnknownKeyword(UnknownKeywordNode),
}

impl<'a> Expression<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Expression::Identifier(n) => &n.data,
            Expression::MemberExpression(n) => &n.data,
            Expression::TypeReference(n) => &n.data,
            Expression::UnionExpression(n) => &n.data,
            Expression::IntersectionExpression(n) => &n.data,
            Expression::ArrayExpression(n) => &n.data,
            Expression::TupleExpression(n) => &n.data,
            Expression::ModelExpression(n) => &n.data,
            Expression::StringLiteral(n) => &n.data,
            Expression::NumericLiteral(n) => &n.data,
            Expression::BooleanLiteral(n) => &n.data,
            Expression::VoidKeyword(n) => &n.data,
            Expression::NeverKeyword(n) => &n.data,
            Expression::UnknownKeyword(n) => &n.data,
        }
    }
}

/// `base.id`
#[derive(Debug)]
pub struct MemberExpression<'a> {
    pub data: NodeData,
    pub base: &'a Expression<'a>,
    pub id: IdentifierNode<'a>,
}

/// A reference to a declared type: an identifier or member path with
/// optional template arguments, `A.B.C<T1, T2>`.
#[derive(Debug)]
pub struct TypeReferenceNode<'a> {
    pub data: NodeData,
    /// `Identifier` or `MemberExpression`.
    pub target: &'a Expression<'a>,
    pub arguments: NodeList<'a, Expression<'a>>,
}

/// `A | B | C`
#[derive(Debug)]
pub struct UnionExpression<'a> {
    pub data: NodeData,
    pub options: NodeList<'a, Expression<'a>>,
}

/// `A & B & C`
#[derive(Debug)]
pub struct IntersectionExpression<'a> {
    pub data: NodeData,
    pub options: NodeList<'a, Expression<'a>>,
}

/// `T[]`
#[derive(Debug)]
pub struct ArrayExpression<'a> {
    pub data: NodeData,
    pub element_type: &'a Expression<'a>,
}

/// `[A, B]`
#[derive(Debug)]
pub struct TupleExpression<'a> {
    pub data: NodeData,
    pub values: NodeList<'a, Expression<'a>>,
}

/// `{ prop: T, ...Spread }`
#[derive(Debug)]
pub struct ModelExpression<'a> {
    pub data: NodeData,
    pub properties: NodeList<'a, ModelPropertyOrSpread<'a>>,
}

// ============================================================================
// Members
// ============================================================================

/// A property name: identifier or string literal.
#[derive(Debug)]
pub enum PropertyName<'a> {
    Identifier(IdentifierNode<'a>),
    StringLiteral(StringLiteralNode<'a>),
}

impl<'a> PropertyName<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            PropertyName::Identifier(n) => &n.data,
            PropertyName::StringLiteral(n) => &n.data,
        }
    }
}

#[derive(Debug)]
pub enum ModelPropertyOrSpread<'a> {
    ModelProperty(ModelProperty<'a>),
    ModelSpreadProperty(ModelSpreadProperty<'a>),
}

impl<'a> ModelPropertyOrSpread<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            ModelPropertyOrSpread::ModelProperty(n) => &n.data,
            ModelPropertyOrSpread::ModelSpreadProperty(n) => &n.data,
        }
    }
}

/// `@dec name?: T = default`
#[derive(Debug)]
pub struct ModelProperty<'a> {
    pub data: NodeData,
    pub id: PropertyName<'a>,
    pub value: &'a Expression<'a>,
    pub optional: bool,
    pub default: Option<&'a Expression<'a>>,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `...Target`
#[derive(Debug)]
pub struct ModelSpreadProperty<'a> {
    pub data: NodeData,
    pub target: TypeReferenceNode<'a>,
}

#[derive(Debug)]
pub enum EnumMemberOrSpread<'a> {
    EnumMember(EnumMember<'a>),
    EnumSpreadMember(EnumSpreadMember<'a>),
}

impl<'a> EnumMemberOrSpread<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            EnumMemberOrSpread::EnumMember(n) => &n.data,
            EnumMemberOrSpread::EnumSpreadMember(n) => &n.data,
        }
    }
}

/// `name` or `name: "value"` / `name: 3`
#[derive(Debug)]
pub struct EnumMember<'a> {
    pub data: NodeData,
    pub id: PropertyName<'a>,
    /// String or numeric literal.
    pub value: Option<&'a Expression<'a>>,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `...OtherEnum`
#[derive(Debug)]
pub struct EnumSpreadMember<'a> {
    pub data: NodeData,
    pub target: TypeReferenceNode<'a>,
}

/// `name: T` or bare `T` inside a union statement.
#[derive(Debug)]
pub struct UnionVariant<'a> {
    pub data: NodeData,
    pub id: Option<PropertyName<'a>>,
    pub value: &'a Expression<'a>,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `(params): ReturnType`
#[derive(Debug)]
pub struct OperationSignatureDeclaration<'a> {
    pub data: NodeData,
    /// The parameter list is a model expression; operation parameters are
    /// model properties and spreads.
    pub parameters: ModelExpression<'a>,
    pub return_type: &'a Expression<'a>,
}

/// `is BaseOperation`
#[derive(Debug)]
pub struct OperationSignatureReference<'a> {
    pub data: NodeData,
    pub base_operation: TypeReferenceNode<'a>,
}

#[derive(Debug)]
pub enum OperationSignature<'a> {
    Declaration(OperationSignatureDeclaration<'a>),
    Reference(OperationSignatureReference<'a>),
}

impl<'a> OperationSignature<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            OperationSignature::Declaration(n) => &n.data,
            OperationSignature::Reference(n) => &n.data,
        }
    }
}

/// A parameter of a `fn` or `dec` declaration.
#[derive(Debug)]
pub struct FunctionParameter<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
    pub type_annotation: Option<&'a Expression<'a>>,
    pub optional: bool,
    pub rest: bool,
}

/// `T`, `T extends C`, `T = D` inside `<...>`.
#[derive(Debug)]
pub struct TemplateParameterDeclaration<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
    pub constraint: Option<&'a Expression<'a>>,
    pub default: Option<&'a Expression<'a>>,
}

/// A modifier keyword on a declaration (currently only `extern`).
#[derive(Debug, Clone)]
pub struct Modifier {
    pub data: NodeData,
}

// ============================================================================
// Decorations
// ============================================================================

/// `@target(args)`
#[derive(Debug)]
pub struct DecoratorExpression<'a> {
    pub data: NodeData,
    /// `Identifier` or `MemberExpression`.
    pub target: &'a Expression<'a>,
    pub arguments: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub enum DirectiveArgument<'a> {
    StringLiteral(StringLiteralNode<'a>),
    Identifier(IdentifierNode<'a>),
}

impl<'a> DirectiveArgument<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            DirectiveArgument::StringLiteral(n) => &n.data,
            DirectiveArgument::Identifier(n) => &n.data,
        }
    }
}

/// `#name args…` terminated by a newline.
#[derive(Debug)]
pub struct DirectiveExpression<'a> {
    pub data: NodeData,
    pub target: IdentifierNode<'a>,
    pub arguments: NodeList<'a, DirectiveArgument<'a>>,
}

// ============================================================================
// Doc comments
// ============================================================================

/// A parsed `/** … */` doc comment.
#[derive(Debug)]
pub struct Doc<'a> {
    pub data: NodeData,
    /// Content before the first tag.
    pub content: NodeList<'a, DocTextNode<'a>>,
    pub tags: NodeList<'a, DocTag<'a>>,
}

#[derive(Debug)]
pub struct DocTextNode<'a> {
    pub data: NodeData,
    pub text: &'a str,
}

#[derive(Debug)]
pub enum DocTag<'a> {
    Param(DocParamTag<'a>),
    Template(DocTemplateTag<'a>),
    Returns(DocReturnsTag<'a>),
    Unknown(DocUnknownTag<'a>),
}

impl<'a> DocTag<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            DocTag::Param(n) => &n.data,
            DocTag::Template(n) => &n.data,
            DocTag::Returns(n) => &n.data,
            DocTag::Unknown(n) => &n.data,
        }
    }
}

/// `@param name description`
#[derive(Debug)]
pub struct DocParamTag<'a> {
    pub data: NodeData,
    pub tag_name: IdentifierNode<'a>,
    pub param_name: IdentifierNode<'a>,
    pub content: NodeList<'a, DocTextNode<'a>>,
}

/// `@template T description`
#[derive(Debug)]
pub struct DocTemplateTag<'a> {
    pub data: NodeData,
    pub tag_name: IdentifierNode<'a>,
    pub param_name: IdentifierNode<'a>,
    pub content: NodeList<'a, DocTextNode<'a>>,
}

/// `@returns description`
#[derive(Debug)]
pub struct DocReturnsTag<'a> {
    pub data: NodeData,
    pub tag_name: IdentifierNode<'a>,
    pub content: NodeList<'a, DocTextNode<'a>>,
}

/// Any other `@tag description`.
#[derive(Debug)]
pub struct DocUnknownTag<'a> {
    pub data: NodeData,
    pub tag_name: IdentifierNode<'a>,
    pub content: NodeList<'a, DocTextNode<'a>>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug)]
pub enum Statement<'a> {
    ImportStatement(ImportStatement<'a>),
    ModelStatement(ModelStatement<'a>),
    ScalarStatement(ScalarStatement<'a>),
    NamespaceStatement(NamespaceStatement<'a>),
    InterfaceStatement(InterfaceStatement<'a>),
    UnionStatement(UnionStatement<'a>),
    OperationStatement(OperationStatement<'a>),
    EnumStatement(EnumStatement<'a>),
    AliasStatement(AliasStatement<'a>),
    UsingStatement(UsingStatement<'a>),
    ProjectionStatement(ProjectionStatement<'a>),
    DecoratorDeclarationStatement(DecoratorDeclarationStatement<'a>),
    FunctionDeclarationStatement(FunctionDeclarationStatement<'a>),
    AugmentDecoratorStatement(AugmentDecoratorStatement<'a>),
    EmptyStatement(EmptyStatement),
    InvalidStatement(InvalidStatement<'a>),
}

impl<'a> Statement<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Statement::ImportStatement(n) => &n.data,
            Statement::ModelStatement(n) => &n.data,
            Statement::ScalarStatement(n) => &n.data,
            Statement::NamespaceStatement(n) => &n.data,
            Statement::InterfaceStatement(n) => &n.data,
            Statement::UnionStatement(n) => &n.data,
            Statement::OperationStatement(n) => &n.data,
            Statement::EnumStatement(n) => &n.data,
            Statement::AliasStatement(n) => &n.data,
            Statement::UsingStatement(n) => &n.data,
            Statement::ProjectionStatement(n) => &n.data,
            Statement::DecoratorDeclarationStatement(n) => &n.data,
            Statement::FunctionDeclarationStatement(n) => &n.data,
            Statement::AugmentDecoratorStatement(n) => &n.data,
            Statement::EmptyStatement(n) => &n.data,
            Statement::InvalidStatement(n) => &n.data,
        }
    }
}

/// `import "path";`
#[derive(Debug)]
pub struct ImportStatement<'a> {
    pub data: NodeData,
    pub path: StringLiteralNode<'a>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `model M<T> extends B { … }` / `model M is B;`
#[derive(Debug)]
pub struct ModelStatement<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
    pub template_parameters: NodeList<'a, TemplateParameterDeclaration<'a>>,
    pub extends: Option<&'a Expression<'a>>,
    pub is: Option<&'a Expression<'a>>,
    pub properties: NodeList<'a, ModelPropertyOrSpread<'a>>,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `scalar S<T> extends Base;`
#[derive(Debug)]
pub struct ScalarStatement<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
    pub template_parameters: NodeList<'a, TemplateParameterDeclaration<'a>>,
    pub extends: Option<TypeReferenceNode<'a>>,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// The body of a namespace statement. A dotted name `namespace A.B.C`
/// nests: each outer segment's body is the next inner namespace node; the
/// innermost segment holds the braced statements, or `None` when the
/// namespace is blockless.
#[derive(Debug)]
pub enum NamespaceBody<'a> {
    Statements(NodeList<'a, Statement<'a>>),
    Namespace(&'a NamespaceStatement<'a>),
}

/// `namespace A.B { … }` / `namespace A.B.C;`
#[derive(Debug)]
pub struct NamespaceStatement<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
    pub statements: Option<NamespaceBody<'a>>,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

impl<'a> NamespaceStatement<'a> {
    /// Whether this namespace (following its nested chain) ends without a
    /// braced body, i.e. was written `namespace A.B.C;`.
    pub fn is_blockless(&self) -> bool {
        match &self.statements {
            None => true,
            Some(NamespaceBody::Namespace(inner)) => inner.is_blockless(),
            Some(NamespaceBody::Statements(_)) => false,
        }
    }
}

/// `interface I<T> extends A, B { op members }`
#[derive(Debug)]
pub struct InterfaceStatement<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
    pub template_parameters: NodeList<'a, TemplateParameterDeclaration<'a>>,
    pub extends: NodeList<'a, TypeReferenceNode<'a>>,
    pub operations: NodeList<'a, OperationStatement<'a>>,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `union U<T> { variants }`
#[derive(Debug)]
pub struct UnionStatement<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
    pub template_parameters: NodeList<'a, TemplateParameterDeclaration<'a>>,
    pub options: NodeList<'a, UnionVariant<'a>>,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `op name<T>(params): Return;` / `op name is Base;`
#[derive(Debug)]
pub struct OperationStatement<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
    pub template_parameters: NodeList<'a, TemplateParameterDeclaration<'a>>,
    pub signature: OperationSignature<'a>,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `enum E { members }`
#[derive(Debug)]
pub struct EnumStatement<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
    pub members: NodeList<'a, EnumMemberOrSpread<'a>>,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `alias A<T> = expr;`
#[derive(Debug)]
pub struct AliasStatement<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
    pub template_parameters: NodeList<'a, TemplateParameterDeclaration<'a>>,
    pub value: &'a Expression<'a>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `using A.B;`
#[derive(Debug)]
pub struct UsingStatement<'a> {
    pub data: NodeData,
    /// `Identifier` or `MemberExpression`.
    pub name: &'a Expression<'a>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// The declaration-kind selector of a projection statement.
#[derive(Debug)]
pub enum ProjectionSelector<'a> {
    Model(ProjectionModelSelector),
    Operation(ProjectionOperationSelector),
    Union(ProjectionUnionSelector),
    Interface(ProjectionInterfaceSelector),
    Enum(ProjectionEnumSelector),
    Identifier(IdentifierNode<'a>),
    MemberExpression(MemberExpression<'a>),
}

impl<'a> ProjectionSelector<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            ProjectionSelector::Model(n) => &n.data,
            ProjectionSelector::Operation(n) => &n.data,
            ProjectionSelector::Union(n) => &n.data,
            ProjectionSelector::Interface(n) => &n.data,
            ProjectionSelector::Enum(n) => &n.data,
            ProjectionSelector::Identifier(n) => &n.data,
            ProjectionSelector::MemberExpression(n) => &n.data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectionModelSelector {
    pub data: NodeData,
}

#[derive(Debug, Clone)]
pub struct ProjectionOperationSelector {
    pub data: NodeData,
}

#[derive(Debug, Clone)]
pub struct ProjectionUnionSelector {
    pub data: NodeData,
}

#[derive(Debug, Clone)]
pub struct ProjectionInterfaceSelector {
    pub data: NodeData,
}

#[derive(Debug, Clone)]
pub struct ProjectionEnumSelector {
    pub data: NodeData,
}

/// `projection selector#name { from { … } to { … } }`
#[derive(Debug)]
pub struct ProjectionStatement<'a> {
    pub data: NodeData,
    pub selector: ProjectionSelector<'a>,
    pub id: IdentifierNode<'a>,
    pub to: Option<Projection<'a>>,
    pub from: Option<Projection<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionDirection {
    To,
    From,
}

/// One direction of a projection: `to(args) { body }`.
#[derive(Debug)]
pub struct Projection<'a> {
    pub data: NodeData,
    pub direction: ProjectionDirection,
    pub direction_id: IdentifierNode<'a>,
    pub parameters: NodeList<'a, ProjectionParameterDeclaration<'a>>,
    pub body: NodeList<'a, ProjectionExpressionStatement<'a>>,
}

#[derive(Debug)]
pub struct ProjectionParameterDeclaration<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
}

/// `extern dec name(target, args…);`
#[derive(Debug)]
pub struct DecoratorDeclarationStatement<'a> {
    pub data: NodeData,
    pub modifiers: NodeList<'a, Modifier>,
    pub modifier_flags: ModifierFlags,
    pub id: IdentifierNode<'a>,
    /// The first parameter: the target the decorator applies to. `None`
    /// only when recovery found no parameters at all.
    pub target: Option<&'a FunctionParameter<'a>>,
    pub parameters: NodeList<'a, FunctionParameter<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `extern fn name(args…): Return;`
#[derive(Debug)]
pub struct FunctionDeclarationStatement<'a> {
    pub data: NodeData,
    pub modifiers: NodeList<'a, Modifier>,
    pub modifier_flags: ModifierFlags,
    pub id: IdentifierNode<'a>,
    pub parameters: NodeList<'a, FunctionParameter<'a>>,
    pub return_type: Option<&'a Expression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `@@target(targetType, args…);`
#[derive(Debug)]
pub struct AugmentDecoratorStatement<'a> {
    pub data: NodeData,
    /// `Identifier` or `MemberExpression`.
    pub target: &'a Expression<'a>,
    pub target_type: TypeReferenceNode<'a>,
    pub arguments: NodeList<'a, Expression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

/// `;`
#[derive(Debug)]
pub struct EmptyStatement {
    pub data: NodeData,
}

/// A run of tokens that could not be parsed as a statement.
#[derive(Debug)]
pub struct InvalidStatement<'a> {
    pub data: NodeData,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
}

// ============================================================================
// Projection expressions
// ============================================================================

#[derive(Debug)]
pub enum ProjectionExpression<'a> {
    Identifier(IdentifierNode<'a>),
    StringLiteral(StringLiteralNode<'a>),
    NumericLiteral(NumericLiteralNode<'a>),
    BooleanLiteral(BooleanLiteralNode),
    VoidKeyword(VoidKeywordNode),
    NeverKeyword(NeverKeywordNode),
    UnknownKeyword(UnknownKeywordNode),
    If(ProjectionIfExpression<'a>),
    Block(ProjectionBlockExpression<'a>),
    Member(ProjectionMemberExpression<'a>),
    Call(ProjectionCallExpression<'a>),
    Logical(ProjectionLogicalExpression<'a>),
    Equality(ProjectionEqualityExpression<'a>),
    Relational(ProjectionRelationalExpression<'a>),
    Arithmetic(ProjectionArithmeticExpression<'a>),
    Unary(ProjectionUnaryExpression<'a>),
    Lambda(ProjectionLambdaExpression<'a>),
    Model(ProjectionModelExpression<'a>),
    Tuple(ProjectionTupleExpression<'a>),
    DecoratorReference(ProjectionDecoratorReferenceExpression<'a>),
    Return(ReturnExpression<'a>),
}

impl<'a> ProjectionExpression<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            ProjectionExpression::Identifier(n) => &n.data,
            ProjectionExpression::StringLiteral(n) => &n.data,
            ProjectionExpression::NumericLiteral(n) => &n.data,
            ProjectionExpression::BooleanLiteral(n) => &n.data,
            ProjectionExpression::VoidKeyword(n) => &n.data,
            ProjectionExpression::NeverKeyword(n) => &n.data,
            ProjectionExpression::UnknownKeyword(n) => &n.data,
            ProjectionExpression::If(n) => &n.data,
            ProjectionExpression::Block(n) => &n.data,
            ProjectionExpression::Member(n) => &n.data,
            ProjectionExpression::Call(n) => &n.data,
            ProjectionExpression::Logical(n) => &n.data,
            ProjectionExpression::Equality(n) => &n.data,
            ProjectionExpression::Relational(n) => &n.data,
            ProjectionExpression::Arithmetic(n) => &n.data,
            ProjectionExpression::Unary(n) => &n.data,
            ProjectionExpression::Lambda(n) => &n.data,
            ProjectionExpression::Model(n) => &n.data,
            ProjectionExpression::Tuple(n) => &n.data,
            ProjectionExpression::DecoratorReference(n) => &n.data,
            ProjectionExpression::Return(n) => &n.data,
        }
    }
}

/// An expression statement inside a projection body, `expr;`.
#[derive(Debug)]
pub struct ProjectionExpressionStatement<'a> {
    pub data: NodeData,
    pub expr: &'a ProjectionExpression<'a>,
}

/// `{ statements }`
#[derive(Debug)]
pub struct ProjectionBlockExpression<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, ProjectionExpressionStatement<'a>>,
}

/// `if test { … } else if … { … } else { … }`
#[derive(Debug)]
pub struct ProjectionIfExpression<'a> {
    pub data: NodeData,
    pub test: &'a ProjectionExpression<'a>,
    pub consequent: ProjectionBlockExpression<'a>,
    /// A block expression or a chained if expression.
    pub alternate: Option<&'a ProjectionExpression<'a>>,
}

/// `(x, y) => { body }`
#[derive(Debug)]
pub struct ProjectionLambdaExpression<'a> {
    pub data: NodeData,
    pub parameters: NodeList<'a, ProjectionLambdaParameterDeclaration<'a>>,
    pub body: ProjectionBlockExpression<'a>,
}

#[derive(Debug)]
pub struct ProjectionLambdaParameterDeclaration<'a> {
    pub data: NodeData,
    pub id: IdentifierNode<'a>,
}

/// The accessor used in a projection member expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSelector {
    Dot,
    ColonColon,
}

/// `base.id` / `base::id`
#[derive(Debug)]
pub struct ProjectionMemberExpression<'a> {
    pub data: NodeData,
    pub base: &'a ProjectionExpression<'a>,
    pub id: IdentifierNode<'a>,
    pub selector: MemberSelector,
}

/// `target(args)`
#[derive(Debug)]
pub struct ProjectionCallExpression<'a> {
    pub data: NodeData,
    pub target: &'a ProjectionExpression<'a>,
    pub arguments: NodeList<'a, ProjectionExpression<'a>>,
}

/// `left || right` / `left && right`
#[derive(Debug)]
pub struct ProjectionLogicalExpression<'a> {
    pub data: NodeData,
    pub op: SyntaxKind,
    pub left: &'a ProjectionExpression<'a>,
    pub right: &'a ProjectionExpression<'a>,
}

/// `left == right` / `left != right`
#[derive(Debug)]
pub struct ProjectionEqualityExpression<'a> {
    pub data: NodeData,
    pub op: SyntaxKind,
    pub left: &'a ProjectionExpression<'a>,
    pub right: &'a ProjectionExpression<'a>,
}

/// `left < right` and friends.
#[derive(Debug)]
pub struct ProjectionRelationalExpression<'a> {
    pub data: NodeData,
    pub op: SyntaxKind,
    pub left: &'a ProjectionExpression<'a>,
    pub right: &'a ProjectionExpression<'a>,
}

/// `left + right` and friends.
#[derive(Debug)]
pub struct ProjectionArithmeticExpression<'a> {
    pub data: NodeData,
    pub op: SyntaxKind,
    pub left: &'a ProjectionExpression<'a>,
    pub right: &'a ProjectionExpression<'a>,
}

/// `!target`
#[derive(Debug)]
pub struct ProjectionUnaryExpression<'a> {
    pub data: NodeData,
    pub op: SyntaxKind,
    pub target: &'a ProjectionExpression<'a>,
}

#[derive(Debug)]
pub enum ProjectionModelPropertyOrSpread<'a> {
    Property(ProjectionModelProperty<'a>),
    Spread(ProjectionModelSpreadProperty<'a>),
}

impl<'a> ProjectionModelPropertyOrSpread<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            ProjectionModelPropertyOrSpread::Property(n) => &n.data,
            ProjectionModelPropertyOrSpread::Spread(n) => &n.data,
        }
    }
}

/// `{ props }` inside a projection.
#[derive(Debug)]
pub struct ProjectionModelExpression<'a> {
    pub data: NodeData,
    pub properties: NodeList<'a, ProjectionModelPropertyOrSpread<'a>>,
}

#[derive(Debug)]
pub struct ProjectionModelProperty<'a> {
    pub data: NodeData,
    pub id: PropertyName<'a>,
    pub value: &'a ProjectionExpression<'a>,
    pub optional: bool,
    pub default: Option<&'a ProjectionExpression<'a>>,
    pub decorators: NodeList<'a, DecoratorExpression<'a>>,
    pub directives: NodeList<'a, DirectiveExpression<'a>>,
    pub docs: NodeList<'a, Doc<'a>>,
}

#[derive(Debug)]
pub struct ProjectionModelSpreadProperty<'a> {
    pub data: NodeData,
    pub target: &'a ProjectionExpression<'a>,
}

/// `[a, b]` inside a projection.
#[derive(Debug)]
pub struct ProjectionTupleExpression<'a> {
    pub data: NodeData,
    pub values: NodeList<'a, ProjectionExpression<'a>>,
}

/// `@target` — a reference to a decorator by name.
#[derive(Debug)]
pub struct ProjectionDecoratorReferenceExpression<'a> {
    pub data: NodeData,
    pub target: &'a ProjectionExpression<'a>,
}

/// `return value`
#[derive(Debug)]
pub struct ReturnExpression<'a> {
    pub data: NodeData,
    pub value: &'a ProjectionExpression<'a>,
}
