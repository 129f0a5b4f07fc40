//! Tree traversal utilities: structural child iteration, position-based
//! node resolution, and lazy parse-error propagation.
//!
//! [`Node`] is a borrowed view over every node type in the tree. The
//! exhaustive matches below are deliberate: adding a node kind without
//! extending traversal is a compile error, which is the update-forcing
//! check the tree model relies on.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use crate::types::NodeFlags;
use adl_core::text::TextPos;

// ============================================================================
// Node view
// ============================================================================

/// A borrowed, type-erased view of any tree node.
#[derive(Clone, Copy)]
pub enum Node<'a> {
    Script(&'a AdlScript<'a>),
    // Statements
    Import(&'a ImportStatement<'a>),
    Model(&'a ModelStatement<'a>),
    Scalar(&'a ScalarStatement<'a>),
    Namespace(&'a NamespaceStatement<'a>),
    Interface(&'a InterfaceStatement<'a>),
    Union(&'a UnionStatement<'a>),
    Operation(&'a OperationStatement<'a>),
    Enum(&'a EnumStatement<'a>),
    Alias(&'a AliasStatement<'a>),
    Using(&'a UsingStatement<'a>),
    ProjectionStatement(&'a ProjectionStatement<'a>),
    DecoratorDeclaration(&'a DecoratorDeclarationStatement<'a>),
    FunctionDeclaration(&'a FunctionDeclarationStatement<'a>),
    AugmentDecorator(&'a AugmentDecoratorStatement<'a>),
    Empty(&'a EmptyStatement),
    Invalid(&'a InvalidStatement<'a>),
    // Expressions
    Identifier(&'a IdentifierNode<'a>),
    Member(&'a MemberExpression<'a>),
    TypeReference(&'a TypeReferenceNode<'a>),
    UnionExpression(&'a UnionExpression<'a>),
    IntersectionExpression(&'a IntersectionExpression<'a>),
    ArrayExpression(&'a ArrayExpression<'a>),
    TupleExpression(&'a TupleExpression<'a>),
    ModelExpression(&'a ModelExpression<'a>),
    StringLiteral(&'a StringLiteralNode<'a>),
    NumericLiteral(&'a NumericLiteralNode<'a>),
    BooleanLiteral(&'a BooleanLiteralNode),
    VoidKeyword(&'a VoidKeywordNode),
    NeverKeyword(&'a NeverKeywordNode),
    UnknownKeyword(&'a UnknownKeywordNode),
    // Members
    ModelProperty(&'a ModelProperty<'a>),
    ModelSpreadProperty(&'a ModelSpreadProperty<'a>),
    EnumMember(&'a EnumMember<'a>),
    EnumSpreadMember(&'a EnumSpreadMember<'a>),
    UnionVariant(&'a UnionVariant<'a>),
    OperationSignatureDeclaration(&'a OperationSignatureDeclaration<'a>),
    OperationSignatureReference(&'a OperationSignatureReference<'a>),
    FunctionParameter(&'a FunctionParameter<'a>),
    TemplateParameter(&'a TemplateParameterDeclaration<'a>),
    Modifier(&'a Modifier),
    // Decorations
    Decorator(&'a DecoratorExpression<'a>),
    Directive(&'a DirectiveExpression<'a>),
    // Docs
    Doc(&'a Doc<'a>),
    DocText(&'a DocTextNode<'a>),
    DocParamTag(&'a DocParamTag<'a>),
    DocReturnsTag(&'a DocReturnsTag<'a>),
    DocTemplateTag(&'a DocTemplateTag<'a>),
    DocUnknownTag(&'a DocUnknownTag<'a>),
    // Projections
    Projection(&'a Projection<'a>),
    ProjectionParameter(&'a ProjectionParameterDeclaration<'a>),
    ProjectionModelSelector(&'a ProjectionModelSelector),
    ProjectionOperationSelector(&'a ProjectionOperationSelector),
    ProjectionUnionSelector(&'a ProjectionUnionSelector),
    ProjectionInterfaceSelector(&'a ProjectionInterfaceSelector),
    ProjectionEnumSelector(&'a ProjectionEnumSelector),
    ProjectionExpressionStatement(&'a ProjectionExpressionStatement<'a>),
    ProjectionBlock(&'a ProjectionBlockExpression<'a>),
    ProjectionIf(&'a ProjectionIfExpression<'a>),
    ProjectionLambda(&'a ProjectionLambdaExpression<'a>),
    ProjectionLambdaParameter(&'a ProjectionLambdaParameterDeclaration<'a>),
    ProjectionMember(&'a ProjectionMemberExpression<'a>),
    ProjectionCall(&'a ProjectionCallExpression<'a>),
    ProjectionLogical(&'a ProjectionLogicalExpression<'a>),
    ProjectionEquality(&'a ProjectionEqualityExpression<'a>),
    ProjectionRelational(&'a ProjectionRelationalExpression<'a>),
    ProjectionArithmetic(&'a ProjectionArithmeticExpression<'a>),
    ProjectionUnary(&'a ProjectionUnaryExpression<'a>),
    ProjectionModelExpression(&'a ProjectionModelExpression<'a>),
    ProjectionModelProperty(&'a ProjectionModelProperty<'a>),
    ProjectionModelSpreadProperty(&'a ProjectionModelSpreadProperty<'a>),
    ProjectionTuple(&'a ProjectionTupleExpression<'a>),
    ProjectionDecoratorReference(&'a ProjectionDecoratorReferenceExpression<'a>),
    ProjectionReturn(&'a ReturnExpression<'a>),
}

impl<'a> Node<'a> {
    /// The shared node data of the underlying node.
    pub fn data(self) -> &'a NodeData {
        match self {
            Node::Script(n) => &n.data,
            Node::Import(n) => &n.data,
            Node::Model(n) => &n.data,
            Node::Scalar(n) => &n.data,
            Node::Namespace(n) => &n.data,
            Node::Interface(n) => &n.data,
            Node::Union(n) => &n.data,
            Node::Operation(n) => &n.data,
            Node::Enum(n) => &n.data,
            Node::Alias(n) => &n.data,
            Node::Using(n) => &n.data,
            Node::ProjectionStatement(n) => &n.data,
            Node::DecoratorDeclaration(n) => &n.data,
            Node::FunctionDeclaration(n) => &n.data,
            Node::AugmentDecorator(n) => &n.data,
            Node::Empty(n) => &n.data,
            Node::Invalid(n) => &n.data,
            Node::Identifier(n) => &n.data,
            Node::Member(n) => &n.data,
            Node::TypeReference(n) => &n.data,
            Node::UnionExpression(n) => &n.data,
            Node::IntersectionExpression(n) => &n.data,
            Node::ArrayExpression(n) => &n.data,
            Node::TupleExpression(n) => &n.data,
            Node::ModelExpression(n) => &n.data,
            Node::StringLiteral(n) => &n.data,
            Node::NumericLiteral(n) => &n.data,
            Node::BooleanLiteral(n) => &n.data,
            Node::VoidKeyword(n) => &n.data,
            Node::NeverKeyword(n) => &n.data,
            Node::UnknownKeyword(n) => &n.data,
            Node::ModelProperty(n) => &n.data,
            Node::ModelSpreadProperty(n) => &n.data,
            Node::EnumMember(n) => &n.data,
            Node::EnumSpreadMember(n) => &n.data,
            Node::UnionVariant(n) => &n.data,
            Node::OperationSignatureDeclaration(n) => &n.data,
            Node::OperationSignatureReference(n) => &n.data,
            Node::FunctionParameter(n) => &n.data,
            Node::TemplateParameter(n) => &n.data,
            Node::Modifier(n) => &n.data,
            Node::Decorator(n) => &n.data,
            Node::Directive(n) => &n.data,
            Node::Doc(n) => &n.data,
            Node::DocText(n) => &n.data,
            Node::DocParamTag(n) => &n.data,
            Node::DocReturnsTag(n) => &n.data,
            Node::DocTemplateTag(n) => &n.data,
            Node::DocUnknownTag(n) => &n.data,
            Node::Projection(n) => &n.data,
            Node::ProjectionParameter(n) => &n.data,
            Node::ProjectionModelSelector(n) => &n.data,
            Node::ProjectionOperationSelector(n) => &n.data,
            Node::ProjectionUnionSelector(n) => &n.data,
            Node::ProjectionInterfaceSelector(n) => &n.data,
            Node::ProjectionEnumSelector(n) => &n.data,
            Node::ProjectionExpressionStatement(n) => &n.data,
            Node::ProjectionBlock(n) => &n.data,
            Node::ProjectionIf(n) => &n.data,
            Node::ProjectionLambda(n) => &n.data,
            Node::ProjectionLambdaParameter(n) => &n.data,
            Node::ProjectionMember(n) => &n.data,
            Node::ProjectionCall(n) => &n.data,
            Node::ProjectionLogical(n) => &n.data,
            Node::ProjectionEquality(n) => &n.data,
            Node::ProjectionRelational(n) => &n.data,
            Node::ProjectionArithmetic(n) => &n.data,
            Node::ProjectionUnary(n) => &n.data,
            Node::ProjectionModelExpression(n) => &n.data,
            Node::ProjectionModelProperty(n) => &n.data,
            Node::ProjectionModelSpreadProperty(n) => &n.data,
            Node::ProjectionTuple(n) => &n.data,
            Node::ProjectionDecoratorReference(n) => &n.data,
            Node::ProjectionReturn(n) => &n.data,
        }
    }

    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.data().kind
    }

    #[inline]
    pub fn pos(self) -> TextPos {
        self.data().pos()
    }

    #[inline]
    pub fn end(self) -> TextPos {
        self.data().end()
    }

    /// Whether two views refer to the same underlying node.
    pub fn same(self, other: Node<'a>) -> bool {
        std::ptr::eq(self.data(), other.data())
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({:?}, {:?})", self.kind(), self.data().range)
    }
}

/// Wrap a statement in its node view.
pub fn statement_node<'a>(stmt: &'a Statement<'a>) -> Node<'a> {
    match stmt {
        Statement::ImportStatement(n) => Node::Import(n),
        Statement::ModelStatement(n) => Node::Model(n),
        Statement::ScalarStatement(n) => Node::Scalar(n),
        Statement::NamespaceStatement(n) => Node::Namespace(n),
        Statement::InterfaceStatement(n) => Node::Interface(n),
        Statement::UnionStatement(n) => Node::Union(n),
        Statement::OperationStatement(n) => Node::Operation(n),
        Statement::EnumStatement(n) => Node::Enum(n),
        Statement::AliasStatement(n) => Node::Alias(n),
        Statement::UsingStatement(n) => Node::Using(n),
        Statement::ProjectionStatement(n) => Node::ProjectionStatement(n),
        Statement::DecoratorDeclarationStatement(n) => Node::DecoratorDeclaration(n),
        Statement::FunctionDeclarationStatement(n) => Node::FunctionDeclaration(n),
        Statement::AugmentDecoratorStatement(n) => Node::AugmentDecorator(n),
        Statement::EmptyStatement(n) => Node::Empty(n),
        Statement::InvalidStatement(n) => Node::Invalid(n),
    }
}

/// Wrap an expression in its node view.
pub fn expression_node<'a>(expr: &'a Expression<'a>) -> Node<'a> {
    match expr {
        Expression::Identifier(n) => Node::Identifier(n),
        Expression::MemberExpression(n) => Node::Member(n),
        Expression::TypeReference(n) => Node::TypeReference(n),
        Expression::UnionExpression(n) => Node::UnionExpression(n),
        Expression::IntersectionExpression(n) => Node::IntersectionExpression(n),
        Expression::ArrayExpression(n) => Node::ArrayExpression(n),
        Expression::TupleExpression(n) => Node::TupleExpression(n),
        Expression::ModelExpression(n) => Node::ModelExpression(n),
        Expression::StringLiteral(n) => Node::StringLiteral(n),
        Expression::NumericLiteral(n) => Node::NumericLiteral(n),
        Expression::BooleanLiteral(n) => Node::BooleanLiteral(n),
        Expression::VoidKeyword(n) => Node::VoidKeyword(n),
        Expression::NeverKeyword(n) => Node::NeverKeyword(n),
        Expression::UnknownKeyword(n) => Node::UnknownKeyword(n),
    }
}

/// Wrap a projection expression in its node view.
pub fn projection_expression_node<'a>(expr: &'a ProjectionExpression<'a>) -> Node<'a> {
    match expr {
        ProjectionExpression::Identifier(n) => Node::Identifier(n),
        ProjectionExpression::StringLiteral(n) => Node::StringLiteral(n),
        ProjectionExpression::NumericLiteral(n) => Node::NumericLiteral(n),
        ProjectionExpression::BooleanLiteral(n) => Node::BooleanLiteral(n),
        ProjectionExpression::VoidKeyword(n) => Node::VoidKeyword(n),
        ProjectionExpression::NeverKeyword(n) => Node::NeverKeyword(n),
        ProjectionExpression::UnknownKeyword(n) => Node::UnknownKeyword(n),
        ProjectionExpression::If(n) => Node::ProjectionIf(n),
        ProjectionExpression::Block(n) => Node::ProjectionBlock(n),
        ProjectionExpression::Member(n) => Node::ProjectionMember(n),
        ProjectionExpression::Call(n) => Node::ProjectionCall(n),
        ProjectionExpression::Logical(n) => Node::ProjectionLogical(n),
        ProjectionExpression::Equality(n) => Node::ProjectionEquality(n),
        ProjectionExpression::Relational(n) => Node::ProjectionRelational(n),
        ProjectionExpression::Arithmetic(n) => Node::ProjectionArithmetic(n),
        ProjectionExpression::Unary(n) => Node::ProjectionUnary(n),
        ProjectionExpression::Lambda(n) => Node::ProjectionLambda(n),
        ProjectionExpression::Model(n) => Node::ProjectionModelExpression(n),
        ProjectionExpression::Tuple(n) => Node::ProjectionTuple(n),
        ProjectionExpression::DecoratorReference(n) => Node::ProjectionDecoratorReference(n),
        ProjectionExpression::Return(n) => Node::ProjectionReturn(n),
    }
}

fn property_name_node<'a>(name: &'a PropertyName<'a>) -> Node<'a> {
    match name {
        PropertyName::Identifier(n) => Node::Identifier(n),
        PropertyName::StringLiteral(n) => Node::StringLiteral(n),
    }
}

fn doc_tag_node<'a>(tag: &'a DocTag<'a>) -> Node<'a> {
    match tag {
        DocTag::Param(n) => Node::DocParamTag(n),
        DocTag::Template(n) => Node::DocTemplateTag(n),
        DocTag::Returns(n) => Node::DocReturnsTag(n),
        DocTag::Unknown(n) => Node::DocUnknownTag(n),
    }
}

fn selector_node<'a>(sel: &'a ProjectionSelector<'a>) -> Node<'a> {
    match sel {
        ProjectionSelector::Model(n) => Node::ProjectionModelSelector(n),
        ProjectionSelector::Operation(n) => Node::ProjectionOperationSelector(n),
        ProjectionSelector::Union(n) => Node::ProjectionUnionSelector(n),
        ProjectionSelector::Interface(n) => Node::ProjectionInterfaceSelector(n),
        ProjectionSelector::Enum(n) => Node::ProjectionEnumSelector(n),
        ProjectionSelector::Identifier(n) => Node::Identifier(n),
        ProjectionSelector::MemberExpression(n) => Node::Member(n),
    }
}

// ============================================================================
// Structural child iteration
// ============================================================================

/// Invoke `cb` for each direct child of `node`, directives and docs first,
/// then kind-specific children in declaration order.
pub fn visit_children<'a>(node: Node<'a>, cb: &mut dyn FnMut(Node<'a>)) {
    // Annotation preludes come first so traversal follows source order.
    match node {
        Node::Import(n) => visit_annotations(cb, &[], n.directives, n.docs),
        Node::Model(n) => visit_annotations(cb, n.decorators, n.directives, n.docs),
        Node::Scalar(n) => visit_annotations(cb, n.decorators, n.directives, n.docs),
        Node::Namespace(n) => visit_annotations(cb, n.decorators, n.directives, n.docs),
        Node::Interface(n) => visit_annotations(cb, n.decorators, n.directives, n.docs),
        Node::Union(n) => visit_annotations(cb, n.decorators, n.directives, n.docs),
        Node::Operation(n) => visit_annotations(cb, n.decorators, n.directives, n.docs),
        Node::Enum(n) => visit_annotations(cb, n.decorators, n.directives, n.docs),
        Node::Alias(n) => visit_annotations(cb, &[], n.directives, n.docs),
        Node::Using(n) => visit_annotations(cb, &[], n.directives, n.docs),
        Node::ProjectionStatement(n) => visit_annotations(cb, &[], n.directives, n.docs),
        Node::DecoratorDeclaration(n) => visit_annotations(cb, &[], n.directives, n.docs),
        Node::FunctionDeclaration(n) => visit_annotations(cb, &[], n.directives, n.docs),
        Node::AugmentDecorator(n) => visit_annotations(cb, &[], n.directives, n.docs),
        Node::ModelProperty(n) => visit_annotations(cb, n.decorators, n.directives, n.docs),
        Node::EnumMember(n) => visit_annotations(cb, n.decorators, n.directives, n.docs),
        Node::UnionVariant(n) => visit_annotations(cb, n.decorators, n.directives, n.docs),
        Node::ProjectionModelProperty(n) => {
            visit_annotations(cb, n.decorators, n.directives, n.docs)
        }
        _ => {}
    }

    match node {
        Node::Script(n) => {
            cb(Node::Identifier(&n.id));
            for stmt in n.statements {
                cb(statement_node(stmt));
            }
            for doc in n.docs {
                cb(Node::Doc(doc));
            }
        }
        Node::Import(n) => {
            cb(Node::StringLiteral(&n.path));
        }
        Node::Model(n) => {
            cb(Node::Identifier(&n.id));
            for tp in n.template_parameters {
                cb(Node::TemplateParameter(tp));
            }
            if let Some(extends) = n.extends {
                cb(expression_node(extends));
            }
            if let Some(is) = n.is {
                cb(expression_node(is));
            }
            for prop in n.properties {
                cb(model_property_node(prop));
            }
        }
        Node::Scalar(n) => {
            cb(Node::Identifier(&n.id));
            for tp in n.template_parameters {
                cb(Node::TemplateParameter(tp));
            }
            if let Some(extends) = &n.extends {
                cb(Node::TypeReference(extends));
            }
        }
        Node::Namespace(n) => {
            cb(Node::Identifier(&n.id));
            match &n.statements {
                Some(NamespaceBody::Statements(stmts)) => {
                    for stmt in *stmts {
                        cb(statement_node(stmt));
                    }
                }
                Some(NamespaceBody::Namespace(inner)) => cb(Node::Namespace(inner)),
                None => {}
            }
        }
        Node::Interface(n) => {
            cb(Node::Identifier(&n.id));
            for tp in n.template_parameters {
                cb(Node::TemplateParameter(tp));
            }
            for heritage in n.extends {
                cb(Node::TypeReference(heritage));
            }
            for op in n.operations {
                cb(Node::Operation(op));
            }
        }
        Node::Union(n) => {
            cb(Node::Identifier(&n.id));
            for tp in n.template_parameters {
                cb(Node::TemplateParameter(tp));
            }
            for variant in n.options {
                cb(Node::UnionVariant(variant));
            }
        }
        Node::Operation(n) => {
            cb(Node::Identifier(&n.id));
            for tp in n.template_parameters {
                cb(Node::TemplateParameter(tp));
            }
            match &n.signature {
                OperationSignature::Declaration(sig) => {
                    cb(Node::OperationSignatureDeclaration(sig))
                }
                OperationSignature::Reference(sig) => cb(Node::OperationSignatureReference(sig)),
            }
        }
        Node::Enum(n) => {
            cb(Node::Identifier(&n.id));
            for member in n.members {
                match member {
                    EnumMemberOrSpread::EnumMember(m) => cb(Node::EnumMember(m)),
                    EnumMemberOrSpread::EnumSpreadMember(m) => cb(Node::EnumSpreadMember(m)),
                }
            }
        }
        Node::Alias(n) => {
            cb(Node::Identifier(&n.id));
            for tp in n.template_parameters {
                cb(Node::TemplateParameter(tp));
            }
            cb(expression_node(n.value));
        }
        Node::Using(n) => {
            cb(expression_node(n.name));
        }
        Node::ProjectionStatement(n) => {
            cb(selector_node(&n.selector));
            cb(Node::Identifier(&n.id));
            if let Some(from) = &n.from {
                cb(Node::Projection(from));
            }
            if let Some(to) = &n.to {
                cb(Node::Projection(to));
            }
        }
        Node::DecoratorDeclaration(n) => {
            for modifier in n.modifiers {
                cb(Node::Modifier(modifier));
            }
            cb(Node::Identifier(&n.id));
            if let Some(target) = n.target {
                cb(Node::FunctionParameter(target));
            }
            for param in n.parameters {
                cb(Node::FunctionParameter(param));
            }
        }
        Node::FunctionDeclaration(n) => {
            for modifier in n.modifiers {
                cb(Node::Modifier(modifier));
            }
            cb(Node::Identifier(&n.id));
            for param in n.parameters {
                cb(Node::FunctionParameter(param));
            }
            if let Some(return_type) = n.return_type {
                cb(expression_node(return_type));
            }
        }
        Node::AugmentDecorator(n) => {
            cb(expression_node(n.target));
            cb(Node::TypeReference(&n.target_type));
            for arg in n.arguments {
                cb(expression_node(arg));
            }
        }
        Node::Empty(_) => {}
        Node::Invalid(n) => {
            for decorator in n.decorators {
                cb(Node::Decorator(decorator));
            }
        }
        Node::Identifier(_) => {}
        Node::Member(n) => {
            cb(expression_node(n.base));
            cb(Node::Identifier(&n.id));
        }
        Node::TypeReference(n) => {
            cb(expression_node(n.target));
            for arg in n.arguments {
                cb(expression_node(arg));
            }
        }
        Node::UnionExpression(n) => {
            for option in n.options {
                cb(expression_node(option));
            }
        }
        Node::IntersectionExpression(n) => {
            for option in n.options {
                cb(expression_node(option));
            }
        }
        Node::ArrayExpression(n) => {
            cb(expression_node(n.element_type));
        }
        Node::TupleExpression(n) => {
            for value in n.values {
                cb(expression_node(value));
            }
        }
        Node::ModelExpression(n) => {
            for prop in n.properties {
                cb(model_property_node(prop));
            }
        }
        Node::StringLiteral(_)
        | Node::NumericLiteral(_)
        | Node::BooleanLiteral(_)
        | Node::VoidKeyword(_)
        | Node::NeverKeyword(_)
        | Node::UnknownKeyword(_) => {}
        Node::ModelProperty(n) => {
            cb(property_name_node(&n.id));
            cb(expression_node(n.value));
            if let Some(default) = n.default {
                cb(expression_node(default));
            }
        }
        Node::ModelSpreadProperty(n) => {
            cb(Node::TypeReference(&n.target));
        }
        Node::EnumMember(n) => {
            cb(property_name_node(&n.id));
            if let Some(value) = n.value {
                cb(expression_node(value));
            }
        }
        Node::EnumSpreadMember(n) => {
            cb(Node::TypeReference(&n.target));
        }
        Node::UnionVariant(n) => {
            if let Some(id) = &n.id {
                cb(property_name_node(id));
            }
            cb(expression_node(n.value));
        }
        Node::OperationSignatureDeclaration(n) => {
            cb(Node::ModelExpression(&n.parameters));
            cb(expression_node(n.return_type));
        }
        Node::OperationSignatureReference(n) => {
            cb(Node::TypeReference(&n.base_operation));
        }
        Node::FunctionParameter(n) => {
            cb(Node::Identifier(&n.id));
            if let Some(type_annotation) = n.type_annotation {
                cb(expression_node(type_annotation));
            }
        }
        Node::TemplateParameter(n) => {
            cb(Node::Identifier(&n.id));
            if let Some(constraint) = n.constraint {
                cb(expression_node(constraint));
            }
            if let Some(default) = n.default {
                cb(expression_node(default));
            }
        }
        Node::Modifier(_) => {}
        Node::Decorator(n) => {
            cb(expression_node(n.target));
            for arg in n.arguments {
                cb(expression_node(arg));
            }
        }
        Node::Directive(n) => {
            cb(Node::Identifier(&n.target));
            for arg in n.arguments {
                match arg {
                    DirectiveArgument::StringLiteral(lit) => cb(Node::StringLiteral(lit)),
                    DirectiveArgument::Identifier(id) => cb(Node::Identifier(id)),
                }
            }
        }
        Node::Doc(n) => {
            for text in n.content {
                cb(Node::DocText(text));
            }
            for tag in n.tags {
                cb(doc_tag_node(tag));
            }
        }
        Node::DocText(_) => {}
        Node::DocParamTag(n) => {
            cb(Node::Identifier(&n.tag_name));
            cb(Node::Identifier(&n.param_name));
            for text in n.content {
                cb(Node::DocText(text));
            }
        }
        Node::DocTemplateTag(n) => {
            cb(Node::Identifier(&n.tag_name));
            cb(Node::Identifier(&n.param_name));
            for text in n.content {
                cb(Node::DocText(text));
            }
        }
        Node::DocReturnsTag(n) => {
            cb(Node::Identifier(&n.tag_name));
            for text in n.content {
                cb(Node::DocText(text));
            }
        }
        Node::DocUnknownTag(n) => {
            cb(Node::Identifier(&n.tag_name));
            for text in n.content {
                cb(Node::DocText(text));
            }
        }
        Node::Projection(n) => {
            cb(Node::Identifier(&n.direction_id));
            for param in n.parameters {
                cb(Node::ProjectionParameter(param));
            }
            for stmt in n.body {
                cb(Node::ProjectionExpressionStatement(stmt));
            }
        }
        Node::ProjectionParameter(n) => {
            cb(Node::Identifier(&n.id));
        }
        Node::ProjectionModelSelector(_)
        | Node::ProjectionOperationSelector(_)
        | Node::ProjectionUnionSelector(_)
        | Node::ProjectionInterfaceSelector(_)
        | Node::ProjectionEnumSelector(_) => {}
        Node::ProjectionExpressionStatement(n) => {
            cb(projection_expression_node(n.expr));
        }
        Node::ProjectionBlock(n) => {
            for stmt in n.statements {
                cb(Node::ProjectionExpressionStatement(stmt));
            }
        }
        Node::ProjectionIf(n) => {
            cb(projection_expression_node(n.test));
            cb(Node::ProjectionBlock(&n.consequent));
            if let Some(alternate) = n.alternate {
                cb(projection_expression_node(alternate));
            }
        }
        Node::ProjectionLambda(n) => {
            for param in n.parameters {
                cb(Node::ProjectionLambdaParameter(param));
            }
            cb(Node::ProjectionBlock(&n.body));
        }
        Node::ProjectionLambdaParameter(n) => {
            cb(Node::Identifier(&n.id));
        }
        Node::ProjectionMember(n) => {
            cb(projection_expression_node(n.base));
            cb(Node::Identifier(&n.id));
        }
        Node::ProjectionCall(n) => {
            cb(projection_expression_node(n.target));
            for arg in n.arguments {
                cb(projection_expression_node(arg));
            }
        }
        Node::ProjectionLogical(n) => {
            cb(projection_expression_node(n.left));
            cb(projection_expression_node(n.right));
        }
        Node::ProjectionEquality(n) => {
            cb(projection_expression_node(n.left));
            cb(projection_expression_node(n.right));
        }
        Node::ProjectionRelational(n) => {
            cb(projection_expression_node(n.left));
            cb(projection_expression_node(n.right));
        }
        Node::ProjectionArithmetic(n) => {
            cb(projection_expression_node(n.left));
            cb(projection_expression_node(n.right));
        }
        Node::ProjectionUnary(n) => {
            cb(projection_expression_node(n.target));
        }
        Node::ProjectionModelExpression(n) => {
            for prop in n.properties {
                match prop {
                    ProjectionModelPropertyOrSpread::Property(p) => {
                        cb(Node::ProjectionModelProperty(p))
                    }
                    ProjectionModelPropertyOrSpread::Spread(p) => {
                        cb(Node::ProjectionModelSpreadProperty(p))
                    }
                }
            }
        }
        Node::ProjectionModelProperty(n) => {
            cb(property_name_node(&n.id));
            cb(projection_expression_node(n.value));
            if let Some(default) = n.default {
                cb(projection_expression_node(default));
            }
        }
        Node::ProjectionModelSpreadProperty(n) => {
            cb(projection_expression_node(n.target));
        }
        Node::ProjectionTuple(n) => {
            for value in n.values {
                cb(projection_expression_node(value));
            }
        }
        Node::ProjectionDecoratorReference(n) => {
            cb(projection_expression_node(n.target));
        }
        Node::ProjectionReturn(n) => {
            cb(projection_expression_node(n.value));
        }
    }
}

fn visit_annotations<'a>(
    cb: &mut dyn FnMut(Node<'a>),
    decorators: NodeList<'a, DecoratorExpression<'a>>,
    directives: NodeList<'a, DirectiveExpression<'a>>,
    docs: NodeList<'a, Doc<'a>>,
) {
    for directive in directives {
        cb(Node::Directive(directive));
    }
    for doc in docs {
        cb(Node::Doc(doc));
    }
    for decorator in decorators {
        cb(Node::Decorator(decorator));
    }
}

fn model_property_node<'a>(prop: &'a ModelPropertyOrSpread<'a>) -> Node<'a> {
    match prop {
        ModelPropertyOrSpread::ModelProperty(p) => Node::ModelProperty(p),
        ModelPropertyOrSpread::ModelSpreadProperty(p) => Node::ModelSpreadProperty(p),
    }
}

// ============================================================================
// Position queries
// ============================================================================

/// Find the deepest node whose inclusive range `[pos, end]` contains
/// `position`, preferring children over their parents.
pub fn get_node_at_position<'a>(script: &'a AdlScript<'a>, position: TextPos) -> Node<'a> {
    get_node_at_position_filtered(script, position, &|_| true).unwrap_or(Node::Script(script))
}

/// Like [`get_node_at_position`], returning the deepest containing node
/// that satisfies `filter`.
pub fn get_node_at_position_filtered<'a>(
    script: &'a AdlScript<'a>,
    position: TextPos,
    filter: &dyn Fn(Node<'a>) -> bool,
) -> Option<Node<'a>> {
    fn visit<'a>(
        node: Node<'a>,
        position: TextPos,
        filter: &dyn Fn(Node<'a>) -> bool,
    ) -> Option<Node<'a>> {
        if !node.data().range.contains_inclusive(position) {
            return None;
        }
        let mut found = None;
        visit_children(node, &mut |child| {
            if found.is_none() {
                found = visit(child, position, filter);
            }
        });
        found.or_else(|| if filter(node) { Some(node) } else { None })
    }
    visit(Node::Script(script), position, filter)
}

// ============================================================================
// Parse error propagation
// ============================================================================

/// Whether `node` or any of its descendants carries a parse error.
///
/// The descendant scan runs at most once per node: its result is memoized
/// into `DESCENDANT_HAS_ERROR` / `DESCENDANT_ERRORS_EXAMINED`, set with
/// monotonic atomic ORs, so repeated calls are cheap and idempotent.
pub fn has_parse_error(node: Node<'_>) -> bool {
    let flags = node.data().flags();
    if flags.contains(NodeFlags::THIS_NODE_HAS_ERROR) {
        return true;
    }
    check_descendants(node)
}

fn check_descendants(node: Node<'_>) -> bool {
    let data = node.data();
    let flags = data.flags();
    if flags.contains(NodeFlags::DESCENDANT_ERRORS_EXAMINED) {
        return flags.contains(NodeFlags::DESCENDANT_HAS_ERROR);
    }
    let mut found = false;
    visit_children(node, &mut |child| {
        if !found && has_parse_error(child) {
            found = true;
        }
    });
    if found {
        data.add_flags(NodeFlags::DESCENDANT_HAS_ERROR);
    }
    data.add_flags(NodeFlags::DESCENDANT_ERRORS_EXAMINED);
    found
}

// ============================================================================
// Ancestor queries
// ============================================================================

/// The path of nodes from the script root down to `target`, inclusive on
/// both ends. Empty when `target` is not part of `script`'s tree.
pub fn get_ancestors<'a>(script: &'a AdlScript<'a>, target: Node<'a>) -> Vec<Node<'a>> {
    let mut path = Vec::new();
    find_path(Node::Script(script), target, &mut path);
    path
}

fn find_path<'a>(node: Node<'a>, target: Node<'a>, path: &mut Vec<Node<'a>>) -> bool {
    path.push(node);
    if node.same(target) {
        return true;
    }
    let range = node.data().range;
    let target_range = target.data().range;
    if !(range.pos <= target_range.pos && target_range.end <= range.end) {
        path.pop();
        return false;
    }
    let mut found = false;
    visit_children(node, &mut |child| {
        if !found && find_path(child, target, path) {
            found = true;
        }
    });
    if !found {
        path.pop();
    }
    found
}

/// The nearest ancestor of `node` (excluding `node` itself) satisfying
/// `pred`.
pub fn get_first_ancestor<'a>(
    script: &'a AdlScript<'a>,
    node: Node<'a>,
    pred: &dyn Fn(Node<'a>) -> bool,
) -> Option<Node<'a>> {
    let path = get_ancestors(script, node);
    path.iter()
        .rev()
        .skip(1)
        .copied()
        .find(|ancestor| pred(*ancestor))
}

/// Whether a statement node is an import statement.
pub fn is_import_statement(node: Node<'_>) -> bool {
    matches!(node, Node::Import(_))
}

// ============================================================================
// Identifier context
// ============================================================================

/// What grammatical position an identifier occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    TypeReference,
    Decorator,
    Function,
    Using,
    Declaration,
    Other,
}

/// Classify the context an identifier appears in by walking up through any
/// enclosing member expressions to the first meaningful ancestor.
pub fn get_identifier_context<'a>(
    script: &'a AdlScript<'a>,
    id: &'a IdentifierNode<'a>,
) -> IdentifierKind {
    let path = get_ancestors(script, Node::Identifier(id));
    if path.is_empty() {
        return IdentifierKind::Other;
    }
    // Walk up past member-expression wrappers.
    let mut index = path.len() - 1;
    while index > 0 {
        match path[index - 1] {
            Node::Member(_) | Node::ProjectionMember(_) => index -= 1,
            _ => break,
        }
    }
    if index == 0 {
        return IdentifierKind::Other;
    }
    let ancestor = path[index - 1];
    match ancestor {
        Node::Decorator(_) | Node::AugmentDecorator(_) | Node::ProjectionDecoratorReference(_) => {
            IdentifierKind::Decorator
        }
        Node::ProjectionCall(_) => IdentifierKind::Function,
        Node::Using(_) => IdentifierKind::Using,
        Node::TypeReference(_) => IdentifierKind::TypeReference,
        Node::Model(n) => declaration_or_other(&n.id, id),
        Node::Scalar(n) => declaration_or_other(&n.id, id),
        Node::Namespace(n) => declaration_or_other(&n.id, id),
        Node::Interface(n) => declaration_or_other(&n.id, id),
        Node::Union(n) => declaration_or_other(&n.id, id),
        Node::Operation(n) => declaration_or_other(&n.id, id),
        Node::Enum(n) => declaration_or_other(&n.id, id),
        Node::Alias(n) => declaration_or_other(&n.id, id),
        Node::DecoratorDeclaration(n) => declaration_or_other(&n.id, id),
        Node::FunctionDeclaration(n) => declaration_or_other(&n.id, id),
        Node::TemplateParameter(n) => declaration_or_other(&n.id, id),
        _ => IdentifierKind::Other,
    }
}

fn declaration_or_other<'a>(decl_id: &'a IdentifierNode<'a>, id: &'a IdentifierNode<'a>) -> IdentifierKind {
    if std::ptr::eq(&decl_id.data, &id.data) {
        IdentifierKind::Declaration
    } else {
        IdentifierKind::Other
    }
}
