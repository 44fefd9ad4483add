//! Coarse-grained policy table.
//!
//! Drops type metadata, annotations, enums, switch/case, casts and labels
//! along with their subtrees. Operators keep a fixed `binaryop`/`unaryop`
//! tag with the symbol as value, loop headers are grouped under
//! `condition`, and variable declarations are spliced into their parent.

use super::policy::{OperatorStyle, Policy, PolicyTable, Slot, SlotPolicy};
use crate::parser::SyntaxKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct CoarsePolicy;

impl PolicyTable for CoarsePolicy {
    fn name(&self) -> &'static str {
        "coarse"
    }

    fn policy(&self, kind: SyntaxKind) -> Policy {
        match kind {
            SyntaxKind::Program => Policy::Transformed("root"),
            SyntaxKind::ImportDeclaration => Policy::Transformed("import"),
            SyntaxKind::PackageDeclaration
            | SyntaxKind::Asterisk
            | SyntaxKind::ModuleDeclaration
            | SyntaxKind::ModuleBody
            | SyntaxKind::RequiresModuleDirective
            | SyntaxKind::RequiresModifier
            | SyntaxKind::ExportsModuleDirective
            | SyntaxKind::OpensModuleDirective
            | SyntaxKind::UsesModuleDirective
            | SyntaxKind::ProvidesModuleDirective => Policy::Drop,

            // Type declarations
            SyntaxKind::ClassDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::RecordDeclaration => Policy::Transformed("classdef"),
            SyntaxKind::ClassBody | SyntaxKind::InterfaceBody => Policy::PassThrough,
            SyntaxKind::EnumDeclaration
            | SyntaxKind::EnumBody
            | SyntaxKind::EnumBodyDeclarations
            | SyntaxKind::EnumConstant
            | SyntaxKind::AnnotationTypeDeclaration
            | SyntaxKind::AnnotationTypeBody
            | SyntaxKind::AnnotationTypeElementDeclaration
            | SyntaxKind::Superclass
            | SyntaxKind::SuperInterfaces
            | SyntaxKind::ExtendsInterfaces
            | SyntaxKind::Permits
            | SyntaxKind::TypeList => Policy::Drop,

            // Members
            SyntaxKind::FieldDeclaration
            | SyntaxKind::ConstantDeclaration
            | SyntaxKind::LocalVariableDeclaration => Policy::PassThrough,
            SyntaxKind::VariableDeclarator => Policy::Transformed("var"),
            SyntaxKind::MethodDeclaration
            | SyntaxKind::ConstructorDeclaration
            | SyntaxKind::CompactConstructorDeclaration => Policy::Transformed("funcdef"),
            SyntaxKind::ConstructorBody => Policy::Transformed("block"),
            SyntaxKind::ExplicitConstructorInvocation => Policy::Transformed("call"),
            SyntaxKind::StaticInitializer => Policy::Drop,
            SyntaxKind::FormalParameter | SyntaxKind::SpreadParameter => {
                Policy::Transformed("arg")
            }
            SyntaxKind::FormalParameters | SyntaxKind::InferredParameters => Policy::PassThrough,
            SyntaxKind::ReceiverParameter
            | SyntaxKind::TypeParameters
            | SyntaxKind::TypeParameter
            | SyntaxKind::TypeBound
            | SyntaxKind::Throws
            | SyntaxKind::Modifiers => Policy::Drop,

            // Annotations
            SyntaxKind::MarkerAnnotation
            | SyntaxKind::Annotation
            | SyntaxKind::AnnotationArgumentList
            | SyntaxKind::ElementValuePair
            | SyntaxKind::ElementValueArrayInitializer => Policy::Drop,

            // Statements
            SyntaxKind::Block => Policy::Transformed("block"),
            SyntaxKind::ExpressionStatement => Policy::PassThrough,
            SyntaxKind::LabeledStatement | SyntaxKind::SynchronizedStatement => Policy::Drop,
            SyntaxKind::IfStatement => Policy::Transformed("if"),
            SyntaxKind::WhileStatement | SyntaxKind::DoStatement => Policy::Transformed("while"),
            SyntaxKind::ForStatement | SyntaxKind::EnhancedForStatement => {
                Policy::Transformed("for")
            }
            SyntaxKind::BreakStatement => Policy::Transformed("break"),
            SyntaxKind::ContinueStatement => Policy::Transformed("continue"),
            SyntaxKind::ReturnStatement => Policy::Leaf("return"),
            SyntaxKind::YieldStatement => Policy::Leaf("yield"),
            SyntaxKind::ThrowStatement => Policy::Leaf("throw"),
            SyntaxKind::AssertStatement => Policy::Leaf("assert"),
            SyntaxKind::TryStatement | SyntaxKind::TryWithResourcesStatement => {
                Policy::Transformed("try")
            }
            SyntaxKind::ResourceSpecification | SyntaxKind::Resource => Policy::Drop,
            SyntaxKind::CatchClause => Policy::Transformed("catch"),
            SyntaxKind::CatchFormalParameter | SyntaxKind::CatchType => Policy::Drop,
            SyntaxKind::FinallyClause => Policy::PassThrough,
            SyntaxKind::SwitchExpression
            | SyntaxKind::SwitchBlock
            | SyntaxKind::SwitchBlockStatementGroup
            | SyntaxKind::SwitchRule
            | SyntaxKind::SwitchLabel
            | SyntaxKind::Guard => Policy::Drop,

            // Expressions
            SyntaxKind::AssignmentExpression => Policy::Transformed("assignment"),
            SyntaxKind::BinaryExpression => Policy::Operator(OperatorStyle::Symbolic("binaryop")),
            SyntaxKind::UnaryExpression | SyntaxKind::UpdateExpression => {
                Policy::Operator(OperatorStyle::Symbolic("unaryop"))
            }
            SyntaxKind::TernaryExpression => Policy::Leaf("ternary"),
            SyntaxKind::LambdaExpression => Policy::Transformed("funcdef"),
            SyntaxKind::MethodInvocation | SyntaxKind::ObjectCreationExpression => {
                Policy::Transformed("call")
            }
            SyntaxKind::ArgumentList | SyntaxKind::ParenthesizedExpression => Policy::PassThrough,
            SyntaxKind::FieldAccess | SyntaxKind::MethodReference => {
                Policy::Transformed("AttributeLoad")
            }
            SyntaxKind::ArrayAccess => Policy::Transformed("arrayaccess"),
            SyntaxKind::ArrayCreationExpression => Policy::PassThrough,
            SyntaxKind::ArrayInitializer => Policy::Transformed("ListLoad"),
            SyntaxKind::CastExpression
            | SyntaxKind::InstanceofExpression
            | SyntaxKind::ClassLiteral
            | SyntaxKind::This
            | SyntaxKind::Super
            | SyntaxKind::TemplateExpression
            | SyntaxKind::StringInterpolation => Policy::Drop,
            SyntaxKind::Identifier => Policy::Transformed("identifier"),
            SyntaxKind::ScopedIdentifier => Policy::Leaf("identifier"),

            // Patterns
            SyntaxKind::TypePattern
            | SyntaxKind::RecordPattern
            | SyntaxKind::RecordPatternBody
            | SyntaxKind::RecordPatternComponent
            | SyntaxKind::UnderscorePattern
            | SyntaxKind::Pattern => Policy::Drop,

            // Literals
            SyntaxKind::DecimalIntegerLiteral
            | SyntaxKind::HexIntegerLiteral
            | SyntaxKind::OctalIntegerLiteral
            | SyntaxKind::BinaryIntegerLiteral
            | SyntaxKind::DecimalFloatingPointLiteral
            | SyntaxKind::HexFloatingPointLiteral
            | SyntaxKind::True
            | SyntaxKind::False
            | SyntaxKind::CharacterLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NullLiteral => Policy::Transformed("constant"),
            SyntaxKind::StringFragment
            | SyntaxKind::MultilineStringFragment
            | SyntaxKind::EscapeSequence => Policy::Drop,

            // Types carry no information at this granularity.
            SyntaxKind::VoidType
            | SyntaxKind::IntegralType
            | SyntaxKind::FloatingPointType
            | SyntaxKind::BooleanType
            | SyntaxKind::TypeIdentifier
            | SyntaxKind::ScopedTypeIdentifier
            | SyntaxKind::GenericType
            | SyntaxKind::Wildcard
            | SyntaxKind::ArrayType
            | SyntaxKind::TypeArguments
            | SyntaxKind::AnnotatedType
            | SyntaxKind::Dimensions
            | SyntaxKind::DimensionsExpr => Policy::Drop,

            SyntaxKind::LineComment | SyntaxKind::BlockComment => Policy::Drop,
        }
    }

    fn slot(&self, slot: Slot) -> SlotPolicy {
        match slot {
            Slot::Params => SlotPolicy::Group("param"),
            Slot::LambdaParams => SlotPolicy::Inline,
            Slot::Members => SlotPolicy::Group("block"),
            Slot::Condition => SlotPolicy::Group("condition"),
            Slot::TypeParams | Slot::AnonymousBody | Slot::LocalClass => SlotPolicy::Drop,
        }
    }

    fn keeps_modifiers(&self) -> bool {
        false
    }
}
