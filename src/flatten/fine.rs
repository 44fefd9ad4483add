//! Fine-grained policy table.
//!
//! Keeps type metadata, annotations, enums, switch/case and the rest of
//! the declaration detail. Operators are named semantically (`add`,
//! `lt`, ...) and declarations record their modifiers.

use super::policy::{OperatorStyle, Policy, PolicyTable, Slot, SlotPolicy};
use crate::parser::SyntaxKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct FinePolicy;

impl PolicyTable for FinePolicy {
    fn name(&self) -> &'static str {
        "fine"
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
            SyntaxKind::EnumDeclaration
            | SyntaxKind::EnumConstant
            | SyntaxKind::AnnotationTypeDeclaration
            | SyntaxKind::AnnotationTypeElementDeclaration => Policy::Verbatim,
            SyntaxKind::ClassBody
            | SyntaxKind::InterfaceBody
            | SyntaxKind::EnumBody
            | SyntaxKind::EnumBodyDeclarations
            | SyntaxKind::AnnotationTypeBody => Policy::PassThrough,
            SyntaxKind::Superclass
            | SyntaxKind::SuperInterfaces
            | SyntaxKind::ExtendsInterfaces
            | SyntaxKind::Permits
            | SyntaxKind::TypeList => Policy::Drop,

            // Members
            SyntaxKind::FieldDeclaration
            | SyntaxKind::ConstantDeclaration
            | SyntaxKind::LocalVariableDeclaration => Policy::Transformed("vardec"),
            SyntaxKind::VariableDeclarator => Policy::Transformed("var"),
            SyntaxKind::MethodDeclaration
            | SyntaxKind::ConstructorDeclaration
            | SyntaxKind::CompactConstructorDeclaration => Policy::Transformed("funcdef"),
            SyntaxKind::ConstructorBody => Policy::Transformed("block"),
            SyntaxKind::ExplicitConstructorInvocation => Policy::Transformed("call"),
            SyntaxKind::StaticInitializer => Policy::Verbatim,
            SyntaxKind::FormalParameter | SyntaxKind::SpreadParameter => {
                Policy::Transformed("arg")
            }
            SyntaxKind::ReceiverParameter => Policy::Drop,
            SyntaxKind::FormalParameters
            | SyntaxKind::InferredParameters
            | SyntaxKind::TypeParameters => Policy::PassThrough,
            SyntaxKind::TypeParameter => Policy::Transformed("typearg"),
            SyntaxKind::TypeBound => Policy::Drop,
            SyntaxKind::Throws => Policy::Verbatim,
            SyntaxKind::Modifiers => Policy::PassThrough,

            // Annotations
            SyntaxKind::MarkerAnnotation
            | SyntaxKind::Annotation
            | SyntaxKind::ElementValuePair => Policy::Verbatim,
            SyntaxKind::AnnotationArgumentList => Policy::PassThrough,
            SyntaxKind::ElementValueArrayInitializer => Policy::Transformed("ListLoad"),

            // Statements
            SyntaxKind::Block => Policy::Transformed("block"),
            SyntaxKind::ExpressionStatement => Policy::PassThrough,
            SyntaxKind::LabeledStatement | SyntaxKind::SynchronizedStatement => Policy::Verbatim,
            SyntaxKind::IfStatement => Policy::Transformed("if"),
            SyntaxKind::WhileStatement => Policy::Transformed("while"),
            SyntaxKind::DoStatement => Policy::Transformed("dowhile"),
            SyntaxKind::ForStatement => Policy::Transformed("for"),
            SyntaxKind::EnhancedForStatement => Policy::Transformed("foreach"),
            SyntaxKind::BreakStatement => Policy::Transformed("break"),
            SyntaxKind::ContinueStatement => Policy::Transformed("continue"),
            SyntaxKind::ReturnStatement => Policy::Transformed("return"),
            SyntaxKind::YieldStatement => Policy::Transformed("yield"),
            SyntaxKind::ThrowStatement => Policy::Transformed("throw"),
            SyntaxKind::AssertStatement => Policy::Transformed("assert"),
            SyntaxKind::TryStatement | SyntaxKind::TryWithResourcesStatement => {
                Policy::Transformed("try")
            }
            SyntaxKind::ResourceSpecification | SyntaxKind::Resource => Policy::Drop,
            SyntaxKind::CatchClause => Policy::Transformed("catch"),
            SyntaxKind::CatchFormalParameter | SyntaxKind::CatchType => Policy::Drop,
            SyntaxKind::FinallyClause => Policy::PassThrough,
            SyntaxKind::SwitchExpression => Policy::Transformed("switch"),
            SyntaxKind::SwitchBlock => Policy::PassThrough,
            SyntaxKind::SwitchBlockStatementGroup | SyntaxKind::SwitchRule => {
                Policy::Transformed("case")
            }
            SyntaxKind::SwitchLabel | SyntaxKind::Guard => Policy::Drop,

            // Expressions
            SyntaxKind::AssignmentExpression => Policy::Transformed("assignment"),
            SyntaxKind::BinaryExpression
            | SyntaxKind::UnaryExpression
            | SyntaxKind::UpdateExpression => Policy::Operator(OperatorStyle::Semantic),
            SyntaxKind::TernaryExpression => Policy::Transformed("ternary"),
            SyntaxKind::CastExpression => Policy::Transformed("cast"),
            SyntaxKind::InstanceofExpression => Policy::Verbatim,
            SyntaxKind::LambdaExpression => Policy::Transformed("lambda"),
            SyntaxKind::MethodInvocation | SyntaxKind::ObjectCreationExpression => {
                Policy::Transformed("call")
            }
            SyntaxKind::ArgumentList | SyntaxKind::ParenthesizedExpression => Policy::PassThrough,
            SyntaxKind::FieldAccess => Policy::Transformed("AttributeLoad"),
            SyntaxKind::ArrayAccess => Policy::Transformed("arrayaccess"),
            SyntaxKind::ArrayCreationExpression => Policy::Transformed("arraydec"),
            SyntaxKind::ArrayInitializer => Policy::Transformed("ListLoad"),
            SyntaxKind::MethodReference | SyntaxKind::This | SyntaxKind::Super => Policy::Verbatim,
            SyntaxKind::ClassLiteral => Policy::Transformed("expression"),
            SyntaxKind::TemplateExpression | SyntaxKind::StringInterpolation => Policy::Drop,
            SyntaxKind::Identifier | SyntaxKind::ScopedIdentifier => {
                Policy::Transformed("identifier")
            }

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

            // Types
            SyntaxKind::VoidType
            | SyntaxKind::IntegralType
            | SyntaxKind::FloatingPointType
            | SyntaxKind::BooleanType
            | SyntaxKind::TypeIdentifier
            | SyntaxKind::ScopedTypeIdentifier
            | SyntaxKind::GenericType
            | SyntaxKind::Wildcard
            | SyntaxKind::ArrayType => Policy::Transformed("type"),
            SyntaxKind::TypeArguments
            | SyntaxKind::AnnotatedType
            | SyntaxKind::DimensionsExpr => Policy::PassThrough,
            SyntaxKind::Dimensions => Policy::Drop,

            SyntaxKind::LineComment | SyntaxKind::BlockComment => Policy::Drop,
        }
    }

    fn slot(&self, slot: Slot) -> SlotPolicy {
        match slot {
            Slot::Params | Slot::LambdaParams => SlotPolicy::Group("param"),
            Slot::TypeParams => SlotPolicy::Group("typeparam"),
            Slot::Members => SlotPolicy::Group("block"),
            Slot::Condition | Slot::AnonymousBody | Slot::LocalClass => SlotPolicy::Inline,
        }
    }

    fn keeps_modifiers(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_are_semantic() {
        assert_eq!(
            FinePolicy.policy(SyntaxKind::BinaryExpression),
            Policy::Operator(OperatorStyle::Semantic)
        );
        assert_eq!(
            FinePolicy.policy(SyntaxKind::UpdateExpression),
            Policy::Operator(OperatorStyle::Semantic)
        );
    }

    #[test]
    fn test_keeps_type_metadata() {
        assert_eq!(
            FinePolicy.policy(SyntaxKind::IntegralType),
            Policy::Transformed("type")
        );
        assert_eq!(FinePolicy.policy(SyntaxKind::Throws), Policy::Verbatim);
        assert_eq!(
            FinePolicy.slot(Slot::TypeParams),
            SlotPolicy::Group("typeparam")
        );
    }

    #[test]
    fn test_conditions_are_inline() {
        assert_eq!(FinePolicy.slot(Slot::Condition), SlotPolicy::Inline);
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(FinePolicy.policy(SyntaxKind::LineComment), Policy::Drop);
        assert_eq!(FinePolicy.policy(SyntaxKind::BlockComment), Policy::Drop);
    }
}
