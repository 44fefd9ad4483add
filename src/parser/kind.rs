//! Closed set of tree-sitter Java node kinds.
//!
//! Every named node kind the grammar can produce maps to one `SyntaxKind`
//! variant. Policy tables match on this enum exhaustively, so adding a
//! variant forces every table to decide what to do with it. Kind strings
//! that are not listed here resolve to `None` and surface as policy gaps.

macro_rules! syntax_kinds {
    ($($variant:ident => $name:literal,)*) => {
        /// A named node kind of the tree-sitter Java grammar.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SyntaxKind {
            $($variant,)*
        }

        impl SyntaxKind {
            /// Every known kind, in declaration order.
            pub const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$variant,)*];

            /// Resolve a grammar kind string.
            pub fn from_grammar_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(SyntaxKind::$variant),)*
                    _ => None,
                }
            }

            /// The grammar's own name for this kind.
            pub fn grammar_name(self) -> &'static str {
                match self {
                    $(SyntaxKind::$variant => $name,)*
                }
            }
        }
    };
}

syntax_kinds! {
    // Compilation unit and top-level declarations
    Program => "program",
    PackageDeclaration => "package_declaration",
    ImportDeclaration => "import_declaration",
    Asterisk => "asterisk",
    ModuleDeclaration => "module_declaration",
    ModuleBody => "module_body",
    RequiresModuleDirective => "requires_module_directive",
    RequiresModifier => "requires_modifier",
    ExportsModuleDirective => "exports_module_directive",
    OpensModuleDirective => "opens_module_directive",
    UsesModuleDirective => "uses_module_directive",
    ProvidesModuleDirective => "provides_module_directive",

    // Type declarations
    ClassDeclaration => "class_declaration",
    InterfaceDeclaration => "interface_declaration",
    RecordDeclaration => "record_declaration",
    EnumDeclaration => "enum_declaration",
    AnnotationTypeDeclaration => "annotation_type_declaration",
    ClassBody => "class_body",
    InterfaceBody => "interface_body",
    EnumBody => "enum_body",
    EnumBodyDeclarations => "enum_body_declarations",
    EnumConstant => "enum_constant",
    AnnotationTypeBody => "annotation_type_body",
    AnnotationTypeElementDeclaration => "annotation_type_element_declaration",
    Superclass => "superclass",
    SuperInterfaces => "super_interfaces",
    ExtendsInterfaces => "extends_interfaces",
    Permits => "permits",
    TypeList => "type_list",

    // Members
    FieldDeclaration => "field_declaration",
    ConstantDeclaration => "constant_declaration",
    MethodDeclaration => "method_declaration",
    ConstructorDeclaration => "constructor_declaration",
    CompactConstructorDeclaration => "compact_constructor_declaration",
    ConstructorBody => "constructor_body",
    ExplicitConstructorInvocation => "explicit_constructor_invocation",
    StaticInitializer => "static_initializer",
    FormalParameters => "formal_parameters",
    FormalParameter => "formal_parameter",
    SpreadParameter => "spread_parameter",
    ReceiverParameter => "receiver_parameter",
    InferredParameters => "inferred_parameters",
    TypeParameters => "type_parameters",
    TypeParameter => "type_parameter",
    TypeBound => "type_bound",
    Throws => "throws",
    Modifiers => "modifiers",
    VariableDeclarator => "variable_declarator",

    // Annotations
    MarkerAnnotation => "marker_annotation",
    Annotation => "annotation",
    AnnotationArgumentList => "annotation_argument_list",
    ElementValuePair => "element_value_pair",
    ElementValueArrayInitializer => "element_value_array_initializer",

    // Statements
    Block => "block",
    LocalVariableDeclaration => "local_variable_declaration",
    ExpressionStatement => "expression_statement",
    LabeledStatement => "labeled_statement",
    IfStatement => "if_statement",
    WhileStatement => "while_statement",
    DoStatement => "do_statement",
    ForStatement => "for_statement",
    EnhancedForStatement => "enhanced_for_statement",
    BreakStatement => "break_statement",
    ContinueStatement => "continue_statement",
    ReturnStatement => "return_statement",
    YieldStatement => "yield_statement",
    ThrowStatement => "throw_statement",
    AssertStatement => "assert_statement",
    SynchronizedStatement => "synchronized_statement",
    TryStatement => "try_statement",
    TryWithResourcesStatement => "try_with_resources_statement",
    ResourceSpecification => "resource_specification",
    Resource => "resource",
    CatchClause => "catch_clause",
    CatchFormalParameter => "catch_formal_parameter",
    CatchType => "catch_type",
    FinallyClause => "finally_clause",
    SwitchExpression => "switch_expression",
    SwitchBlock => "switch_block",
    SwitchBlockStatementGroup => "switch_block_statement_group",
    SwitchRule => "switch_rule",
    SwitchLabel => "switch_label",
    Guard => "guard",

    // Expressions
    AssignmentExpression => "assignment_expression",
    BinaryExpression => "binary_expression",
    UnaryExpression => "unary_expression",
    UpdateExpression => "update_expression",
    TernaryExpression => "ternary_expression",
    CastExpression => "cast_expression",
    InstanceofExpression => "instanceof_expression",
    LambdaExpression => "lambda_expression",
    MethodInvocation => "method_invocation",
    ArgumentList => "argument_list",
    ObjectCreationExpression => "object_creation_expression",
    FieldAccess => "field_access",
    ArrayAccess => "array_access",
    ArrayCreationExpression => "array_creation_expression",
    ArrayInitializer => "array_initializer",
    MethodReference => "method_reference",
    ClassLiteral => "class_literal",
    ParenthesizedExpression => "parenthesized_expression",
    TemplateExpression => "template_expression",
    This => "this",
    Super => "super",
    Identifier => "identifier",
    ScopedIdentifier => "scoped_identifier",

    // Patterns
    TypePattern => "type_pattern",
    RecordPattern => "record_pattern",
    RecordPatternBody => "record_pattern_body",
    RecordPatternComponent => "record_pattern_component",
    UnderscorePattern => "underscore_pattern",
    Pattern => "pattern",

    // Literals
    DecimalIntegerLiteral => "decimal_integer_literal",
    HexIntegerLiteral => "hex_integer_literal",
    OctalIntegerLiteral => "octal_integer_literal",
    BinaryIntegerLiteral => "binary_integer_literal",
    DecimalFloatingPointLiteral => "decimal_floating_point_literal",
    HexFloatingPointLiteral => "hex_floating_point_literal",
    True => "true",
    False => "false",
    CharacterLiteral => "character_literal",
    StringLiteral => "string_literal",
    StringFragment => "string_fragment",
    MultilineStringFragment => "multiline_string_fragment",
    EscapeSequence => "escape_sequence",
    StringInterpolation => "string_interpolation",
    NullLiteral => "null_literal",

    // Types
    VoidType => "void_type",
    IntegralType => "integral_type",
    FloatingPointType => "floating_point_type",
    BooleanType => "boolean_type",
    TypeIdentifier => "type_identifier",
    ScopedTypeIdentifier => "scoped_type_identifier",
    GenericType => "generic_type",
    TypeArguments => "type_arguments",
    Wildcard => "wildcard",
    ArrayType => "array_type",
    AnnotatedType => "annotated_type",
    Dimensions => "dimensions",
    DimensionsExpr => "dimensions_expr",

    // Extras
    LineComment => "line_comment",
    BlockComment => "block_comment",
}

impl SyntaxKind {
    /// Kinds that declare a type or a member and may carry modifiers.
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::RecordDeclaration
                | SyntaxKind::EnumDeclaration
                | SyntaxKind::AnnotationTypeDeclaration
                | SyntaxKind::AnnotationTypeElementDeclaration
                | SyntaxKind::FieldDeclaration
                | SyntaxKind::ConstantDeclaration
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::ConstructorDeclaration
                | SyntaxKind::CompactConstructorDeclaration
        )
    }

    /// Kinds that introduce a named type in a block or class body.
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::RecordDeclaration
                | SyntaxKind::EnumDeclaration
                | SyntaxKind::AnnotationTypeDeclaration
        )
    }
}
