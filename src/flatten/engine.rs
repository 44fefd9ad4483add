//! Depth-first walk that turns a tree-sitter tree into a `NodeTable`.
//!
//! Which nodes appear is decided by the `PolicyTable`; which children a
//! kind has, and in what order, is decided here once for every table.

use tree_sitter::Node;

use super::policy::{
    canonical_binary, canonical_unary, OperatorStyle, Policy, PolicyTable, Slot, SlotPolicy,
};
use super::{FlattenError, NodeTable};
use crate::parser::{ParseMode, ParsedSource, SyntaxKind};

/// Nesting limit of the walk. Corpus workers run with stacks sized for it.
pub const MAX_DEPTH: usize = 4096;

/// Flatten a parsed source under the given policy table.
///
/// In member mode the root's children are the members of the fragment.
pub fn flatten<'t>(
    parsed: &'t ParsedSource,
    table: &'t dyn PolicyTable,
) -> Result<NodeTable, FlattenError> {
    let mut flattener = Flattener {
        table,
        parsed,
        nodes: NodeTable::new(),
        depth: 0,
        declared_type: None,
    };
    flattener.run()?;
    Ok(flattener.nodes)
}

type Ids = Vec<usize>;

struct Flattener<'t> {
    table: &'t dyn PolicyTable,
    parsed: &'t ParsedSource,
    nodes: NodeTable,
    depth: usize,
    /// Type of the declaration whose declarators are being visited.
    declared_type: Option<Node<'t>>,
}

impl<'t> Flattener<'t> {
    fn run(&mut self) -> Result<(), FlattenError> {
        let root = self.nodes.push("root");
        let mut children = Ids::new();

        let top = match self.parsed.mode() {
            ParseMode::File => self.parsed.root(),
            ParseMode::Member => {
                self.parsed
                    .member_body()
                    .ok_or_else(|| FlattenError::Malformed {
                        kind: "program",
                        detail: "member wrapper has no class body".to_string(),
                    })?
            }
        };
        self.named_children(top, &mut children)?;

        self.nodes.node_mut(root).children = children;
        Ok(())
    }

    fn visit(&mut self, node: Node<'t>, out: &mut Ids) -> Result<(), FlattenError> {
        let kind =
            SyntaxKind::from_grammar_name(node.kind()).ok_or_else(|| FlattenError::PolicyGap {
                kind: node.kind().to_string(),
            })?;

        if self.depth >= MAX_DEPTH {
            return Err(FlattenError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;

        let value = self.value(node, kind);
        let modifiers = if self.table.keeps_modifiers() && kind.is_declaration() {
            self.modifiers_text(node)
        } else {
            None
        };
        let result = self.apply(kind, value, modifiers, out, |f, out| f.parts(node, kind, out));

        self.depth -= 1;
        result
    }

    /// Apply the table's policy for `kind`. `parts` visits the children.
    fn apply<F>(
        &mut self,
        kind: SyntaxKind,
        value: Option<String>,
        modifiers: Option<String>,
        out: &mut Ids,
        parts: F,
    ) -> Result<(), FlattenError>
    where
        F: FnOnce(&mut Self, &mut Ids) -> Result<(), FlattenError>,
    {
        let tag = match self.table.policy(kind) {
            Policy::Drop => return Ok(()),
            Policy::PassThrough => return parts(self, out),
            Policy::Leaf(tag) => {
                let id = self.open(tag, value, modifiers);
                out.push(id);
                return Ok(());
            }
            Policy::Verbatim => kind.grammar_name(),
            Policy::Transformed(tag) => tag,
            Policy::Operator(style) => {
                let symbol = value.as_deref().ok_or_else(|| FlattenError::Malformed {
                    kind: kind.grammar_name(),
                    detail: "operator token not found".to_string(),
                })?;
                match style {
                    OperatorStyle::Symbolic(tag) => tag,
                    OperatorStyle::Semantic if kind == SyntaxKind::BinaryExpression => {
                        canonical_binary(symbol)?
                    }
                    OperatorStyle::Semantic => canonical_unary(symbol)?,
                }
            }
        };

        let id = self.open(tag, value, modifiers);
        out.push(id);

        let mut children = Ids::new();
        parts(self, &mut children)?;
        self.nodes.node_mut(id).children = children;
        Ok(())
    }

    fn open(&mut self, tag: &str, value: Option<String>, modifiers: Option<String>) -> usize {
        let id = self.nodes.push(tag);
        let node = self.nodes.node_mut(id);
        node.value = value;
        node.modifiers = modifiers;
        id
    }

    /// Open a synthetic group at a fixed position, as the table decides.
    fn slot<F>(&mut self, slot: Slot, out: &mut Ids, fill: F) -> Result<(), FlattenError>
    where
        F: FnOnce(&mut Self, &mut Ids) -> Result<(), FlattenError>,
    {
        match self.table.slot(slot) {
            SlotPolicy::Drop => Ok(()),
            SlotPolicy::Inline => fill(self, out),
            SlotPolicy::Group(tag) => {
                let id = self.nodes.push(tag);
                out.push(id);
                let mut children = Ids::new();
                fill(self, &mut children)?;
                self.nodes.node_mut(id).children = children;
                Ok(())
            }
        }
    }

    /// Visit the semantic children of `node` in canonical order.
    fn parts(
        &mut self,
        node: Node<'t>,
        kind: SyntaxKind,
        out: &mut Ids,
    ) -> Result<(), FlattenError> {
        match kind {
            SyntaxKind::ImportDeclaration
            | SyntaxKind::PackageDeclaration
            | SyntaxKind::TypeParameter
            | SyntaxKind::ReceiverParameter
            | SyntaxKind::MarkerAnnotation
            | SyntaxKind::BreakStatement
            | SyntaxKind::ContinueStatement
            | SyntaxKind::TemplateExpression
            | SyntaxKind::Identifier
            | SyntaxKind::This
            | SyntaxKind::Super
            | SyntaxKind::VoidType
            | SyntaxKind::IntegralType
            | SyntaxKind::FloatingPointType
            | SyntaxKind::BooleanType
            | SyntaxKind::TypeIdentifier
            | SyntaxKind::ScopedTypeIdentifier
            | SyntaxKind::ArrayType
            | SyntaxKind::Wildcard => Ok(()),

            SyntaxKind::ClassDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::EnumDeclaration
            | SyntaxKind::AnnotationTypeDeclaration => {
                self.modifiers(node, out)?;
                self.slot(Slot::Members, out, |f, out| f.field(node, "body", out))
            }
            SyntaxKind::RecordDeclaration => {
                self.modifiers(node, out)?;
                self.slot(Slot::Params, out, |f, out| f.field(node, "parameters", out))?;
                self.slot(Slot::Members, out, |f, out| f.field(node, "body", out))
            }
            SyntaxKind::EnumConstant => {
                self.modifiers(node, out)?;
                self.field(node, "arguments", out)?;
                self.field(node, "body", out)
            }
            SyntaxKind::AnnotationTypeElementDeclaration => {
                self.modifiers(node, out)?;
                self.field(node, "type", out)?;
                self.field(node, "value", out)
            }

            SyntaxKind::FieldDeclaration
            | SyntaxKind::ConstantDeclaration
            | SyntaxKind::LocalVariableDeclaration => {
                self.modifiers(node, out)?;
                let declared = node.child_by_field_name("type");
                for declarator in field_nodes(node, "declarator") {
                    self.declared_type = declared;
                    self.visit(declarator, out)?;
                }
                self.declared_type = None;
                Ok(())
            }
            SyntaxKind::VariableDeclarator => {
                if let Some(declared) = self.declared_type.take() {
                    self.visit(declared, out)?;
                }
                self.field(node, "value", out)
            }

            SyntaxKind::MethodDeclaration => {
                self.modifiers(node, out)?;
                self.field(node, "type", out)?;
                self.signature(node, out)?;
                self.field(node, "body", out)
            }
            SyntaxKind::ConstructorDeclaration | SyntaxKind::CompactConstructorDeclaration => {
                self.modifiers(node, out)?;
                self.signature(node, out)?;
                self.field(node, "body", out)
            }
            SyntaxKind::ExplicitConstructorInvocation => {
                self.field(node, "object", out)?;
                self.field(node, "arguments", out)
            }
            SyntaxKind::FormalParameter => {
                self.modifiers(node, out)?;
                self.field(node, "type", out)
            }
            SyntaxKind::SpreadParameter => {
                for child in named_nodes(node) {
                    if child.kind() != "variable_declarator" {
                        self.visit(child, out)?;
                    }
                }
                Ok(())
            }

            SyntaxKind::Annotation => self.field(node, "arguments", out),
            SyntaxKind::ElementValuePair => self.field(node, "value", out),

            SyntaxKind::Block => {
                for child in named_nodes(node) {
                    let local_type = SyntaxKind::from_grammar_name(child.kind())
                        .map_or(false, SyntaxKind::is_type_declaration);
                    if local_type {
                        self.slot(Slot::LocalClass, out, |f, out| f.visit(child, out))?;
                    } else {
                        self.visit(child, out)?;
                    }
                }
                Ok(())
            }
            SyntaxKind::LabeledStatement => {
                // The first named child is the label itself.
                for child in named_nodes(node).into_iter().skip(1) {
                    self.visit(child, out)?;
                }
                Ok(())
            }
            SyntaxKind::IfStatement => {
                self.slot(Slot::Condition, out, |f, out| f.field(node, "condition", out))?;
                self.field(node, "consequence", out)?;
                self.field(node, "alternative", out)
            }
            SyntaxKind::WhileStatement | SyntaxKind::DoStatement => {
                self.slot(Slot::Condition, out, |f, out| f.field(node, "condition", out))?;
                self.field(node, "body", out)
            }
            SyntaxKind::ForStatement => {
                self.slot(Slot::Condition, out, |f, out| {
                    f.fields(node, "init", out)?;
                    f.field(node, "condition", out)?;
                    f.fields(node, "update", out)
                })?;
                self.field(node, "body", out)
            }
            SyntaxKind::EnhancedForStatement => {
                self.slot(Slot::Condition, out, |f, out| {
                    f.loop_variable(node, out)?;
                    f.field(node, "value", out)
                })?;
                self.field(node, "body", out)
            }

            SyntaxKind::AssignmentExpression | SyntaxKind::BinaryExpression => {
                self.field(node, "left", out)?;
                self.field(node, "right", out)
            }
            SyntaxKind::UnaryExpression => self.field(node, "operand", out),
            SyntaxKind::CastExpression => {
                self.field(node, "value", out)?;
                self.fields(node, "type", out)
            }
            SyntaxKind::InstanceofExpression => {
                self.field(node, "left", out)?;
                self.field(node, "right", out)?;
                self.field(node, "pattern", out)
            }
            SyntaxKind::LambdaExpression => {
                if let Some(params) = node.child_by_field_name("parameters") {
                    self.slot(Slot::LambdaParams, out, |f, out| f.lambda_params(params, out))?;
                }
                self.field(node, "body", out)
            }
            SyntaxKind::MethodInvocation => {
                self.field(node, "object", out)?;
                self.field(node, "arguments", out)
            }
            SyntaxKind::ObjectCreationExpression => {
                self.field(node, "type", out)?;
                self.field(node, "arguments", out)?;
                if let Some(body) = child_of_kind(node, "class_body") {
                    self.slot(Slot::AnonymousBody, out, |f, out| f.visit(body, out))?;
                }
                Ok(())
            }
            SyntaxKind::FieldAccess => self.field(node, "object", out),
            SyntaxKind::ArrayAccess => {
                self.field(node, "index", out)?;
                self.field(node, "array", out)
            }
            SyntaxKind::ArrayCreationExpression => {
                self.field(node, "type", out)?;
                for dims in named_nodes(node) {
                    if dims.kind() == "dimensions_expr" {
                        self.visit(dims, out)?;
                    }
                }
                self.field(node, "value", out)
            }
            SyntaxKind::MethodReference => match method_reference_scope(node) {
                Some(scope) => self.visit(scope, out),
                None => Ok(()),
            },
            SyntaxKind::ScopedIdentifier => self.field(node, "scope", out),
            SyntaxKind::GenericType => match child_of_kind(node, "type_arguments") {
                Some(arguments) => self.visit(arguments, out),
                None => Ok(()),
            },

            _ => self.named_children(node, out),
        }
    }

    /// Parameter and type parameter groups, then the `throws` clause.
    fn signature(&mut self, node: Node<'t>, out: &mut Ids) -> Result<(), FlattenError> {
        self.slot(Slot::Params, out, |f, out| f.field(node, "parameters", out))?;
        self.slot(Slot::TypeParams, out, |f, out| {
            f.field(node, "type_parameters", out)
        })?;
        match child_of_kind(node, "throws") {
            Some(throws) => self.visit(throws, out),
            None => Ok(()),
        }
    }

    fn lambda_params(&mut self, params: Node<'t>, out: &mut Ids) -> Result<(), FlattenError> {
        match params.kind() {
            "identifier" => self.bare_param(params, out),
            "inferred_parameters" => {
                for param in named_nodes(params) {
                    self.bare_param(param, out)?;
                }
                Ok(())
            }
            _ => self.visit(params, out),
        }
    }

    /// An untyped lambda parameter, emitted as a formal parameter.
    fn bare_param(&mut self, ident: Node<'t>, out: &mut Ids) -> Result<(), FlattenError> {
        let name = self.parsed.node_text(ident);
        self.apply(SyntaxKind::FormalParameter, Some(name), None, out, |_, _| Ok(()))
    }

    /// The loop variable of an enhanced for, emitted as a declarator.
    fn loop_variable(&mut self, node: Node<'t>, out: &mut Ids) -> Result<(), FlattenError> {
        let name = self.field_text(node, "name");
        let declared = node.child_by_field_name("type");
        self.apply(SyntaxKind::VariableDeclarator, name, None, out, |f, out| {
            match declared {
                Some(declared) => f.visit(declared, out),
                None => Ok(()),
            }
        })
    }

    fn modifiers(&mut self, node: Node<'t>, out: &mut Ids) -> Result<(), FlattenError> {
        match child_of_kind(node, "modifiers") {
            Some(modifiers) => self.visit(modifiers, out),
            None => Ok(()),
        }
    }

    fn field(&mut self, node: Node<'t>, name: &str, out: &mut Ids) -> Result<(), FlattenError> {
        match node.child_by_field_name(name) {
            Some(child) => self.visit(child, out),
            None => Ok(()),
        }
    }

    fn fields(&mut self, node: Node<'t>, name: &str, out: &mut Ids) -> Result<(), FlattenError> {
        for child in field_nodes(node, name) {
            self.visit(child, out)?;
        }
        Ok(())
    }

    fn named_children(&mut self, node: Node<'t>, out: &mut Ids) -> Result<(), FlattenError> {
        for child in named_nodes(node) {
            self.visit(child, out)?;
        }
        Ok(())
    }

    fn field_text(&self, node: Node<'t>, name: &str) -> Option<String> {
        node.child_by_field_name(name)
            .map(|child| self.parsed.node_text(child))
    }

    /// Scalar payload of a node: name, literal text or operator symbol.
    fn value(&self, node: Node<'t>, kind: SyntaxKind) -> Option<String> {
        match kind {
            SyntaxKind::ClassDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::RecordDeclaration
            | SyntaxKind::EnumDeclaration
            | SyntaxKind::AnnotationTypeDeclaration
            | SyntaxKind::EnumConstant
            | SyntaxKind::AnnotationTypeElementDeclaration
            | SyntaxKind::MethodDeclaration
            | SyntaxKind::ConstructorDeclaration
            | SyntaxKind::CompactConstructorDeclaration
            | SyntaxKind::FormalParameter
            | SyntaxKind::VariableDeclarator
            | SyntaxKind::MethodInvocation
            | SyntaxKind::ScopedIdentifier
            | SyntaxKind::MarkerAnnotation
            | SyntaxKind::Annotation => self.field_text(node, "name"),
            SyntaxKind::SpreadParameter => child_of_kind(node, "variable_declarator")
                .and_then(|declarator| self.field_text(declarator, "name")),
            SyntaxKind::CatchClause => child_of_kind(node, "catch_formal_parameter")
                .and_then(|param| self.field_text(param, "name")),
            SyntaxKind::TypeParameter => {
                child_of_kind(node, "type_identifier").map(|name| self.parsed.node_text(name))
            }
            SyntaxKind::ImportDeclaration => self.import_path(node),
            SyntaxKind::FieldAccess => self.field_text(node, "field"),
            SyntaxKind::ElementValuePair => self.field_text(node, "key"),
            SyntaxKind::ExplicitConstructorInvocation => self.field_text(node, "constructor"),
            SyntaxKind::LabeledStatement
            | SyntaxKind::BreakStatement
            | SyntaxKind::ContinueStatement => {
                child_of_kind(node, "identifier").map(|label| self.parsed.node_text(label))
            }
            SyntaxKind::AssignmentExpression
            | SyntaxKind::BinaryExpression
            | SyntaxKind::UnaryExpression => self.field_text(node, "operator"),
            SyntaxKind::UpdateExpression => update_operator(node).map(str::to_string),
            SyntaxKind::LambdaExpression => Some("lambda".to_string()),
            SyntaxKind::MethodReference => method_reference_name(node).map(|name| {
                if name.kind() == "new" {
                    "new".to_string()
                } else {
                    self.parsed.node_text(name)
                }
            }),
            SyntaxKind::GenericType => node.named_child(0).map(|base| self.parsed.node_text(base)),

            SyntaxKind::StringLiteral => {
                let text = self.parsed.node_text(node);
                let delimiter = if text.starts_with("\"\"\"") { "\"\"\"" } else { "\"" };
                Some(strip_delimiters(&text, delimiter).to_string())
            }
            SyntaxKind::CharacterLiteral => {
                let text = self.parsed.node_text(node);
                Some(strip_delimiters(&text, "'").to_string())
            }
            SyntaxKind::DecimalIntegerLiteral
            | SyntaxKind::HexIntegerLiteral
            | SyntaxKind::OctalIntegerLiteral
            | SyntaxKind::BinaryIntegerLiteral
            | SyntaxKind::DecimalFloatingPointLiteral
            | SyntaxKind::HexFloatingPointLiteral
            | SyntaxKind::True
            | SyntaxKind::False
            | SyntaxKind::Identifier
            | SyntaxKind::VoidType
            | SyntaxKind::IntegralType
            | SyntaxKind::FloatingPointType
            | SyntaxKind::BooleanType
            | SyntaxKind::TypeIdentifier
            | SyntaxKind::ScopedTypeIdentifier
            | SyntaxKind::ArrayType
            | SyntaxKind::Wildcard => Some(self.parsed.node_text(node)),

            _ => None,
        }
    }

    /// Dotted import path, with `.*` for on-demand imports.
    fn import_path(&self, node: Node<'t>) -> Option<String> {
        let mut path: Option<String> = None;
        for child in named_nodes(node) {
            match child.kind() {
                "identifier" | "scoped_identifier" => path = Some(self.parsed.node_text(child)),
                "asterisk" => {
                    if let Some(path) = path.as_mut() {
                        path.push_str(".*");
                    }
                }
                _ => {}
            }
        }
        path
    }

    /// Keyword modifiers such as `public static`; annotations are excluded.
    fn modifiers_text(&self, node: Node<'t>) -> Option<String> {
        let modifiers = child_of_kind(node, "modifiers")?;
        let mut cursor = modifiers.walk();
        let words: Vec<&str> = modifiers
            .children(&mut cursor)
            .filter(|child| !child.is_named())
            .map(|child| child.kind())
            .collect();
        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }
}

fn named_nodes(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn field_nodes<'a>(node: Node<'a>, name: &str) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children_by_field_name(name, &mut cursor).collect()
}

fn child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|child| child.kind() == kind);
    found
}

fn update_operator(node: Node<'_>) -> Option<&'static str> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .map(|child| child.kind())
        .find(|kind| *kind == "++" || *kind == "--");
    found
}

/// The trailing `identifier` or `new` of a method reference.
fn method_reference_name(node: Node<'_>) -> Option<Node<'_>> {
    let last = node.child(node.child_count().checked_sub(1)?)?;
    match last.kind() {
        "identifier" | "new" => Some(last),
        _ => None,
    }
}

/// The qualifier before `::` in a method reference.
fn method_reference_scope(node: Node<'_>) -> Option<Node<'_>> {
    let scope = node.named_child(0)?;
    match method_reference_name(node) {
        Some(name) if name.id() == scope.id() => None,
        _ => Some(scope),
    }
}

fn strip_delimiters<'a>(text: &'a str, delimiter: &str) -> &'a str {
    text.strip_prefix(delimiter)
        .and_then(|rest| rest.strip_suffix(delimiter))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::{CoarsePolicy, FinePolicy, FlatNode};
    use crate::parser::SourceParser;

    fn parse(source: &str) -> ParsedSource {
        SourceParser::new()
            .parse(source.as_bytes(), ParseMode::File)
            .expect("fixture must parse")
    }

    fn kinds(table: &NodeTable) -> Vec<&str> {
        table.iter().map(|n| n.kind.as_str()).collect()
    }

    fn find<'a>(table: &'a NodeTable, kind: &str) -> &'a FlatNode {
        table
            .iter()
            .find(|n| n.kind == kind)
            .unwrap_or_else(|| panic!("no `{}` node in {:?}", kind, kinds(table)))
    }

    #[test]
    fn test_fine_method_shape() {
        let parsed = parse("class A { int f() { return (5); } }");
        let table = flatten(&parsed, &FinePolicy).unwrap();

        assert_eq!(
            kinds(&table),
            vec![
                "root", "classdef", "block", "funcdef", "type", "param", "typeparam", "block",
                "return", "constant"
            ]
        );
        assert_eq!(table.get(1).unwrap().value.as_deref(), Some("A"));
        assert_eq!(table.get(3).unwrap().value.as_deref(), Some("f"));
        assert_eq!(table.get(3).unwrap().children, vec![4, 5, 6, 7]);
        assert_eq!(table.get(8).unwrap().children, vec![9]);
        assert_eq!(table.get(9).unwrap().value.as_deref(), Some("5"));
        assert_eq!(table.validate(), Ok(()));
    }

    #[test]
    fn test_coarse_method_shape() {
        let parsed = parse("class A { int f() { return (5); } }");
        let table = flatten(&parsed, &CoarsePolicy).unwrap();

        assert_eq!(
            kinds(&table),
            vec!["root", "classdef", "block", "funcdef", "param", "block", "return"]
        );
        assert!(table.get(6).unwrap().children.is_empty());
    }

    #[test]
    fn test_parenthesized_literal_has_no_wrapper() {
        let parsed = parse("class A { void f() { g((5)); } }");
        let table = flatten(&parsed, &FinePolicy).unwrap();
        let call = find(&table, "call");
        assert_eq!(call.value.as_deref(), Some("g"));
        assert_eq!(call.children.len(), 1);
        let arg = table.get(call.children[0]).unwrap();
        assert_eq!(arg.kind, "constant");
        assert_eq!(arg.value.as_deref(), Some("5"));
    }

    #[test]
    fn test_semantic_operators() {
        let parsed = parse("class A { int f(int a) { return a % 2 + -a; } }");
        let table = flatten(&parsed, &FinePolicy).unwrap();
        let add = find(&table, "add");
        assert_eq!(add.value.as_deref(), Some("+"));
        assert_eq!(find(&table, "remainder").value.as_deref(), Some("%"));
        assert_eq!(find(&table, "usub").value.as_deref(), Some("-"));
    }

    #[test]
    fn test_symbolic_operators() {
        let parsed = parse("class A { void f(int i) { i++; boolean b = !true && i > 0; } }");
        let table = flatten(&parsed, &CoarsePolicy).unwrap();
        let unary: Vec<_> = table
            .iter()
            .filter(|n| n.kind == "unaryop")
            .filter_map(|n| n.value.as_deref())
            .collect();
        assert_eq!(unary, vec!["++", "!"]);
        let binary: Vec<_> = table
            .iter()
            .filter(|n| n.kind == "binaryop")
            .filter_map(|n| n.value.as_deref())
            .collect();
        assert_eq!(binary, vec!["&&", ">"]);
    }

    #[test]
    fn test_fine_declarators_carry_type() {
        let parsed = parse("class A { private static int x = 1, y; }");
        let table = flatten(&parsed, &FinePolicy).unwrap();
        let vardec = find(&table, "vardec");
        assert_eq!(vardec.modifiers.as_deref(), Some("private static"));
        assert_eq!(vardec.children.len(), 2);

        let x = table.get(vardec.children[0]).unwrap();
        assert_eq!(x.kind, "var");
        assert_eq!(x.value.as_deref(), Some("x"));
        let x_parts: Vec<_> = table.children_of(x.id).iter().map(|n| n.kind.as_str()).collect();
        assert_eq!(x_parts, vec!["type", "constant"]);

        let y = table.get(vardec.children[1]).unwrap();
        assert_eq!(y.value.as_deref(), Some("y"));
        assert_eq!(table.children_of(y.id)[0].value.as_deref(), Some("int"));
    }

    #[test]
    fn test_coarse_declarators_are_spliced() {
        let parsed = parse("class A { int x = 1, y; }");
        let table = flatten(&parsed, &CoarsePolicy).unwrap();
        let block = table.get(2).unwrap();
        assert_eq!(block.kind, "block");
        let members: Vec<_> = table
            .children_of(2)
            .iter()
            .map(|n| (n.kind.as_str(), n.value.as_deref()))
            .collect();
        assert_eq!(members, vec![("var", Some("x")), ("var", Some("y"))]);
    }

    #[test]
    fn test_coarse_condition_holds_the_condition() {
        let parsed = parse("class A { void f(int i) { while (i < 10) { i = i + 1; } } }");
        let table = flatten(&parsed, &CoarsePolicy).unwrap();
        let condition = find(&table, "condition");
        let inside: Vec<_> = table
            .children_of(condition.id)
            .iter()
            .map(|n| (n.kind.as_str(), n.value.as_deref()))
            .collect();
        assert_eq!(inside, vec![("binaryop", Some("<"))]);
    }

    #[test]
    fn test_fine_condition_is_inline() {
        let parsed = parse("class A { void f(int i) { if (i == 0) return; else i--; } }");
        let table = flatten(&parsed, &FinePolicy).unwrap();
        let branch = find(&table, "if");
        let parts: Vec<_> = table
            .children_of(branch.id)
            .iter()
            .map(|n| n.kind.as_str())
            .collect();
        assert_eq!(parts, vec!["equal", "return", "decrement"]);
    }

    #[test]
    fn test_enhanced_for_loop_variable() {
        let parsed = parse("class A { void f(int[] xs) { for (int x : xs) { g(x); } } }");
        let fine = flatten(&parsed, &FinePolicy).unwrap();
        let foreach = find(&fine, "foreach");
        let parts: Vec<_> = fine
            .children_of(foreach.id)
            .iter()
            .map(|n| (n.kind.as_str(), n.value.as_deref()))
            .collect();
        assert_eq!(
            parts,
            vec![("var", Some("x")), ("identifier", Some("xs")), ("block", None)]
        );

        let coarse = flatten(&parsed, &CoarsePolicy).unwrap();
        assert!(coarse.iter().all(|n| n.kind != "foreach"));
        let condition = find(&coarse, "condition");
        assert_eq!(condition.children.len(), 2);
    }

    #[test]
    fn test_lambda_params() {
        let parsed = parse("class A { void f() { run(x -> x); } }");
        let fine = flatten(&parsed, &FinePolicy).unwrap();
        let lambda = find(&fine, "lambda");
        let parts: Vec<_> = fine
            .children_of(lambda.id)
            .iter()
            .map(|n| n.kind.as_str())
            .collect();
        assert_eq!(parts, vec!["param", "identifier"]);
        assert_eq!(find(&fine, "arg").value.as_deref(), Some("x"));

        let coarse = flatten(&parsed, &CoarsePolicy).unwrap();
        let lambda = coarse
            .iter()
            .find(|n| n.kind == "funcdef" && n.value.as_deref() == Some("lambda"))
            .expect("lambda funcdef");
        let parts: Vec<_> = coarse
            .children_of(lambda.id)
            .iter()
            .map(|n| n.kind.as_str())
            .collect();
        assert_eq!(parts, vec!["arg", "identifier"]);
    }

    #[test]
    fn test_coarse_drops_annotation_types_entirely() {
        let source = r#"
            @interface Marker {
                String name() default "x";
                int[] sizes() default {1, 2};
                String label() default String.valueOf(new Object().hashCode());
            }
        "#;
        let parsed = parse(source);
        let table = flatten(&parsed, &CoarsePolicy).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.root().unwrap().children.is_empty());

        let fine = flatten(&parsed, &FinePolicy).unwrap();
        assert_eq!(
            find(&fine, "annotation_type_declaration").value.as_deref(),
            Some("Marker")
        );
        assert_eq!(
            fine.iter()
                .filter(|n| n.kind == "annotation_type_element_declaration")
                .count(),
            3
        );
        // The fine table keeps what the coarse one discarded.
        assert!(fine.iter().any(|n| n.kind == "call" && n.value.as_deref() == Some("valueOf")));
        assert!(fine.iter().filter(|n| n.kind == "call").count() >= 3);
    }

    #[test]
    fn test_text_block_is_a_string_constant() {
        let source = "class A { String s = \"\"\"\n    hello\n    \"\"\"; }";
        let table = flatten(&parse(source), &FinePolicy).unwrap();
        let value = find(&table, "constant").value.as_deref().unwrap();
        assert!(value.contains("hello"));
        assert!(!value.contains('"'));
    }

    #[test]
    fn test_literals() {
        let parsed = parse(r#"class A { Object[] v = { "hi", 'c', null, true, 0x1F }; }"#);
        let table = flatten(&parsed, &FinePolicy).unwrap();
        let list = find(&table, "ListLoad");
        let values: Vec<_> = table
            .children_of(list.id)
            .iter()
            .map(|n| n.value.clone())
            .collect();
        assert_eq!(
            values,
            vec![
                Some("hi".to_string()),
                Some("c".to_string()),
                None,
                Some("true".to_string()),
                Some("0x1F".to_string())
            ]
        );
    }

    #[test]
    fn test_imports_and_package() {
        let parsed = parse("package a.b;\nimport java.util.List;\nimport java.io.*;\nclass A {}");
        let table = flatten(&parsed, &FinePolicy).unwrap();
        let roots: Vec<_> = table
            .children_of(0)
            .iter()
            .map(|n| (n.kind.as_str(), n.value.as_deref()))
            .collect();
        assert_eq!(
            roots,
            vec![
                ("import", Some("java.util.List")),
                ("import", Some("java.io.*")),
                ("classdef", Some("A"))
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let parsed = parse("// head\nclass A { /* body */ void f() { /* inner */ } }");
        let table = flatten(&parsed, &FinePolicy).unwrap();
        assert!(table.iter().all(|n| !n.kind.contains("comment")));
        assert_eq!(table.validate(), Ok(()));
    }

    #[test]
    fn test_method_call_receiver_then_args() {
        let parsed = parse("class A { void f() { list.add(1, 2); } }");
        let table = flatten(&parsed, &FinePolicy).unwrap();
        let call = find(&table, "call");
        assert_eq!(call.value.as_deref(), Some("add"));
        let parts: Vec<_> = table
            .children_of(call.id)
            .iter()
            .map(|n| n.value.as_deref())
            .collect();
        assert_eq!(parts, vec![Some("list"), Some("1"), Some("2")]);
    }

    #[test]
    fn test_member_mode_roots_members() {
        let parsed = SourceParser::new()
            .parse(b"public int twice(int x) { return x * 2; }\nint y;", ParseMode::Member)
            .unwrap();
        let table = flatten(&parsed, &FinePolicy).unwrap();
        let roots: Vec<_> = table
            .children_of(0)
            .iter()
            .map(|n| n.kind.as_str())
            .collect();
        assert_eq!(roots, vec!["funcdef", "vardec"]);
        assert_eq!(table.get(1).unwrap().modifiers.as_deref(), Some("public"));
        assert!(table.iter().all(|n| n.kind != "classdef"));
    }

    #[test]
    fn test_deterministic_output() {
        let source = "class A { void f(int n) { for (int i = 0; i < n; i++) { g(i); } } }";
        let first = flatten(&parse(source), &FinePolicy).unwrap();
        let second = flatten(&parse(source), &FinePolicy).unwrap();
        assert_eq!(
            first.to_json_line().unwrap(),
            second.to_json_line().unwrap()
        );
    }

    #[test]
    fn test_too_deep_is_reported() {
        let depth = MAX_DEPTH + 10;
        let source = format!(
            "class A {{ int f() {{ return {}1{}; }} }}",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let result = std::thread::Builder::new()
            .stack_size(256 * 1024 * 1024)
            .spawn(move || {
                let parsed = parse(&source);
                flatten(&parsed, &FinePolicy)
            })
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(result, Err(FlattenError::TooDeep { limit: MAX_DEPTH }));
    }
}
