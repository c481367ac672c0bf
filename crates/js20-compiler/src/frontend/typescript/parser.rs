//! TypeScript parser using tree-sitter.

use std::path::Path;
use tracing::warn;
use tree_sitter::{Node, Parser};

use crate::diagnostic::{CompilerError, Span};
use super::ast::*;

/// TypeScript parser.
pub struct TypeScriptParser {
    parser: Parser,
}

impl TypeScriptParser {
    /// Creates a new TypeScript parser.
    pub fn new() -> Result<Self, CompilerError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|_| CompilerError::ParserInitFailed)?;
        Ok(Self { parser })
    }

    /// Parses a TypeScript source file.
    ///
    /// Syntax errors do not fail the parse: tree-sitter recovers around them
    /// and the declarations it could still recognize are returned.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<ParsedFile, CompilerError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| CompilerError::ParseFailed { path: path.to_path_buf() })?;

        let root = tree.root_node();
        let mut visitor = Visitor::new(source, path);

        if root.has_error() {
            if let Some(node) = first_error(root) {
                warn!(location = %visitor.span(node), "syntax error, declarations around it may be skipped");
            }
        }

        visitor.visit_program(root);

        Ok(ParsedFile {
            path: path.to_path_buf(),
            module_refs: visitor.module_refs,
            interfaces: visitor.interfaces,
            enums: visitor.enums,
            type_aliases: visitor.type_aliases,
            bindings: visitor.bindings,
        })
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

/// Collapses whitespace runs in type text to single spaces.
pub fn compact(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// AST visitor that extracts top-level declarations from tree-sitter nodes.
struct Visitor<'a> {
    source: &'a str,
    path: &'a Path,
    module_refs: Vec<ModuleRef>,
    interfaces: Vec<InterfaceDecl>,
    enums: Vec<EnumDecl>,
    type_aliases: Vec<TypeAliasDecl>,
    bindings: Vec<BindingDecl>,
}

impl<'a> Visitor<'a> {
    fn new(source: &'a str, path: &'a Path) -> Self {
        Self {
            source,
            path,
            module_refs: Vec::new(),
            interfaces: Vec::new(),
            enums: Vec::new(),
            type_aliases: Vec::new(),
            bindings: Vec::new(),
        }
    }

    fn span(&self, node: Node) -> Span {
        Span::new(
            self.path.to_path_buf(),
            node.start_position().row,
            node.start_position().column,
            node.end_position().row,
            node.end_position().column,
        )
    }

    fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn extract_string_value(&self, node: Node) -> String {
        let text = self.node_text(node);
        let quoted = text.len() >= 2
            && ((text.starts_with('"') && text.ends_with('"'))
                || (text.starts_with('\'') && text.ends_with('\''))
                || (text.starts_with('`') && text.ends_with('`')));
        if quoted {
            text[1..text.len() - 1].to_string()
        } else {
            text.to_string()
        }
    }

    fn visit_program(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit_statement(child, false);
        }
    }

    fn visit_statement(&mut self, node: Node, exported: bool) {
        match node.kind() {
            "import_statement" => self.visit_module_source(node),
            "export_statement" => {
                self.visit_module_source(node);
                if let Some(declaration) = node.child_by_field_name("declaration") {
                    self.visit_statement(declaration, true);
                }
            }
            "ambient_declaration" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.visit_statement(child, exported);
                }
            }
            "interface_declaration" => {
                if let Some(interface) = self.visit_interface(node, exported) {
                    self.interfaces.push(interface);
                }
            }
            "enum_declaration" => {
                if let Some(declared) = self.visit_enum(node, exported) {
                    self.enums.push(declared);
                }
            }
            "type_alias_declaration" => {
                if let Some(alias) = self.visit_type_alias(node, exported) {
                    self.type_aliases.push(alias);
                }
            }
            "lexical_declaration" | "variable_declaration" => self.visit_bindings(node),
            _ => {}
        }
    }

    fn visit_module_source(&mut self, node: Node) {
        let source_node = node.child_by_field_name("source").or_else(|| {
            let mut cursor = node.walk();
            let found = node.children(&mut cursor).find(|c| c.kind() == "string");
            found
        });

        if let Some(source_node) = source_node {
            self.module_refs.push(ModuleRef {
                source: self.extract_string_value(source_node),
                span: self.span(node),
            });
        }
    }

    fn visit_interface(&self, node: Node, exported: bool) -> Option<InterfaceDecl> {
        let name = self.node_text(node.child_by_field_name("name")?).to_string();
        let type_parameters = node
            .child_by_field_name("type_parameters")
            .map(|n| compact(self.node_text(n)));
        let mut extends = Vec::new();
        let mut heritage = Vec::new();
        let mut members = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "extends_type_clause" => {
                    let mut inner_cursor = child.walk();
                    for parent in child.named_children(&mut inner_cursor) {
                        let parent_name = match parent.kind() {
                            "generic_type" => parent.child_by_field_name("name").map(|n| self.node_text(n)),
                            "type_identifier" | "nested_type_identifier" => Some(self.node_text(parent)),
                            _ => None,
                        };
                        if let Some(parent_name) = parent_name {
                            extends.push(parent_name.to_string());
                            heritage.push(compact(self.node_text(parent)));
                        }
                    }
                }
                "interface_body" | "object_type" => {
                    members = self.visit_object_members(child);
                }
                _ => {}
            }
        }

        if name.is_empty() {
            return None;
        }

        Some(InterfaceDecl {
            name,
            type_parameters,
            extends,
            heritage,
            members,
            exported,
            span: self.span(node),
        })
    }

    fn visit_object_members(&self, node: Node) -> Vec<MemberDecl> {
        let mut members = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "property_signature" {
                if let Some(member) = self.visit_property_signature(child) {
                    members.push(member);
                }
            }
        }
        members
    }

    fn visit_property_signature(&self, node: Node) -> Option<MemberDecl> {
        let name_node = node.child_by_field_name("name")?;
        let name = match name_node.kind() {
            "string" => self.extract_string_value(name_node),
            _ => self.node_text(name_node).to_string(),
        };

        let mut optional = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "?" {
                optional = true;
            }
        }

        let type_node = node
            .child_by_field_name("type")
            .and_then(|annotation| annotation.named_child(0));

        let (type_node, type_text) = match type_node {
            Some(type_node) => (self.visit_type_node(type_node), compact(self.node_text(type_node))),
            None => (TypeNode::Primitive("any".to_string()), "any".to_string()),
        };

        if name.is_empty() {
            return None;
        }

        Some(MemberDecl {
            name,
            optional,
            type_node,
            type_text,
        })
    }

    fn visit_type_node(&self, node: Node) -> TypeNode {
        match node.kind() {
            "predefined_type" => TypeNode::Primitive(self.node_text(node).to_string()),
            "type_identifier" | "nested_type_identifier" => TypeNode::Reference {
                name: self.node_text(node).to_string(),
                args: Vec::new(),
            },
            "generic_type" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| self.node_text(n).to_string())
                    .unwrap_or_default();
                let mut args = Vec::new();
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.kind() == "type_arguments" {
                        let mut inner_cursor = child.walk();
                        for arg in child.named_children(&mut inner_cursor) {
                            args.push(self.visit_type_node(arg));
                        }
                    }
                }
                TypeNode::Reference { name, args }
            }
            "array_type" => match node.named_child(0) {
                Some(element) => TypeNode::Array(Box::new(self.visit_type_node(element))),
                None => TypeNode::Other(compact(self.node_text(node))),
            },
            "union_type" | "intersection_type" => {
                let is_union = node.kind() == "union_type";
                let mut members = Vec::new();
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    // Chains parse left-nested, flatten them.
                    match (self.visit_type_node(child), is_union) {
                        (TypeNode::Union(nested), true) | (TypeNode::Intersection(nested), false) => {
                            members.extend(nested);
                        }
                        (member, _) => members.push(member),
                    }
                }
                if is_union {
                    TypeNode::Union(members)
                } else {
                    TypeNode::Intersection(members)
                }
            }
            "parenthesized_type" | "readonly_type" => match node.named_child(0) {
                Some(inner) => self.visit_type_node(inner),
                None => TypeNode::Other(compact(self.node_text(node))),
            },
            "object_type" => TypeNode::ObjectLiteral(self.visit_object_members(node)),
            "literal_type" => TypeNode::Literal(self.node_text(node).to_string()),
            _ => TypeNode::Other(compact(self.node_text(node))),
        }
    }

    fn visit_enum(&self, node: Node, exported: bool) -> Option<EnumDecl> {
        let name = self.node_text(node.child_by_field_name("name")?).to_string();
        let mut is_const = false;
        let mut members = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "const" => is_const = true,
                "enum_body" => {
                    let mut inner_cursor = child.walk();
                    for member in child.named_children(&mut inner_cursor) {
                        match member.kind() {
                            "enum_assignment" => {
                                let Some(name_node) = member.child_by_field_name("name") else { continue };
                                let initializer = member
                                    .child_by_field_name("value")
                                    .map(|value| self.visit_enum_initializer(value));
                                members.push(EnumMemberDecl {
                                    name: self.property_name(name_node),
                                    initializer,
                                });
                            }
                            "property_identifier" | "string" | "number" => {
                                members.push(EnumMemberDecl {
                                    name: self.property_name(member),
                                    initializer: None,
                                });
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        if name.is_empty() {
            return None;
        }

        Some(EnumDecl {
            name,
            members,
            is_const,
            exported,
            span: self.span(node),
        })
    }

    fn property_name(&self, node: Node) -> String {
        match node.kind() {
            "string" => self.extract_string_value(node),
            _ => self.node_text(node).to_string(),
        }
    }

    fn visit_enum_initializer(&self, node: Node) -> EnumInitializer {
        let text = self.node_text(node);
        match node.kind() {
            "string" => EnumInitializer::String(self.extract_string_value(node)),
            "number" => match parse_number(text) {
                Some(n) => EnumInitializer::Number(n),
                None => EnumInitializer::Expression(text.to_string()),
            },
            "unary_expression" => {
                let operand = node.child_by_field_name("argument");
                let negated = text.trim_start().starts_with('-');
                match operand.filter(|o| o.kind() == "number").and_then(|o| parse_number(self.node_text(o))) {
                    Some(n) if negated => EnumInitializer::Number(-n),
                    Some(n) if text.trim_start().starts_with('+') => EnumInitializer::Number(n),
                    _ => EnumInitializer::Expression(compact(text)),
                }
            }
            _ => EnumInitializer::Expression(compact(text)),
        }
    }

    fn visit_type_alias(&self, node: Node, exported: bool) -> Option<TypeAliasDecl> {
        let name = self.node_text(node.child_by_field_name("name")?).to_string();
        let type_node = match node.child_by_field_name("value") {
            Some(value) => self.visit_type_node(value),
            None => TypeNode::Other(String::new()),
        };

        Some(TypeAliasDecl {
            name,
            type_node,
            exported,
            span: self.span(node),
        })
    }

    fn visit_bindings(&mut self, node: Node) {
        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name_node) = declarator.child_by_field_name("name") else { continue };
            if name_node.kind() != "identifier" {
                continue;
            }

            let annotation = declarator
                .child_by_field_name("type")
                .and_then(|annotation| annotation.named_child(0))
                .map(|type_node| self.visit_type_node(type_node));

            self.bindings.push(BindingDecl {
                name: self.node_text(name_node).to_string(),
                annotation,
                span: self.span(declarator),
            });
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let cleaned = text.replace('_', "");
    if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok().map(|n| n as f64);
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
