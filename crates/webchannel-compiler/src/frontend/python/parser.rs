//! Python parser using tree-sitter.

use std::path::Path;
use tree_sitter::{Node, Parser};

use crate::diagnostic::{GeneratorError, Span};
use super::ast::*;

/// Python parser.
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Creates a new Python parser.
    pub fn new() -> Result<Self, GeneratorError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|_| GeneratorError::ParserInitFailed)?;
        Ok(Self { parser })
    }

    /// Parses a Python source file.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<ParsedFile, GeneratorError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| GeneratorError::ParseFailed { path: path.to_path_buf() })?;

        let root = tree.root_node();
        let mut visitor = Visitor::new(source, path);
        visitor.visit_module(root);

        Ok(ParsedFile {
            path: path.to_path_buf(),
            imports: visitor.imports,
            classes: visitor.classes,
        })
    }
}

/// AST visitor that extracts declarations from tree-sitter nodes.
struct Visitor<'a> {
    source: &'a str,
    path: &'a Path,
    imports: Vec<ImportDecl>,
    classes: Vec<ClassDecl>,
}

impl<'a> Visitor<'a> {
    fn new(source: &'a str, path: &'a Path) -> Self {
        Self {
            source,
            path,
            imports: Vec::new(),
            classes: Vec::new(),
        }
    }

    fn span(&self, node: Node) -> Span {
        Span::from_points(self.path, node.start_position(), node.end_position())
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn field_text(&self, node: Node, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|child| collapse_whitespace(self.node_text(child)))
    }

    fn visit_module(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_statement" => self.visit_import(child),
                "import_from_statement" => self.visit_import_from(child),
                "class_definition" => {
                    if let Some(class) = self.visit_class(child) {
                        self.classes.push(class);
                    }
                }
                "decorated_definition" => {
                    if let Some(definition) = child.child_by_field_name("definition") {
                        if definition.kind() == "class_definition" {
                            if let Some(class) = self.visit_class(definition) {
                                self.classes.push(class);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// `import a.b` and `import a.b as c`
    fn visit_import(&mut self, node: Node) {
        let mut cursor = node.walk();
        let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();

        for name in names {
            let module = match name.kind() {
                "aliased_import" => self.field_text(name, "name").unwrap_or_default(),
                _ => self.node_text(name).to_string(),
            };
            self.imports.push(ImportDecl {
                level: 0,
                module,
                specifiers: Vec::new(),
                span: self.span(node),
            });
        }
    }

    /// `from .base import A, B as C`
    fn visit_import_from(&mut self, node: Node) {
        let Some(module_name) = self.field_text(node, "module_name") else {
            return;
        };
        let level = module_name.chars().take_while(|c| *c == '.').count();
        let module = module_name[level..].trim().to_string();

        let mut cursor = node.walk();
        let specifiers = node
            .children_by_field_name("name", &mut cursor)
            .map(|specifier| match specifier.kind() {
                "aliased_import" => ImportSpecifier {
                    name: self.field_text(specifier, "name").unwrap_or_default(),
                    alias: self.field_text(specifier, "alias"),
                },
                _ => ImportSpecifier {
                    name: self.node_text(specifier).to_string(),
                    alias: None,
                },
            })
            .collect();

        self.imports.push(ImportDecl {
            level,
            module,
            specifiers,
            span: self.span(node),
        });
    }

    fn visit_class(&self, node: Node) -> Option<ClassDecl> {
        let name = self.field_text(node, "name")?;

        let mut bases = Vec::new();
        if let Some(superclasses) = node.child_by_field_name("superclasses") {
            let mut cursor = superclasses.walk();
            for base in superclasses.named_children(&mut cursor) {
                // keyword arguments such as metaclass=... are not bases
                if matches!(base.kind(), "identifier" | "attribute" | "subscript") {
                    bases.push(self.node_text(base).to_string());
                }
            }
        }

        let mut class = ClassDecl {
            name,
            bases,
            fields: Vec::new(),
            assignments: Vec::new(),
            methods: Vec::new(),
            span: self.span(node),
        };

        if let Some(body) = node.child_by_field_name("body") {
            self.visit_class_body(body, &mut class);
        }

        Some(class)
    }

    fn visit_class_body(&self, node: Node, class: &mut ClassDecl) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "expression_statement" => {
                    let mut inner = child.walk();
                    for statement in child.named_children(&mut inner) {
                        if statement.kind() == "assignment" {
                            self.visit_assignment(statement, class);
                        }
                    }
                }
                "function_definition" => {
                    if let Some(method) = self.visit_function(child, Vec::new()) {
                        class.methods.push(method);
                    }
                }
                "decorated_definition" => {
                    let decorators = self.visit_decorators(child);
                    if let Some(definition) = child.child_by_field_name("definition") {
                        if definition.kind() == "function_definition" {
                            if let Some(method) = self.visit_function(definition, decorators) {
                                class.methods.push(method);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_assignment(&self, node: Node, class: &mut ClassDecl) {
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };
        // tuple targets and attribute targets are not declarations
        if left.kind() != "identifier" {
            return;
        }
        let target = self.node_text(left).to_string();

        if let Some(annotation) = self.field_text(node, "type") {
            class.fields.push(FieldDecl {
                name: target.clone(),
                annotation,
                span: self.span(node),
            });
        }

        if let Some(right) = node.child_by_field_name("right") {
            class.assignments.push(Assignment {
                target,
                value: self.visit_expr(right),
                span: self.span(node),
            });
        }
    }

    fn visit_decorators(&self, node: Node) -> Vec<Expr> {
        let mut decorators = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() != "decorator" {
                continue;
            }
            let mut inner = child.walk();
            let expression = child
                .named_children(&mut inner)
                .find(|n| n.kind() != "comment");
            if let Some(expression) = expression {
                decorators.push(self.visit_expr(expression));
            }
        }
        decorators
    }

    fn visit_function(&self, node: Node, decorators: Vec<Expr>) -> Option<MethodDecl> {
        let name = self.field_text(node, "name")?;

        let parameters = node
            .child_by_field_name("parameters")
            .map(|params| self.visit_parameters(params))
            .unwrap_or_default();

        Some(MethodDecl {
            name,
            decorators,
            parameters,
            return_annotation: self.field_text(node, "return_type"),
            span: self.span(node),
        })
    }

    fn visit_parameters(&self, node: Node) -> Vec<ParamDecl> {
        let mut params = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            let param = match child.kind() {
                "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => ParamDecl {
                    name: self.node_text(child).to_string(),
                    annotation: None,
                    default: None,
                },
                "typed_parameter" => {
                    let mut inner = child.walk();
                    let name = child
                        .named_children(&mut inner)
                        .find(|n| n.kind() != "type" && n.kind() != "comment")
                        .map(|n| self.node_text(n).to_string())
                        .unwrap_or_default();
                    ParamDecl {
                        name,
                        annotation: self.field_text(child, "type"),
                        default: None,
                    }
                }
                "default_parameter" => ParamDecl {
                    name: self.field_text(child, "name").unwrap_or_default(),
                    annotation: None,
                    default: self.field_text(child, "value"),
                },
                "typed_default_parameter" => ParamDecl {
                    name: self.field_text(child, "name").unwrap_or_default(),
                    annotation: self.field_text(child, "type"),
                    default: self.field_text(child, "value"),
                },
                // `*` and `/` separators carry no parameter
                _ => continue,
            };
            if !param.name.is_empty() {
                params.push(param);
            }
        }

        params
    }

    fn visit_expr(&self, node: Node) -> Expr {
        match node.kind() {
            "identifier" | "attribute" => Expr::Name(self.node_text(node).to_string()),
            "string" => Expr::Str(string_value(self.node_text(node))),
            "call" => {
                let callee = self.field_text(node, "function").unwrap_or_default();
                let mut args = Vec::new();
                let mut kwargs = Vec::new();

                if let Some(arguments) = node.child_by_field_name("arguments") {
                    let mut cursor = arguments.walk();
                    for arg in arguments.named_children(&mut cursor) {
                        match arg.kind() {
                            "keyword_argument" => {
                                let key = self.field_text(arg, "name").unwrap_or_default();
                                if let Some(value) = arg.child_by_field_name("value") {
                                    kwargs.push((key, self.visit_expr(value)));
                                }
                            }
                            "comment" => {}
                            _ => args.push(self.visit_expr(arg)),
                        }
                    }
                }

                Expr::Call { callee, args, kwargs }
            }
            "dictionary" => {
                let mut pairs = Vec::new();
                let mut cursor = node.walk();
                for pair in node.named_children(&mut cursor) {
                    if pair.kind() != "pair" {
                        continue;
                    }
                    if let (Some(key), Some(value)) =
                        (pair.child_by_field_name("key"), pair.child_by_field_name("value"))
                    {
                        pairs.push((self.visit_expr(key), self.visit_expr(value)));
                    }
                }
                Expr::Dict(pairs)
            }
            "list" => {
                let mut items = Vec::new();
                let mut cursor = node.walk();
                for item in node.named_children(&mut cursor) {
                    if item.kind() != "comment" {
                        items.push(self.visit_expr(item));
                    }
                }
                Expr::List(items)
            }
            "parenthesized_expression" => {
                let mut cursor = node.walk();
                let inner = node.named_children(&mut cursor).find(|n| n.kind() != "comment");
                match inner {
                    Some(inner) => self.visit_expr(inner),
                    None => Expr::Other(self.node_text(node).to_string()),
                }
            }
            _ => Expr::Other(collapse_whitespace(self.node_text(node))),
        }
    }
}

/// Removes string prefixes (`r`, `b`, `f`, `u`) and quotes.
fn string_value(text: &str) -> String {
    text.trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
