//! Python-specific AST types.
//!
//! Only the shapes the generator cares about are kept: class headers,
//! class-level annotations and assignments, and method signatures with
//! their decorators.

use std::path::PathBuf;
use crate::diagnostic::Span;

/// A parsed Python file.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub imports: Vec<ImportDecl>,
    pub classes: Vec<ClassDecl>,
}

/// A module-level `import` or `from ... import` statement.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    /// Leading dots of a relative import (`from ..base import X` → 2).
    pub level: usize,
    /// Dotted module path without the leading dots. Empty for `from . import X`.
    pub module: String,
    /// Imported names. Empty for `import module` and `from module import *`.
    pub specifiers: Vec<ImportSpecifier>,
    pub span: Span,
}

/// An imported name.
#[derive(Debug, Clone)]
pub struct ImportSpecifier {
    pub name: String,
    pub alias: Option<String>,
}

impl ParsedFile {
    /// Local name → imported name, for `from m import Name as Alias`.
    pub fn import_aliases(&self) -> Vec<(&str, &str)> {
        self.imports
            .iter()
            .flat_map(|import| import.specifiers.iter())
            .filter_map(|specifier| specifier.alias.as_deref().map(|alias| (alias, specifier.name.as_str())))
            .collect()
    }
}

/// A top-level class definition.
#[derive(Debug)]
pub struct ClassDecl {
    pub name: String,
    /// Positional base class expressions, as written.
    pub bases: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub assignments: Vec<Assignment>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

/// A class-level annotated name (`id: str` or `count: int = 0`).
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub annotation: String,
    pub span: Span,
}

/// A class-level assignment (`todoCount = Property(int)`).
#[derive(Debug, Clone)]
pub struct Assignment {
    pub target: String,
    pub value: Expr,
    pub span: Span,
}

/// A method definition.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub decorators: Vec<Expr>,
    pub parameters: Vec<ParamDecl>,
    pub return_annotation: Option<String>,
    pub span: Span,
}

impl MethodDecl {
    /// Signature text in the form the analyzer expects:
    /// `(self, a: int = 0, b) -> str`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                let mut text = p.name.clone();
                if let Some(annotation) = &p.annotation {
                    text.push_str(": ");
                    text.push_str(annotation);
                }
                if let Some(default) = &p.default {
                    text.push_str(" = ");
                    text.push_str(default);
                }
                text
            })
            .collect();

        let mut signature = format!("({})", params.join(", "));
        if let Some(ret) = &self.return_annotation {
            signature.push_str(" -> ");
            signature.push_str(ret);
        }
        signature
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    /// Name including any `*`/`**` prefix.
    pub name: String,
    pub annotation: Option<String>,
    pub default: Option<String>,
}

/// The expression subset needed to read declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `name` or `package.name`
    Name(String),

    /// `callee(args, key=value)`
    Call {
        callee: String,
        args: Vec<Expr>,
        kwargs: Vec<(String, Expr)>,
    },

    /// `{key: value}`
    Dict(Vec<(Expr, Expr)>),

    /// `[a, b]`
    List(Vec<Expr>),

    /// String literal, quotes removed.
    Str(String),

    /// Anything else, as source text (`List[Todo]`, `0`, ...).
    Other(String),
}

impl Expr {
    /// Last dot-segment of a callee or name (`QtCore.Signal` → `Signal`).
    pub fn short_name(text: &str) -> &str {
        text.rsplit('.').next().unwrap_or(text)
    }

    /// Returns the callee's short name if this is a call.
    pub fn call_name(&self) -> Option<&str> {
        match self {
            Expr::Call { callee, .. } => Some(Self::short_name(callee)),
            _ => None,
        }
    }

    /// Decorator name for bare (`@Slot`) or called (`@Slot()`) forms.
    pub fn decorator_name(&self) -> Option<&str> {
        match self {
            Expr::Name(name) => Some(Self::short_name(name)),
            Expr::Call { callee, .. } => Some(Self::short_name(callee)),
            _ => None,
        }
    }

    /// Text usable as a type annotation.
    pub fn as_type_text(&self) -> Option<&str> {
        match self {
            Expr::Name(text) | Expr::Str(text) | Expr::Other(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(text) => Some(text),
            _ => None,
        }
    }

    pub fn kwarg<'a>(kwargs: &'a [(String, Expr)], name: &str) -> Option<&'a Expr> {
        kwargs.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}
