//! Source type descriptions.

use serde::Serialize;

use crate::codegen::ts_types::{lookup_primitive, simplify_type, strip_list_wrapper, trim_type};

/// A type as written in a backend annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "camelCase")]
pub enum SourceType {
    /// A name from the fixed primitive table (`int`, `str`, `dict`, ...).
    Primitive(String),

    /// `list[T]` / `List[T]`, nested without limit.
    List(Box<SourceType>),

    /// Anything else: custom classes, unresolved generics.
    Named(String),
}

impl SourceType {
    /// Parses an annotation, simplifying it first.
    pub fn parse(annotation: &str) -> Self {
        Self::from_simplified(&simplify_type(annotation))
    }

    fn from_simplified(text: &str) -> Self {
        let text = trim_type(text);
        if let Some(inner) = strip_list_wrapper(text) {
            return SourceType::List(Box::new(Self::from_simplified(inner)));
        }
        if lookup_primitive(text).is_some() {
            SourceType::Primitive(text.to_string())
        } else {
            SourceType::Named(text.to_string())
        }
    }

    /// The untyped result envelope used when an operation has no return
    /// annotation.
    pub fn response() -> Self {
        SourceType::Primitive("Response".to_string())
    }

    /// Renders the TypeScript type expression.
    pub fn to_ts(&self) -> String {
        match self {
            SourceType::Primitive(name) => lookup_primitive(name)
                .map(str::to_string)
                .unwrap_or_else(|| name.clone()),
            SourceType::List(inner) => format!("{}[]", inner.to_ts()),
            SourceType::Named(name) => name.clone(),
        }
    }

    /// The TypeScript name an import would refer to, with array suffixes
    /// removed.
    pub fn dependency_name(&self) -> String {
        self.to_ts().replace("[]", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::ts_types::map_type;

    #[test]
    fn test_parse_nested_list() {
        let parsed = SourceType::parse("List[list[float]]");
        assert_eq!(
            parsed,
            SourceType::List(Box::new(SourceType::List(Box::new(SourceType::Primitive(
                "float".to_string()
            )))))
        );
        assert_eq!(parsed.to_ts(), "number[][]");
    }

    #[test]
    fn test_structured_and_text_mapping_agree() {
        for annotation in ["int", "List[str]", "list[list[Todo]]", "QVariantList", "Todo", "'Todo'"] {
            assert_eq!(
                SourceType::parse(annotation).to_ts(),
                map_type(&simplify_type(annotation)),
                "mismatch for {}",
                annotation
            );
        }
    }

    #[test]
    fn test_named_and_qualified() {
        assert_eq!(SourceType::parse("models.Todo"), SourceType::Named("Todo".to_string()));
        assert_eq!(SourceType::parse("List[models.Todo]").dependency_name(), "Todo");
    }

    #[test]
    fn test_bare_list_is_primitive() {
        let parsed = SourceType::parse("list");
        assert_eq!(parsed, SourceType::Primitive("list".to_string()));
        assert_eq!(parsed.to_ts(), "any[]");
        assert_eq!(parsed.dependency_name(), "any");
    }
}
