//! TypeScript type mapping from backend type annotations.
//!
//! Two passes are kept strictly apart: [`simplify_type`] normalizes the raw
//! annotation text once (package qualification, list spelling), then
//! [`map_type`] turns the normalized text into a TypeScript type expression.

/// Backend type names with a fixed TypeScript counterpart.
const PRIMITIVE_TYPES: &[(&str, &str)] = &[
    // string(s)
    ("str", "string"),
    ("QString", "string"),
    // number(s)
    ("int", "number"),
    ("float", "number"),
    ("double", "number"),
    // boolean(s)
    ("bool", "boolean"),
    // void
    ("void", "void"),
    // extras
    ("Response", "Response"),
    ("any", "any"),
    ("dict", "any"),
    ("list", "any[]"),
    ("QVariantMap", "any"),
    ("QVariantList", "any[]"),
];

/// TypeScript names that never need an import.
const TS_PRIMITIVES: &[&str] = &["string", "number", "boolean", "void", "any"];

const LIST_PREFIXES: &[&str] = &["list[", "List["];

/// Looks up the TypeScript counterpart of a bare backend type name.
pub fn lookup_primitive(name: &str) -> Option<&'static str> {
    PRIMITIVE_TYPES
        .iter()
        .find(|(source, _)| *source == name)
        .map(|(_, target)| *target)
}

/// Returns true if `name` is a TypeScript primitive (no import required).
pub fn is_ts_primitive(name: &str) -> bool {
    TS_PRIMITIVES.contains(&name)
}

/// Strips surrounding whitespace and quote characters. Forward references
/// appear as string annotations (`'Todo'`).
pub fn trim_type(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\'' || c == '"')
}

/// Returns the inner text of a `list[...]` / `List[...]` wrapper.
pub fn strip_list_wrapper(text: &str) -> Option<&str> {
    LIST_PREFIXES.iter().find_map(|prefix| {
        text.strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(']'))
    })
}

/// Maps a backend type annotation to a TypeScript type.
///
/// Total and pure: names missing from the primitive table are returned
/// unchanged, so custom classes keep their own name.
pub fn map_type(text: &str) -> String {
    let text = trim_type(text);

    if let Some(inner) = strip_list_wrapper(text) {
        // each step removes the wrapper, so the recursion terminates
        return format!("{}[]", map_type(inner));
    }

    match lookup_primitive(text) {
        Some(mapped) => mapped.to_string(),
        None => text.to_string(),
    }
}

/// Normalizes an annotation before mapping: removes package qualification
/// and rewrites both list spellings as `list[...]`.
pub fn simplify_type(text: &str) -> String {
    let text = trim_type(text);
    let text = strip_qualification(text);

    if let Some(inner) = strip_list_wrapper(text) {
        return format!("list[{}]", simplify_type(inner));
    }

    text.to_string()
}

/// Keeps only the last dot-segment of the head name, leaving any generic
/// arguments intact (`typing.List[models.Todo]` → `List[models.Todo]`).
fn strip_qualification(text: &str) -> &str {
    let head_end = text.find('[').unwrap_or(text.len());
    match text[..head_end].rfind('.') {
        Some(dot) => &text[dot + 1..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_types() {
        assert_eq!(map_type("str"), "string");
        assert_eq!(map_type("QString"), "string");
        assert_eq!(map_type("int"), "number");
        assert_eq!(map_type("float"), "number");
        assert_eq!(map_type("double"), "number");
        assert_eq!(map_type("bool"), "boolean");
        assert_eq!(map_type("dict"), "any");
        assert_eq!(map_type("QVariantMap"), "any");
        assert_eq!(map_type("list"), "any[]");
        assert_eq!(map_type("QVariantList"), "any[]");
        assert_eq!(map_type("void"), "void");
        assert_eq!(map_type("Response"), "Response");
    }

    #[test]
    fn test_primitive_mapping_is_idempotent() {
        for (source, _) in PRIMITIVE_TYPES {
            let once = map_type(source);
            assert_eq!(map_type(&once), once, "mapping '{}' twice changed it", source);
        }
    }

    #[test]
    fn test_nested_lists() {
        for depth in 0..6 {
            let source = format!("{}int{}", "list[".repeat(depth), "]".repeat(depth));
            let expected = format!("number{}", "[]".repeat(depth));
            assert_eq!(map_type(&source), expected);
        }
        assert_eq!(map_type("List[list[float]]"), "number[][]");
    }

    #[test]
    fn test_custom_types_pass_through() {
        assert_eq!(map_type("Todo"), "Todo");
        assert_eq!(map_type("List[Todo]"), "Todo[]");
        assert_eq!(map_type("Dict[str, Todo]"), "Dict[str, Todo]");
    }

    #[test]
    fn test_quotes_and_whitespace() {
        assert_eq!(map_type(" 'Todo' "), "Todo");
        assert_eq!(map_type("\"int\""), "number");
    }

    #[test]
    fn test_simplify() {
        assert_eq!(simplify_type("models.todo.Todo"), "Todo");
        assert_eq!(simplify_type("List[models.Todo]"), "list[Todo]");
        assert_eq!(simplify_type("typing.List[models.Todo]"), "list[Todo]");
        assert_eq!(simplify_type(" 'List[List[int]]' "), "list[list[int]]");
        assert_eq!(simplify_type("str"), "str");
    }

    #[test]
    fn test_ts_primitives() {
        assert!(is_ts_primitive("string"));
        assert!(is_ts_primitive("any"));
        assert!(!is_ts_primitive("Signal"));
        assert!(!is_ts_primitive("Response"));
    }
}
