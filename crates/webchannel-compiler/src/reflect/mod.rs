//! Reflected class metadata.
//!
//! The extractor never looks at source code directly. It asks a
//! [`ClassIntrospector`] the same questions a dynamic object system would
//! answer: what a class derives from, which properties and methods it
//! exposes, and the original signature of each callable. Frontends fill a
//! [`ClassRegistry`] through [`ClassBuilder`]s.
//!
//! Two tiers of type information are kept per class. The reflected tier
//! holds run-time type names as the host object system reports them, with
//! custom classes erased to generic containers (see [`erase_type`]). The
//! override tier ([`TypeOverrides`]) holds the types the author declared
//! and wins whenever it has an entry.

mod builder;
mod registry;

pub use builder::ClassBuilder;
pub use registry::ClassRegistry;

use std::collections::HashMap;

use crate::codegen::ts_types::{simplify_type, strip_list_wrapper};
use crate::diagnostic::Span;

/// A class-level annotated field (`id: str`).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMeta {
    pub name: String,
    pub annotation: String,
}

/// A property as reported by the object system.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMeta {
    pub name: String,
    /// Run-time type name (`int`, `QString`, `QVariantMap`, ...).
    pub type_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Signal,
    Slot,
    Method,
}

/// A method as reported by the object system.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodMeta {
    pub name: String,
    pub kind: MethodKind,
    /// Reflected parameter names; empty strings where the object system
    /// has none.
    pub parameter_names: Vec<String>,
    /// Reflected run-time parameter type names.
    pub parameter_types: Vec<String>,
    /// Reflected run-time return type name.
    pub return_type: String,
    /// Signature text of the original callable, e.g.
    /// `(self, todo_id: str) -> Todo`.
    pub signature: Option<String>,
}

/// Author-declared types that survive type erasure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeOverrides {
    /// Property name → declared type annotation.
    pub properties: HashMap<String, String>,
    /// Notification name → ordered `(argument, type annotation)` pairs.
    pub notifications: HashMap<String, Vec<(String, String)>>,
}

impl TypeOverrides {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn notification(&self, name: &str) -> Option<&[(String, String)]> {
        self.notifications.get(name).map(Vec::as_slice)
    }
}

/// Everything reflected about one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMeta {
    pub name: String,
    pub bases: Vec<String>,
    pub fields: Vec<FieldMeta>,
    pub properties: Vec<PropertyMeta>,
    pub methods: Vec<MethodMeta>,
    pub overrides: TypeOverrides,
    pub span: Option<Span>,
}

/// A method together with the class that declares it.
#[derive(Debug, Clone, Copy)]
pub struct ReflectedMethod<'a> {
    pub enclosing: &'a str,
    pub meta: &'a MethodMeta,
}

/// Read access to reflected classes.
pub trait ClassIntrospector {
    /// Looks up a class by name.
    fn class(&self, name: &str) -> Option<&ClassMeta>;

    /// Ancestor names in walk order, excluding the class itself. The walk
    /// ends at the universal root, which is included.
    fn ancestry(&self, name: &str) -> Vec<String>;

    /// Annotated fields declared on the class itself.
    fn declared_fields(&self, name: &str) -> Vec<&FieldMeta> {
        self.class(name)
            .map(|c| c.fields.iter().collect())
            .unwrap_or_default()
    }

    /// All properties, inherited ones first.
    fn properties(&self, name: &str) -> Vec<&PropertyMeta>;

    /// All methods, inherited ones first, each with its declaring class.
    fn methods(&self, name: &str) -> Vec<ReflectedMethod<'_>>;

    /// Signature text of a method declared on the class. The last
    /// definition of a name wins.
    fn signature(&self, class: &str, method: &str) -> Option<&str> {
        self.class(class)?
            .methods
            .iter()
            .rev()
            .find(|m| m.name == method)
            .and_then(|m| m.signature.as_deref())
    }

    /// The class's own override table.
    fn overrides(&self, name: &str) -> Option<&TypeOverrides> {
        self.class(name).map(|c| &c.overrides)
    }
}

/// Reduces an annotation to the run-time type name the object system
/// stores: primitives keep a native name, lists and everything else
/// collapse to generic containers.
pub fn erase_type(annotation: &str) -> String {
    let simplified = simplify_type(annotation);
    if strip_list_wrapper(&simplified).is_some() {
        return "QVariantList".to_string();
    }
    match simplified.as_str() {
        "bool" => "bool",
        "str" | "QString" => "QString",
        "int" => "int",
        "float" | "double" => "double",
        "None" | "void" => "void",
        "list" | "List" | "QVariantList" => "QVariantList",
        _ => "QVariantMap",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erase_type() {
        assert_eq!(erase_type("str"), "QString");
        assert_eq!(erase_type("int"), "int");
        assert_eq!(erase_type("float"), "double");
        assert_eq!(erase_type("bool"), "bool");
        assert_eq!(erase_type("None"), "void");
        assert_eq!(erase_type("List[Todo]"), "QVariantList");
        assert_eq!(erase_type("list"), "QVariantList");
        assert_eq!(erase_type("Todo"), "QVariantMap");
        assert_eq!(erase_type("dict"), "QVariantMap");
    }

    #[test]
    fn test_overrides_lookup() {
        let mut overrides = TypeOverrides::default();
        overrides.properties.insert("todoCount".to_string(), "int".to_string());
        overrides
            .notifications
            .insert("onAdd".to_string(), vec![("todo".to_string(), "Todo".to_string())]);

        assert_eq!(overrides.property("todoCount"), Some("int"));
        assert_eq!(overrides.property("missing"), None);
        assert_eq!(overrides.notification("onAdd").map(|a| a.len()), Some(1));
    }
}
