//! Explicit per-class registration.

use super::{erase_type, ClassMeta, FieldMeta, MethodKind, MethodMeta, PropertyMeta, TypeOverrides};
use crate::diagnostic::Span;

/// Builds a [`ClassMeta`] one declaration at a time.
///
/// The `with_*` and `declared_*` methods record author intent in the
/// class's own override table and store the erased run-time type in the
/// reflected tier, the way the host object system would.
///
/// ```rust,ignore
/// let todo_controller = ClassBuilder::new("TodoController")
///     .extends("Controller")
///     .declared_property("todoCount", "int")
///     .with_notification("onAdd", [("new_todo", "Todo")])
///     .with_operation("add", [("new_todo", "Todo")], None)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    meta: ClassMeta,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: ClassMeta {
                name: name.into(),
                bases: Vec::new(),
                fields: Vec::new(),
                properties: Vec::new(),
                methods: Vec::new(),
                overrides: TypeOverrides::default(),
                span: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.meta.bases.push(base.into());
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.meta.span = Some(span);
        self
    }

    /// An annotated field (`name: annotation`).
    pub fn field(mut self, name: impl Into<String>, annotation: impl Into<String>) -> Self {
        let field = FieldMeta {
            name: name.into(),
            annotation: annotation.into(),
        };
        match self.meta.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.meta.fields.push(field),
        }
        self
    }

    /// A property known only by its run-time type name.
    pub fn property(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.put_property(PropertyMeta {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    /// A property with an author-declared type.
    pub fn declared_property(mut self, name: impl Into<String>, annotation: impl Into<String>) -> Self {
        let name = name.into();
        let annotation = annotation.into();
        self.put_property(PropertyMeta {
            name: name.clone(),
            type_name: erase_type(&annotation),
        });
        self.meta.overrides.properties.insert(name, annotation);
        self
    }

    /// A signal known only through reflection.
    pub fn signal(mut self, name: impl Into<String>, parameter_names: Vec<String>, parameter_types: Vec<String>) -> Self {
        self.put_method(MethodMeta {
            name: name.into(),
            kind: MethodKind::Signal,
            parameter_names,
            parameter_types,
            return_type: "void".to_string(),
            signature: None,
        });
        self
    }

    /// A notification with author-declared argument names and types.
    pub fn with_notification<I, N, T>(mut self, name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let name = name.into();
        let arguments: Vec<(String, String)> = arguments
            .into_iter()
            .map(|(n, t)| (n.into(), t.into()))
            .collect();

        self.put_method(MethodMeta {
            name: name.clone(),
            kind: MethodKind::Signal,
            parameter_names: arguments.iter().map(|(n, _)| n.clone()).collect(),
            parameter_types: arguments.iter().map(|(_, t)| erase_type(t)).collect(),
            return_type: "void".to_string(),
            signature: None,
        });
        self.meta.overrides.notifications.insert(name, arguments);
        self
    }

    /// A slot as the object system reports it, plus the signature text of
    /// the callable it wraps.
    pub fn slot(
        mut self,
        name: impl Into<String>,
        parameter_types: Vec<String>,
        return_type: impl Into<String>,
        signature: Option<String>,
    ) -> Self {
        self.put_method(MethodMeta {
            name: name.into(),
            kind: MethodKind::Slot,
            parameter_names: vec![String::new(); parameter_types.len()],
            parameter_types,
            return_type: return_type.into(),
            signature,
        });
        self
    }

    /// An operation with declared parameters and an optional declared
    /// return type. The signature text is synthesized from them.
    pub fn with_operation<I, N, T>(self, name: impl Into<String>, parameters: I, return_type: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let parameters: Vec<(String, String)> = parameters
            .into_iter()
            .map(|(n, t)| (n.into(), t.into()))
            .collect();

        let mut signature = String::from("(self");
        for (param, annotation) in &parameters {
            signature.push_str(&format!(", {}: {}", param, annotation));
        }
        signature.push(')');
        if let Some(ret) = return_type {
            signature.push_str(&format!(" -> {}", ret));
        }

        let erased = parameters.iter().map(|(_, t)| erase_type(t)).collect();
        self.slot(name, erased, "QVariantMap", Some(signature))
    }

    /// A plain method that is neither a signal nor a slot.
    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.put_method(MethodMeta {
            name: name.into(),
            kind: MethodKind::Method,
            parameter_names: Vec::new(),
            parameter_types: Vec::new(),
            return_type: "void".to_string(),
            signature: None,
        });
        self
    }

    pub fn build(self) -> ClassMeta {
        self.meta
    }

    // A later binding of a name replaces the earlier one in place, the
    // way a class body rebinds an attribute.

    fn put_property(&mut self, property: PropertyMeta) {
        self.meta.overrides.properties.remove(&property.name);
        match self.meta.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.meta.properties.push(property),
        }
    }

    fn put_method(&mut self, method: MethodMeta) {
        self.meta.overrides.notifications.remove(&method.name);
        match self.meta.methods.iter_mut().find(|m| m.name == method.name) {
            Some(existing) => *existing = method,
            None => self.meta.methods.push(method),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_property_keeps_both_tiers() {
        let meta = ClassBuilder::new("TodoController")
            .extends("Controller")
            .declared_property("current", "Todo")
            .build();

        assert_eq!(meta.bases, vec!["Controller"]);
        assert_eq!(meta.properties[0].type_name, "QVariantMap");
        assert_eq!(meta.overrides.property("current"), Some("Todo"));
    }

    #[test]
    fn test_notification_registration() {
        let meta = ClassBuilder::new("TodoController")
            .with_notification("onAdd", [("new_todo", "Todo"), ("count", "int")])
            .build();

        let signal = &meta.methods[0];
        assert_eq!(signal.kind, MethodKind::Signal);
        assert_eq!(signal.parameter_names, vec!["new_todo", "count"]);
        assert_eq!(signal.parameter_types, vec!["QVariantMap", "int"]);
        assert_eq!(
            meta.overrides.notification("onAdd").unwrap(),
            &[
                ("new_todo".to_string(), "Todo".to_string()),
                ("count".to_string(), "int".to_string())
            ]
        );
    }

    #[test]
    fn test_operation_signature() {
        let meta = ClassBuilder::new("TodoController")
            .with_operation("remove", [("todo_id", "str")], Some("Todo"))
            .with_operation("clear", Vec::<(&str, &str)>::new(), None)
            .build();

        assert_eq!(meta.methods[0].signature.as_deref(), Some("(self, todo_id: str) -> Todo"));
        assert_eq!(meta.methods[0].parameter_types, vec!["QString"]);
        assert_eq!(meta.methods[1].signature.as_deref(), Some("(self)"));
    }

    #[test]
    fn test_rebinding_replaces_in_place() {
        let meta = ClassBuilder::new("TodoController")
            .with_operation("refresh", Vec::<(&str, &str)>::new(), None)
            .signal("onAdd", Vec::new(), Vec::new())
            .with_operation("refresh", [("force", "bool")], None)
            .with_notification("onAdd", [("todo", "Todo")])
            .build();

        let names: Vec<_> = meta.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["refresh", "onAdd"]);
        assert_eq!(meta.methods[0].signature.as_deref(), Some("(self, force: bool)"));
        assert_eq!(meta.methods[1].parameter_names, vec!["todo"]);
        assert!(meta.overrides.notification("onAdd").is_some());
    }

    #[test]
    fn test_reflected_signal_drops_stale_override() {
        let meta = ClassBuilder::new("TodoController")
            .with_notification("onAdd", [("todo", "Todo")])
            .signal("onAdd", vec![String::new()], vec!["int".to_string()])
            .declared_property("count", "int")
            .property("count", "QString")
            .build();

        assert_eq!(meta.methods.len(), 1);
        assert!(meta.overrides.notification("onAdd").is_none());
        assert_eq!(meta.properties.len(), 1);
        assert_eq!(meta.overrides.property("count"), None);
    }
}
