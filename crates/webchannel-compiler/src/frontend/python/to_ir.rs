//! Convert Python AST to reflected class metadata.
//!
//! Each class is registered the way the host object system would see it
//! after the module has been executed: `Signal`/`Property` class attributes
//! and `@Action`/`@Slot` methods become reflected signals, properties and
//! slots, with the author's annotations kept in the class's override table.

use tracing::debug;

use crate::codegen::ts_types::simplify_type;
use crate::reflect::{erase_type, ClassBuilder, ClassRegistry};
use super::ast::*;

/// Reflected return type of every `@Action` slot.
const ACTION_RETURN: &str = "QVariantMap";

/// Registers every class of `file` in `registry`. Returns the names of the
/// classes defined in the file, in declaration order.
pub fn to_registry(file: &ParsedFile, registry: &mut ClassRegistry) -> Vec<String> {
    let mut defined = Vec::new();
    let aliases = file.import_aliases();

    for class in &file.classes {
        let meta = convert_class(class, registry.root(), &aliases).build();
        debug!(
            class = %meta.name,
            location = %class.span,
            lines = class.span.line_count(),
            "Registered class"
        );
        if !defined.contains(&meta.name) {
            defined.push(meta.name.clone());
        }
        registry.register(meta);
    }

    defined
}

fn convert_class(class: &ClassDecl, root: &str, aliases: &[(&str, &str)]) -> ClassBuilder {
    let mut builder = ClassBuilder::new(&class.name).span(class.span.clone());

    if class.bases.is_empty() {
        builder = builder.extends(root);
    }
    for base in &class.bases {
        let base = simplify_type(base);
        // `from m import Base as B` → `class X(B)` extends `Base`
        let base = aliases
            .iter()
            .find(|(alias, _)| *alias == base)
            .map(|(_, name)| name.to_string())
            .unwrap_or(base);
        builder = builder.extends(base);
    }

    for field in &class.fields {
        builder = builder.field(&field.name, &field.annotation);
    }

    // Change notifications are created after every other signal.
    let mut property_signals = Vec::new();

    for assignment in &class.assignments {
        let Expr::Call { args, kwargs, .. } = &assignment.value else {
            continue;
        };

        match assignment.value.call_name() {
            Some("Signal") => {
                builder = convert_signal(builder, &assignment.target, args, kwargs);
            }
            Some("Property") => {
                let Some(annotation) = args.first().and_then(Expr::as_type_text) else {
                    debug!(property = %assignment.target, "Property without a type, skipped");
                    continue;
                };
                builder = builder.declared_property(&assignment.target, annotation);
                if Expr::kwarg(kwargs, "notify").is_none() {
                    property_signals.push((
                        format!("{}Changed", assignment.target),
                        assignment.target.clone(),
                        annotation.to_string(),
                    ));
                }
            }
            _ => {}
        }
    }

    let mut action_signals = Vec::new();
    for method in &class.methods {
        builder = convert_method(builder, method, &mut action_signals);
    }

    for (name, arguments) in action_signals {
        builder = builder.with_notification(name, arguments);
    }
    for (name, property, annotation) in property_signals {
        builder = builder.with_notification(name, [(property, annotation)]);
    }

    builder
}

/// `Signal({...})` and `Signal([...])` declare argument names and types;
/// any other form is only visible through reflection.
fn convert_signal(builder: ClassBuilder, name: &str, args: &[Expr], kwargs: &[(String, Expr)]) -> ClassBuilder {
    if let Some(arguments) = args.first().and_then(declared_arguments) {
        return builder.with_notification(name, arguments);
    }

    let types: Vec<String> = args
        .iter()
        .map(|arg| erase_type(arg.as_type_text().unwrap_or("")))
        .collect();

    let mut names: Vec<String> = match Expr::kwarg(kwargs, "arguments") {
        Some(Expr::List(items)) => items
            .iter()
            .map(|item| item.as_str().unwrap_or_default().to_string())
            .collect(),
        _ => Vec::new(),
    };
    names.resize(types.len(), String::new());

    builder.signal(name, names, types)
}

fn convert_method(
    builder: ClassBuilder,
    method: &MethodDecl,
    action_signals: &mut Vec<(String, Vec<(String, String)>)>,
) -> ClassBuilder {
    let slot_decorator = method
        .decorators
        .iter()
        .find(|d| matches!(d.decorator_name(), Some("Action") | Some("Slot")));

    let Some(decorator) = slot_decorator else {
        return builder.method(&method.name);
    };

    let (args, kwargs) = match decorator {
        Expr::Call { args, kwargs, .. } => (args.as_slice(), kwargs.as_slice()),
        _ => (&[][..], &[][..]),
    };

    if decorator.decorator_name() == Some("Slot") {
        let types = args
            .iter()
            .map(|arg| erase_type(arg.as_type_text().unwrap_or("")))
            .collect();
        let result = Expr::kwarg(kwargs, "result")
            .and_then(Expr::as_type_text)
            .map(erase_type)
            .unwrap_or_else(|| "void".to_string());
        return builder.slot(&method.name, types, result, Some(method.signature()));
    }

    // Action wraps the callable; unannotated parameters arrive as maps.
    let types = method
        .parameters
        .iter()
        .enumerate()
        .filter(|(i, p)| !(*i == 0 && p.name == "self") && !p.name.starts_with('*'))
        .map(|(_, p)| match &p.annotation {
            Some(annotation) => erase_type(annotation),
            None => ACTION_RETURN.to_string(),
        })
        .collect();

    if let Some(notify) = args.iter().find(|a| a.call_name() == Some("Notify")) {
        if let Some(signal) = action_notification(&method.name, notify) {
            action_signals.push(signal);
        }
    }

    builder.slot(&method.name, types, ACTION_RETURN, Some(method.signature()))
}

/// Reads `Notify(arguments, name?, emitBy?)`.
fn action_notification(method: &str, notify: &Expr) -> Option<(String, Vec<(String, String)>)> {
    let Expr::Call { args, kwargs, .. } = notify else {
        return None;
    };

    let arguments = args.first().and_then(declared_arguments).unwrap_or_default();
    let name = args
        .get(1)
        .and_then(Expr::as_str)
        .or_else(|| Expr::kwarg(kwargs, "name").and_then(Expr::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| default_notification_name(method));

    Some((name, arguments))
}

/// `add` → `onAdd`
fn default_notification_name(method: &str) -> String {
    let mut chars = method.chars();
    match chars.next() {
        Some(first) => format!("on{}{}", first.to_uppercase(), chars.as_str()),
        None => "on".to_string(),
    }
}

/// Argument names and types from a `{name: type}` dict or a `[type, ...]`
/// list (named `arg1..argN`).
fn declared_arguments(expr: &Expr) -> Option<Vec<(String, String)>> {
    match expr {
        Expr::Dict(pairs) => Some(
            pairs
                .iter()
                .map(|(key, value)| {
                    let name = key.as_type_text().unwrap_or_default().to_string();
                    let annotation = value.as_type_text().unwrap_or("any").to_string();
                    (name, annotation)
                })
                .collect(),
        ),
        Expr::List(items) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    (
                        format!("arg{}", i + 1),
                        item.as_type_text().unwrap_or("any").to_string(),
                    )
                })
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use crate::frontend::python::parser::PythonParser;
    use crate::reflect::{ClassIntrospector, MethodKind};

    fn load(source: &str) -> (ClassRegistry, Vec<String>) {
        let mut parser = PythonParser::new().unwrap();
        let file = parser.parse(source, Path::new("TodoController.py")).unwrap();
        let mut registry = ClassRegistry::with_builtins("object", "Controller", "BaseModel");
        let defined = to_registry(&file, &mut registry);
        (registry, defined)
    }

    const CONTROLLER: &str = r#"
from pywebchannel import Controller, Signal, Property, Action, Notify

class TodoController(Controller):
    todoCount = Property(int, init_val=0)
    testSignal = Signal({"arg1": int, "arg4": List[Todo]})
    listSignal = Signal([str, Todo])
    rawSignal = QtCore.Signal(int, str, arguments=["index", "label"])

    @Action(Notify({"new_todo": Todo}))
    def add(self, new_todo: Todo) -> Todo:
        return new_todo

    @Action(Notify({"todo_id": str}, "removed"))
    def remove(self, todo_id: str, quiet=False):
        pass

    @Slot(int, result=str)
    def label(self, index):
        return ""

    def helper(self):
        pass
"#;

    #[test]
    fn test_defined_classes() {
        let (registry, defined) = load(CONTROLLER);
        assert_eq!(defined, vec!["TodoController"]);
        assert_eq!(
            registry.ancestry("TodoController"),
            vec!["Controller", "QObject", "object"]
        );
    }

    #[test]
    fn test_signal_order_and_overrides() {
        let (registry, _) = load(CONTROLLER);
        let class = registry.class("TodoController").unwrap();

        let signals: Vec<_> = class
            .methods
            .iter()
            .filter(|m| m.kind == MethodKind::Signal)
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(
            signals,
            vec!["testSignal", "listSignal", "rawSignal", "onAdd", "removed", "todoCountChanged"]
        );

        let list = class.overrides.notification("listSignal").unwrap();
        assert_eq!(list[1], ("arg2".to_string(), "Todo".to_string()));

        assert!(class.overrides.notification("rawSignal").is_none());
        let raw = class.methods.iter().find(|m| m.name == "rawSignal").unwrap();
        assert_eq!(raw.parameter_names, vec!["index", "label"]);
        assert_eq!(raw.parameter_types, vec!["int", "QString"]);

        assert_eq!(
            class.overrides.notification("todoCountChanged").unwrap(),
            &[("todoCount".to_string(), "int".to_string())]
        );
    }

    #[test]
    fn test_slots() {
        let (registry, _) = load(CONTROLLER);
        let class = registry.class("TodoController").unwrap();

        let remove = class.methods.iter().find(|m| m.name == "remove").unwrap();
        assert_eq!(remove.kind, MethodKind::Slot);
        assert_eq!(remove.parameter_types, vec!["QString", "QVariantMap"]);
        assert_eq!(remove.return_type, "QVariantMap");
        assert_eq!(
            registry.signature("TodoController", "remove"),
            Some("(self, todo_id: str, quiet = False)")
        );

        let label = class.methods.iter().find(|m| m.name == "label").unwrap();
        assert_eq!(label.parameter_types, vec!["int"]);
        assert_eq!(label.return_type, "QString");

        let helper = class.methods.iter().find(|m| m.name == "helper").unwrap();
        assert_eq!(helper.kind, MethodKind::Method);
    }

    #[test]
    fn test_property_with_explicit_notify() {
        let (registry, _) = load(
            r#"
class WeatherController(Controller):
    weatherUpdated = Signal()
    city = Property(str, notify=weatherUpdated)
"#,
        );
        let class = registry.class("WeatherController").unwrap();
        assert_eq!(class.overrides.property("city"), Some("str"));
        assert!(class.methods.iter().all(|m| m.name != "cityChanged"));
    }

    #[test]
    fn test_model_and_plain_classes() {
        let (registry, defined) = load(
            r#"
class Todo(models.BaseModel):
    id: str
    count: int

class Helper:
    pass
"#,
        );
        assert_eq!(defined, vec!["Todo", "Helper"]);
        assert_eq!(registry.ancestry("Todo"), vec!["BaseModel", "object"]);
        assert_eq!(registry.ancestry("Helper"), vec!["object"]);
        assert_eq!(registry.declared_fields("Todo").len(), 2);
    }

    #[test]
    fn test_redefinitions_keep_the_last_binding() {
        let (registry, _) = load(
            r#"
class TodoController(Controller):
    onAdd = Signal({"todo": Todo})

    @Action()
    def refresh(self):
        pass

    @Action(Notify({"todo": Todo}))
    def add(self, todo: Todo):
        pass

    @Action()
    def refresh(self, force: bool):
        pass
"#,
        );
        let class = registry.class("TodoController").unwrap();

        let names: Vec<_> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["onAdd", "refresh", "add"]);
        assert_eq!(
            registry.signature("TodoController", "refresh"),
            Some("(self, force: bool)")
        );
        let refresh = class.methods.iter().find(|m| m.name == "refresh").unwrap();
        assert_eq!(refresh.parameter_types, vec!["bool"]);

        // the Notify signal rebinds the declared one
        assert_eq!(
            class.overrides.notification("onAdd").unwrap(),
            &[("todo".to_string(), "Todo".to_string())]
        );
    }

    #[test]
    fn test_aliased_base_resolves_to_imported_name() {
        let (registry, _) = load(
            r#"
from controllers.ControllerBase import ControllerBase as Base

class TodoController(Base):
    pass
"#,
        );
        assert_eq!(registry.class("TodoController").unwrap().bases, vec!["ControllerBase"]);
    }

    #[test]
    fn test_default_notification_name() {
        assert_eq!(default_notification_name("add"), "onAdd");
        assert_eq!(default_notification_name("removeAll"), "onRemoveAll");
    }
}
