//! Interface members and their TypeScript declarations.

use serde::Serialize;

use super::SourceType;

/// A named, typed parameter of a notification or operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: SourceType,
}

impl Parameter {
    pub fn new(name: impl Into<String>, typ: SourceType) -> Self {
        Self {
            name: name.into(),
            typ,
        }
    }

    /// `name: TargetType`
    pub fn declaration(&self) -> String {
        format!("{}: {}", self.name, self.typ.to_ts())
    }
}

/// The result type of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReturnType(pub SourceType);

impl ReturnType {
    pub fn new(typ: SourceType) -> Self {
        Self(typ)
    }

    pub fn declaration(&self) -> String {
        self.0.to_ts()
    }
}

impl Default for ReturnType {
    fn default() -> Self {
        Self(SourceType::response())
    }
}

/// Externally observable state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: SourceType,
}

impl Property {
    pub fn new(name: impl Into<String>, typ: SourceType) -> Self {
        Self {
            name: name.into(),
            typ,
        }
    }

    /// `name: TargetType;`
    pub fn declaration(&self) -> String {
        format!("{}: {};", self.name, self.typ.to_ts())
    }

    pub fn dependencies(&self) -> Vec<String> {
        vec![self.typ.dependency_name()]
    }
}

/// A fire-and-forget event pushed from the backend (a Qt signal).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

impl Notification {
    /// Name of the front-end carrier type every notification is wrapped in.
    pub const CARRIER: &'static str = "Signal";

    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// `name: Signal<(a: A, b: B) => void>;`
    pub fn declaration(&self) -> String {
        format!(
            "{}: {}<({}) => void>;",
            self.name,
            Self::CARRIER,
            join_parameters(&self.parameters)
        )
    }

    /// Parameter types followed by the carrier type itself.
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps: Vec<String> = self
            .parameters
            .iter()
            .map(|p| p.typ.dependency_name())
            .collect();
        deps.push("void".to_string());
        deps.push(Self::CARRIER.to_string());
        deps
    }
}

/// A request/response callable invoked by the front end (a Qt slot).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: ReturnType,
}

impl Operation {
    /// Operations whose name starts with this marker are private.
    pub const PRIVATE_PREFIX: &'static str = "_";

    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, return_type: ReturnType) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
        }
    }

    pub fn is_private(name: &str) -> bool {
        name.starts_with(Self::PRIVATE_PREFIX)
    }

    /// `name(a: A): Promise<R>;`
    pub fn declaration(&self) -> String {
        format!(
            "{}({}): Promise<{}>;",
            self.name,
            join_parameters(&self.parameters),
            self.return_type.declaration()
        )
    }

    pub fn dependencies(&self) -> Vec<String> {
        let mut deps: Vec<String> = self
            .parameters
            .iter()
            .map(|p| p.typ.dependency_name())
            .collect();
        deps.push(self.return_type.0.dependency_name());
        deps
    }
}

fn join_parameters(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(Parameter::declaration)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo() -> SourceType {
        SourceType::parse("Todo")
    }

    #[test]
    fn test_property_declaration() {
        let prop = Property::new("tags", SourceType::parse("List[str]"));
        assert_eq!(prop.declaration(), "tags: string[];");
        assert_eq!(prop.dependencies(), vec!["string"]);
    }

    #[test]
    fn test_notification_declaration() {
        let signal = Notification::new(
            "onAdd",
            vec![
                Parameter::new("new_todo", todo()),
                Parameter::new("count", SourceType::parse("int")),
            ],
        );
        assert_eq!(signal.declaration(), "onAdd: Signal<(new_todo: Todo, count: number) => void>;");
        assert_eq!(signal.dependencies(), vec!["Todo", "number", "void", "Signal"]);
    }

    #[test]
    fn test_empty_notification() {
        let signal = Notification::new("weatherUpdated", Vec::new());
        assert_eq!(signal.declaration(), "weatherUpdated: Signal<() => void>;");
        assert_eq!(signal.dependencies(), vec!["void", "Signal"]);
    }

    #[test]
    fn test_operation_declaration() {
        let op = Operation::new(
            "remove",
            vec![Parameter::new("todo_id", SourceType::parse("str"))],
            ReturnType::default(),
        );
        assert_eq!(op.declaration(), "remove(todo_id: string): Promise<Response>;");
        assert_eq!(op.dependencies(), vec!["string", "Response"]);

        let typed = Operation::new("matrix", Vec::new(), ReturnType::new(SourceType::parse("List[List[float]]")));
        assert_eq!(typed.declaration(), "matrix(): Promise<number[][]>;");
    }

    #[test]
    fn test_private_marker() {
        assert!(Operation::is_private("_refresh"));
        assert!(!Operation::is_private("refresh"));
    }
}
