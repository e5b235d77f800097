//! Class classification by ancestry.

use tracing::warn;

use crate::ir::ClassKind;
use crate::reflect::ClassIntrospector;

/// Base class names that decide a class's kind.
#[derive(Debug, Clone)]
pub struct BaseTypes {
    pub controller: String,
    pub model: String,
}

impl BaseTypes {
    pub fn new(controller: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            model: model.into(),
        }
    }
}

impl Default for BaseTypes {
    fn default() -> Self {
        Self::new("Controller", "BaseModel")
    }
}

/// Classifies a class by walking its ancestry.
///
/// When both base names appear, the one met first in walk order decides
/// and a warning is logged.
pub fn classify<I: ClassIntrospector + ?Sized>(introspector: &I, class: &str, bases: &BaseTypes) -> ClassKind {
    let ancestry = introspector.ancestry(class);

    let controller_at = ancestry.iter().position(|name| *name == bases.controller);
    let model_at = ancestry.iter().position(|name| *name == bases.model);

    match (controller_at, model_at) {
        (Some(c), Some(m)) => {
            let kind = if c < m { ClassKind::Controller } else { ClassKind::Model };
            warn!(
                class,
                controller_base = %bases.controller,
                model_base = %bases.model,
                chosen = ?kind,
                "Class derives from both base types"
            );
            kind
        }
        (Some(_), None) => ClassKind::Controller,
        (None, Some(_)) => ClassKind::Model,
        (None, None) => ClassKind::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{ClassBuilder, ClassRegistry};

    fn registry() -> ClassRegistry {
        let mut reg = ClassRegistry::with_builtins("object", "Controller", "BaseModel");
        reg.register(ClassBuilder::new("TodoController").extends("Controller").build());
        reg.register(ClassBuilder::new("Todo").extends("BaseModel").build());
        reg.register(ClassBuilder::new("SpecialTodo").extends("Todo").build());
        reg.register(ClassBuilder::new("Helper").extends("object").build());
        reg.register(
            ClassBuilder::new("Hybrid")
                .extends("Todo")
                .extends("TodoController")
                .build(),
        );
        reg
    }

    #[test]
    fn test_classify() {
        let reg = registry();
        let bases = BaseTypes::default();
        assert_eq!(classify(&reg, "TodoController", &bases), ClassKind::Controller);
        assert_eq!(classify(&reg, "Todo", &bases), ClassKind::Model);
        assert_eq!(classify(&reg, "SpecialTodo", &bases), ClassKind::Model);
    }

    #[test]
    fn test_unsupported_reaches_root() {
        let reg = registry();
        let bases = BaseTypes::default();
        assert_eq!(classify(&reg, "Helper", &bases), ClassKind::Unsupported);
        assert_eq!(classify(&reg, "Unknown", &bases), ClassKind::Unsupported);
    }

    #[test]
    fn test_tie_uses_walk_order() {
        let reg = registry();
        assert_eq!(classify(&reg, "Hybrid", &BaseTypes::default()), ClassKind::Model);
    }

    #[test]
    fn test_custom_base_names() {
        let mut reg = ClassRegistry::with_builtins("object", "ControllerBase", "Schema");
        reg.register(ClassBuilder::new("Api").extends("ControllerBase").build());
        let bases = BaseTypes::new("ControllerBase", "Schema");
        assert_eq!(classify(&reg, "Api", &bases), ClassKind::Controller);
    }
}
