//! Interface extraction from reflected classes.
//!
//! Classification decides which extractor runs: models expose their
//! annotated fields, controllers expose properties, signals and slots.

mod classify;
mod controller;
mod model;
pub mod signature;

pub use classify::{classify, BaseTypes};
pub use controller::extract_controller;
pub use model::extract_model;

use tracing::warn;

use crate::diagnostic::GeneratorError;
use crate::ir::{ClassKind, Interface};
use crate::reflect::ClassIntrospector;

/// Extracts the interface of one classified class.
pub fn extract<I: ClassIntrospector + ?Sized>(
    introspector: &I,
    class: &str,
    kind: ClassKind,
) -> Result<Interface, GeneratorError> {
    if introspector.class(class).is_none() {
        return Err(GeneratorError::UnknownClass {
            name: class.to_string(),
        });
    }

    match kind {
        ClassKind::Controller => Ok(extract_controller(introspector, class)),
        ClassKind::Model => Ok(extract_model(introspector, class)),
        ClassKind::Unsupported => Err(GeneratorError::UnsupportedClass {
            name: class.to_string(),
        }),
    }
}

/// Classifies and extracts every class in `classes`, in order.
/// Unsupported classes are skipped with a warning.
pub fn extract_all<I: ClassIntrospector + ?Sized>(
    introspector: &I,
    classes: &[String],
    bases: &BaseTypes,
) -> Result<Vec<Interface>, GeneratorError> {
    let mut interfaces = Vec::new();

    for class in classes {
        let kind = classify(introspector, class, bases);
        if kind == ClassKind::Unsupported {
            let span = introspector
                .class(class)
                .and_then(|meta| meta.span.as_ref())
                .map(ToString::to_string)
                .unwrap_or_default();
            warn!(class = %class, location = %span, "Skipping unsupported class");
            continue;
        }
        interfaces.push(extract(introspector, class, kind)?);
    }

    Ok(interfaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{ClassBuilder, ClassRegistry};

    fn registry() -> ClassRegistry {
        let mut reg = ClassRegistry::with_builtins("object", "Controller", "BaseModel");
        reg.register(ClassBuilder::new("Todo").extends("BaseModel").field("id", "str").build());
        reg.register(ClassBuilder::new("Helper").extends("object").build());
        reg.register(
            ClassBuilder::new("TodoController")
                .extends("Controller")
                .with_operation("add", [("todo", "Todo")], None)
                .build(),
        );
        reg
    }

    #[test]
    fn test_extract_rejects_unsupported() {
        let reg = registry();
        assert!(matches!(
            extract(&reg, "Helper", ClassKind::Unsupported),
            Err(GeneratorError::UnsupportedClass { .. })
        ));
        assert!(matches!(
            extract(&reg, "Missing", ClassKind::Model),
            Err(GeneratorError::UnknownClass { .. })
        ));
    }

    #[test]
    fn test_extract_all_skips_unsupported() {
        let reg = registry();
        let classes: Vec<String> = ["Todo", "Helper", "TodoController"].iter().map(|s| s.to_string()).collect();
        let interfaces = extract_all(&reg, &classes, &BaseTypes::default()).unwrap();

        let names: Vec<_> = interfaces.iter().map(|i| (i.name.as_str(), i.kind)).collect();
        assert_eq!(
            names,
            vec![("Todo", ClassKind::Model), ("TodoController", ClassKind::Controller)]
        );
    }
}
