//! Data model extraction.

use crate::ir::{ClassKind, Interface, Property, SourceType};
use crate::reflect::ClassIntrospector;

/// Every declared field becomes a property, in declaration order.
pub fn extract_model<I: ClassIntrospector + ?Sized>(introspector: &I, class: &str) -> Interface {
    let mut interface = Interface::new(class, ClassKind::Model);

    for field in introspector.declared_fields(class) {
        interface
            .properties
            .push(Property::new(&field.name, SourceType::parse(&field.annotation)));
    }

    interface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{ClassBuilder, ClassRegistry};

    #[test]
    fn test_fields_in_order() {
        let mut reg = ClassRegistry::with_builtins("object", "Controller", "BaseModel");
        reg.register(
            ClassBuilder::new("Todo")
                .extends("BaseModel")
                .field("id", "str")
                .field("count", "int")
                .field("tags", "List[str]")
                .field("owner", "models.User")
                .build(),
        );

        let interface = extract_model(&reg, "Todo");
        let declarations: Vec<_> = interface.properties.iter().map(Property::declaration).collect();
        assert_eq!(
            declarations,
            vec!["id: string;", "count: number;", "tags: string[];", "owner: User;"]
        );
        assert!(interface.notifications.is_empty());
        assert!(interface.operations.is_empty());
    }

    #[test]
    fn test_unresolvable_annotation_is_kept() {
        let mut reg = ClassRegistry::with_builtins("object", "Controller", "BaseModel");
        reg.register(
            ClassBuilder::new("Lookup")
                .extends("BaseModel")
                .field("index", "Dict[str, int]")
                .build(),
        );

        let interface = extract_model(&reg, "Lookup");
        assert_eq!(interface.properties[0].declaration(), "index: Dict[str, int];");
    }
}
