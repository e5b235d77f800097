//! Controller extraction.
//!
//! Declared types from the override tables win over reflected types.
//! Reflected types are lower fidelity (custom classes arrive as generic
//! maps) but are always present.

use crate::ir::{ClassKind, Interface, Notification, Operation, Parameter, Property, ReturnType, SourceType};
use crate::reflect::{ClassIntrospector, MethodKind, MethodMeta};
use super::signature::parse_signature;

/// Type used when no tier knows a parameter's type.
const UNKNOWN_TYPE: &str = "any";

pub fn extract_controller<I: ClassIntrospector + ?Sized>(introspector: &I, class: &str) -> Interface {
    let mut interface = Interface::new(class, ClassKind::Controller);
    interface.properties = extract_properties(introspector, class);
    interface.notifications = extract_notifications(introspector, class);
    interface.operations = extract_operations(introspector, class);
    interface
}

fn extract_properties<I: ClassIntrospector + ?Sized>(introspector: &I, class: &str) -> Vec<Property> {
    // index 0 is the identity property every object carries
    introspector
        .properties(class)
        .into_iter()
        .skip(1)
        .map(|prop| {
            let annotation = declared_property_type(introspector, class, &prop.name)
                .unwrap_or(prop.type_name.as_str());
            Property::new(&prop.name, SourceType::parse(annotation))
        })
        .collect()
}

/// Looks the property up in the class's own table, then in its ancestors'.
fn declared_property_type<'a, I: ClassIntrospector + ?Sized>(
    introspector: &'a I,
    class: &str,
    property: &str,
) -> Option<&'a str> {
    std::iter::once(class.to_string())
        .chain(introspector.ancestry(class))
        .find_map(|owner| {
            introspector
                .overrides(&owner)
                .and_then(|overrides| overrides.property(property))
        })
}

fn extract_notifications<I: ClassIntrospector + ?Sized>(introspector: &I, class: &str) -> Vec<Notification> {
    let overrides = introspector.overrides(class);

    introspector
        .methods(class)
        .into_iter()
        .filter(|m| m.meta.kind == MethodKind::Signal && m.enclosing == class)
        .map(|m| {
            let declared = overrides.and_then(|o| o.notification(&m.meta.name));
            let parameters = match declared {
                Some(arguments) => arguments
                    .iter()
                    .map(|(name, annotation)| Parameter::new(name, SourceType::parse(annotation)))
                    .collect(),
                None => reflected_parameters(m.meta),
            };
            Notification::new(&m.meta.name, parameters)
        })
        .collect()
}

fn extract_operations<I: ClassIntrospector + ?Sized>(introspector: &I, class: &str) -> Vec<Operation> {
    introspector
        .methods(class)
        .into_iter()
        .filter(|m| m.meta.kind == MethodKind::Slot && m.enclosing == class)
        .filter(|m| !Operation::is_private(&m.meta.name))
        .map(|m| {
            let meta = m.meta;
            match introspector.signature(class, &meta.name) {
                Some(text) => {
                    let signature = parse_signature(text);
                    let parameters = signature
                        .parameters
                        .iter()
                        .enumerate()
                        .map(|(i, param)| {
                            let annotation = param
                                .annotation
                                .as_deref()
                                .or_else(|| reflected_type(meta, i))
                                .unwrap_or(UNKNOWN_TYPE);
                            Parameter::new(&param.name, SourceType::parse(annotation))
                        })
                        .collect();
                    let return_type = signature
                        .return_annotation
                        .map(|ret| ReturnType::new(SourceType::parse(&ret)))
                        .unwrap_or_default();
                    Operation::new(&meta.name, parameters, return_type)
                }
                None => {
                    let return_type = match meta.return_type.as_str() {
                        "" => ReturnType::default(),
                        reflected => ReturnType::new(SourceType::parse(reflected)),
                    };
                    Operation::new(&meta.name, reflected_parameters(meta), return_type)
                }
            }
        })
        .collect()
}

fn reflected_type(meta: &MethodMeta, index: usize) -> Option<&str> {
    meta.parameter_types
        .get(index)
        .map(String::as_str)
        .filter(|t| !t.is_empty())
}

/// Parameters from the reflected tier only. Unnamed parameters become
/// `arg1..argN`.
fn reflected_parameters(meta: &MethodMeta) -> Vec<Parameter> {
    meta.parameter_types
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let name = match meta.parameter_names.get(i) {
                Some(name) if !name.is_empty() => name.clone(),
                _ => format!("arg{}", i + 1),
            };
            let annotation = reflected_type(meta, i).unwrap_or(UNKNOWN_TYPE);
            Parameter::new(name, SourceType::parse(annotation))
        })
        .collect()
}
