//! Generated interface description for one controller or model.

use std::collections::HashSet;

use serde::Serialize;

use super::{Notification, Operation, Property};
use crate::codegen::ts_types::is_ts_primitive;

/// What kind of backend class an interface was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassKind {
    Controller,
    Model,
    Unsupported,
}

/// Properties, notifications and operations of one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    pub name: String,
    pub kind: ClassKind,
    pub properties: Vec<Property>,
    pub notifications: Vec<Notification>,
    pub operations: Vec<Operation>,
}

impl Interface {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            properties: Vec::new(),
            notifications: Vec::new(),
            operations: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.notifications.is_empty() && self.operations.is_empty()
    }

    /// Custom type names referenced by this interface, first occurrence
    /// first. Primitive names and the interface's own name are never
    /// included.
    pub fn dependencies(&self) -> Vec<String> {
        let all = self
            .properties
            .iter()
            .flat_map(Property::dependencies)
            .chain(self.notifications.iter().flat_map(Notification::dependencies))
            .chain(self.operations.iter().flat_map(Operation::dependencies));

        let mut seen = HashSet::new();
        all.filter(|dep| !is_ts_primitive(dep) && *dep != self.name)
            .filter(|dep| seen.insert(dep.clone()))
            .collect()
    }
}
