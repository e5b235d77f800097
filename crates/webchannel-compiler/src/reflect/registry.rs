//! In-memory class registry.

use std::collections::HashSet;

use super::{ClassBuilder, ClassIntrospector, ClassMeta, PropertyMeta, ReflectedMethod};

/// The built-in hierarchy every backend class hangs off.
const QOBJECT: &str = "QObject";

/// Holds the reflected classes of one generation pass.
///
/// Built-in classes are registered first; user classes follow in
/// declaration order. A registry is never reused across passes.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    root: String,
    builtins: Vec<ClassMeta>,
    classes: Vec<ClassMeta>,
}

impl ClassRegistry {
    /// Creates a registry seeded with the built-in hierarchy:
    /// `root ← QObject ← controller_base` and `root ← model_base`.
    pub fn with_builtins(root: &str, controller_base: &str, model_base: &str) -> Self {
        let builtins = vec![
            ClassBuilder::new(root).build(),
            ClassBuilder::new(QOBJECT)
                .extends(root)
                .property("objectName", "QString")
                .build(),
            ClassBuilder::new(controller_base).extends(QOBJECT).build(),
            ClassBuilder::new(model_base).extends(root).build(),
        ];

        Self {
            root: root.to_string(),
            builtins,
            classes: Vec::new(),
        }
    }

    /// Registers a user class. Registering a name twice replaces the
    /// earlier definition in place, like rebinding a module attribute.
    pub fn register(&mut self, meta: ClassMeta) {
        match self.classes.iter_mut().find(|c| c.name == meta.name) {
            Some(existing) => *existing = meta,
            None => self.classes.push(meta),
        }
    }

    /// User classes in declaration order (built-ins excluded).
    pub fn defined(&self) -> &[ClassMeta] {
        &self.classes
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// The class and its ancestors, root-most first.
    fn lineage(&self, name: &str) -> Vec<&ClassMeta> {
        let mut chain: Vec<&ClassMeta> = self
            .ancestry(name)
            .iter()
            .filter_map(|ancestor| self.class(ancestor))
            .collect();
        chain.reverse();
        if let Some(class) = self.class(name) {
            chain.push(class);
        }
        chain
    }
}

impl ClassIntrospector for ClassRegistry {
    fn class(&self, name: &str) -> Option<&ClassMeta> {
        // user classes shadow built-ins of the same name
        self.classes
            .iter()
            .find(|c| c.name == name)
            .or_else(|| self.builtins.iter().find(|c| c.name == name))
    }

    fn ancestry(&self, name: &str) -> Vec<String> {
        let mut order = Vec::new();
        let mut seen: HashSet<String> = HashSet::from([name.to_string()]);
        let mut stack: Vec<String> = match self.class(name) {
            Some(class) => class.bases.iter().rev().cloned().collect(),
            None => return order,
        };

        // depth-first, left-to-right
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            order.push(current.clone());
            if current == self.root {
                continue;
            }
            if let Some(class) = self.class(&current) {
                stack.extend(class.bases.iter().rev().cloned());
            }
        }

        order
    }

    fn properties(&self, name: &str) -> Vec<&PropertyMeta> {
        self.lineage(name)
            .into_iter()
            .flat_map(|class| class.properties.iter())
            .collect()
    }

    fn methods(&self, name: &str) -> Vec<ReflectedMethod<'_>> {
        self.lineage(name)
            .into_iter()
            .flat_map(|class| {
                class.methods.iter().map(move |meta| ReflectedMethod {
                    enclosing: class.name.as_str(),
                    meta,
                })
            })
            .collect()
    }
}
