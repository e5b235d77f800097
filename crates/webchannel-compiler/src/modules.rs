//! Imported module loading.
//!
//! Shared base classes usually live in their own file (`ControllerBase.py`).
//! Before a source file is analyzed, every module it imports that exists
//! on disk is loaded into the same registry, so ancestry walks reach the
//! root. Parsed modules are cached by path and modification time.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::frontend::{Frontend, ModuleImport};
use crate::reflect::{ClassMeta, ClassRegistry};

#[derive(Debug)]
struct CachedModule {
    modified: Option<SystemTime>,
    classes: Vec<ClassMeta>,
    imports: Vec<ModuleImport>,
}

/// State of one transitive import walk.
#[derive(Debug, Default)]
struct ImportWalk {
    visited: HashSet<PathBuf>,
    loaded: BTreeSet<PathBuf>,
    classes: Vec<ClassMeta>,
}

/// Parsed imported modules, keyed by canonical path.
#[derive(Debug, Default)]
pub struct ModuleCache {
    /// Extra directories searched for absolute imports.
    roots: Vec<PathBuf>,
    modules: HashMap<PathBuf, CachedModule>,
    /// Source file → module files its last analysis depended on.
    dependencies: HashMap<PathBuf, BTreeSet<PathBuf>>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory searched for absolute imports. The directory's
    /// parent is searched too, so `from controllers.X import Y` resolves
    /// from inside `controllers/`.
    pub fn add_root(&mut self, dir: &Path) {
        let dir = canonical(dir);
        if !self.roots.contains(&dir) {
            self.roots.push(dir);
        }
    }

    /// Drops the cached parse of `path`. Returns true if there was one.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.modules.remove(&canonical(path)).is_some()
    }

    /// Module files the last analysis of `source` depended on.
    pub fn dependencies(&self, source: &Path) -> Vec<PathBuf> {
        self.dependencies
            .get(&canonical(source))
            .map(|deps| deps.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Source files whose last analysis depended on `module`, sorted.
    pub fn dependents(&self, module: &Path) -> Vec<PathBuf> {
        let module = canonical(module);
        let mut dependents: Vec<PathBuf> = self
            .dependencies
            .iter()
            .filter(|(_, deps)| deps.contains(&module))
            .map(|(source, _)| source.clone())
            .collect();
        dependents.sort();
        dependents
    }

    /// Existing files that define `import` as seen from `source`.
    ///
    /// Relative imports are looked up in the package directory only.
    /// Absolute imports try the source's directory and its ancestors,
    /// then every extra root and its parent; the first directory with a
    /// match wins.
    pub fn resolve(&self, frontend: &dyn Frontend, source: &Path, import: &ModuleImport) -> Vec<PathBuf> {
        let files = frontend.module_files(import);
        let dir = source.parent().unwrap_or_else(|| Path::new(""));

        let candidates: Vec<&Path> = if import.level > 0 {
            dir.ancestors().nth(import.level - 1).into_iter().collect()
        } else {
            dir.ancestors()
                .chain(self.roots.iter().flat_map(|root| root.ancestors().take(2)))
                .collect()
        };

        let mut seen = HashSet::new();
        for root in candidates {
            if !seen.insert(root) {
                continue;
            }
            let found: Vec<PathBuf> = files
                .iter()
                .map(|file| root.join(file))
                .filter(|path| path.is_file())
                .map(|path| canonical(&path))
                .collect();
            if !found.is_empty() {
                return found;
            }
        }

        Vec::new()
    }

    /// Loads every module `source` imports, transitively, and returns
    /// their classes with dependencies first. Modules that cannot be read
    /// or parsed are logged and skipped.
    pub fn load_imports(
        &mut self,
        frontend: &mut dyn Frontend,
        template: &ClassRegistry,
        source: &Path,
        imports: &[ModuleImport],
    ) -> Vec<ClassMeta> {
        let source = canonical(source);
        let mut walk = ImportWalk::default();
        walk.visited.insert(source.clone());

        self.visit(frontend, template, &source, imports, &mut walk);
        self.dependencies.insert(source, walk.loaded);
        walk.classes
    }

    fn visit(
        &mut self,
        frontend: &mut dyn Frontend,
        template: &ClassRegistry,
        from: &Path,
        imports: &[ModuleImport],
        walk: &mut ImportWalk,
    ) {
        for import in imports {
            for file in self.resolve(&*frontend, from, import) {
                if !walk.visited.insert(file.clone()) {
                    continue;
                }
                // recorded even when broken, so fixing it regenerates dependents
                walk.loaded.insert(file.clone());

                let Some((nested, own)) = self
                    .module(frontend, template, &file)
                    .map(|m| (m.imports.clone(), m.classes.clone()))
                else {
                    continue;
                };

                self.visit(frontend, template, &file, &nested, walk);
                walk.classes.extend(own);
            }
        }
    }

    fn module(&mut self, frontend: &mut dyn Frontend, template: &ClassRegistry, path: &Path) -> Option<&CachedModule> {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        let fresh = self
            .modules
            .get(path)
            .is_some_and(|cached| modified.is_some() && cached.modified == modified);

        if !fresh {
            let mut registry = template.clone();
            match frontend.load_file(path, &mut registry) {
                Ok(loaded) => {
                    debug!(module = %path.display(), classes = loaded.classes.len(), "Loaded imported module");
                    self.modules.insert(
                        path.to_path_buf(),
                        CachedModule {
                            modified,
                            classes: registry.defined().to_vec(),
                            imports: loaded.imports,
                        },
                    );
                }
                Err(e) => {
                    warn!(module = %path.display(), error = %e, "Could not load imported module");
                    self.modules.remove(path);
                    return None;
                }
            }
        }

        self.modules.get(path)
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::create_frontend;
    use std::fs;
    use tempfile::TempDir;

    fn template() -> ClassRegistry {
        ClassRegistry::with_builtins("object", "Controller", "BaseModel")
    }

    fn absolute(module: &str, names: &[&str]) -> ModuleImport {
        ModuleImport {
            level: 0,
            module: module.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    fn project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let controllers = dir.path().join("controllers");
        fs::create_dir_all(&controllers).unwrap();
        fs::write(controllers.join("__init__.py"), "").unwrap();
        fs::write(
            controllers.join("ControllerBase.py"),
            "class ControllerBase(Controller):\n    pass\n",
        )
        .unwrap();
        let controllers = controllers.canonicalize().unwrap();
        (dir, controllers)
    }

    #[test]
    fn test_resolve_absolute_from_parent_directory() {
        let (_dir, controllers) = project();
        let frontend = create_frontend("python").unwrap();
        let cache = ModuleCache::new();
        let source = controllers.join("TodoController.py");

        let found = cache.resolve(
            &*frontend,
            &source,
            &absolute("controllers.ControllerBase", &["ControllerBase"]),
        );
        assert_eq!(found, vec![controllers.join("ControllerBase.py")]);

        assert!(cache
            .resolve(&*frontend, &source, &absolute("pywebchannel", &["Controller"]))
            .is_empty());
    }

    #[test]
    fn test_resolve_relative() {
        let (_dir, controllers) = project();
        let frontend = create_frontend("python").unwrap();
        let cache = ModuleCache::new();
        let source = controllers.join("TodoController.py");

        let import = ModuleImport {
            level: 1,
            module: "ControllerBase".to_string(),
            names: vec!["ControllerBase".to_string()],
        };
        assert_eq!(
            cache.resolve(&*frontend, &source, &import),
            vec![controllers.join("ControllerBase.py")]
        );
    }

    #[test]
    fn test_load_imports_records_dependencies() {
        let (_dir, controllers) = project();
        let mut frontend = create_frontend("python").unwrap();
        let mut cache = ModuleCache::new();
        let source = controllers.join("TodoController.py");
        let base = controllers.join("ControllerBase.py");

        let classes = cache.load_imports(
            &mut *frontend,
            &template(),
            &source,
            &[absolute("controllers.ControllerBase", &["ControllerBase"])],
        );

        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ControllerBase"]);
        assert_eq!(cache.dependencies(&source), vec![base.clone()]);
        assert_eq!(cache.dependents(&base), vec![source]);
        assert!(cache.invalidate(&base));
        assert!(!cache.invalidate(&base));
    }

    #[test]
    fn test_import_cycles_terminate() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::write(root.join("a.py"), "from b import B\nclass A(B):\n    pass\n").unwrap();
        fs::write(root.join("b.py"), "from a import A\nclass B(Controller):\n    pass\n").unwrap();

        let mut frontend = create_frontend("python").unwrap();
        let mut cache = ModuleCache::new();
        let classes = cache.load_imports(
            &mut *frontend,
            &template(),
            &root.join("main.py"),
            &[absolute("a", &["A"])],
        );

        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
