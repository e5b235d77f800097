//! Language frontends for loading backend classes.
//!
//! A frontend reads one source file and registers every class it defines
//! in a [`ClassRegistry`], producing the same metadata a run-time object
//! system would report for the loaded module.

pub mod python;

use std::path::{Path, PathBuf};
use crate::diagnostic::GeneratorError;
use crate::reflect::ClassRegistry;

/// A module another source file depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleImport {
    /// 0 for an absolute import. 1 is the importing file's directory,
    /// each further level its parent.
    pub level: usize,
    /// Dotted module path.
    pub module: String,
    /// Names imported from the module.
    pub names: Vec<String>,
}

/// What loading one source file produced.
#[derive(Debug, Clone, Default)]
pub struct LoadedModule {
    /// Classes defined by the file, in declaration order.
    pub classes: Vec<String>,
    pub imports: Vec<ModuleImport>,
}

/// Trait for language frontends.
pub trait Frontend {
    /// Returns the language name (e.g., "python").
    fn language(&self) -> &str;

    /// Returns file extensions this frontend handles (e.g., ["py"]).
    fn extensions(&self) -> &[&str];

    /// Loads source text into `registry`.
    fn load_source(
        &mut self,
        source: &str,
        path: &Path,
        registry: &mut ClassRegistry,
    ) -> Result<LoadedModule, GeneratorError>;

    /// Files that may define `import`, relative to a search root, most
    /// specific first.
    fn module_files(&self, import: &ModuleImport) -> Vec<PathBuf>;

    /// Reads and loads a source file.
    fn load_file(&mut self, path: &Path, registry: &mut ClassRegistry) -> Result<LoadedModule, GeneratorError> {
        let source = std::fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e.to_string()))?;
        self.load_source(&source, path, registry)
    }

    /// Returns true if `path` has one of this frontend's extensions.
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| self.extensions().contains(&ext.to_string_lossy().as_ref()))
            .unwrap_or(false)
    }
}

/// Creates a frontend for the given language.
pub fn create_frontend(language: &str) -> Result<Box<dyn Frontend>, GeneratorError> {
    match language {
        "python" | "py" => Ok(Box::new(python::PythonFrontend::new()?)),
        _ => Err(GeneratorError::UnsupportedLanguage {
            language: language.to_string(),
        }),
    }
}
