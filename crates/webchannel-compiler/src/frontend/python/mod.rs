//! Python frontend for the WebChannel generator.

pub mod ast;
pub mod parser;
pub mod to_ir;

use std::path::{Path, PathBuf};

use crate::diagnostic::GeneratorError;
use crate::reflect::ClassRegistry;
use super::{Frontend, LoadedModule, ModuleImport};
use parser::PythonParser;

/// Python frontend implementation.
pub struct PythonFrontend {
    parser: PythonParser,
}

impl PythonFrontend {
    /// Creates a new Python frontend.
    pub fn new() -> Result<Self, GeneratorError> {
        Ok(Self {
            parser: PythonParser::new()?,
        })
    }
}

impl Frontend for PythonFrontend {
    fn language(&self) -> &str {
        "python"
    }

    fn extensions(&self) -> &[&str] {
        &["py"]
    }

    fn load_source(
        &mut self,
        source: &str,
        path: &Path,
        registry: &mut ClassRegistry,
    ) -> Result<LoadedModule, GeneratorError> {
        let parsed = self.parser.parse(source, path)?;
        let classes = to_ir::to_registry(&parsed, registry);
        let imports = parsed
            .imports
            .iter()
            .map(|import| ModuleImport {
                level: import.level,
                module: import.module.clone(),
                names: import.specifiers.iter().map(|s| s.name.clone()).collect(),
            })
            .collect();

        Ok(LoadedModule { classes, imports })
    }

    /// `a.b` → `a/b.py`, `a/b/__init__.py`, then `a/b/<name>.py` for
    /// every imported name that may be a submodule.
    fn module_files(&self, import: &ModuleImport) -> Vec<PathBuf> {
        let package: PathBuf = import.module.split('.').filter(|s| !s.is_empty()).collect();
        let mut files = Vec::new();

        if !package.as_os_str().is_empty() {
            files.push(package.with_extension("py"));
        }
        files.push(package.join("__init__.py"));
        for name in &import.names {
            files.push(package.join(format!("{}.py", name)));
        }

        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_files() {
        let frontend = PythonFrontend::new().unwrap();
        let import = ModuleImport {
            level: 0,
            module: "controllers.ControllerBase".to_string(),
            names: vec!["ControllerBase".to_string()],
        };

        assert_eq!(
            frontend.module_files(&import),
            vec![
                PathBuf::from("controllers/ControllerBase.py"),
                PathBuf::from("controllers/ControllerBase/__init__.py"),
                PathBuf::from("controllers/ControllerBase/ControllerBase.py"),
            ]
        );

        let relative = ModuleImport {
            level: 1,
            module: String::new(),
            names: vec!["ControllerBase".to_string()],
        };
        assert_eq!(
            frontend.module_files(&relative),
            vec![PathBuf::from("__init__.py"), PathBuf::from("ControllerBase.py")]
        );
    }
}
