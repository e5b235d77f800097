//! # WebChannel Interface Generator
//!
//! This crate turns backend controller and model classes into TypeScript
//! interface declarations for a QWebChannel front end, and keeps them in
//! sync while the backend sources change.
//!
//! ## Supported Languages
//!
//! - Python (default)
//!
//! ## Architecture
//!
//! ```text
//! Source file (.py)
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Frontend   │  Parse and register classes
//! │ (py → meta)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Reflect    │  Ancestry, properties, signals, slots
//! │  (registry)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Extract    │  Classify, build interfaces
//! │ (meta → IR)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Imports + interface blocks
//! │  (IR → TS)   │
//! └──────────────┘
//! ```
//!
//! The [`watch`] module drives this pipeline from file-system events.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use webchannel_compiler::{Generator, GeneratorConfig};
//!
//! let mut generator = Generator::new(GeneratorConfig::default())?;
//! let result = generator.generate_file(
//!     "backend/controllers/TodoController.py".as_ref(),
//!     "frontend/src/api/controllers/TodoController.ts".as_ref(),
//! )?;
//! println!("{} interfaces", result.interfaces.len());
//! ```

pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod extract;
pub mod frontend;
pub mod ir;
pub mod modules;
pub mod reflect;
pub mod watch;

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

pub use config::{GeneratorConfig, WatchMapping};
pub use diagnostic::GeneratorError;
pub use ir::Interface;

use extract::BaseTypes;
use frontend::Frontend;
use modules::ModuleCache;
use reflect::ClassRegistry;
use watch::DirectoryMap;

/// Runs the load → extract → emit pipeline for single source files.
pub struct Generator {
    config: GeneratorConfig,
    bases: BaseTypes,
    frontend: Box<dyn Frontend>,
    modules: ModuleCache,
}

/// Result of one generation pass.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Names of the interfaces written, in file order.
    pub interfaces: Vec<String>,
}

impl Generator {
    /// Creates a generator for the configured language.
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        let frontend = frontend::create_frontend(&config.language)?;
        let bases = BaseTypes::new(&config.controller_base, &config.model_base);
        let mut modules = ModuleCache::new();
        for mapping in &config.mappings {
            modules.add_root(&mapping.source);
        }
        Ok(Self {
            config,
            bases,
            frontend,
            modules,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn modules(&self) -> &ModuleCache {
        &self.modules
    }

    /// Adds a directory searched for imported modules.
    pub fn add_module_root(&mut self, dir: &Path) {
        self.modules.add_root(dir);
    }

    /// Forgets the cached parse of an imported module.
    pub fn invalidate_module(&mut self, path: &Path) -> bool {
        self.modules.invalidate(path)
    }

    /// A registry holding only the built-in hierarchy. Every pass starts
    /// from one, so nothing from an earlier load survives an edit.
    fn fresh_registry(&self) -> ClassRegistry {
        ClassRegistry::with_builtins(
            &self.config.root_type,
            &self.config.controller_base,
            &self.config.model_base,
        )
    }

    /// Extracts the interfaces of in-memory source text. Modules it
    /// imports are read from disk relative to `path`.
    pub fn analyze_source(&mut self, source: &str, path: &Path) -> Result<Vec<Interface>, GeneratorError> {
        let mut own = self.fresh_registry();
        let loaded = self.frontend.load_source(source, path, &mut own)?;

        let mut registry = self.fresh_registry();
        let imported = self
            .modules
            .load_imports(self.frontend.as_mut(), &registry, path, &loaded.imports);
        debug!(
            path = %path.display(),
            classes = loaded.classes.len(),
            imported = imported.len(),
            "Loaded source file"
        );

        // the file's own classes shadow imported ones of the same name
        for class in imported.into_iter().chain(own.defined().iter().cloned()) {
            registry.register(class);
        }
        extract::extract_all(&registry, &loaded.classes, &self.bases)
    }

    /// Extracts the interfaces defined in a source file.
    pub fn analyze_file(&mut self, path: &Path) -> Result<Vec<Interface>, GeneratorError> {
        let source = std::fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e.to_string()))?;
        self.analyze_source(&source, path)
    }

    /// Renders the generated file content for a source file whose output
    /// goes to `target_dir`.
    pub fn render_file(&mut self, path: &Path, target_dir: &Path) -> Result<(String, Vec<Interface>), GeneratorError> {
        let interfaces = self.analyze_file(path)?;
        let import_path = codegen::models_import_path(
            target_dir,
            self.config.models_dir.as_deref(),
            &self.config.models_import_path,
        );
        Ok((codegen::render(&interfaces, &import_path), interfaces))
    }

    /// Generates `output` from `source`, overwriting it unconditionally.
    pub fn generate_file(&mut self, source: &Path, output: &Path) -> Result<GenerateResult, GeneratorError> {
        let target_dir = output.parent().unwrap_or_else(|| Path::new(""));
        let (content, interfaces) = self.render_file(source, target_dir)?;

        if !target_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(target_dir).map_err(|e| GeneratorError::io(target_dir, e.to_string()))?;
        }
        std::fs::write(output, content).map_err(|e| GeneratorError::io(output, e.to_string()))?;

        let names: Vec<String> = interfaces.into_iter().map(|i| i.name).collect();
        info!(
            source = %source.display(),
            output = %output.display(),
            interfaces = ?names,
            "Generated interfaces"
        );

        Ok(GenerateResult {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            interfaces: names,
        })
    }

    /// Deletes a generated file. Returns false if there was nothing to
    /// delete.
    pub fn remove_output(output: &Path) -> Result<bool, GeneratorError> {
        if !output.exists() {
            return Ok(false);
        }
        std::fs::remove_file(output).map_err(|e| GeneratorError::io(output, e.to_string()))?;
        info!(output = %output.display(), "Removed generated file");
        Ok(true)
    }

    /// Returns true if `path` is a source file this generator handles.
    pub fn is_eligible(&self, path: &Path) -> bool {
        let excluded = path
            .file_name()
            .map(|name| self.config.is_excluded(&name.to_string_lossy()))
            .unwrap_or(true);
        !excluded && self.frontend.handles(path)
    }

    /// Eligible files directly inside `dir`, sorted by name.
    pub fn eligible_files(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| self.is_eligible(path))
            .collect()
    }

    /// One pass over every eligible file of a mapping, without watching.
    /// Stops at the first failing file.
    pub fn generate_mapping(&mut self, mapping: &WatchMapping) -> Result<Vec<GenerateResult>, GeneratorError> {
        if !mapping.source.is_dir() {
            return Err(GeneratorError::io(&mapping.source, "source directory does not exist"));
        }

        let mut directories = DirectoryMap::new();
        directories.insert(mapping.clone());
        self.modules.add_root(&mapping.source);

        let mut results = Vec::new();
        for source in self.eligible_files(&mapping.source) {
            let output = directories.output_path(&source);
            results.push(self.generate_file(&source, &output)?);
        }
        Ok(results)
    }
}
