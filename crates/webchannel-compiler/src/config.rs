//! Generator configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostic::GeneratorError;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "webchannel.json";

/// A watched source directory and the directory its generated files go to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchMapping {
    /// Directory containing backend source files.
    pub source: PathBuf,

    /// Directory receiving the generated `.ts` files.
    pub target: PathBuf,
}

impl WatchMapping {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Parses a `SOURCE=TARGET` command-line mapping.
    pub fn parse(text: &str) -> Result<Self, GeneratorError> {
        match text.split_once('=') {
            Some((source, target)) if !source.trim().is_empty() && !target.trim().is_empty() => {
                Ok(Self::new(source.trim(), target.trim()))
            }
            _ => Err(GeneratorError::InvalidMapping {
                mapping: text.to_string(),
            }),
        }
    }
}

/// Configuration for the WebChannel generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Source → target directory pairs, registered in order.
    pub mappings: Vec<WatchMapping>,

    /// Source language (default: "python").
    pub language: String,

    /// Name of the base class every controller derives from.
    pub controller_base: String,

    /// Name of the base class every data model derives from.
    pub model_base: String,

    /// Name of the universal root type where ancestry walks stop.
    pub root_type: String,

    /// File names never treated as sources even if the extension matches.
    pub excluded_files: Vec<String>,

    /// Import path prefix used for dependencies in generated files.
    pub models_import_path: String,

    /// Directory holding the front-end model declarations. When set, the
    /// import path is computed relative to each target directory instead
    /// of using `models_import_path`.
    pub models_dir: Option<PathBuf>,

    /// Quiet period before a burst of file-system events is handled.
    pub debounce_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mappings: Vec::new(),
            language: "python".to_string(),
            controller_base: "Controller".to_string(),
            model_base: "BaseModel".to_string(),
            root_type: "object".to_string(),
            excluded_files: vec!["__init__.py".to_string(), "ControllerBase.py".to_string()],
            models_import_path: "../models".to_string(),
            models_dir: None,
            debounce_ms: 200,
        }
    }
}

impl GeneratorConfig {
    /// Loads a JSON configuration file. Relative mapping paths are resolved
    /// against the directory containing the file.
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::ConfigError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config: GeneratorConfig =
            serde_json::from_str(&content).map_err(|e| GeneratorError::ConfigError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if let Some(base) = path.parent() {
            for mapping in &mut config.mappings {
                mapping.source = base.join(&mapping.source);
                mapping.target = base.join(&mapping.target);
            }
            if let Some(models_dir) = config.models_dir.take() {
                config.models_dir = Some(base.join(models_dir));
            }
        }

        Ok(config)
    }

    /// Loads `webchannel.json` from `dir` if present, otherwise returns defaults.
    pub fn load_or_default(dir: &Path) -> Result<Self, GeneratorError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns true if `file_name` is on the exclusion list.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded_files.iter().any(|f| f == file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.language, "python");
        assert_eq!(config.controller_base, "Controller");
        assert_eq!(config.model_base, "BaseModel");
        assert!(config.is_excluded("__init__.py"));
        assert!(config.is_excluded("ControllerBase.py"));
        assert!(!config.is_excluded("TodoController.py"));
    }

    #[test]
    fn test_parse_mapping() {
        let mapping = WatchMapping::parse("backend/controllers=frontend/src/api").unwrap();
        assert_eq!(mapping.source, PathBuf::from("backend/controllers"));
        assert_eq!(mapping.target, PathBuf::from("frontend/src/api"));

        assert!(WatchMapping::parse("backend/controllers").is_err());
        assert!(WatchMapping::parse("=frontend").is_err());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"{
                "mappings": [{ "source": "backend/controllers", "target": "frontend/api" }],
                "modelsImportPath": "../../models",
                "excludedFiles": ["__init__.py"]
            }"#,
        )
        .unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.mappings.len(), 1);
        assert_eq!(config.mappings[0].source, dir.path().join("backend/controllers"));
        assert_eq!(config.models_import_path, "../../models");
        assert!(!config.is_excluded("ControllerBase.py"));
        // untouched fields keep their defaults
        assert_eq!(config.debounce_ms, 200);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            GeneratorConfig::load(&path),
            Err(GeneratorError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = GeneratorConfig::load_or_default(dir.path()).unwrap();
        assert!(config.mappings.is_empty());
    }
}
