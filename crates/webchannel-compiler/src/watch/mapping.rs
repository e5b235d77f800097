//! Source → target directory bookkeeping.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::WatchMapping;

/// Extension of every generated file.
const OUTPUT_EXTENSION: &str = "ts";

/// Registered directory mappings, in registration order.
#[derive(Debug, Clone, Default)]
pub struct DirectoryMap {
    mappings: Vec<WatchMapping>,
}

impl DirectoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, source: &Path) -> bool {
        self.target_for(source).is_some()
    }

    /// Records a mapping. Returns false if `source` is already mapped.
    pub fn insert(&mut self, mapping: WatchMapping) -> bool {
        if self.contains(&mapping.source) {
            return false;
        }
        self.mappings.push(mapping);
        true
    }

    pub fn target_for(&self, source: &Path) -> Option<&Path> {
        self.mappings
            .iter()
            .find(|m| m.source == source)
            .map(|m| m.target.as_path())
    }

    pub fn mappings(&self) -> &[WatchMapping] {
        &self.mappings
    }

    /// `target/stem.ts` for a source file. A file outside every mapped
    /// directory is generated next to itself.
    pub fn output_path(&self, source_file: &Path) -> PathBuf {
        let dir = source_file.parent().unwrap_or_else(|| Path::new(""));
        let target = match self.target_for(dir) {
            Some(target) => target,
            None => {
                warn!(
                    directory = %dir.display(),
                    "No target directory mapped, generating next to the source"
                );
                dir
            }
        };

        let stem = source_file.file_stem().unwrap_or_default().to_string_lossy();
        target.join(format!("{}.{}", stem, OUTPUT_EXTENSION))
    }
}
