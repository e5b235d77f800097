//! Watch pipeline.
//!
//! Directories are watched for new files; every eligible file gets its
//! own watch and is regenerated whenever it, or a module it imports,
//! changes. Events are handled one at a time, each to completion. A
//! failing pass is logged and the watcher keeps running.

mod mapping;

pub use mapping::DirectoryMap;

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventHandler, DebouncedEvent, Debouncer};
use tracing::{debug, error, info, warn};

use crate::config::WatchMapping;
use crate::diagnostic::GeneratorError;
use crate::Generator;

/// Registers and removes file-system watches.
pub trait WatchBackend {
    fn watch(&mut self, path: &Path) -> Result<(), GeneratorError>;
    fn unwatch(&mut self, path: &Path) -> Result<(), GeneratorError>;
}

/// Debounced `notify` watches, one non-recursive registration per path.
pub struct NotifyBackend {
    debouncer: Debouncer<RecommendedWatcher>,
}

impl NotifyBackend {
    /// Creates a backend delivering debounced event batches to `handler`.
    pub fn new<F: DebounceEventHandler>(debounce: Duration, handler: F) -> Result<Self, GeneratorError> {
        let debouncer = new_debouncer(debounce, handler)
            .map_err(|e| GeneratorError::watch(PathBuf::new(), e.to_string()))?;
        Ok(Self { debouncer })
    }
}

impl WatchBackend for NotifyBackend {
    fn watch(&mut self, path: &Path) -> Result<(), GeneratorError> {
        self.debouncer
            .watcher()
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| GeneratorError::watch(path, e.to_string()))
    }

    fn unwatch(&mut self, path: &Path) -> Result<(), GeneratorError> {
        self.debouncer
            .watcher()
            .unwatch(path)
            .map_err(|e| GeneratorError::watch(path, e.to_string()))
    }
}

/// What a file-changed event led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The output file was rewritten.
    Generated(PathBuf),
    /// The source is gone and its output was deleted.
    Removed(PathBuf),
    /// The source is gone and there was no output to delete.
    Missing,
}

/// Keeps generated interfaces in sync with watched source directories.
pub struct GeneratorWatcher<B: WatchBackend> {
    generator: Generator,
    backend: B,
    directories: DirectoryMap,
    files: BTreeSet<PathBuf>,
}

impl<B: WatchBackend> GeneratorWatcher<B> {
    pub fn new(generator: Generator, backend: B) -> Self {
        Self {
            generator,
            backend,
            directories: DirectoryMap::new(),
            files: BTreeSet::new(),
        }
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Watched source files, sorted.
    pub fn watched_files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    pub fn is_watched(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    pub fn watched_directories(&self) -> &[WatchMapping] {
        self.directories.mappings()
    }

    pub fn output_path(&self, source: &Path) -> PathBuf {
        self.directories.output_path(source)
    }

    /// Starts watching `source` and generates every eligible file in it.
    ///
    /// Registering the same source directory twice is a no-op with a
    /// warning.
    pub fn add_directory(&mut self, source: &Path, target: &Path) -> Result<(), GeneratorError> {
        let source = canonical_dir(source)?;
        let target = canonical_dir(target)?;

        if self.directories.contains(&source) {
            warn!(directory = %source.display(), "Directory is already being watched");
            return Ok(());
        }

        self.backend.watch(&source)?;
        self.directories.insert(WatchMapping::new(&source, &target));
        self.generator.add_module_root(&source);
        info!(
            source = %source.display(),
            target = %target.display(),
            "Watching directory"
        );

        for file in self.generator.eligible_files(&source) {
            if let Err(e) = self.add_file(&file) {
                warn!(file = %file.display(), error = %e, "Could not add file");
            }
        }

        Ok(())
    }

    /// Starts watching a source file and generates it right away.
    ///
    /// A file that is already watched is left alone with a warning. A
    /// failing first pass is logged; the file stays watched.
    pub fn add_file(&mut self, path: &Path) -> Result<(), GeneratorError> {
        if !path.is_file() {
            return Err(GeneratorError::io(path, "file does not exist"));
        }
        let path = path
            .canonicalize()
            .map_err(|e| GeneratorError::io(path, e.to_string()))?;

        if self.files.contains(&path) {
            warn!(file = %path.display(), "File is already being watched");
            return Ok(());
        }

        self.backend.watch(&path)?;
        self.files.insert(path.clone());
        info!(file = %path.display(), "Watching file");

        if let Err(e) = self.on_file_changed(&path) {
            error!(file = %path.display(), error = %e, "Generation failed");
        }
        Ok(())
    }

    /// Adds eligible files of `dir` that are not watched yet. Returns the
    /// newly added files.
    pub fn on_directory_changed(&mut self, dir: &Path) -> Vec<PathBuf> {
        let mut added = Vec::new();

        for file in self.generator.eligible_files(dir) {
            if self.files.contains(&file) {
                continue;
            }
            match self.add_file(&file) {
                Ok(()) => added.push(file),
                Err(e) => warn!(file = %file.display(), error = %e, "Could not add file"),
            }
        }

        added
    }

    /// Regenerates the output of a watched file, or deletes it if the
    /// source no longer exists.
    pub fn on_file_changed(&mut self, path: &Path) -> Result<FileOutcome, GeneratorError> {
        let output = self.directories.output_path(path);

        if !path.exists() {
            self.forget_file(path);
            return if Generator::remove_output(&output)? {
                Ok(FileOutcome::Removed(output))
            } else {
                Ok(FileOutcome::Missing)
            };
        }

        self.generator.generate_file(path, &output)?;
        Ok(FileOutcome::Generated(output))
    }

    /// Removes a deleted source from the watched set so that recreating it
    /// is picked up by the next directory scan.
    fn forget_file(&mut self, path: &Path) {
        if self.files.remove(path) {
            // the OS usually drops the watch together with the file
            if let Err(e) = self.backend.unwatch(path) {
                debug!(file = %path.display(), error = %e, "Unwatch failed");
            }
        }
    }

    /// Regenerates watched files that import `module`.
    fn on_module_changed(&mut self, module: &Path) {
        self.generator.invalidate_module(module);

        let dependents: Vec<PathBuf> = self
            .generator
            .modules()
            .dependents(module)
            .into_iter()
            .filter(|source| source != module && self.files.contains(source))
            .collect();

        for source in dependents {
            debug!(file = %source.display(), module = %module.display(), "Imported module changed");
            if let Err(e) = self.on_file_changed(&source) {
                error!(file = %source.display(), error = %e, "Generation failed");
            }
        }
    }

    /// Routes one changed path. Errors are logged, never returned.
    pub fn handle_path(&mut self, path: &Path) -> Vec<PathBuf> {
        self.on_module_changed(path);

        if self.files.contains(path) {
            debug!(file = %path.display(), "File changed");
            if let Err(e) = self.on_file_changed(path) {
                error!(file = %path.display(), error = %e, "Generation failed");
            }
            return Vec::new();
        }

        let dir = if self.directories.contains(path) {
            Some(path)
        } else {
            path.parent().filter(|parent| self.directories.contains(parent))
        };

        match dir {
            Some(dir) => {
                debug!(directory = %dir.display(), "Directory changed");
                let dir = dir.to_path_buf();
                self.on_directory_changed(&dir)
            }
            None => {
                debug!(path = %path.display(), "Ignoring event outside watched paths");
                Vec::new()
            }
        }
    }

    /// Handles one debounced batch. A file picked up by a directory scan
    /// in this batch is not regenerated again for its own event.
    pub fn handle_events(&mut self, events: &[DebouncedEvent]) {
        let mut fresh: HashSet<PathBuf> = HashSet::new();

        for event in events {
            if fresh.contains(&event.path) {
                continue;
            }
            fresh.extend(self.handle_path(&event.path));
        }
    }
}

fn canonical_dir(path: &Path) -> Result<PathBuf, GeneratorError> {
    if !path.is_dir() {
        return Err(GeneratorError::io(path, "directory does not exist"));
    }
    path.canonicalize()
        .map_err(|e| GeneratorError::io(path, e.to_string()))
}
