//! Front-end declarations the generated files import.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::diagnostic::GeneratorError;

const SIGNAL_TS: &str = r#"// Notification carrier exposed by QWebChannel for every backend signal.
export interface Signal<T extends (...args: any[]) => void> {
  connect(callback: T): void;
  disconnect(callback: T): void;
}
"#;

const RESPONSE_TS: &str = r#"// Result envelope returned by backend slots without a declared return type.
export interface Response {
  success?: string;
  error?: string;
  data?: any;
}
"#;

/// Support files as `(file name, content)` pairs.
pub fn support_files() -> Vec<(&'static str, &'static str)> {
    vec![("Signal.ts", SIGNAL_TS), ("Response.ts", RESPONSE_TS)]
}

/// Writes the support declarations into `dir`, creating it if needed.
/// Existing files are left alone unless `overwrite` is set.
pub fn write_support_files(dir: &Path, overwrite: bool) -> Result<Vec<PathBuf>, GeneratorError> {
    std::fs::create_dir_all(dir).map_err(|e| GeneratorError::io(dir, e.to_string()))?;

    let mut written = Vec::new();
    for (name, content) in support_files() {
        let path = dir.join(name);
        if path.exists() && !overwrite {
            info!(path = %path.display(), "Support file exists, keeping it");
            continue;
        }
        std::fs::write(&path, content).map_err(|e| GeneratorError::io(&path, e.to_string()))?;
        info!(path = %path.display(), "Wrote support file");
        written.push(path);
    }

    Ok(written)
}
