//! TypeScript declaration generation.
//!
//! Output is a list of lines joined with `\n`. The layout is fixed:
//! banner header, one import per dependency, then one interface block per
//! class with `// Properties`, `// Signals` and `// Slots` sections. Only
//! the timestamp line differs between two runs over the same input.

pub mod support;
pub mod ts_types;

use std::collections::HashSet;
use std::path::Path;

use crate::ir::Interface;
use ts_types::is_ts_primitive;

const BANNER: &str = "////////////////////////////////////////////////////";

/// Prefix of the only line that varies between runs.
pub const TIMESTAMP_PREFIX: &str = "// Generation time: ";

/// Merges the dependencies of every interface in one output file.
/// First occurrence wins; primitives and names defined in the same file
/// are dropped.
pub fn resolve_imports(interfaces: &[Interface]) -> Vec<String> {
    let local: HashSet<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
    let mut seen = HashSet::new();

    interfaces
        .iter()
        .flat_map(Interface::dependencies)
        .filter(|dep| !is_ts_primitive(dep) && !local.contains(dep.as_str()))
        .filter(|dep| seen.insert(dep.clone()))
        .collect()
}

/// Import path for dependencies of a file written to `target_dir`.
///
/// With a models directory configured the path is relative to the target
/// directory; otherwise the fixed prefix is used.
pub fn models_import_path(target_dir: &Path, models_dir: Option<&Path>, fallback: &str) -> String {
    let relative = models_dir.and_then(|models| pathdiff::diff_paths(models, target_dir));

    match relative {
        Some(path) => {
            let text = path.to_string_lossy().replace('\\', "/");
            if text.is_empty() {
                ".".to_string()
            } else if text.starts_with("..") {
                text
            } else {
                format!("./{}", text)
            }
        }
        None => fallback.to_string(),
    }
}

/// Banner and timestamp lines, followed by a blank line.
pub fn header() -> Vec<String> {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    vec![
        BANNER.to_string(),
        "// Auto generated file".to_string(),
        format!("{}{}", TIMESTAMP_PREFIX, timestamp),
        BANNER.to_string(),
        String::new(),
    ]
}

/// One import line per dependency, then a blank line.
pub fn imports(dependencies: &[String], import_path: &str) -> Vec<String> {
    let mut lines: Vec<String> = dependencies
        .iter()
        .map(|dep| format!("import {{ {} }} from \"{}/{}\";", dep, import_path, dep))
        .collect();
    lines.push(String::new());
    lines
}

/// The block for one interface, followed by a blank separator line.
pub fn interface_block(interface: &Interface) -> Vec<String> {
    let mut lines = vec![
        format!("// {} interface", interface.name),
        format!("export interface {} {{", interface.name),
    ];

    push_section(&mut lines, "Properties", interface.properties.iter().map(|p| p.declaration()));
    push_section(&mut lines, "Signals", interface.notifications.iter().map(|n| n.declaration()));
    push_section(&mut lines, "Slots", interface.operations.iter().map(|o| o.declaration()));

    if !interface.is_empty() {
        // the last section's separator
        lines.pop();
    }

    lines.push("}".to_string());
    lines.push(String::new());
    lines
}

fn push_section(lines: &mut Vec<String>, title: &str, declarations: impl Iterator<Item = String>) {
    let mut declarations = declarations.peekable();
    if declarations.peek().is_none() {
        return;
    }

    lines.push(format!("  // {}", title));
    lines.extend(declarations.map(|declaration| format!("  {}", declaration)));
    lines.push(String::new());
}

/// Emits the complete line sequence of one generated file.
pub fn emit(interfaces: &[Interface], dependencies: &[String], import_path: &str) -> Vec<String> {
    let mut lines = header();
    lines.extend(imports(dependencies, import_path));
    for interface in interfaces {
        lines.extend(interface_block(interface));
    }
    lines
}

/// Emits and joins the file content.
pub fn render(interfaces: &[Interface], import_path: &str) -> String {
    let dependencies = resolve_imports(interfaces);
    emit(interfaces, &dependencies, import_path).join("\n")
}
