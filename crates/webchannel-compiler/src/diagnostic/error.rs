//! Generator error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while generating interfaces.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum GeneratorError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to access '{}': {message}", path.display())]
    #[diagnostic(code(webchannel::io::access_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Failed to initialize parser")]
    #[diagnostic(code(webchannel::parse::init_failed))]
    ParserInitFailed,

    #[error("Failed to parse file: {}", path.display())]
    #[diagnostic(code(webchannel::parse::parse_failed))]
    ParseFailed {
        path: PathBuf,
    },

    // =========================================================================
    // Analysis Errors
    // =========================================================================
    #[error("Class '{name}' is neither a controller nor a model")]
    #[diagnostic(
        code(webchannel::analysis::unsupported_class),
        help("Derive the class from 'Controller' or from Pydantic's 'BaseModel'")
    )]
    UnsupportedClass {
        name: String,
    },

    #[error("Class '{name}' is not known to the introspector")]
    #[diagnostic(code(webchannel::analysis::unknown_class))]
    UnknownClass {
        name: String,
    },

    // =========================================================================
    // Watch Errors
    // =========================================================================
    #[error("Could not watch '{}': {message}", path.display())]
    #[diagnostic(code(webchannel::watch::registration_failed))]
    WatchFailed {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration in '{}': {message}", path.display())]
    #[diagnostic(code(webchannel::config::invalid))]
    ConfigError {
        path: PathBuf,
        message: String,
    },

    #[error("Invalid directory mapping '{mapping}'")]
    #[diagnostic(
        code(webchannel::config::invalid_mapping),
        help("Mappings are written as SOURCE_DIR=TARGET_DIR")
    )]
    InvalidMapping {
        mapping: String,
    },

    // =========================================================================
    // Frontend Errors
    // =========================================================================
    #[error("Unsupported language: {language}")]
    #[diagnostic(code(webchannel::frontend::unsupported_language))]
    UnsupportedLanguage {
        language: String,
    },
}

impl GeneratorError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a watch registration error.
    pub fn watch(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::WatchFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}
