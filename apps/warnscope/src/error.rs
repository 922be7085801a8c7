//! Typed errors for warnscope.
//!
//! - `WarnscopeError`: configuration, history and I/O failures that abort a
//!   command (mapped to exit code 2 by the binary).
//! - `ParseError`: a single report file could not be parsed. The recorder
//!   turns these into error messages of the affected result instead of
//!   aborting.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a warnscope command.
#[derive(Debug, Error)]
pub enum WarnscopeError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path} is not valid: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("No tools configured. Add [[tools]] to warnscope.toml.")]
    NoTools,

    #[error("Duplicate tool id '{0}' (set a unique `id` per tool)")]
    DuplicateToolId(String),

    #[error("Invalid filter pattern '{pattern}': {source}")]
    FilterPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid file pattern '{pattern}': {source}")]
    FilePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Build record {path} is corrupt: {source}")]
    CorruptBuild {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Build #{0} not found")]
    BuildNotFound(u64),

    #[error("No builds recorded yet")]
    NoBuilds,

    #[error("Result '{id}' not found in build #{build}")]
    ResultNotFound { id: String, build: u64 },

    #[error("No copy of '{file}' stored with build #{build}")]
    SourceNotFound { file: String, build: u64 },

    #[error("Failed to serialize build record: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors raised while parsing one report file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("unexpected root element <{found}> (expected <{expected}>)")]
    UnexpectedRoot { expected: String, found: String },

    #[error("document is empty")]
    Empty,
}

pub type Result<T> = std::result::Result<T, WarnscopeError>;
