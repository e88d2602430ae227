//! Graphbook - A knowledge-graph authoring library.
//!
//! This library provides the core functionality for the `gb` CLI tool:
//! an in-memory project store over categories, nodes, edges and assets,
//! plus JSON and ZIP serialization of whole projects.

pub mod archive;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod store;
pub mod toast;

use std::path::PathBuf;

/// Library-level error type for Graphbook operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Not initialized: no project at {}, run `gb new` first", .0.display())]
    NotInitialized(PathBuf),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid format: {0}")]
    Format(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Graphbook operations.
pub type Result<T> = std::result::Result<T, Error>;
