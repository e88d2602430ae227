//! Configuration for Graphbook.
//!
//! ## config.kdl - User preferences
//!
//! Located at `$GB_CONFIG_DIR/config.kdl`, falling back to
//! `~/.config/graphbook/config.kdl`.
//!
//! Contains:
//! - `output-format` - "json" or "human"
//! - `project-name` - Name given to new projects
//! - `palette` - Category colours handed out round-robin
//! - `export-format` - "zip" or "json"
//! - `toast-duration-ms` - Lifetime of feedback messages
//!
//! ## Precedence
//!
//! CLI flag > config.kdl > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_DIR_ENV, ConfigOverrides, Resolved, ResolvedConfig, ValueSource, config_dir,
    config_path, load_config, resolve_config, resolve_from_dir, save_config,
};
pub use schema::{CONFIG_KEYS, GraphbookConfig, OutputFormat};
