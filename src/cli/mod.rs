//! CLI argument definitions for Graphbook.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::archive::ExportFormat;

/// Default working project file.
pub const DEFAULT_PROJECT_FILE: &str = "project.gbz";

/// Graphbook - Organize content nodes into categories and connect them.
///
/// Start with `gb new`, add categories and nodes, then `gb export` to share.
#[derive(Parser, Debug)]
#[command(name = "gb")]
#[command(author, version, about = "A CLI tool for authoring knowledge graphs", long_about = None)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (", env!("GB_GIT_COMMIT"), " ", env!("GB_BUILD_TIMESTAMP"), ")"
))]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Working project file (a ZIP archive, or .json for the legacy format)
    #[arg(
        short = 'p',
        long = "project",
        global = true,
        env = "GB_PROJECT",
        default_value = DEFAULT_PROJECT_FILE
    )]
    pub project: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new empty project in the working file
    New {
        /// Project name (defaults to config `project-name`)
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing working file
        #[arg(long)]
        force: bool,
    },

    /// Show project overview (default when no command is given)
    Show,

    /// Rename the project
    Rename {
        /// New project name
        name: String,
    },

    /// Category management commands
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Node management commands
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Edge management commands (directed links between nodes)
    Edge {
        #[command(subcommand)]
        command: EdgeCommands,
    },

    /// Asset management commands
    Asset {
        #[command(subcommand)]
        command: AssetCommands,
    },

    /// Export the project to a directory
    Export {
        /// Output directory
        dir: PathBuf,

        /// Output format (defaults to config `export-format`)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// File name without extension (defaults to the project name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Replace the working project with an exported .zip or .json file
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Add a category at the front
    Add {
        /// Category name (unique, case-insensitive)
        name: String,

        /// Hex colour, e.g. "#3b82f6" (defaults to the next palette colour)
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Rename or recolour a category
    Update {
        /// Category ID
        id: String,

        /// New name
        name: String,

        /// New hex colour
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete a category with its nodes and their edges
    Delete {
        /// Category ID
        id: String,
    },

    /// Move a category to a new position
    Move {
        /// Category ID
        id: String,

        /// Target position (0-based)
        index: usize,
    },

    /// List categories in order
    List,
}

/// Node subcommands
#[derive(Subcommand, Debug)]
pub enum NodeCommands {
    /// Append a node to a category
    Add {
        /// Category ID
        category: String,

        /// Title (defaults to "New Item")
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Show node details with content and edges
    Show {
        /// Node ID
        id: String,
    },

    /// Update node fields
    Update {
        /// Node ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Asset holding the node body
        #[arg(long, conflicts_with = "clear_content")]
        content_asset: Option<String>,

        /// Detach the node body
        #[arg(long)]
        clear_content: bool,

        /// Canvas X position (requires --y)
        #[arg(long, requires = "y", allow_hyphen_values = true)]
        x: Option<f64>,

        /// Canvas Y position (requires --x)
        #[arg(long, requires = "x", allow_hyphen_values = true)]
        y: Option<f64>,

        /// Remove the canvas position
        #[arg(long, conflicts_with_all = ["x", "y"])]
        clear_position: bool,
    },

    /// Delete a node and its edges
    Delete {
        /// Node ID
        id: String,
    },

    /// Move a node to a position within a category
    Move {
        /// Node ID
        id: String,

        /// Target category ID
        category: String,

        /// Target position (0-based)
        index: usize,
    },

    /// List nodes, optionally for one category
    List {
        /// Category ID filter
        #[arg(short, long)]
        category: Option<String>,
    },
}

/// Edge subcommands
#[derive(Subcommand, Debug)]
pub enum EdgeCommands {
    /// Link SOURCE to TARGET
    Add {
        /// Source node ID
        source: String,

        /// Target node ID
        target: String,
    },

    /// Remove an edge
    Delete {
        /// Edge ID
        id: String,
    },

    /// List edges, optionally touching one node
    List {
        /// Node ID filter
        #[arg(short, long)]
        node: Option<String>,
    },
}

/// Asset subcommands
#[derive(Subcommand, Debug)]
pub enum AssetCommands {
    /// Store a local file as an asset
    Add {
        /// File to read
        file: PathBuf,

        /// MIME type (guessed from the extension if omitted)
        #[arg(short = 't', long = "type")]
        mime_type: Option<String>,

        /// Use the asset as this node's body
        #[arg(short, long)]
        node: Option<String>,
    },

    /// Reference a remote file
    Remote {
        /// File name
        name: String,

        /// Remote URL
        url: String,

        /// MIME type (guessed from the name if omitted)
        #[arg(short = 't', long = "type")]
        mime_type: Option<String>,

        /// Remote media ID
        #[arg(long)]
        wp_id: Option<u64>,
    },

    /// Remove an asset and detach it from nodes
    Remove {
        /// Asset ID
        id: String,
    },

    /// List assets
    List,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration values and their sources
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}
