//! Data models for Graphbook projects.
//!
//! This module defines the document shapes that are persisted to disk:
//! - `GraphProject` - Root aggregate holding everything below
//! - `Category` - Named, coloured column that groups nodes
//! - `Node` - A single content unit inside a category
//! - `Edge` - Directed relation between two nodes
//! - `Asset` - Binary or text resource referenced by id
//!
//! Field names are camelCase on the wire to stay compatible with files
//! written by the browser editor.

pub mod migrate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Document format version written into `meta.version` for new projects.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Name given to projects created without an explicit name.
pub const DEFAULT_PROJECT_NAME: &str = "New Project";

/// Title given to freshly added nodes.
pub const DEFAULT_NODE_TITLE: &str = "New Item";

/// Category colours, handed out round-robin.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#ef4444", // red
    "#f97316", // orange
    "#eab308", // yellow
    "#22c55e", // green
    "#06b6d4", // cyan
    "#3b82f6", // blue
    "#8b5cf6", // violet
    "#ec4899", // pink
    "#64748b", // slate
];

/// Generate a fresh unique identifier for any entity.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Check that a colour is a `#rgb` or `#rrggbb` hex string.
pub fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Project-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    /// Unique project identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Document format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl ProjectMeta {
    /// Create metadata for a brand new project.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            name: name.into(),
            version: FORMAT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// The saved project: one document per file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphProject {
    pub meta: ProjectMeta,

    /// Categories in display order
    pub categories: Vec<Category>,

    /// Nodes of every category; per-category order lives in `Node::order`
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub edges: Vec<Edge>,

    /// Assets keyed by asset id
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
}

impl GraphProject {
    /// Create an empty project with fresh metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: ProjectMeta::new(name),
            categories: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            assets: BTreeMap::new(),
        }
    }

    /// Refresh `meta.updated_at`.
    pub fn touch(&mut self) {
        self.meta.updated_at = Utc::now();
    }
}

impl Default for GraphProject {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_NAME)
    }
}

/// A named, coloured grouping of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,

    /// Trimmed display name, unique ignoring case
    pub name: String,

    /// Hex colour, e.g. "#3b82f6"
    pub color: String,

    /// Dense 0-based rank among categories
    #[serde(default)]
    pub order: usize,
}

impl Category {
    /// Create a new category with a generated id.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            color: color.into(),
            order: 0,
        }
    }
}

/// Visual placement of a node on the graph canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A single content unit belonging to exactly one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,

    /// Owning category
    pub category_id: String,

    pub title: String,

    /// Asset holding the node body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_asset_id: Option<String>,

    /// Dense 0-based rank within the owning category
    #[serde(default)]
    pub order: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    /// Inline body from documents written before bodies moved into assets.
    /// Read only; `migrate::upgrade` turns it into an asset.
    #[serde(rename = "content", default, skip_serializing)]
    pub legacy_content: Option<String>,
}

impl Node {
    /// Create a node with the default title and no content.
    pub fn new(category_id: impl Into<String>, order: usize) -> Self {
        Self {
            id: generate_id(),
            category_id: category_id.into(),
            title: DEFAULT_NODE_TITLE.to_string(),
            content_asset_id: None,
            order,
            position: None,
            legacy_content: None,
        }
    }

    /// Apply every field present in `patch`.
    pub fn apply(&mut self, patch: NodePatch) {
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content_asset_id) = patch.content_asset_id {
            self.content_asset_id = content_asset_id;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
    }
}

/// Partial update for a node. `None` leaves a field untouched; the nested
/// `Option` on clearable fields distinguishes "unset it" from "keep it".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub category_id: Option<String>,
    pub title: Option<String>,
    pub content_asset_id: Option<Option<String>>,
    pub position: Option<Option<Position>>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn content_asset(mut self, asset_id: Option<String>) -> Self {
        self.content_asset_id = Some(asset_id);
        self
    }

    pub fn position(mut self, position: Option<Position>) -> Self {
        self.position = Some(position);
        self
    }

    /// True when applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A directed relation between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,

    /// Source node ID
    pub source: String,

    /// Target node ID
    pub target: String,
}

impl Edge {
    /// Create a new edge with a generated id.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether this edge starts or ends at `node_id`.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Where an asset's bytes live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSource {
    /// Bytes travel with the project archive
    #[default]
    Local,
    /// Bytes live behind `url`
    Remote,
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSource::Local => write!(f, "local"),
            AssetSource::Remote => write!(f, "remote"),
        }
    }
}

/// A binary or text resource referenced by id.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,

    /// MIME type, e.g. "image/png" or "text/markdown"
    #[serde(rename = "type")]
    pub mime_type: String,

    /// File name used inside the archive's `assets/` folder
    pub original_name: String,

    #[serde(default)]
    pub source: AssetSource,

    /// Remote location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Remote CMS media id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wp_id: Option<u64>,

    /// Resident bytes; never serialized
    #[serde(skip)]
    pub file: Option<Vec<u8>>,

    /// Ephemeral preview handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_url: Option<String>,

    /// Decoded text cache for text and markdown assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
}

impl Asset {
    /// Create a local asset holding `bytes`.
    ///
    /// The text cache is filled when the asset looks like text.
    pub fn local(
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let mut asset = Self {
            id: generate_id(),
            mime_type: mime_type.into(),
            original_name: original_name.into(),
            source: AssetSource::Local,
            url: None,
            wp_id: None,
            file: None,
            blob_url: None,
            text_content: None,
        };
        asset.set_payload(bytes);
        asset
    }

    /// Create a remote asset that only references `url`.
    pub fn remote(
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        url: impl Into<String>,
        wp_id: Option<u64>,
    ) -> Self {
        Self {
            id: generate_id(),
            mime_type: mime_type.into(),
            original_name: original_name.into(),
            source: AssetSource::Remote,
            url: Some(url.into()),
            wp_id,
            file: None,
            blob_url: None,
            text_content: None,
        }
    }

    /// Text and markdown assets keep a decoded copy of their bytes.
    pub fn is_text(&self) -> bool {
        self.mime_type.contains("text") || self.original_name.ends_with(".md")
    }

    /// Replace the resident bytes, refreshing the text cache.
    pub fn set_payload(&mut self, bytes: Vec<u8>) {
        if self.is_text() {
            self.text_content = Some(String::from_utf8_lossy(&bytes).into_owned());
        }
        self.file = Some(bytes);
    }

    /// Bytes to write into an archive: the resident file, else the cached text.
    pub fn payload(&self) -> Option<&[u8]> {
        self.file
            .as_deref()
            .or_else(|| self.text_content.as_deref().map(str::as_bytes))
    }

    /// Copy with every in-memory-only field removed.
    pub fn manifest_entry(&self) -> Self {
        Self {
            file: None,
            blob_url: None,
            text_content: None,
            ..self.clone()
        }
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("id", &self.id)
            .field("mime_type", &self.mime_type)
            .field("original_name", &self.original_name)
            .field("source", &self.source)
            .field("url", &self.url)
            .field("wp_id", &self.wp_id)
            .field("file", &self.file.as_ref().map(|b| format!("<{} bytes>", b.len())))
            .field("blob_url", &self.blob_url)
            .field("has_text_content", &self.text_content.is_some())
            .finish()
    }
}
