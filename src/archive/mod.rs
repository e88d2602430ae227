//! Project import and export.
//!
//! Two on-disk representations are supported:
//!
//! - **JSON**: the whole `GraphProject` as one document. Resident asset bytes
//!   cannot travel this way, so it is lossy for local assets. Kept for files
//!   written by older editors.
//! - **ZIP**: a `project.json` manifest with every in-memory-only asset field
//!   stripped, plus one file per asset payload under `assets/`, named by the
//!   asset's `originalName`.
//!
//! # Archive Structure
//!
//! ```text
//! project.json
//! assets/
//! assets/diagram.png
//! assets/notes.md
//! ```
//!
//! Import picks the format from the file name or MIME type: `.json` (or
//! `application/json`) goes through the JSON path, anything else is opened
//! as a ZIP archive. Both paths upgrade legacy inline node content before
//! handing the document back, and neither touches a store: callers pass the
//! result to `ProjectStore::load_project` once it has parsed cleanly.

pub mod delivery;

pub use delivery::{Delivery, DirectoryDelivery, MemoryDelivery, write_atomic};

use std::collections::BTreeSet;
use std::fmt;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::models::{GraphProject, migrate};
use crate::{Error, Result};

/// Name of the manifest entry at the archive root.
pub const MANIFEST_NAME: &str = "project.json";

/// Directory entry holding asset payloads.
pub const ASSETS_DIR: &str = "assets/";

/// Supported export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Manifest plus asset files (lossless)
    #[default]
    Zip,
    /// Single JSON document (drops asset bytes)
    Json,
}

impl ExportFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "zip" => Some(ExportFormat::Zip),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Zip => "zip",
            ExportFormat::Json => "json",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file handed to import: its name, optional MIME type, and contents.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ProjectFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read a file from disk, naming it after the path's file name.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    /// Whether import should treat this as a plain JSON document.
    pub fn is_json(&self) -> bool {
        self.name.to_lowercase().ends_with(".json")
            || self.mime_type.as_deref() == Some("application/json")
    }
}

// === Export ===

/// Serialize a project in the given format.
pub fn export(project: &GraphProject, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Zip => export_zip(project),
        ExportFormat::Json => export_json(project),
    }
}

/// Serialize the project as a single JSON document.
///
/// Asset metadata, preview handles and text caches are kept; resident bytes
/// are not.
pub fn export_json(project: &GraphProject) -> Result<Vec<u8>> {
    let local_payloads = project
        .assets
        .values()
        .filter(|a| a.file.is_some())
        .count();
    if local_payloads > 0 {
        tracing::warn!(
            assets = local_payloads,
            "JSON export drops resident asset bytes; use zip to keep them"
        );
    }

    let bytes = serde_json::to_vec_pretty(project)?;
    tracing::info!(project = %project.meta.id, bytes = bytes.len(), "exported JSON");
    Ok(bytes)
}

/// Serialize the project as a ZIP archive.
///
/// Assets with neither resident bytes nor cached text get no file; their
/// metadata still lives in the manifest. When two assets share an
/// `originalName` only the first is written.
pub fn export_zip(project: &GraphProject) -> Result<Vec<u8>> {
    let manifest_bytes = serde_json::to_vec_pretty(&manifest(project))?;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file(MANIFEST_NAME, options)?;
        zip.write_all(&manifest_bytes)?;

        zip.add_directory(ASSETS_DIR, options)?;

        let mut written: BTreeSet<&str> = BTreeSet::new();
        for asset in project.assets.values() {
            let Some(payload) = asset.payload() else {
                tracing::warn!(asset = %asset.id, name = %asset.original_name, "asset has no payload, exporting metadata only");
                continue;
            };
            if !written.insert(asset.original_name.as_str()) {
                tracing::warn!(asset = %asset.id, name = %asset.original_name, "duplicate asset file name, skipping payload");
                continue;
            }

            zip.start_file(format!("{}{}", ASSETS_DIR, asset.original_name), options)?;
            zip.write_all(payload)?;
        }

        zip.finish()?;
    }

    let bytes = cursor.into_inner();
    tracing::info!(project = %project.meta.id, bytes = bytes.len(), "exported ZIP");
    Ok(bytes)
}

/// Copy of the project with every in-memory-only asset field removed.
pub fn manifest(project: &GraphProject) -> GraphProject {
    let mut clean = project.clone();
    for asset in clean.assets.values_mut() {
        *asset = asset.manifest_entry();
    }
    clean
}

// === Import ===

/// Parse a project file, dispatching on its name and MIME type.
pub fn import_project(file: &ProjectFile) -> Result<GraphProject> {
    tracing::info!(name = %file.name, bytes = file.bytes.len(), "importing project");
    if file.is_json() {
        import_json(&file.bytes)
    } else {
        import_zip(&file.bytes)
    }
}

/// Parse a standalone JSON project document.
///
/// Only the presence of `categories` and `nodes` is checked up front; the
/// rest must match the document shape.
pub fn import_json(bytes: &[u8]) -> Result<GraphProject> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| Error::Format(format!("Project file is not valid JSON: {}", e)))?;

    let has = |key: &str| value.get(key).is_some_and(|v| !v.is_null());
    if !has("categories") || !has("nodes") {
        return Err(Error::Format(
            "Project file is missing categories or nodes".to_string(),
        ));
    }

    let mut project: GraphProject = serde_json::from_value(value)
        .map_err(|e| Error::Format(format!("Project file has an invalid shape: {}", e)))?;
    migrate::upgrade(&mut project);
    Ok(project)
}

/// Open a ZIP archive and rebuild the project with its asset payloads.
///
/// Assets whose file is missing from `assets/` stay metadata-only.
pub fn import_zip(bytes: &[u8]) -> Result<GraphProject> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let manifest = match read_entry(&mut archive, MANIFEST_NAME)? {
        Some(bytes) => bytes,
        None => {
            return Err(Error::Format(format!(
                "Invalid archive: {} not found",
                MANIFEST_NAME
            )));
        }
    };

    let mut project: GraphProject = serde_json::from_slice(&manifest)
        .map_err(|e| Error::Format(format!("Invalid {}: {}", MANIFEST_NAME, e)))?;

    // Export writes only the first asset per name; hydrate the same one.
    let mut claimed: BTreeSet<String> = BTreeSet::new();
    for asset in project.assets.values_mut() {
        if !claimed.insert(asset.original_name.clone()) {
            tracing::warn!(asset = %asset.id, name = %asset.original_name, "duplicate asset file name, leaving metadata only");
            continue;
        }
        let path = format!("{}{}", ASSETS_DIR, asset.original_name);
        match read_entry(&mut archive, &path)? {
            Some(payload) => asset.set_payload(payload),
            None => {
                tracing::warn!(asset = %asset.id, %path, "asset file missing from archive");
            }
        }
    }

    migrate::upgrade(&mut project);
    tracing::info!(
        project = %project.meta.id,
        assets = project.assets.len(),
        "imported ZIP"
    );
    Ok(project)
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Option<Vec<u8>>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer)?;
            Ok(Some(buffer))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
