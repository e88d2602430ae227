//! Command implementations for the Graphbook CLI.
//!
//! Every project command follows the same shape: open the working file as a
//! `Session`, run one store action, save, and return a result that can be
//! printed as JSON or for humans. A failed action never reaches `save`, so
//! the working file only changes when the action succeeded.
//!
//! Store actions that find nothing to act on are not errors here either;
//! their result reports `false` and the process still exits successfully.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::archive::{self, DirectoryDelivery, ExportFormat, ProjectFile};
use crate::config::{self, GraphbookConfig, ResolvedConfig};
use crate::models::{Asset, Category, Edge, GraphProject, Node, NodePatch, Position};
use crate::store::ProjectStore;
use crate::toast::Toasts;
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
}

// === Session ===

/// A working project file opened for one command.
pub struct Session {
    path: PathBuf,
    store: ProjectStore,
    toasts: Toasts,
}

impl Session {
    /// Load the working file at `path`.
    pub fn open(path: &Path, config: &ResolvedConfig) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotInitialized(path.to_path_buf()));
        }

        let project = archive::import_project(&ProjectFile::read(path)?)?;
        let mut store = Self::configured_store(config);
        store.load_project(project);

        Ok(Self {
            path: path.to_path_buf(),
            store,
            toasts: Toasts::with_default_duration_ms(config.toast_duration_ms()),
        })
    }

    /// Start a fresh project that will be written to `path`.
    pub fn create(path: &Path, config: &ResolvedConfig) -> Self {
        let mut store = Self::configured_store(config);
        store.create_new();
        Self {
            path: path.to_path_buf(),
            store,
            toasts: Toasts::with_default_duration_ms(config.toast_duration_ms()),
        }
    }

    fn configured_store(config: &ResolvedConfig) -> ProjectStore {
        ProjectStore::new()
            .with_palette(config.palette().to_vec())
            .with_project_name(config.project_name())
    }

    /// Write the project back to the working file.
    ///
    /// A `.json` working file keeps the JSON format; anything else is a ZIP.
    pub fn save(&self) -> Result<()> {
        let format = if self.is_json() {
            ExportFormat::Json
        } else {
            ExportFormat::Zip
        };
        let bytes = archive::export(self.store.project(), format)?;
        archive::write_atomic(&self.path, &bytes)?;
        tracing::debug!(path = %self.path.display(), %format, "saved working project");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ProjectStore {
        &mut self.store
    }

    pub fn toasts_mut(&mut self) -> &mut Toasts {
        &mut self.toasts
    }

    /// Whether the working file is kept as a JSON document.
    pub fn is_json(&self) -> bool {
        ProjectFile::new(self.file_name(), Vec::new()).is_json()
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn require_category(&self, id: &str) -> Result<()> {
        match self.store.category(id) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(format!("Category {}", id))),
        }
    }

    fn require_node(&self, id: &str) -> Result<&Node> {
        self.store
            .node(id)
            .ok_or_else(|| Error::NotFound(format!("Node {}", id)))
    }
}

// === Project ===

#[derive(Serialize)]
pub struct ProjectCreated {
    pub id: String,
    pub name: String,
    pub path: String,
}

impl Output for ProjectCreated {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Created project \"{}\" ({}) at {}", self.name, self.id, self.path)
    }
}

/// Create a new working file.
pub fn new_project(
    path: &Path,
    config: &ResolvedConfig,
    name: Option<&str>,
    force: bool,
) -> Result<ProjectCreated> {
    if path.exists() && !force {
        return Err(Error::Other(format!(
            "{} already exists; use --force to overwrite",
            path.display()
        )));
    }

    let mut session = Session::create(path, config);
    if let Some(name) = name {
        session.store_mut().rename_project(name)?;
    }
    session.save()?;

    let meta = &session.store().project().meta;
    Ok(ProjectCreated {
        id: meta.id.clone(),
        name: meta.name.clone(),
        path: path.display().to_string(),
    })
}

#[derive(Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub color: String,
    pub order: usize,
    pub node_count: usize,
}

#[derive(Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub version: String,
    pub created_at: String,
    pub updated_at: String,
    pub category_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub asset_count: usize,
    pub categories: Vec<CategorySummary>,
}

impl Output for ProjectSummary {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("{} ({})", self.name, self.id),
            format!("  version {}, updated {}", self.version, self.updated_at),
            format!(
                "  {} categories, {} nodes, {} edges, {} assets",
                self.category_count, self.node_count, self.edge_count, self.asset_count
            ),
        ];
        for c in &self.categories {
            lines.push(format!(
                "  [{}] {} {} ({} nodes) {}",
                c.order, c.color, c.name, c.node_count, c.id
            ));
        }
        lines.join("\n")
    }
}

/// Summarize the working project.
pub fn show(session: &Session) -> ProjectSummary {
    let store = session.store();
    let project = store.project();
    ProjectSummary {
        id: project.meta.id.clone(),
        name: project.meta.name.clone(),
        version: project.meta.version.clone(),
        created_at: project.meta.created_at.to_rfc3339(),
        updated_at: project.meta.updated_at.to_rfc3339(),
        category_count: project.categories.len(),
        node_count: project.nodes.len(),
        edge_count: project.edges.len(),
        asset_count: project.assets.len(),
        categories: project
            .categories
            .iter()
            .map(|c| CategorySummary {
                id: c.id.clone(),
                name: c.name.clone(),
                color: c.color.clone(),
                order: c.order,
                node_count: store.nodes_by_category(&c.id).len(),
            })
            .collect(),
    }
}

#[derive(Serialize)]
pub struct Renamed {
    pub name: String,
}

impl Output for Renamed {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Renamed project to \"{}\"", self.name)
    }
}

pub fn rename(session: &mut Session, name: &str) -> Result<Renamed> {
    session.store_mut().rename_project(name)?;
    session.save()?;
    let name = session.store().project().meta.name.clone();
    session.toasts_mut().success(format!("Project renamed to {}", name));
    Ok(Renamed { name })
}

// === Generic outcomes ===

/// Result of an action that may find nothing to act on.
#[derive(Serialize)]
pub struct Changed {
    pub id: String,
    pub action: &'static str,
    pub changed: bool,
}

impl Output for Changed {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.changed {
            format!("{} {}", capitalize(self.action), self.id)
        } else {
            format!("Nothing to do: {} not found", self.id)
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn finish(session: &mut Session, id: &str, action: &'static str, changed: bool) -> Result<Changed> {
    if changed {
        session.save()?;
        session.toasts_mut().success(format!("{} {}", capitalize(action), id));
    } else {
        session.toasts_mut().info(format!("{} not found", id));
    }
    Ok(Changed {
        id: id.to_string(),
        action,
        changed,
    })
}

// === Categories ===

#[derive(Serialize)]
pub struct CategoryResult {
    pub category: Category,
}

impl Output for CategoryResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let c = &self.category;
        format!("[{}] {} {} {}", c.order, c.color, c.name, c.id)
    }
}

pub fn category_add(session: &mut Session, name: &str, color: Option<&str>) -> Result<CategoryResult> {
    let id = session.store_mut().add_category(name, color)?;
    session.save()?;

    let category = session
        .store()
        .category(&id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("Category {}", id)))?;
    session
        .toasts_mut()
        .success(format!("Category \"{}\" created", category.name));
    Ok(CategoryResult { category })
}

pub fn category_update(
    session: &mut Session,
    id: &str,
    name: &str,
    color: Option<&str>,
) -> Result<Changed> {
    let changed = session.store_mut().update_category(id, name, color)?;
    finish(session, id, "updated", changed)
}

pub fn category_delete(session: &mut Session, id: &str) -> Result<Changed> {
    let changed = session.store_mut().delete_category(id);
    finish(session, id, "deleted", changed)
}

pub fn category_move(session: &mut Session, id: &str, index: usize) -> Result<Changed> {
    let changed = session.store_mut().move_category(id, index);
    finish(session, id, "moved", changed)
}

#[derive(Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
    pub count: usize,
}

impl Output for CategoryList {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.categories.is_empty() {
            return "No categories.".to_string();
        }
        self.categories
            .iter()
            .map(|c| format!("[{}] {} {} {}", c.order, c.color, c.name, c.id))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn category_list(session: &Session) -> CategoryList {
    let categories = session.store().project().categories.clone();
    CategoryList {
        count: categories.len(),
        categories,
    }
}

// === Nodes ===

#[derive(Serialize)]
pub struct NodeResult {
    pub node: Node,
}

impl Output for NodeResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("[{}] {} {}", self.node.order, self.node.title, self.node.id)
    }
}

/// Append a node; unlike the store action, the category must exist.
pub fn node_add(session: &mut Session, category_id: &str, title: Option<&str>) -> Result<NodeResult> {
    session.require_category(category_id)?;

    let store = session.store_mut();
    let id = store.add_node(category_id);
    if let Some(title) = title {
        store.update_node(&id, NodePatch::new().title(title));
    }
    session.save()?;

    let node = session.require_node(&id)?.clone();
    session
        .toasts_mut()
        .success(format!("Node \"{}\" created", node.title));
    Ok(NodeResult { node })
}

#[derive(Serialize)]
pub struct NodeDetail {
    pub node: Node,
    pub category: Option<String>,
    pub content: Option<String>,
    pub outgoing: Vec<Edge>,
    pub incoming: Vec<Edge>,
}

impl Output for NodeDetail {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let n = &self.node;
        let mut lines = vec![format!("{} ({})", n.title, n.id)];
        lines.push(format!(
            "  category: {} #{}",
            self.category.as_deref().unwrap_or("<missing>"),
            n.order
        ));
        if let Some(p) = n.position {
            lines.push(format!("  position: ({}, {})", p.x, p.y));
        }
        if let Some(ref asset) = n.content_asset_id {
            lines.push(format!("  content asset: {}", asset));
        }
        for e in &self.outgoing {
            lines.push(format!("  -> {}", e.target));
        }
        for e in &self.incoming {
            lines.push(format!("  <- {}", e.source));
        }
        if let Some(ref text) = self.content {
            lines.push(String::new());
            lines.push(text.clone());
        }
        lines.join("\n")
    }
}

pub fn node_show(session: &Session, id: &str) -> Result<NodeDetail> {
    let node = session.require_node(id)?.clone();
    let store = session.store();
    let (outgoing, incoming): (Vec<Edge>, Vec<Edge>) = store
        .edges_for(id)
        .into_iter()
        .cloned()
        .partition(|e| e.source == id);

    Ok(NodeDetail {
        category: store.category(&node.category_id).map(|c| c.name.clone()),
        content: store.node_text(id).map(str::to_string),
        node,
        outgoing,
        incoming,
    })
}

/// Fields accepted by `gb node update`.
#[derive(Debug, Default)]
pub struct NodeUpdate {
    pub title: Option<String>,
    pub content_asset: Option<String>,
    pub clear_content: bool,
    pub position: Option<Position>,
    pub clear_position: bool,
}

impl NodeUpdate {
    fn into_patch(self) -> NodePatch {
        let mut patch = NodePatch::new();
        patch.title = self.title;
        if self.clear_content {
            patch.content_asset_id = Some(None);
        } else if let Some(asset) = self.content_asset {
            patch.content_asset_id = Some(Some(asset));
        }
        if self.clear_position {
            patch.position = Some(None);
        } else if let Some(position) = self.position {
            patch.position = Some(Some(position));
        }
        patch
    }
}

pub fn node_update(session: &mut Session, id: &str, update: NodeUpdate) -> Result<Changed> {
    let patch = update.into_patch();
    if patch.is_empty() {
        return Err(Error::Validation("Nothing to update".to_string()));
    }
    if let Some(Some(ref asset)) = patch.content_asset_id {
        if session.store().asset(asset).is_none() {
            return Err(Error::NotFound(format!("Asset {}", asset)));
        }
    }

    let changed = session.store_mut().update_node(id, patch);
    finish(session, id, "updated", changed)
}

pub fn node_delete(session: &mut Session, id: &str) -> Result<Changed> {
    let changed = session.store_mut().delete_node(id);
    finish(session, id, "deleted", changed)
}

pub fn node_move(session: &mut Session, id: &str, category_id: &str, index: usize) -> Result<Changed> {
    session.require_category(category_id)?;
    let changed = session.store_mut().move_node(id, category_id, index);
    finish(session, id, "moved", changed)
}

#[derive(Serialize)]
pub struct NodeList {
    pub nodes: Vec<Node>,
    pub count: usize,
}

impl Output for NodeList {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.nodes.is_empty() {
            return "No nodes.".to_string();
        }
        self.nodes
            .iter()
            .map(|n| format!("[{}] {} {} (category {})", n.order, n.title, n.id, n.category_id))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// List nodes in display order: category by category, then by rank.
pub fn node_list(session: &Session, category_id: Option<&str>) -> NodeList {
    let store = session.store();
    let nodes: Vec<Node> = match category_id {
        Some(id) => store.nodes_by_category(id).into_iter().cloned().collect(),
        None => {
            let mut all: Vec<Node> = store
                .project()
                .categories
                .iter()
                .flat_map(|c| store.nodes_by_category(&c.id))
                .cloned()
                .collect();
            // nodes pointing at a category that no longer exists
            all.extend(
                store
                    .project()
                    .nodes
                    .iter()
                    .filter(|n| store.category(&n.category_id).is_none())
                    .cloned(),
            );
            all
        }
    };
    NodeList {
        count: nodes.len(),
        nodes,
    }
}

// === Edges ===

#[derive(Serialize)]
pub struct EdgeAdded {
    pub source: String,
    pub target: String,
    pub created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Output for EdgeAdded {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match self.id {
            Some(ref id) => format!("Linked {} -> {} ({})", self.source, self.target, id),
            None => format!(
                "No edge created: {} -> {} is a self-link, a duplicate, or names an unknown node",
                self.source, self.target
            ),
        }
    }
}

pub fn edge_add(session: &mut Session, source: &str, target: &str) -> Result<EdgeAdded> {
    let id = session.store_mut().add_edge(source, target);
    if id.is_some() {
        session.save()?;
        session.toasts_mut().success("Edge created");
    }
    Ok(EdgeAdded {
        source: source.to_string(),
        target: target.to_string(),
        created: id.is_some(),
        id,
    })
}

pub fn edge_delete(session: &mut Session, id: &str) -> Result<Changed> {
    let changed = session.store_mut().delete_edge(id);
    finish(session, id, "deleted", changed)
}

#[derive(Serialize)]
pub struct EdgeList {
    pub edges: Vec<Edge>,
    pub count: usize,
}

impl Output for EdgeList {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.edges.is_empty() {
            return "No edges.".to_string();
        }
        self.edges
            .iter()
            .map(|e| format!("{} -> {} ({})", e.source, e.target, e.id))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn edge_list(session: &Session, node_id: Option<&str>) -> EdgeList {
    let store = session.store();
    let edges: Vec<Edge> = match node_id {
        Some(id) => store.edges_for(id).into_iter().cloned().collect(),
        None => store.project().edges.clone(),
    };
    EdgeList {
        count: edges.len(),
        edges,
    }
}

// === Assets ===

/// Guess a MIME type from a file name's extension.
pub fn guess_mime(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "md" | "markdown" => "text/markdown",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "csv" => "text/csv",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub original_name: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub size: Option<usize>,
}

impl From<&Asset> for AssetSummary {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            mime_type: asset.mime_type.clone(),
            original_name: asset.original_name.clone(),
            source: asset.source.to_string(),
            url: asset.url.clone(),
            size: asset.payload().map(<[u8]>::len),
        }
    }
}

impl AssetSummary {
    fn line(&self) -> String {
        let size = match self.size {
            Some(n) => format!("{} bytes", n),
            None => self.url.clone().unwrap_or_else(|| "no payload".to_string()),
        };
        format!("{} {} [{}] {} ({})", self.id, self.original_name, self.mime_type, self.source, size)
    }
}

impl Output for AssetSummary {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        self.line()
    }
}

pub fn asset_add(
    session: &mut Session,
    file: &Path,
    mime_type: Option<&str>,
    node_id: Option<&str>,
) -> Result<AssetSummary> {
    if let Some(node_id) = node_id {
        session.require_node(node_id)?;
    }

    let bytes = std::fs::read(file)?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Validation(format!("Not a file: {}", file.display())))?;
    let mime = mime_type.unwrap_or_else(|| guess_mime(&name)).to_string();

    let asset = Asset::local(name, mime, bytes);
    if session.is_json() && !asset.is_text() {
        return Err(Error::Validation(format!(
            "{} is binary ({}) and a JSON working file cannot hold its bytes; use a .gbz working file",
            asset.original_name, asset.mime_type
        )));
    }

    let store = session.store_mut();
    let id = store.add_asset(asset);
    if let Some(node_id) = node_id {
        store.update_node(node_id, NodePatch::new().content_asset(Some(id.clone())));
    }
    session.save()?;

    let summary = session
        .store()
        .asset(&id)
        .map(AssetSummary::from)
        .ok_or_else(|| Error::NotFound(format!("Asset {}", id)))?;
    session
        .toasts_mut()
        .success(format!("Asset {} added", summary.original_name));
    Ok(summary)
}

pub fn asset_remote(
    session: &mut Session,
    name: &str,
    url: &str,
    mime_type: Option<&str>,
    wp_id: Option<u64>,
) -> Result<AssetSummary> {
    let mime = mime_type.unwrap_or_else(|| guess_mime(name));
    let asset = Asset::remote(name, mime, url, wp_id);
    let summary = AssetSummary::from(&asset);

    session.store_mut().add_asset(asset);
    session.save()?;
    session.toasts_mut().success(format!("Remote asset {} added", name));
    Ok(summary)
}

pub fn asset_remove(session: &mut Session, id: &str) -> Result<Changed> {
    let changed = session.store_mut().remove_asset(id);
    finish(session, id, "removed", changed)
}

#[derive(Serialize)]
pub struct AssetList {
    pub assets: Vec<AssetSummary>,
    pub count: usize,
}

impl Output for AssetList {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.assets.is_empty() {
            return "No assets.".to_string();
        }
        self.assets
            .iter()
            .map(AssetSummary::line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn asset_list(session: &Session) -> AssetList {
    let assets: Vec<AssetSummary> = session
        .store()
        .project()
        .assets
        .values()
        .map(AssetSummary::from)
        .collect();
    AssetList {
        count: assets.len(),
        assets,
    }
}

// === Import / export ===

#[derive(Serialize)]
pub struct Exported {
    pub format: String,
    pub location: String,
}

impl Output for Exported {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Exported {} to {}", self.format, self.location)
    }
}

/// Turn a project name into a file name stem.
pub fn export_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        "project".to_string()
    } else {
        stem.to_string()
    }
}

pub fn export(
    session: &mut Session,
    dir: &Path,
    format: ExportFormat,
    name: Option<&str>,
) -> Result<Exported> {
    if let Some(name) = name {
        if name.contains(['/', '\\']) {
            return Err(Error::Validation(format!(
                "Export name must be a plain file name, got: {}",
                name
            )));
        }
    }
    let stem = export_stem(name.unwrap_or(&session.store().project().meta.name));
    let mut delivery = DirectoryDelivery::new(dir);
    let location = archive::delivery::export_to(&mut delivery, session.store().project(), format, &stem)?;
    session.toasts_mut().success(format!("Exported to {}", location));
    Ok(Exported {
        format: format.to_string(),
        location,
    })
}

#[derive(Serialize)]
pub struct Imported {
    pub id: String,
    pub name: String,
    pub category_count: usize,
    pub node_count: usize,
    pub asset_count: usize,
}

impl Output for Imported {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Imported \"{}\" ({}): {} categories, {} nodes, {} assets",
            self.name, self.id, self.category_count, self.node_count, self.asset_count
        )
    }
}

/// Parse `file` and, only if that succeeds, make it the working project.
pub fn import(path: &Path, config: &ResolvedConfig, file: &Path) -> Result<Imported> {
    let project: GraphProject = archive::import_project(&ProjectFile::read(file)?)?;

    let mut session = Session::create(path, config);
    session.store_mut().load_project(project);
    session.save()?;

    let project = session.store().project();
    Ok(Imported {
        id: project.meta.id.clone(),
        name: project.meta.name.clone(),
        category_count: project.categories.len(),
        node_count: project.nodes.len(),
        asset_count: project.assets.len(),
    })
}

// === Config ===

#[derive(Serialize)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: serde_json::Value,
    pub source: String,
}

#[derive(Serialize)]
pub struct ConfigShow {
    pub path: String,
    pub entries: Vec<ConfigEntry>,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("Config file: {}", self.path)];
        for e in &self.entries {
            let value = match &e.value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            lines.push(format!("  {} = {} ({})", e.key, value, e.source));
        }
        lines.join("\n")
    }
}

pub fn config_show(dir: &Path, resolved: &ResolvedConfig) -> ConfigShow {
    let entries = vec![
        ConfigEntry {
            key: "output-format",
            value: resolved.output_format().as_str().into(),
            source: resolved.output_format.source.to_string(),
        },
        ConfigEntry {
            key: "project-name",
            value: resolved.project_name().into(),
            source: resolved.project_name.source.to_string(),
        },
        ConfigEntry {
            key: "palette",
            value: resolved.palette().to_vec().into(),
            source: resolved.palette.source.to_string(),
        },
        ConfigEntry {
            key: "export-format",
            value: resolved.export_format().as_str().into(),
            source: resolved.export_format.source.to_string(),
        },
        ConfigEntry {
            key: "toast-duration-ms",
            value: resolved.toast_duration_ms().into(),
            source: resolved.toast_duration_ms.source.to_string(),
        },
    ];
    ConfigShow {
        path: config::config_path(dir).display().to_string(),
        entries,
    }
}

#[derive(Serialize)]
pub struct ConfigSet {
    pub key: String,
    pub value: String,
}

impl Output for ConfigSet {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {}", self.key, self.value)
    }
}

pub fn config_set(dir: &Path, key: &str, value: &str) -> Result<ConfigSet> {
    let mut file: GraphbookConfig = config::load_config(dir)?;
    file.set(key, value).map_err(Error::Config)?;
    config::save_config(dir, &file)?;
    Ok(ConfigSet {
        key: key.to_string(),
        value: value.to_string(),
    })
}
