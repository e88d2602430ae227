//! In-memory project store.
//!
//! `ProjectStore` owns the `GraphProject` being edited plus the current node
//! selection and is the only sanctioned way to mutate either. Every action
//! that changes the document refreshes `meta.updated_at`.
//!
//! Ordering is dense and positional: after any action that changes which
//! categories exist, which nodes a category holds, or their sequence, the
//! `order` fields are re-derived so they read exactly `0..n`.
//!
//! Unknown ids are tolerated. Update and delete actions that reference a
//! missing entity do nothing and report it through their `bool`/`Option`
//! return value rather than an error. Only invalid input (empty or duplicate
//! category names, malformed colours) is an error.

use std::collections::BTreeSet;

use crate::models::{
    Asset, Category, DEFAULT_PALETTE, DEFAULT_PROJECT_NAME, Edge, GraphProject, Node, NodePatch,
    is_hex_color,
};
use crate::{Error, Result};

/// The editing session: one project and one optional selected node.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    project: GraphProject,
    selected_node_id: Option<String>,
    palette: Vec<String>,
    project_name: String,
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectStore {
    /// Create a store holding an empty project and the built-in palette.
    pub fn new() -> Self {
        Self {
            project: GraphProject::new(DEFAULT_PROJECT_NAME),
            selected_node_id: None,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }

    /// Use `palette` for categories created without an explicit colour.
    /// An empty palette keeps the built-in one.
    pub fn with_palette(mut self, palette: Vec<String>) -> Self {
        if !palette.is_empty() {
            self.palette = palette;
        }
        self
    }

    /// Name given to projects started with `create_new`.
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    pub fn project(&self) -> &GraphProject {
        &self.project
    }

    pub fn into_project(self) -> GraphProject {
        self.project
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node_id.as_deref()
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    // === Project lifecycle ===

    /// Replace the project with a fresh empty one and clear the selection.
    pub fn create_new(&mut self) {
        self.project = GraphProject::new(self.project_name.clone());
        self.selected_node_id = None;
        tracing::debug!(project = %self.project.meta.id, "created new project");
    }

    /// Replace the project wholesale. The document is trusted as-is.
    pub fn load_project(&mut self, project: GraphProject) {
        tracing::debug!(
            project = %project.meta.id,
            categories = project.categories.len(),
            nodes = project.nodes.len(),
            edges = project.edges.len(),
            "loaded project"
        );
        self.project = project;
        self.selected_node_id = None;
    }

    /// Rename the project.
    pub fn rename_project(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Project name cannot be empty".to_string()));
        }
        self.project.meta.name = name.to_string();
        self.project.touch();
        Ok(())
    }

    // === Categories ===

    /// Add a category at the front of the sequence and return its id.
    ///
    /// Without an explicit colour the next unused palette colour is chosen,
    /// starting from the slot given by the current category count.
    pub fn add_category(&mut self, name: &str, color: Option<&str>) -> Result<String> {
        let name = self.validate_category_name(name, None)?;
        let color = match color {
            Some(c) => validate_color(c)?,
            None => self.next_palette_color(),
        };

        let category = Category::new(name, color);
        let id = category.id.clone();
        tracing::debug!(category = %id, name = %category.name, color = %category.color, "adding category");

        self.project.categories.insert(0, category);
        renumber_categories(&mut self.project.categories);
        self.project.touch();
        Ok(id)
    }

    /// Rename (and optionally recolour) a category.
    ///
    /// Returns `Ok(false)` when no category has `id`.
    pub fn update_category(&mut self, id: &str, name: &str, color: Option<&str>) -> Result<bool> {
        if self.category(id).is_none() {
            tracing::debug!(category = %id, "update for unknown category ignored");
            return Ok(false);
        }

        let name = self.validate_category_name(name, Some(id))?;
        let color = color.map(validate_color).transpose()?;

        if let Some(category) = self.project.categories.iter_mut().find(|c| c.id == id) {
            category.name = name;
            if let Some(color) = color {
                category.color = color;
            }
        }
        self.project.touch();
        Ok(true)
    }

    /// Delete a category, its nodes, and every edge touching those nodes.
    ///
    /// Returns `false` when no category has `id`.
    pub fn delete_category(&mut self, id: &str) -> bool {
        let before = self.project.categories.len();
        self.project.categories.retain(|c| c.id != id);
        if self.project.categories.len() == before {
            return false;
        }

        let removed: BTreeSet<String> = self
            .project
            .nodes
            .iter()
            .filter(|n| n.category_id == id)
            .map(|n| n.id.clone())
            .collect();

        self.project.nodes.retain(|n| n.category_id != id);
        self.project
            .edges
            .retain(|e| !removed.contains(&e.source) && !removed.contains(&e.target));

        if self
            .selected_node_id
            .as_ref()
            .is_some_and(|s| removed.contains(s))
        {
            self.selected_node_id = None;
        }

        renumber_categories(&mut self.project.categories);
        self.project.touch();
        tracing::debug!(category = %id, nodes = removed.len(), "deleted category");
        true
    }

    /// Replace the category sequence with `ordered` and renumber it.
    pub fn reorder_categories(&mut self, ordered: Vec<Category>) {
        self.project.categories = ordered;
        renumber_categories(&mut self.project.categories);
        self.project.touch();
    }

    /// Move one category to `index` (clamped to the end).
    ///
    /// Returns `false` when no category has `id`.
    pub fn move_category(&mut self, id: &str, index: usize) -> bool {
        let mut ordered = self.project.categories.clone();
        let Some(from) = ordered.iter().position(|c| c.id == id) else {
            return false;
        };
        let category = ordered.remove(from);
        ordered.insert(index.min(ordered.len()), category);
        self.reorder_categories(ordered);
        true
    }

    // === Nodes ===

    /// Append a new node to `category_id`, select it, and return its id.
    ///
    /// The category is not checked; callers that need referential integrity
    /// look it up first.
    pub fn add_node(&mut self, category_id: &str) -> String {
        let order = self.count_in_category(category_id);
        let node = Node::new(category_id, order);
        let id = node.id.clone();
        tracing::debug!(node = %id, category = %category_id, order, "adding node");

        self.project.nodes.push(node);
        self.selected_node_id = Some(id.clone());
        self.project.touch();
        id
    }

    /// Merge the fields present in `patch` into a node.
    ///
    /// Moving a node to another category appends it there and closes the gap
    /// it leaves behind. Returns `false` when no node has `id`.
    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> bool {
        let Some(index) = self.project.nodes.iter().position(|n| n.id == id) else {
            tracing::debug!(node = %id, "update for unknown node ignored");
            return false;
        };

        let old_category = self.project.nodes[index].category_id.clone();
        let new_category = patch
            .category_id
            .clone()
            .filter(|c| *c != old_category);
        let new_order = new_category.as_deref().map(|c| self.count_in_category(c));

        let node = &mut self.project.nodes[index];
        node.apply(patch);
        if let Some(order) = new_order {
            node.order = order;
            renumber_nodes_in(&mut self.project.nodes, &old_category);
        }

        self.project.touch();
        true
    }

    /// Delete a node and every edge touching it.
    ///
    /// Returns `false` when no node has `id`.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let Some(index) = self.project.nodes.iter().position(|n| n.id == id) else {
            return false;
        };

        let node = self.project.nodes.remove(index);
        self.project.edges.retain(|e| !e.touches(id));
        renumber_nodes_in(&mut self.project.nodes, &node.category_id);

        if self.selected_node_id.as_deref() == Some(id) {
            self.selected_node_id = None;
        }
        self.project.touch();
        tracing::debug!(node = %id, "deleted node");
        true
    }

    /// Replace the contents of `category_id` with `ordered`.
    ///
    /// Nodes outside the category that are not in `ordered` are kept as they
    /// are. Every node in `ordered` is tagged with `category_id` and ranked
    /// by its position in the list. A node pulled in from another category
    /// leaves a gap there, which is closed.
    pub fn reorder_nodes_in_category(&mut self, category_id: &str, ordered: Vec<Node>) {
        let incoming: BTreeSet<&str> = ordered.iter().map(|n| n.id.as_str()).collect();
        let vacated: BTreeSet<String> = self
            .project
            .nodes
            .iter()
            .filter(|n| incoming.contains(n.id.as_str()) && n.category_id != category_id)
            .map(|n| n.category_id.clone())
            .collect();

        let mut nodes: Vec<Node> = self
            .project
            .nodes
            .iter()
            .filter(|n| n.category_id != category_id && !incoming.contains(n.id.as_str()))
            .cloned()
            .collect();

        for (order, mut node) in ordered.into_iter().enumerate() {
            node.category_id = category_id.to_string();
            node.order = order;
            nodes.push(node);
        }

        for category in &vacated {
            renumber_nodes_in(&mut nodes, category);
        }

        self.project.nodes = nodes;
        self.project.touch();
    }

    /// Move one node to `index` within `category_id` (clamped to the end).
    ///
    /// Returns `false` when no node has `id`.
    pub fn move_node(&mut self, id: &str, category_id: &str, index: usize) -> bool {
        let Some(node) = self.node(id).cloned() else {
            return false;
        };

        let mut ordered: Vec<Node> = self
            .nodes_by_category(category_id)
            .into_iter()
            .filter(|n| n.id != id)
            .cloned()
            .collect();
        ordered.insert(index.min(ordered.len()), node);
        self.reorder_nodes_in_category(category_id, ordered);
        true
    }

    /// Change the selected node. Selecting an unknown id does nothing.
    pub fn select_node(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.node(id).is_none() => false,
            _ => {
                self.selected_node_id = id.map(str::to_string);
                true
            }
        }
    }

    // === Edges ===

    /// Connect `source` to `target` and return the new edge id.
    ///
    /// Self-loops, duplicate pairs, and unknown endpoints are ignored and
    /// yield `None`. The reverse direction is a distinct pair.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Option<String> {
        if source == target {
            return None;
        }
        if self.node(source).is_none() || self.node(target).is_none() {
            tracing::debug!(%source, %target, "edge to unknown node ignored");
            return None;
        }
        if self
            .project
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return None;
        }

        let edge = Edge::new(source, target);
        let id = edge.id.clone();
        self.project.edges.push(edge);
        self.project.touch();
        tracing::debug!(edge = %id, %source, %target, "added edge");
        Some(id)
    }

    /// Remove an edge by id. Returns `false` when no edge has `id`.
    pub fn delete_edge(&mut self, id: &str) -> bool {
        let before = self.project.edges.len();
        self.project.edges.retain(|e| e.id != id);
        if self.project.edges.len() == before {
            return false;
        }
        self.project.touch();
        true
    }

    // === Assets ===

    /// Store an asset and return its id.
    ///
    /// Archive entries are keyed by `original_name`, so a name already taken
    /// by another asset gets a numeric suffix: `logo.png` becomes
    /// `logo-2.png`.
    pub fn add_asset(&mut self, mut asset: Asset) -> String {
        let name = self.unique_asset_name(&asset.original_name);
        if name != asset.original_name {
            tracing::debug!(from = %asset.original_name, to = %name, "renamed asset to avoid a clash");
            asset.original_name = name;
        }

        let id = asset.id.clone();
        tracing::debug!(asset = %id, name = %asset.original_name, source = %asset.source, "adding asset");
        self.project.assets.insert(id.clone(), asset);
        self.project.touch();
        id
    }

    /// Remove an asset and clear every node reference to it.
    ///
    /// Returns `false` when no asset has `id`.
    pub fn remove_asset(&mut self, id: &str) -> bool {
        if self.project.assets.remove(id).is_none() {
            return false;
        }
        for node in &mut self.project.nodes {
            if node.content_asset_id.as_deref() == Some(id) {
                node.content_asset_id = None;
            }
        }
        self.project.touch();
        true
    }

    // === Views ===

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.project.categories.iter().find(|c| c.id == id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.project.nodes.iter().find(|n| n.id == id)
    }

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.project.assets.get(id)
    }

    /// Nodes of one category sorted by `order`.
    pub fn nodes_by_category(&self, category_id: &str) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self
            .project
            .nodes
            .iter()
            .filter(|n| n.category_id == category_id)
            .collect();
        nodes.sort_by_key(|n| n.order);
        nodes
    }

    /// The selected node, if any.
    pub fn active_node(&self) -> Option<&Node> {
        self.selected_node_id.as_deref().and_then(|id| self.node(id))
    }

    /// Colours currently assigned to categories.
    pub fn used_colors(&self) -> BTreeSet<&str> {
        self.project
            .categories
            .iter()
            .map(|c| c.color.as_str())
            .collect()
    }

    /// Edges that start or end at `node_id`.
    pub fn edges_for(&self, node_id: &str) -> Vec<&Edge> {
        self.project
            .edges
            .iter()
            .filter(|e| e.touches(node_id))
            .collect()
    }

    /// Text body of a node's content asset.
    pub fn node_text(&self, node_id: &str) -> Option<&str> {
        let asset_id = self.node(node_id)?.content_asset_id.as_deref()?;
        self.asset(asset_id)?.text_content.as_deref()
    }

    // === Helpers ===

    fn validate_category_name(&self, name: &str, exclude_id: Option<&str>) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("Category name cannot be empty".to_string()));
        }

        let folded = trimmed.to_lowercase();
        let duplicate = self
            .project
            .categories
            .iter()
            .filter(|c| Some(c.id.as_str()) != exclude_id)
            .any(|c| c.name.trim().to_lowercase() == folded);
        if duplicate {
            return Err(Error::Validation(format!(
                "A category named '{}' already exists",
                trimmed
            )));
        }

        Ok(trimmed.to_string())
    }

    fn next_palette_color(&self) -> String {
        let used: BTreeSet<String> = self
            .project
            .categories
            .iter()
            .map(|c| c.color.to_lowercase())
            .collect();
        let len = self.palette.len();
        let start = self.project.categories.len() % len;

        (0..len)
            .map(|i| &self.palette[(start + i) % len])
            .find(|c| !used.contains(&c.to_lowercase()))
            .unwrap_or(&self.palette[start])
            .clone()
    }

    fn unique_asset_name(&self, name: &str) -> String {
        let taken: BTreeSet<&str> = self
            .project
            .assets
            .values()
            .map(|a| a.original_name.as_str())
            .collect();
        if !taken.contains(name) {
            return name.to_string();
        }

        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (name, None),
        };
        let mut n = 2;
        loop {
            let candidate = match ext {
                Some(ext) => format!("{}-{}.{}", stem, n, ext),
                None => format!("{}-{}", stem, n),
            };
            if !taken.contains(candidate.as_str()) {
                return candidate;
            }
            n += 1;
        }
    }

    fn count_in_category(&self, category_id: &str) -> usize {
        self.project
            .nodes
            .iter()
            .filter(|n| n.category_id == category_id)
            .count()
    }
}

fn validate_color(color: &str) -> Result<String> {
    let color = color.trim();
    if !is_hex_color(color) {
        return Err(Error::Validation(format!(
            "Color must be #rgb or #rrggbb, got: {}",
            color
        )));
    }
    Ok(color.to_string())
}

fn renumber_categories(categories: &mut [Category]) {
    for (order, category) in categories.iter_mut().enumerate() {
        category.order = order;
    }
}

/// Close gaps in one category's node ranks, keeping their relative order.
fn renumber_nodes_in(nodes: &mut [Node], category_id: &str) {
    let mut members: Vec<&mut Node> = nodes
        .iter_mut()
        .filter(|n| n.category_id == category_id)
        .collect();
    members.sort_by_key(|n| n.order);
    for (order, node) in members.into_iter().enumerate() {
        node.order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn store() -> ProjectStore {
        ProjectStore::new()
    }

    fn category_orders(store: &ProjectStore) -> Vec<usize> {
        store.project().categories.iter().map(|c| c.order).collect()
    }

    fn node_orders(store: &ProjectStore, category_id: &str) -> Vec<usize> {
        store
            .nodes_by_category(category_id)
            .iter()
            .map(|n| n.order)
            .collect()
    }

    // === Project lifecycle ===

    #[test]
    fn test_create_new_replaces_project_and_selection() {
        let mut store = store();
        let cat = store.add_category("Intro", None).unwrap();
        store.add_node(&cat);
        let old_id = store.project().meta.id.clone();

        store.create_new();

        assert_ne!(store.project().meta.id, old_id);
        assert!(store.project().categories.is_empty());
        assert!(store.project().nodes.is_empty());
        assert!(store.selected_node_id().is_none());
    }

    #[test]
    fn test_create_new_uses_configured_name() {
        let mut store = ProjectStore::new().with_project_name("Course");
        store.create_new();
        assert_eq!(store.project().meta.name, "Course");
    }

    #[test]
    fn test_load_project_clears_selection() {
        let mut store = store();
        let cat = store.add_category("Intro", None).unwrap();
        store.add_node(&cat);
        assert!(store.selected_node_id().is_some());

        let doc = GraphProject::new("Loaded");
        let doc_id = doc.meta.id.clone();
        store.load_project(doc);

        assert_eq!(store.project().meta.id, doc_id);
        assert!(store.selected_node_id().is_none());
    }

    #[test]
    fn test_rename_project() {
        let mut store = store();
        store.rename_project("  Physics  ").unwrap();
        assert_eq!(store.project().meta.name, "Physics");
        assert!(matches!(store.rename_project("   "), Err(Error::Validation(_))));
    }

    #[test]
    fn test_mutations_refresh_updated_at() {
        let mut store = store();
        let stale = chrono::DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        store.project.meta.updated_at = stale;

        store.add_category("Intro", None).unwrap();

        assert!(store.project().meta.updated_at > stale);
    }

    // === Categories ===

    #[test]
    fn test_add_category_scenario_palette_and_front_insert() {
        let mut store = store();

        let intro = store.add_category("Intro", None).unwrap();
        let c = store.category(&intro).unwrap();
        assert_eq!(c.order, 0);
        assert_eq!(c.color, DEFAULT_PALETTE[0]);

        let basics = store.add_category("Basics", None).unwrap();
        let b = store.category(&basics).unwrap();
        assert_eq!(b.order, 0);
        assert_eq!(b.color, DEFAULT_PALETTE[1]);
        assert_eq!(store.category(&intro).unwrap().order, 1);
        assert_eq!(store.project().categories[0].id, basics);
    }

    #[test]
    fn test_add_category_trims_name() {
        let mut store = store();
        let id = store.add_category("  Intro  ", None).unwrap();
        assert_eq!(store.category(&id).unwrap().name, "Intro");
    }

    #[test]
    fn test_add_category_rejects_empty_name() {
        let mut store = store();
        assert!(matches!(store.add_category("   ", None), Err(Error::Validation(_))));
        assert!(store.project().categories.is_empty());
    }

    #[test]
    fn test_add_category_rejects_case_insensitive_duplicate() {
        let mut store = store();
        store.add_category("Intro", None).unwrap();
        let before = store.project().categories.clone();

        let result = store.add_category("  iNTRO ", None);

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(store.project().categories, before);
    }

    #[test]
    fn test_add_category_explicit_color() {
        let mut store = store();
        let id = store.add_category("Intro", Some("#123abc")).unwrap();
        assert_eq!(store.category(&id).unwrap().color, "#123abc");
    }

    #[test]
    fn test_add_category_rejects_bad_color() {
        let mut store = store();
        assert!(matches!(
            store.add_category("Intro", Some("blue")),
            Err(Error::Validation(_))
        ));
        assert!(store.project().categories.is_empty());
    }

    #[test]
    fn test_palette_skips_colors_in_use() {
        let mut store = store();
        store.add_category("A", Some(DEFAULT_PALETTE[1])).unwrap();

        // count is 1, so slot 1 is tried first but is taken
        let id = store.add_category("B", None).unwrap();
        assert_eq!(store.category(&id).unwrap().color, DEFAULT_PALETTE[2]);
    }

    #[test]
    fn test_palette_wraps_when_exhausted() {
        let mut store = ProjectStore::new().with_palette(vec!["#111111".into(), "#222222".into()]);
        store.add_category("A", None).unwrap();
        store.add_category("B", None).unwrap();
        let id = store.add_category("C", None).unwrap();
        assert_eq!(store.category(&id).unwrap().color, "#111111");
    }

    #[test]
    fn test_empty_palette_keeps_default() {
        let store = ProjectStore::new().with_palette(Vec::new());
        assert_eq!(store.palette().len(), DEFAULT_PALETTE.len());
    }

    #[test]
    fn test_update_category() {
        let mut store = store();
        let id = store.add_category("Intro", None).unwrap();

        assert!(store.update_category(&id, " Welcome ", Some("#fff")).unwrap());

        let c = store.category(&id).unwrap();
        assert_eq!(c.name, "Welcome");
        assert_eq!(c.color, "#fff");
    }

    #[test]
    fn test_update_category_same_name_different_case_is_allowed() {
        let mut store = store();
        let id = store.add_category("Intro", None).unwrap();
        assert!(store.update_category(&id, "INTRO", None).unwrap());
        assert_eq!(store.category(&id).unwrap().name, "INTRO");
    }

    #[test]
    fn test_update_category_rejects_other_name() {
        let mut store = store();
        store.add_category("Intro", None).unwrap();
        let id = store.add_category("Basics", None).unwrap();

        let result = store.update_category(&id, "intro", None);

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(store.category(&id).unwrap().name, "Basics");
    }

    #[test]
    fn test_update_unknown_category_is_soft_noop() {
        let mut store = store();
        store.add_category("Intro", None).unwrap();
        let before = store.project().clone();

        // even a duplicate name does not error for an unknown id
        assert!(!store.update_category("missing", "Intro", None).unwrap());
        assert_eq!(store.project(), &before);
    }

    #[test]
    fn test_delete_category_scenario_cascades() {
        let mut store = store();
        let b = store.add_category("B", None).unwrap();
        let a = store.add_category("A", None).unwrap();
        let n1 = store.add_node(&a);
        let n2 = store.add_node(&b);
        store.add_edge(&n1, &n2).unwrap();

        assert!(store.delete_category(&a));

        let p = store.project();
        assert_eq!(p.categories.len(), 1);
        assert_eq!(p.categories[0].id, b);
        assert_eq!(p.categories[0].order, 0);
        assert_eq!(p.nodes.len(), 1);
        assert_eq!(p.nodes[0].id, n2);
        assert!(p.edges.is_empty());
    }

    #[test]
    fn test_delete_category_leaves_unrelated_edges() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let b = store.add_category("B", None).unwrap();
        let n1 = store.add_node(&a);
        let n2 = store.add_node(&b);
        let n3 = store.add_node(&b);
        store.add_edge(&n1, &n2).unwrap();
        let kept = store.add_edge(&n2, &n3).unwrap();

        store.delete_category(&a);

        let edges = &store.project().edges;
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, kept);
    }

    #[test]
    fn test_delete_category_clears_selection_of_removed_node() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        store.add_node(&a);
        assert!(store.selected_node_id().is_some());

        store.delete_category(&a);

        assert!(store.selected_node_id().is_none());
    }

    #[test]
    fn test_delete_unknown_category() {
        let mut store = store();
        store.add_category("A", None).unwrap();
        assert!(!store.delete_category("missing"));
        assert_eq!(store.project().categories.len(), 1);
    }

    #[test]
    fn test_category_orders_stay_dense() {
        let mut store = store();
        let ids: Vec<String> = ["A", "B", "C", "D"]
            .iter()
            .map(|n| store.add_category(n, None).unwrap())
            .collect();
        assert_eq!(category_orders(&store), vec![0, 1, 2, 3]);

        store.delete_category(&ids[1]);
        assert_eq!(category_orders(&store), vec![0, 1, 2]);

        let mut reversed = store.project().categories.clone();
        reversed.reverse();
        store.reorder_categories(reversed);
        assert_eq!(category_orders(&store), vec![0, 1, 2]);
        assert_eq!(store.project().categories[0].id, ids[0]);

        store.add_category("E", None).unwrap();
        assert_eq!(category_orders(&store), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_move_category() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let b = store.add_category("B", None).unwrap();
        let c = store.add_category("C", None).unwrap();
        // sequence is C, B, A

        assert!(store.move_category(&c, 99));

        let ids: Vec<&str> = store.project().categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![b.as_str(), a.as_str(), c.as_str()]);
        assert_eq!(category_orders(&store), vec![0, 1, 2]);
        assert!(!store.move_category("missing", 0));
    }

    // === Nodes ===

    #[test]
    fn test_add_node_appends_and_selects() {
        let mut store = store();
        let cat = store.add_category("A", None).unwrap();

        let n1 = store.add_node(&cat);
        let n2 = store.add_node(&cat);

        let node = store.node(&n2).unwrap();
        assert_eq!(node.title, "New Item");
        assert!(node.content_asset_id.is_none());
        assert_eq!(node.order, 1);
        assert_eq!(store.node(&n1).unwrap().order, 0);
        assert_eq!(store.selected_node_id(), Some(n2.as_str()));
        assert_eq!(store.active_node().unwrap().id, n2);
    }

    #[test]
    fn test_add_node_orders_are_per_category() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let b = store.add_category("B", None).unwrap();
        store.add_node(&a);
        store.add_node(&a);
        let first_in_b = store.add_node(&b);
        assert_eq!(store.node(&first_in_b).unwrap().order, 0);
    }

    #[test]
    fn test_update_node_merges_present_fields() {
        let mut store = store();
        let cat = store.add_category("A", None).unwrap();
        let id = store.add_node(&cat);

        let pos = Position { x: 10.0, y: -4.5 };
        assert!(store.update_node(&id, NodePatch::new().title("Atoms").position(Some(pos))));
        assert!(store.update_node(&id, NodePatch::new().content_asset(Some("asset-1".into()))));

        let node = store.node(&id).unwrap();
        assert_eq!(node.title, "Atoms");
        assert_eq!(node.position, Some(pos));
        assert_eq!(node.content_asset_id.as_deref(), Some("asset-1"));
        assert_eq!(node.category_id, cat);
    }

    #[test]
    fn test_update_unknown_node_is_soft_noop() {
        let mut store = store();
        let before = store.project().clone();
        assert!(!store.update_node("missing", NodePatch::new().title("x")));
        assert_eq!(store.project(), &before);
    }

    #[test]
    fn test_update_node_category_change_keeps_orders_dense() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let b = store.add_category("B", None).unwrap();
        let a0 = store.add_node(&a);
        store.add_node(&a);
        store.add_node(&b);

        store.update_node(&a0, NodePatch::new().category(b.clone()));

        assert_eq!(node_orders(&store, &a), vec![0]);
        assert_eq!(node_orders(&store, &b), vec![0, 1]);
        assert_eq!(store.node(&a0).unwrap().order, 1);
    }

    #[test]
    fn test_delete_node_cascades_edges_and_selection() {
        let mut store = store();
        let cat = store.add_category("A", None).unwrap();
        let n1 = store.add_node(&cat);
        let n2 = store.add_node(&cat);
        let n3 = store.add_node(&cat);
        store.add_edge(&n1, &n2).unwrap();
        store.add_edge(&n3, &n2).unwrap();
        let kept = store.add_edge(&n1, &n3).unwrap();
        store.select_node(Some(&n2));

        assert!(store.delete_node(&n2));

        assert!(store.node(&n2).is_none());
        assert_eq!(store.project().edges.len(), 1);
        assert_eq!(store.project().edges[0].id, kept);
        assert!(store.selected_node_id().is_none());
        assert_eq!(node_orders(&store, &cat), vec![0, 1]);
        assert_eq!(store.node(&n3).unwrap().order, 1);
    }

    #[test]
    fn test_delete_node_keeps_other_selection() {
        let mut store = store();
        let cat = store.add_category("A", None).unwrap();
        let n1 = store.add_node(&cat);
        let n2 = store.add_node(&cat);
        assert_eq!(store.selected_node_id(), Some(n2.as_str()));

        store.delete_node(&n1);

        assert_eq!(store.selected_node_id(), Some(n2.as_str()));
    }

    #[test]
    fn test_delete_unknown_node() {
        let mut store = store();
        assert!(!store.delete_node("missing"));
    }

    #[test]
    fn test_reorder_nodes_in_category() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let b = store.add_category("B", None).unwrap();
        let n1 = store.add_node(&a);
        let n2 = store.add_node(&a);
        let n3 = store.add_node(&a);
        let other = store.add_node(&b);
        let other_before = store.node(&other).unwrap().clone();

        let reordered: Vec<Node> = [&n3, &n1, &n2]
            .iter()
            .map(|id| store.node(id).unwrap().clone())
            .collect();
        store.reorder_nodes_in_category(&a, reordered);

        let ids: Vec<&str> = store.nodes_by_category(&a).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![n3.as_str(), n1.as_str(), n2.as_str()]);
        assert_eq!(node_orders(&store, &a), vec![0, 1, 2]);
        assert_eq!(store.node(&other).unwrap(), &other_before);
    }

    #[test]
    fn test_reorder_nodes_pulls_node_across_categories() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let b = store.add_category("B", None).unwrap();
        let a0 = store.add_node(&a);
        let a1 = store.add_node(&a);
        let a2 = store.add_node(&a);
        let b0 = store.add_node(&b);

        let incoming = vec![
            store.node(&a1).unwrap().clone(),
            store.node(&b0).unwrap().clone(),
        ];
        store.reorder_nodes_in_category(&b, incoming);

        assert_eq!(store.node(&a1).unwrap().category_id, b);
        assert_eq!(store.node(&a1).unwrap().order, 0);
        assert_eq!(store.node(&b0).unwrap().order, 1);
        assert_eq!(node_orders(&store, &a), vec![0, 1]);
        assert_eq!(store.node(&a0).unwrap().order, 0);
        assert_eq!(store.node(&a2).unwrap().order, 1);
        assert_eq!(store.project().nodes.len(), 4);
    }

    #[test]
    fn test_move_node() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let n1 = store.add_node(&a);
        let n2 = store.add_node(&a);
        let n3 = store.add_node(&a);

        assert!(store.move_node(&n3, &a, 0));

        let ids: Vec<&str> = store.nodes_by_category(&a).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![n3.as_str(), n1.as_str(), n2.as_str()]);
        assert!(!store.move_node("missing", &a, 0));
    }

    #[test]
    fn test_node_orders_dense_after_mixed_sequence() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let ids: Vec<String> = (0..5).map(|_| store.add_node(&a)).collect();

        store.delete_node(&ids[0]);
        store.delete_node(&ids[3]);
        store.move_node(&ids[4], &a, 1);
        store.add_node(&a);
        store.delete_node(&ids[2]);

        assert_eq!(node_orders(&store, &a), vec![0, 1, 2]);
    }

    #[test]
    fn test_select_node() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let n1 = store.add_node(&a);
        store.add_node(&a);

        assert!(store.select_node(Some(&n1)));
        assert_eq!(store.active_node().unwrap().id, n1);

        assert!(!store.select_node(Some("missing")));
        assert_eq!(store.selected_node_id(), Some(n1.as_str()));

        assert!(store.select_node(None));
        assert!(store.active_node().is_none());
    }

    // === Edges ===

    #[test]
    fn test_add_edge_rejects_self_loop() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let n1 = store.add_node(&a);
        assert!(store.add_edge(&n1, &n1).is_none());
        assert!(store.project().edges.is_empty());
    }

    #[test]
    fn test_add_edge_rejects_duplicate_allows_reverse() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let n1 = store.add_node(&a);
        let n2 = store.add_node(&a);

        assert!(store.add_edge(&n1, &n2).is_some());
        assert!(store.add_edge(&n1, &n2).is_none());
        assert!(store.add_edge(&n2, &n1).is_some());

        let forward = store
            .project()
            .edges
            .iter()
            .filter(|e| e.source == n1 && e.target == n2)
            .count();
        assert_eq!(forward, 1);
        assert_eq!(store.project().edges.len(), 2);
    }

    #[test]
    fn test_add_edge_requires_existing_nodes() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let n1 = store.add_node(&a);
        assert!(store.add_edge(&n1, "ghost").is_none());
        assert!(store.add_edge("ghost", &n1).is_none());
    }

    #[test]
    fn test_delete_edge() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let n1 = store.add_node(&a);
        let n2 = store.add_node(&a);
        let e = store.add_edge(&n1, &n2).unwrap();

        assert_eq!(store.edges_for(&n1).len(), 1);
        assert!(store.delete_edge(&e));
        assert!(!store.delete_edge(&e));
        assert!(store.edges_for(&n1).is_empty());
    }

    // === Assets and views ===

    #[test]
    fn test_add_and_remove_asset_clears_references() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let n1 = store.add_node(&a);
        let asset_id = store.add_asset(Asset::local("body.md", "text/markdown", b"# Atoms".to_vec()));
        store.update_node(&n1, NodePatch::new().content_asset(Some(asset_id.clone())));

        assert_eq!(store.node_text(&n1), Some("# Atoms"));

        assert!(store.remove_asset(&asset_id));
        assert!(store.asset(&asset_id).is_none());
        assert!(store.node(&n1).unwrap().content_asset_id.is_none());
        assert!(!store.remove_asset(&asset_id));
    }

    #[test]
    fn test_add_asset_keeps_file_names_unique() {
        let mut store = store();
        let first = store.add_asset(Asset::local("logo.png", "image/png", b"AAAA".to_vec()));
        let second = store.add_asset(Asset::local("logo.png", "image/png", b"BBBB".to_vec()));
        let third = store.add_asset(Asset::local("logo.png", "image/png", b"CCCC".to_vec()));
        let bare = store.add_asset(Asset::local("README", "text/plain", b"x".to_vec()));
        let bare_again = store.add_asset(Asset::local("README", "text/plain", b"y".to_vec()));

        assert_eq!(store.asset(&first).unwrap().original_name, "logo.png");
        assert_eq!(store.asset(&second).unwrap().original_name, "logo-2.png");
        assert_eq!(store.asset(&third).unwrap().original_name, "logo-3.png");
        assert_eq!(store.asset(&bare).unwrap().original_name, "README");
        assert_eq!(store.asset(&bare_again).unwrap().original_name, "README-2");
    }

    #[test]
    fn test_used_colors() {
        let mut store = store();
        store.add_category("A", Some("#111")).unwrap();
        store.add_category("B", Some("#222")).unwrap();
        let used = store.used_colors();
        assert_eq!(used.len(), 2);
        assert!(used.contains("#111"));
        assert!(used.contains("#222"));
    }

    #[test]
    fn test_nodes_by_category_sorted_by_order() {
        let mut store = store();
        let a = store.add_category("A", None).unwrap();
        let n1 = store.add_node(&a);
        let n2 = store.add_node(&a);
        // storage order differs from rank order
        store.project.nodes.reverse();

        let ids: Vec<&str> = store.nodes_by_category(&a).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![n1.as_str(), n2.as_str()]);
        assert!(store.nodes_by_category("missing").is_empty());
    }
}
