//! Upgrade documents written with the older node schema.
//!
//! Early projects stored each node body inline as a `content` string. The
//! current schema keeps bodies in the asset map and points at them through
//! `contentAssetId`. `upgrade` moves every inline body into a markdown asset
//! named `<node-id>.md` so the rest of the crate only ever sees one shape.

use super::{Asset, GraphProject};

/// MIME type given to bodies lifted out of legacy nodes.
pub const LEGACY_CONTENT_MIME: &str = "text/markdown";

/// Outcome of an upgrade pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Nodes whose inline body became an asset
    pub converted: Vec<String>,
    /// Nodes whose inline body was empty and was dropped
    pub dropped_empty: usize,
    /// Nodes whose inline body was discarded because they already reference an asset
    pub dropped_shadowed: usize,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.converted.is_empty() && self.dropped_empty == 0 && self.dropped_shadowed == 0
    }
}

/// Convert inline node bodies into assets, in place.
///
/// A node that already references an asset keeps that reference; its inline
/// body is discarded.
pub fn upgrade(project: &mut GraphProject) -> MigrationReport {
    let mut report = MigrationReport::default();

    for node in &mut project.nodes {
        let Some(content) = node.legacy_content.take() else {
            continue;
        };

        if content.is_empty() {
            report.dropped_empty += 1;
            continue;
        }
        if node.content_asset_id.is_some() {
            report.dropped_shadowed += 1;
            continue;
        }

        let asset = Asset::local(
            format!("{}.md", node.id),
            LEGACY_CONTENT_MIME,
            content.into_bytes(),
        );
        node.content_asset_id = Some(asset.id.clone());
        project.assets.insert(asset.id.clone(), asset);
        report.converted.push(node.id.clone());
    }

    if !report.is_noop() {
        tracing::warn!(
            converted = report.converted.len(),
            dropped_empty = report.dropped_empty,
            dropped_shadowed = report.dropped_shadowed,
            "upgraded legacy inline node content"
        );
    }

    report
}
