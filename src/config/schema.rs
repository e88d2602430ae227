//! KDL schema definitions for config.kdl.
//!
//! This module provides:
//! - The `GraphbookConfig` struct representing the KDL schema
//! - Conversion to/from KDL documents
//! - Validation and key-by-key updates for `gb config set`

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};

use crate::archive::ExportFormat;
use crate::models::is_hex_color;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keys accepted by `GraphbookConfig::set`.
pub const CONFIG_KEYS: &[&str] = &[
    "output-format",
    "project-name",
    "palette",
    "export-format",
    "toast-duration-ms",
];

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// output-format "human"  // or "json"
/// project-name "Physics 101"
/// palette "#ef4444" "#3b82f6" "#22c55e"
/// export-format "zip"    // or "json"
/// toast-duration-ms 3000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphbookConfig {
    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Name given to new projects
    pub project_name: Option<String>,

    /// Category colours handed out round-robin
    pub palette: Option<Vec<String>>,

    /// Default format for `gb export`
    pub export_format: Option<ExportFormat>,

    /// Toast lifetime in milliseconds (0 = sticky)
    pub toast_duration_ms: Option<u64>,
}

impl GraphbookConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref palette) = self.palette {
            if palette.is_empty() {
                return Err("palette must list at least one colour".to_string());
            }
            if let Some(bad) = palette.iter().find(|c| !is_hex_color(c)) {
                return Err(format!("palette entry must be #rgb or #rrggbb, got {}", bad));
            }
        }
        if let Some(ref name) = self.project_name {
            if name.trim().is_empty() {
                return Err("project-name cannot be empty".to_string());
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown nodes and ill-typed values
    /// are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(s) = first_string(doc, "output-format") {
            config.output_format = OutputFormat::parse(s);
        }

        if let Some(s) = first_string(doc, "project-name") {
            config.project_name = Some(s.to_string());
        }

        if let Some(node) = doc.get("palette") {
            let colours: Vec<String> = node
                .entries()
                .iter()
                .filter_map(|e| e.value().as_string())
                .map(str::to_string)
                .collect();
            if !colours.is_empty() {
                config.palette = Some(colours);
            }
        }

        if let Some(s) = first_string(doc, "export-format") {
            config.export_format = ExportFormat::parse(s);
        }

        if let Some(node) = doc.get("toast-duration-ms") {
            if let Some(entry) = node.entries().first() {
                if let Some(i) = entry.value().as_integer() {
                    config.toast_duration_ms = u64::try_from(i).ok();
                }
            }
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(format) = self.output_format {
            doc.nodes_mut()
                .push(string_node("output-format", format.as_str()));
        }

        if let Some(ref name) = self.project_name {
            doc.nodes_mut().push(string_node("project-name", name));
        }

        if let Some(ref palette) = self.palette {
            let mut node = KdlNode::new("palette");
            for colour in palette {
                node.push(KdlEntry::new(KdlValue::String(colour.clone())));
            }
            doc.nodes_mut().push(node);
        }

        if let Some(format) = self.export_format {
            doc.nodes_mut()
                .push(string_node("export-format", format.as_str()));
        }

        if let Some(ms) = self.toast_duration_ms {
            let mut node = KdlNode::new("toast-duration-ms");
            node.push(KdlEntry::new(KdlValue::Integer(ms as i128)));
            doc.nodes_mut().push(node);
        }

        doc.autoformat();
        doc
    }

    /// Set one key from its textual form. The palette takes a comma or
    /// whitespace separated list.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "output-format" => {
                self.output_format = Some(
                    OutputFormat::parse(value)
                        .ok_or_else(|| format!("output-format must be json or human, got {}", value))?,
                );
            }
            "project-name" => self.project_name = Some(value.trim().to_string()),
            "palette" => {
                self.palette = Some(
                    value
                        .split([',', ' '])
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            }
            "export-format" => {
                self.export_format = Some(
                    ExportFormat::parse(value)
                        .ok_or_else(|| format!("export-format must be zip or json, got {}", value))?,
                );
            }
            "toast-duration-ms" => {
                self.toast_duration_ms = Some(
                    value
                        .trim()
                        .parse()
                        .map_err(|_| format!("toast-duration-ms must be a whole number, got {}", value))?,
                );
            }
            other => {
                return Err(format!(
                    "Unknown config key '{}'. Valid keys: {}",
                    other,
                    CONFIG_KEYS.join(", ")
                ));
            }
        }
        self.validate()
    }
}

fn first_string<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a str> {
    doc.get(name)?.entries().first()?.value().as_string()
}

fn string_node(name: &str, value: &str) -> KdlNode {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(KdlValue::String(value.to_string())));
    node
}
