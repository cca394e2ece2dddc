use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Widest accepted indent; the exporter clamps anything larger
pub const MAX_INDENT_WIDTH: usize = 16;

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Spaces per nesting level
    pub indent_width: usize,

    /// Prefix prepended to every derived label
    pub label_prefix: String,

    /// Explicit canonical entry; overrides the graph's stored entry
    pub entry: Option<String>,

    /// Emit a leading generated-file comment
    pub header: bool,

    /// Emit each node's title as a comment under its label
    pub emit_titles: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            label_prefix: "node_".to_string(),
            entry: None,
            header: true,
            emit_titles: true,
        }
    }
}

impl ExportConfig {
    /// Load settings from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open export config: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse export config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid export config: {}", path.display()))?;
        Ok(config)
    }

    /// Reject settings the exporter cannot lay out
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_INDENT_WIDTH).contains(&self.indent_width) {
            bail!(
                "indent_width must be between 1 and {}, got {}",
                MAX_INDENT_WIDTH,
                self.indent_width
            );
        }
        Ok(())
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create export config: {}", path.display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .with_context(|| format!("Failed to write export config: {}", path.display()))?;
        Ok(())
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }
}
