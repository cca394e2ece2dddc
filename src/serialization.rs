use crate::{StoryGraph, StoryNode};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Project metadata stored alongside the nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Manifest {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created: now,
            modified: now,
        }
    }

    /// Update the modified timestamp
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk project document
#[derive(Debug, Serialize, Deserialize)]
struct SerializableGraph {
    #[serde(default)]
    nodes: Vec<StoryNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    manifest: Option<Manifest>,
}

impl SerializableGraph {
    fn from_graph(graph: &StoryGraph, manifest: Manifest) -> Self {
        Self {
            nodes: graph.nodes().cloned().collect(),
            entry: graph.entry().map(str::to_string),
            manifest: Some(manifest),
        }
    }

    fn into_graph(self) -> Result<StoryGraph> {
        let mut graph = StoryGraph::new();

        for node in self.nodes {
            graph.insert_node(node)?;
        }

        // A stale entry is kept out rather than rejected.
        let entry = self.entry.filter(|id| graph.contains(id));
        graph.restore_entry(entry);
        graph.clear_events();

        Ok(graph)
    }
}

/// Single-file JSON persistence for story graphs
pub struct ProjectFile;

impl ProjectFile {
    /// Write the graph as pretty JSON, keeping an existing manifest's creation time
    pub fn save(path: &Path, graph: &StoryGraph) -> Result<()> {
        let mut manifest = Self::load_manifest(path).unwrap_or_default();
        manifest.touch();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let serializable = SerializableGraph::from_graph(graph, manifest);

        let file = File::create(path)
            .with_context(|| format!("Failed to create project file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &serializable)
            .with_context(|| format!("Failed to write project file: {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush project file: {}", path.display()))?;

        Ok(())
    }

    /// Load a graph; duplicate node or choice ids are rejected
    pub fn load(path: &Path) -> Result<StoryGraph> {
        Self::read(path)?
            .into_graph()
            .with_context(|| format!("Invalid project file: {}", path.display()))
    }

    /// Manifest of an existing project file, if it has one
    pub fn load_manifest(path: &Path) -> Result<Manifest> {
        Self::read(path)?
            .manifest
            .with_context(|| format!("No manifest in project file: {}", path.display()))
    }

    fn read(path: &Path) -> Result<SerializableGraph> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open project file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse project file: {}", path.display()))
    }
}
