//! Ren'Py script export.
//!
//! The exporter walks the story graph depth-first from one or more roots and
//! writes every reached node once, as its own top-level label block in visit
//! order. Each choice jumps to its target's label, so a node reached twice
//! never duplicates its body and output grows linearly with the graph.
//!
//! Without a selection, export starts at a single canonical entry: the
//! configured entry, else the graph's stored entry, else the first node in
//! the graph's stable enumeration. Nodes unreachable from that entry are not
//! exported. This is scope limiting, not an error; use
//! [`Validator`](crate::Validator) to list them.

use crate::config::MAX_INDENT_WIDTH;
use crate::reachability::count_reachable;
use crate::{ExportConfig, NodeKind, ScriptFormatter, StoryGraph, StoryNode, Successor};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Progress callback: receives `(processed, total)` and returns `false` to cancel
pub type ProgressCallback<'a> = Box<dyn FnMut(usize, usize) -> bool + 'a>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// How an export call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    Completed,
    Canceled,
}

/// Summary of one export call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub status: ExportStatus,
    pub processed_nodes: usize,
    pub total_nodes: usize,
}

impl ExportReport {
    pub fn is_canceled(&self) -> bool {
        self.status == ExportStatus::Canceled
    }
}

/// Depth-first Ren'Py exporter over a borrowed graph
///
/// One exporter runs one export at a time; its traversal state is reset at
/// the start of every call. The graph must not change during a call.
pub struct RenpyExporter<'a> {
    graph: &'a StoryGraph,
    config: ExportConfig,
    progress_callback: Option<ProgressCallback<'a>>,
    selection: Vec<String>,

    visited: HashSet<&'a str>,
    total_nodes: usize,
    processed_nodes: usize,
    was_canceled: bool,
}

impl<'a> RenpyExporter<'a> {
    pub fn new(graph: &'a StoryGraph) -> Self {
        Self::with_config(graph, ExportConfig::default())
    }

    pub fn with_config(graph: &'a StoryGraph, config: ExportConfig) -> Self {
        Self {
            graph,
            config,
            progress_callback: None,
            selection: Vec::new(),
            visited: HashSet::new(),
            total_nodes: 0,
            processed_nodes: 0,
            was_canceled: false,
        }
    }

    /// Install a progress callback, called once per newly visited node
    pub fn set_progress_callback<F>(&mut self, callback: F)
    where
        F: FnMut(usize, usize) -> bool + 'a,
    {
        self.progress_callback = Some(Box::new(callback));
    }

    /// Restrict export to these roots, in the given order
    ///
    /// Each root is expanded to everything reachable from it. Repeated ids
    /// are dropped; an empty list restores whole-graph export.
    pub fn set_selected_node_ids<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection.clear();
        for id in ids {
            let id = id.into();
            if !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Whether the last export stopped because the callback asked it to
    pub fn was_canceled(&self) -> bool {
        self.was_canceled
    }

    /// Export into a file, creating or truncating it
    pub fn export_to_file(&mut self, path: &Path) -> Result<ExportReport, ExportError> {
        let file = File::create(path).map_err(|source| ExportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.export_to_writer(&mut writer)
    }

    /// Export into an in-memory string
    pub fn export_to_string(&mut self) -> Result<(String, ExportReport), ExportError> {
        let mut buffer = Vec::new();
        let report = self.export_to_writer(&mut buffer)?;
        Ok((String::from_utf8_lossy(&buffer).into_owned(), report))
    }

    /// Export into any writer; output is flushed on completion and on cancel
    pub fn export_to_writer<W: Write>(&mut self, out: &mut W) -> Result<ExportReport, ExportError> {
        self.visited.clear();
        self.processed_nodes = 0;
        self.was_canceled = false;

        let roots = self.export_roots();
        self.total_nodes = roots
            .iter()
            .map(|root| count_reachable(self.graph, root))
            .sum();

        info!(
            roots = roots.len(),
            total = self.total_nodes,
            selection = self.has_selection(),
            "Starting Ren'Py export"
        );

        if self.config.header {
            writeln!(out, "# Generated by story_graph. Do not edit by hand.")?;
            writeln!(out)?;
        }

        let layout = Layout::new(self.config.indent_width);
        for root in roots {
            if self.was_canceled {
                break;
            }
            if self.visited.contains(root) {
                debug!(node = root, "Root already exported through an earlier root");
                continue;
            }
            self.walk_from(root, out, &layout)?;
        }

        out.flush()?;

        let status = if self.was_canceled {
            ExportStatus::Canceled
        } else {
            ExportStatus::Completed
        };

        info!(
            processed = self.processed_nodes,
            total = self.total_nodes,
            ?status,
            "Ren'Py export finished"
        );

        Ok(ExportReport {
            status,
            processed_nodes: self.processed_nodes,
            total_nodes: self.total_nodes,
        })
    }

    /// Traversal roots for this call, all guaranteed to exist
    fn export_roots(&self) -> Vec<&'a str> {
        let graph = self.graph;

        if self.has_selection() {
            return self
                .selection
                .iter()
                .filter_map(|id| {
                    let node = graph.get_node(id);
                    if node.is_none() {
                        debug!(node = %id, "Selected node does not exist, skipping");
                    }
                    node.map(|n| n.id.as_str())
                })
                .collect();
        }

        let explicit = self.config.entry.as_deref().or_else(|| graph.entry());
        match explicit {
            Some(entry) => match graph.get_node(entry) {
                Some(node) => vec![node.id.as_str()],
                None => {
                    warn!(entry, "Export entry does not exist; nothing to export");
                    Vec::new()
                }
            },
            None => graph.first_node_id().into_iter().collect(),
        }
    }

    /// Depth-first, pre-order walk from one root
    ///
    /// The stack holds one frame per node whose choices are still being
    /// followed, so depth is bounded by the heap rather than the call stack.
    fn walk_from<W: Write>(&mut self, root: &'a str, out: &mut W, layout: &Layout) -> io::Result<()> {
        let mut stack: Vec<Frame<'a>> = Vec::new();
        if let Some(frame) = self.visit(root, out, layout)? {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            if self.was_canceled {
                break;
            }

            let target = match frame.choices.get(frame.next) {
                Some(choice) => choice.target_id,
                None => {
                    stack.pop();
                    continue;
                }
            };
            frame.next += 1;

            if self.visited.contains(target) {
                continue;
            }
            if let Some(next) = self.visit(target, out, layout)? {
                stack.push(next);
            }
        }

        Ok(())
    }

    /// Emit one newly reached node as its own label block
    ///
    /// Returns the frame for following its choices, or `None` when the
    /// progress callback canceled before the block was written.
    fn visit<W: Write>(&mut self, node_id: &'a str, out: &mut W, layout: &Layout) -> io::Result<Option<Frame<'a>>> {
        let graph = self.graph;
        let node = match graph.get_node(node_id) {
            Some(node) => node,
            None => return Ok(None),
        };

        self.visited.insert(node_id);
        self.processed_nodes += 1;
        if !self.report_progress() {
            debug!(node = node_id, processed = self.processed_nodes, "Export canceled");
            self.was_canceled = true;
            return Ok(None);
        }

        debug!(node = node_id, kind = node.kind.as_str(), "Emitting node");

        let prefix = &self.config.label_prefix;
        writeln!(out, "label {}:", ScriptFormatter::label_for(prefix, node_id))?;
        self.write_body(node, out, &layout.body)?;

        let choices: Vec<Successor<'a>> = graph
            .successors_of(node_id)
            .into_iter()
            .filter(|s| {
                let exists = graph.contains(s.target_id);
                if !exists {
                    debug!(choice = s.choice_id, target = s.target_id, "Skipping dangling choice");
                }
                exists
            })
            .collect();

        if choices.is_empty() {
            write_terminator(node.kind, out, &layout.body)?;
        } else {
            writeln!(out, "{}menu:", layout.body)?;
            for choice in &choices {
                let caption = ScriptFormatter::quote(choice.text);
                match choice.condition {
                    Some(condition) => writeln!(out, "{}{} if {}:", layout.item, caption, condition)?,
                    None => writeln!(out, "{}{}:", layout.item, caption)?,
                }
                let target = ScriptFormatter::label_for(prefix, choice.target_id);
                writeln!(out, "{}jump {}", layout.jump, target)?;
            }
        }
        writeln!(out)?;

        Ok(Some(Frame { choices, next: 0 }))
    }

    fn write_body<W: Write>(&self, node: &StoryNode, out: &mut W, pad: &str) -> io::Result<()> {
        let title = node.title.trim();
        if self.config.emit_titles && !title.is_empty() {
            let title = title.replace(['\r', '\n'], " ");
            writeln!(out, "{}# {}", pad, title)?;
        }

        for line in node.script.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                writeln!(out)?;
            } else {
                writeln!(out, "{}{}", pad, line)?;
            }
        }

        Ok(())
    }

    fn report_progress(&mut self) -> bool {
        let (current, total) = (self.processed_nodes, self.total_nodes);
        match self.progress_callback.as_mut() {
            Some(callback) => callback(current, total),
            None => true,
        }
    }
}

/// A node whose valid choices are still being followed
struct Frame<'a> {
    choices: Vec<Successor<'a>>,
    next: usize,
}

/// Padding for the three levels inside a label block
struct Layout {
    body: String,
    item: String,
    jump: String,
}

impl Layout {
    fn new(indent_width: usize) -> Self {
        let width = indent_width.min(MAX_INDENT_WIDTH);
        let pad = |levels: usize| ScriptFormatter::indent(to_spaces(width.saturating_mul(levels)));
        Self {
            body: pad(1),
            item: pad(2),
            jump: pad(3),
        }
    }
}

/// Closing statement for a node with nothing left to branch to
fn write_terminator<W: Write>(kind: NodeKind, out: &mut W, pad: &str) -> io::Result<()> {
    match kind {
        NodeKind::End | NodeKind::Dialogue => writeln!(out, "{}return", pad),
        NodeKind::Menu => {
            writeln!(out, "{}# no choices", pad)?;
            writeln!(out, "{}return", pad)
        }
        NodeKind::Jump => {
            writeln!(out, "{}# no jump target", pad)?;
            writeln!(out, "{}return", pad)
        }
    }
}

fn to_spaces(indent: usize) -> i32 {
    i32::try_from(indent).unwrap_or(i32::MAX)
}
