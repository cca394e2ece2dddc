use crate::{ExportConfig, ExportError, ExportReport, RenpyExporter, StoryGraph};
use std::path::Path;
use tracing::info;

/// Caller-owned progress display
pub trait ExportProgressView {
    /// Show `(current, total)`; return `false` to cancel the export
    fn update(&mut self, current: usize, total: usize) -> bool;

    /// Dismiss the display; called once when the export call returns
    fn close(&mut self);
}

/// Export `graph` to `path` while reporting through `view`
///
/// `view.close()` runs after the export whether it completed, was canceled,
/// or failed to write.
pub fn export_with_view(
    graph: &StoryGraph,
    path: &Path,
    selection: &[String],
    config: ExportConfig,
    view: &mut dyn ExportProgressView,
) -> Result<ExportReport, ExportError> {
    let result = {
        let mut exporter = RenpyExporter::with_config(graph, config);
        if !selection.is_empty() {
            exporter.set_selected_node_ids(selection.iter().cloned());
        }
        exporter.set_progress_callback(|current, total| view.update(current, total));
        exporter.export_to_file(path)
    };

    view.close();
    result
}

/// View that reports through `tracing` at roughly every tenth of the work
#[derive(Debug, Default)]
pub struct LogProgress {
    last_logged: usize,
    closed: bool,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ExportProgressView for LogProgress {
    fn update(&mut self, current: usize, total: usize) -> bool {
        let step = (total / 10).max(1);
        if current == total || current >= self.last_logged + step {
            self.last_logged = current;
            info!(current, total, "Export progress");
        }
        true
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// View that cancels once `limit` nodes have been reported
#[derive(Debug)]
pub struct CancelAfter {
    limit: usize,
    pub updates: Vec<(usize, usize)>,
    pub closed: bool,
}

impl CancelAfter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            updates: Vec::new(),
            closed: false,
        }
    }
}

impl ExportProgressView for CancelAfter {
    fn update(&mut self, current: usize, total: usize) -> bool {
        self.updates.push((current, total));
        current < self.limit
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Choice, ExportStatus, NodeKind, StoryNode};
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::TempDir;

    fn chain(len: usize) -> StoryGraph {
        let mut graph = StoryGraph::new();
        for i in 0..len {
            let mut node = StoryNode::with_id(format!("n{}", i), NodeKind::Dialogue);
            if i + 1 < len {
                node = node.with_choice(Choice::with_id(format!("c{}", i), "next", format!("n{}", i + 1)));
            }
            graph.insert_node(node).unwrap();
        }
        graph
    }

    #[test]
    fn test_view_sees_every_node_and_is_closed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("story.rpy");
        let graph = chain(4);

        let mut view = CancelAfter::new(usize::MAX);
        let report = export_with_view(&graph, &path, &[], ExportConfig::default(), &mut view).unwrap();

        assert_eq!(report.status, ExportStatus::Completed);
        assert_eq!(view.updates, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
        assert!(view.closed);
        assert!(fs::read_to_string(&path).unwrap().contains("label node_n3:"));
    }

    #[test]
    fn test_view_cancel() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("story.rpy");
        let graph = chain(5);

        let mut view = CancelAfter::new(2);
        let report = export_with_view(&graph, &path, &[], ExportConfig::default(), &mut view).unwrap();

        assert_eq!(report.status, ExportStatus::Canceled);
        assert_eq!(view.updates.len(), 2);
        assert!(view.closed);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("label node_n0:"));
        assert!(!text.contains("label node_n1:"));
    }

    #[test]
    fn test_view_closed_on_open_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing-dir").join("story.rpy");
        let graph = chain(2);

        let mut view = LogProgress::new();
        let result = export_with_view(&graph, &path, &[], ExportConfig::default(), &mut view);

        assert_matches!(result, Err(ExportError::Open { .. }));
        assert!(view.is_closed());
    }

    #[test]
    fn test_selection_passed_through() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("story.rpy");
        let graph = chain(3);

        let mut view = LogProgress::new();
        let selection = vec!["n1".to_string()];
        let report = export_with_view(&graph, &path, &selection, ExportConfig::default(), &mut view).unwrap();

        assert_eq!(report.total_nodes, 2);
        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("label node_n0:"));
    }
}
