// Story Graph - narrative graph model and Ren'Py exporter

pub mod choice;
pub mod config;
pub mod event;
pub mod export;
pub mod formatter;
pub mod graph;
pub mod id_generator;
pub mod node;
pub mod progress;
pub mod reachability;
pub mod serialization;
pub mod validation;

// Re-export main types for convenience
pub use choice::Choice;
pub use config::ExportConfig;
pub use event::{EventType, GraphEvent, NodeField};
pub use export::{ExportError, ExportReport, ExportStatus, ProgressCallback, RenpyExporter};
pub use formatter::ScriptFormatter;
pub use graph::{StoryGraph, Successor};
pub use node::{NodeKind, Position, StoryNode};
pub use progress::{export_with_view, CancelAfter, ExportProgressView, LogProgress};
pub use reachability::count_reachable;
pub use serialization::{Manifest, ProjectFile};
pub use validation::{
    ValidatedGraph, ValidationIssue, ValidationIssueType, ValidationResult, ValidationSeverity,
    Validator,
};
