use crate::reachability::reachable_from;
use crate::{NodeKind, StoryGraph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Validation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Info,
    Warning,
    Error,
}

/// Validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub message: String,
    pub affected_nodes: Vec<String>,
    pub issue_type: ValidationIssueType,
}

/// Types of validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationIssueType {
    EmptyGraph,
    MissingEntry,
    DanglingChoice,
    UnreachableNode,
    Cycle,
    DeadEnd,
}

/// Complete validation result
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Warning)
    }

    pub fn with_severity(&self, severity: ValidationSeverity) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }

    pub fn of_type(&self, issue_type: ValidationIssueType) -> Option<&ValidationIssue> {
        self.issues.iter().find(|i| i.issue_type == issue_type)
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}

/// Pre-export diagnostics for story graphs
///
/// None of these conditions stop an export. They explain what the exporter
/// will do: skip dangling choices, omit unreachable nodes, turn cycles into
/// jumps, and close dead ends with a terminator.
pub struct Validator;

impl Validator {
    /// Run all checks against the entry whole-graph export would use
    pub fn validate(graph: &StoryGraph, entry: Option<&str>) -> ValidationResult {
        let mut result = ValidationResult::new();

        if graph.is_empty() {
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Info,
                message: "Graph has no nodes; export will produce an empty script.".to_string(),
                affected_nodes: vec![],
                issue_type: ValidationIssueType::EmptyGraph,
            });
            return result;
        }

        let entry = entry.or_else(|| graph.entry());
        let start = match entry {
            Some(id) if !graph.contains(id) => {
                result.add_issue(ValidationIssue {
                    severity: ValidationSeverity::Error,
                    message: format!("Entry node {} does not exist; export will be empty.", id),
                    affected_nodes: vec![id.to_string()],
                    issue_type: ValidationIssueType::MissingEntry,
                });
                None
            }
            Some(id) => Some(id),
            None => graph.first_node_id(),
        };

        let dangling = Self::find_dangling_choices(graph);
        if !dangling.is_empty() {
            let mut owners: Vec<String> = dangling.iter().map(|(node, _)| node.clone()).collect();
            owners.dedup();
            let choices: Vec<&str> = dangling.iter().map(|(_, c)| c.as_str()).collect();
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Warning,
                message: format!(
                    "{} choice(s) point at missing nodes and will be skipped: {}",
                    dangling.len(),
                    choices.join(", ")
                ),
                affected_nodes: owners,
                issue_type: ValidationIssueType::DanglingChoice,
            });
        }

        if let Some(start) = start {
            let reachable = reachable_from(graph, start);
            let orphans: Vec<String> = graph
                .node_ids()
                .filter(|id| !reachable.contains(id))
                .map(str::to_string)
                .collect();
            if !orphans.is_empty() {
                result.add_issue(ValidationIssue {
                    severity: ValidationSeverity::Info,
                    message: format!(
                        "{} node(s) are unreachable from the entry and will not be exported.",
                        orphans.len()
                    ),
                    affected_nodes: orphans,
                    issue_type: ValidationIssueType::UnreachableNode,
                });
            }
        }

        if let Some(cycle_nodes) = Self::detect_cycles(graph) {
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Info,
                message: format!(
                    "Cycle involving {} node(s); repeated visits are exported as jumps.",
                    cycle_nodes.len()
                ),
                affected_nodes: cycle_nodes,
                issue_type: ValidationIssueType::Cycle,
            });
        }

        let dead_ends: Vec<String> = graph
            .nodes()
            .filter(|n| n.kind != NodeKind::End)
            .filter(|n| n.choices.iter().all(|c| !graph.contains(&c.target_node_id)))
            .map(|n| n.id.clone())
            .collect();
        if !dead_ends.is_empty() {
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Info,
                message: format!(
                    "{} non-end node(s) have no valid choices and will end the story.",
                    dead_ends.len()
                ),
                affected_nodes: dead_ends,
                issue_type: ValidationIssueType::DeadEnd,
            });
        }

        result
    }

    /// `(owner node id, choice id)` for every choice whose target is missing
    fn find_dangling_choices(graph: &StoryGraph) -> Vec<(String, String)> {
        graph
            .nodes()
            .flat_map(|node| {
                node.choices
                    .iter()
                    .filter(|c| !graph.contains(&c.target_node_id))
                    .map(move |c| (node.id.clone(), c.id.clone()))
            })
            .collect()
    }

    /// Detect a cycle in the choice graph using DFS
    fn detect_cycles(graph: &StoryGraph) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut cycle_nodes = Vec::new();

        for id in graph.node_ids() {
            if !visited.contains(id)
                && Self::dfs_detect_cycle(graph, id, &mut visited, &mut rec_stack, &mut cycle_nodes)
            {
                cycle_nodes.dedup();
                return Some(cycle_nodes);
            }
        }

        None
    }

    fn dfs_detect_cycle<'g>(
        graph: &'g StoryGraph,
        id: &'g str,
        visited: &mut HashSet<&'g str>,
        rec_stack: &mut HashSet<&'g str>,
        cycle_nodes: &mut Vec<String>,
    ) -> bool {
        visited.insert(id);
        rec_stack.insert(id);

        for successor in graph.successors_of(id) {
            let target = successor.target_id;
            if !graph.contains(target) {
                continue;
            }

            if !visited.contains(target) {
                if Self::dfs_detect_cycle(graph, target, visited, rec_stack, cycle_nodes) {
                    cycle_nodes.push(id.to_string());
                    return true;
                }
            } else if rec_stack.contains(target) {
                cycle_nodes.push(id.to_string());
                cycle_nodes.push(target.to_string());
                return true;
            }
        }

        rec_stack.remove(id);
        false
    }
}

/// Extension trait for StoryGraph to add validation
pub trait ValidatedGraph {
    fn validate(&self) -> ValidationResult;

    /// Highest severity reported per node
    fn nodes_with_issues(&self, result: &ValidationResult) -> HashMap<String, ValidationSeverity>;
}

impl ValidatedGraph for StoryGraph {
    fn validate(&self) -> ValidationResult {
        Validator::validate(self, None)
    }

    fn nodes_with_issues(&self, result: &ValidationResult) -> HashMap<String, ValidationSeverity> {
        let mut nodes = HashMap::new();

        for issue in &result.issues {
            for node_id in &issue.affected_nodes {
                nodes
                    .entry(node_id.clone())
                    .and_modify(|severity| {
                        if issue.severity > *severity {
                            *severity = issue.severity;
                        }
                    })
                    .or_insert(issue.severity);
            }
        }

        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Choice, StoryNode};

    fn graph_with(nodes: &[(&str, NodeKind)], edges: &[(&str, &str)]) -> StoryGraph {
        let mut graph = StoryGraph::new();
        for (id, kind) in nodes {
            graph.insert_node(StoryNode::with_id(*id, *kind)).unwrap();
        }
        for (from, to) in edges {
            graph.add_choice(from, "go", *to, None).unwrap();
        }
        graph
    }

    #[test]
    fn test_empty_graph() {
        let result = StoryGraph::new().validate();
        assert!(result.is_valid());
        assert!(result.of_type(ValidationIssueType::EmptyGraph).is_some());
    }

    #[test]
    fn test_missing_entry_error() {
        let graph = graph_with(&[("A", NodeKind::End)], &[]);
        let result = Validator::validate(&graph, Some("Z"));
        assert!(result.has_errors());
        assert_eq!(
            result.with_severity(ValidationSeverity::Error)[0].issue_type,
            ValidationIssueType::MissingEntry
        );
    }

    #[test]
    fn test_dangling_choice_warning() {
        let mut graph = graph_with(&[("A", NodeKind::Dialogue)], &[]);
        graph
            .insert_node(StoryNode::with_id("B", NodeKind::End))
            .unwrap();
        graph.add_choice("A", "ok", "B", None).unwrap();
        let bad = graph.add_choice("A", "broken", "ghost", None).unwrap();

        let result = graph.validate();
        assert!(result.has_warnings());
        let issue = result.of_type(ValidationIssueType::DanglingChoice).unwrap();
        assert_eq!(issue.affected_nodes, vec!["A".to_string()]);
        assert!(issue.message.contains(&bad));
    }

    #[test]
    fn test_unreachable_nodes_reported() {
        let graph = graph_with(
            &[("A", NodeKind::Dialogue), ("B", NodeKind::End), ("C", NodeKind::End)],
            &[("A", "B")],
        );

        let result = graph.validate();
        let issue = result.of_type(ValidationIssueType::UnreachableNode).unwrap();
        assert_eq!(issue.affected_nodes, vec!["C".to_string()]);
        assert_eq!(issue.severity, ValidationSeverity::Info);
    }

    #[test]
    fn test_cycle_detection() {
        let graph = graph_with(
            &[("A", NodeKind::Dialogue), ("B", NodeKind::Dialogue)],
            &[("A", "B"), ("B", "A")],
        );

        let result = graph.validate();
        assert!(result.is_valid());
        let issue = result.of_type(ValidationIssueType::Cycle).unwrap();
        assert!(issue.affected_nodes.contains(&"A".to_string()));
        assert!(issue.affected_nodes.contains(&"B".to_string()));
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let graph = graph_with(&[("A", NodeKind::Dialogue)], &[("A", "A")]);
        assert!(graph.validate().of_type(ValidationIssueType::Cycle).is_some());
    }

    #[test]
    fn test_dead_end() {
        let mut graph = graph_with(&[("A", NodeKind::Menu), ("B", NodeKind::End)], &[]);
        graph
            .insert_node(
                StoryNode::with_id("C", NodeKind::Dialogue)
                    .with_choice(Choice::with_id("c1", "lost", "ghost")),
            )
            .unwrap();

        let result = Validator::validate(&graph, Some("A"));
        let issue = result.of_type(ValidationIssueType::DeadEnd).unwrap();
        assert_eq!(issue.affected_nodes, vec!["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_clean_graph() {
        let graph = graph_with(
            &[("A", NodeKind::Dialogue), ("B", NodeKind::End)],
            &[("A", "B")],
        );

        let result = graph.validate();
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_nodes_with_issues_keeps_highest_severity() {
        let graph = graph_with(
            &[("A", NodeKind::Dialogue), ("B", NodeKind::Dialogue)],
            &[("A", "B"), ("B", "A"), ("B", "ghost")],
        );

        let result = graph.validate();
        let flagged = graph.nodes_with_issues(&result);
        assert_eq!(flagged["B"], ValidationSeverity::Warning);
        assert_eq!(flagged["A"], ValidationSeverity::Info);
    }
}
