use crate::StoryGraph;
use std::collections::HashSet;

/// Ids of every existing node reachable from `start_id`, start included
///
/// Dangling choice targets are ignored. A missing start yields an empty set.
pub fn reachable_from<'g>(graph: &'g StoryGraph, start_id: &str) -> HashSet<&'g str> {
    let mut reachable = HashSet::new();
    let start = match graph.get_node(start_id) {
        Some(node) => node.id.as_str(),
        None => return reachable,
    };

    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if !reachable.insert(id) {
            continue;
        }

        for successor in graph.successors_of(id) {
            if graph.contains(successor.target_id) && !reachable.contains(successor.target_id) {
                stack.push(successor.target_id);
            }
        }
    }

    reachable
}

/// Number of distinct nodes a traversal from `start_id` will visit
pub fn count_reachable(graph: &StoryGraph, start_id: &str) -> usize {
    reachable_from(graph, start_id).len()
}
