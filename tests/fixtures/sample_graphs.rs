// Helper functions to build story graphs with various topologies

#![allow(dead_code)]

use story_graph::{Choice, NodeKind, StoryGraph, StoryNode};

/// Build a graph from `(id, kind)` pairs and `(from, to)` choices
///
/// Choice ids are `from>to#n` so they stay unique and readable.
pub fn build(nodes: &[(&str, NodeKind)], edges: &[(&str, &str)]) -> StoryGraph {
    let mut graph = StoryGraph::new();
    for (id, kind) in nodes {
        let mut node = StoryNode::with_id(*id, *kind)
            .titled(format!("Title {}", id))
            .scripted(format!("e \"Body of {}.\"", id));
        for (n, (_, to)) in edges.iter().filter(|(from, _)| from == id).enumerate() {
            node = node.with_choice(Choice::with_id(
                format!("{}>{}#{}", id, to, n),
                format!("To {}", to),
                *to,
            ));
        }
        graph.insert_node(node).unwrap();
    }
    graph
}

/// A → B → A
pub fn two_cycle() -> StoryGraph {
    build(
        &[("A", NodeKind::Dialogue), ("B", NodeKind::Dialogue)],
        &[("A", "B"), ("B", "A")],
    )
}

/// A → B → C, C is an ending
pub fn linear_chain() -> StoryGraph {
    build(
        &[("A", NodeKind::Dialogue), ("B", NodeKind::Dialogue), ("C", NodeKind::End)],
        &[("A", "B"), ("B", "C")],
    )
}

/// A → {B, C} → D
pub fn diamond() -> StoryGraph {
    build(
        &[
            ("A", NodeKind::Menu),
            ("B", NodeKind::Dialogue),
            ("C", NodeKind::Dialogue),
            ("D", NodeKind::End),
        ],
        &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
    )
}

/// A single node whose only choice leads back to itself
pub fn self_loop() -> StoryGraph {
    build(&[("A", NodeKind::Menu)], &[("A", "A")])
}

/// A → B plus a choice to a node that never existed, and an island X → Y
pub fn dangling_and_island() -> StoryGraph {
    build(
        &[
            ("A", NodeKind::Dialogue),
            ("B", NodeKind::End),
            ("X", NodeKind::Dialogue),
            ("Y", NodeKind::End),
        ],
        &[("A", "ghost"), ("A", "B"), ("X", "Y")],
    )
}

/// Linear chain n0 → n1 → ... of the given length
pub fn long_chain(len: usize) -> StoryGraph {
    let mut graph = StoryGraph::new();
    for i in 0..len {
        let mut node = StoryNode::with_id(format!("n{:04}", i), NodeKind::Dialogue);
        if i + 1 < len {
            node = node.with_choice(Choice::with_id(
                format!("c{:04}", i),
                "next",
                format!("n{:04}", i + 1),
            ));
        } else {
            node.kind = NodeKind::End;
        }
        graph.insert_node(node).unwrap();
    }
    graph
}
