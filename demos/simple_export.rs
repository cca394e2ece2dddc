/// Example: building a small branching story and exporting it
///
/// This example demonstrates:
/// - Creating nodes and choices
/// - Validating the graph before export
/// - Exporting the whole graph and a selection
/// - Saving and loading the project

use anyhow::Result;
use story_graph::*;

fn main() -> Result<()> {
    println!("=== Story Graph: Simple Export Example ===\n");

    // Step 1: Build the graph
    let mut graph = StoryGraph::new();
    let gate = graph.add_node(NodeKind::Menu);
    let forest = graph.add_node(NodeKind::Dialogue);
    let village = graph.add_node(NodeKind::Dialogue);
    let ending = graph.add_node(NodeKind::End);

    graph.set_node_title(&gate, "Gate")?;
    graph.set_node_script(&gate, "e \"Two roads lead away from the gate.\"")?;
    graph.set_node_title(&forest, "Forest")?;
    graph.set_node_script(&forest, "e \"The trees close in.\"")?;
    graph.set_node_title(&village, "Village")?;
    graph.set_node_script(&village, "e \"Smoke rises from the chimneys.\"")?;
    graph.set_node_title(&ending, "Home")?;
    graph.set_node_script(&ending, "e \"You made it home.\"")?;

    graph.add_choice(&gate, "Into the forest", forest.clone(), None)?;
    graph.add_choice(&gate, "Toward the village", village.clone(), Some("has_map".to_string()))?;
    graph.add_choice(&forest, "Press on", ending.clone(), None)?;
    graph.add_choice(&forest, "Turn back", gate.clone(), None)?;
    graph.add_choice(&village, "Rest", ending.clone(), None)?;
    graph.set_entry(&gate)?;
    println!("Built graph with {} nodes and {} choices", graph.node_count(), graph.choice_count());

    // Step 2: Validate
    let result = graph.validate();
    for issue in &result.issues {
        println!("  {:?}: {}", issue.severity, issue.message);
    }

    // Step 3: Export everything reachable from the entry
    let mut exporter = RenpyExporter::new(&graph);
    exporter.set_progress_callback(|current, total| {
        println!("  exported {}/{}", current, total);
        true
    });
    let (script, report) = exporter.export_to_string()?;
    println!("\nFull export ({:?}):\n{}", report.status, script);

    // Step 4: Export only the village branch
    let mut exporter = RenpyExporter::new(&graph);
    exporter.set_selected_node_ids([village.clone()]);
    let (script, _) = exporter.export_to_string()?;
    println!("Village-only export:\n{}", script);

    // Step 5: Save and reload
    let path = std::env::temp_dir().join("story_graph_example.json");
    ProjectFile::save(&path, &graph)?;
    let loaded = ProjectFile::load(&path)?;
    println!("Reloaded {} nodes from {}", loaded.node_count(), path.display());

    Ok(())
}
