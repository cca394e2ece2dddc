use crate::{Choice, EventType, GraphEvent, NodeField, NodeKind, Position, StoryNode};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

/// Story graph containing every node and, through them, every choice
///
/// Nodes are kept in an ordered map so enumeration is stable across calls
/// and across save/load. Generated ids are ULIDs, which sort by creation
/// time.
#[derive(Debug, Clone, Default)]
pub struct StoryGraph {
    /// All nodes indexed by ID
    nodes: BTreeMap<String, StoryNode>,

    /// Explicit canonical entry for whole-graph export
    entry: Option<String>,

    /// Change log
    events: Vec<GraphEvent>,
}

/// One outgoing edge as seen by traversal code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Successor<'a> {
    pub choice_id: &'a str,
    pub target_id: &'a str,
    pub text: &'a str,
    pub condition: Option<&'a str>,
}

impl StoryGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Node Operations ==========

    /// Create a new node of the given kind and return its ID
    pub fn add_node(&mut self, kind: NodeKind) -> String {
        let node = StoryNode::new(kind);
        let id = node.id.clone();

        self.log_event(EventType::NodeAdded {
            id: id.clone(),
            kind,
        });

        self.nodes.insert(id.clone(), node);
        id
    }

    /// Insert a fully built node, keeping node and choice ids unique
    pub fn insert_node(&mut self, node: StoryNode) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(anyhow!("Duplicate node id: {}", node.id));
        }

        for (i, choice) in node.choices.iter().enumerate() {
            let repeated = node.choices[..i].iter().any(|c| c.id == choice.id);
            if repeated || self.find_choice(&choice.id).is_some() {
                return Err(anyhow!("Duplicate choice id: {}", choice.id));
            }
        }

        self.log_event(EventType::NodeAdded {
            id: node.id.clone(),
            kind: node.kind,
        });

        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Remove a node and every choice elsewhere that targets it
    ///
    /// Returns the number of cascaded choices. Removing an unknown id is
    /// an error; dangling choices to ids that never existed are left alone.
    pub fn remove_node(&mut self, id: &str) -> Result<usize> {
        if self.nodes.remove(id).is_none() {
            return Err(anyhow!("Node not found: {}", id));
        }

        let cascaded: usize = self
            .nodes
            .values_mut()
            .map(|node| node.remove_choices_to(id))
            .sum();

        if self.entry.as_deref() == Some(id) {
            self.entry = None;
            self.log_event(EventType::EntryChanged {
                old_id: Some(id.to_string()),
                new_id: None,
            });
        }

        self.log_event(EventType::NodeRemoved {
            id: id.to_string(),
            cascaded_choices: cascaded,
        });

        Ok(cascaded)
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.entry = None;
        self.log_event(EventType::Cleared);
    }

    /// Get a node by ID
    pub fn get_node(&self, id: &str) -> Option<&StoryNode> {
        self.nodes.get(id)
    }

    /// Check whether a node exists
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes in stable id order
    pub fn nodes(&self) -> impl Iterator<Item = &StoryNode> {
        self.nodes.values()
    }

    /// All node ids in stable order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// First id in the stable enumeration
    pub fn first_node_id(&self) -> Option<&str> {
        self.nodes.keys().next().map(String::as_str)
    }

    /// Outgoing edges of a node in declared order; empty for unknown ids
    pub fn successors_of(&self, id: &str) -> Vec<Successor<'_>> {
        self.nodes
            .get(id)
            .map(|node| {
                node.choices
                    .iter()
                    .map(|c| Successor {
                        choice_id: &c.id,
                        target_id: &c.target_node_id,
                        text: &c.text,
                        condition: c.guard(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_node_title(&mut self, id: &str, title: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.set_title(title);
        self.log_node_update(id, NodeField::Title);
        Ok(())
    }

    pub fn set_node_script(&mut self, id: &str, script: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.set_script(script);
        self.log_node_update(id, NodeField::Script);
        Ok(())
    }

    pub fn set_node_kind(&mut self, id: &str, kind: NodeKind) -> Result<()> {
        self.node_mut(id)?.set_kind(kind);
        self.log_node_update(id, NodeField::Kind);
        Ok(())
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> Result<()> {
        self.node_mut(id)?.set_position(position);
        self.log_node_update(id, NodeField::Position);
        Ok(())
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut StoryNode> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| anyhow!("Node not found: {}", id))
    }

    // ========== Choice Operations ==========

    /// Append a choice to `from` and return the new choice ID
    ///
    /// The target does not have to exist yet.
    pub fn add_choice(
        &mut self,
        from: &str,
        text: impl Into<String>,
        target: impl Into<String>,
        condition: Option<String>,
    ) -> Result<String> {
        let mut choice = Choice::new(text, target);
        choice.condition = condition;
        let choice_id = choice.id.clone();
        let target = choice.target_node_id.clone();

        self.node_mut(from)?.choices.push(choice);

        self.log_event(EventType::ChoiceAdded {
            node_id: from.to_string(),
            choice_id: choice_id.clone(),
            target,
        });

        Ok(choice_id)
    }

    /// Remove a choice wherever it lives
    pub fn remove_choice(&mut self, choice_id: &str) -> Result<()> {
        let owner = self
            .find_choice(choice_id)
            .map(|(node, _)| node.id.clone())
            .ok_or_else(|| anyhow!("Choice not found: {}", choice_id))?;

        self.node_mut(&owner)?.choices.retain(|c| c.id != choice_id);

        self.log_event(EventType::ChoiceRemoved {
            node_id: owner,
            choice_id: choice_id.to_string(),
        });

        Ok(())
    }

    /// Find a choice and its owning node
    pub fn find_choice(&self, choice_id: &str) -> Option<(&StoryNode, &Choice)> {
        self.nodes
            .values()
            .find_map(|node| node.choice(choice_id).map(|c| (node, c)))
    }

    // ========== Entry ==========

    /// Mark a node as the canonical export entry
    pub fn set_entry(&mut self, id: &str) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(anyhow!("Node not found: {}", id));
        }

        let old_id = self.entry.replace(id.to_string());
        self.log_event(EventType::EntryChanged {
            old_id,
            new_id: Some(id.to_string()),
        });

        Ok(())
    }

    pub fn clear_entry(&mut self) {
        if let Some(old) = self.entry.take() {
            self.log_event(EventType::EntryChanged {
                old_id: Some(old),
                new_id: None,
            });
        }
    }

    /// Explicit entry, if one was set
    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    /// Restore a stored entry without validating it (for deserialization)
    pub(crate) fn restore_entry(&mut self, entry: Option<String>) {
        self.entry = entry;
    }

    // ========== Event Logging ==========

    fn log_event(&mut self, event: EventType) {
        self.events.push(GraphEvent::new(event));
    }

    fn log_node_update(&mut self, id: &str, field: NodeField) {
        self.log_event(EventType::NodeUpdated {
            id: id.to_string(),
            field,
        });
    }

    /// Get all events
    pub fn events(&self) -> &[GraphEvent] {
        &self.events
    }

    /// Clear event log
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    // ========== Utility Methods ==========

    /// Count nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Count choices across all nodes
    pub fn choice_count(&self) -> usize {
        self.nodes.values().map(|n| n.choices.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
