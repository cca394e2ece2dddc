use crate::id_generator;
use serde::{Deserialize, Serialize};

/// A labeled, optionally guarded edge from one story node to another
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    /// Unique identifier within the graph
    pub id: String,

    /// Text shown to the player
    pub text: String,

    /// Destination node (may name a node that does not exist)
    #[serde(rename = "target")]
    pub target_node_id: String,

    /// Guard expression, emitted verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Choice {
    /// Create a new choice with a freshly generated ID
    pub fn new(text: impl Into<String>, target_node_id: impl Into<String>) -> Self {
        Self::with_id(id_generator::next_id(), text, target_node_id)
    }

    /// Create a choice with a specific ID (useful for testing and loading)
    pub fn with_id(
        id: impl Into<String>,
        text: impl Into<String>,
        target_node_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            target_node_id: target_node_id.into(),
            condition: None,
        }
    }

    /// Attach a guard expression
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Check if this choice leads to a given node
    pub fn targets(&self, node_id: &str) -> bool {
        self.target_node_id == node_id
    }

    /// Guard expression, treating blank strings as absent
    pub fn guard(&self) -> Option<&str> {
        self.condition
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_creation() {
        let choice = Choice::new("Go left", "B");

        assert_eq!(choice.text, "Go left");
        assert_eq!(choice.target_node_id, "B");
        assert!(choice.condition.is_none());
        assert!(!choice.id.is_empty());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Choice::new("a", "X");
        let b = Choice::new("b", "X");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_choice_targets() {
        let choice = Choice::with_id("c1", "Back", "A");

        assert!(choice.targets("A"));
        assert!(!choice.targets("B"));
    }

    #[test]
    fn test_guard_ignores_blank_condition() {
        let guarded = Choice::with_id("c1", "Open", "B").with_condition(" has_key ");
        assert_eq!(guarded.guard(), Some("has_key"));

        let blank = Choice::with_id("c2", "Open", "B").with_condition("   ");
        assert_eq!(blank.guard(), None);
    }

    #[test]
    fn test_condition_omitted_from_json_when_absent() {
        let choice = Choice::with_id("c1", "Next", "B");
        let json = serde_json::to_value(&choice).unwrap();

        assert_eq!(json["target"], "B");
        assert!(json.get("condition").is_none());

        let parsed: Choice = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, choice);
    }
}
