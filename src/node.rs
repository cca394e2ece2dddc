use crate::id_generator;
use crate::Choice;
use serde::{Deserialize, Serialize};

/// A story node: one unit of narrative content with outgoing choices
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryNode {
    /// Unique identifier, never reused
    pub id: String,

    /// Display title
    #[serde(default)]
    pub title: String,

    /// Body script, passed through to the exported script
    #[serde(default)]
    pub script: String,

    /// Kind selects the terminator emitted when the node has no choices
    #[serde(rename = "type", default)]
    pub kind: NodeKind,

    /// Outgoing choices in declared order
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Editor position (not used by export)
    #[serde(default)]
    pub position: Position,
}

impl StoryNode {
    /// Create a new node with a freshly generated ID
    pub fn new(kind: NodeKind) -> Self {
        Self::with_id(id_generator::next_id(), kind)
    }

    /// Create a node with a specific ID (useful for testing and loading)
    pub fn with_id(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            title: "New Node".to_string(),
            script: String::new(),
            kind,
            choices: Vec::new(),
            position: Position::default(),
        }
    }

    /// Builder-style title setter
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder-style script setter
    pub fn scripted(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    /// Builder-style choice append
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_script(&mut self, script: impl Into<String>) {
        self.script = script.into();
    }

    pub fn set_kind(&mut self, kind: NodeKind) {
        self.kind = kind;
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Find a choice on this node by ID
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }

    /// Remove every choice pointing at `target`, returning how many were dropped
    pub fn remove_choices_to(&mut self, target: &str) -> usize {
        let before = self.choices.len();
        self.choices.retain(|c| !c.targets(target));
        before - self.choices.len()
    }
}

/// Closed set of node kinds
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    #[default]
    Dialogue,
    Menu,
    Jump,
    End,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Dialogue => "dialogue",
            NodeKind::Menu => "menu",
            NodeKind::Jump => "jump",
            NodeKind::End => "end",
        }
    }
}

// Unknown names fall back to dialogue so older project files still load.
impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "menu" => NodeKind::Menu,
            "jump" => NodeKind::Jump,
            "end" => NodeKind::End,
            _ => NodeKind::Dialogue,
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Position on the editor canvas
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
