use crate::NodeKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A graph change with timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEvent {
    pub timestamp: DateTime<Utc>,
    pub event: EventType,
}

impl GraphEvent {
    /// Create a new event with the current timestamp
    pub fn new(event: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Changes that can occur in a story graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventType {
    NodeAdded {
        id: String,
        kind: NodeKind,
    },

    NodeRemoved {
        id: String,
        /// Choices elsewhere that pointed at the removed node
        cascaded_choices: usize,
    },

    NodeUpdated {
        id: String,
        field: NodeField,
    },

    ChoiceAdded {
        node_id: String,
        choice_id: String,
        target: String,
    },

    ChoiceRemoved {
        node_id: String,
        choice_id: String,
    },

    EntryChanged {
        old_id: Option<String>,
        new_id: Option<String>,
    },

    Cleared,
}

/// Which part of a node an update touched
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeField {
    Title,
    Script,
    Kind,
    Position,
}
