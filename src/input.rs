//! Input model: tools, keys, and the UI state that interprets them.
//!
//! `Tool` captures what a canvas click means. `Key` is the small set of
//! keyboard commands the editor reacts to. `UiState` is everything about the
//! editor that is not document content: active tool, selection, and the
//! points of a wall that is still being drawn.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{ObjectId, ObjectKind};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Click to add wall points, Enter to close the wall.
    Wall,
    /// Click near a wall to mount a window.
    Window,
    /// Click near a wall to mount a door.
    Door,
    /// Furniture placement. Items are added from the catalogue, not by clicking.
    Furniture,
}

impl Tool {
    /// The opening kind this tool places, if it places one.
    #[must_use]
    pub fn opening_kind(self) -> Option<ObjectKind> {
        match self {
            Self::Door => Some(ObjectKind::Door),
            Self::Window => Some(ObjectKind::Window),
            _ => None,
        }
    }
}

/// A keyboard key the editor understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Delete,
    /// Anything else, carrying the key name as reported by the host.
    Other(String),
}

impl Key {
    /// Parse a host key name such as `"Enter"` or `"Delete"`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Self::Enter,
            "Escape" => Self::Escape,
            "Delete" => Self::Delete,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// The id of the currently selected object, if any.
    pub selected_id: Option<ObjectId>,
    /// Grid-snapped points of the wall being drawn.
    pub temp_points: Vec<Point>,
}
