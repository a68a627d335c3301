//! Editor engine: turns tool clicks, key presses and property edits into
//! document mutations.
//!
//! The host (a canvas widget, a CLI, a test) owns rendering and forwards raw
//! input here. Every handler mutates `EngineCore` in place and returns the
//! [`Action`]s describing what changed so the host can redraw, update panels,
//! and mark the project dirty.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::debug;

use crate::camera::{Camera, Point};
use crate::consts::{
    DOOR_COLOR, DOOR_WIDTH, FALLBACK_OBJECT_SIZE, FURNITURE_DROP_X, FURNITURE_DROP_Y, GRID_SIZE, MIN_OBJECT_SIZE,
    WALL_COLOR, WALL_THICKNESS, WINDOW_COLOR, WINDOW_WIDTH,
};
use crate::doc::{DocStore, EditorObject, FurnitureKind, ObjectId, ObjectKind, PartialEditorObject};
use crate::input::{Key, Tool, UiState};
use crate::project::ProjectData;
use crate::snap::{find_nearest_wall, snap_to_grid};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ObjectCreated(EditorObject),
    ObjectUpdated { id: ObjectId, fields: PartialEditorObject },
    ObjectDeleted { id: ObjectId },
    SelectionChanged(Option<ObjectId>),
    ToolChanged(Tool),
    /// The in-progress wall polyline changed.
    DraftChanged(Vec<Point>),
}

impl Action {
    /// Whether this action changed document content (and so needs saving).
    #[must_use]
    pub fn mutates_document(&self) -> bool {
        matches!(self, Self::ObjectCreated(_) | Self::ObjectUpdated { .. } | Self::ObjectDeleted { .. })
    }
}

/// Result of a resize/rotate gesture, as reported by the host's transformer.
///
/// `scale_x` / `scale_y` are relative to the object's size before the gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

impl Transform {
    /// Whether every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.scale_x, self.scale_y, self.rotation].iter().all(|v| v.is_finite())
    }
}

/// Core engine state.
#[derive(Default)]
pub struct EngineCore {
    pub doc: DocStore,
    pub camera: Camera,
    pub ui: UiState,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Replace the document and view with a project snapshot and return to
    /// the select tool with nothing selected.
    pub fn load_project_data(&mut self, data: ProjectData) {
        self.camera = data.camera();
        self.doc.load_snapshot(data.objects);
        self.ui = UiState::default();
    }

    /// Empty document, default view, default UI.
    pub fn reset(&mut self) {
        self.doc.clear();
        self.camera = Camera::default();
        self.ui = UiState::default();
    }

    /// Snapshot of everything a project save needs.
    #[must_use]
    pub fn snapshot(&self) -> ProjectData {
        ProjectData { objects: self.doc.objects().to_vec(), scale: self.camera.scale, offset: self.camera.offset }
    }

    // --- Tool ---

    /// Set the active tool. Any half-drawn wall is discarded.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = vec![Action::ToolChanged(tool)];
        self.ui.tool = tool;
        if !self.ui.temp_points.is_empty() {
            self.ui.temp_points.clear();
            actions.push(Action::DraftChanged(Vec::new()));
        }
        actions
    }

    // --- Input events ---

    /// Handle a click on the stage.
    ///
    /// `on_empty` is true when the click landed on bare canvas rather than on
    /// an object; only the select tool cares.
    pub fn on_click(&mut self, screen_pt: Point, on_empty: bool) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        if !world.is_finite() {
            debug!(x = screen_pt.x, y = screen_pt.y, scale = self.camera.scale, "non-finite click ignored");
            return Vec::new();
        }
        match self.ui.tool {
            Tool::Wall => {
                self.ui.temp_points.push(snap_to_grid(world, GRID_SIZE));
                vec![Action::DraftChanged(self.ui.temp_points.clone())]
            }
            Tool::Door | Tool::Window => self.place_opening(world),
            Tool::Select if on_empty => self.clear_selection(),
            Tool::Select | Tool::Furniture => Vec::new(),
        }
    }

    /// Handle a key press.
    pub fn on_key(&mut self, key: &Key) -> Vec<Action> {
        match key {
            Key::Enter if self.ui.tool == Tool::Wall && self.ui.temp_points.len() >= 2 => self.finish_wall(),
            Key::Escape => {
                self.ui.temp_points.clear();
                self.ui.tool = Tool::Select;
                vec![Action::DraftChanged(Vec::new()), Action::ToolChanged(Tool::Select)]
            }
            Key::Delete => self.delete_selected(),
            _ => Vec::new(),
        }
    }

    // --- Selection ---

    /// Select an object by id. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) -> Vec<Action> {
        if self.doc.get(id).is_none() {
            return Vec::new();
        }
        self.ui.selected_id = Some(id.to_string());
        vec![Action::SelectionChanged(self.ui.selected_id.clone())]
    }

    /// Drop the current selection, if any.
    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.ui.selected_id.take().is_none() {
            return Vec::new();
        }
        vec![Action::SelectionChanged(None)]
    }

    // --- Object edits ---

    /// Commit the final position of a dragged object. Non-finite positions
    /// are ignored.
    pub fn drag_end(&mut self, id: &str, pos: Point) -> Vec<Action> {
        if !pos.is_finite() {
            return Vec::new();
        }
        let fields = PartialEditorObject { x: Some(pos.x), y: Some(pos.y), ..Default::default() };
        self.update(id, fields)
    }

    /// Commit a resize/rotate gesture. The new size is the old size (or
    /// [`FALLBACK_OBJECT_SIZE`]) times the gesture scale, never below
    /// [`MIN_OBJECT_SIZE`]. A gesture with any non-finite component is ignored.
    pub fn transform_end(&mut self, id: &str, t: Transform) -> Vec<Action> {
        if !t.is_finite() {
            return Vec::new();
        }
        let Some(obj) = self.doc.get(id) else {
            return Vec::new();
        };
        let width = (obj.width.unwrap_or(FALLBACK_OBJECT_SIZE) * t.scale_x).max(MIN_OBJECT_SIZE);
        let height = (obj.height.unwrap_or(FALLBACK_OBJECT_SIZE) * t.scale_y).max(MIN_OBJECT_SIZE);
        let fields = PartialEditorObject {
            x: Some(t.x),
            y: Some(t.y),
            width: Some(width),
            height: Some(height),
            rotation: Some(t.rotation),
            ..Default::default()
        };
        self.update(id, fields)
    }

    /// Apply a properties-panel edit to the selected object.
    pub fn update_selected(&mut self, fields: PartialEditorObject) -> Vec<Action> {
        let Some(id) = self.ui.selected_id.clone() else {
            return Vec::new();
        };
        self.update(&id, fields)
    }

    /// Rotate the selected object a quarter turn clockwise.
    pub fn rotate_selected_90(&mut self) -> Vec<Action> {
        let Some(obj) = self.selected() else {
            return Vec::new();
        };
        let rotation = (obj.rotation_or_zero() + 90.0) % 360.0;
        self.update_selected(PartialEditorObject { rotation: Some(rotation), ..Default::default() })
    }

    /// Drop a catalogue item at the default location and select it.
    pub fn add_furniture(&mut self, kind: FurnitureKind) -> Vec<Action> {
        let (width, height) = kind.default_size();
        let obj = EditorObject {
            x: Some(FURNITURE_DROP_X),
            y: Some(FURNITURE_DROP_Y),
            width: Some(width),
            height: Some(height),
            rotation: Some(0.0),
            color: Some(kind.default_color().to_string()),
            furniture_type: Some(kind),
            ..EditorObject::new(self.doc.mint_id(ObjectKind::Furniture), ObjectKind::Furniture)
        };
        self.create_and_select(obj)
    }

    /// Delete the selected object, if any.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id.take() else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if self.doc.remove(&id).is_some() {
            actions.push(Action::ObjectDeleted { id });
        }
        actions.push(Action::SelectionChanged(None));
        actions
    }

    // --- Queries ---

    /// The currently selected object id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.ui.selected_id.as_deref()
    }

    /// The currently selected object, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&EditorObject> {
        self.ui.selected_id.as_deref().and_then(|id| self.doc.get(id))
    }

    /// Look up an object by ID.
    #[must_use]
    pub fn object(&self, id: &str) -> Option<&EditorObject> {
        self.doc.get(id)
    }

    // --- Internals ---

    fn update(&mut self, id: &str, fields: PartialEditorObject) -> Vec<Action> {
        if fields.is_empty() || !self.doc.apply_partial(id, &fields) {
            return Vec::new();
        }
        vec![Action::ObjectUpdated { id: id.to_string(), fields }]
    }

    fn create_and_select(&mut self, obj: EditorObject) -> Vec<Action> {
        let id = obj.id.clone();
        self.doc.insert(obj.clone());
        self.ui.selected_id = Some(id.clone());
        vec![Action::ObjectCreated(obj), Action::SelectionChanged(Some(id))]
    }

    fn place_opening(&mut self, world: Point) -> Vec<Action> {
        let Some(kind) = self.ui.tool.opening_kind() else {
            return Vec::new();
        };
        let Some(snap) = find_nearest_wall(world, self.doc.objects()) else {
            debug!(x = world.x, y = world.y, "no wall near click; opening not placed");
            return Vec::new();
        };
        let (width, color) = match kind {
            ObjectKind::Door => (DOOR_WIDTH, DOOR_COLOR),
            _ => (WINDOW_WIDTH, WINDOW_COLOR),
        };
        let obj = EditorObject {
            x: Some(world.x),
            y: Some(world.y),
            width: Some(width),
            height: Some(WALL_THICKNESS),
            rotation: Some(0.0),
            color: Some(color.to_string()),
            wall_id: Some(snap.wall_id),
            position: Some(snap.position),
            ..EditorObject::new(self.doc.mint_id(kind), kind)
        };
        self.create_and_select(obj)
    }

    fn finish_wall(&mut self) -> Vec<Action> {
        let mut points = std::mem::take(&mut self.ui.temp_points);
        if let Some(&first) = points.first() {
            points.push(first);
        }
        let wall = EditorObject {
            points: Some(points),
            color: Some(WALL_COLOR.to_string()),
            ..EditorObject::new(self.doc.mint_id(ObjectKind::Wall), ObjectKind::Wall)
        };
        self.doc.insert(wall.clone());
        vec![Action::ObjectCreated(wall), Action::DraftChanged(Vec::new())]
    }
}
