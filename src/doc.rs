//! Document model: editor objects, their properties, and the in-memory store.
//!
//! This module defines the data types that describe what is on the canvas
//! (`EditorObject`, `ObjectKind`, `FurnitureKind`), a sparse-update type for
//! property edits (`PartialEditorObject`), and the runtime store that owns all
//! live objects (`DocStore`).
//!
//! Objects arrive here from a loaded project snapshot (JSON deserialization)
//! and from the editor engine (mutations). The store keeps insertion order,
//! which is also the draw order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::camera::Point;

/// Identifier of an editor object, e.g. `"wall-1718000000000"`.
pub type ObjectId = String;

/// The kind of an editor object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Closed polyline of wall segments stored in `points`.
    Wall,
    /// Window mounted on a wall.
    Window,
    /// Door mounted on a wall.
    Door,
    /// Free-standing furniture item.
    Furniture,
    /// Legacy kind found in older snapshots. Loaded and saved, never created.
    Room,
}

impl ObjectKind {
    /// Prefix used when minting ids for this kind.
    #[must_use]
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Window => "window",
            Self::Door => "door",
            Self::Furniture => "furniture",
            Self::Room => "room",
        }
    }

    /// Whether objects of this kind hang on a wall.
    #[must_use]
    pub fn is_opening(self) -> bool {
        matches!(self, Self::Door | Self::Window)
    }
}

/// Furniture catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FurnitureKind {
    Table,
    Sofa,
    Chair,
    Bed,
}

impl FurnitureKind {
    pub const ALL: [FurnitureKind; 4] = [Self::Table, Self::Sofa, Self::Chair, Self::Bed];

    /// Default `(width, height)` for a freshly added item.
    #[must_use]
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Self::Table => (120.0, 120.0),
            Self::Sofa => (200.0, 80.0),
            Self::Chair => (60.0, 60.0),
            Self::Bed => (180.0, 200.0),
        }
    }

    /// Default fill color for a freshly added item.
    #[must_use]
    pub fn default_color(self) -> &'static str {
        match self {
            Self::Table => "#8B4513",
            Self::Sofa => "#B22222",
            Self::Chair => "#654321",
            Self::Bed => "#4A4A4A",
        }
    }
}

/// An editor object as stored in the document and in project snapshots.
///
/// Geometry is optional because each kind uses a different subset: walls
/// carry `points`, everything else carries a center `x`/`y` with a size and
/// rotation. Doors and windows additionally remember the wall they were
/// placed on; nothing keeps that reference valid after the wall is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorObject {
    /// Unique identifier for this object.
    pub id: ObjectId,
    /// Wall, door, window or furniture.
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Wall polyline in world coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    /// Center x in world coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Center y in world coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Clockwise rotation in degrees around the center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Fill (or stroke, for walls) as a CSS color string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furniture_type: Option<FurnitureKind>,
    /// Wall this door or window was placed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_id: Option<ObjectId>,
    /// Projection parameter along the wall segment, in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
}

impl EditorObject {
    /// A bare object of `kind` with every optional field empty.
    #[must_use]
    pub fn new(id: ObjectId, kind: ObjectKind) -> Self {
        Self {
            id,
            kind,
            points: None,
            x: None,
            y: None,
            width: None,
            height: None,
            rotation: None,
            color: None,
            furniture_type: None,
            wall_id: None,
            position: None,
        }
    }

    /// Wall points, or an empty slice for anything without a polyline.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        self.points.as_deref().unwrap_or(&[])
    }

    /// Rotation in degrees, treating an unset rotation as zero.
    #[must_use]
    pub fn rotation_or_zero(&self) -> f64 {
        self.rotation.unwrap_or(0.0)
    }
}

/// Sparse update for an editor object. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialEditorObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub furniture_type: Option<FurnitureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wall_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
}

impl PartialEditorObject {
    /// Whether the update carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// In-memory, ordered store of editor objects.
pub struct DocStore {
    objects: Vec<EditorObject>,
    last_id_millis: u128,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { objects: Vec::new(), last_id_millis: 0 }
    }

    /// Mint an id of the form `<prefix>-<millis>`.
    ///
    /// The millisecond stamp is bumped past the previous one so that two
    /// objects created within the same millisecond still get distinct ids.
    pub fn mint_id(&mut self, kind: ObjectKind) -> ObjectId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        let stamp = now.max(self.last_id_millis + 1);
        self.last_id_millis = stamp;
        format!("{}-{stamp}", kind.id_prefix())
    }

    /// Append an object. If an object with the same `id` already exists it is
    /// replaced in place, keeping its draw position.
    pub fn insert(&mut self, obj: EditorObject) {
        if let Some(existing) = self.objects.iter_mut().find(|o| o.id == obj.id) {
            *existing = obj;
        } else {
            self.objects.push(obj);
        }
    }

    /// Remove an object by id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<EditorObject> {
        let idx = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(idx))
    }

    /// Return a reference to an object by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EditorObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Apply a partial update to an existing object. Returns false if the object doesn't exist.
    pub fn apply_partial(&mut self, id: &str, partial: &PartialEditorObject) -> bool {
        let Some(obj) = self.objects.iter_mut().find(|o| o.id == id) else {
            return false;
        };
        if let Some(ref points) = partial.points {
            obj.points = Some(points.clone());
        }
        if let Some(x) = partial.x {
            obj.x = Some(x);
        }
        if let Some(y) = partial.y {
            obj.y = Some(y);
        }
        if let Some(w) = partial.width {
            obj.width = Some(w);
        }
        if let Some(h) = partial.height {
            obj.height = Some(h);
        }
        if let Some(r) = partial.rotation {
            obj.rotation = Some(r);
        }
        if let Some(ref color) = partial.color {
            obj.color = Some(color.clone());
        }
        if let Some(furniture) = partial.furniture_type {
            obj.furniture_type = Some(furniture);
        }
        if let Some(ref wall_id) = partial.wall_id {
            obj.wall_id = Some(wall_id.clone());
        }
        if let Some(position) = partial.position {
            obj.position = Some(position);
        }
        true
    }

    /// Replace all objects with a full snapshot.
    pub fn load_snapshot(&mut self, objects: Vec<EditorObject>) {
        self.objects = objects;
    }

    /// All objects in draw order.
    #[must_use]
    pub fn objects(&self) -> &[EditorObject] {
        &self.objects
    }

    /// Iterate over wall objects only.
    pub fn walls(&self) -> impl Iterator<Item = &EditorObject> {
        self.objects.iter().filter(|o| o.kind == ObjectKind::Wall)
    }

    /// Number of objects currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store contains no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}
