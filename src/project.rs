//! Project records as stored in the hosted `projects` table.
//!
//! A project is a name plus a wholesale snapshot of the editor document
//! (`ProjectData`). There is no incremental diffing: every save writes the
//! full object list.

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::camera::{Camera, Point};
use crate::doc::EditorObject;

/// Identifier assigned by the backend.
pub type ProjectId = String;

/// Editor snapshot nested inside a project row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    #[serde(default)]
    pub objects: Vec<EditorObject>,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub offset: Point,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for ProjectData {
    fn default() -> Self {
        Self { objects: Vec::new(), scale: default_scale(), offset: Point::default() }
    }
}

impl ProjectData {
    /// The view stored in this snapshot. A zero, negative or non-finite scale
    /// falls back to 1.
    #[must_use]
    pub fn camera(&self) -> Camera {
        let camera = Camera::new(self.offset, self.scale);
        if camera.is_valid() { camera } else { Camera::new(self.offset, default_scale()) }
    }
}

/// A full project row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: ProjectData,
}

impl Project {
    /// One-line description for project listings: object count and last update.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} objects • Last updated: {}",
            self.data.objects.len(),
            format_timestamp(&self.updated_at)
        )
    }
}

/// Body of an insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub data: ProjectData,
}

/// Body of an update. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ProjectData>,
}

impl ProjectPatch {
    /// Patch that rewrites both name and snapshot, as a save does.
    #[must_use]
    pub fn full(name: impl Into<String>, data: ProjectData) -> Self {
        Self { name: Some(name.into()), data: Some(data) }
    }
}

fn null_as_default<'de, D>(deserializer: D) -> Result<ProjectData, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ProjectData>::deserialize(deserializer)?.unwrap_or_default())
}

/// Current UTC time as an RFC 3339 string.
#[must_use]
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

/// Render an RFC 3339 timestamp as `YYYY-MM-DD HH:MM` (UTC). Unparseable
/// input is returned unchanged.
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(dt) => {
            let dt = dt.to_offset(time::UtcOffset::UTC);
            format!(
                "{:04}-{:02}-{:02} {:02}:{:02}",
                dt.year(),
                u8::from(dt.month()),
                dt.day(),
                dt.hour(),
                dt.minute()
            )
        }
        Err(_) => raw.to_string(),
    }
}
