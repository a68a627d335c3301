//! Session service: the open project and its lifecycle.
//!
//! DESIGN
//! ======
//! `EditorSession` ties the editor engine to the project store. It knows which
//! project is open (if any), its name, and whether there are unsaved edits.
//! All document edits go through [`EditorSession::edit`] so that dirty
//! tracking and autosave scheduling cannot be skipped.
//!
//! A project that has never been saved has no id and is never autosaved; the
//! first explicit save inserts it and adopts the returned row.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::camera::Camera;
use crate::consts::UNTITLED_PROJECT;
use crate::engine::{Action, EngineCore};
use crate::project::{NewProject, Project, ProjectData, ProjectId, ProjectPatch};
use crate::services::autosave::{AutosaveJob, Autosaver, SaveTracker};
use crate::store::{ProjectStore, delete_project, load_all_projects, load_project, save_project, update_project};

pub struct EditorSession {
    engine: EngineCore,
    store: Arc<dyn ProjectStore>,
    tracker: Arc<SaveTracker>,
    autosaver: Option<Autosaver>,
    project_id: Option<ProjectId>,
    project_name: String,
}

impl EditorSession {
    /// A session with an empty, untitled project and no autosave.
    #[must_use]
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self {
            engine: EngineCore::new(),
            store,
            tracker: Arc::new(SaveTracker::new()),
            autosaver: None,
            project_id: None,
            project_name: UNTITLED_PROJECT.to_string(),
        }
    }

    /// A session that autosaves `delay` after the last edit. Must be called
    /// inside a tokio runtime.
    #[must_use]
    pub fn with_autosave(store: Arc<dyn ProjectStore>, delay: Duration) -> Self {
        let mut session = Self::new(store);
        session.autosaver = Some(Autosaver::spawn(session.store.clone(), session.tracker.clone(), delay));
        session
    }

    // --- Queries ---

    #[must_use]
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.tracker.has_unsaved_changes()
    }

    /// The snapshot a save would write right now.
    #[must_use]
    pub fn snapshot(&self) -> ProjectData {
        self.engine.snapshot()
    }

    // --- Edits ---

    /// Run an engine operation. If it changed the document the project is
    /// marked dirty and an autosave is scheduled.
    pub fn edit<F>(&mut self, f: F) -> Vec<Action>
    where
        F: FnOnce(&mut EngineCore) -> Vec<Action>,
    {
        let actions = f(&mut self.engine);
        if actions.iter().any(Action::mutates_document) {
            self.changed();
        }
        actions
    }

    /// Change the stored view. Scale and offset are part of the snapshot, so
    /// this counts as an edit.
    ///
    /// A camera with a zero, negative or non-finite scale (or a non-finite
    /// offset) is refused and the current view kept; returns whether the
    /// camera was accepted.
    pub fn set_camera(&mut self, camera: Camera) -> bool {
        if !camera.is_valid() {
            warn!(scale = camera.scale, x = camera.offset.x, y = camera.offset.y, "invalid camera refused");
            return false;
        }
        if self.engine.camera != camera {
            self.engine.camera = camera;
            self.changed();
        }
        true
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.project_name = name.into();
        self.changed();
    }

    // --- Project lifecycle ---

    /// Save the open project: update it if it has an id, otherwise insert it
    /// and adopt the new row. Returns the stored row, or `None` on failure.
    pub async fn save(&mut self) -> Option<Project> {
        let revision = self.tracker.revision();
        let data = self.engine.snapshot();
        if let Some(ref id) = self.project_id {
            let patch = ProjectPatch::full(self.project_name.clone(), data);
            let row = update_project(self.store.as_ref(), id, &patch).await?;
            self.tracker.mark_saved(revision);
            if let Some(ref saver) = self.autosaver {
                saver.cancel();
            }
            return Some(row);
        }

        let row = save_project(self.store.as_ref(), &NewProject { name: self.project_name.clone(), data }).await?;
        info!(id = %row.id, name = %row.name, "project created");
        self.load(row.clone());
        Some(row)
    }

    /// Replace the session with `project`.
    pub fn load(&mut self, project: Project) {
        if let Some(ref saver) = self.autosaver {
            saver.cancel();
        }
        self.engine.load_project_data(project.data);
        self.project_id = Some(project.id);
        self.project_name = project.name;
        self.tracker.mark_clean();
    }

    /// Fetch a project by id and load it. Returns false if it could not be loaded.
    pub async fn open(&mut self, id: &str) -> bool {
        match load_project(self.store.as_ref(), id).await {
            Some(project) => {
                self.load(project);
                true
            }
            None => false,
        }
    }

    /// Start a fresh untitled project.
    ///
    /// Refuses (returning false) when there are unsaved changes unless
    /// `discard_unsaved` is set.
    pub fn new_project(&mut self, discard_unsaved: bool) -> bool {
        if self.has_unsaved_changes() && !discard_unsaved {
            warn!(name = %self.project_name, "unsaved changes; new project refused");
            return false;
        }
        if let Some(ref saver) = self.autosaver {
            saver.cancel();
        }
        self.engine.reset();
        self.project_id = None;
        self.project_name = UNTITLED_PROJECT.to_string();
        self.tracker.mark_clean();
        true
    }

    /// Delete a project. Deleting the open project resets the session; a
    /// failed delete leaves it, and its unsaved edits, in place.
    pub async fn delete(&mut self, id: &str) -> bool {
        let deleted = delete_project(self.store.as_ref(), id).await;
        if deleted && self.project_id.as_deref() == Some(id) {
            self.new_project(true);
        }
        deleted
    }

    /// All projects, most recent first.
    pub async fn list(&self) -> Vec<Project> {
        load_all_projects(self.store.as_ref()).await
    }

    /// Write any pending autosave now.
    pub async fn flush(&self) {
        if let Some(ref saver) = self.autosaver {
            saver.flush().await;
        }
    }

    /// Flush pending autosave and stop the autosave task.
    pub async fn shutdown(mut self) {
        if let Some(saver) = self.autosaver.take() {
            saver.shutdown().await;
        }
    }

    // --- Internals ---

    fn changed(&self) {
        let revision = self.tracker.mark_dirty();
        let (Some(saver), Some(id)) = (&self.autosaver, &self.project_id) else {
            return;
        };
        saver.touch(AutosaveJob {
            project_id: id.clone(),
            patch: ProjectPatch::full(self.project_name.clone(), self.engine.snapshot()),
            revision,
        });
    }
}
