//! Project store: CRUD against the hosted `projects` table.
//!
//! DESIGN
//! ======
//! `ProjectStore` is the seam between the editor and the backend. The REST
//! implementation talks to the hosted database's HTTP surface; the memory
//! implementation backs offline mode and tests.
//!
//! ERROR HANDLING
//! ==============
//! Store methods return typed `StoreError`s. The free functions at the bottom
//! of this module are what the editor calls: they log the failure and hand
//! back an empty value (`None`, empty list, `false`) so the UI can treat "no
//! data" as a normal state.

pub mod memory;
pub mod rest;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use tracing::error;

use crate::project::{NewProject, Project, ProjectPatch};

pub use memory::MemoryProjectStore;
pub use rest::RestProjectStore;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by project store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request could not be sent or its body not read.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// A write that should echo the row back returned nothing.
    #[error("backend returned no row")]
    EmptyResponse,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl StoreError {
    /// Whether retrying the same call could plausibly succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// CRUD over the projects table. Enables swapping the backend in tests.
#[async_trait::async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert a new project and return the stored row.
    async fn insert(&self, project: &NewProject) -> Result<Project, StoreError>;

    /// Update a project by id. `Ok(None)` means no row had that id.
    async fn update(&self, id: &str, patch: &ProjectPatch) -> Result<Option<Project>, StoreError>;

    /// Fetch a project by id.
    async fn get(&self, id: &str) -> Result<Option<Project>, StoreError>;

    /// All projects, most recently updated first.
    async fn list(&self) -> Result<Vec<Project>, StoreError>;

    /// Delete a project by id. Deleting a missing id is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

// =============================================================================
// FALLBACK FACADE
// =============================================================================

/// Insert a project, or `None` on failure.
pub async fn save_project<S: ProjectStore + ?Sized>(store: &S, project: &NewProject) -> Option<Project> {
    match store.insert(project).await {
        Ok(row) => Some(row),
        Err(e) => {
            error!(error = %e, name = %project.name, "error saving project");
            None
        }
    }
}

/// Update a project, or `None` on failure or when the id is unknown.
pub async fn update_project<S: ProjectStore + ?Sized>(store: &S, id: &str, patch: &ProjectPatch) -> Option<Project> {
    match store.update(id, patch).await {
        Ok(row) => row,
        Err(e) => {
            error!(error = %e, %id, "error updating project");
            None
        }
    }
}

/// Load one project, or `None` on failure or when the id is unknown.
pub async fn load_project<S: ProjectStore + ?Sized>(store: &S, id: &str) -> Option<Project> {
    match store.get(id).await {
        Ok(row) => row,
        Err(e) => {
            error!(error = %e, %id, "error loading project");
            None
        }
    }
}

/// Load every project, most recent first, or an empty list on failure.
pub async fn load_all_projects<S: ProjectStore + ?Sized>(store: &S) -> Vec<Project> {
    match store.list().await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "error loading projects");
            Vec::new()
        }
    }
}

/// Delete a project. Returns `false` on failure.
pub async fn delete_project<S: ProjectStore + ?Sized>(store: &S, id: &str) -> bool {
    match store.delete(id).await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, %id, "error deleting project");
            false
        }
    }
}
