use super::*;
use crate::project::ProjectData;

// =========================================================================
// FailingStore
// =========================================================================

struct FailingStore;

#[async_trait::async_trait]
impl ProjectStore for FailingStore {
    async fn insert(&self, _project: &NewProject) -> Result<Project, StoreError> {
        Err(StoreError::Status { status: 500, body: "boom".into() })
    }

    async fn update(&self, _id: &str, _patch: &ProjectPatch) -> Result<Option<Project>, StoreError> {
        Err(StoreError::Request("connection refused".into()))
    }

    async fn get(&self, _id: &str) -> Result<Option<Project>, StoreError> {
        Err(StoreError::Parse("bad json".into()))
    }

    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        Err(StoreError::Status { status: 401, body: "unauthorized".into() })
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Request("timeout".into()))
    }
}

fn new_project(name: &str) -> NewProject {
    NewProject { name: name.into(), data: ProjectData::default() }
}

// =========================================================================
// Fallbacks
// =========================================================================

#[tokio::test]
async fn failures_become_empty_values() {
    let store = FailingStore;
    assert!(save_project(&store, &new_project("x")).await.is_none());
    assert!(update_project(&store, "id", &ProjectPatch::default()).await.is_none());
    assert!(load_project(&store, "id").await.is_none());
    assert!(load_all_projects(&store).await.is_empty());
    assert!(!delete_project(&store, "id").await);
}

#[tokio::test]
async fn successes_pass_through() {
    let store = MemoryProjectStore::new();
    let row = save_project(&store, &new_project("Kitchen")).await.unwrap();
    assert_eq!(load_project(&store, &row.id).await, Some(row.clone()));

    let patch = ProjectPatch { name: Some("Galley".into()), data: None };
    let updated = update_project(&store, &row.id, &patch).await.unwrap();
    assert_eq!(updated.name, "Galley");

    assert_eq!(load_all_projects(&store).await.len(), 1);
    assert!(delete_project(&store, &row.id).await);
    assert!(load_project(&store, &row.id).await.is_none());
}

#[tokio::test]
async fn facade_accepts_trait_objects() {
    let store: Box<dyn ProjectStore> = Box::new(MemoryProjectStore::new());
    assert!(save_project(store.as_ref(), &new_project("dyn")).await.is_some());
}

// =========================================================================
// StoreError
// =========================================================================

#[test]
fn retryable_classification() {
    assert!(StoreError::Request("x".into()).retryable());
    assert!(StoreError::Status { status: 503, body: String::new() }.retryable());
    assert!(StoreError::Status { status: 429, body: String::new() }.retryable());
    assert!(!StoreError::Status { status: 404, body: String::new() }.retryable());
    assert!(!StoreError::Parse("x".into()).retryable());
    assert!(!StoreError::EmptyResponse.retryable());
}

#[test]
fn error_messages_are_descriptive() {
    let e = StoreError::Status { status: 401, body: "no".into() };
    assert_eq!(e.to_string(), "backend returned status 401: no");
}
