//! In-process project table.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ProjectStore, StoreError};
use crate::project::{NewProject, Project, ProjectId, ProjectPatch, now_rfc3339};

struct Row {
    /// Bumped on every write; orders `list` without relying on clock resolution.
    touched: u64,
    project: Project,
}

#[derive(Default)]
struct Table {
    rows: HashMap<ProjectId, Row>,
    clock: u64,
}

impl Table {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// A `ProjectStore` held entirely in memory.
#[derive(Default)]
pub struct MemoryProjectStore {
    table: RwLock<Table>,
}

impl MemoryProjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored projects.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether the table is empty.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }
}

#[async_trait::async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn insert(&self, project: &NewProject) -> Result<Project, StoreError> {
        let now = now_rfc3339();
        let row = Project {
            id: Uuid::new_v4().to_string(),
            name: project.name.clone(),
            created_at: now.clone(),
            updated_at: now,
            data: project.data.clone(),
        };
        let mut table = self.table.write().await;
        let touched = table.tick();
        table.rows.insert(row.id.clone(), Row { touched, project: row.clone() });
        Ok(row)
    }

    async fn update(&self, id: &str, patch: &ProjectPatch) -> Result<Option<Project>, StoreError> {
        let mut table = self.table.write().await;
        let touched = table.tick();
        let Some(row) = table.rows.get_mut(id) else {
            return Ok(None);
        };
        if let Some(ref name) = patch.name {
            row.project.name.clone_from(name);
        }
        if let Some(ref data) = patch.data {
            row.project.data = data.clone();
        }
        row.project.updated_at = now_rfc3339();
        row.touched = touched;
        Ok(Some(row.project.clone()))
    }

    async fn get(&self, id: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.table.read().await.rows.get(id).map(|r| r.project.clone()))
    }

    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        let table = self.table.read().await;
        let mut rows: Vec<&Row> = table.rows.values().collect();
        rows.sort_by(|a, b| b.touched.cmp(&a.touched));
        Ok(rows.into_iter().map(|r| r.project.clone()).collect())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.table.write().await.rows.remove(id);
        Ok(())
    }
}
