//! REST client for the hosted projects table.
//!
//! Speaks the PostgREST dialect the hosted database exposes: filters go in
//! the query string (`id=eq.<id>`), writes ask for the row back with
//! `Prefer: return=representation`, and every response body is a JSON array.
//! Body parsing lives in pure functions for testability.

#[cfg(test)]
#[path = "rest_test.rs"]
mod rest_test;

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ProjectStore, StoreError};
use crate::config::StoreConfig;
use crate::project::{NewProject, Project, ProjectData, ProjectPatch, now_rfc3339};

const PREFER_REPRESENTATION: &str = "return=representation";

// =============================================================================
// CLIENT
// =============================================================================

pub struct RestProjectStore {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RestProjectStore {
    /// Build a client from store config.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::HttpClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| StoreError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: config.table_url(), api_key: config.api_key.clone() })
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key).bearer_auth(&self.api_key)
    }

    async fn send(&self, req: RequestBuilder) -> Result<String, StoreError> {
        let response = self
            .authed(req)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl ProjectStore for RestProjectStore {
    async fn insert(&self, project: &NewProject) -> Result<Project, StoreError> {
        let body = InsertBody { name: &project.name, data: &project.data, updated_at: now_rfc3339() };
        let req = self
            .http
            .post(&self.endpoint)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&body);
        let text = self.send(req).await?;
        let row = parse_maybe_single(&text)?.ok_or(StoreError::EmptyResponse)?;
        debug!(id = %row.id, "project inserted");
        Ok(row)
    }

    async fn update(&self, id: &str, patch: &ProjectPatch) -> Result<Option<Project>, StoreError> {
        let body = UpdateBody { patch, updated_at: now_rfc3339() };
        let req = self
            .http
            .patch(&self.endpoint)
            .query(&[("id", eq(id))])
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&body);
        let text = self.send(req).await?;
        parse_maybe_single(&text)
    }

    async fn get(&self, id: &str) -> Result<Option<Project>, StoreError> {
        let req = self
            .http
            .get(&self.endpoint)
            .query(&[("select", "*".to_string()), ("id", eq(id))]);
        let text = self.send(req).await?;
        parse_maybe_single(&text)
    }

    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        let req = self
            .http
            .get(&self.endpoint)
            .query(&[("select", "*"), ("order", "updated_at.desc")]);
        let text = self.send(req).await?;
        parse_rows(&text)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let req = self.http.delete(&self.endpoint).query(&[("id", eq(id))]);
        self.send(req).await?;
        Ok(())
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct InsertBody<'a> {
    name: &'a str,
    data: &'a ProjectData,
    updated_at: String,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    #[serde(flatten)]
    patch: &'a ProjectPatch,
    updated_at: String,
}

fn eq(id: &str) -> String {
    format!("eq.{id}")
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a response body holding an array of rows. An empty body counts as
/// no rows. A row that does not decode as a project (an unknown object kind
/// in its snapshot, say) is logged and skipped so the rest stay listed.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] if the body is not a JSON array.
pub fn parse_rows(body: &str) -> Result<Vec<Project>, StoreError> {
    let rows = parse_array(body)?
        .into_iter()
        .filter_map(|raw| {
            let id = raw.get("id").and_then(Value::as_str).unwrap_or("?").to_string();
            match serde_json::from_value::<Project>(raw) {
                Ok(project) => Some(project),
                Err(e) => {
                    warn!(%id, error = %e, "skipping unreadable project row");
                    None
                }
            }
        })
        .collect();
    Ok(rows)
}

/// Parse a response expected to hold zero or one row.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] on malformed JSON, when more than one row
/// came back, or when the row does not decode as a project.
pub fn parse_maybe_single(body: &str) -> Result<Option<Project>, StoreError> {
    let mut rows = parse_array(body)?;
    if rows.len() > 1 {
        return Err(StoreError::Parse(format!("expected at most one row, got {}", rows.len())));
    }
    rows.pop()
        .map(|raw| serde_json::from_value(raw).map_err(|e| StoreError::Parse(e.to_string())))
        .transpose()
}

fn parse_array(body: &str) -> Result<Vec<Value>, StoreError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body).map_err(|e| StoreError::Parse(e.to_string()))
}
