//! `RestProjectStore` against an in-process fake of the hosted REST surface.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use roomplan::config::StoreConfig;
use roomplan::doc::FurnitureKind;
use roomplan::project::{NewProject, ProjectData, ProjectPatch};
use roomplan::services::session::EditorSession;
use roomplan::store::{
    ProjectStore, RestProjectStore, StoreError, load_all_projects, load_project, save_project,
};
use serde_json::{Value, json};

const KEY: &str = "anon-key";

// =========================================================================
// Fake backend
// =========================================================================

#[derive(Default)]
struct Table {
    /// (write sequence, row)
    rows: Vec<(u64, Value)>,
    seq: u64,
}

type Shared = Arc<Mutex<Table>>;

fn authorized(headers: &HeaderMap) -> bool {
    let bearer = format!("Bearer {KEY}");
    headers.get("apikey").is_some_and(|v| v == KEY)
        && headers.get(AUTHORIZATION).is_some_and(|v| v == bearer.as_str())
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid API key" }))).into_response()
}

fn wants_row_back(headers: &HeaderMap) -> bool {
    headers.get("prefer").is_some_and(|v| v == "return=representation")
}

fn id_filter(q: &HashMap<String, String>) -> Option<String> {
    q.get("id").and_then(|f| f.strip_prefix("eq.")).map(str::to_owned)
}

async fn select(State(table): State<Shared>, headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let table = table.lock().unwrap();
    let mut rows: Vec<&(u64, Value)> = match id_filter(&q) {
        Some(id) => table.rows.iter().filter(|(_, r)| r["id"] == id.as_str()).collect(),
        None => table.rows.iter().collect(),
    };
    if q.get("order").map(String::as_str) == Some("updated_at.desc") {
        rows.sort_by(|a, b| b.0.cmp(&a.0));
    }
    Json(Value::Array(rows.into_iter().map(|(_, r)| r.clone()).collect())).into_response()
}

async fn insert(State(table): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut table = table.lock().unwrap();
    table.seq += 1;
    let row = json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "name": body["name"],
        "created_at": body["updated_at"],
        "updated_at": body["updated_at"],
        "data": body["data"],
    });
    let seq = table.seq;
    table.rows.push((seq, row.clone()));
    if wants_row_back(&headers) {
        (StatusCode::CREATED, Json(json!([row]))).into_response()
    } else {
        StatusCode::CREATED.into_response()
    }
}

async fn update(
    State(table): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut table = table.lock().unwrap();
    table.seq += 1;
    let seq = table.seq;
    let id = id_filter(&q).unwrap_or_default();
    let mut changed = Vec::new();
    for (row_seq, row) in &mut table.rows {
        if row["id"] != id.as_str() {
            continue;
        }
        for (k, v) in body.as_object().unwrap() {
            row[k] = v.clone();
        }
        *row_seq = seq;
        changed.push(row.clone());
    }
    Json(Value::Array(changed)).into_response()
}

async fn remove(State(table): State<Shared>, headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let id = id_filter(&q).unwrap_or_default();
    table.lock().unwrap().rows.retain(|(_, r)| r["id"] != id.as_str());
    StatusCode::NO_CONTENT.into_response()
}

async fn spawn_backend() -> (String, Shared) {
    let table = Shared::default();
    let app = Router::new()
        .route("/rest/v1/projects", get(select).post(insert).patch(update).delete(remove))
        .with_state(table.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), table)
}

fn client(url: &str, key: &str) -> RestProjectStore {
    RestProjectStore::new(&StoreConfig::new(url, key).unwrap()).unwrap()
}

fn new_project(name: &str) -> NewProject {
    NewProject { name: name.into(), data: ProjectData::default() }
}

// =========================================================================
// CRUD
// =========================================================================

#[tokio::test]
async fn insert_get_update_list_delete() {
    let (url, _table) = spawn_backend().await;
    let store = client(&url, KEY);

    let kitchen = store.insert(&new_project("Kitchen")).await.unwrap();
    assert_eq!(kitchen.name, "Kitchen");
    assert!(!kitchen.id.is_empty());
    assert!(!kitchen.updated_at.is_empty());

    let fetched = store.get(&kitchen.id).await.unwrap().unwrap();
    assert_eq!(fetched, kitchen);

    let study = store.insert(&new_project("Study")).await.unwrap();
    let renamed = store
        .update(&kitchen.id, &ProjectPatch { name: Some("Galley".into()), data: None })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Galley");
    assert_eq!(renamed.data, ProjectData::default());

    let names: Vec<String> = store.list().await.unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["Galley", "Study"]);

    store.delete(&study.id).await.unwrap();
    assert!(store.get(&study.id).await.unwrap().is_none());
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_unknown_id_is_none() {
    let (url, _table) = spawn_backend().await;
    let store = client(&url, KEY);
    let patch = ProjectPatch { name: Some("x".into()), data: None };
    assert!(store.update("nope", &patch).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_unknown_id_is_ok() {
    let (url, _table) = spawn_backend().await;
    assert!(client(&url, KEY).delete("nope").await.is_ok());
}

#[tokio::test]
async fn null_data_loads_as_empty_snapshot() {
    let (url, table) = spawn_backend().await;
    table.lock().unwrap().rows.push((
        1,
        json!({
            "id": "legacy",
            "name": "Old",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
            "data": null
        }),
    ));
    let row = client(&url, KEY).get("legacy").await.unwrap().unwrap();
    assert!(row.data.objects.is_empty());
    assert_eq!(row.summary(), "0 objects • Last updated: 2024-05-01 10:00");
}

#[tokio::test]
async fn unreadable_row_does_not_hide_the_others() {
    let (url, table) = spawn_backend().await;
    let store = client(&url, KEY);
    let good = store.insert(&new_project("Kitchen")).await.unwrap();
    table.lock().unwrap().rows.push((
        99,
        json!({
            "id": "future",
            "name": "Loft",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
            "data": { "objects": [{ "id": "stairs-1", "type": "stairs" }] }
        }),
    ));

    let listed = load_all_projects(&store).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, good.id);
    assert!(load_project(&store, "future").await.is_none());
}

// =========================================================================
// Failures
// =========================================================================

#[tokio::test]
async fn bad_key_is_status_error() {
    let (url, _table) = spawn_backend().await;
    let store = client(&url, "wrong");
    match store.list().await {
        Err(StoreError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected 401, got {other:?}"),
    }
}

#[tokio::test]
async fn facade_falls_back_on_bad_key() {
    let (url, _table) = spawn_backend().await;
    let store = client(&url, "wrong");
    assert!(save_project(&store, &new_project("x")).await.is_none());
    assert!(load_project(&store, "x").await.is_none());
    assert!(load_all_projects(&store).await.is_empty());
}

#[tokio::test]
async fn unreachable_backend_is_retryable_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"), KEY).list().await.unwrap_err();
    assert!(matches!(err, StoreError::Request(_)));
    assert!(err.retryable());
}

// =========================================================================
// Session over REST
// =========================================================================

#[tokio::test]
async fn session_save_then_reopen() {
    let (url, _table) = spawn_backend().await;
    let store: Arc<dyn ProjectStore> = Arc::new(client(&url, KEY));

    let mut session = EditorSession::new(store.clone());
    session.rename("Bedroom");
    session.edit(|core| core.add_furniture(FurnitureKind::Bed));
    let first = session.save().await.unwrap();

    session.edit(|core| core.add_furniture(FurnitureKind::Chair));
    let second = session.save().await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.data.objects.len(), 2);

    let mut other = EditorSession::new(store);
    assert!(other.open(&first.id).await);
    assert_eq!(other.project_name(), "Bedroom");
    assert_eq!(other.engine().doc.len(), 2);
    assert_eq!(other.list().await.len(), 1);
}
