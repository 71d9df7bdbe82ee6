//! In-process fakes for both spreadsheet backends.
//!
//! Each fake serves the wire protocol over a real TCP port and keeps its
//! state as a raw cell grid, so tests can assert on physical rows as well
//! as on what the store decodes. `FakeSheet::park_next_put` lets a test
//! freeze one overwrite between the store's scan and its write, which is
//! how the derived-index race is reproduced deterministically.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::Notify;

use sheetnotes::schema;
use sheetnotes::Note;

pub const SHEET_NAME: &str = "Notlar";
pub const FAKE_SHEET_ID: i64 = 7;

#[derive(Clone, Default)]
pub struct FakeSheet {
    rows: Arc<Mutex<Vec<Vec<String>>>>,
    writes: Arc<AtomicUsize>,
    hold_put: Arc<AtomicBool>,
    put_parked: Arc<AtomicBool>,
    put_release: Arc<Notify>,
}

impl FakeSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(rows: Vec<Vec<String>>) -> Self {
        let sheet = Self::default();
        *sheet.rows.lock().unwrap() = rows;
        sheet
    }

    pub fn snapshot(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }

    /// Mutating calls served so far (append, overwrite, row deletion).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Hold the next overwrite until `release_put`, leaving its caller
    /// parked mid-operation.
    pub fn park_next_put(&self) {
        self.hold_put.store(true, Ordering::SeqCst);
    }

    pub async fn wait_for_parked_put(&self) {
        while !self.put_parked.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    pub fn release_put(&self) {
        self.put_release.notify_one();
    }
}

/// Deterministic note for seeding and assertions.
pub fn note(id: &str, title: &str) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: format!("{} content", title),
        category: "Genel".to_string(),
        tags: String::new(),
        created_at: "2025-01-01T00:00:00+00:00".to_string(),
        updated_at: "2025-01-01T00:00:00+00:00".to_string(),
        is_pinned: "false".to_string(),
    }
}

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Bind an ephemeral port, serve the router in the background, and return
/// the base URL.
pub async fn spawn(router: Router) -> String {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Every request fails with HTTP 500.
pub fn failing_router() -> Router {
    Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR })
}

/// Every request succeeds at the HTTP level but reports a backend error.
pub fn backend_error_router(message: &'static str) -> Router {
    Router::new().fallback(move || async move { Json(json!({ "error": message })) })
}

// ── Apps Script fake ────────────────────────────────────

pub fn apps_script_router(sheet: FakeSheet) -> Router {
    Router::new()
        .route("/", get(exec_get).post(exec_post))
        .with_state(sheet)
}

async fn exec_get(
    State(sheet): State<FakeSheet>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    match params.get("action").map(String::as_str) {
        Some("getAllNotes") => {
            let rows = sheet.rows.lock().unwrap();
            let notes: Vec<Value> = rows
                .iter()
                .skip(1)
                .filter(|cells| cells.first().map_or(false, |c| !c.is_empty()))
                .map(|cells| note_json(cells))
                .collect();
            Json(json!({ "notes": notes }))
        }
        Some("testConnection") => Json(json!({ "success": true })),
        other => Json(json!({ "error": format!("unknown action: {:?}", other) })),
    }
}

async fn exec_post(State(sheet): State<FakeSheet>, Json(body): Json<Value>) -> Json<Value> {
    let action = body["action"].as_str().unwrap_or("");
    let mut rows = sheet.rows.lock().unwrap();
    match action {
        "addNote" => {
            rows.push(note_row(&body["note"]));
            sheet.writes.fetch_add(1, Ordering::SeqCst);
            Json(json!({ "success": true }))
        }
        "updateNote" => {
            let id = body["noteId"].as_str().unwrap_or("");
            match find_data_row(&rows, id) {
                Some(index) => {
                    rows[index] = note_row(&body["note"]);
                    sheet.writes.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "success": true }))
                }
                None => Json(json!({ "success": false })),
            }
        }
        "deleteNote" => {
            let id = body["noteId"].as_str().unwrap_or("");
            match find_data_row(&rows, id) {
                Some(index) => {
                    rows.remove(index);
                    sheet.writes.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "success": true }))
                }
                None => Json(json!({ "success": false })),
            }
        }
        "initializeSheet" => {
            let valid = rows.first().map_or(false, |r| schema::header_is_valid(r));
            if !valid {
                if rows.is_empty() {
                    rows.push(schema::header_row());
                } else {
                    rows[0] = schema::header_row();
                }
                sheet.writes.fetch_add(1, Ordering::SeqCst);
            }
            Json(json!({ "success": true }))
        }
        other => Json(json!({ "error": format!("unknown action: {}", other) })),
    }
}

fn find_data_row(rows: &[Vec<String>], id: &str) -> Option<usize> {
    rows.iter()
        .enumerate()
        .skip(1)
        .find(|(_, cells)| cells.first().map(String::as_str) == Some(id))
        .map(|(index, _)| index)
}

fn note_json(cells: &[String]) -> Value {
    let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
    json!({
        "id": cell(0),
        "title": cell(1),
        "content": cell(2),
        "category": cell(3),
        "tags": cell(4),
        "createdAt": cell(5),
        "updatedAt": cell(6),
        "isPinned": cell(7),
    })
}

fn note_row(note: &Value) -> Vec<String> {
    [
        "id", "title", "content", "category", "tags", "createdAt", "updatedAt", "isPinned",
    ]
    .iter()
    .map(|key| note[key].as_str().unwrap_or_default().to_string())
    .collect()
}

// ── Sheets REST fake ────────────────────────────────────

pub fn sheets_api_router(sheet: FakeSheet) -> Router {
    Router::new()
        .route(
            "/v4/spreadsheets/{sid}",
            get(spreadsheet_get).post(spreadsheet_post),
        )
        .route(
            "/v4/spreadsheets/{sid}/values/{range}",
            get(values_get).post(values_post).put(values_put),
        )
        .with_state(sheet)
}

async fn spreadsheet_get(Path(sid): Path<String>) -> Json<Value> {
    Json(json!({
        "spreadsheetId": sid,
        "sheets": [
            { "properties": { "sheetId": FAKE_SHEET_ID, "title": SHEET_NAME } }
        ]
    }))
}

/// Handles `POST /v4/spreadsheets/{id}:batchUpdate`; the verb rides in the
/// final path segment.
async fn spreadsheet_post(
    State(sheet): State<FakeSheet>,
    Path(sid): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !sid.ends_with(":batchUpdate") {
        return (StatusCode::BAD_REQUEST, Json(json!({})));
    }

    let range = &body["requests"][0]["deleteDimension"]["range"];
    let start = range["startIndex"].as_u64().unwrap_or(0) as usize;

    let mut rows = sheet.rows.lock().unwrap();
    if start >= rows.len() {
        return (StatusCode::BAD_REQUEST, Json(json!({})));
    }
    rows.remove(start);
    sheet.writes.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, Json(json!({})))
}

async fn values_get(
    State(sheet): State<FakeSheet>,
    Path((_sid, range)): Path<(String, String)>,
) -> Json<Value> {
    let rows = sheet.rows.lock().unwrap();
    let values: Vec<Vec<String>> = if range.contains("A1:H1") {
        rows.first().cloned().into_iter().collect()
    } else {
        rows.clone()
    };
    Json(json!({ "values": values }))
}

async fn values_post(
    State(sheet): State<FakeSheet>,
    Path((_sid, range)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !range.ends_with(":append") {
        return (StatusCode::BAD_REQUEST, Json(json!({})));
    }

    let mut rows = sheet.rows.lock().unwrap();
    for value_row in body["values"].as_array().cloned().unwrap_or_default() {
        rows.push(json_row(&value_row));
    }
    sheet.writes.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, Json(json!({})))
}

async fn values_put(
    State(sheet): State<FakeSheet>,
    Path((_sid, range)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if sheet.hold_put.swap(false, Ordering::SeqCst) {
        sheet.put_parked.store(true, Ordering::SeqCst);
        sheet.put_release.notified().await;
    }

    let Some(target) = parse_row(&range) else {
        return (StatusCode::BAD_REQUEST, Json(json!({})));
    };

    let mut rows = sheet.rows.lock().unwrap();
    while rows.len() < target {
        rows.push(Vec::new());
    }
    if let Some(first) = body["values"].as_array().and_then(|v| v.first()) {
        rows[target - 1] = json_row(first);
    }
    sheet.writes.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, Json(json!({})))
}

/// `"Notlar!A5:H5"` → 5.
fn parse_row(range: &str) -> Option<usize> {
    let cells = range.split('!').nth(1)?;
    let start = cells.split(':').next()?;
    start
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .ok()
}

fn json_row(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|cells| {
            cells
                .iter()
                .map(|cell| cell.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}
