use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub screen_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Status {
    pub id: u64,
    pub id_str: String,
    pub text: String,
    pub user: User,
}

impl Status {
    fn new(id: u64, screen_name: &str, text: &str) -> Self {
        Self {
            id,
            id_str: id.to_string(),
            text: text.to_string(),
            user: User {
                screen_name: screen_name.to_string(),
            },
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateStatus {
    pub status: String,
}

#[derive(Deserialize)]
pub struct TimelineQuery {
    pub screen_name: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug)]
pub struct Timeline {
    statuses: BTreeMap<u64, Status>,
    next_id: u64,
}

impl Timeline {
    /// A timeline preloaded with a few well-known statuses.
    pub fn seeded() -> Self {
        let statuses = [
            Status::new(20, "jack", "just setting up my twttr"),
            Status::new(21, "biz", "inviting coworkers"),
            Status::new(22, "jack", "rust makes streaming fun"),
        ];
        Self {
            next_id: 23,
            statuses: statuses.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

pub type Db = Arc<RwLock<Timeline>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn api_error(status: StatusCode, code: u32, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "errors": [{ "code": code, "message": message }] })),
    )
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Timeline::seeded()));
    Router::new()
        .route("/1/statuses/show/{file}", get(show_status))
        .route("/1/statuses/user_timeline.json", get(user_timeline))
        .route("/1/statuses/update.json", post(update_status))
        .route("/1/statuses/sample.json", get(sample_stream))
        .route("/search.json", get(search))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn show_status(State(db): State<Db>, Path(file): Path<String>) -> ApiResult<Json<Status>> {
    let not_found = || api_error(StatusCode::NOT_FOUND, 144, "No status found with that ID.");
    let id: u64 = file
        .strip_suffix(".json")
        .and_then(|id| id.parse().ok())
        .ok_or_else(not_found)?;
    debug!(id, "show status");
    let timeline = db.read().await;
    timeline.statuses.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn user_timeline(
    State(db): State<Db>,
    Query(query): Query<TimelineQuery>,
) -> Json<Vec<Status>> {
    let timeline = db.read().await;
    let statuses = timeline
        .statuses
        .values()
        .rev()
        .filter(|s| {
            query
                .screen_name
                .as_deref()
                .map_or(true, |name| s.user.screen_name == name)
        })
        .cloned()
        .collect();
    Json(statuses)
}

async fn update_status(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(input): Form<UpdateStatus>,
) -> ApiResult<Json<Status>> {
    if !headers.contains_key(header::AUTHORIZATION) {
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            32,
            "Could not authenticate you.",
        ));
    }
    let mut timeline = db.write().await;
    let id = timeline.next_id;
    timeline.next_id += 1;
    let status = Status::new(id, "api", &input.status);
    timeline.statuses.insert(id, status.clone());
    debug!(id, "status created");
    Ok(Json(status))
}

/// All statuses as newline-delimited JSON, with a keep-alive line in front.
async fn sample_stream(State(db): State<Db>) -> impl IntoResponse {
    let timeline = db.read().await;
    let mut body = String::from("\r\n");
    for status in timeline.statuses.values() {
        body.push_str(&serde_json::to_string(status).unwrap_or_default());
        body.push_str("\r\n");
    }
    ([(header::CONTENT_TYPE, "application/json")], body)
}

async fn search(State(db): State<Db>, Query(query): Query<SearchQuery>) -> Json<Value> {
    let needle = query.q.to_lowercase();
    let timeline = db.read().await;
    let results: Vec<&Status> = timeline
        .statuses
        .values()
        .filter(|s| s.text.to_lowercase().contains(&needle))
        .collect();
    Json(json!({ "query": query.q, "results": results }))
}
