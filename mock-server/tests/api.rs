use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Status};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn form_post(uri: &str, body: &str, authorization: Option<&str>) -> Request<String> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(value) = authorization {
        builder = builder.header(http::header::AUTHORIZATION, value);
    }
    builder.body(body.to_string()).unwrap()
}

// --- show ---

#[tokio::test]
async fn show_status_found() {
    let resp = app().oneshot(get("/1/statuses/show/20.json")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let status: Status = body_json(resp).await;
    assert_eq!(status.id, 20);
    assert_eq!(status.user.screen_name, "jack");
}

#[tokio::test]
async fn show_status_not_found_has_error_payload() {
    let resp = app().oneshot(get("/1/statuses/show/999.json")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"][0]["code"], 144);
}

#[tokio::test]
async fn show_status_requires_json_suffix() {
    let resp = app().oneshot(get("/1/statuses/show/20")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- timeline ---

#[tokio::test]
async fn user_timeline_filters_by_screen_name() {
    let resp = app()
        .oneshot(get("/1/statuses/user_timeline.json?screen_name=jack"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let statuses: Vec<Status> = body_json(resp).await;
    let ids: Vec<u64> = statuses.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![22, 20]);
}

// --- update ---

#[tokio::test]
async fn update_without_authorization_is_rejected() {
    let resp = app()
        .oneshot(form_post("/1/statuses/update.json", "status=hi", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_creates_status() {
    let resp = app()
        .oneshot(form_post(
            "/1/statuses/update.json",
            "status=hello%20world",
            Some("Bearer tok"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let status: Status = body_json(resp).await;
    assert_eq!(status.id, 23);
    assert_eq!(status.text, "hello world");
}

// --- stream ---

#[tokio::test]
async fn sample_stream_is_line_delimited() {
    let resp = app().oneshot(get("/1/statuses/sample.json")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    let text = std::str::from_utf8(&bytes).unwrap();
    let docs: Vec<Status> = text
        .split("\r\n")
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(docs.len(), 3);
    assert!(text.starts_with("\r\n"));
}

// --- search ---

#[tokio::test]
async fn search_matches_text_case_insensitively() {
    let resp = app().oneshot(get("/search.json?q=RUST")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["query"], "RUST");
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["id"], 22);
}

#[tokio::test]
async fn search_without_query_is_bad_request() {
    let resp = app().oneshot(get("/search.json")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- state carries across requests ---

#[tokio::test]
async fn posted_status_is_visible_in_stream() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_post(
            "/1/statuses/update.json",
            "status=streamed",
            Some("Basic dXNlcjpwYXNz"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/1/statuses/sample.json"))
        .await
        .unwrap();
    let bytes = body_bytes(resp).await;
    let text = std::str::from_utf8(&bytes).unwrap();
    assert!(text.contains("\"text\":\"streamed\""));
}
