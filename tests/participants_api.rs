use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use roster::database;
use roster::web::{self, AppState};

async fn app() -> Router {
    let pool = database::connect_in_memory().await.unwrap();
    web::router(AppState {
        pool,
        max_batch: 1_000,
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(raw) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(raw.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn list(app: &Router) -> Value {
    let (status, body) = send(app, Method::GET, "/api/participants/list", None).await;
    assert_eq!(status, StatusCode::OK);
    body
}

async fn add(app: &Router, count: Value) -> (StatusCode, Value) {
    let body = json!({ "count": count }).to_string();
    send(app, Method::POST, "/api/participants/add", Some(&body)).await
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let app = app().await;
    assert_eq!(list(&app).await, json!([]));
}

#[tokio::test]
async fn add_then_toggle_scenario() {
    let app = app().await;

    let (status, body) = add(&app, json!(3)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], "from 1 to 3");
    assert_eq!(body["message"], "Successfully added 3 participants");
    assert_eq!(
        body["inserted"],
        json!([
            { "id": 1, "status": "active" },
            { "id": 2, "status": "active" },
            { "id": 3, "status": "active" },
        ])
    );

    let (status, body) = send(&app, Method::PATCH, "/api/participants/2/toggle-status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 2, "status": "disabled" }));

    assert_eq!(
        list(&app).await,
        json!([
            { "id": 1, "status": "active" },
            { "id": 2, "status": "disabled" },
            { "id": 3, "status": "active" },
        ])
    );
}

#[tokio::test]
async fn numbering_continues_from_max() {
    let app = app().await;
    add(&app, json!(5)).await;

    let (status, body) = add(&app, json!(2)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], "from 6 to 7");
    assert_eq!(
        body["inserted"],
        json!([{ "id": 6, "status": "active" }, { "id": 7, "status": "active" }])
    );
    assert_eq!(list(&app).await.as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn invalid_counts_are_bad_request_and_change_nothing() {
    let app = app().await;
    add(&app, json!(2)).await;
    let before = list(&app).await;

    for count in [json!(0), json!(-3), json!(2.5), json!("4"), json!(null), json!(1_001)] {
        let (status, body) = add(&app, count.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "count {count}");
        assert_eq!(body["error"], "Field \"count\" must be a positive number");
    }

    let (status, _) = send(&app, Method::POST, "/api/participants/add", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::POST, "/api/participants/add", Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(list(&app).await, before);
}

#[tokio::test]
async fn integral_float_count_is_accepted() {
    let app = app().await;
    let (status, body) = add(&app, json!(2.0)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], "from 1 to 2");
}

#[tokio::test]
async fn toggle_unknown_or_malformed_id_is_not_found() {
    let app = app().await;
    add(&app, json!(1)).await;

    for uri in [
        "/api/participants/999/toggle-status",
        "/api/participants/abc/toggle-status",
    ] {
        let (status, body) = send(&app, Method::PATCH, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "Participant not found");
    }
    assert_eq!(list(&app).await, json!([{ "id": 1, "status": "active" }]));
}

#[tokio::test]
async fn toggling_twice_restores_status() {
    let app = app().await;
    add(&app, json!(1)).await;

    send(&app, Method::PATCH, "/api/participants/1/toggle-status", None).await;
    let (_, body) = send(&app, Method::PATCH, "/api/participants/1/toggle-status", None).await;
    assert_eq!(body, json!({ "id": 1, "status": "active" }));
}

#[tokio::test]
async fn back_to_back_batches_over_http_stay_contiguous() {
    let app = app().await;

    let (a, b) = tokio::join!(add(&app, json!(4)), add(&app, json!(3)));
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);

    let ids: Vec<i64> = list(&app)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, (1..=7).collect::<Vec<_>>());
}
