use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use seatplan_api::{app, AppState};
use seatplan_core::InMemoryLayoutRepository;
use seatplan_layout::LayoutSession;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app() -> (Arc<InMemoryLayoutRepository>, Router) {
    let repo = Arc::new(InMemoryLayoutRepository::new());
    let session = LayoutSession::open(repo.clone(), 1).await.unwrap();
    (repo, app(AppState::new(session)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_seat(app: &Router, x: f64, y: f64) -> String {
    let (status, body) = send(app, "POST", "/v1/seats", Some(json!({ "position_x": x, "position_y": y }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["seat_uuid"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_build_and_read_layout() {
    let (repo, app) = test_app().await;

    let (status, _) = send(&app, "POST", "/v1/rows", Some(json!({ "name": "A" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, "POST", "/v1/rows", Some(json!({ "name": "A" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["row_uuid"], Value::Null);

    let seat = create_seat(&app, 0.0, 0.0).await;
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/v1/seats/{}", seat),
        Some(json!({ "row_name": "A", "number": "1", "person_name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, layout) = send(&app, "GET", "/v1/layout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(layout["rows"][0]["name"], "A");
    assert_eq!(layout["seats"][0]["row_name"], "A");
    assert_eq!(layout["seats"][0]["number"], "1");
    assert_eq!(layout["seats"][0]["person"]["participant_id"], 1);
    assert_eq!(layout["seats"][0]["is_selected"], false);

    assert_eq!(repo.stored(1).unwrap().seats.len(), 1);
}

#[tokio::test]
async fn test_error_status_codes() {
    let (repo, app) = test_app().await;
    send(&app, "POST", "/v1/rows", Some(json!({ "name": "A" }))).await;
    let first = create_seat(&app, 0.0, 0.0).await;
    let second = create_seat(&app, 200.0, 0.0).await;

    send(&app, "PUT", &format!("/v1/seats/{}", first), Some(json!({ "row_name": "A", "number": "1" }))).await;
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/v1/seats/{}", second),
        Some(json!({ "row_name": "A", "number": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/v1/seats/{}", second),
        Some(json!({ "row_name": "A", "number": "01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/v1/seats/{}", second),
        Some(json!({ "row_name": "A", "number": "1.5" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", "/v1/rows/A", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, "DELETE", "/v1/rows/Z", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/v1/seats/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, "POST", &format!("/v1/selection/seats/{}", first), None).await;
    let (status, _) = send(&app, "POST", "/v1/arrange/spacing", Some(json!({ "axis": "horizontal", "spacing": -5.0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    repo.set_failing(true);
    let (status, body) = send(&app, "POST", "/v1/rows", Some(json!({ "name": "B" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Persistence failure"));
}

#[tokio::test]
async fn test_selection_and_arrange() {
    let (_repo, app) = test_app().await;
    let a = create_seat(&app, 40.0, 0.0).await;
    let b = create_seat(&app, 200.0, 30.0).await;
    create_seat(&app, 500.0, 500.0).await;

    // Dragged from bottom-right to top-left.
    let (status, body) = send(
        &app,
        "POST",
        "/v1/selection/rect",
        Some(json!({ "start_x": 300.0, "start_y": 50.0, "end_x": 0.0, "end_y": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"], json!([a, b]));

    let (status, _) = send(&app, "POST", "/v1/arrange/align", Some(json!({ "alignment": "top" }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    send(&app, "POST", "/v1/arrange/rotate", Some(json!({ "delta": 370.0 }))).await;
    let (status, _) = send(&app, "POST", "/v1/numbering", Some(json!({ "start": 5 }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, seat) = send(&app, "GET", &format!("/v1/seats/{}", b), None).await;
    assert_eq!(seat["position_y"], 0.0);
    assert_eq!(seat["angle"], 10.0);
    assert_eq!(seat["number"], "6");
    assert_eq!(seat["is_selected"], true);

    let (_, body) = send(&app, "POST", &format!("/v1/selection/seats/{}/toggle", a), None).await;
    assert_eq!(body["selected"], false);

    let (status, _) = send(&app, "POST", "/v1/arrange/auto", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, layout) = send(&app, "GET", "/v1/layout", None).await;
    let xs: Vec<f64> = layout["seats"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["position_x"].as_f64().unwrap())
        .collect();
    assert_eq!(xs, vec![0.0, 90.0, 180.0]);

    let (_, body) = send(&app, "DELETE", "/v1/selection", None).await;
    assert_eq!(body["selected"], json!([]));
}

#[tokio::test]
async fn test_drag_reports_conflicts() {
    let (_repo, app) = test_app().await;
    let moving = create_seat(&app, 0.0, 0.0).await;
    for y in [200.0, 270.0, 340.0] {
        create_seat(&app, 0.0, y).await;
    }
    send(&app, "POST", &format!("/v1/selection/seats/{}", moving), None).await;

    let (status, body) = send(&app, "POST", "/v1/arrange/drag", Some(json!({ "dx": 0.0, "dy": 200.0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conflicts"][0]["seat_uuid"], moving);
    assert_eq!(body["conflicts"][0]["attempts"], 10);
}

#[tokio::test]
async fn test_read_only_mode_ignores_edits() {
    let (repo, app) = test_app().await;
    create_seat(&app, 0.0, 0.0).await;

    let (status, _) = send(&app, "PUT", "/v1/mode", Some(json!({ "read_only": true }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "POST", "/v1/seats", Some(json!({ "position_x": 100.0, "position_y": 0.0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seat_uuid"], Value::Null);

    let (_, layout) = send(&app, "GET", "/v1/layout", None).await;
    assert_eq!(layout["read_only"], true);
    assert_eq!(layout["seats"].as_array().unwrap().len(), 1);
    assert_eq!(repo.save_count(), 1);
}

#[tokio::test]
async fn test_document_export_and_import() {
    let (_repo, app) = test_app().await;
    send(&app, "POST", "/v1/rows", Some(json!({ "name": "A" }))).await;
    let seat = create_seat(&app, 10.0, 10.0).await;
    send(&app, "PUT", &format!("/v1/seats/{}", seat), Some(json!({ "row_name": "A", "number": "2" }))).await;

    let (status, document) = send(&app, "GET", "/v1/document", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(document["rows"], json!(["A"]));
    assert_eq!(document["seats"][0]["number"], "2");

    let replacement = json!({
        "rows": ["B"],
        "seats": [
            { "row_name": "B", "number": "1", "position_x": 0.0, "position_y": 0.0 },
            { "row_name": "B", "number": "2", "position_x": 90.0, "position_y": 0.0 }
        ]
    });
    let (status, _) = send(&app, "PUT", "/v1/document", Some(replacement)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, layout) = send(&app, "GET", "/v1/layout", None).await;
    assert_eq!(layout["rows"][0]["name"], "B");
    assert_eq!(layout["seats"].as_array().unwrap().len(), 2);

    let duplicate = json!({
        "rows": ["B"],
        "seats": [
            { "row_name": "B", "number": "1" },
            { "row_name": "B", "number": "1" }
        ]
    });
    let (status, _) = send(&app, "PUT", "/v1/document", Some(duplicate)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
