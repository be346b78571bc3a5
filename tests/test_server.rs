//! Integration test: Server API endpoints

use downtime_predictor::server::{create_router, AppState, ServerConfig};
use std::path::Path;
use std::sync::Arc;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "downtime-test-boundary";

fn test_state(model_path: &Path) -> Arc<AppState> {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        model_path: model_path.to_path_buf(),
        max_upload_size: 10 * 1024 * 1024,
    };
    Arc::new(AppState::new(config))
}

fn app(state: &Arc<AppState>) -> Router {
    create_router(Arc::clone(state), &state.config)
}

fn machines_csv() -> String {
    let mut csv = String::from("Min_Temp,Max_Temp,Leakage,Electricity,Fail_tomorrow\n");
    for i in 0..40 {
        let fail = i % 4 == 0 || i % 4 == 1;
        let leakage = if fail { 0.6 + (i % 10) as f64 * 0.03 } else { 0.05 + (i % 10) as f64 * 0.02 };
        csv.push_str(&format!(
            "{},{},{:.3},{},{}\n",
            5 + i % 9,
            20 + i % 11,
            leakage,
            210 + i % 17,
            u8::from(fail)
        ));
    }
    csv
}

fn multipart_request(file_name: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/csv\r\n\r\n{c}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = file_name,
        c = content
    );
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn predict_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const READINGS: &str = r#"{"Min_Temp": 7.0, "Max_Temp": 24.0, "Leakage": 0.8, "Electricity": 220.0}"#;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_root_says_hello() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    let (status, body) = send(
        app(&state),
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello, World!");
}

#[tokio::test]
async fn test_upload_returns_columns() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    let (status, body) = send(app(&state), multipart_request("machines.csv", &machines_csv())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Dataset uploaded successfully!");
    assert_eq!(
        body["columns"],
        serde_json::json!(["Min_Temp", "Max_Temp", "Leakage", "Electricity", "Fail_tomorrow"])
    );
}

#[tokio::test]
async fn test_upload_rejects_non_csv() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    let (status, body) = send(app(&state), multipart_request("machines.txt", &machines_csv())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Only CSV files are allowed.");
}

#[tokio::test]
async fn test_upload_missing_target_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    let csv = "Min_Temp,Max_Temp,Leakage,Electricity\n1,2,0.1,220\n3,4,0.9,230\n";
    let (status, body) = send(app(&state), multipart_request("machines.csv", csv)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Dataset must contain a 'Fail_tomorrow' column.");
    assert!(state.current_dataset().await.is_none());
}

#[tokio::test]
async fn test_rejected_upload_keeps_previous_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));

    let (status, _) = send(app(&state), multipart_request("machines.csv", &machines_csv())).await;
    assert_eq!(status, StatusCode::OK);

    let triple = "Leakage,Fail_tomorrow\n0.1,0\n0.2,1\n0.3,2\n";
    let (status, _) = send(app(&state), multipart_request("three.csv", triple)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let current = state.current_dataset().await.unwrap();
    assert_eq!(current.name(), "machines.csv");
    assert_eq!(current.height(), 40);

    let (status, body) = send(app(&state), post_empty("/train")).await;
    assert_eq!(status, StatusCode::OK, "train failed: {}", body);
    assert_eq!(body["message"], "Model trained successfully!");
}

#[tokio::test]
async fn test_upload_non_binary_target_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));

    let single = "Leakage,Fail_tomorrow\n0.1,0\n0.2,0\n0.3,0\n";
    let (status, _) = send(app(&state), multipart_request("one.csv", single)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let triple = "Leakage,Fail_tomorrow\n0.1,0\n0.2,1\n0.3,2\n";
    let (status, body) = send(app(&state), multipart_request("three.csv", triple)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "'Fail_tomorrow' column must be binary (two unique values).");
}

#[tokio::test]
async fn test_upload_unparseable_csv_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    let ragged = "Leakage,Fail_tomorrow\n0.1,0\n0.2,1,7,8\n0.3,0\n";
    let (status, body) = send(app(&state), multipart_request("ragged.csv", ragged)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Error processing file:"));
}

#[tokio::test]
async fn test_train_without_upload_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    let (status, body) = send(app(&state), post_empty("/train")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "No dataset uploaded. Please upload a dataset first.");
}

#[tokio::test]
async fn test_train_with_text_feature_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    let csv = "Site,Fail_tomorrow\nnorth,0\nsouth,1\neast,0\nwest,1\nnorth,0\nsouth,1\n";
    let (status, _) = send(app(&state), multipart_request("sites.csv", csv)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app(&state), post_empty("/train")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Error training model:"));
}

#[tokio::test]
async fn test_predict_without_model_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    let (status, body) = send(app(&state), predict_request(READINGS)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "No model available. Train a model first.");
}

#[tokio::test]
async fn test_predict_missing_field_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    let (status, body) = send(
        app(&state),
        predict_request(r#"{"Min_Temp": 7.0, "Max_Temp": 24.0, "Leakage": 0.8}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_upload_train_predict_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.bin");
    let state = test_state(&model_path);

    let (status, _) = send(app(&state), multipart_request("machines.csv", &machines_csv())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app(&state), post_empty("/train")).await;
    assert_eq!(status, StatusCode::OK, "train failed: {}", body);
    assert_eq!(body["message"], "Model trained successfully!");
    let accuracy = body["accuracy"].as_f64().unwrap();
    let f1 = body["f1_score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
    assert!((0.0..=1.0).contains(&f1));
    assert!(model_path.is_file());

    let (status, body) = send(app(&state), predict_request(READINGS)).await;
    assert_eq!(status, StatusCode::OK, "predict failed: {}", body);
    let downtime = body["Downtime"].as_str().unwrap();
    assert!(downtime == "Yes" || downtime == "No");
    let confidence = body["Confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
}

#[tokio::test]
async fn test_training_metrics_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    send(app(&state), multipart_request("machines.csv", &machines_csv())).await;

    let (_, first) = send(app(&state), post_empty("/train")).await;
    let (_, second) = send(app(&state), post_empty("/train")).await;
    assert_eq!(first["accuracy"], second["accuracy"]);
    assert_eq!(first["f1_score"], second["f1_score"]);
}

#[tokio::test]
async fn test_predict_after_restart_loads_persisted_model() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.bin");

    let before = test_state(&model_path);
    send(app(&before), multipart_request("machines.csv", &machines_csv())).await;
    let (status, _) = send(app(&before), post_empty("/train")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, expected) = send(app(&before), predict_request(READINGS)).await;

    let after = test_state(&model_path);
    assert!(after.model.read().await.is_none());
    let (status, body) = send(app(&after), predict_request(READINGS)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);
    assert!(after.model.read().await.is_some());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    let (status, body) = send(
        app(&state),
        Request::builder().uri("/models").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not Found");
}

#[tokio::test]
async fn test_wrong_method_is_not_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("model.bin"));
    let (status, _) = send(
        app(&state),
        Request::builder().uri("/train").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
