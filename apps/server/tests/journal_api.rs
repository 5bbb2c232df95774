use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use dtjournal_core::codec::CompressOptions;
use dtjournal_server::{api::app_router, build_state, config::Config};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const BOUNDARY: &str = "dtj-test-boundary";

async fn build_test_app(storage_quota_bytes: u64) -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        storage_quota_bytes,
        timezone: Some(chrono_tz::UTC),
        image: CompressOptions::default(),
        static_dir: "dist".to_string(),
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart(
    method: Method,
    uri: &str,
    file_name: &str,
    mime: &str,
    bytes: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: {m}\r\n\r\n",
            b = BOUNDARY,
            f = file_name,
            m = mime
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 30, 30])))
        .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[tokio::test]
async fn healthz_responds() {
    let (app, _tmp) = build_test_app(0).await;
    let response = send(&app, get("/api/v1/healthz")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}

#[tokio::test]
async fn upsert_then_read_back() {
    let (app, _tmp) = build_test_app(0).await;

    let response = send(
        &app,
        put_json(
            "/api/v1/days",
            json!({"date": "2024-05-01", "pnl": "1,000", "memo": "trend day"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["pnl"], 1000);

    let response = send(
        &app,
        put_json("/api/v1/days", json!({"date": "2024-05-01", "pnl": -250})),
    )
    .await;
    let updated = body_json(response).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_eq!(updated["memo"], Value::Null);

    let day = body_json(send(&app, get("/api/v1/days/2024-05-01")).await).await;
    assert_eq!(day["pnl"], -250);
    assert_eq!(day["screenshots"], json!([]));

    let all = body_json(send(&app, get("/api/v1/days")).await).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_entries_are_rejected() {
    let (app, _tmp) = build_test_app(0).await;

    let response = send(
        &app,
        put_json("/api/v1/days", json!({"date": "2024-05-01", "pnl": "ten"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 400);

    let response = send(
        &app,
        put_json("/api/v1/days", json!({"date": "2024-05-01", "pnl": i64::MAX})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, put_json("/api/v1/days", json!({"pnl": 5}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, get("/api/v1/days/2024-13-01")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, get("/api/v1/days/2024-05-01")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // nothing was persisted
    let all = body_json(send(&app, get("/api/v1/days")).await).await;
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_day_is_idempotent() {
    let (app, _tmp) = build_test_app(0).await;
    send(&app, put_json("/api/v1/days", json!({"date": "2024-05-01", "pnl": 1}))).await;

    for _ in 0..2 {
        let response = send(
            &app,
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/v1/days/2024-05-01")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    let response = send(&app, get("/api/v1/days/2024-05-01")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn baseline_upload_and_export() {
    let (app, _tmp) = build_test_app(0).await;

    let response = send(&app, get("/api/v1/export/2024-05-01")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        multipart(
            Method::PUT,
            "/api/v1/csv-baseline",
            "report.csv",
            "text/csv",
            b"date,pnl\n2024-05-02,200\n",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "report.csv");

    send(&app, put_json("/api/v1/days", json!({"date": "2024-05-01", "pnl": 1000}))).await;

    let response = send(&app, get("/api/v1/export/2024-05-01")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"report_updated.csv\""
    );
    assert_eq!(
        body_bytes(response).await,
        b"date,pnl\n2024-05-01,1000\n2024-05-02,200\n"
    );

    let baseline = body_json(send(&app, get("/api/v1/csv-baseline")).await).await;
    assert_eq!(baseline["text"], "date,pnl\n2024-05-02,200\n");
}

#[tokio::test]
async fn screenshot_compress_attach_and_fetch() {
    let (app, _tmp) = build_test_app(0).await;

    let response = send(
        &app,
        multipart(Method::POST, "/api/v1/screenshots", "chart.png", "image/png", &png(2200, 1100)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let shot = body_json(response).await;
    assert_eq!(shot["width"], 1100);
    assert_eq!(shot["height"], 550);
    let data_url = shot["dataUrl"].as_str().unwrap().to_string();
    assert!(data_url.starts_with("data:image/jpeg;base64,"));

    let response = send(
        &app,
        multipart(
            Method::POST,
            "/api/v1/screenshots?preset=detail",
            "chart.png",
            "image/png",
            &png(2600, 100),
        ),
    )
    .await;
    assert_eq!(body_json(response).await["width"], 1300);

    send(
        &app,
        put_json(
            "/api/v1/days",
            json!({"date": "2024-05-01", "pnl": 10, "screenshots": [data_url]}),
        ),
    )
    .await;

    let response = send(&app, get("/api/v1/days/2024-05-01/screenshots/0")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    let bytes = body_bytes(response).await;
    assert_eq!(image::load_from_memory(&bytes).unwrap().width(), 1100);

    let response = send(&app, get("/api/v1/days/2024-05-01/screenshots/1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn undecodable_image_is_unprocessable() {
    let (app, _tmp) = build_test_app(0).await;
    let response = send(
        &app,
        multipart(Method::POST, "/api/v1/screenshots", "notes.txt", "text/plain", b"not an image"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn summary_equity_and_calendar() {
    let (app, _tmp) = build_test_app(0).await;
    for (date, pnl) in [("2024-05-01", 100), ("2024-05-02", -50), ("2024-05-03", 25)] {
        send(&app, put_json("/api/v1/days", json!({"date": date, "pnl": pnl}))).await;
    }

    let equity = body_json(send(&app, get("/api/v1/equity")).await).await;
    let cumulative: Vec<i64> = equity
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["cumulative"].as_i64().unwrap())
        .collect();
    assert_eq!(cumulative, vec![100, 50, 75]);

    let summary = body_json(send(&app, get("/api/v1/summary")).await).await;
    assert_eq!(summary["total"], 75);

    let calendar = body_json(send(&app, get("/api/v1/calendar/2024/5")).await).await;
    let days = calendar["days"].as_array().unwrap();
    assert_eq!(days.len(), 31);
    assert_eq!(days[0]["tone"], "gain");
    assert_eq!(days[1]["tone"], "loss");
    assert_eq!(days[3]["tone"], Value::Null);
    assert_eq!(calendar["total"], 75);

    let response = send(&app, get("/api/v1/calendar/2024/13")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quota_exceeded_is_insufficient_storage() {
    let (app, _tmp) = build_test_app(200).await;

    let response = send(
        &app,
        put_json(
            "/api/v1/days",
            json!({"date": "2024-05-01", "pnl": 1, "memo": "x".repeat(500)}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INSUFFICIENT_STORAGE);
    assert_eq!(body_json(response).await["code"], 507);

    let all = body_json(send(&app, get("/api/v1/days")).await).await;
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn clear_requires_confirmation() {
    let (app, _tmp) = build_test_app(0).await;
    send(&app, put_json("/api/v1/days", json!({"date": "2024-05-01", "pnl": 1}))).await;

    let clear = |uri: &str| {
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    };

    let response = send(&app, clear("/api/v1/data")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let usage = body_json(send(&app, get("/api/v1/usage")).await).await;
    assert_eq!(usage["recordCount"], 1);
    assert!(usage["usedBytes"].as_u64().unwrap() > 0);

    let response = send(&app, clear("/api/v1/data?confirm=true")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let all = body_json(send(&app, get("/api/v1/days")).await).await;
    assert!(all.as_array().unwrap().is_empty());
    let usage = body_json(send(&app, get("/api/v1/usage")).await).await;
    assert_eq!(usage["usedBytes"], 0);
}
