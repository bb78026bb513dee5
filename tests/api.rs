//! HTTP 接口测试

use axum::body::Body;
use axum::http::{Request, StatusCode};
use invoice_finder::api::{router, AppState, ProcessResponse};
use invoice_finder::InvoiceFinder;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

const SOURCE: &str = "\
Laporan Piutang,,,
Nama Pelanggan,No. Faktur,Tgl. Faktur,Total
PT A,F-1,2024-02-01,\"600,000\"
PT A,F-2,2024-02-03,\"400,000\"
PT B,F-3,2024-02-04,\"1,000,050\"
";

fn state(dir: &TempDir) -> AppState {
    AppState {
        finder: Arc::new(InvoiceFinder::new(dir.path().join("outputs"))),
        upload_dir: dir.path().join("uploads"),
        default_tolerance: 100,
        default_max_invoices: 5,
    }
}

fn upload(dir: &TempDir, name: &str, body: &str) {
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads).unwrap();
    std::fs::write(uploads.join(name), body).unwrap();
}

async fn post_process(dir: &TempDir, body: Value) -> (StatusCode, Value) {
    let app = router(state(dir), 2);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/process")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_returns_ok() {
    let dir = TempDir::new().unwrap();
    let response = router(state(&dir), 1)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn process_finds_combinations_within_default_tolerance() {
    let dir = TempDir::new().unwrap();
    upload(&dir, "abc_piutang.csv", SOURCE);

    let (status, body) = post_process(
        &dir,
        json!({ "upload_id": "abc_piutang.csv", "targets": "Rp 1.000.000" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: ProcessResponse = serde_json::from_value(body).unwrap();
    assert!(response.found);
    // PT A: F-1 + F-2; PT B: F-3 (selisih 50 <= 100)
    assert_eq!(response.total_rows, 2);

    let file_name = response.file_name.unwrap();
    assert!(dir.path().join("outputs").join(file_name).is_file());
}

#[tokio::test]
async fn process_reports_no_match_without_error() {
    let dir = TempDir::new().unwrap();
    upload(&dir, "abc_piutang.csv", SOURCE);

    let (status, body) = post_process(
        &dir,
        json!({ "upload_id": "abc_piutang.csv", "targets": "5", "tolerance": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "found": false, "total_rows": 0, "file_name": null }));
}

#[tokio::test]
async fn invalid_targets_are_rejected() {
    let dir = TempDir::new().unwrap();
    upload(&dir, "abc_piutang.csv", SOURCE);

    let (status, body) = post_process(
        &dir,
        json!({ "upload_id": "abc_piutang.csv", "targets": "nol, 0" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Target"));
}

#[tokio::test]
async fn unknown_or_unsafe_upload_ids() {
    let dir = TempDir::new().unwrap();

    let (status, _) = post_process(
        &dir,
        json!({ "upload_id": "missing.csv", "targets": "1000" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_process(
        &dir,
        json!({ "upload_id": "../secret.csv", "targets": "1000" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ingestion_failures_are_user_facing() {
    let dir = TempDir::new().unwrap();
    upload(&dir, "noheader.csv", "Customer,Invoice,Date,Amount\nA,1,2024-01-01,100\n");

    let (status, body) = post_process(
        &dir,
        json!({ "upload_id": "noheader.csv", "targets": "100" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Nama Pelanggan"));
}

#[tokio::test]
async fn abandoned_request_cancels_its_search() {
    let dir = TempDir::new().unwrap();
    // PT A: 64 张 1 元发票，最多 6 张一组，枚举要数秒；PT B 一张即可命中
    let mut source = String::from("Nama Pelanggan,No. Faktur,Tgl. Faktur,Total\n");
    for i in 0..64 {
        source.push_str(&format!("PT A,F-{i},2024-03-01,1\n"));
    }
    source.push_str("PT B,G-1,2024-03-02,\"1,000,000\"\n");
    upload(&dir, "besar.csv", &source);

    let request = Request::builder()
        .method("POST")
        .uri("/api/process")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "upload_id": "besar.csv",
                "targets": "1000000",
                "tolerance": 0,
                "max_invoices": 6
            })
            .to_string(),
        ))
        .unwrap();

    let outcome = tokio::time::timeout(
        Duration::from_millis(100),
        router(state(&dir), 1).oneshot(request),
    )
    .await;
    assert!(outcome.is_err(), "search finished before the client gave up");

    // 未取消的搜索会跑完并写出 PT B 的结果文件
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!dir.path().join("outputs").exists());
}
