//! End-to-end transfer scenarios against a mock GLB file server

use glb_transfer::{codec, ClientConfig, Operation, TransferClient, TransferError};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GLB_BYTES: [u8; 4] = [0x67, 0x6C, 0x54, 0x46];

fn client_for(server: &MockServer) -> TransferClient {
    TransferClient::new(ClientConfig::new(server.uri(), Duration::from_secs(5))).unwrap()
}

fn download_body(data: &str, file_size: u64, success: bool) -> serde_json::Value {
    json!({
        "name": "model.glb",
        "description": "demo",
        "data": data,
        "file_size": file_size,
        "success": success,
    })
}

async fn mount_download(server: &MockServer, id: u64, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/download-glb/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let file = dir.join(name);
    std::fs::write(&file, bytes).unwrap();
    file
}

#[tokio::test]
async fn upload_sends_base64_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-glb/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "name": "model.glb",
            "description": "demo",
            "data": "Z2xURg==",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), "model.glb", &GLB_BYTES);

    let receipt = client_for(&server)
        .upload(&file, "demo", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(receipt.name, "model.glb");
    assert_eq!(receipt.bytes_sent, 4);
    assert_eq!(receipt.response.body, r#"{"success":true}"#);
}

#[tokio::test]
async fn upload_of_missing_file_never_reaches_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client_for(&server)
        .upload(&dir.path().join("absent.glb"), "", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::FileRead { .. }));
    assert_eq!(err.operation(), Some(Operation::Upload));
    assert!(err.to_string().starts_with("upload failed"));
    assert_eq!(err.server_body(), None);
}

#[tokio::test]
async fn upload_rejection_keeps_server_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-glb/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid GLB file"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), "notes.glb", b"not a model");

    let err = client_for(&server)
        .spawn_upload(file, String::new())
        .join()
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::Status { status: 400, .. }));
    assert_eq!(err.operation(), Some(Operation::Upload));
    assert_eq!(err.server_body(), Some(r#"{"error":"invalid GLB file"}"#));
}

#[tokio::test]
async fn download_writes_decoded_bytes() {
    let server = MockServer::start().await;
    mount_download(&server, 1, download_body("Z2xURg==", 4, true)).await;

    let dir = tempfile::tempdir().unwrap();
    let target = write_fixture(dir.path(), "downloaded.glb", b"stale content from an earlier run");

    let asset = client_for(&server)
        .download(1, &target, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(asset.save_path, target);
    assert_eq!(asset.name, "model.glb");
    assert_eq!(asset.description, "demo");
    assert_eq!(asset.file_size, 4);
    assert_eq!(std::fs::read(&target).unwrap(), GLB_BYTES);
}

#[tokio::test]
async fn download_reported_failure_writes_nothing() {
    let server = MockServer::start().await;
    mount_download(&server, 2, json!({ "success": false })).await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("never.glb");

    let err = client_for(&server)
        .download(2, &target, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::RemoteDownloadFailed { .. }));
    assert!(!err.is_remote_ok());
    assert!(!target.exists());
}

#[tokio::test]
async fn download_with_invalid_base64_leaves_target_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-glb/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(download_body("AAA", 2, true)))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let existing = write_fixture(dir.path(), "existing.glb", b"keep me");
    let fresh = dir.path().join("fresh.glb");
    let client = client_for(&server);

    let err = client
        .download(3, &existing, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::Decode { .. }));
    assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");

    let err = client
        .download(3, &fresh, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::Decode { .. }));
    assert!(!fresh.exists());
}

#[tokio::test]
async fn download_with_malformed_envelope_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-glb/4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client_for(&server)
        .download(4, &dir.path().join("x.glb"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::Protocol { .. }));
    assert_eq!(err.server_body(), Some("<html>maintenance</html>"));
}

#[tokio::test]
async fn download_not_found_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-glb/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"file not found"}"#))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("x.glb");
    let err = client_for(&server)
        .download(99, &target, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::Status { status: 404, .. }));
    assert!(!target.exists());
}

#[tokio::test]
async fn download_write_failure_is_partial() {
    let server = MockServer::start().await;
    mount_download(&server, 5, download_body("Z2xURg==", 4, true)).await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("no-such-dir").join("model.glb");

    let err = client_for(&server)
        .download(5, &target, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TransferError::FileWrite { file_size: 4, .. }
    ));
    assert!(err.is_remote_ok());
}

#[tokio::test]
async fn concurrent_downloads_to_same_path_keep_one_complete_file() {
    let large = vec![b'A'; 2 * 1024 * 1024];
    let small = vec![b'B'; 16];
    let server = MockServer::start().await;
    for (id, bytes) in [(7, &large), (8, &small)] {
        let data = codec::encode(bytes);
        Mock::given(method("GET"))
            .and(path(format!("/download-glb/{id}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(download_body(&data, bytes.len() as u64, true)),
            )
            .mount(&server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("shared.glb");
    let client = client_for(&server);

    for _ in 0..10 {
        let first = client.spawn_download(7, target.clone());
        let second = client.spawn_download(8, target.clone());
        let (first, second) = tokio::join!(first.join(), second.join());
        assert_eq!(first.unwrap().file_size, large.len() as u64);
        assert_eq!(second.unwrap().file_size, small.len() as u64);

        let written = std::fs::read(&target).unwrap();
        assert!(written == large || written == small);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}

#[tokio::test]
async fn cancelled_download_leaves_target_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-glb/6"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(download_body("Z2xURg==", 4, true))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = write_fixture(dir.path(), "model.glb", b"previous version");

    let task = client_for(&server).spawn_download(6, target.clone());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!task.is_finished());
    task.cancel();

    let err = task.join().await.unwrap_err();
    assert!(matches!(
        err,
        TransferError::Cancelled {
            operation: Operation::Download
        }
    ));
    assert_eq!(std::fs::read(&target).unwrap(), b"previous version");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list-glb/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"files":[]}"#)
                .set_delay(Duration::from_secs(1)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"healthy"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let list = client.spawn_list();
    let health = client.spawn_health();

    let health = health.join().await.unwrap();
    assert!(!list.is_finished());
    assert_eq!(health.body, r#"{"status":"healthy"}"#);
    assert_eq!(list.join().await.unwrap().body, r#"{"files":[]}"#);
}
