use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use file_vault::{AppBuilder, FileServiceConfig, HttpConfig, create_in_memory_app};
use serde_json::Value;
use std::time::Duration;

const USER_HEADER: HeaderName = HeaderName::from_static("x-user-id");
const PUBLIC_BASE_URL: &str = "http://localhost:5000";

async fn setup_test_server() -> TestServer {
    let services = create_in_memory_app().await.unwrap();
    TestServer::new(services.router()).unwrap()
}

fn user(id: &'static str) -> HeaderValue {
    HeaderValue::from_static(id)
}

fn file_form(name: &str, mime: &str, data: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data.to_vec())
            .file_name(name.to_string())
            .mime_type(mime.to_string()),
    )
}

async fn upload(server: &TestServer, owner: &'static str, name: &str, data: &[u8]) -> Value {
    let response = server
        .post("/api/files/upload")
        .add_header(USER_HEADER, user(owner))
        .multipart(file_form(name, "text/plain", data))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

/// Follow a signed link through the test server
async fn follow(server: &TestServer, url: &str) -> axum_test::TestResponse {
    let relative = url.strip_prefix(PUBLIC_BASE_URL).unwrap();
    let (path, query) = relative.split_once('?').unwrap();

    let mut request = server.get(path);
    for pair in query.split('&') {
        let (k, v) = pair.split_once('=').unwrap();
        let v = urlencoding::decode(v).unwrap().into_owned();
        request = request.add_query_param(k, v);
    }
    request.await
}

#[tokio::test]
async fn test_health_is_public() {
    let server = setup_test_server().await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "OK");
    assert!(body["uptimeSeconds"].is_number());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = setup_test_server().await;

    let response = server.get("/api/nothing-here").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["message"], "Route not found");
    assert_eq!(body["statusCode"], 404);
}

#[tokio::test]
async fn test_missing_identity_is_401() {
    let server = setup_test_server().await;

    let response = server.get("/api/files/list").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_upload_list_and_download() {
    let server = setup_test_server().await;

    let uploaded = upload(&server, "u1", "notes.txt", b"hello from http").await;
    assert_eq!(uploaded["message"], "File uploaded successfully");
    assert_eq!(uploaded["file"]["name"], "notes.txt");
    assert_eq!(uploaded["file"]["size"], 15);
    assert_eq!(uploaded["file"]["mimeType"], "text/plain");
    assert_eq!(uploaded["file"]["key"], "u1/notes.txt");

    let list = server
        .get("/api/files/list")
        .add_header(USER_HEADER, user("u1"))
        .await;
    list.assert_status_ok();
    let list: Value = list.json();
    assert_eq!(list["message"], "Files retrieved successfully");
    assert_eq!(list["count"], 1);
    assert_eq!(list["files"][0]["name"], "notes.txt");
    assert_eq!(list["files"][0]["mimeType"], "text/plain");

    let other = server
        .get("/api/files/list")
        .add_header(USER_HEADER, user("u2"))
        .await;
    let other: Value = other.json();
    assert_eq!(other["count"], 0);

    let link = server
        .get("/api/files/download/notes.txt")
        .add_header(USER_HEADER, user("u1"))
        .await;
    link.assert_status_ok();
    let link: Value = link.json();
    assert_eq!(link["message"], "Download URL generated");
    assert_eq!(link["fileName"], "notes.txt");
    assert_eq!(link["versionId"], "latest");
    assert_eq!(link["expiresInSeconds"], 300);

    let download = follow(&server, link["url"].as_str().unwrap()).await;
    download.assert_status_ok();
    assert_eq!(download.as_bytes().as_ref(), b"hello from http");
    assert_eq!(download.header("content-type"), "text/plain");
    assert!(
        download
            .header("content-disposition")
            .to_str()
            .unwrap()
            .contains("notes.txt")
    );
}

#[tokio::test]
async fn test_versions_and_restore() {
    let server = setup_test_server().await;

    let v1 = upload(&server, "u1", "report.pdf", b"first").await;
    let v1_id = v1["file"]["versionId"].as_str().unwrap().to_string();
    tokio::time::sleep(Duration::from_millis(5)).await;
    upload(&server, "u1", "report.pdf", b"second").await;

    let versions = server
        .get("/api/files/versions/report.pdf")
        .add_header(USER_HEADER, user("u1"))
        .await;
    versions.assert_status_ok();
    let versions: Value = versions.json();
    assert_eq!(versions["count"], 2);
    assert_eq!(versions["versions"][0]["label"], "V1");
    assert_eq!(versions["versions"][0]["isLatest"], false);
    assert_eq!(versions["versions"][1]["label"], "V2");
    assert_eq!(versions["versions"][1]["isLatest"], true);

    tokio::time::sleep(Duration::from_millis(5)).await;
    let restored = server
        .post(&format!("/api/files/restore/report.pdf/{}", v1_id))
        .add_header(USER_HEADER, user("u1"))
        .await;
    restored.assert_status_ok();
    let restored: Value = restored.json();
    assert_eq!(restored["message"], "Version restored successfully");
    assert_eq!(restored["restoredFromVersionId"], v1_id.as_str());
    let new_id = restored["newVersionId"].as_str().unwrap().to_string();

    let versions: Value = server
        .get("/api/files/versions/report.pdf")
        .add_header(USER_HEADER, user("u1"))
        .await
        .json();
    assert_eq!(versions["count"], 3);
    assert_eq!(versions["versions"][2]["label"], "V3");
    assert_eq!(versions["versions"][2]["versionId"], new_id.as_str());
    assert_eq!(versions["versions"][2]["isLatest"], true);

    let link: Value = server
        .get("/api/files/download/report.pdf")
        .add_header(USER_HEADER, user("u1"))
        .add_query_param("versionId", &new_id)
        .await
        .json();
    assert_eq!(link["versionId"], new_id.as_str());

    let download = follow(&server, link["url"].as_str().unwrap()).await;
    download.assert_status_ok();
    assert_eq!(download.as_bytes().as_ref(), b"first");
    assert_eq!(download.header("x-version-id"), new_id.as_str());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let server = setup_test_server().await;
    upload(&server, "u1", "a.txt", b"bytes").await;

    for _ in 0..2 {
        let response = server
            .delete("/api/files/delete/a.txt")
            .add_header(USER_HEADER, user("u1"))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "File deleted successfully");
        assert_eq!(body["deleted"], true);
        assert_eq!(body["fileName"], "a.txt");
    }

    let list: Value = server
        .get("/api/files/list")
        .add_header(USER_HEADER, user("u1"))
        .await
        .json();
    assert_eq!(list["count"], 0);

    let link = server
        .get("/api/files/download/a.txt")
        .add_header(USER_HEADER, user("u1"))
        .await;
    link.assert_status_not_found();
    let body: Value = link.json();
    assert_eq!(body["error"], "NotFound");
    assert_eq!(body["details"]["key"], "u1/a.txt");
}

#[tokio::test]
async fn test_upload_without_file_is_400() {
    let server = setup_test_server().await;

    let response = server
        .post("/api/files/upload")
        .add_header(USER_HEADER, user("u1"))
        .multipart(MultipartForm::new().add_text("note", "no file here"))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "ValidationError");
    assert_eq!(body["message"], "No file provided in request");
}

#[tokio::test]
async fn test_oversized_upload_is_400() {
    let services = AppBuilder::new()
        .with_file_service_config(FileServiceConfig {
            max_upload_bytes: 1024,
            ..Default::default()
        })
        .with_http_config(HttpConfig {
            max_upload_bytes: 1024,
            ..Default::default()
        })
        .build()
        .await
        .unwrap();
    let server = TestServer::new(services.router()).unwrap();

    let response = server
        .post("/api/files/upload")
        .add_header(USER_HEADER, user("u1"))
        .multipart(file_form("big.bin", "application/octet-stream", &[7u8; 4096]))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("File size exceeds"));
}

#[tokio::test]
async fn test_unknown_version_is_404() {
    let server = setup_test_server().await;
    upload(&server, "u1", "a.txt", b"bytes").await;

    let response = server
        .post("/api/files/restore/a.txt/does-not-exist")
        .add_header(USER_HEADER, user("u1"))
        .await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["details"]["versionId"], "does-not-exist");
}

#[tokio::test]
async fn test_tampered_link_is_403() {
    let server = setup_test_server().await;
    upload(&server, "u1", "a.txt", b"private").await;

    let link: Value = server
        .get("/api/files/download/a.txt")
        .add_header(USER_HEADER, user("u1"))
        .await
        .json();
    let url = link["url"].as_str().unwrap().replace("/downloads/u1/", "/downloads/u2/");

    let response = follow(&server, &url).await;
    response.assert_status_forbidden();
    let body: Value = response.json();
    assert_eq!(body["error"], "InvalidDownloadLink");

    let unsigned = server.get("/downloads/u1/a.txt").await;
    unsigned.assert_status_forbidden();
}

#[tokio::test]
async fn test_overlong_file_name_is_400() {
    let server = setup_test_server().await;
    let name = "n".repeat(300);

    let upload = server
        .post("/api/files/upload")
        .add_header(USER_HEADER, user("u1"))
        .multipart(file_form(&name, "text/plain", b"bytes"))
        .await;
    upload.assert_status_bad_request();
    let body: Value = upload.json();
    assert_eq!(body["error"], "ValidationError");

    let link = server
        .get(&format!("/api/files/download/{}", name))
        .add_header(USER_HEADER, user("u1"))
        .await;
    link.assert_status_bad_request();
}
