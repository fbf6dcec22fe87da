//! End-to-end tests of the editor route.
//!
//! Run with: `cargo test -p inkwell-api --test dispatcher_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use helpers::{envelope, setup_test_app, HANDLER};

fn image_part(name: &str, data: &'static [u8]) -> Part {
    Part::bytes(Bytes::from_static(data))
        .file_name(name)
        .mime_type("application/octet-stream")
}

#[tokio::test]
async fn test_config_action_returns_client_settings() {
    let app = setup_test_app(&[("IMAGE_URL_PREFIX", "https://cdn.example")]).await;

    let response = app
        .client()
        .get(HANDLER)
        .add_query_param("action", "config")
        .await;

    assert_eq!(response.status_code(), 200);
    let body = envelope(&response.text());
    assert_eq!(body["imageActionName"], "uploadimage");
    assert_eq!(body["imageFieldName"], "upfile");
    assert_eq!(body["imageUrlPrefix"], "https://cdn.example");
    assert_eq!(body["catcherActionName"], "catchimage");
    assert_eq!(body["imageManagerListSize"], 20);
}

#[tokio::test]
async fn test_upload_image_stores_file() {
    let app = setup_test_app(&[("IMAGE_PATH_FORMAT", "upload/image/{filename}{rand:4}")]).await;

    let form = MultipartForm::new().add_part("upfile", image_part("cat.png", b"abc"));
    let response = app
        .client()
        .post(HANDLER)
        .add_query_param("action", "uploadimage")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "text/plain; charset=utf-8"
    );
    let body = envelope(&response.text());
    assert_eq!(body["state"], "SUCCESS");
    assert_eq!(body["original"], "cat.png");
    assert_eq!(body["title"], "cat.png");
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("upload/image/cat"));
    assert!(url.ends_with(".png"));
    assert_eq!(std::fs::read(app.root().join(url)).unwrap(), b"abc");
}

#[tokio::test]
async fn test_upload_keeps_checked_extension() {
    let app = setup_test_app(&[("IMAGE_PATH_FORMAT", "upload/image/{filename}")]).await;

    let form = MultipartForm::new().add_part("upfile", image_part("a.exe..png", b"abc"));
    let response = app
        .client()
        .post(HANDLER)
        .add_query_param("action", "uploadimage")
        .multipart(form)
        .await;

    let body = envelope(&response.text());
    assert_eq!(body["state"], "SUCCESS");
    assert_eq!(body["url"], "upload/image/a.exe.png");
    assert!(app.root().join("upload/image/a.exe.png").is_file());
}

#[tokio::test]
async fn test_upload_image_rejects_type() {
    let app = setup_test_app(&[]).await;

    let form = MultipartForm::new().add_part("upfile", image_part("run.exe", b"MZ"));
    let response = app
        .client()
        .post(HANDLER)
        .add_query_param("action", "uploadimage")
        .multipart(form)
        .await;

    let body = envelope(&response.text());
    assert_eq!(body["state"], "The file format is not allowed on this server.");
    assert!(body["url"].is_null());
    assert_eq!(std::fs::read_dir(app.root()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_file_size_limit() {
    let app = setup_test_app(&[("FILE_MAX_SIZE", "4")]).await;

    let form = MultipartForm::new().add_part("upfile", image_part("notes.txt", b"four"));
    let response = app
        .client()
        .post(HANDLER)
        .add_query_param("action", "uploadfile")
        .multipart(form)
        .await;

    let body = envelope(&response.text());
    assert_eq!(body["state"], "The file size exceeds the server limits.");
}

#[tokio::test]
async fn test_upload_scrawl_decodes_base64() {
    let app = setup_test_app(&[("SCRAWL_PATH_FORMAT", "upload/scrawl/{filename}")]).await;
    let payload = STANDARD.encode(b"\x89PNG scrawl");

    let response = app
        .client()
        .post(HANDLER)
        .add_query_param("action", "uploadscrawl")
        .form(&[("upfile", payload.as_str())])
        .await;

    let body = envelope(&response.text());
    assert_eq!(body["state"], "SUCCESS");
    assert_eq!(body["original"], "scrawl.png");
    assert_eq!(body["url"], "upload/scrawl/scrawl.png");
    assert_eq!(
        std::fs::read(app.root().join("upload/scrawl/scrawl.png")).unwrap(),
        b"\x89PNG scrawl"
    );
}

#[tokio::test]
async fn test_list_images_pages() {
    let app = setup_test_app(&[("IMAGE_MANAGER_LIST_SIZE", "2")]).await;
    let images = app.root().join("upload/image/day");
    std::fs::create_dir_all(&images).unwrap();
    for name in ["a.png", "b.png", "c.png", "readme.txt"] {
        std::fs::write(images.join(name), b"x").unwrap();
    }

    let response = app
        .client()
        .get(HANDLER)
        .add_query_param("action", "listimage")
        .add_query_param("start", "1")
        .await;

    let body = envelope(&response.text());
    assert_eq!(body["state"], "SUCCESS");
    assert_eq!(body["start"], 1);
    assert_eq!(body["size"], 2);
    assert_eq!(body["total"], 3);
    assert_eq!(
        body["list"],
        serde_json::json!([
            { "url": "upload/image/day/b.png" },
            { "url": "upload/image/day/c.png" }
        ])
    );
}

#[tokio::test]
async fn test_list_files_reports_missing_path() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .get(HANDLER)
        .add_query_param("action", "listfile")
        .await;

    let body = envelope(&response.text());
    assert_eq!(body["state"], "Path not found.");
    assert!(body["list"].is_null());
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_list_rejects_invalid_paging() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .get(HANDLER)
        .add_query_param("action", "listimage")
        .add_query_param("start", "first")
        .await;

    let body = envelope(&response.text());
    assert_eq!(body["state"], "Invalid parameter.");
}

#[tokio::test]
async fn test_catch_image_without_source() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .post(HANDLER)
        .add_query_param("action", "catchimage")
        .form(&[("other", "value")])
        .await;

    let body = envelope(&response.text());
    assert_eq!(
        body["state"],
        "Invalid parameter: the source to fetch is not set."
    );
}

#[tokio::test]
async fn test_catch_image_fetches_sources() {
    let mut remote = mockito::Server::new_async().await;
    remote
        .mock("GET", "/photo.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(b"jpeg-bytes")
        .create_async()
        .await;
    remote
        .mock("GET", "/gone.jpg")
        .with_status(404)
        .create_async()
        .await;
    let app = setup_test_app(&[("CATCHER_PATH_FORMAT", "upload/remote/{filename}")]).await;

    let found = format!("{}/photo.jpg", remote.url());
    let gone = format!("{}/gone.jpg", remote.url());
    let response = app
        .client()
        .post(HANDLER)
        .add_query_param("action", "catchimage")
        .form(&[("source[]", found.as_str()), ("source[]", gone.as_str())])
        .await;

    let body = envelope(&response.text());
    assert_eq!(body["state"], "SUCCESS");
    let list = body["list"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["state"], "SUCCESS");
    assert_eq!(list[0]["source"], found);
    assert_eq!(list[0]["url"], "upload/remote/photo.jpg");
    assert_eq!(list[1]["state"], "Url returns 404, Not Found");
    assert_eq!(list[1]["source"], gone);
    assert!(list[1]["url"].is_null());
    assert_eq!(
        std::fs::read(app.root().join("upload/remote/photo.jpg")).unwrap(),
        b"jpeg-bytes"
    );
}

#[tokio::test]
async fn test_unsupported_action() {
    let app = setup_test_app(&[]).await;

    for request in [
        app.client().get(HANDLER).add_query_param("action", "deleteimage"),
        app.client().get(HANDLER),
    ] {
        let response = request.await;
        assert_eq!(response.status_code(), 200);
        let body = envelope(&response.text());
        assert_eq!(body["state"], "Parameter 'action' is null or unsupported.");
    }
}

#[tokio::test]
async fn test_jsonp_callback_wraps_envelope() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .get(HANDLER)
        .add_query_param("action", "unknown")
        .add_query_param("callback", "jQuery_1.done")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "application/javascript; charset=utf-8"
    );
    assert_eq!(
        response.text(),
        r#"jQuery_1.done({"state":"Parameter 'action' is null or unsupported."});"#
    );
}

#[tokio::test]
async fn test_invalid_callback_is_rejected() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .get(HANDLER)
        .add_query_param("action", "config")
        .add_query_param("callback", "alert(1)")
        .await;

    assert_eq!(response.status_code(), 400);
    let body = envelope(&response.text());
    assert_eq!(body["state"], "callback parameter is invalid.");
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = setup_test_app(&[]).await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(envelope(&response.text())["status"], "alive");
    assert!(response.maybe_header("x-request-id").is_some());
}
