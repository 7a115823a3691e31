//! HTTP tests for the video endpoints.

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use cowatch_core::VideoResponse;
use helpers::fixtures::{fake_mp4, fake_video};
use helpers::{api_path, setup_test_app, setup_test_app_with, MEDIA_BASE_URL};
use serde_json::Value;
use std::sync::atomic::Ordering;

fn video_form(data: Vec<u8>, filename: &str, mime: &str) -> MultipartForm {
    let part = Part::bytes(Bytes::from(data))
        .file_name(filename.to_string())
        .mime_type(mime.to_string());
    MultipartForm::new().add_part("video", part)
}

#[tokio::test]
async fn test_upload_scenario_a_mp4() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post(&api_path("/videos/upload"))
        .multipart(video_form(fake_mp4(), "a.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    let id = body["id"].as_i64().expect("id");
    assert_eq!(body["title"], "a");
    assert_eq!(body["size"], 10);
    assert_eq!(body["contentType"], "video/mp4");
    assert_eq!(body["url"], format!("/api/v1/videos/stream/{}", id));
    assert!(body["uploadedAt"].is_string());
}

#[tokio::test]
async fn test_upload_with_title_field() {
    let app = setup_test_app().await;

    let form = video_form(fake_mp4(), "clip.final.mov", "video/quicktime")
        .add_text("title", "Season finale");
    let response = app
        .server
        .post(&api_path("/videos/upload"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let video: VideoResponse = response.json();
    assert_eq!(video.title, "Season finale");
}

#[tokio::test]
async fn test_upload_non_video_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post(&api_path("/videos/upload"))
        .multipart(video_form(fake_mp4(), "a.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(app.storage.put_count(), 0);
    assert_eq!(app.repository.len(), 0);
}

#[tokio::test]
async fn test_upload_without_video_field_is_bad_request() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("title", "nothing attached");
    let response = app
        .server
        .post(&api_path("/videos/upload"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No video file provided");
}

#[tokio::test]
async fn test_upload_non_multipart_body_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post(&api_path("/videos/upload"))
        .text("not a form")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_over_limit_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post(&api_path("/videos/upload"))
        .multipart(video_form(fake_video(2 * 1024 * 1024), "big.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.repository.len(), 0);
}

#[tokio::test]
async fn test_upload_storage_failure_is_server_error() {
    let app = setup_test_app().await;
    app.storage.fail_put.store(true, Ordering::SeqCst);

    let response = app
        .server
        .post(&api_path("/videos/upload"))
        .multipart(video_form(fake_mp4(), "a.mp4", "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_WRITE_ERROR");
    assert!(body.get("details").is_none());
    assert_eq!(app.repository.len(), 0);
}

#[tokio::test]
async fn test_list_videos() {
    let app = setup_test_app().await;

    let empty = app.server.get(&api_path("/videos/")).await;
    assert_eq!(empty.status_code(), StatusCode::OK);
    assert_eq!(empty.json::<Vec<VideoResponse>>().len(), 0);

    for name in ["one.mp4", "two.mp4"] {
        app.server
            .post(&api_path("/videos/upload"))
            .multipart(video_form(fake_mp4(), name, "video/mp4"))
            .await;
    }

    let listed: Vec<VideoResponse> = app.server.get(&api_path("/videos")).await.json();
    let titles: Vec<&str> = listed.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "two"]);
}

#[tokio::test]
async fn test_list_failure_is_server_error() {
    let app = setup_test_app().await;
    app.repository.fail_list.store(true, Ordering::SeqCst);

    let response = app.server.get(&api_path("/videos/")).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "METADATA_READ_ERROR");
}

#[tokio::test]
async fn test_stream_redirects_to_served_file() {
    let app = setup_test_app().await;
    let data = fake_video(64);

    let video: VideoResponse = app
        .server
        .post(&api_path("/videos/upload"))
        .multipart(video_form(data.clone(), "a.mp4", "video/mp4"))
        .await
        .json();

    let response = app.server.get(&video.url).await;
    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);

    let location = response.header("location");
    let location = location.to_str().expect("location header");
    assert!(location.starts_with(&format!("{}/videos/", MEDIA_BASE_URL)));
    assert!(location.ends_with(".mp4"));

    let served_path = location.trim_start_matches("http://localhost:8080");
    let served = app.server.get(served_path).await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(served.as_bytes().as_ref(), data.as_slice());
}

#[tokio::test]
async fn test_stream_unknown_id_is_not_found() {
    let app = setup_test_app().await;

    let response = app.server.get(&api_path("/videos/stream/12345")).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Video not found");
}

#[tokio::test]
async fn test_bad_id_is_bad_request() {
    let app = setup_test_app().await;

    let stream = app.server.get(&api_path("/videos/stream/abc")).await;
    assert_eq!(stream.status_code(), StatusCode::BAD_REQUEST);

    let delete = app.server.delete(&api_path("/videos/abc")).await;
    assert_eq!(delete.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = delete.json();
    assert_eq!(body["error"], "Invalid video ID");
}

#[tokio::test]
async fn test_error_details_shown_outside_production() {
    let app = setup_test_app().await;

    let response = app.server.get(&api_path("/videos/stream/abc")).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error_type"], "InvalidInput");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_error_details_hidden_in_production() {
    let app = setup_test_app_with(&[("ENVIRONMENT", "production")]).await;

    let response = app.server.get(&api_path("/videos/stream/abc")).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body.get("details").is_none());
    assert!(body.get("error_type").is_none());
}

#[tokio::test]
async fn test_delete_twice() {
    let app = setup_test_app().await;
    let video: VideoResponse = app
        .server
        .post(&api_path("/videos/upload"))
        .multipart(video_form(fake_mp4(), "a.mp4", "video/mp4"))
        .await
        .json();
    let path = api_path(&format!("/videos/{}", video.id));

    let first = app.server.delete(&path).await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let body: Value = first.json();
    assert_eq!(body["message"], "Video deleted successfully");

    let second = app.server.delete(&path).await;
    assert_eq!(second.status_code(), StatusCode::NOT_FOUND);

    let stream = app.server.get(&video.url).await;
    assert_eq!(stream.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_ok_when_blob_cleanup_fails() {
    let app = setup_test_app().await;
    let video: VideoResponse = app
        .server
        .post(&api_path("/videos/upload"))
        .multipart(video_form(fake_mp4(), "a.mp4", "video/mp4"))
        .await
        .json();
    app.storage.fail_delete.store(true, Ordering::SeqCst);

    let response = app
        .server
        .delete(&api_path(&format!("/videos/{}", video.id)))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(app.repository.len(), 0);
}

#[tokio::test]
async fn test_health_and_info_endpoints() {
    let app = setup_test_app().await;

    let health = app.server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");

    let status: Value = app.server.get(&api_path("/status")).await.json();
    assert_eq!(status["storage_backend"], "local");
    assert_eq!(status["metadata_backend"], "flaky-memory");

    let root: Value = app.server.get("/").await.json();
    assert_eq!(root["name"], "cowatch-api");

    let openapi = app.server.get("/api/openapi.json").await;
    assert_eq!(openapi.status_code(), StatusCode::OK);
    let spec: Value = openapi.json();
    assert!(spec["paths"]["/api/v1/videos/upload"].is_object());
}
