use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_video_upload;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use cowatch_core::{AppError, VideoResponse};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_video_id(raw: &str) -> Result<i64, HttpAppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| HttpAppError(AppError::InvalidInput("Invalid video ID".to_string())))
}

#[utoipa::path(
    post,
    path = "/api/v1/videos/upload",
    tag = "videos",
    request_body(
        content_type = "multipart/form-data",
        description = "Field `video` holds the file, optional field `title` overrides the title"
    ),
    responses(
        (status = 201, description = "Video uploaded", body = VideoResponse),
        (status = 400, description = "Not a video or malformed form", body = ErrorResponse),
        (status = 500, description = "Storage or metadata failure", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload = extract_video_upload(multipart?).await?;
    let video = state.videos.upload(upload).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    get,
    path = "/api/v1/videos",
    tag = "videos",
    responses(
        (status = 200, description = "All videos, oldest first", body = Vec<VideoResponse>),
        (status = 500, description = "Metadata failure", body = ErrorResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.videos.list().await?;
    Ok(Json(videos))
}

#[utoipa::path(
    get,
    path = "/api/v1/videos/stream/{id}",
    tag = "videos",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 307, description = "Redirect to a time-limited video URL"),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "URL generation failure", body = ErrorResponse)
    )
)]
pub async fn stream_video(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Redirect, HttpAppError> {
    let id = parse_video_id(&id)?;
    let url = state.videos.stream(id).await?;
    Ok(Redirect::temporary(&url))
}

#[utoipa::path(
    delete,
    path = "/api/v1/videos/{id}",
    tag = "videos",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video deleted", body = MessageResponse),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Metadata failure", body = ErrorResponse)
    )
)]
pub async fn delete_video(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    let id = parse_video_id(&id)?;
    state.videos.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Video deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_id() {
        assert_eq!(parse_video_id("42").ok(), Some(42));
        assert!(parse_video_id("abc").is_err());
        assert!(parse_video_id("4.2").is_err());
        assert!(parse_video_id("").is_err());
    }
}
