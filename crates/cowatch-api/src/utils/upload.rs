//! Multipart extraction for video uploads

use axum::extract::Multipart;
use cowatch_core::AppError;

use crate::services::video_lifecycle::VideoUpload;

const VIDEO_FIELD: &str = "video";
const TITLE_FIELD: &str = "title";

/// Read the `video` file field and the optional `title` text field.
///
/// Only one `video` field is accepted. Unknown fields are skipped.
pub async fn extract_video_upload(mut multipart: Multipart) -> Result<VideoUpload, AppError> {
    let mut upload: Option<VideoUpload> = None;
    let mut title: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::InvalidInput(format!("File too large or invalid form data: {}", e))
    })? {
        match field.name() {
            Some(VIDEO_FIELD) => {
                if upload.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple video fields are not allowed; send exactly one field named 'video'"
                            .to_string(),
                    ));
                }
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("File too large or invalid form data: {}", e))
                })?;

                upload = Some(VideoUpload {
                    filename,
                    content_type,
                    title: None,
                    data,
                });
            }
            Some(TITLE_FIELD) => {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Invalid title field: {}", e))
                })?;
                title = Some(value);
            }
            _ => {}
        }
    }

    let mut upload =
        upload.ok_or_else(|| AppError::InvalidInput("No video file provided".to_string()))?;
    upload.title = title;
    Ok(upload)
}
