//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use cowatch_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cowatch API",
        version = "0.1.0",
        description = "Video upload, catalog and streaming API. Bytes live in object storage, metadata in PostgreSQL. Versioned endpoints are under /api/v1/."
    ),
    paths(
        handlers::info::root,
        handlers::info::api_status,
        handlers::videos::upload_video,
        handlers::videos::list_videos,
        handlers::videos::stream_video,
        handlers::videos::delete_video,
    ),
    components(
        schemas(
            models::VideoResponse,
            handlers::videos::MessageResponse,
            handlers::info::ServiceInfo,
            handlers::info::StatusResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "videos", description = "Video upload, listing, streaming and deletion"),
        (name = "info", description = "Service information and status")
    )
)]
pub struct ApiDoc;
