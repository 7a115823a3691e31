//! Database repositories for data access layer
//
// Video metadata repositories (PostgreSQL and in-memory)
pub mod video;

pub use video::{
    create_video_repository, InMemoryVideoRepository, PostgresVideoRepository,
    PostgresVideoRepository as VideoRepository, VideoRepositoryTrait,
};
