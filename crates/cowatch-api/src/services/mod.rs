pub mod video_lifecycle;
