pub mod info;
pub mod videos;
