//! Cowatch API Library
//!
//! HTTP handlers, the video lifecycle service and application setup.

mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
mod telemetry;
mod utils;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::video_lifecycle::{LifecycleOptions, VideoLifecycleService, VideoUpload};
