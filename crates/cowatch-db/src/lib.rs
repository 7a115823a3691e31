//! Cowatch database layer
//!
//! Repositories over the `uploaded_videos` table, plus a process-local
//! implementation with the same semantics.

pub mod db;

pub use db::*;
