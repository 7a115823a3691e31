//! API constants

/// Version segment of every versioned route.
pub const API_VERSION: &str = "v1";

/// Path prefix for versioned routes (e.g. `/api/v1`).
pub const API_PREFIX: &str = "/api/v1";

/// Headroom on top of the raw file limit for multipart boundaries and the title field.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
