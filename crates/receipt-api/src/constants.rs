//! API constants

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version
pub const API_VERSION: &str = "v0";

/// Versioned prefix for all resource routes
pub const API_PREFIX: &str = "/api/v0";

/// Extra room allowed in a request body on top of the image itself
/// (form fields and multipart boundaries)
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
