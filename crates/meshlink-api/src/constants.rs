//! API path constants

/// Prefix of every JSON/file endpoint.
pub const API_PREFIX: &str = "/api";

/// Multipart field carrying the uploaded mesh.
pub const UPLOAD_FIELD: &str = "file";

/// Extension accepted by the upload endpoints.
pub const UPLOAD_EXTENSION: &str = "obj";

/// Suffix appended to the original file stem to build download names.
pub const REPAIRED_SUFFIX: &str = "_repaired";

/// Headroom on top of the file size limit for multipart framing.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
