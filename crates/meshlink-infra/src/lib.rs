//! Shared infrastructure for the meshlink HTTP service:
//! - Middleware (request ID, security headers)
//! - Telemetry initialization
//! - Error response body

pub mod error;
pub mod middleware;
pub mod telemetry;

pub use error::ErrorResponse;
pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, RequestId,
    SecurityHeadersConfig,
};
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};
