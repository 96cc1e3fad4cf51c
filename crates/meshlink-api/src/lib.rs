//! meshlink HTTP API
//!
//! Upload an OBJ mesh, get it repaired and re-oriented, and download the result as
//! OBJ, STL or 3MF through an expiring link.

mod api_doc;
pub mod constants;
mod handlers;
mod services;
pub mod setup;
mod utils;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError, PlainTextError};
