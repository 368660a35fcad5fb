//! SnapStory HTTP surface.
//!
//! A single upload endpoint that turns a photo into a bilingual story, plus a
//! health check. Every response carries CORS headers.

pub mod cors;
pub mod error;
pub mod health;
pub mod server;
pub mod upload;

pub use cors::resolve_cors_origin;
pub use error::ApiError;
pub use server::{AppState, build_router, start_server};
