//! HTTP surface: a single server-rendered page with a lodging picker, the visitor's
//! transcript and a question box.

pub mod error;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod sessions;
pub mod state;

pub use error::WebError;
pub use routes::create_router;
pub use state::AppState;
