//! Web server module
//!
//! Provides the HTTP API for course search.

mod error;
mod handlers;
mod params;
mod routes;
mod state;

pub use params::SearchParams;
pub use routes::create_router;
pub use state::AppState;
