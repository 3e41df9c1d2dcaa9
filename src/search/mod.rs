//! Search execution module
//!
//! Runs structured queries against the course index and shapes the
//! results into the paginated response envelope.

mod executor;
mod models;

pub use executor::SearchExecutor;
pub use models::SearchResponse;
