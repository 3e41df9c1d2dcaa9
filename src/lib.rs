//! Course Search: faceted search over course records
//!
//! Turns optional search filters into a structured query, runs it against
//! an external document index and returns a paginated response envelope.

pub mod config;
pub mod courses;
pub mod error;
pub mod index;
pub mod provision;
pub mod query;
pub mod search;
pub mod web;

pub use config::Settings;
pub use courses::CourseRecord;
pub use error::SearchError;
pub use index::{CourseIndex, IndexHits};
pub use query::{QueryBuilder, SearchFilters, SortMode, StructuredQuery};
pub use search::{SearchExecutor, SearchResponse};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
