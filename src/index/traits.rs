//! Index traits and types

use crate::courses::CourseRecord;
use crate::error::Result;
use crate::query::StructuredQuery;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Page of matched records plus the total match count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexHits {
    /// Number of matches ignoring pagination
    pub total: u64,
    /// The requested page, in sort order
    pub courses: Vec<CourseRecord>,
}

impl IndexHits {
    pub fn new(total: u64, courses: Vec<CourseRecord>) -> Self {
        Self { total, courses }
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

/// External document index holding course records.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait CourseIndex: Send + Sync {
    /// Backend name, for logs and health output
    fn name(&self) -> &str;

    /// Run a structured query. Filtering, sorting and pagination all
    /// happen on the index side.
    async fn search(&self, query: &StructuredQuery) -> Result<IndexHits>;

    /// Number of stored records
    async fn count(&self) -> Result<u64>;

    /// Make sure the index exists with the course mapping.
    /// With `recreate`, an existing index is dropped first.
    async fn ensure_index(&self, recreate: bool) -> Result<()>;

    /// Store records, returning how many were accepted
    async fn bulk_index(&self, courses: &[CourseRecord]) -> Result<usize>;
}
