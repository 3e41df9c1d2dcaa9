//! Search response envelope

use crate::courses::CourseRecord;
use crate::index::IndexHits;
use serde::{Deserialize, Serialize};

/// Paginated search result returned to callers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Number of matching courses across all pages
    pub total: u64,
    /// Courses on the requested page, in sort order
    pub courses: Vec<CourseRecord>,
}

impl SearchResponse {
    pub fn new(total: u64, courses: Vec<CourseRecord>) -> Self {
        Self { total, courses }
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl From<IndexHits> for SearchResponse {
    fn from(hits: IndexHits) -> Self {
        Self::new(hits.total, hits.courses)
    }
}
