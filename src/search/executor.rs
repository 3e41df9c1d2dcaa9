//! Search execution against the course index

use super::models::SearchResponse;
use crate::error::Result;
use crate::index::CourseIndex;
use crate::query::{QueryBuilder, SearchFilters, StructuredQuery};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Executes structured queries against a shared index handle
#[derive(Clone)]
pub struct SearchExecutor {
    index: Arc<dyn CourseIndex>,
}

impl SearchExecutor {
    /// Create a new executor over an index handle
    pub fn new(index: Arc<dyn CourseIndex>) -> Self {
        Self { index }
    }

    /// The index this executor queries
    pub fn index(&self) -> &Arc<dyn CourseIndex> {
        &self.index
    }

    /// Execute a structured query.
    ///
    /// Index failures are returned as-is: no retry, no partial page.
    pub async fn execute(&self, query: &StructuredQuery) -> Result<SearchResponse> {
        let start = Instant::now();

        debug!(
            "Executing query with {} clauses on {} index",
            query.clauses.len(),
            self.index.name()
        );

        match self.index.search(query).await {
            Ok(hits) => {
                info!(
                    "Search matched {} courses, returning {} in {:?}",
                    hits.total,
                    hits.courses.len(),
                    start.elapsed()
                );
                Ok(SearchResponse::from(hits))
            }
            Err(e) => {
                warn!("Search failed on {} index: {}", self.index.name(), e);
                Err(e)
            }
        }
    }

    /// Build and execute the query for a filter set
    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchResponse> {
        self.execute(&QueryBuilder::build(filters)).await
    }

    /// Every course in default order, without a page cap
    pub async fn list_all(&self) -> Result<SearchResponse> {
        self.execute(&StructuredQuery::match_all()).await
    }
}
