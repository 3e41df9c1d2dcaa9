//! Application state shared across handlers

use crate::config::Settings;
use crate::index::CourseIndex;
use crate::search::SearchExecutor;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search executor over the shared index handle
    pub executor: SearchExecutor,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, index: Arc<dyn CourseIndex>) -> Self {
        Self {
            settings: Arc::new(settings),
            executor: SearchExecutor::new(index),
        }
    }

    /// Name of the index backend in use
    pub fn index_name(&self) -> &str {
        self.executor.index().name()
    }
}
