//! Index loader for selecting the backend from configuration

use super::elastic::ElasticIndex;
use super::memory::MemoryIndex;
use super::traits::CourseIndex;
use crate::config::{IndexBackend, IndexSettings};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Loader for building the shared index handle
pub struct IndexLoader;

impl IndexLoader {
    /// Build the configured index backend
    pub fn load(settings: &IndexSettings) -> Result<Arc<dyn CourseIndex>> {
        let index: Arc<dyn CourseIndex> = match settings.backend {
            IndexBackend::Elasticsearch => {
                info!(
                    "Using Elasticsearch index '{}' at {}",
                    settings.index_name, settings.url
                );
                Arc::new(ElasticIndex::with_settings(settings)?)
            }
            IndexBackend::Memory => {
                info!("Using in-memory index");
                Arc::new(MemoryIndex::new())
            }
        };
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_backends() {
        let memory = IndexLoader::load(&IndexSettings {
            backend: IndexBackend::Memory,
            ..IndexSettings::default()
        })
        .unwrap();
        assert_eq!(memory.name(), "memory");

        let elastic = IndexLoader::load(&IndexSettings::default()).unwrap();
        assert_eq!(elastic.name(), "elasticsearch");
    }

    #[test]
    fn test_bad_url_fails() {
        let result = IndexLoader::load(&IndexSettings {
            url: "not a url".to_string(),
            ..IndexSettings::default()
        });
        assert!(result.is_err());
    }
}
