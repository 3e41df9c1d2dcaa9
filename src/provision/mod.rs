//! Startup provisioning
//!
//! Prepares the course index before the server accepts traffic: ensures
//! the index exists (optionally dropping it first) and bulk-loads the
//! bundled course data. The search path never depends on when, or whether,
//! this ran.

use crate::config::ProvisioningSettings;
use crate::courses::CourseRecord;
use crate::index::CourseIndex;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info};

/// Outcome of a provisioning run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Records read from the data file
    pub loaded: usize,
    /// Records the index accepted
    pub indexed: usize,
}

/// One-time index provisioner
pub struct Provisioner<'a> {
    index: &'a dyn CourseIndex,
    settings: &'a ProvisioningSettings,
}

impl<'a> Provisioner<'a> {
    pub fn new(index: &'a dyn CourseIndex, settings: &'a ProvisioningSettings) -> Self {
        Self { index, settings }
    }

    /// Ensure the index and load the data file.
    ///
    /// Index lifecycle failures are returned. An unreadable data file is
    /// logged and leaves the index empty.
    pub async fn run(&self) -> Result<ProvisionReport> {
        info!("Starting course data provisioning on {} index", self.index.name());

        self.index
            .ensure_index(self.settings.recreate)
            .await
            .context("failed to prepare course index")?;

        let courses = match load_courses(&self.settings.data_path) {
            Ok(courses) => courses,
            Err(e) => {
                error!("Failed to read course data: {:#}", e);
                return Ok(ProvisionReport::default());
            }
        };
        info!(
            "Loaded {} courses from {}",
            courses.len(),
            self.settings.data_path.display()
        );

        let indexed = self
            .index
            .bulk_index(&courses)
            .await
            .context("failed to index course data")?;
        info!("Indexed {} courses", indexed);

        Ok(ProvisionReport {
            loaded: courses.len(),
            indexed,
        })
    }
}

/// Read a JSON array of course records
pub fn load_courses(path: &Path) -> Result<Vec<CourseRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let courses: Vec<CourseRecord> = serde_json::from_str(&content)
        .with_context(|| format!("invalid course data in {}", path.display()))?;
    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;
    use crate::query::StructuredQuery;
    use std::path::PathBuf;

    fn bundled_data() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample-courses.json")
    }

    #[test]
    fn test_bundled_data_parses() {
        let courses = load_courses(&bundled_data()).unwrap();
        assert!(courses.len() >= 10);
        let mut ids: Vec<&str> = courses.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), courses.len());
    }

    #[tokio::test]
    async fn test_run_loads_index() {
        let index = MemoryIndex::new();
        let settings = ProvisioningSettings {
            data_path: bundled_data(),
            ..ProvisioningSettings::default()
        };

        let report = Provisioner::new(&index, &settings).run().await.unwrap();
        assert!(report.loaded > 0);
        assert_eq!(report.loaded, report.indexed);

        let hits = index.search(&StructuredQuery::match_all()).await.unwrap();
        assert_eq!(hits.total as usize, report.loaded);
    }

    #[tokio::test]
    async fn test_recreate_replaces_previous_data() {
        let index = MemoryIndex::with_records(crate::courses::fixtures::sample_courses());
        let settings = ProvisioningSettings {
            data_path: bundled_data(),
            recreate: true,
            ..ProvisioningSettings::default()
        };

        let report = Provisioner::new(&index, &settings).run().await.unwrap();
        assert_eq!(index.count().await.unwrap() as usize, report.indexed);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_fatal() {
        let index = MemoryIndex::new();
        let settings = ProvisioningSettings {
            data_path: PathBuf::from("does/not/exist.json"),
            ..ProvisioningSettings::default()
        };

        let report = Provisioner::new(&index, &settings).run().await.unwrap();
        assert_eq!(report, ProvisionReport::default());
        assert_eq!(index.count().await.unwrap(), 0);
    }
}
