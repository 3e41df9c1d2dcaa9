//! Settings structures for the course search service

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub index: IndexSettings,
    pub search: SearchSettings,
    pub provisioning: ProvisioningSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (COURSE_SEARCH_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("COURSE_SEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("COURSE_SEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("COURSE_SEARCH_INDEX_BACKEND") {
            if let Some(backend) = IndexBackend::parse(&val) {
                self.index.backend = backend;
            }
        }
        if let Some(val) = lookup("COURSE_SEARCH_INDEX_URL") {
            self.index.url = val;
        }
        if let Some(val) = lookup("COURSE_SEARCH_INDEX_NAME") {
            self.index.index_name = val;
        }
        if let Some(val) = lookup("COURSE_SEARCH_DATA_PATH") {
            self.provisioning.data_path = PathBuf::from(val);
        }
        if let Some(val) = lookup("COURSE_SEARCH_PROVISION") {
            self.provisioning.enabled = val.parse().unwrap_or(self.provisioning.enabled);
        }
    }

    /// Reject combinations the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.search.max_page_size == 0 {
            bail!("search.max_page_size must be at least 1");
        }
        if self.search.default_page_size == 0
            || self.search.default_page_size > self.search.max_page_size
        {
            bail!(
                "search.default_page_size must be between 1 and {}",
                self.search.max_page_size
            );
        }
        if self.index.index_name.trim().is_empty() {
            bail!("index.index_name must not be empty");
        }
        if self.index.timeout_secs <= 0.0 {
            bail!("index.timeout_secs must be positive");
        }
        if self.server.request_timeout_secs == 0 {
            bail!("server.request_timeout_secs must be positive");
        }
        Ok(())
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Upper bound for a whole request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Which index implementation to talk to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexBackend {
    /// Elasticsearch-compatible HTTP API
    #[default]
    Elasticsearch,
    /// In-process index, contents lost on restart
    Memory,
}

impl IndexBackend {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "elasticsearch" | "elastic" | "opensearch" => Some(Self::Elasticsearch),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// External index connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub backend: IndexBackend,
    /// Base URL of the index HTTP API
    pub url: String,
    /// Name of the course index
    pub index_name: String,
    /// Per-call timeout in seconds
    pub timeout_secs: f64,
    /// Idle connections kept per host
    pub pool_max_idle: usize,
    /// Basic auth user
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
    /// Result cap for unpaginated listings
    pub max_result_window: u64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            backend: IndexBackend::default(),
            url: "http://localhost:9200".to_string(),
            index_name: "courses".to_string(),
            timeout_secs: 5.0,
            pool_max_idle: 20,
            username: None,
            password: None,
            max_result_window: 10_000,
        }
    }
}

/// Search request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Page size when the caller gives none
    pub default_page_size: u32,
    /// Largest page size a caller may request
    pub max_page_size: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_page_size: crate::query::DEFAULT_PAGE_SIZE,
            max_page_size: 100,
        }
    }
}

/// Startup data loading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningSettings {
    /// Run provisioning before serving
    pub enabled: bool,
    /// Drop and recreate the index first
    pub recreate: bool,
    /// JSON array of course records to load
    pub data_path: PathBuf,
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            recreate: true,
            data_path: PathBuf::from("data/sample-courses.json"),
        }
    }
}
