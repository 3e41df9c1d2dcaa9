//! Elasticsearch-compatible course index
//!
//! Translates structured queries into the query DSL and talks to the
//! index over its HTTP API.

use super::traits::{CourseIndex, IndexHits};
use crate::config::IndexSettings;
use crate::courses::CourseRecord;
use crate::error::{Result, SearchError};
use crate::query::{Clause, Comparison, Field, SortDirective, StructuredQuery};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Course index served by an Elasticsearch (or OpenSearch) cluster
pub struct ElasticIndex {
    client: Client,
    base_url: Url,
    index_name: String,
    username: Option<String>,
    password: Option<String>,
    max_result_window: u64,
}

impl ElasticIndex {
    /// Connect with default settings to the given cluster and index
    pub fn new(url: &str, index_name: &str) -> anyhow::Result<Self> {
        Self::with_settings(&IndexSettings {
            url: url.to_string(),
            index_name: index_name.to_string(),
            ..IndexSettings::default()
        })
    }

    /// Build the index client from settings
    pub fn with_settings(settings: &IndexSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs_f64(settings.timeout_secs))
            .pool_max_idle_per_host(settings.pool_max_idle)
            .build()?;

        let mut base_url = Url::parse(&settings.url)?;
        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            index_name: settings.index_name.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            max_result_window: settings.max_result_window,
        })
    }

    /// Query DSL body for a structured query
    pub fn search_body(&self, query: &StructuredQuery) -> Value {
        let filters: Vec<Value> = query.clauses.iter().map(clause_dsl).collect();

        let dsl = if filters.is_empty() {
            json!({ "match_all": {} })
        } else {
            json!({ "bool": { "filter": filters } })
        };

        json!({
            "query": dsl,
            "sort": sort_dsl(&query.sort),
            "from": query.page.offset,
            "size": query.page.limit.unwrap_or(self.max_result_window),
            "track_total_hits": true,
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| SearchError::IndexUnavailable(format!("invalid index URL: {}", e)))?;

        let mut builder = self.client.request(method, url);
        if let Some(ref user) = self.username {
            builder = builder.basic_auth(user, self.password.as_ref());
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &body))
    }
}

#[async_trait]
impl CourseIndex for ElasticIndex {
    fn name(&self) -> &str {
        "elasticsearch"
    }

    async fn search(&self, query: &StructuredQuery) -> Result<IndexHits> {
        let body = self.search_body(query);
        debug!("Index query on {}: {}", self.index_name, body);

        let request = self
            .request(Method::POST, &format!("{}/_search", self.index_name))?
            .json(&body);
        let envelope: SearchEnvelope = self.send(request).await?.json().await?;

        let total = envelope.hits.total.map(|t| t.value()).unwrap_or(0);
        let courses = envelope
            .hits
            .hits
            .into_iter()
            .map(|hit| hit.source)
            .collect();

        Ok(IndexHits::new(total, courses))
    }

    async fn count(&self) -> Result<u64> {
        let request = self.request(Method::GET, &format!("{}/_count", self.index_name))?;
        let envelope: CountEnvelope = self.send(request).await?.json().await?;
        Ok(envelope.count)
    }

    async fn ensure_index(&self, recreate: bool) -> Result<()> {
        let head = self.request(Method::HEAD, &self.index_name)?.send().await?;
        let mut exists = match head.status() {
            StatusCode::OK => true,
            StatusCode::NOT_FOUND => false,
            status => return Err(classify_failure(status, "")),
        };

        if exists && recreate {
            info!("Index {} exists, deleting for a fresh start", self.index_name);
            self.send(self.request(Method::DELETE, &self.index_name)?)
                .await?;
            exists = false;
        }

        if !exists {
            info!("Creating index {} with course mapping", self.index_name);
            let request = self
                .request(Method::PUT, &self.index_name)?
                .json(&course_mapping());
            self.send(request).await?;
        }

        Ok(())
    }

    async fn bulk_index(&self, courses: &[CourseRecord]) -> Result<usize> {
        if courses.is_empty() {
            return Ok(0);
        }

        let mut body = String::new();
        for course in courses {
            let action = json!({ "index": { "_index": self.index_name, "_id": course.id } });
            let source = serde_json::to_string(course)
                .map_err(|e| SearchError::index_query(None, e.to_string()))?;
            body.push_str(&action.to_string());
            body.push('\n');
            body.push_str(&source);
            body.push('\n');
        }

        let request = self
            .request(Method::POST, "_bulk?refresh=true")?
            .header("Content-Type", "application/x-ndjson")
            .body(body);
        let envelope: BulkEnvelope = self.send(request).await?.json().await?;

        let accepted = envelope
            .items
            .iter()
            .filter(|item| item.outcome().map(|o| o.status < 300).unwrap_or(false))
            .count();

        if envelope.errors {
            let first = envelope
                .items
                .iter()
                .filter_map(|item| item.outcome())
                .find_map(|o| o.error.as_ref())
                .map(|e| e.to_string())
                .unwrap_or_default();
            warn!(
                "Bulk indexing rejected {} of {} courses: {}",
                courses.len().saturating_sub(accepted),
                courses.len(),
                first
            );
        }

        Ok(accepted)
    }
}

/// Document field a clause or sort actually targets.
///
/// Free text fields are analyzed, so substring matching and sorting go
/// through their keyword sub-field.
fn keyword_target(field: Field) -> String {
    match field {
        Field::Name | Field::Description => format!("{}.keyword", field.as_str()),
        _ => field.as_str().to_string(),
    }
}

/// Escape wildcard metacharacters in a user term
fn escape_wildcard(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn clause_dsl(clause: &Clause) -> Value {
    match clause {
        Clause::AnyContains { fields, term } => {
            let pattern = format!("*{}*", escape_wildcard(term));
            let should: Vec<Value> = fields
                .iter()
                .map(|f| {
                    json!({
                        "wildcard": {
                            keyword_target(*f): { "value": pattern, "case_insensitive": true }
                        }
                    })
                })
                .collect();
            json!({ "bool": { "should": should, "minimum_should_match": 1 } })
        }
        Clause::Compare { field, op, value } => {
            let name = field.as_str();
            match op {
                Comparison::Eq => json!({ "term": { name: value.to_json() } }),
                Comparison::Gte => json!({ "range": { name: { "gte": value.to_json() } } }),
                Comparison::Lte => json!({ "range": { name: { "lte": value.to_json() } } }),
            }
        }
    }
}

/// Sort clause with index order as the tie-breaker
fn sort_dsl(sort: &SortDirective) -> Value {
    json!([
        { keyword_target(sort.field): { "order": sort.direction.as_str() } },
        "_doc"
    ])
}

/// Mapping applied when the index is created
pub fn course_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "name": {
                    "type": "text",
                    "fields": { "keyword": { "type": "keyword", "ignore_above": 1024 } }
                },
                "description": {
                    "type": "text",
                    "fields": { "keyword": { "type": "keyword", "ignore_above": 8191 } }
                },
                "category": { "type": "keyword" },
                "type": { "type": "keyword" },
                "minAge": { "type": "integer" },
                "maxAge": { "type": "integer" },
                "price": { "type": "double" },
                "nextSessionDate": { "type": "date" }
            }
        }
    })
}

/// Map a non-success response to the error taxonomy
fn classify_failure(status: StatusCode, body: &str) -> SearchError {
    let reason = error_reason(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    });

    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        SearchError::IndexUnavailable(format!("index returned {}: {}", status.as_u16(), reason))
    } else {
        SearchError::IndexQuery {
            field: offending_field(&reason),
            reason,
        }
    }
}

/// Most specific reason in an error body
fn error_reason(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;

    if let Some(reason) = error
        .get("root_cause")
        .and_then(|rc| rc.get(0))
        .and_then(|rc| rc.get("reason"))
        .and_then(Value::as_str)
    {
        return Some(reason.to_string());
    }

    error
        .get("reason")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
}

/// Field named in a rejection reason, e.g. "No mapping found for [price]"
fn offending_field(reason: &str) -> Option<String> {
    let bracketed: Vec<&str> = reason
        .split('[')
        .skip(1)
        .filter_map(|rest| rest.split(']').next())
        .map(|name| name.trim_end_matches(".keyword"))
        .collect();

    if let Some(known) = bracketed.iter().find(|name| Field::from_name(name).is_some()) {
        return Some(known.to_string());
    }

    if reason.contains("mapping") {
        return bracketed.first().map(|name| name.to_string());
    }

    Field::ALL
        .iter()
        .find(|f| reason.contains(&format!("\"{}\"", f.as_str())))
        .map(|f| f.as_str().to_string())
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<Hit>,
}

/// `hits.total` is an object in 7.x+ and a bare number before that
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Object { value: u64 },
    Legacy(u64),
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            Self::Object { value } => *value,
            Self::Legacy(value) => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: CourseRecord,
}

#[derive(Debug, Deserialize)]
struct CountEnvelope {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct BulkEnvelope {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    index: Option<BulkOutcome>,
    create: Option<BulkOutcome>,
}

impl BulkItem {
    fn outcome(&self) -> Option<&BulkOutcome> {
        self.index.as_ref().or(self.create.as_ref())
    }
}

#[derive(Debug, Deserialize)]
struct BulkOutcome {
    status: u16,
    error: Option<Value>,
}
