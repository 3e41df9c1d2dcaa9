//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let timeout = TimeoutLayer::new(Duration::from_secs(
        state.settings.server.request_timeout_secs,
    ));

    Router::new()
        // Course API
        .route("/api/courses/search", get(handlers::search))
        .route("/api/courses/all", get(handlers::all_courses))
        // Service routes
        .route("/health", get(handlers::health))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(timeout)
        .layer(cors)
        // Add state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::courses::fixtures::sample_courses;
    use crate::courses::CourseRecord;
    use crate::error::{Result, SearchError};
    use crate::index::{CourseIndex, IndexHits, MemoryIndex};
    use crate::query::StructuredQuery;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct BrokenIndex(SearchError);

    #[async_trait]
    impl CourseIndex for BrokenIndex {
        fn name(&self) -> &str {
            "broken"
        }

        async fn search(&self, _query: &StructuredQuery) -> Result<IndexHits> {
            Err(self.0.clone())
        }

        async fn count(&self) -> Result<u64> {
            Err(self.0.clone())
        }

        async fn ensure_index(&self, _recreate: bool) -> Result<()> {
            Ok(())
        }

        async fn bulk_index(&self, _courses: &[CourseRecord]) -> Result<usize> {
            Ok(0)
        }
    }

    fn app_with(index: Arc<dyn CourseIndex>) -> Router {
        create_router(AppState::new(Settings::default(), index))
    }

    fn app() -> Router {
        app_with(Arc::new(MemoryIndex::with_records(sample_courses())))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn course_ids(body: &Value) -> Vec<&str> {
        body["courses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_search_scenario() {
        let (status, body) = get_json(
            app(),
            "/api/courses/search?category=Art&minAge=5&maxAge=12&page=0&size=2",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(course_ids(&body), vec!["art-2", "art-1"]);
    }

    #[tokio::test]
    async fn test_search_defaults_and_blank_params() {
        let (status, body) = get_json(app(), "/api/courses/search?q=&category=&minAge=&sort=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
        assert_eq!(
            course_ids(&body),
            vec!["art-4", "art-2", "sci-1", "art-1", "art-3"]
        );
    }

    #[tokio::test]
    async fn test_search_keyword_and_sort() {
        let (_, body) = get_json(app(), "/api/courses/search?q=robot").await;
        assert_eq!(course_ids(&body), vec!["sci-1"]);

        let (_, body) = get_json(app(), "/api/courses/search?sort=priceDesc&page=1&size=2").await;
        assert_eq!(body["total"], 5);
        assert_eq!(course_ids(&body), vec!["art-2", "art-1"]);
    }

    #[tokio::test]
    async fn test_search_start_date() {
        let (status, body) =
            get_json(app(), "/api/courses/search?startDate=2025-07-05T00:00:00Z").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(course_ids(&body), vec!["art-1", "art-3"]);
    }

    #[tokio::test]
    async fn test_search_record_shape() {
        let (_, body) = get_json(app(), "/api/courses/search?q=clay").await;
        let course = &body["courses"][0];
        assert_eq!(course["type"], "COURSE");
        assert_eq!(course["minAge"], 5);
        assert_eq!(course["nextSessionDate"], "2025-07-01T09:00:00Z");
    }

    #[tokio::test]
    async fn test_validation_errors() {
        for (uri, param) in [
            ("/api/courses/search?startDate=yesterday", "startDate"),
            ("/api/courses/search?page=-1", "page"),
            ("/api/courses/search?size=0", "size"),
            ("/api/courses/search?size=1000", "size"),
            ("/api/courses/search?minPrice=abc", "minPrice"),
        ] {
            let (status, body) = get_json(app(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["error"], "validation_error");
            assert_eq!(body["param"], param);
            assert!(body.get("courses").is_none());
        }
    }

    #[tokio::test]
    async fn test_malformed_query_string_is_json() {
        let (status, body) = get_json(app(), "/api/courses/search?page=1&page=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["param"], "query");
    }

    #[tokio::test]
    async fn test_search_bounds_include_equal_values() {
        let (_, body) =
            get_json(app(), "/api/courses/search?startDate=2025-07-05T09:00:00Z").await;
        assert_eq!(course_ids(&body), vec!["art-1", "art-3"]);

        let (_, body) = get_json(app(), "/api/courses/search?maxPrice=55&sort=priceDesc").await;
        assert_eq!(course_ids(&body), vec!["art-2", "art-1", "art-3"]);
    }

    #[tokio::test]
    async fn test_negative_min_age_is_accepted() {
        let (status, body) = get_json(app(), "/api/courses/search?minAge=-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
    }

    #[tokio::test]
    async fn test_partial_records_are_served() {
        let mut records = sample_courses();
        records.push(
            serde_json::from_value(serde_json::json!({ "id": "bare-1", "name": "Unscheduled" }))
                .unwrap(),
        );
        let app = app_with(Arc::new(MemoryIndex::with_records(records)));

        let (status, body) = get_json(app.clone(), "/api/courses/all").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 6);
        assert_eq!(body["courses"][5]["id"], "bare-1");
        assert!(body["courses"][5].get("price").is_none());

        let (_, body) = get_json(app, "/api/courses/search?category=Art").await;
        assert_eq!(body["total"], 4);
    }

    #[tokio::test]
    async fn test_all_courses() {
        let (status, body) = get_json(app(), "/api/courses/all").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
        assert_eq!(body["courses"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_empty_index() {
        let (status, body) = get_json(
            app_with(Arc::new(MemoryIndex::new())),
            "/api/courses/search?q=anything",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "total": 0, "courses": [] }));
    }

    #[tokio::test]
    async fn test_index_unavailable() {
        let app = app_with(Arc::new(BrokenIndex(SearchError::IndexUnavailable(
            "connection refused".into(),
        ))));
        let (status, body) = get_json(app, "/api/courses/search").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "index_unavailable");
        assert!(body.get("courses").is_none());
    }

    #[tokio::test]
    async fn test_index_query_error_names_field() {
        let app = app_with(Arc::new(BrokenIndex(SearchError::index_query(
            Some("price".into()),
            "No mapping found for [price] in order to sort on",
        ))));
        let (status, body) = get_json(app, "/api/courses/all").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "index_query_error");
        assert_eq!(body["field"], "price");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["index"], "memory");
    }
}
