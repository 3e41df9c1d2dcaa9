//! Caller-supplied search filters

use chrono::{DateTime, Utc};

/// Default number of courses per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Requested result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
    /// Soonest next session first
    #[default]
    Upcoming,
}

impl SortMode {
    /// Map a raw `sort` parameter, ignoring case.
    ///
    /// Unrecognized values fall back to `Upcoming`.
    pub fn from_param(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "priceasc" => Self::PriceAsc,
            "pricedesc" => Self::PriceDesc,
            "upcoming" => Self::Upcoming,
            other => {
                tracing::debug!("Unrecognized sort mode '{}', using upcoming", other);
                Self::Upcoming
            }
        }
    }
}

/// Validated filter set for one search request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    /// Free-text keyword matched against name, description and category
    pub keyword: Option<String>,
    /// Lower bound on a course's `minAge`
    pub min_age: Option<i32>,
    /// Upper bound on a course's `maxAge`
    pub max_age: Option<i32>,
    /// Exact category
    pub category: Option<String>,
    /// Exact course type
    pub course_type: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    /// Earliest acceptable `nextSessionDate`
    pub start_date: Option<DateTime<Utc>>,
    /// Result ordering
    pub sort: SortMode,
    /// Zero-based page number
    pub page: u32,
    /// Courses per page, at least 1
    pub page_size: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            keyword: None,
            min_age: None,
            max_age: None,
            category: None,
            course_type: None,
            min_price: None,
            max_price: None,
            start_date: None,
            sort: SortMode::default(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_age_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_age = min;
        self.max_age = max;
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_type(mut self, course_type: impl Into<String>) -> Self {
        self.course_type = Some(course_type.into());
        self
    }

    pub fn with_start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Set page and page size. A zero size is raised to 1.
    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size.max(1);
        self
    }
}
