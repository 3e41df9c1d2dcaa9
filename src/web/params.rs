//! Query-string parameters and their validation

use crate::config::SearchSettings;
use crate::error::{Result, SearchError};
use crate::query::{SearchFilters, SortMode};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;

/// Raw query parameters for course search.
///
/// Everything arrives as text so parse failures can name the parameter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Search keyword
    pub q: Option<String>,
    pub min_age: Option<String>,
    pub max_age: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub course_type: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// ISO-8601 instant or plain date
    pub start_date: Option<String>,
    /// priceAsc, priceDesc or upcoming
    pub sort: Option<String>,
    /// Zero-based page number
    pub page: Option<String>,
    /// Page size
    pub size: Option<String>,
}

impl SearchParams {
    /// Validate into a filter set, applying defaults
    pub fn into_filters(self, limits: &SearchSettings) -> Result<SearchFilters> {
        let page: i64 = parse("page", self.page)?.unwrap_or(0);
        if page < 0 {
            return Err(SearchError::validation("page", "must not be negative"));
        }
        let page = u32::try_from(page)
            .map_err(|_| SearchError::validation("page", "is too large"))?;

        let size: i64 = parse("size", self.size)?.unwrap_or(i64::from(limits.default_page_size));
        if size < 1 {
            return Err(SearchError::validation("size", "must be at least 1"));
        }
        if size > i64::from(limits.max_page_size) {
            return Err(SearchError::validation(
                "size",
                format!("must not exceed {}", limits.max_page_size),
            ));
        }

        Ok(SearchFilters {
            keyword: self.q,
            min_age: parse("minAge", self.min_age)?,
            max_age: parse("maxAge", self.max_age)?,
            category: self.category,
            course_type: self.course_type,
            min_price: parse_price("minPrice", self.min_price)?,
            max_price: parse_price("maxPrice", self.max_price)?,
            start_date: parse_start_date(self.start_date)?,
            sort: self
                .sort
                .as_deref()
                .map(SortMode::from_param)
                .unwrap_or_default(),
            page,
            page_size: size as u32,
        })
    }
}

/// Trimmed value, or `None` when missing or blank
fn present(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse<T>(name: &str, raw: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    present(raw)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| SearchError::validation(name, format!("'{}': {}", v, e)))
        })
        .transpose()
}

fn parse_price(name: &str, raw: Option<String>) -> Result<Option<f64>> {
    match parse::<f64>(name, raw)? {
        Some(v) if !v.is_finite() => Err(SearchError::validation(name, "must be a finite number")),
        other => Ok(other),
    }
}

/// RFC 3339 instant, or a bare date taken as midnight UTC
fn parse_start_date(raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };

    if let Ok(instant) = DateTime::parse_from_rfc3339(&value) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(Utc.from_utc_datetime(&midnight)))
        .ok_or_else(|| {
            SearchError::validation(
                "startDate",
                format!("'{}' is not an ISO-8601 timestamp", value),
            )
        })
}
