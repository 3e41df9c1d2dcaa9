//! In-process course index
//!
//! Evaluates structured queries directly against records held in memory.
//! Used for local development and as the reference behaviour in tests.

use super::traits::{CourseIndex, IndexHits};
use crate::courses::CourseRecord;
use crate::error::{Result, SearchError};
use crate::query::{Clause, Comparison, Direction, Field, SortDirective, StructuredQuery, Value};
use async_trait::async_trait;
use std::cmp::Ordering;
use tokio::sync::RwLock;
use tracing::debug;

/// Course index backed by a vector in insertion order
pub struct MemoryIndex {
    records: RwLock<Vec<CourseRecord>>,
}

impl MemoryIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create an index preloaded with records
    pub fn with_records(records: Vec<CourseRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseIndex for MemoryIndex {
    fn name(&self) -> &str {
        "memory"
    }

    async fn search(&self, query: &StructuredQuery) -> Result<IndexHits> {
        check_clauses(&query.clauses)?;

        let records = self.records.read().await;
        let mut matched: Vec<&CourseRecord> = records
            .iter()
            .filter(|r| query.clauses.iter().all(|c| clause_matches(r, c)))
            .collect();

        // Stable sort: ties keep insertion order
        matched.sort_by(|a, b| compare_for_sort(a, b, &query.sort));

        let total = matched.len() as u64;
        let offset = usize::try_from(query.page.offset).unwrap_or(usize::MAX);
        let limit = query
            .page
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        let courses: Vec<CourseRecord> = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        debug!(
            "Memory index matched {} records, returning {}",
            total,
            courses.len()
        );

        Ok(IndexHits::new(total, courses))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn ensure_index(&self, recreate: bool) -> Result<()> {
        if recreate {
            self.records.write().await.clear();
        }
        Ok(())
    }

    async fn bulk_index(&self, courses: &[CourseRecord]) -> Result<usize> {
        let mut records = self.records.write().await;
        for course in courses {
            // Same id replaces the stored document, like an index upsert
            match records.iter_mut().find(|r| r.id == course.id) {
                Some(existing) => *existing = course.clone(),
                None => records.push(course.clone()),
            }
        }
        Ok(courses.len())
    }
}

/// Reject comparisons whose literal cannot apply to the field
fn check_clauses(clauses: &[Clause]) -> Result<()> {
    for clause in clauses {
        match clause {
            Clause::AnyContains { fields, .. } => {
                if let Some(field) = fields.iter().find(|f| !is_text(**f)) {
                    return Err(SearchError::index_query(
                        Some(field.to_string()),
                        format!("contains match on non-text field {}", field),
                    ));
                }
            }
            Clause::Compare { field, value, .. } => {
                let ok = match field {
                    Field::MinAge | Field::MaxAge | Field::Price => value.as_f64().is_some(),
                    Field::NextSessionDate => matches!(value, Value::Timestamp(_)),
                    _ => matches!(value, Value::Text(_)),
                };
                if !ok {
                    return Err(SearchError::index_query(
                        Some(field.to_string()),
                        format!("value {:?} does not fit field {}", value, field),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn is_text(field: Field) -> bool {
    matches!(
        field,
        Field::Name | Field::Description | Field::Category | Field::Type
    )
}

fn text_of(record: &CourseRecord, field: Field) -> Option<&str> {
    match field {
        Field::Name => Some(&record.name),
        Field::Description => Some(&record.description),
        Field::Category => record.category.as_deref(),
        Field::Type => record.course_type.as_deref(),
        _ => None,
    }
}

fn number_of(record: &CourseRecord, field: Field) -> Option<f64> {
    match field {
        Field::MinAge => record.min_age.map(f64::from),
        Field::MaxAge => record.max_age.map(f64::from),
        Field::Price => record.price,
        _ => None,
    }
}

fn clause_matches(record: &CourseRecord, clause: &Clause) -> bool {
    match clause {
        Clause::AnyContains { fields, term } => {
            let needle = term.to_lowercase();
            fields.iter().any(|f| {
                text_of(record, *f)
                    .map(|text| text.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        }
        Clause::Compare { field, op, value } => match compare_value(record, *field, value) {
            Some(ord) => match op {
                Comparison::Eq => ord == Ordering::Equal,
                Comparison::Gte => ord != Ordering::Less,
                Comparison::Lte => ord != Ordering::Greater,
            },
            None => false,
        },
    }
}

/// Order of the record's field relative to the literal
fn compare_value(record: &CourseRecord, field: Field, value: &Value) -> Option<Ordering> {
    match (field, value) {
        (Field::NextSessionDate, Value::Timestamp(ts)) => {
            record.next_session_date.as_ref().map(|own| own.cmp(ts))
        }
        (_, Value::Text(text)) => text_of(record, field).map(|own| own.cmp(text.as_str())),
        _ => number_of(record, field)?.partial_cmp(&value.as_f64()?),
    }
}

fn compare_for_sort(a: &CourseRecord, b: &CourseRecord, sort: &SortDirective) -> Ordering {
    let direction = sort.direction;
    match sort.field {
        Field::NextSessionDate => missing_last(
            a.next_session_date.as_ref(),
            b.next_session_date.as_ref(),
            direction,
            Ord::cmp,
        ),
        field if is_text(field) => {
            missing_last(text_of(a, field), text_of(b, field), direction, Ord::cmp)
        }
        field => missing_last(
            number_of(a, field),
            number_of(b, field),
            direction,
            |x: &f64, y: &f64| x.total_cmp(y),
        ),
    }
}

/// Directional comparison where records lacking the value sort last either way
fn missing_last<T>(
    a: Option<T>,
    b: Option<T>,
    direction: Direction,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match direction {
            Direction::Asc => cmp(&x, &y),
            Direction::Desc => cmp(&x, &y).reverse(),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
