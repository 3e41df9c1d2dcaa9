//! Turns a filter set into a structured query
//!
//! Each optional filter has a clause constructor. The builder folds the
//! constructor table over an empty conjunction, so absent filters simply
//! contribute nothing.

use super::filters::{SearchFilters, SortMode};
use super::types::{Clause, Field, Pagination, SortDirective, StructuredQuery, Value};

/// Fields searched by the free-text keyword
pub const KEYWORD_FIELDS: [Field; 3] = [Field::Name, Field::Description, Field::Category];

type ClauseFn = fn(&SearchFilters) -> Option<Clause>;

/// Clause constructors in the order their clauses appear in the query
const CLAUSES: [ClauseFn; 8] = [
    keyword_clause,
    min_age_clause,
    max_age_clause,
    min_price_clause,
    max_price_clause,
    category_clause,
    type_clause,
    start_date_clause,
];

/// Stateless query builder
pub struct QueryBuilder;

impl QueryBuilder {
    /// Build the structured query for a validated filter set
    pub fn build(filters: &SearchFilters) -> StructuredQuery {
        let clauses = CLAUSES.iter().fold(Vec::new(), |mut acc, make| {
            if let Some(clause) = make(filters) {
                acc.push(clause);
            }
            acc
        });

        StructuredQuery {
            clauses,
            sort: sort_directive(filters.sort),
            page: Pagination::page(filters.page, filters.page_size),
        }
    }
}

/// Ordering for a sort mode
pub fn sort_directive(mode: SortMode) -> SortDirective {
    match mode {
        SortMode::PriceAsc => SortDirective::asc(Field::Price),
        SortMode::PriceDesc => SortDirective::desc(Field::Price),
        SortMode::Upcoming => SortDirective::asc(Field::NextSessionDate),
    }
}

/// The text as given, or `None` when blank
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn keyword_clause(f: &SearchFilters) -> Option<Clause> {
    non_blank(&f.keyword).map(|term| Clause::any_contains(&KEYWORD_FIELDS, term.trim()))
}

fn min_age_clause(f: &SearchFilters) -> Option<Clause> {
    f.min_age
        .map(|age| Clause::gte(Field::MinAge, Value::Integer(i64::from(age))))
}

fn max_age_clause(f: &SearchFilters) -> Option<Clause> {
    f.max_age
        .map(|age| Clause::lte(Field::MaxAge, Value::Integer(i64::from(age))))
}

fn min_price_clause(f: &SearchFilters) -> Option<Clause> {
    f.min_price
        .map(|price| Clause::gte(Field::Price, Value::Decimal(price)))
}

fn max_price_clause(f: &SearchFilters) -> Option<Clause> {
    f.max_price
        .map(|price| Clause::lte(Field::Price, Value::Decimal(price)))
}

fn category_clause(f: &SearchFilters) -> Option<Clause> {
    non_blank(&f.category).map(|c| Clause::eq(Field::Category, Value::Text(c.to_string())))
}

fn type_clause(f: &SearchFilters) -> Option<Clause> {
    non_blank(&f.course_type).map(|t| Clause::eq(Field::Type, Value::Text(t.to_string())))
}

fn start_date_clause(f: &SearchFilters) -> Option<Clause> {
    f.start_date
        .map(|start| Clause::gte(Field::NextSessionDate, Value::Timestamp(start)))
}
