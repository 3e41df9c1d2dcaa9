//! Query construction module
//!
//! Translates a set of optional search filters into a structured query:
//! a conjunction of predicate clauses, a sort directive and a pagination
//! window. Building a query never performs I/O and never fails.

mod builder;
mod filters;
mod types;

pub use builder::{sort_directive, QueryBuilder, KEYWORD_FIELDS};
pub use filters::{SearchFilters, SortMode, DEFAULT_PAGE_SIZE};
pub use types::*;
