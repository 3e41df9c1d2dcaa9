//! Structured query representation handed to the index

use chrono::{DateTime, Utc};

/// Indexed course fields the query can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Description,
    Category,
    Type,
    MinAge,
    MaxAge,
    Price,
    NextSessionDate,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Description,
        Field::Category,
        Field::Type,
        Field::MinAge,
        Field::MaxAge,
        Field::Price,
        Field::NextSessionDate,
    ];

    /// Name of the field in the stored document
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Category => "category",
            Self::Type => "type",
            Self::MinAge => "minAge",
            Self::MaxAge => "maxAge",
            Self::Price => "price",
            Self::NextSessionDate => "nextSessionDate",
        }
    }

    /// Look a field up by its document name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Literal compared against a field
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Decimal(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Numeric view, for integer and decimal literals
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// JSON form used on the wire
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Integer(v) => serde_json::json!(v),
            Self::Decimal(v) => serde_json::json!(v),
            Self::Text(v) => serde_json::json!(v),
            Self::Timestamp(v) => serde_json::json!(v.to_rfc3339()),
        }
    }
}

/// Field comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gte,
    Lte,
}

/// One predicate in the conjunction
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Matches when any of `fields` contains `term`
    AnyContains { fields: Vec<Field>, term: String },
    /// Matches when `field op value` holds
    Compare {
        field: Field,
        op: Comparison,
        value: Value,
    },
}

impl Clause {
    pub fn any_contains(fields: &[Field], term: impl Into<String>) -> Self {
        Self::AnyContains {
            fields: fields.to_vec(),
            term: term.into(),
        }
    }

    pub fn eq(field: Field, value: Value) -> Self {
        Self::Compare {
            field,
            op: Comparison::Eq,
            value,
        }
    }

    pub fn gte(field: Field, value: Value) -> Self {
        Self::Compare {
            field,
            op: Comparison::Gte,
            value,
        }
    }

    pub fn lte(field: Field, value: Value) -> Self {
        Self::Compare {
            field,
            op: Comparison::Lte,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Ordering applied to matched records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDirective {
    pub field: Field,
    pub direction: Direction,
}

impl SortDirective {
    pub fn asc(field: Field) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: Field) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

impl Default for SortDirective {
    fn default() -> Self {
        Self::asc(Field::NextSessionDate)
    }
}

/// Window into the ordered match list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    /// `None` means no explicit cap
    pub limit: Option<u64>,
}

impl Pagination {
    /// Window for a zero-based page
    pub fn page(page: u32, page_size: u32) -> Self {
        let size = u64::from(page_size);
        Self {
            offset: u64::from(page).saturating_mul(size),
            limit: Some(size),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }
}

/// Conjunction of clauses plus ordering and pagination
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredQuery {
    pub clauses: Vec<Clause>,
    pub sort: SortDirective,
    pub page: Pagination,
}

impl StructuredQuery {
    /// Query matching every record, default ordering, no cap
    pub fn match_all() -> Self {
        Self {
            clauses: Vec::new(),
            sort: SortDirective::default(),
            page: Pagination::unbounded(),
        }
    }
}
