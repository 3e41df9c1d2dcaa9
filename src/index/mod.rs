//! Course index module
//!
//! Defines the CourseIndex trait the search core talks to, plus the
//! Elasticsearch and in-memory implementations behind it.

mod elastic;
mod loader;
mod memory;
mod traits;

pub use elastic::{course_mapping, ElasticIndex};
pub use loader::IndexLoader;
pub use memory::MemoryIndex;
pub use traits::*;
