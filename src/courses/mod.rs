//! Course records as stored in the index
//!
//! The search core only reads the fields it filters and sorts on; every
//! other attribute is carried through untouched.

mod record;

#[cfg(test)]
pub(crate) mod fixtures;

pub use record::CourseRecord;
