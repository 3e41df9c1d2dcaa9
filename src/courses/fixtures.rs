//! Five-record fixture shared by the search tests
//!
//! Three Art courses fit ages 5-12, one Art course is for teens, and one
//! Science course mentions "robot" only in its description. Prices are
//! distinct so price orderings are unambiguous.

use super::CourseRecord;
use chrono::{DateTime, TimeZone, Utc};

fn at(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, 9, 0, 0).unwrap()
}

pub(crate) fn sample_courses() -> Vec<CourseRecord> {
    vec![
        CourseRecord::new(
            "art-1",
            "Watercolor Basics",
            "Learn painting with water-based colors",
            "Art",
            "COURSE",
            6,
            10,
            40.0,
            at(7, 5),
        ),
        CourseRecord::new(
            "art-2",
            "Clay Sculpting",
            "Hands-on modelling with clay",
            "Art",
            "COURSE",
            5,
            12,
            55.0,
            at(7, 1),
        ),
        CourseRecord::new(
            "art-3",
            "Comic Drawing",
            "Draw your own comic strips",
            "Art",
            "ONE_TIME",
            8,
            12,
            25.0,
            at(7, 10),
        ),
        CourseRecord::new(
            "art-4",
            "Teen Portfolio Studio",
            "Portfolio preparation for art school applications",
            "Art",
            "COURSE",
            13,
            17,
            90.0,
            at(6, 28),
        ),
        CourseRecord::new(
            "sci-1",
            "Junior Engineers",
            "Build a simple robot from a kit",
            "Science",
            "CLUB",
            7,
            11,
            70.0,
            at(7, 3),
        ),
    ]
}

pub(crate) fn ids(courses: &[CourseRecord]) -> Vec<&str> {
    courses.iter().map(|c| c.id.as_str()).collect()
}
