//! # Content Dates
//!
//! `lastUpdated` stamps in lesson files were written by hand and by several
//! scripts, so both calendar dates (`2025-01-31`) and full RFC 3339
//! timestamps (`2025-01-31T09:00:00Z`) occur. `ContentDate` accepts either
//! and keeps only the calendar day.

use chrono::{DateTime, NaiveDate};

use crate::error::GcaError;

/// Calendar day a piece of content was last revised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentDate(NaiveDate);

impl ContentDate {
    /// Parse a `YYYY-MM-DD` date or an RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns `GcaError::UnknownVariant` naming both accepted formats if the
    /// text is neither.
    pub fn parse(s: &str) -> Result<Self, GcaError> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.date_naive()));
        }
        Err(GcaError::unknown_variant(
            "date",
            s,
            &["YYYY-MM-DD", "RFC 3339 timestamp"],
        ))
    }
}

impl std::fmt::Display for ContentDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
