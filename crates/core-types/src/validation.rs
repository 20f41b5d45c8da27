use crate::movie::Movie;
use chrono::{Datelike, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A field-keyed collection of validation messages.
///
/// Rules are checked in one pass and every violation is collected; nothing
/// short-circuits. If several rules on the same field fail, the last message
/// wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the message recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Records a message for a field, replacing any earlier one.
    pub fn add(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }

    /// Records a message for a field unless the condition holds.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    /// Consumes the collection, failing if anything was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks every record-level rule and returns the full set of violations.
///
/// The store calls this before any write is attempted, so a rejected draft
/// never reaches the database.
pub fn validate_movie(movie: &Movie) -> Result<(), ValidationErrors> {
    let mut v = ValidationErrors::new();

    v.check(!movie.title.is_empty(), "title", "must be provided");
    v.check(
        movie.title.len() <= 500,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(movie.year != 0, "year", "must be provided");
    v.check(movie.year >= 1888, "year", "must be greater than 1888");
    v.check(
        movie.year <= Utc::now().year(),
        "year",
        "must not be in the future",
    );

    v.check(movie.runtime.minutes() != 0, "runtime", "must be provided");
    v.check(
        movie.runtime.minutes() > 0,
        "runtime",
        "must be a positive integer",
    );

    v.check(
        !movie.genres.is_empty(),
        "genres",
        "must contain at least 1 genre",
    );
    v.check(
        movie.genres.len() <= 5,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(
        unique(&movie.genres),
        "genres",
        "must not contain duplicate values",
    );

    v.into_result()
}

fn unique(values: &[String]) -> bool {
    let distinct: HashSet<&String> = values.iter().collect();
    distinct.len() == values.len()
}
