use crate::runtime::Runtime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single catalog entry.
///
/// `id`, `created_at` and `version` are assigned by the store at insert time
/// and must never be set by callers. `version` starts at 1 and increments by
/// exactly 1 on every successful update; it is the basis for optimistic
/// concurrency control.
///
/// The `serde` attributes define the one external JSON representation:
/// `created_at` is never exposed, `year`/`runtime`/`genres` are omitted while
/// unset, and `version` is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    #[serde(default)]
    pub id: i64,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    pub title: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub year: i32,
    #[serde(default, skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub version: i32,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}
