use crate::error::DbError;
use crate::filters::Filters;
use chrono::{DateTime, Utc};
use core_types::{Movie, validate_movie};
use sqlx::postgres::PgPool;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Every operation runs one bounded database interaction; anything still in
/// flight after this long fails with `DbError::Timeout`.
const DEFAULT_DEADLINE: Duration = Duration::from_secs(3);

/// The `MovieRepository` provides a high-level, application-specific
/// interface to the movies table. It encapsulates all SQL queries and data
/// access logic.
///
/// Each operation is stateless and executes synchronously on the caller's
/// task; the pooled connection is the only shared resource. Conflict
/// detection on updates is purely optimistic via the record's version
/// counter, so no application-level locks are ever taken.
#[derive(Debug, Clone)]
pub struct MovieRepository {
    pool: PgPool,
    deadline: Duration,
}

impl MovieRepository {
    /// Creates a new `MovieRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Returns a repository whose operations run under the given deadline.
    ///
    /// A caller-supplied deadline may shorten the default, never lengthen it.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline.min(DEFAULT_DEADLINE);
        self
    }

    /// Runs a single database interaction under this repository's deadline.
    async fn bounded<T, F>(&self, operation: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.deadline, operation).await {
            Ok(result) => result.map_err(DbError::from),
            Err(_elapsed) => Err(DbError::Timeout),
        }
    }

    /// Persists a new movie, filling in the store-assigned fields.
    ///
    /// The draft is validated first; a rejected draft never reaches the
    /// database. On success `id`, `created_at` and `version` (always 1) are
    /// written back into the record. Uniqueness violations surface as
    /// `DbError::ConstraintViolation` with the driver message unmodified.
    pub async fn insert(&self, movie: &mut Movie) -> Result<(), DbError> {
        validate_movie(movie)?;

        debug!(title = %movie.title, "inserting movie");

        let (id, created_at, version) = self
            .bounded(
                sqlx::query_as::<_, (i64, DateTime<Utc>, i32)>(
                    r#"
                    INSERT INTO movies (title, year, runtime, genres)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, created_at, version
                    "#,
                )
                .bind(&movie.title)
                .bind(movie.year)
                .bind(movie.runtime)
                .bind(&movie.genres)
                .fetch_one(&self.pool),
            )
            .await?;

        movie.id = id;
        movie.created_at = created_at;
        movie.version = version;
        Ok(())
    }

    /// Fetches a single movie by id.
    ///
    /// Non-positive ids fail `NotFound` without executing a query.
    pub async fn get(&self, id: i64) -> Result<Movie, DbError> {
        if id < 1 {
            return Err(DbError::NotFound);
        }

        debug!(id = %id, "fetching movie");

        let movie = self
            .bounded(
                sqlx::query_as::<_, Movie>(
                    r#"
                    SELECT id, created_at, title, year, runtime, genres, version
                    FROM movies
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .fetch_optional(&self.pool),
            )
            .await?;

        movie.ok_or(DbError::NotFound)
    }

    /// Replaces a movie's content fields, guarded by its version counter.
    ///
    /// The version check and increment are a single conditional write: the
    /// row is touched only when both the id and the caller's observed
    /// version still match, which rules out the check-then-act race between
    /// concurrent updaters. Zero matched rows (a stale version or a missing
    /// id) fail `EditConflict`; among N racing updates from the same observed
    /// version at most one succeeds.
    pub async fn update(&self, movie: &mut Movie) -> Result<(), DbError> {
        validate_movie(movie)?;

        debug!(id = %movie.id, version = %movie.version, "updating movie");

        let row = self
            .bounded(
                sqlx::query_as::<_, (i32,)>(
                    r#"
                    UPDATE movies
                    SET title = $1, year = $2, runtime = $3, genres = $4, version = version + 1
                    WHERE id = $5 AND version = $6
                    RETURNING version
                    "#,
                )
                .bind(&movie.title)
                .bind(movie.year)
                .bind(movie.runtime)
                .bind(&movie.genres)
                .bind(movie.id)
                .bind(movie.version)
                .fetch_optional(&self.pool),
            )
            .await?;

        match row {
            Some((version,)) => {
                movie.version = version;
                Ok(())
            }
            None => Err(DbError::EditConflict),
        }
    }

    /// Permanently removes a movie. There is no tombstone; a second delete
    /// of the same id fails `NotFound`.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if id < 1 {
            return Err(DbError::NotFound);
        }

        debug!(id = %id, "deleting movie");

        let result = self
            .bounded(
                sqlx::query("DELETE FROM movies WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    /// Returns the page of movies matching the title and genre filters.
    ///
    /// An empty title matches everything; otherwise it is a normalized
    /// full-text match, not a literal substring. An empty genre list matches
    /// everything; otherwise the row's genre set must contain every given
    /// tag. The filters are validated before anything executes, and the
    /// resolved sort column/direction is the only identifier interpolated
    /// into the query text; every other value is a bound parameter. The
    /// trailing `id ASC` keeps pagination stable when rows share the primary
    /// sort value. Returns an empty vector, never an absent one, when
    /// nothing matches.
    pub async fn list(
        &self,
        title: &str,
        genres: &[String],
        filters: &Filters,
    ) -> Result<Vec<Movie>, DbError> {
        filters.validate()?;

        debug!(title = %title, genres = ?genres, page = %filters.page, "listing movies");

        let query = format!(
            r#"
            SELECT id, created_at, title, year, runtime, genres, version
            FROM movies
            WHERE (to_tsvector('simple', title) @@ plainto_tsquery('simple', $1) OR $1 = '')
            AND (genres @> $2 OR $2 = '{{}}')
            ORDER BY {} {}, id ASC
            LIMIT $3 OFFSET $4
            "#,
            filters.sort_column(),
            filters.sort_direction(),
        );

        let movies = self
            .bounded(
                sqlx::query_as::<_, Movie>(&query)
                    .bind(title)
                    .bind(genres)
                    .bind(filters.limit())
                    .bind(filters.offset())
                    .fetch_all(&self.pool),
            )
            .await?;

        Ok(movies)
    }

    /// Counts the movies matching the title and genre filters, for callers
    /// that compute pagination metadata alongside `list`.
    pub async fn count(&self, title: &str, genres: &[String]) -> Result<i64, DbError> {
        let (total,) = self
            .bounded(
                sqlx::query_as::<_, (i64,)>(
                    r#"
                    SELECT count(*)
                    FROM movies
                    WHERE (to_tsvector('simple', title) @@ plainto_tsquery('simple', $1) OR $1 = '')
                    AND (genres @> $2 OR $2 = '{}')
                    "#,
                )
                .bind(title)
                .bind(genres)
                .fetch_one(&self.pool),
            )
            .await?;

        Ok(total)
    }
}
