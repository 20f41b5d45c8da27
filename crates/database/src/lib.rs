//! # Cinelog Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database. It is the system's "permanent archive" for the movie
//! catalog.
//!
//! ## Architectural Principles
//!
//! - **Adapter layer:** This crate encapsulates all database-specific logic.
//!   It provides a clean, abstract API to the rest of the application, hiding
//!   the underlying SQL and database implementation details.
//! - **Optimistic concurrency:** In-place updates never lock rows. Each row
//!   carries a version counter and an update only commits when the caller's
//!   observed version still matches, expressed as a single conditional write.
//! - **Bounded & parameterized:** Every operation runs under a hard deadline,
//!   and every caller-supplied value is bound as a query parameter. The one
//!   exception is the sort identifier, which is resolved through a closed
//!   allow-list before it is woven into the query text.
//! - **Asynchronous & pooled:** All operations are asynchronous, and it uses
//!   a connection pool (`PgPool`) for high-performance, concurrent access.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the
//!   schema is up-to-date.
//! - `MovieRepository`: The main struct that holds the connection pool and
//!   provides all the high-level data access methods (insert, get, update,
//!   delete, list, count).
//! - `Filters`: Validated search, pagination and sort parameters for listing.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod filters;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use filters::Filters;
pub use repository::MovieRepository;
