//! # Cinelog Core Types Crate
//!
//! This crate defines the domain model shared by the rest of the application:
//! the `Movie` record, the `Runtime` scalar codec, and the collected
//! field-keyed validation rules that every record must satisfy before it is
//! written to storage.
//!
//! ## Architectural Principles
//!
//! - **No I/O:** Everything in this crate is a plain value type. Database
//!   access lives in the `database` crate; this crate only describes the
//!   shapes and the rules.
//! - **One external representation:** The JSON shape of a `Movie` is defined
//!   here, once, via `serde` attributes, so every consumer agrees on which
//!   fields are exposed and when they are omitted.

// Declare the modules that constitute this crate.
pub mod movie;
pub mod runtime;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use movie::Movie;
pub use runtime::{Runtime, RuntimeFormatError};
pub use validation::{validate_movie, ValidationErrors};
