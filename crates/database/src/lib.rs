//! # Postboard Database Crate
//!
//! This crate encapsulates all access to the PostgreSQL database that holds
//! the `users` and `posts` tables.
//!
//! ## Public API
//!
//! - `connect`: builds the bounded, lazily connecting connection pool.
//! - `check_connectivity`: the non-fatal startup probe.
//! - `run_migrations`: applies the embedded schema migrations.
//! - `Store`: the async data-access trait handlers depend on.
//! - `DbRepository`: the `Store` implementation backed by the pool.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{check_connectivity, connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
pub use store::Store;
