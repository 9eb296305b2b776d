//! # Postboard Core Types
//!
//! The plain data shared by every other crate: the `users` and `posts` rows
//! as they are stored and served, and the request payloads the API accepts.
//! Nothing in here performs I/O.

pub mod error;
pub mod models;
pub mod payloads;

// Re-export the core types to provide a clean public API.
pub use error::ValidationError;
pub use models::{Post, User};
pub use payloads::{NewPost, NewUser, PostPayload, UserPayload};
