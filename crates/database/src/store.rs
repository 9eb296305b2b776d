use crate::error::DbError;
use async_trait::async_trait;
use core_types::{NewPost, NewUser, Post, User};

/// The data-access contract the HTTP handlers are written against.
///
/// `DbRepository` is the production implementation; tests substitute an
/// in-memory one. Lookups that miss return `None`/`false` rather than an error.
#[async_trait]
pub trait Store: Send + Sync {
    /// All users, newest (highest id) first.
    async fn list_users(&self) -> Result<Vec<User>, DbError>;

    async fn get_user(&self, id: i32) -> Result<Option<User>, DbError>;

    /// Inserts a user and returns the stored row, including `id` and `created_at`.
    async fn create_user(&self, user: &NewUser) -> Result<User, DbError>;

    /// Overwrites `name`, `email` and `age`. `None` if no such user exists.
    async fn update_user(&self, id: i32, user: &NewUser) -> Result<Option<User>, DbError>;

    /// `false` if no such user exists.
    async fn delete_user(&self, id: i32) -> Result<bool, DbError>;

    /// All posts with their author's name, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>, DbError>;

    /// Inserts a post and returns it joined with its author.
    async fn create_post(&self, post: &NewPost) -> Result<Post, DbError>;
}
