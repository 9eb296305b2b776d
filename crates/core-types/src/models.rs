use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents a row from the `users` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// A row from the `posts` table joined with its author.
///
/// `author_name` is resolved at read time with a left join, so it is `None`
/// whenever `user_id` no longer points at a user. `user_id` itself becomes
/// `None` once the author is deleted.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub author_name: Option<String>,
}
