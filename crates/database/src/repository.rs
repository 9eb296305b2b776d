use crate::error::DbError;
use crate::store::Store;
use async_trait::async_trait;
use core_types::{NewPost, NewUser, Post, User};
use sqlx::postgres::PgPool;

const USER_COLUMNS: &str = "id, name, email, age, created_at";

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
///
/// Every write returns its row from the same statement (`RETURNING`), so
/// there is no window between an insert and the read-back.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for DbRepository {
    async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn get_user(&self, id: i32) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, DbError> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, age) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(user_id = created.id, "Inserted user.");
        Ok(created)
    }

    async fn update_user(&self, id: i32, user: &NewUser) -> Result<Option<User>, DbError> {
        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $1, email = $2, age = $3 WHERE id = $4 RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_user(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Joins `posts` with `users` so each post carries `author_name`.
    /// A left join keeps posts whose author is gone.
    async fn list_posts(&self) -> Result<Vec<Post>, DbError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT
                p.id, p.title, p.content, p.user_id, p.created_at,
                u.name AS author_name
            FROM
                posts AS p
            LEFT JOIN
                users AS u ON p.user_id = u.id
            ORDER BY
                p.created_at DESC, p.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    /// Inserts and joins in a single statement, so the returned row already
    /// has `author_name` filled in.
    async fn create_post(&self, post: &NewPost) -> Result<Post, DbError> {
        let created = sqlx::query_as::<_, Post>(
            r#"
            WITH inserted AS (
                INSERT INTO posts (title, content, user_id)
                VALUES ($1, $2, $3)
                RETURNING id, title, content, user_id, created_at
            )
            SELECT
                i.id, i.title, i.content, i.user_id, i.created_at,
                u.name AS author_name
            FROM
                inserted AS i
            LEFT JOIN
                users AS u ON i.user_id = u.id
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.user_id)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(post_id = created.id, user_id = post.user_id, "Inserted post.");
        Ok(created)
    }
}
