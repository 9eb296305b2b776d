#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use configuration::ServerSettings;
use core_types::{NewPost, NewUser, Post, User};
use database::{error::SqlxError, DbError, Store};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use web_server::{build_router, AppState};

/// A `Store` kept in memory, with the same ordering, join and delete
/// behaviour as the PostgreSQL repository.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: bool,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<StoredPost>,
    next_user_id: i32,
    next_post_id: i32,
    clock: i64,
}

#[derive(Clone)]
struct StoredPost {
    id: i32,
    title: String,
    content: String,
    user_id: Option<i32>,
    created_at: DateTime<Utc>,
}

impl Tables {
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        DateTime::from_timestamp(1_700_000_000 + self.clock, 0).unwrap()
    }

    fn joined(&self, post: &StoredPost) -> Post {
        let author_name = post
            .user_id
            .and_then(|id| self.users.iter().find(|u| u.id == id))
            .map(|u| u.name.clone());
        Post {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            user_id: post.user_id,
            created_at: post.created_at,
            author_name,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every call fails as if the pool could not hand out a connection.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            failing: true,
            ..Self::default()
        })
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn post_count(&self) -> usize {
        self.tables.lock().unwrap().posts.len()
    }

    fn check(&self) -> Result<(), DbError> {
        if self.failing {
            return Err(DbError::Query(SqlxError::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, DbError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut users = tables.users.clone();
        users.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(users)
    }

    async fn get_user(&self, id: i32) -> Result<Option<User>, DbError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, DbError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        tables.next_user_id += 1;
        let created = User {
            id: tables.next_user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age,
            created_at: tables.tick(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: i32, user: &NewUser) -> Result<Option<User>, DbError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|existing| {
            existing.name = user.name.clone();
            existing.email = user.email.clone();
            existing.age = user.age;
            existing.clone()
        }))
    }

    async fn delete_user(&self, id: i32) -> Result<bool, DbError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        for post in tables.posts.iter_mut().filter(|p| p.user_id == Some(id)) {
            post.user_id = None;
        }
        Ok(true)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DbError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut posts: Vec<Post> = tables.posts.iter().map(|p| tables.joined(p)).collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, DbError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.iter().any(|u| u.id == post.user_id) {
            return Err(DbError::ForeignKeyViolation(format!(
                "Key (user_id)=({}) is not present in table \"users\".",
                post.user_id
            )));
        }
        tables.next_post_id += 1;
        let stored = StoredPost {
            id: tables.next_post_id,
            title: post.title.clone(),
            content: post.content.clone(),
            user_id: Some(post.user_id),
            created_at: tables.tick(),
        };
        tables.posts.push(stored.clone());
        Ok(tables.joined(&stored))
    }
}

pub fn app(store: Arc<MemoryStore>) -> Router {
    let settings = ServerSettings {
        host: "127.0.0.1".to_string(),
        port: 0,
        body_limit_bytes: 64 * 1024,
    };
    build_router(Arc::new(AppState::new(store)), &settings)
}

/// Sends one request through the router and returns the status and the decoded JSON body.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Sends an `application/x-www-form-urlencoded` body, as a plain HTML form would.
pub async fn send_form(app: &Router, method: Method, uri: &str, form: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send_request(app, request).await
}
