use crate::error::ValidationError;
use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Body of `POST /api/users` and `PUT /api/users/:id`.
///
/// Every field is optional on the wire so a missing one surfaces as a
/// validation failure instead of a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub age: Option<i32>,
}

/// Body of `POST /api/posts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub user_id: Option<i32>,
}

/// A user input that passed validation. Used for both inserts and full overwrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
}

/// A post input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user_id: i32,
}

impl UserPayload {
    /// Requires a non-empty `name` and `email`. `age` stays optional.
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        match (non_empty(self.name), non_empty(self.email)) {
            (Some(name), Some(email)) => Ok(NewUser {
                name,
                email,
                age: self.age,
            }),
            _ => Err(ValidationError::MissingUserFields),
        }
    }
}

impl PostPayload {
    /// Requires a non-empty `title` and `content` and a non-zero `user_id`.
    pub fn validate(self) -> Result<NewPost, ValidationError> {
        let user_id = self.user_id.filter(|id| *id != 0);
        match (non_empty(self.title), non_empty(self.content), user_id) {
            (Some(title), Some(content), Some(user_id)) => Ok(NewPost {
                title,
                content,
                user_id,
            }),
            _ => Err(ValidationError::MissingPostFields),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

/// Accepts `42`, `"42"`, `""` or `null`.
///
/// Browser forms post numeric inputs as strings, and an untouched field
/// arrives as the empty string; both of those map onto the integer or `None`.
fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("integer out of range: {n}"))),
        Some(IntOrString::Str(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i32>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("expected an integer, got {s:?}")))
        }
    }
}
