use thiserror::Error;

/// Rejections raised while turning a request payload into a validated input.
/// The display text is what the client sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name and email are required")]
    MissingUserFields,

    #[error("Title, content, and user_id are required")]
    MissingPostFields,
}
