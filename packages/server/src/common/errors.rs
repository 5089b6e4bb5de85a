use thiserror::Error;

/// Every failure a verification, linking or admin operation can surface.
///
/// The HTTP layer maps each variant to a status code and a public message
/// (see `server::error`); the bot layer maps them to chat replies.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("{0}")]
    Validation(String),

    #[error("project key required")]
    MissingProjectKey,

    #[error("invalid project key")]
    InvalidProjectKey,

    #[error("admin disabled")]
    AdminDisabled,

    #[error("invalid admin key")]
    InvalidAdminKey,

    #[error("phone not linked to telegram")]
    NotLinked,

    #[error("project not found")]
    ProjectNotFound,

    #[error("session not found")]
    SessionNotFound,

    #[error("project inactive")]
    ProjectInactive,

    #[error("code not found")]
    CodeNotFound,

    #[error("code expired")]
    CodeExpired,

    #[error("invalid code")]
    InvalidCode,

    #[error("too many attempts")]
    RateLimited,

    #[error("concurrent verification, retry")]
    Conflict,

    /// Outbound chat message failed; carries the public message.
    #[error("{0}")]
    Delivery(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl VerifyError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Store and internal failures; these are logged and never shown verbatim.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }
}

pub type VerifyResult<T> = Result<T, VerifyError>;
