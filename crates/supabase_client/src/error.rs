use thiserror::Error;

/// Classifiable kinds for authentication failures reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredentials,
    DuplicateAccount,
    WeakPassword,
    MalformedEmail,
    SessionMissing,
    Other,
}

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error: {message}")]
    Auth {
        kind: AuthErrorKind,
        message: String,
    },

    #[error("row not found")]
    RowNotFound,

    #[error("no active session")]
    NoSession,
}

pub type Result<T> = std::result::Result<T, SupabaseError>;
