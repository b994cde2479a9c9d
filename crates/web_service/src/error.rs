use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use supabase_client::SupabaseError;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No active identity")]
    NotSignedIn,

    #[error("Task '{0}' not found")]
    TaskNotFound(i64),

    #[error("Task title must not be empty")]
    EmptyTitle,

    #[error(transparent)]
    Remote(#[from] SupabaseError),
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    r#type: String,
}

#[derive(Serialize)]
struct JsonErrorWrapper {
    error: JsonError,
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::Remote(SupabaseError::Auth { .. }) => "auth_error",
            AppError::Remote(_) => "remote_error",
            _ => "request_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotSignedIn => StatusCode::UNAUTHORIZED,
            AppError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmptyTitle => StatusCode::BAD_REQUEST,
            AppError::Remote(err) => match err {
                SupabaseError::Auth { .. } | SupabaseError::NoSession => StatusCode::UNAUTHORIZED,
                SupabaseError::RowNotFound => StatusCode::NOT_FOUND,
                SupabaseError::Api { status, .. } if *status < 500 => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_response = JsonErrorWrapper {
            error: JsonError {
                message: self.to_string(),
                r#type: self.error_type().to_string(),
            },
        };
        HttpResponse::build(self.status_code()).json(error_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supabase_client::AuthErrorKind;

    #[test]
    fn auth_failures_map_to_unauthorized() {
        let err = AppError::Remote(SupabaseError::Auth {
            kind: AuthErrorKind::InvalidCredentials,
            message: "Invalid login credentials".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_type(), "auth_error");
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        let err = AppError::Remote(SupabaseError::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_failures_map_to_bad_gateway() {
        let err = AppError::Remote(SupabaseError::Api {
            status: 503,
            message: "unavailable".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
