//! Wire formats for the auth and rest endpoints.
//!
//! These shapes exist only to talk to the service; they are converted into
//! `task_core` types before leaving this crate.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use task_core::{Identity, Session};

use crate::error::AuthErrorKind;

#[derive(Debug, Serialize)]
pub(crate) struct CredentialsRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<UserResponse> for Identity {
    fn from(user: UserResponse) -> Self {
        Identity {
            id: user.id,
            email: user.email,
        }
    }
}

/// Session payload returned by the token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<u64>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: UserResponse,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

const DEFAULT_SESSION_LIFETIME_SECS: u64 = 3600;

impl SessionResponse {
    pub(crate) fn into_session(self) -> Session {
        let expires_at = self.expires_at.unwrap_or_else(|| {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|duration| duration.as_secs())
                .unwrap_or(0);
            now + self.expires_in.unwrap_or(DEFAULT_SESSION_LIFETIME_SECS)
        });
        Session {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

/// The signup endpoint returns either a bare user record (confirmation
/// pending) or a full session (auto-confirm projects).
#[derive(Debug, Deserialize)]
pub(crate) struct SignUpResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user: Option<UserResponse>,
}

impl SignUpResponse {
    pub(crate) fn into_identity(self) -> Option<Identity> {
        if let Some(user) = self.user {
            return Some(user.into());
        }
        self.id.map(|id| Identity {
            id,
            email: self.email,
        })
    }
}

/// Error body shape used by the auth endpoints. Field names vary across
/// service versions, so everything is optional.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthErrorResponse {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl AuthErrorResponse {
    pub(crate) fn message(&self) -> String {
        self.msg
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "authentication failed".to_string())
    }

    pub(crate) fn kind(&self) -> AuthErrorKind {
        let code = self
            .error_code
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or("");
        match code {
            "invalid_credentials" | "invalid_grant" => AuthErrorKind::InvalidCredentials,
            "user_already_exists" | "email_exists" => AuthErrorKind::DuplicateAccount,
            "weak_password" => AuthErrorKind::WeakPassword,
            "validation_failed" => AuthErrorKind::MalformedEmail,
            "session_not_found" => AuthErrorKind::SessionMissing,
            _ => AuthErrorKind::Other,
        }
    }
}

/// Error body shape used by the rest endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct RestErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl RestErrorResponse {
    pub(crate) fn message(&self) -> String {
        match (&self.message, &self.code) {
            (Some(message), Some(code)) => format!("{message} ({code})"),
            (Some(message), None) => message.clone(),
            (None, Some(code)) => code.clone(),
            (None, None) => "request rejected".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewTaskRow<'a> {
    pub title: &'a str,
    pub completed: bool,
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletedPatch {
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_response_falls_back_to_expires_in() {
        let body = r#"{
            "access_token": "token-1",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {"id": "U1", "email": "u1@example.com"}
        }"#;
        let session = serde_json::from_str::<SessionResponse>(body)
            .expect("session response")
            .into_session();

        assert_eq!(session.access_token, "token-1");
        assert_eq!(session.user.id, "U1");
        assert!(session.is_usable());
    }

    #[test]
    fn auth_error_kind_mapping() {
        let body = r#"{"error_code": "user_already_exists", "msg": "User already registered"}"#;
        let error: AuthErrorResponse = serde_json::from_str(body).expect("error body");

        assert_eq!(error.kind(), AuthErrorKind::DuplicateAccount);
        assert_eq!(error.message(), "User already registered");
    }

    #[test]
    fn auth_error_kind_falls_back_to_legacy_field() {
        let body = r#"{"error": "invalid_grant", "error_description": "Invalid login credentials"}"#;
        let error: AuthErrorResponse = serde_json::from_str(body).expect("error body");

        assert_eq!(error.kind(), AuthErrorKind::InvalidCredentials);
        assert_eq!(error.message(), "Invalid login credentials");
    }

    #[test]
    fn signup_response_accepts_both_shapes() {
        let bare_user = r#"{"id": "U1", "email": "u1@example.com"}"#;
        let with_session = r#"{"access_token": "t", "user": {"id": "U2"}}"#;

        let first = serde_json::from_str::<SignUpResponse>(bare_user)
            .expect("bare user")
            .into_identity()
            .expect("identity");
        let second = serde_json::from_str::<SignUpResponse>(with_session)
            .expect("session shape")
            .into_identity()
            .expect("identity");

        assert_eq!(first.id, "U1");
        assert_eq!(second.id, "U2");
    }
}
