//! Identity and session types returned by the remote auth service.
//!
//! The application never inspects an identity beyond its stable identifier;
//! everything else is opaque credential metadata owned by the service.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// The authenticated user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identifier, used as the foreign key on owned tasks.
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Durable credential bundle representing an authenticated [`Identity`].
///
/// Persisted verbatim by the CLI shell between runs; held in memory only by
/// the web shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) after which the access token is rejected.
    pub expires_at: u64,
    pub user: Identity,
}

impl Session {
    /// Whether the access token can still be presented. Expiry is checked
    /// with a 60 second buffer so a token does not lapse mid-request.
    pub fn is_usable(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);
        self.expires_at.saturating_sub(60) > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: u64) -> Session {
        Session {
            access_token: "token".to_string(),
            token_type: "bearer".to_string(),
            refresh_token: None,
            expires_at,
            user: Identity {
                id: "U1".to_string(),
                email: Some("u1@example.com".to_string()),
            },
        }
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0)
    }

    #[test]
    fn session_expiry_buffer() {
        assert!(session(now_secs() + 120).is_usable());
        assert!(!session(now_secs() + 30).is_usable());
        assert!(!session(0).is_usable());
    }

    #[test]
    fn session_round_trips_through_json() {
        let original = session(1234567890);
        let serialized = serde_json::to_string(&original).expect("serialize");
        let loaded: Session = serde_json::from_str(&serialized).expect("deserialize");

        assert_eq!(loaded.access_token, original.access_token);
        assert_eq!(loaded.expires_at, original.expires_at);
        assert_eq!(loaded.user, original.user);
    }
}
