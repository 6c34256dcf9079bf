use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Email,
    Google,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthProvider::Email => write!(f, "email"),
            AuthProvider::Google => write!(f, "google"),
            AuthProvider::Unknown => write!(f, "unknown"),
        }
    }
}

/// Identity of the signed-in account as reported by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub auth_provider: AuthProvider,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Payload returned by login and registration: the bearer token plus the
/// identity it was issued for.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// Tokens stay out of debug output and therefore out of logs
impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_JSON: &str = r#"{
        "access_token": "tok1",
        "token_type": "bearer",
        "user": {
            "id": 7,
            "email": "a@b.com",
            "is_active": true,
            "is_verified": true,
            "auth_provider": "email",
            "created_at": "2024-05-01T12:00:00.000000"
        }
    }"#;

    #[test]
    fn test_parse_auth_session() {
        let session: AuthSession = serde_json::from_str(TOKEN_JSON).expect("token payload");
        assert_eq!(session.access_token, "tok1");
        assert_eq!(session.user.id, 7);
        assert_eq!(session.user.auth_provider, AuthProvider::Email);
    }

    #[test]
    fn test_unknown_auth_provider() {
        let json = r#"{"id": 1, "email": "x@y.z", "is_active": true, "is_verified": false,
            "auth_provider": "github", "created_at": "2024-05-01T12:00:00Z"}"#;
        let user: User = serde_json::from_str(json).expect("user payload");
        assert_eq!(user.auth_provider, AuthProvider::Unknown);
    }

    #[test]
    fn test_debug_redacts_token() {
        let session: AuthSession = serde_json::from_str(TOKEN_JSON).expect("token payload");
        let debug = format!("{:?}", session);
        assert!(!debug.contains("tok1"));
        assert!(debug.contains("a@b.com"));
    }
}
