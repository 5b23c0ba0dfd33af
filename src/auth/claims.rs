/// JWT Claims structure
///
/// Payload shared by access and refresh tokens: the user's identity plus
/// the standard registered claims (RFC 7519).

use serde::{Deserialize, Serialize};

/// Which half of a token pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity fields embedded in every token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Stable user identifier
    pub uid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub kind: TokenKind,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token id, keeps two tokens minted in the same second distinct
    pub jti: String,
}

impl Claims {
    /// Build claims for `identity` valid for `lifetime_seconds` from `issued_at`
    pub fn new(
        identity: &Identity,
        kind: TokenKind,
        issued_at: i64,
        lifetime_seconds: i64,
        issuer: &str,
    ) -> Self {
        Self {
            uid: identity.user_id.clone(),
            email: identity.email.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            kind,
            iss: issuer.to_string(),
            iat: issued_at,
            exp: issued_at + lifetime_seconds,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.uid
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.uid.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.exp < chrono::Utc::now().timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            user_id: "u1".to_string(),
            email: "a@b.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[test]
    fn test_claims_creation() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims::new(&identity(), TokenKind::Access, now, 3600, "test");

        assert_eq!(claims.user_id(), "u1");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.iss, "test");
        assert_eq!(claims.exp, now + 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_identity_round_trips_through_claims() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims::new(&identity(), TokenKind::Refresh, now, 60, "test");
        assert_eq!(claims.identity(), identity());
    }

    #[test]
    fn test_expired_claims() {
        let long_ago = chrono::Utc::now().timestamp() - 7200;
        let claims = Claims::new(&identity(), TokenKind::Access, long_ago, 3600, "test");
        assert!(claims.is_expired());
    }

    #[test]
    fn test_token_ids_are_unique() {
        let now = chrono::Utc::now().timestamp();
        let a = Claims::new(&identity(), TokenKind::Access, now, 60, "test");
        let b = Claims::new(&identity(), TokenKind::Access, now, 60, "test");
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&TokenKind::Refresh).unwrap();
        assert_eq!(json, "\"refresh\"");
    }
}
