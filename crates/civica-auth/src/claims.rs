//! JWT claim structures.

use civica_models::{RoleName, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// Carries the role and its materialised permissions so that authorization
/// decisions need no database lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    pub role: RoleName,
    /// Permission names granted through the role
    pub permissions: Vec<String>,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// The subject parsed back into a user id.
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> Claims {
        Claims {
            sub: "42".to_string(),
            email: "fiscal@example.com".to_string(),
            role: RoleName::FiscalGeneral,
            permissions: vec!["mesas.read".to_string(), "users.create.fiscal_mesa".to_string()],
            exp: 1234567890,
            iat: 1234567800,
        }
    }

    #[test]
    fn test_claims_serialize() {
        let serialized = serde_json::to_string(&claims()).unwrap();
        assert!(serialized.contains(r#""sub":"42""#));
        assert!(serialized.contains(r#""role":"fiscal_general""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"7","email":"user@test.com","role":"logistica","permissions":[],"exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.user_id(), Some(UserId::new(7)));
        assert_eq!(claims.role, RoleName::Logistica);
        assert_eq!(claims.exp, 9999999999);
    }

    #[test]
    fn test_user_id_rejects_garbage_subject() {
        let mut claims = claims();
        claims.sub = "not-a-number".to_string();
        assert_eq!(claims.user_id(), None);
    }

    #[test]
    fn test_has_permission() {
        let claims = claims();
        assert!(claims.has_permission("users.create.fiscal_mesa"));
        assert!(!claims.has_permission("users.create.logistica"));
    }
}
