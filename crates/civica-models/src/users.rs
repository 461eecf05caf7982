//! Collaborator (user) models and DTOs.

use crate::access::{AccessGrant, AccessLevelRequest};
use crate::ids::UserId;
use crate::roles::RoleName;
use crate::value_types::Status;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A collaborator account.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub password_hash: String,
    pub role: RoleName,
    pub status: Status,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A user to be inserted; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: RoleName,
}

/// Request body of `POST /api/users`.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateCollaboratorDto {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Symbolic name of the role for the new collaborator.
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
    #[serde(default)]
    pub access_levels: Vec<AccessLevelRequest>,
}

/// A collaborator together with the grants written for it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollaboratorResponse {
    pub user: User,
    pub access: Vec<AccessGrant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateCollaboratorDto {
        CreateCollaboratorDto {
            first_name: "Ana".to_string(),
            last_name: "Gómez".to_string(),
            email: "ana@example.com".to_string(),
            password: "password123".to_string(),
            role: "fiscal_mesa".to_string(),
            access_levels: vec![],
        }
    }

    #[test]
    fn test_create_collaborator_dto_validation() {
        assert!(valid_dto().validate().is_ok());

        let bad_email = CreateCollaboratorDto {
            email: "not-an-email".to_string(),
            ..valid_dto()
        };
        assert!(bad_email.validate().is_err());

        let short_password = CreateCollaboratorDto {
            password: "short".to_string(),
            ..valid_dto()
        };
        assert!(short_password.validate().is_err());

        let missing_role = CreateCollaboratorDto {
            role: String::new(),
            ..valid_dto()
        };
        assert!(missing_role.validate().is_err());
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User {
            id: UserId::new(1),
            first_name: "Ana".into(),
            last_name: "Gómez".into(),
            email: "ana@example.com".into(),
            password_hash: "$2b$04$secret".into(),
            role: RoleName::FiscalMesa,
            status: Status::Active,
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains(r#""role":"fiscal_mesa""#));
    }
}
