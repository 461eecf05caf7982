//! Error taxonomy of the access-control model.

use anyhow::anyhow;
use civica_core::AppError;
use civica_models::{EntityId, Level, RoleName, UserId, ValueTypeError};

pub type AccessResult<T> = Result<T, AccessError>;

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Malformed input; nothing was written.
    #[error("{0}")]
    Validation(String),

    #[error("Unknown organizational level '{0}'")]
    InvalidLevel(String),

    #[error("Unknown role '{0}'")]
    InvalidRole(String),

    #[error("User {user_id} already holds access to {level} {entity_id}")]
    DuplicateGrant {
        user_id: UserId,
        level: Level,
        entity_id: EntityId,
    },

    #[error("{level} {entity_id} does not exist")]
    DanglingReference { level: Level, entity_id: EntityId },

    #[error("{0}")]
    AuthorizationDenied(String),

    /// The acting role cannot scope the target role to any level.
    #[error("No organizational levels can be assigned to role {target} by role {acting}")]
    NoAssignableLevels { acting: RoleName, target: RoleName },

    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Catalog bootstrap failed: {0}")]
    BootstrapFailure(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AccessError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self::AuthorizationDenied(message.into())
    }

    pub fn storage(message: impl std::fmt::Display) -> Self {
        Self::Storage(message.to_string())
    }

    /// Short label used for metrics and logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidLevel(_) => "invalid_level",
            Self::InvalidRole(_) => "invalid_role",
            Self::DuplicateGrant { .. } => "duplicate_grant",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::AuthorizationDenied(_) => "authorization_denied",
            Self::NoAssignableLevels { .. } => "no_assignable_levels",
            Self::DuplicateEmail(_) => "duplicate_email",
            Self::NotFound(_) => "not_found",
            Self::BootstrapFailure(_) => "bootstrap_failure",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<ValueTypeError> for AccessError {
    fn from(err: ValueTypeError) -> Self {
        match err {
            ValueTypeError::UnknownLevel(level) => Self::InvalidLevel(level),
            ValueTypeError::UnknownRole(role) => Self::InvalidRole(role),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        let message = anyhow!(err.to_string());
        match err {
            AccessError::Validation(_)
            | AccessError::InvalidLevel(_)
            | AccessError::InvalidRole(_)
            | AccessError::DanglingReference { .. } => AppError::unprocessable(message),
            AccessError::DuplicateGrant { .. } | AccessError::DuplicateEmail(_) => {
                AppError::conflict(message)
            }
            AccessError::AuthorizationDenied(_) | AccessError::NoAssignableLevels { .. } => {
                AppError::forbidden(err.to_string())
            }
            AccessError::NotFound(_) => AppError::not_found(message),
            AccessError::BootstrapFailure(_) | AccessError::Storage(_) => {
                AppError::internal(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AccessError) -> u16 {
        AppError::from(err).status.as_u16()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(AccessError::validation("bad")), 422);
        assert_eq!(status_of(AccessError::InvalidLevel("x".into())), 422);
        assert_eq!(
            status_of(AccessError::DuplicateGrant {
                user_id: UserId::new(1),
                level: Level::Mesa,
                entity_id: EntityId::new(2),
            }),
            409
        );
        assert_eq!(status_of(AccessError::denied("no")), 403);
        assert_eq!(
            status_of(AccessError::NoAssignableLevels {
                acting: RoleName::FiscalMesa,
                target: RoleName::Logistica,
            }),
            403
        );
        assert_eq!(status_of(AccessError::NotFound("user 9".into())), 404);
        assert_eq!(status_of(AccessError::storage("down")), 500);
    }

    #[test]
    fn test_value_type_errors_map_to_taxonomy() {
        assert!(matches!(
            AccessError::from(ValueTypeError::UnknownLevel("seccion".into())),
            AccessError::InvalidLevel(level) if level == "seccion"
        ));
        assert!(matches!(
            AccessError::from(ValueTypeError::UnknownRole("root".into())),
            AccessError::InvalidRole(_)
        ));
    }

    #[test]
    fn test_messages() {
        let err = AccessError::DanglingReference {
            level: Level::Escuela,
            entity_id: EntityId::new(40),
        };
        assert_eq!(err.to_string(), "escuela 40 does not exist");
        assert_eq!(err.kind(), "dangling_reference");
    }
}
