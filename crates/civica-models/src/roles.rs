//! Role and permission domain models and DTOs.
//!
//! Roles are a closed catalog ([`RoleName`]) with an explicit numeric rank.
//! Smaller rank means more privilege; comparisons such as "strictly below"
//! are defined on the rank, never on list position.

use crate::ids::{PermissionId, RoleId};
use crate::value_types::{Status, ValueTypeError, impl_text_type};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;

/// Symbolic role key.
///
/// `admin > jefe_campana > responsable_localidad > responsable_seccion >
/// responsable_circuito > fiscal_general > fiscal_mesa ≈ logistica`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    Admin,
    JefeCampana,
    ResponsableLocalidad,
    ResponsableSeccion,
    ResponsableCircuito,
    FiscalGeneral,
    FiscalMesa,
    Logistica,
}

impl RoleName {
    /// Every role, most privileged first.
    pub const ALL: [RoleName; 8] = [
        RoleName::Admin,
        RoleName::JefeCampana,
        RoleName::ResponsableLocalidad,
        RoleName::ResponsableSeccion,
        RoleName::ResponsableCircuito,
        RoleName::FiscalGeneral,
        RoleName::FiscalMesa,
        RoleName::Logistica,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::JefeCampana => "jefe_campana",
            Self::ResponsableLocalidad => "responsable_localidad",
            Self::ResponsableSeccion => "responsable_seccion",
            Self::ResponsableCircuito => "responsable_circuito",
            Self::FiscalGeneral => "fiscal_general",
            Self::FiscalMesa => "fiscal_mesa",
            Self::Logistica => "logistica",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Admin => "Administrador",
            Self::JefeCampana => "Jefe de Campaña",
            Self::ResponsableLocalidad => "Responsable de Localidad",
            Self::ResponsableSeccion => "Responsable de Sección",
            Self::ResponsableCircuito => "Responsable de Circuito",
            Self::FiscalGeneral => "Fiscal General",
            Self::FiscalMesa => "Fiscal de Mesa",
            Self::Logistica => "Logística",
        }
    }

    /// Privilege rank, 1 being the most privileged. `fiscal_mesa` and
    /// `logistica` share the last rank.
    pub const fn rank(self) -> i16 {
        match self {
            Self::Admin => 1,
            Self::JefeCampana => 2,
            Self::ResponsableLocalidad => 3,
            Self::ResponsableSeccion => 4,
            Self::ResponsableCircuito => 5,
            Self::FiscalGeneral => 6,
            Self::FiscalMesa | Self::Logistica => 7,
        }
    }

    /// True if `self` ranks strictly below `other`.
    pub const fn is_below(self, other: RoleName) -> bool {
        self.rank() > other.rank()
    }
}

impl FromStr for RoleName {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleName::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ValueTypeError::UnknownRole(s.to_string()))
    }
}

impl_text_type!(RoleName);

/// CRUD action carried by a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    Create,
    Read,
    Update,
    Delete,
}

impl PermissionAction {
    pub const ALL: [PermissionAction; 4] = [
        PermissionAction::Create,
        PermissionAction::Read,
        PermissionAction::Update,
        PermissionAction::Delete,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl FromStr for PermissionAction {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ValueTypeError::UnknownAction(s.to_string()))
    }
}

impl_text_type!(PermissionAction);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
    pub display_name: String,
    pub rank: i16,
    /// System roles cannot be deleted.
    pub is_system: bool,
    pub status: Status,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    pub entity: String,
    pub action: PermissionAction,
    pub is_system: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RolePermission {
    pub role_id: RoleId,
    pub permission_id: PermissionId,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// Summary of a role the caller may create, as offered in the role picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleOption {
    pub name: RoleName,
    pub display_name: String,
    pub rank: i16,
}

impl From<RoleName> for RoleOption {
    fn from(name: RoleName) -> Self {
        Self {
            name,
            display_name: name.display_name().to_string(),
            rank: name.rank(),
        }
    }
}
