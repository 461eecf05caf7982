//! Access grant models and DTOs.
//!
//! An access grant ties a user to one organizational entity at one level. The
//! set of grants a user holds defines the territory they may act upon.

use crate::ids::{AccessGrantId, EntityId, UserId};
use crate::levels::Level;
use crate::roles::RoleName;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// How many entities of one level may be picked for a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Single,
    Multiple,
}

/// A level offered for assignment together with its selection arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssignableLevel {
    pub level: Level,
    pub selection: Selection,
}

/// A persisted grant (`user_accesses` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AccessGrant {
    pub id: AccessGrantId,
    pub user_id: UserId,
    pub entity_type: Level,
    pub entity_id: EntityId,
    /// Denormalised parent of the entity, for display.
    pub parent_id: Option<EntityId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A grant to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NewGrant {
    pub level: Level,
    pub entity_id: EntityId,
    pub parent_id: Option<EntityId>,
}

impl NewGrant {
    pub const fn new(level: Level, entity_id: EntityId, parent_id: Option<EntityId>) -> Self {
        Self {
            level,
            entity_id,
            parent_id,
        }
    }

    /// The identity used for uniqueness: `(level, entity_id)` per user.
    pub const fn key(&self) -> (Level, EntityId) {
        (self.level, self.entity_id)
    }
}

/// One requested level assignment, as received from the client.
///
/// `entity_type` stays a string here so that unknown levels are reported as
/// an invalid level rather than a generic body rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessLevelRequest {
    pub entity_type: String,
    pub entity_id: EntityId,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReplaceAccessDto {
    #[validate(length(min = 1, message = "At least one access level is required"))]
    pub access_levels: Vec<AccessLevelRequest>,
}

/// A grant joined with the display name of its entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessGrantView {
    pub entity_type: Level,
    pub entity_id: EntityId,
    pub entity_name: String,
    pub parent_id: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserAccessResponse {
    pub user_id: UserId,
    pub role: RoleName,
    pub access: Vec<AccessGrantView>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AssignableLevelsQuery {
    /// Role selected for the new or edited collaborator.
    pub target_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignableLevelsResponse {
    pub acting_role: RoleName,
    pub target_role: RoleName,
    /// Empty when the acting role may not scope the target role at all.
    pub levels: Vec<AssignableLevel>,
}
