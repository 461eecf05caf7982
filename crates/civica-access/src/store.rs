//! Storage seams.
//!
//! The domain talks to persistence through four traits. [`Store`] bundles
//! them so the application state can hold a single `Arc<dyn Store>`.
//! Implementations: [`crate::memory::InMemoryStore`] and the PostgreSQL
//! store in `civica-db`.

use async_trait::async_trait;
use civica_models::{
    AccessGrant, EntityId, Level, NewGrant, NewUser, OrgEntity, Permission, Role, RoleName, User,
    UserId,
};

use crate::catalog::{CatalogCounts, CatalogPlan};
use crate::error::{AccessError, AccessResult};

/// The `(level, id)` an entity of `level` must reference as its parent.
///
/// Localidades take no parent; every other level requires one.
pub fn parent_link(
    level: Level,
    parent_id: Option<EntityId>,
) -> AccessResult<Option<(Level, EntityId)>> {
    match (level.parent(), parent_id) {
        (None, None) => Ok(None),
        (None, Some(_)) => Err(AccessError::validation(format!(
            "A {} has no parent",
            level
        ))),
        (Some(parent_level), None) => Err(AccessError::validation(format!(
            "A {} requires a parent {}",
            level, parent_level
        ))),
        (Some(parent_level), Some(parent)) => Ok(Some((parent_level, parent))),
    }
}

/// Role and permission catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// True when at least one role exists.
    async fn is_seeded(&self) -> AccessResult<bool>;

    /// Write `plan` in one unit of work. With `reset`, existing roles,
    /// permissions and role-permission rows are removed first.
    async fn apply_plan(&self, plan: &CatalogPlan, reset: bool) -> AccessResult<CatalogCounts>;

    /// Roles ordered by rank.
    async fn list_roles(&self) -> AccessResult<Vec<Role>>;

    /// Permissions ordered by name.
    async fn list_permissions(&self) -> AccessResult<Vec<Permission>>;

    async fn role_permissions(&self, role: RoleName) -> AccessResult<Vec<Permission>>;
}

/// Organizational entities (`localidad → circuito → escuela → mesa`).
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Fails with `DanglingReference` when the parent does not exist and with
    /// `Validation` when a parent is missing or supplied for a localidad.
    async fn create_entity(
        &self,
        level: Level,
        name: &str,
        parent_id: Option<EntityId>,
    ) -> AccessResult<OrgEntity>;

    async fn find_entity(&self, level: Level, id: EntityId) -> AccessResult<Option<OrgEntity>>;

    /// Entities of `level` ordered by id, optionally restricted to children of `parent_id`.
    async fn list_entities(
        &self,
        level: Level,
        parent_id: Option<EntityId>,
    ) -> AccessResult<Vec<OrgEntity>>;

    /// Remove every entity and every grant that pointed at one. Returns the
    /// number of entities removed.
    async fn clear_entities(&self) -> AccessResult<u64>;
}

/// Access grants (`user_accesses`).
#[async_trait]
pub trait AccessGrantStore: Send + Sync {
    async fn grant(&self, user_id: UserId, grant: NewGrant) -> AccessResult<AccessGrant>;

    /// Replace the whole grant set of `user_id`. Either every new grant is
    /// written and every old one removed, or nothing changes.
    async fn replace_grants(
        &self,
        user_id: UserId,
        grants: &[NewGrant],
    ) -> AccessResult<Vec<AccessGrant>>;

    /// Grants ordered by level rank, then entity id.
    async fn list_grants(&self, user_id: UserId) -> AccessResult<Vec<AccessGrant>>;

    /// Returns the number of grants removed.
    async fn revoke_all(&self, user_id: UserId) -> AccessResult<u64>;
}

/// Collaborator accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert the user and its grants in one unit of work.
    async fn create_user(
        &self,
        user: NewUser,
        grants: &[NewGrant],
    ) -> AccessResult<(User, Vec<AccessGrant>)>;

    async fn find_user(&self, id: UserId) -> AccessResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AccessResult<Option<User>>;

    /// Delete the user together with its grants. `NotFound` if absent.
    async fn delete_user(&self, id: UserId) -> AccessResult<()>;
}

pub trait Store: CatalogStore + DirectoryStore + AccessGrantStore + UserStore {
    fn catalog(&self) -> &dyn CatalogStore;

    fn directory(&self) -> &dyn DirectoryStore;
}

impl<T> Store for T
where
    T: CatalogStore + DirectoryStore + AccessGrantStore + UserStore,
{
    fn catalog(&self) -> &dyn CatalogStore {
        self
    }

    fn directory(&self) -> &dyn DirectoryStore {
        self
    }
}
