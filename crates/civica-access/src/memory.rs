//! In-memory store.
//!
//! Holds the whole dataset behind a `tokio::sync::RwLock`. Every write clones
//! the state, applies its changes to the copy and swaps it in only on
//! success, so a failed operation leaves nothing behind.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use civica_models::{
    AccessGrant, AccessGrantId, EntityId, Level, NewGrant, NewUser, OrgEntity, Permission,
    PermissionId, Role, RoleId, RoleName, RolePermission, Status, User, UserId,
};
use tokio::sync::RwLock;

use crate::catalog::{CatalogCounts, CatalogPlan};
use crate::error::{AccessError, AccessResult};
use crate::store::{AccessGrantStore, CatalogStore, DirectoryStore, UserStore, parent_link};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    next_id: i64,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
    role_permissions: Vec<RolePermission>,
    entities: BTreeMap<(Level, EntityId), OrgEntity>,
    users: BTreeMap<UserId, User>,
    grants: Vec<AccessGrant>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_user(&self, user_id: UserId) -> AccessResult<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(AccessError::NotFound(format!("User {}", user_id)))
        }
    }

    fn insert_grant(&mut self, user_id: UserId, grant: NewGrant) -> AccessResult<AccessGrant> {
        if !self.entities.contains_key(&grant.key()) {
            return Err(AccessError::DanglingReference {
                level: grant.level,
                entity_id: grant.entity_id,
            });
        }
        let duplicate = self.grants.iter().any(|g| {
            g.user_id == user_id && g.entity_type == grant.level && g.entity_id == grant.entity_id
        });
        if duplicate {
            return Err(AccessError::DuplicateGrant {
                user_id,
                level: grant.level,
                entity_id: grant.entity_id,
            });
        }

        let row = AccessGrant {
            id: AccessGrantId::new(self.next_id()),
            user_id,
            entity_type: grant.level,
            entity_id: grant.entity_id,
            parent_id: grant.parent_id,
            created_at: Utc::now(),
        };
        self.grants.push(row.clone());
        Ok(row)
    }

    fn grants_of(&self, user_id: UserId) -> Vec<AccessGrant> {
        let mut grants: Vec<AccessGrant> = self
            .grants
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        grants.sort_by_key(|g| (g.entity_type, g.entity_id));
        grants
    }

    fn remove_grants_of(&mut self, user_id: UserId) -> u64 {
        let before = self.grants.len();
        self.grants.retain(|g| g.user_id != user_id);
        (before - self.grants.len()) as u64
    }

    fn role_by_name(&self, name: RoleName) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a copy of the state and keep the copy only if `f` succeeds.
    async fn write<T>(
        &self,
        f: impl FnOnce(&mut MemoryState) -> AccessResult<T>,
    ) -> AccessResult<T> {
        let mut guard = self.state.write().await;
        let mut staged = guard.clone();
        let value = f(&mut staged)?;
        *guard = staged;
        Ok(value)
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn is_seeded(&self) -> AccessResult<bool> {
        Ok(!self.state.read().await.roles.is_empty())
    }

    async fn apply_plan(&self, plan: &CatalogPlan, reset: bool) -> AccessResult<CatalogCounts> {
        self.write(|state| {
            if reset {
                state.role_permissions.clear();
                state.permissions.clear();
                state.roles.clear();
            }

            for seed in &plan.roles {
                if state.role_by_name(seed.name).is_some() {
                    return Err(AccessError::BootstrapFailure(format!(
                        "role {} already exists",
                        seed.name
                    )));
                }
                let id = RoleId::new(state.next_id());
                state.roles.push(Role {
                    id,
                    name: seed.name,
                    display_name: seed.display_name.to_string(),
                    rank: seed.rank,
                    is_system: true,
                    status: Status::Active,
                    created_at: Utc::now(),
                });
            }

            for seed in &plan.permissions {
                if state.permissions.iter().any(|p| p.name == seed.name) {
                    return Err(AccessError::BootstrapFailure(format!(
                        "permission {} already exists",
                        seed.name
                    )));
                }
                let id = PermissionId::new(state.next_id());
                state.permissions.push(Permission {
                    id,
                    name: seed.name.clone(),
                    entity: seed.entity.to_string(),
                    action: seed.action,
                    is_system: true,
                    created_at: Utc::now(),
                });
            }

            for (role, permission) in &plan.grants {
                let role_id = state
                    .role_by_name(*role)
                    .map(|r| r.id)
                    .ok_or_else(|| AccessError::BootstrapFailure(format!("unknown role {}", role)))?;
                let permission_id = state
                    .permissions
                    .iter()
                    .find(|p| &p.name == permission)
                    .map(|p| p.id)
                    .ok_or_else(|| {
                        AccessError::BootstrapFailure(format!("unknown permission {}", permission))
                    })?;
                state.role_permissions.push(RolePermission {
                    role_id,
                    permission_id,
                });
            }

            Ok(plan.counts())
        })
        .await
    }

    async fn list_roles(&self) -> AccessResult<Vec<Role>> {
        let state = self.state.read().await;
        let mut roles = state.roles.clone();
        roles.sort_by_key(|r| (r.rank, r.name));
        Ok(roles)
    }

    async fn list_permissions(&self) -> AccessResult<Vec<Permission>> {
        let state = self.state.read().await;
        let mut permissions = state.permissions.clone();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(permissions)
    }

    async fn role_permissions(&self, role: RoleName) -> AccessResult<Vec<Permission>> {
        let state = self.state.read().await;
        let role = state
            .role_by_name(role)
            .ok_or_else(|| AccessError::NotFound(format!("Role {}", role)))?;
        let mut permissions: Vec<Permission> = state
            .role_permissions
            .iter()
            .filter(|rp| rp.role_id == role.id)
            .filter_map(|rp| state.permissions.iter().find(|p| p.id == rp.permission_id))
            .cloned()
            .collect();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(permissions)
    }
}

#[async_trait]
impl DirectoryStore for InMemoryStore {
    async fn create_entity(
        &self,
        level: Level,
        name: &str,
        parent_id: Option<EntityId>,
    ) -> AccessResult<OrgEntity> {
        self.write(|state| {
            if let Some((parent_level, parent)) = parent_link(level, parent_id)? {
                if !state.entities.contains_key(&(parent_level, parent)) {
                    return Err(AccessError::DanglingReference {
                        level: parent_level,
                        entity_id: parent,
                    });
                }
            }

            let entity = OrgEntity {
                id: EntityId::new(state.next_id()),
                level,
                name: name.to_string(),
                parent_id,
                status: Status::Active,
                created_at: Utc::now(),
            };
            state.entities.insert((level, entity.id), entity.clone());
            Ok(entity)
        })
        .await
    }

    async fn find_entity(&self, level: Level, id: EntityId) -> AccessResult<Option<OrgEntity>> {
        Ok(self.state.read().await.entities.get(&(level, id)).cloned())
    }

    async fn list_entities(
        &self,
        level: Level,
        parent_id: Option<EntityId>,
    ) -> AccessResult<Vec<OrgEntity>> {
        let state = self.state.read().await;
        Ok(state
            .entities
            .values()
            .filter(|e| e.level == level)
            .filter(|e| parent_id.is_none() || e.parent_id == parent_id)
            .cloned()
            .collect())
    }

    async fn clear_entities(&self) -> AccessResult<u64> {
        self.write(|state| {
            let removed = state.entities.len() as u64;
            state.entities.clear();
            state.grants.clear();
            Ok(removed)
        })
        .await
    }
}

#[async_trait]
impl AccessGrantStore for InMemoryStore {
    async fn grant(&self, user_id: UserId, grant: NewGrant) -> AccessResult<AccessGrant> {
        self.write(|state| {
            state.require_user(user_id)?;
            state.insert_grant(user_id, grant)
        })
        .await
    }

    async fn replace_grants(
        &self,
        user_id: UserId,
        grants: &[NewGrant],
    ) -> AccessResult<Vec<AccessGrant>> {
        self.write(|state| {
            state.require_user(user_id)?;
            state.remove_grants_of(user_id);
            for grant in grants {
                state.insert_grant(user_id, *grant)?;
            }
            Ok(state.grants_of(user_id))
        })
        .await
    }

    async fn list_grants(&self, user_id: UserId) -> AccessResult<Vec<AccessGrant>> {
        Ok(self.state.read().await.grants_of(user_id))
    }

    async fn revoke_all(&self, user_id: UserId) -> AccessResult<u64> {
        self.write(|state| Ok(state.remove_grants_of(user_id))).await
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(
        &self,
        user: NewUser,
        grants: &[NewGrant],
    ) -> AccessResult<(User, Vec<AccessGrant>)> {
        self.write(|state| {
            if state.users.values().any(|u| u.email == user.email) {
                return Err(AccessError::DuplicateEmail(user.email));
            }
            let row = User {
                id: UserId::new(state.next_id()),
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                password_hash: user.password_hash,
                role: user.role,
                status: Status::Active,
                created_at: Utc::now(),
            };
            state.users.insert(row.id, row.clone());
            for grant in grants {
                state.insert_grant(row.id, *grant)?;
            }
            let written = state.grants_of(row.id);
            Ok((row, written))
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> AccessResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AccessResult<Option<User>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn delete_user(&self, id: UserId) -> AccessResult<()> {
        self.write(|state| {
            if state.users.remove(&id).is_none() {
                return Err(AccessError::NotFound(format!("User {}", id)));
            }
            state.remove_grants_of(id);
            Ok(())
        })
        .await
    }
}
