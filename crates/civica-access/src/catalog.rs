//! Permission catalog and its bootstrap.
//!
//! [`CatalogPlan::standard`] computes the full role/permission catalog as
//! plain data. [`bootstrap`] writes it through a [`CatalogStore`].

use civica_core::permissions::{self, ENTITIES};
use civica_models::{PermissionAction, RoleName};
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{AccessError, AccessResult};
use crate::hierarchy::creatable;
use crate::store::CatalogStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSeed {
    pub name: RoleName,
    pub display_name: &'static str,
    pub rank: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSeed {
    pub name: String,
    pub entity: &'static str,
    pub action: PermissionAction,
}

/// The complete catalog: roles, permissions and the role-permission pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPlan {
    pub roles: Vec<RoleSeed>,
    pub permissions: Vec<PermissionSeed>,
    /// `(role, permission name)` pairs.
    pub grants: Vec<(RoleName, String)>,
}

impl CatalogPlan {
    pub fn standard() -> Self {
        let roles = RoleName::ALL
            .into_iter()
            .map(|name| RoleSeed {
                name,
                display_name: name.display_name(),
                rank: name.rank(),
            })
            .collect();

        let mut permissions: Vec<PermissionSeed> = ENTITIES
            .iter()
            .flat_map(|entity| {
                PermissionAction::ALL.into_iter().map(move |action| PermissionSeed {
                    name: permissions::permission_name(entity, action.as_str()),
                    entity,
                    action,
                })
            })
            .collect();

        permissions.extend(
            RoleName::ALL
                .into_iter()
                .filter(|role| *role != RoleName::Admin)
                .map(|role| PermissionSeed {
                    name: permissions::create_user_permission(role.as_str()),
                    entity: "users",
                    action: PermissionAction::Create,
                }),
        );

        let grants = RoleName::ALL
            .into_iter()
            .flat_map(|role| {
                permissions_for(role)
                    .into_iter()
                    .map(move |permission| (role, permission))
            })
            .collect();

        Self {
            roles,
            permissions,
            grants,
        }
    }

    pub fn counts(&self) -> CatalogCounts {
        CatalogCounts {
            roles: self.roles.len(),
            permissions: self.permissions.len(),
            role_permissions: self.grants.len(),
        }
    }
}

/// Permission names materialised for `role`.
///
/// Admin holds every `entity.action`; every other role holds `entity.read`
/// for each entity. Each role additionally holds `users.create.<X>` for the
/// roles it may create.
pub fn permissions_for(role: RoleName) -> Vec<String> {
    let base = ENTITIES.iter().flat_map(|entity| {
        let actions: &[PermissionAction] = if role == RoleName::Admin {
            &PermissionAction::ALL
        } else {
            &[PermissionAction::Read]
        };
        actions
            .iter()
            .map(move |action| permissions::permission_name(entity, action.as_str()))
    });

    base.chain(
        creatable(role)
            .iter()
            .map(|target| permissions::create_user_permission(target.as_str())),
    )
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapMode {
    /// Seed only when the catalog is empty.
    IfEmpty,
    /// Wipe the catalog and seed it again.
    Reset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub roles: usize,
    pub permissions: usize,
    pub role_permissions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Seeded(CatalogCounts),
    AlreadySeeded,
}

/// Seed the role/permission catalog.
///
/// Seeding is all-or-nothing: any store failure is reported as
/// [`AccessError::BootstrapFailure`] and leaves the catalog untouched.
#[instrument(skip(store))]
pub async fn bootstrap(
    store: &dyn CatalogStore,
    mode: BootstrapMode,
) -> AccessResult<BootstrapOutcome> {
    if mode == BootstrapMode::IfEmpty && store.is_seeded().await? {
        info!("Catalog already seeded, nothing to do");
        return Ok(BootstrapOutcome::AlreadySeeded);
    }

    let plan = CatalogPlan::standard();
    let counts = store
        .apply_plan(&plan, mode == BootstrapMode::Reset)
        .await
        .map_err(|err| match err {
            AccessError::BootstrapFailure(_) => err,
            other => AccessError::BootstrapFailure(other.to_string()),
        })?;

    info!(
        roles = counts.roles,
        permissions = counts.permissions,
        role_permissions = counts.role_permissions,
        "Catalog seeded"
    );
    Ok(BootstrapOutcome::Seeded(counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use std::collections::HashSet;

    #[test]
    fn test_standard_plan_shape() {
        let plan = CatalogPlan::standard();
        assert_eq!(plan.roles.len(), 8);
        // 11 entities x 4 actions + one create permission per non-admin role.
        assert_eq!(plan.permissions.len(), 44 + 7);

        let names: HashSet<_> = plan.permissions.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), plan.permissions.len());
        assert!(names.contains("users.create.fiscal_mesa"));
        assert!(!names.contains("users.create.admin"));
    }

    #[test]
    fn test_every_grant_references_a_catalog_permission() {
        let plan = CatalogPlan::standard();
        let names: HashSet<_> = plan.permissions.iter().map(|p| p.name.clone()).collect();
        for (role, permission) in &plan.grants {
            assert!(names.contains(permission), "{} -> {}", role, permission);
        }
    }

    #[test]
    fn test_admin_holds_all_crud() {
        let perms = permissions_for(RoleName::Admin);
        assert!(perms.contains(&"users.delete".to_string()));
        assert!(perms.contains(&"mesas.create".to_string()));
        assert!(perms.contains(&"users.create.jefe_campana".to_string()));
        assert_eq!(perms.len(), 44 + 7);
    }

    #[test]
    fn test_non_admin_holds_read_plus_creatable() {
        let perms = permissions_for(RoleName::FiscalGeneral);
        assert!(perms.contains(&"citizens.read".to_string()));
        assert!(!perms.contains(&"citizens.update".to_string()));
        assert!(perms.contains(&"users.create.fiscal_mesa".to_string()));
        assert!(!perms.contains(&"users.create.logistica".to_string()));
        assert_eq!(perms.len(), 11 + 1);

        assert_eq!(permissions_for(RoleName::Logistica).len(), 11);
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let store = InMemoryStore::new();

        let first = bootstrap(&store, BootstrapMode::IfEmpty).await.unwrap();
        let expected = CatalogPlan::standard().counts();
        assert_eq!(first, BootstrapOutcome::Seeded(expected));

        let roles_before = store.list_roles().await.unwrap();
        let perms_before = store.list_permissions().await.unwrap();

        let second = bootstrap(&store, BootstrapMode::IfEmpty).await.unwrap();
        assert_eq!(second, BootstrapOutcome::AlreadySeeded);
        assert_eq!(store.list_roles().await.unwrap(), roles_before);
        assert_eq!(store.list_permissions().await.unwrap(), perms_before);
    }

    #[tokio::test]
    async fn test_bootstrap_reset_reseeds() {
        let store = InMemoryStore::new();
        bootstrap(&store, BootstrapMode::IfEmpty).await.unwrap();

        let outcome = bootstrap(&store, BootstrapMode::Reset).await.unwrap();
        assert_eq!(
            outcome,
            BootstrapOutcome::Seeded(CatalogPlan::standard().counts())
        );
        assert_eq!(store.list_roles().await.unwrap().len(), 8);

        let perms = store.role_permissions(RoleName::Logistica).await.unwrap();
        assert_eq!(perms.len(), 11);
    }
}
