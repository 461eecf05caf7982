use civica_access::{AccessError, Store, creatable};
use civica_core::AppError;
use civica_models::{Permission, Role, RoleName, RoleOption, RoleWithPermissions};
use tracing::instrument;

pub struct RoleService;

impl RoleService {
    #[instrument(skip(store))]
    pub async fn list_roles(store: &dyn Store) -> Result<Vec<Role>, AppError> {
        Ok(store.list_roles().await?)
    }

    #[instrument(skip(store))]
    pub async fn list_permissions(store: &dyn Store) -> Result<Vec<Permission>, AppError> {
        Ok(store.list_permissions().await?)
    }

    #[instrument(skip(store))]
    pub async fn role_with_permissions(
        store: &dyn Store,
        name: &str,
    ) -> Result<RoleWithPermissions, AppError> {
        let name: RoleName = name.parse().map_err(AccessError::from)?;

        let role = store
            .list_roles()
            .await?
            .into_iter()
            .find(|role| role.name == name)
            .ok_or_else(|| AccessError::NotFound(format!("Role {}", name)))?;
        let permissions = store.role_permissions(name).await?;

        Ok(RoleWithPermissions { role, permissions })
    }

    /// Roles the acting role may assign to a new collaborator, most privileged first.
    pub fn creatable_roles(acting: RoleName) -> Vec<RoleOption> {
        creatable(acting).iter().copied().map(RoleOption::from).collect()
    }
}
