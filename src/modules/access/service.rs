use civica_access::assignment::resolve_grants;
use civica_access::cache::EntityCache;
use civica_access::{AccessError, Store, assignable_levels, can_create};
use civica_core::AppError;
use civica_models::{
    AccessGrant, AccessGrantView, AssignableLevelsResponse, ReplaceAccessDto, RoleName, User,
    UserAccessResponse, UserId,
};
use civica_observability::{track_authorization_denied, track_grants_replaced};
use tracing::{info, instrument, warn};

/// Logs and counts a refused assignment. Other errors pass through untouched.
pub(crate) fn record_denial(err: &AccessError, acting: RoleName, target: RoleName) {
    if matches!(
        err,
        AccessError::AuthorizationDenied(_) | AccessError::NoAssignableLevels { .. }
    ) {
        warn!(%acting, %target, reason = err.kind(), error = %err, "Access assignment denied");
        track_authorization_denied(err.kind());
    }
}

/// Loads a user the acting role is allowed to manage.
pub(crate) async fn managed_user(
    store: &dyn Store,
    acting: RoleName,
    id: UserId,
) -> Result<User, AppError> {
    let user = store
        .find_user(id)
        .await?
        .ok_or_else(|| AccessError::NotFound(format!("User {}", id)))?;

    if acting != RoleName::Admin && !can_create(acting, user.role) {
        let err = AccessError::denied(format!(
            "Role {} cannot manage users with role {}",
            acting, user.role
        ));
        record_denial(&err, acting, user.role);
        return Err(err.into());
    }

    Ok(user)
}

pub struct AccessService;

impl AccessService {
    pub fn assignable_levels(
        acting: RoleName,
        target_role: &str,
    ) -> Result<AssignableLevelsResponse, AppError> {
        let target: RoleName = target_role.parse().map_err(AccessError::from)?;

        Ok(AssignableLevelsResponse {
            acting_role: acting,
            target_role: target,
            levels: assignable_levels(acting, target),
        })
    }

    #[instrument(skip(store))]
    pub async fn list_user_access(
        store: &dyn Store,
        acting: RoleName,
        user_id: UserId,
    ) -> Result<UserAccessResponse, AppError> {
        let user = managed_user(store, acting, user_id).await?;
        let grants = store.list_grants(user.id).await?;
        Self::into_response(store, &user, grants).await
    }

    #[instrument(skip(store, dto), fields(requested = dto.access_levels.len()))]
    pub async fn replace_user_access(
        store: &dyn Store,
        acting: RoleName,
        user_id: UserId,
        dto: ReplaceAccessDto,
    ) -> Result<UserAccessResponse, AppError> {
        let user = managed_user(store, acting, user_id).await?;

        let grants = resolve_grants(store.directory(), acting, user.role, &dto.access_levels)
            .await
            .inspect_err(|err| record_denial(err, acting, user.role))?;

        let written = store.replace_grants(user.id, &grants).await?;

        info!(user_id = %user.id, grants = written.len(), "Access grants replaced");
        track_grants_replaced(written.len());

        Self::into_response(store, &user, written).await
    }

    /// Joins each grant with the display name of its entity.
    async fn into_response(
        store: &dyn Store,
        user: &User,
        grants: Vec<AccessGrant>,
    ) -> Result<UserAccessResponse, AppError> {
        let mut cache = EntityCache::new(store.directory());
        let mut access = Vec::with_capacity(grants.len());

        for grant in grants {
            let entity = cache.require(grant.entity_type, grant.entity_id).await?;
            access.push(AccessGrantView {
                entity_type: grant.entity_type,
                entity_id: grant.entity_id,
                entity_name: entity.name.clone(),
                parent_id: grant.parent_id,
            });
        }

        Ok(UserAccessResponse {
            user_id: user.id,
            role: user.role,
            access,
        })
    }
}
