use axum::{
    Json,
    extract::{Path, State},
};
use civica_core::AppError;
use civica_models::{Permission, Role, RoleOption, RoleWithPermissions};

use crate::middleware::auth::{AuthUser, RequireRolesRead};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

use super::service::RoleService;

/// List every role ordered by rank
#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "Roles, most privileged first", body = Vec<Role>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_roles(
    State(state): State<AppState>,
    _auth_user: RequireRolesRead,
) -> Result<Json<Vec<Role>>, AppError> {
    let roles = RoleService::list_roles(state.store.as_ref()).await?;
    Ok(Json(roles))
}

/// List the permission catalog
#[utoipa::path(
    get,
    path = "/api/roles/permissions",
    responses(
        (status = 200, description = "Permissions ordered by name", body = Vec<Permission>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_permissions(
    State(state): State<AppState>,
    _auth_user: RequireRolesRead,
) -> Result<Json<Vec<Permission>>, AppError> {
    let permissions = RoleService::list_permissions(state.store.as_ref()).await?;
    Ok(Json(permissions))
}

/// Get a role with its permissions
#[utoipa::path(
    get,
    path = "/api/roles/{name}/permissions",
    params(("name" = String, Path, description = "Symbolic role name, e.g. fiscal_mesa")),
    responses(
        (status = 200, description = "Role and its permissions", body = RoleWithPermissions),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Role not seeded", body = ErrorResponse),
        (status = 422, description = "Unknown role", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_role_permissions(
    State(state): State<AppState>,
    _auth_user: RequireRolesRead,
    Path(name): Path<String>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role = RoleService::role_with_permissions(state.store.as_ref(), &name).await?;
    Ok(Json(role))
}

/// Roles the caller may assign to a new collaborator
#[utoipa::path(
    get,
    path = "/api/roles/creatable",
    responses(
        (status = 200, description = "Creatable roles, most privileged first", body = Vec<RoleOption>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_creatable_roles(auth_user: AuthUser) -> Json<Vec<RoleOption>> {
    Json(RoleService::creatable_roles(auth_user.role()))
}
