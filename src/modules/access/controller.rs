use axum::{
    Json,
    extract::{Path, Query, State},
};
use civica_core::AppError;
use civica_models::{
    AssignableLevelsQuery, AssignableLevelsResponse, ReplaceAccessDto, UserAccessResponse, UserId,
};

use crate::middleware::auth::{AuthUser, RequireUsersRead};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::AccessService;

/// Levels the caller may assign to a collaborator of `target_role`
#[utoipa::path(
    get,
    path = "/api/access/levels",
    params(AssignableLevelsQuery),
    responses(
        (status = 200, description = "Assignable levels, in hierarchy order", body = AssignableLevelsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Unknown role", body = ErrorResponse)
    ),
    tag = "Access",
    security(("bearer_auth" = []))
)]
pub async fn get_assignable_levels(
    auth_user: AuthUser,
    Query(query): Query<AssignableLevelsQuery>,
) -> Result<Json<AssignableLevelsResponse>, AppError> {
    let response = AccessService::assignable_levels(auth_user.role(), &query.target_role)?;
    Ok(Json(response))
}

/// Access grants of a collaborator with entity names
#[utoipa::path(
    get,
    path = "/api/users/{id}/access",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Current access grants", body = UserAccessResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Access",
    security(("bearer_auth" = []))
)]
pub async fn get_user_access(
    State(state): State<AppState>,
    RequireUsersRead(auth_user): RequireUsersRead,
    Path(id): Path<UserId>,
) -> Result<Json<UserAccessResponse>, AppError> {
    let response =
        AccessService::list_user_access(state.store.as_ref(), auth_user.role(), id).await?;
    Ok(Json(response))
}

/// Replace every access grant of a collaborator
#[utoipa::path(
    put,
    path = "/api/users/{id}/access",
    params(("id" = i64, Path, description = "User ID")),
    request_body = ReplaceAccessDto,
    responses(
        (status = 200, description = "Grants replaced", body = UserAccessResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Level or role not assignable", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Duplicate grant", body = ErrorResponse),
        (status = 422, description = "Validation error or unknown entity", body = ErrorResponse)
    ),
    tag = "Access",
    security(("bearer_auth" = []))
)]
pub async fn replace_user_access(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<ReplaceAccessDto>,
) -> Result<Json<UserAccessResponse>, AppError> {
    let response =
        AccessService::replace_user_access(state.store.as_ref(), auth_user.role(), id, dto)
            .await?;
    Ok(Json(response))
}
