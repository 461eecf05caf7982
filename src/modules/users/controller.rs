use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use civica_core::AppError;
use civica_models::{CollaboratorResponse, CreateCollaboratorDto, User, UserId};

use crate::middleware::auth::{AuthUser, RequireUsersRead};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::UserService;

/// Create a collaborator with a role and its access levels
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateCollaboratorDto,
    responses(
        (status = 201, description = "Collaborator created", body = CollaboratorResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Role or level not assignable by the caller", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error or unknown entity", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateCollaboratorDto>,
) -> Result<(StatusCode, Json<CollaboratorResponse>), AppError> {
    let created =
        UserService::create_collaborator(state.store.as_ref(), auth_user.role(), dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a collaborator by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Collaborator", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    RequireUsersRead(auth_user): RequireUsersRead,
    Path(id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_collaborator(state.store.as_ref(), auth_user.role(), id).await?;
    Ok(Json(user))
}

/// Delete a collaborator and all of its access grants
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "Collaborator deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    UserService::delete_collaborator(
        state.store.as_ref(),
        auth_user.role(),
        auth_user.user_id()?,
        id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
