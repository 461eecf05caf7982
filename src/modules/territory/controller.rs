use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use civica_core::AppError;
use civica_models::{CreateEntityDto, EntityFilterParams, OrgEntity, PermissionAction};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::TerritoryService;

/// Create an organizational entity
#[utoipa::path(
    post,
    path = "/api/territory/{level}",
    params(("level" = String, Path, description = "localidad, circuito, escuela or mesa")),
    request_body = CreateEntityDto,
    responses(
        (status = 201, description = "Entity created", body = OrgEntity),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Unknown level, bad parent or missing parent entity", body = ErrorResponse)
    ),
    tag = "Territory",
    security(("bearer_auth" = []))
)]
pub async fn create_entity(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(level): Path<String>,
    ValidatedJson(dto): ValidatedJson<CreateEntityDto>,
) -> Result<(StatusCode, Json<OrgEntity>), AppError> {
    let level = TerritoryService::parse_level(&level)?;
    TerritoryService::authorize(&auth_user, level, PermissionAction::Create)?;
    let entity = TerritoryService::create_entity(state.store.as_ref(), level, dto).await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

/// List the entities of a level
#[utoipa::path(
    get,
    path = "/api/territory/{level}",
    params(
        ("level" = String, Path, description = "localidad, circuito, escuela or mesa"),
        EntityFilterParams
    ),
    responses(
        (status = 200, description = "Entities ordered by id", body = Vec<OrgEntity>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Unknown level", body = ErrorResponse)
    ),
    tag = "Territory",
    security(("bearer_auth" = []))
)]
pub async fn list_entities(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(level): Path<String>,
    Query(params): Query<EntityFilterParams>,
) -> Result<Json<Vec<OrgEntity>>, AppError> {
    let level = TerritoryService::parse_level(&level)?;
    TerritoryService::authorize(&auth_user, level, PermissionAction::Read)?;
    let entities = TerritoryService::list_entities(state.store.as_ref(), level, params).await?;
    Ok(Json(entities))
}
