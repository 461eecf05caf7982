use civica_access::{AccessError, Store};
use civica_core::AppError;
use civica_core::permissions::permission_name;
use civica_models::{CreateEntityDto, EntityFilterParams, Level, OrgEntity, PermissionAction};
use tracing::{info, instrument};

use crate::middleware::auth::AuthUser;

pub struct TerritoryService;

impl TerritoryService {
    /// Parses a `{level}` path segment.
    pub fn parse_level(level: &str) -> Result<Level, AppError> {
        Ok(level.parse::<Level>().map_err(AccessError::from)?)
    }

    /// Requires `<table>.<action>` for the entities of `level`.
    pub fn authorize(
        auth_user: &AuthUser,
        level: Level,
        action: PermissionAction,
    ) -> Result<(), AppError> {
        let permission = permission_name(level.table(), action.as_str());
        if !auth_user.has_permission(&permission) {
            return Err(AppError::forbidden(format!(
                "Access denied. Missing required permission: {}",
                permission
            )));
        }
        Ok(())
    }

    #[instrument(skip(store, dto), fields(name = %dto.name))]
    pub async fn create_entity(
        store: &dyn Store,
        level: Level,
        dto: CreateEntityDto,
    ) -> Result<OrgEntity, AppError> {
        let entity = store.create_entity(level, &dto.name, dto.parent_id).await?;
        info!(%level, id = %entity.id, "Organizational entity created");
        Ok(entity)
    }

    #[instrument(skip(store))]
    pub async fn list_entities(
        store: &dyn Store,
        level: Level,
        params: EntityFilterParams,
    ) -> Result<Vec<OrgEntity>, AppError> {
        Ok(store.list_entities(level, params.parent_id).await?)
    }
}
