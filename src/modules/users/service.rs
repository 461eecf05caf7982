use civica_access::assignment::resolve_grants;
use civica_access::{AccessError, Store};
use civica_core::{AppError, hash_password};
use civica_models::{CollaboratorResponse, CreateCollaboratorDto, NewUser, RoleName, User, UserId};
use civica_observability::track_collaborator_created;
use tracing::{info, instrument};

use crate::modules::access::service::{managed_user, record_denial};

pub struct UserService;

impl UserService {
    /// Creates a collaborator together with its access grants.
    ///
    /// The grants are validated against the acting role before anything is
    /// hashed or written; the user row and its grants are stored atomically.
    #[instrument(skip(store, dto), fields(email = %dto.email, role = %dto.role))]
    pub async fn create_collaborator(
        store: &dyn Store,
        acting: RoleName,
        dto: CreateCollaboratorDto,
    ) -> Result<CollaboratorResponse, AppError> {
        let target: RoleName = dto.role.parse().map_err(AccessError::from)?;

        let grants = resolve_grants(store.directory(), acting, target, &dto.access_levels)
            .await
            .inspect_err(|err| record_denial(err, acting, target))?;

        let new_user = NewUser {
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            password_hash: hash_password(&dto.password)?,
            role: target,
        };

        let (user, access) = store.create_user(new_user, &grants).await?;

        info!(user_id = %user.id, grants = access.len(), "Collaborator created");
        track_collaborator_created(target.as_str());

        Ok(CollaboratorResponse { user, access })
    }

    #[instrument(skip(store))]
    pub async fn get_collaborator(
        store: &dyn Store,
        acting: RoleName,
        id: UserId,
    ) -> Result<User, AppError> {
        managed_user(store, acting, id).await
    }

    /// Deletes a collaborator; its grants go with it.
    #[instrument(skip(store))]
    pub async fn delete_collaborator(
        store: &dyn Store,
        acting: RoleName,
        acting_id: UserId,
        id: UserId,
    ) -> Result<(), AppError> {
        if acting_id == id {
            return Err(AppError::forbidden("You cannot delete your own account"));
        }

        let user = managed_user(store, acting, id).await?;
        store.delete_user(user.id).await?;

        info!(user_id = %user.id, role = %user.role, "Collaborator deleted");
        Ok(())
    }
}
