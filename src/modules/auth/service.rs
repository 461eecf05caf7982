use civica_access::{AccessError, Store};
use civica_auth::create_access_token;
use civica_config::JwtConfig;
use civica_core::{AppError, verify_password};
use civica_models::{LoginRequest, LoginResponse, RoleName, Status};
use civica_observability::{track_login_failure, track_login_success};
use tracing::{info, instrument, warn};

pub struct AuthService;

impl AuthService {
    /// Permission names joined to `role` in the stored catalog.
    ///
    /// A role missing from the catalog holds nothing.
    pub async fn granted_permissions(
        store: &dyn Store,
        role: RoleName,
    ) -> Result<Vec<String>, AppError> {
        match store.role_permissions(role).await {
            Ok(permissions) => Ok(permissions.into_iter().map(|p| p.name).collect()),
            Err(AccessError::NotFound(_)) => {
                warn!(%role, "Role is not in the catalog; issuing a token without permissions");
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(store, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        store: &dyn Store,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) = store.find_user_by_email(&dto.email).await? else {
            warn!("Login attempt for unknown email");
            track_login_failure("unknown_email");
            return Err(AppError::unauthorized("Invalid email or password"));
        };

        if !verify_password(&dto.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            track_login_failure("wrong_password");
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        if user.status != Status::Active {
            track_login_failure("inactive");
            return Err(AppError::unauthorized("Account is inactive"));
        }

        let permissions = Self::granted_permissions(store, user.role).await?;
        let access_token = create_access_token(&user, permissions, jwt_config)?;

        info!(user_id = %user.id, role = %user.role, "User logged in");
        track_login_success(user.role.as_str());

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            user,
        })
    }
}
