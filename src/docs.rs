use civica_models::{
    AccessGrant, AccessGrantView, AccessLevelRequest, AssignableLevel, AssignableLevelsResponse,
    CollaboratorResponse, CreateCollaboratorDto, CreateEntityDto, Level, LoginRequest,
    LoginResponse, OrgEntity, Permission, PermissionAction, ReplaceAccessDto, Role, RoleName,
    RoleOption, RoleWithPermissions, Selection, Status, User, UserAccessResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::delete_user,
        crate::modules::access::controller::get_assignable_levels,
        crate::modules::access::controller::get_user_access,
        crate::modules::access::controller::replace_user_access,
        crate::modules::roles::controller::get_roles,
        crate::modules::roles::controller::get_permissions,
        crate::modules::roles::controller::get_role_permissions,
        crate::modules::roles::controller::get_creatable_roles,
        crate::modules::territory::controller::create_entity,
        crate::modules::territory::controller::list_entities,
    ),
    components(
        schemas(
            User,
            Status,
            RoleName,
            Level,
            Selection,
            LoginRequest,
            LoginResponse,
            CreateCollaboratorDto,
            CollaboratorResponse,
            AccessLevelRequest,
            AccessGrant,
            AccessGrantView,
            ReplaceAccessDto,
            UserAccessResponse,
            AssignableLevel,
            AssignableLevelsResponse,
            Role,
            Permission,
            PermissionAction,
            RoleWithPermissions,
            RoleOption,
            OrgEntity,
            CreateEntityDto,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and token issuance"),
        (name = "Users", description = "Collaborator management"),
        (name = "Access", description = "Role-scoped organizational access grants"),
        (name = "Roles", description = "Role hierarchy and permission catalog"),
        (name = "Territory", description = "Localidades, circuitos, escuelas and mesas")
    ),
    info(
        title = "Civica API",
        version = "0.1.0",
        description = "Administrative backend for campaign field operations with role-scoped access control.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/users",
            "/api/users/{id}",
            "/api/users/{id}/access",
            "/api/access/levels",
            "/api/roles",
            "/api/roles/permissions",
            "/api/roles/{name}/permissions",
            "/api/roles/creatable",
            "/api/territory/{level}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
