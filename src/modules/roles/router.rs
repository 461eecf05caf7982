use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_creatable_roles, get_permissions, get_role_permissions, get_roles};

pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_roles))
        .route("/permissions", get(get_permissions))
        .route("/creatable", get(get_creatable_roles))
        .route("/{name}/permissions", get(get_role_permissions))
}
