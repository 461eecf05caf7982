use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::access::controller::{get_user_access, replace_user_access};
use crate::state::AppState;

use super::controller::{create_user, delete_user, get_user};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/{id}", get(get_user).delete(delete_user))
        .route(
            "/{id}/access",
            get(get_user_access).put(replace_user_access),
        )
}
