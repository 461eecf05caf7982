use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::get_assignable_levels;

pub fn init_access_router() -> Router<AppState> {
    Router::new().route("/levels", get(get_assignable_levels))
}
