use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_entity, list_entities};

pub fn init_territory_router() -> Router<AppState> {
    Router::new().route("/{level}", get(list_entities).post(create_entity))
}
