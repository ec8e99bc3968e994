//! API routes, nested under /api by axum_helpers::create_router

pub mod health;
pub mod ingredients;
pub mod recipes;

use axum::Router;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/ingredients", ingredients::router(state))
        .nest("/recipes", recipes::router(state))
        .merge(health::router(state.clone()))
}
