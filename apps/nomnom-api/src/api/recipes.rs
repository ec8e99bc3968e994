//! Recipe routes

use axum::Router;
use domain_recipes::{MongoRecipeRepository, RecipeService, handlers};
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoRecipeRepository::new(&state.db);
    let service = RecipeService::new(repository, state.nutrition.clone());

    handlers::router(service)
}

pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoRecipeRepository::new(db)
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create recipe indexes: {}", e))?;
    info!("Recipe collection indexes created");
    Ok(())
}
