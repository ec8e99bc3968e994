//! Ingredient routes: product search, cached ingredients, nutrition preview

use axum::Router;
use domain_nutrition::{MongoIngredientRepository, handlers};
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    handlers::router(state.nutrition.clone())
}

/// Create the ingredient cache indexes, including the unique `external_id`
/// index that arbitrates concurrent cache writes.
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoIngredientRepository::new(db)
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create ingredient indexes: {}", e))?;
    info!("Ingredient collection indexes created");
    Ok(())
}
