//! Application state shared by the route builders.

use domain_nutrition::{MongoIngredientRepository, NutritionService, OpenFoodFactsClient};
use mongodb::{Client, Database};

/// Nutrition pipeline over the MongoDB ingredient cache and Open Food Facts
pub type Nutrition = NutritionService<MongoIngredientRepository, OpenFoodFactsClient>;

/// Cloned into each router; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// MongoDB client (shares the underlying connection pool)
    pub mongo_client: Client,
    pub db: Database,
    /// One pipeline for both the ingredient and recipe routes, so they share
    /// the ingredient cache and the lookup client's connection pool
    pub nutrition: Nutrition,
}
