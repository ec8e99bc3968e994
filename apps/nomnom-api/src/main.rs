use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_nutrition::{MongoIngredientRepository, NutritionService, OpenFoodFactsClient};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.url());

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    api::ingredients::init_indexes(&db).await?;
    api::recipes::init_indexes(&db).await?;

    let lookup = OpenFoodFactsClient::new(config.open_food_facts.clone())?;
    info!(
        product_api = %config.open_food_facts.product_api_url,
        timeout_secs = config.open_food_facts.timeout_secs,
        "Open Food Facts client ready"
    );
    let nutrition = NutritionService::new(MongoIngredientRepository::new(&db), lookup);

    let state = AppState {
        config,
        mongo_client,
        db,
        nutrition,
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(state.config.app));

    let shutdown_timeout = state.config.server.request_timeout();
    info!(?shutdown_timeout, "Starting Nomnom API");

    create_production_app(app, &state.config.server, shutdown_timeout, async move {
        info!("Shutting down: closing MongoDB connections");
        // Dropping the client closes its pool
        drop(state.mongo_client);
        info!("MongoDB connection closed");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Nomnom API shutdown complete");
    Ok(())
}
