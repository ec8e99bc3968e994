//! Recipes Domain
//!
//! Recipe creation on top of the nutrition domain: the submitted ingredient
//! list is run through [`domain_nutrition::NutritionService::build`] and the
//! resulting lines and totals are saved with the recipe.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← POST /, GET /, GET /{id}
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────────────┐
//! │   Service   │ ──▶ │ NutritionService │
//! └──────┬──────┘     └──────────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + MongoDB / in-memory
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_nutrition::{MongoIngredientRepository, NutritionService, OpenFoodFactsClient, OpenFoodFactsConfig};
//! use domain_recipes::{handlers, MongoRecipeRepository, RecipeService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("nomnom");
//!
//! let nutrition = NutritionService::new(
//!     MongoIngredientRepository::new(&db),
//!     OpenFoodFactsClient::new(OpenFoodFactsConfig::default())?,
//! );
//! let router = handlers::router(RecipeService::new(MongoRecipeRepository::new(&db), nutrition));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{RecipeError, RecipeResult};
pub use handlers::ApiDoc;
pub use models::{CreateRecipe, DietaryInfo, Recipe, RecipeCreated, RecipeFilter};
pub use mongodb::MongoRecipeRepository;
pub use repository::{InMemoryRecipeRepository, RecipeRepository};
pub use service::RecipeService;
