//! Nutrition Domain
//!
//! Derives recipe nutrition from raw ingredient entries. Each entry with a
//! barcode is resolved against a permanent ingredient cache, falling back to
//! the Open Food Facts product database on a miss; base nutrients are then
//! scaled to the entry's quantity and summed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /search, /nutrition, /{external_id}
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← build(): validate, resolve, scale, total
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Resolver   │  ← cache-or-fetch, zero fallback on lookup failure
//! └──┬───────┬──┘
//!    │       │
//! ┌──▼────┐ ┌▼─────────────┐
//! │ Repo  │ │ ProductLookup │  ← MongoDB / in-memory, Open Food Facts
//! └───────┘ └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_nutrition::{
//!     handlers, MongoIngredientRepository, NutritionService, OpenFoodFactsClient,
//!     OpenFoodFactsConfig,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("nomnom");
//!
//! let repository = MongoIngredientRepository::new(&db);
//! repository.init_indexes().await?;
//! let lookup = OpenFoodFactsClient::new(OpenFoodFactsConfig::default())?;
//!
//! let router = handlers::router(NutritionService::new(repository, lookup));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod lookup;
pub mod models;
pub mod mongodb;
pub mod openfoodfacts;
pub mod repository;
pub mod resolver;
pub mod service;

pub use error::{LookupError, NutritionError, NutritionResult};
pub use handlers::ApiDoc;
pub use lookup::ProductLookup;
pub use models::{
    BuildNutritionRequest, IngredientRecord, NewIngredient, NutrientVector, ProductSummary,
    Quantity, RawIngredientInput, RecipeNutritionResult, ResolvedIngredientLine, SearchQuery,
    SkipReason, SkippedIngredient, TextField, DEFAULT_BASE_AMOUNT, DEFAULT_BASE_UNIT, MAX_INGREDIENTS,
};
pub use mongodb::MongoIngredientRepository;
pub use openfoodfacts::{OpenFoodFactsClient, OpenFoodFactsConfig};
pub use repository::{InMemoryIngredientRepository, IngredientRepository};
pub use resolver::{IngredientResolver, Resolution, ResolutionOutcome};
pub use service::NutritionService;
