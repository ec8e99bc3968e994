//! MongoDB implementation of RecipeRepository

use async_trait::async_trait;
use database::mongodb::to_stored_bson;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::RecipeResult;
use crate::models::{Recipe, RecipeFilter};
use crate::repository::RecipeRepository;

pub const RECIPES_COLLECTION: &str = "recipes";

pub struct MongoRecipeRepository {
    collection: Collection<Recipe>,
}

impl MongoRecipeRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, RECIPES_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Recipe>(collection_name);
        Self { collection }
    }

    /// Author's recipes, newest first
    pub async fn init_indexes(&self) -> RecipeResult<()> {
        let indexes = vec![IndexModel::builder()
            .keys(doc! { "created_by": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("idx_created_by_created_at".to_string())
                    .build(),
            )
            .build()];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Recipe indexes created successfully");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<Recipe> {
        &self.collection
    }

    fn build_filter(filter: &RecipeFilter) -> RecipeResult<Document> {
        let mut doc = doc! {};
        if let Some(created_by) = filter.created_by {
            doc.insert("created_by", to_stored_bson(&created_by)?);
        }
        Ok(doc)
    }
}

#[async_trait]
impl RecipeRepository for MongoRecipeRepository {
    #[instrument(skip(self, recipe), fields(recipe_name = %recipe.name))]
    async fn create(&self, recipe: Recipe) -> RecipeResult<Recipe> {
        self.collection.insert_one(&recipe).await?;

        tracing::info!(recipe_id = %recipe.id, "Recipe created successfully");
        Ok(recipe)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> RecipeResult<Option<Recipe>> {
        let recipe = self
            .collection
            .find_one(doc! { "_id": to_stored_bson(&id)? })
            .await?;
        Ok(recipe)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: RecipeFilter) -> RecipeResult<Vec<Recipe>> {
        let mongo_filter = Self::build_filter(&filter)?;

        let options = FindOptions::builder()
            .limit(filter.limit)
            .skip(filter.offset)
            .sort(doc! { "created_at": -1, "_id": -1 })
            .build();

        let cursor = self
            .collection
            .find(mongo_filter)
            .with_options(options)
            .await?;
        let recipes: Vec<Recipe> = cursor.try_collect().await?;

        Ok(recipes)
    }
}
