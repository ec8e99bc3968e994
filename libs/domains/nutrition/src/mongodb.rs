//! MongoDB implementation of IngredientRepository

use async_trait::async_trait;
use database::mongodb::{is_duplicate_key, to_stored_document};
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::{NutritionError, NutritionResult};
use crate::models::{IngredientRecord, NewIngredient};
use crate::repository::IngredientRepository;

pub const INGREDIENTS_COLLECTION: &str = "ingredients";

pub struct MongoIngredientRepository {
    collection: Collection<IngredientRecord>,
}

impl MongoIngredientRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, INGREDIENTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<IngredientRecord>(collection_name);
        Self { collection }
    }

    /// Create the unique `external_id` index that arbitrates concurrent inserts,
    /// plus a name index for lookups by name.
    pub async fn init_indexes(&self) -> NutritionResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "external_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_external_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(IndexOptions::builder().name("idx_name".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Ingredient indexes created successfully");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<IngredientRecord> {
        &self.collection
    }

    async fn upsert(&self, record: &IngredientRecord) -> NutritionResult<Option<IngredientRecord>> {
        // Encoded like insert_one so `_id` stays Binary on both write paths.
        let update = doc! { "$setOnInsert": to_stored_document(record)? };
        let result = self
            .collection
            .find_one_and_update(doc! { "external_id": record.external_id.as_str() }, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await;

        match result {
            Ok(stored) => Ok(stored),
            // Two upserts racing on a missing key can both attempt the insert;
            // the unique index rejects one, which then reads the winner's document.
            Err(e) if is_duplicate_key(&e) => self.find_by_external_id(&record.external_id).await,
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl IngredientRepository for MongoIngredientRepository {
    #[instrument(skip(self))]
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> NutritionResult<Option<IngredientRecord>> {
        let record = self
            .collection
            .find_one(doc! { "external_id": external_id })
            .await?;
        Ok(record)
    }

    #[instrument(skip(self, input), fields(external_id = %input.external_id))]
    async fn create(&self, input: NewIngredient) -> NutritionResult<IngredientRecord> {
        let record = IngredientRecord::new(input);

        match self.collection.insert_one(&record).await {
            Ok(_) => {
                tracing::info!(ingredient_id = %record.id, "Ingredient cached");
                Ok(record)
            }
            Err(e) if is_duplicate_key(&e) => Err(NutritionError::DuplicateKey(record.external_id)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, input), fields(external_id = %input.external_id))]
    async fn get_or_create(&self, input: NewIngredient) -> NutritionResult<IngredientRecord> {
        let record = IngredientRecord::new(input);

        let stored = self.upsert(&record).await?;

        let stored = stored.ok_or_else(|| {
            NutritionError::Internal(format!(
                "ingredient '{}' missing after upsert",
                record.external_id
            ))
        })?;

        if stored.id == record.id {
            tracing::info!(ingredient_id = %stored.id, "Ingredient cached");
        }
        Ok(stored)
    }
}
