use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{NutritionError, NutritionResult};
use crate::models::{IngredientRecord, NewIngredient};

/// Append-only cache of resolved ingredients, keyed by external id.
///
/// There is no update or delete: a record never changes after creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    async fn find_by_external_id(&self, external_id: &str)
    -> NutritionResult<Option<IngredientRecord>>;

    /// Insert a record. Fails with [`NutritionError::DuplicateKey`] when one
    /// already exists for the external id.
    async fn create(&self, input: NewIngredient) -> NutritionResult<IngredientRecord>;

    /// Insert unless present, returning whichever record ends up stored.
    /// Concurrent callers with the same external id all observe the same record.
    async fn get_or_create(&self, input: NewIngredient) -> NutritionResult<IngredientRecord>;
}

/// In-memory implementation of IngredientRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryIngredientRepository {
    ingredients: Arc<RwLock<HashMap<String, IngredientRecord>>>,
}

impl InMemoryIngredientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.ingredients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ingredients.read().await.is_empty()
    }
}

#[async_trait]
impl IngredientRepository for InMemoryIngredientRepository {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> NutritionResult<Option<IngredientRecord>> {
        let ingredients = self.ingredients.read().await;
        Ok(ingredients.get(external_id).cloned())
    }

    async fn create(&self, input: NewIngredient) -> NutritionResult<IngredientRecord> {
        let mut ingredients = self.ingredients.write().await;

        if ingredients.contains_key(&input.external_id) {
            return Err(NutritionError::DuplicateKey(input.external_id));
        }

        let record = IngredientRecord::new(input);
        ingredients.insert(record.external_id.clone(), record.clone());

        tracing::info!(external_id = %record.external_id, ingredient_id = %record.id, "Cached ingredient");
        Ok(record)
    }

    async fn get_or_create(&self, input: NewIngredient) -> NutritionResult<IngredientRecord> {
        let mut ingredients = self.ingredients.write().await;

        let record = ingredients
            .entry(input.external_id.clone())
            .or_insert_with(|| {
                let record = IngredientRecord::new(input);
                tracing::info!(external_id = %record.external_id, ingredient_id = %record.id, "Cached ingredient");
                record
            })
            .clone();

        Ok(record)
    }
}
