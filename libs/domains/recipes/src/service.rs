//! Recipe Service - recipe creation workflow

use domain_nutrition::{IngredientRepository, NutritionService, ProductLookup};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{RecipeError, RecipeResult};
use crate::models::{CreateRecipe, Recipe, RecipeCreated, RecipeFilter};
use crate::repository::RecipeRepository;

/// Creates recipes with nutrition computed from their ingredient lists.
pub struct RecipeService<R, I, L>
where
    R: RecipeRepository,
    I: IngredientRepository,
    L: ProductLookup,
{
    repository: Arc<R>,
    nutrition: NutritionService<I, L>,
}

impl<R, I, L> RecipeService<R, I, L>
where
    R: RecipeRepository,
    I: IngredientRepository,
    L: ProductLookup,
{
    pub fn new(repository: R, nutrition: NutritionService<I, L>) -> Self {
        Self {
            repository: Arc::new(repository),
            nutrition,
        }
    }

    /// Validate, derive nutrition, then save. A nutrition failure means the
    /// ingredient store is unusable and nothing is saved.
    #[instrument(skip(self, input), fields(recipe_name = %input.name, created_by = %input.created_by))]
    pub async fn create_recipe(&self, input: CreateRecipe) -> RecipeResult<RecipeCreated> {
        input
            .validate()
            .map_err(|e| RecipeError::Validation(e.to_string()))?;

        let mut nutrition = self.nutrition.build(&input.ingredients).await?;
        let skipped_ingredients = std::mem::take(&mut nutrition.skipped);
        if !skipped_ingredients.is_empty() {
            tracing::info!(
                skipped = skipped_ingredients.len(),
                "Recipe saved without some ingredient entries"
            );
        }

        let recipe = self.repository.create(Recipe::new(input, nutrition)).await?;

        Ok(RecipeCreated {
            recipe,
            skipped_ingredients,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_recipe(&self, id: Uuid) -> RecipeResult<Recipe> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(RecipeError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_recipes(&self, filter: RecipeFilter) -> RecipeResult<Vec<Recipe>> {
        filter
            .validate()
            .map_err(|e| RecipeError::Validation(e.to_string()))?;
        self.repository.list(filter).await
    }
}
