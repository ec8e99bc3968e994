//! Nutrition Service - recipe ingredient builder and ingredient queries

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::instrument;

use crate::error::{NutritionError, NutritionResult};
use crate::lookup::ProductLookup;
use crate::models::{
    IngredientRecord, ProductSummary, RawIngredientInput, RecipeNutritionResult,
    ResolvedIngredientLine, SkippedIngredient, ValidIngredient,
};
use crate::repository::IngredientRepository;
use crate::resolver::IngredientResolver;

/// Resolutions in flight at once during [`NutritionService::build`].
pub const DEFAULT_RESOLVE_CONCURRENCY: usize = 8;

pub struct NutritionService<R: IngredientRepository, L: ProductLookup> {
    resolver: IngredientResolver<R, L>,
    concurrency: usize,
}

impl<R: IngredientRepository, L: ProductLookup> Clone for NutritionService<R, L> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            concurrency: self.concurrency,
        }
    }
}

impl<R: IngredientRepository, L: ProductLookup> NutritionService<R, L> {
    pub fn new(repository: R, lookup: L) -> Self {
        Self::from_shared(Arc::new(repository), Arc::new(lookup))
    }

    pub fn from_shared(repository: Arc<R>, lookup: Arc<L>) -> Self {
        Self {
            resolver: IngredientResolver::new(repository, lookup),
            concurrency: DEFAULT_RESOLVE_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Resolve, scale and total a list of raw ingredient entries.
    ///
    /// Incomplete entries are left out and reported in `skipped`. Lookup
    /// failures give zero-nutrient lines. Only repository failures are errors.
    /// Lines come back in input order whatever order resolutions finish in.
    #[instrument(skip(self, ingredients), fields(count = ingredients.len()))]
    pub async fn build(
        &self,
        ingredients: &[RawIngredientInput],
    ) -> NutritionResult<RecipeNutritionResult> {
        if ingredients.is_empty() {
            return Ok(RecipeNutritionResult::default());
        }

        let mut accepted = Vec::with_capacity(ingredients.len());
        let mut skipped = Vec::new();
        for (index, raw) in ingredients.iter().enumerate() {
            match raw.check() {
                Ok(valid) => accepted.push(valid),
                Err(reason) => {
                    tracing::debug!(index, %reason, "Skipping ingredient entry");
                    skipped.push(SkippedIngredient { index, reason });
                }
            }
        }

        let lines: Vec<ResolvedIngredientLine> = stream::iter(accepted)
            .map(|ingredient| self.resolve_line(ingredient))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let total_nutrients = lines.iter().map(|line| &line.derived_nutrients).sum();

        Ok(RecipeNutritionResult {
            lines,
            total_nutrients,
            skipped,
        })
    }

    async fn resolve_line(
        &self,
        ingredient: ValidIngredient,
    ) -> NutritionResult<ResolvedIngredientLine> {
        let resolution = self
            .resolver
            .resolve(&ingredient.name, ingredient.external_id.as_deref())
            .await?;

        // No unit conversion: quantities are assumed to be in the base unit.
        if resolution.ingredient_ref.is_some()
            && !ingredient.unit.eq_ignore_ascii_case(&resolution.base_unit)
        {
            tracing::debug!(
                ingredient = %ingredient.name,
                unit = %ingredient.unit,
                base_unit = %resolution.base_unit,
                "Unit differs from base unit, scaling as-is"
            );
        }

        Ok(ResolvedIngredientLine {
            ingredient_ref: resolution.ingredient_ref,
            derived_nutrients: resolution.derive(ingredient.quantity),
            name: ingredient.name,
            quantity: ingredient.quantity,
            unit: ingredient.unit,
            external_id: ingredient.external_id,
        })
    }

    #[instrument(skip(self))]
    pub async fn search_ingredients(&self, query: &str) -> NutritionResult<Vec<ProductSummary>> {
        let products = self.resolver.lookup().search_products(query).await?;
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn get_ingredient(&self, external_id: &str) -> NutritionResult<IngredientRecord> {
        self.resolver
            .repository()
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| NutritionError::NotFound(external_id.to_string()))
    }
}
