use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{LookupError, NutritionResult};
use crate::lookup::ProductLookup;
use crate::models::{
    IngredientRecord, NewIngredient, NutrientVector, DEFAULT_BASE_AMOUNT, DEFAULT_BASE_UNIT,
};
use crate::repository::IngredientRepository;

/// How a [`Resolution`] was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    /// No external id was given
    Unreferenced,
    CacheHit,
    /// Fetched from the product database and cached
    Fetched,
    /// The product database failed; nutrients default to zero
    Fallback(LookupError),
}

/// Base nutrients for one ingredient and the reference amount they are given per.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub ingredient_ref: Option<Uuid>,
    pub base_nutrients: NutrientVector,
    pub base_amount: f64,
    pub base_unit: String,
    pub outcome: ResolutionOutcome,
}

impl Resolution {
    fn zero(outcome: ResolutionOutcome) -> Self {
        Self {
            ingredient_ref: None,
            base_nutrients: NutrientVector::ZERO,
            base_amount: DEFAULT_BASE_AMOUNT,
            base_unit: DEFAULT_BASE_UNIT.to_string(),
            outcome,
        }
    }

    fn from_record(record: IngredientRecord, outcome: ResolutionOutcome) -> Self {
        Self {
            ingredient_ref: Some(record.id),
            base_nutrients: record.nutrients_per_base,
            base_amount: record.base_amount,
            base_unit: record.base_unit,
            outcome,
        }
    }

    /// Nutrients for `quantity` units. A record with an unusable base amount
    /// contributes nothing rather than producing infinities.
    pub fn derive(&self, quantity: f64) -> NutrientVector {
        if !(self.base_amount.is_finite() && self.base_amount > 0.0) {
            tracing::error!(
                ingredient_ref = ?self.ingredient_ref,
                base_amount = self.base_amount,
                "Ingredient has an unusable base amount"
            );
            return NutrientVector::ZERO;
        }
        self.base_nutrients.scale(quantity / self.base_amount)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ResolutionOutcome::Fallback(_))
    }
}

/// Cache-or-fetch resolution of ingredient nutrients.
///
/// Lookup failures degrade to zero nutrients so that one bad barcode never
/// blocks a recipe. Repository failures are returned to the caller.
pub struct IngredientResolver<R: IngredientRepository, L: ProductLookup> {
    repository: Arc<R>,
    lookup: Arc<L>,
}

impl<R: IngredientRepository, L: ProductLookup> Clone for IngredientResolver<R, L> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            lookup: Arc::clone(&self.lookup),
        }
    }
}

impl<R: IngredientRepository, L: ProductLookup> IngredientResolver<R, L> {
    pub fn new(repository: Arc<R>, lookup: Arc<L>) -> Self {
        Self { repository, lookup }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        name: &str,
        external_id: Option<&str>,
    ) -> NutritionResult<Resolution> {
        let Some(external_id) = external_id else {
            return Ok(Resolution::zero(ResolutionOutcome::Unreferenced));
        };

        if let Some(record) = self.repository.find_by_external_id(external_id).await? {
            return Ok(Resolution::from_record(record, ResolutionOutcome::CacheHit));
        }

        match self.lookup.fetch_base_nutrients(external_id).await {
            Ok(nutrients) => {
                let input = NewIngredient::from_open_food_facts(external_id, name, nutrients);
                let record = self.repository.get_or_create(input).await?;
                Ok(Resolution::from_record(record, ResolutionOutcome::Fetched))
            }
            Err(e) => {
                tracing::warn!(
                    ingredient = name,
                    external_id,
                    error = %e,
                    "Nutrition lookup failed, using zero nutrients"
                );
                Ok(Resolution::zero(ResolutionOutcome::Fallback(e)))
            }
        }
    }
}
