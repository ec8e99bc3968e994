use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Reference amount external nutrient data is expressed per.
pub const DEFAULT_BASE_AMOUNT: f64 = 100.0;

/// Unit of [`DEFAULT_BASE_AMOUNT`].
pub const DEFAULT_BASE_UNIT: &str = "g";

/// Provenance tag for records fetched from Open Food Facts.
pub const OPEN_FOOD_FACTS_SOURCE: &str = "openfoodfacts";

/// Upper bound on ingredient entries accepted in one request.
pub const MAX_INGREDIENTS: u64 = 200;

/// The five tracked nutrients. Every field is always present; unknown values are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NutrientVector {
    /// kcal
    pub calories: f64,
    /// grams
    pub protein: f64,
    /// grams
    pub carbs: f64,
    /// grams
    pub fat: f64,
    /// grams
    pub fiber: f64,
}

impl NutrientVector {
    pub const ZERO: Self = Self {
        calories: 0.0,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
        fiber: 0.0,
    };

    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64, fiber: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
            fiber,
        }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Multiply every field by `factor`. No bounds checking is done here;
    /// callers must not pass a factor derived from a zero base amount.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
            fiber: self.fiber * factor,
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Add for NutrientVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        NutrientVector::add(&self, &rhs)
    }
}

impl AddAssign for NutrientVector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for NutrientVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a NutrientVector> for NutrientVector {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, v| acc + *v)
    }
}

/// Cached base nutrient data for one external product. Created once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IngredientRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Barcode or other key in the external database; unique
    pub external_id: String,
    pub name: String,
    /// Provenance tag, e.g. "openfoodfacts"
    pub source: String,
    pub base_unit: String,
    pub base_amount: f64,
    pub nutrients_per_base: NutrientVector,
    pub created_at: DateTime<Utc>,
}

impl IngredientRecord {
    pub fn new(input: NewIngredient) -> Self {
        Self {
            id: Uuid::now_v7(),
            external_id: input.external_id,
            name: input.name,
            source: input.source,
            base_unit: input.base_unit,
            base_amount: input.base_amount,
            nutrients_per_base: input.nutrients_per_base,
            created_at: Utc::now(),
        }
    }
}

/// Input for inserting an [`IngredientRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewIngredient {
    pub external_id: String,
    pub name: String,
    pub source: String,
    pub base_unit: String,
    pub base_amount: f64,
    pub nutrients_per_base: NutrientVector,
}

impl NewIngredient {
    /// A record for data fetched from Open Food Facts, which reports per 100 g.
    pub fn from_open_food_facts(
        external_id: impl Into<String>,
        name: impl Into<String>,
        nutrients_per_base: NutrientVector,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            name: name.into(),
            source: OPEN_FOOD_FACTS_SOURCE.to_string(),
            base_unit: DEFAULT_BASE_UNIT.to_string(),
            base_amount: DEFAULT_BASE_AMOUNT,
            nutrients_per_base,
        }
    }
}

/// A quantity as clients send it: `50`, `50.5` or `"50"`. Any other JSON
/// value is kept so the entry can be skipped rather than failing the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
    Invalid(serde_json::Value),
}

impl Quantity {
    /// The numeric value when it is finite and not negative.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            Quantity::Number(n) => *n,
            Quantity::Text(s) => s.trim().parse::<f64>().ok()?,
            Quantity::Invalid(_) => return None,
        };
        (value.is_finite() && value >= 0.0).then_some(value)
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::Number(value)
    }
}

/// A text field as clients send it. Numbers are read as their decimal text,
/// so numeric barcodes like `737628064502` still resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Text(String),
    Number(serde_json::Number),
    Invalid(serde_json::Value),
}

impl TextField {
    /// Trimmed text, `Ok(None)` when blank, `Err` for booleans, arrays and objects.
    fn normalized(&self) -> Result<Option<String>, ()> {
        match self {
            TextField::Text(s) => Ok(Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string)),
            TextField::Number(n) => Ok(Some(n.to_string())),
            TextField::Invalid(_) => Err(()),
        }
    }
}

impl From<&str> for TextField {
    fn from(value: &str) -> Self {
        TextField::Text(value.to_string())
    }
}

impl From<String> for TextField {
    fn from(value: String) -> Self {
        TextField::Text(value)
    }
}

/// One ingredient entry as submitted by a client. Fields are optional and
/// loosely typed on the wire so that a bad entry is skipped instead of
/// failing the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RawIngredientInput {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Rolled oats")]
    pub name: Option<TextField>,
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 50)]
    pub quantity: Option<Quantity>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "g")]
    pub unit: Option<TextField>,
    /// Barcode to resolve nutrients from; `barcode` is accepted as an alias
    #[serde(default, alias = "barcode")]
    #[schema(value_type = Option<String>, example = "5000168001142")]
    pub external_id: Option<TextField>,
}

impl RawIngredientInput {
    pub fn new(name: &str, quantity: f64, unit: &str) -> Self {
        Self {
            name: Some(name.into()),
            quantity: Some(Quantity::Number(quantity)),
            unit: Some(unit.into()),
            external_id: None,
        }
    }

    pub fn with_external_id(mut self, external_id: &str) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Check the entry and normalize it. Blank external ids are treated as absent.
    pub fn check(&self) -> Result<ValidIngredient, SkipReason> {
        let name = text(&self.name)
            .map_err(|_| SkipReason::InvalidName)?
            .ok_or(SkipReason::MissingName)?;
        let quantity = self
            .quantity
            .as_ref()
            .ok_or(SkipReason::MissingQuantity)?
            .value()
            .ok_or(SkipReason::InvalidQuantity)?;
        let unit = text(&self.unit)
            .map_err(|_| SkipReason::InvalidUnit)?
            .ok_or(SkipReason::MissingUnit)?;
        let external_id = text(&self.external_id).map_err(|_| SkipReason::InvalidExternalId)?;

        Ok(ValidIngredient {
            name,
            quantity,
            unit,
            external_id,
        })
    }
}

fn text(field: &Option<TextField>) -> Result<Option<String>, ()> {
    field.as_ref().map_or(Ok(None), TextField::normalized)
}

/// An entry that passed [`RawIngredientInput::check`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidIngredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub external_id: Option<String>,
}

/// Why an ingredient entry was left out of the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    MissingName,
    /// Not text or a number
    InvalidName,
    MissingQuantity,
    /// Not a finite, non-negative number
    InvalidQuantity,
    MissingUnit,
    InvalidUnit,
    InvalidExternalId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SkippedIngredient {
    /// Position in the submitted list
    pub index: usize,
    pub reason: SkipReason,
}

/// One accepted ingredient with nutrients scaled to its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResolvedIngredientLine {
    /// Cached ingredient id, set only when resolution succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_ref: Option<Uuid>,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub derived_nutrients: NutrientVector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// Lines in input order, their sum, and the entries that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeNutritionResult {
    pub lines: Vec<ResolvedIngredientLine>,
    pub total_nutrients: NutrientVector,
    #[serde(default)]
    pub skipped: Vec<SkippedIngredient>,
}

/// A product hit from the external search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub name: String,
    pub brand: String,
    pub barcode: String,
}

/// Body of `POST /ingredients/nutrition`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BuildNutritionRequest {
    #[validate(length(max = MAX_INGREDIENTS))]
    pub ingredients: Vec<RawIngredientInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Free-text product search; `query` is accepted as an alias
    #[serde(default, alias = "query")]
    #[validate(length(max = 200))]
    pub q: String,
}
