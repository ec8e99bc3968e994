use chrono::{DateTime, Utc};
use domain_nutrition::{
    NutrientVector, RawIngredientInput, RecipeNutritionResult, ResolvedIngredientLine,
    SkippedIngredient, MAX_INGREDIENTS,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DietaryInfo {
    pub vegan: bool,
    pub vegetarian: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub nut_free: bool,
}

/// A saved recipe with its resolved ingredient lines and nutrition totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Image URLs
    pub images: Vec<String>,
    pub cook_time_min: u32,
    pub ingredients: Vec<ResolvedIngredientLine>,
    pub steps: Vec<String>,
    /// Sum of every ingredient's derived nutrients
    pub total_nutrients: NutrientVector,
    pub dietary_info: DietaryInfo,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Assemble a recipe from the request and its computed nutrition.
    pub fn new(input: CreateRecipe, nutrition: RecipeNutritionResult) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name.trim().to_string(),
            description: input.description,
            images: input.images,
            cook_time_min: input.cook_time_min,
            ingredients: nutrition.lines,
            steps: input.steps,
            total_nutrients: nutrition.total_nutrients,
            dietary_info: input.dietary_info,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// DTO for creating a recipe
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRecipe {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(min = 1), custom(function = "not_blank"))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub images: Vec<String>,
    #[serde(default)]
    pub cook_time_min: u32,
    /// Entries missing a name, quantity or unit are skipped, not rejected
    #[serde(default)]
    #[validate(length(max = MAX_INGREDIENTS))]
    pub ingredients: Vec<RawIngredientInput>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub dietary_info: DietaryInfo,
    /// Author id
    pub created_by: Uuid,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Response body of recipe creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeCreated {
    pub recipe: Recipe,
    /// Ingredient entries left out of the recipe
    pub skipped_ingredients: Vec<SkippedIngredient>,
}

/// Query filters for listing recipes
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeFilter {
    /// Only recipes by this author
    pub created_by: Option<Uuid>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> i64 {
    20
}

impl Default for RecipeFilter {
    fn default() -> Self {
        Self {
            created_by: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_input() -> CreateRecipe {
        serde_json::from_value(json!({
            "name": "  Overnight oats ",
            "description": "Soak and sleep",
            "created_by": Uuid::nil(),
        }))
        .unwrap()
    }

    #[test]
    fn test_create_recipe_defaults() {
        let input = create_input();
        assert!(input.images.is_empty());
        assert_eq!(input.cook_time_min, 0);
        assert!(input.ingredients.is_empty());
        assert_eq!(input.dietary_info, DietaryInfo::default());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_blank_name_fails_validation() {
        let mut input = create_input();
        input.name = "   ".to_string();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_missing_description_fails_validation() {
        let mut input = create_input();
        input.description = String::new();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_new_recipe_takes_nutrition_and_trims_name() {
        let nutrition = RecipeNutritionResult {
            lines: Vec::new(),
            total_nutrients: NutrientVector::new(1.0, 2.0, 3.0, 4.0, 5.0),
            skipped: Vec::new(),
        };
        let recipe = Recipe::new(create_input(), nutrition);

        assert_eq!(recipe.name, "Overnight oats");
        assert_eq!(recipe.total_nutrients.fiber, 5.0);
        assert_eq!(recipe.created_at, recipe.updated_at);
    }

    #[test]
    fn test_partial_dietary_info() {
        let info: DietaryInfo = serde_json::from_str(r#"{"vegan": true}"#).unwrap();
        assert!(info.vegan);
        assert!(!info.nut_free);
    }

    #[test]
    fn test_filter_defaults_and_bounds() {
        let filter: RecipeFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.limit, 20);
        assert_eq!(filter.offset, 0);

        let filter = RecipeFilter {
            limit: 0,
            ..RecipeFilter::default()
        };
        assert!(filter.validate().is_err());
    }
}
