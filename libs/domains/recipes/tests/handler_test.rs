//! Handler tests for the Recipes domain
//!
//! Routers run over in-memory repositories, checking:
//! - Status codes for create, get and list
//! - Validation and UUID rejections
//! - The created body carries nutrition and skipped entries

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::ErrorResponse;
use domain_nutrition::{
    IngredientRepository, InMemoryIngredientRepository, LookupError, NewIngredient, NutrientVector,
    NutritionService, ProductLookup, ProductSummary, SkipReason,
};
use domain_recipes::{handlers, InMemoryRecipeRepository, Recipe, RecipeCreated, RecipeService};
use http_body_util::BodyExt;
use serde_json::json;
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

struct NoLookup;

#[async_trait]
impl ProductLookup for NoLookup {
    async fn fetch_base_nutrients(&self, external_id: &str) -> Result<NutrientVector, LookupError> {
        Err(LookupError::NotFound(external_id.to_string()))
    }

    async fn search_products(&self, _query: &str) -> Result<Vec<ProductSummary>, LookupError> {
        Ok(Vec::new())
    }
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn app() -> Router {
    let ingredients = InMemoryIngredientRepository::new();
    ingredients
        .create(NewIngredient::from_open_food_facts(
            "BANANA",
            "Banana",
            NutrientVector::new(89.0, 1.0, 23.0, 0.5, 2.5),
        ))
        .await
        .unwrap();
    let service = RecipeService::new(
        InMemoryRecipeRepository::new(),
        NutritionService::new(ingredients, NoLookup),
    );
    handlers::router(service)
}

#[tokio::test]
async fn test_create_recipe_returns_201_with_nutrition() {
    let app = app().await;
    let builder = TestDataBuilder::from_test_name("handler_create_recipe");

    let response = app
        .clone()
        .oneshot(post_json(
            "/",
            json!({
                "name": "Banana bread",
                "description": "Uses up old bananas",
                "cook_time_min": 60,
                "ingredients": [
                    {"name": "Banana", "quantity": 200, "unit": "g", "external_id": "BANANA"},
                    {"name": "Flour", "quantity": 250},
                    {"name": "Eggs", "quantity": 2, "unit": "pcs"}
                ],
                "steps": ["Mash", "Mix", "Bake"],
                "created_by": builder.user_id()
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: RecipeCreated = json_body(response.into_body()).await;
    assert_eq!(created.recipe.ingredients.len(), 2);
    assert_eq!(
        created.recipe.total_nutrients,
        NutrientVector::new(178.0, 2.0, 46.0, 1.0, 5.0)
    );
    assert_eq!(created.skipped_ingredients.len(), 1);
    assert_eq!(created.skipped_ingredients[0].reason, SkipReason::MissingUnit);

    let response = app
        .oneshot(get(&format!("/{}", created.recipe.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let recipe: Recipe = json_body(response.into_body()).await;
    assert_eq!(recipe, created.recipe);
}

#[tokio::test]
async fn test_create_recipe_validates_input() {
    let app = app().await;
    let builder = TestDataBuilder::from_test_name("handler_validate_recipe");

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "name": "",
                "description": "No name",
                "created_by": builder.user_id()
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_recipe_invalid_and_missing_id() {
    let app = app().await;

    let response = app.clone().oneshot(get("/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get(&format!("/{}", uuid::Uuid::now_v7())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_recipes_by_author() {
    let app = app().await;
    let builder = TestDataBuilder::from_test_name("handler_list_recipes");
    let author = builder.user_id();

    for name in ["Smoothie", "Pancakes"] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/",
                json!({"name": name, "description": "d", "created_by": author}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/?created_by={}", author)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let recipes: Vec<Recipe> = json_body(response.into_body()).await;
    let names: Vec<_> = recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Pancakes", "Smoothie"]);

    let response = app.oneshot(get("/?limit=0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_recipe_skips_wrong_typed_entries() {
    let app = app().await;
    let builder = TestDataBuilder::from_test_name("handler_wrong_typed_entries");

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "name": "Banana bread",
                "description": "Uses up brown bananas",
                "ingredients": [
                    {"name": "Banana", "quantity": "100", "unit": "g", "barcode": "BANANA"},
                    {"name": "Flour", "quantity": 250, "unit": 7, "external_id": false}
                ],
                "created_by": builder.user_id(),
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: RecipeCreated = json_body(response.into_body()).await;
    assert_eq!(created.recipe.ingredients.len(), 1);
    assert_eq!(
        created.recipe.total_nutrients,
        NutrientVector::new(89.0, 1.0, 23.0, 0.5, 2.5)
    );
    assert_eq!(created.skipped_ingredients.len(), 1);
    assert_eq!(created.skipped_ingredients[0].index, 1);
    assert_eq!(
        created.skipped_ingredients[0].reason,
        SkipReason::InvalidExternalId
    );
}
