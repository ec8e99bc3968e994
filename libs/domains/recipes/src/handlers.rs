//! HTTP handlers for Recipes API

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    UuidPath, ValidatedJson, ValidatedQuery,
};
use domain_nutrition::{IngredientRepository, ProductLookup};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::RecipeResult;
use crate::models::{CreateRecipe, DietaryInfo, Recipe, RecipeCreated, RecipeFilter};
use crate::repository::RecipeRepository;
use crate::service::RecipeService;

/// OpenAPI documentation for Recipes API
#[derive(OpenApi)]
#[openapi(
    paths(list_recipes, create_recipe, get_recipe),
    components(
        schemas(Recipe, CreateRecipe, RecipeCreated, RecipeFilter, DietaryInfo),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Recipes", description = "Recipe creation and browsing endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<R, I, L> = State<Arc<RecipeService<R, I, L>>>;

/// Create the recipes router
pub fn router<R, I, L>(service: RecipeService<R, I, L>) -> Router
where
    R: RecipeRepository + 'static,
    I: IngredientRepository + 'static,
    L: ProductLookup + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route("/{id}", get(get_recipe))
        .with_state(shared_service)
}

/// List recipes, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Recipes",
    params(RecipeFilter),
    responses(
        (status = 200, description = "List of recipes", body = Vec<Recipe>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_recipes<R: RecipeRepository, I: IngredientRepository, L: ProductLookup>(
    State(service): SharedService<R, I, L>,
    ValidatedQuery(filter): ValidatedQuery<RecipeFilter>,
) -> RecipeResult<Json<Vec<Recipe>>> {
    let recipes = service.list_recipes(filter).await?;
    Ok(Json(recipes))
}

/// Create a recipe, deriving its nutrition from the ingredient list
#[utoipa::path(
    post,
    path = "",
    tag = "Recipes",
    request_body = CreateRecipe,
    responses(
        (status = 201, description = "Recipe created, with any skipped ingredient entries", body = RecipeCreated),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_recipe<R: RecipeRepository, I: IngredientRepository, L: ProductLookup>(
    State(service): SharedService<R, I, L>,
    ValidatedJson(input): ValidatedJson<CreateRecipe>,
) -> RecipeResult<impl IntoResponse> {
    let created = service.create_recipe(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a recipe by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe found", body = Recipe),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_recipe<R: RecipeRepository, I: IngredientRepository, L: ProductLookup>(
    State(service): SharedService<R, I, L>,
    UuidPath(id): UuidPath,
) -> RecipeResult<Json<Recipe>> {
    let recipe = service.get_recipe(id).await?;
    Ok(Json(recipe))
}
