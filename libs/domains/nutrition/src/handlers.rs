//! HTTP handlers for the Ingredients API

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadGatewayResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    ValidatedJson, ValidatedQuery,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::NutritionResult;
use crate::lookup::ProductLookup;
use crate::models::{
    BuildNutritionRequest, IngredientRecord, NutrientVector, ProductSummary, RawIngredientInput,
    RecipeNutritionResult, ResolvedIngredientLine, SearchQuery, SkipReason, SkippedIngredient,
};
use crate::repository::IngredientRepository;
use crate::service::NutritionService;

/// OpenAPI documentation for Ingredients API
#[derive(OpenApi)]
#[openapi(
    paths(search_ingredients, preview_nutrition, get_ingredient),
    components(
        schemas(
            IngredientRecord, NutrientVector, ProductSummary, RawIngredientInput,
            BuildNutritionRequest, RecipeNutritionResult, ResolvedIngredientLine,
            SkippedIngredient, SkipReason
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadGatewayResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Ingredients", description = "Ingredient search and nutrition endpoints")
    )
)]
pub struct ApiDoc;

/// Create the ingredients router
pub fn router<R, L>(service: NutritionService<R, L>) -> Router
where
    R: IngredientRepository + 'static,
    L: ProductLookup + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/search", get(search_ingredients))
        .route("/nutrition", post(preview_nutrition))
        .route("/{external_id}", get(get_ingredient))
        .with_state(shared_service)
}

/// Search the product database by name
#[utoipa::path(
    get,
    path = "/search",
    tag = "Ingredients",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products, empty for queries under 2 characters", body = Vec<ProductSummary>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn search_ingredients<R: IngredientRepository, L: ProductLookup>(
    State(service): State<Arc<NutritionService<R, L>>>,
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> NutritionResult<Json<Vec<ProductSummary>>> {
    let products = service.search_ingredients(&query.q).await?;
    Ok(Json(products))
}

/// Compute nutrition for an ingredient list without saving anything
#[utoipa::path(
    post,
    path = "/nutrition",
    tag = "Ingredients",
    request_body = BuildNutritionRequest,
    responses(
        (status = 200, description = "Resolved lines, totals and skipped entries", body = RecipeNutritionResult),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn preview_nutrition<R: IngredientRepository, L: ProductLookup>(
    State(service): State<Arc<NutritionService<R, L>>>,
    ValidatedJson(request): ValidatedJson<BuildNutritionRequest>,
) -> NutritionResult<Json<RecipeNutritionResult>> {
    let result = service.build(&request.ingredients).await?;
    Ok(Json(result))
}

/// Get a cached ingredient by external id
#[utoipa::path(
    get,
    path = "/{external_id}",
    tag = "Ingredients",
    params(
        ("external_id" = String, Path, description = "Barcode or other external product id")
    ),
    responses(
        (status = 200, description = "Cached ingredient", body = IngredientRecord),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_ingredient<R: IngredientRepository, L: ProductLookup>(
    State(service): State<Arc<NutritionService<R, L>>>,
    Path(external_id): Path<String>,
) -> NutritionResult<Json<IngredientRecord>> {
    let record = service.get_ingredient(&external_id).await?;
    Ok(Json(record))
}
