//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nomnom API",
        version = "0.1.0",
        description = "Recipes with nutrition derived from Open Food Facts products",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/ingredients", api = domain_nutrition::ApiDoc),
        (path = "/api/recipes", api = domain_recipes::ApiDoc)
    ),
    tags(
        (name = "Ingredients", description = "Product search, cached ingredients and nutrition preview"),
        (name = "Recipes", description = "Recipe creation with computed nutrition")
    )
)]
pub struct ApiDoc;
