//! Open Food Facts client
//!
//! Products are read from `{OPEN_FOOD_FACTS_API}/product/{barcode}.json`,
//! searches go to `{OFF_BASE_URL}/cgi/search.pl`.

use async_trait::async_trait;
use core_config::{env_or_default, env_parse_or, ConfigError, FromEnv};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::instrument;

use crate::error::LookupError;
use crate::lookup::ProductLookup;
use crate::models::{NutrientVector, ProductSummary};

pub const DEFAULT_PRODUCT_API_URL: &str = "https://world.openfoodfacts.org/api/v0";
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://world.openfoodfacts.org";

const MIN_SEARCH_QUERY_LEN: usize = 2;
const UNKNOWN_PRODUCT_NAME: &str = "Unknown product";

const CALORIES_KEY: &str = "energy-kcal_100g";
const PROTEIN_KEY: &str = "proteins_100g";
const CARBS_KEY: &str = "carbohydrates_100g";
const FAT_KEY: &str = "fat_100g";
const FIBER_KEY: &str = "fiber_100g";

#[derive(Debug, Clone, PartialEq)]
pub struct OpenFoodFactsConfig {
    pub product_api_url: String,
    pub search_base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub search_page_size: u32,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self {
            product_api_url: DEFAULT_PRODUCT_API_URL.to_string(),
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            timeout_secs: 10,
            user_agent: default_user_agent(),
            search_page_size: 10,
        }
    }
}

impl OpenFoodFactsConfig {
    /// Point both endpoints at one host, e.g. a mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            product_api_url: format!("{}/api/v0", base),
            search_base_url: base.to_string(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FromEnv for OpenFoodFactsConfig {
    /// - OPEN_FOOD_FACTS_API: product API base
    /// - OFF_BASE_URL: search base
    /// - OFF_TIMEOUT_SECS: defaults to 10
    /// - OFF_USER_AGENT: defaults to `nomnom-api/<version>`
    /// - OFF_SEARCH_PAGE_SIZE: defaults to 10
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            product_api_url: env_or_default("OPEN_FOOD_FACTS_API", DEFAULT_PRODUCT_API_URL),
            search_base_url: env_or_default("OFF_BASE_URL", DEFAULT_SEARCH_BASE_URL),
            timeout_secs: env_parse_or("OFF_TIMEOUT_SECS", defaults.timeout_secs)?,
            user_agent: env_or_default("OFF_USER_AGENT", &defaults.user_agent),
            search_page_size: env_parse_or("OFF_SEARCH_PAGE_SIZE", defaults.search_page_size)?,
        })
    }
}

fn default_user_agent() -> String {
    format!("nomnom-api/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    status: Value,
    #[serde(default)]
    product: Option<ProductBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ProductBody {
    #[serde(default)]
    nutriments: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    product_name: Option<Value>,
    generic_name: Option<Value>,
    brands: Option<Value>,
    #[serde(rename = "_id")]
    object_id: Option<Value>,
    code: Option<Value>,
    id: Option<Value>,
}

impl SearchHit {
    fn into_summary(self) -> Option<ProductSummary> {
        let barcode = text(&self.code).or_else(|| text(&self.id))?;
        let brand = text(&self.brands);
        let name = text(&self.product_name)
            .or_else(|| text(&self.generic_name))
            .or_else(|| brand.clone())
            .or_else(|| text(&self.object_id))
            .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string());

        Some(ProductSummary {
            name,
            brand: brand.unwrap_or_default(),
            barcode,
        })
    }
}

/// Non-empty string or number as text. Anything else counts as missing.
fn text(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A nutrient amount from a number or numeric string. Missing, negative and
/// non-finite values read as 0.
fn nutrient(nutriments: &Map<String, Value>, key: &str) -> f64 {
    let value = match nutriments.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

fn is_found(status: &Value) -> bool {
    match status {
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s.trim() == "1",
        _ => false,
    }
}

/// HTTP implementation of [`ProductLookup`] against Open Food Facts.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    http_client: reqwest::Client,
    product_api_url: Url,
    search_url: Url,
    search_page_size: u32,
}

impl OpenFoodFactsClient {
    pub fn new(config: OpenFoodFactsConfig) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        let product_api_url = parse_base(&config.product_api_url)?;
        let mut search_url = parse_base(&config.search_base_url)?;
        search_url
            .path_segments_mut()
            .map_err(|_| invalid_base(&config.search_base_url))?
            .pop_if_empty()
            .extend(["cgi", "search.pl"]);

        Ok(Self {
            http_client,
            product_api_url,
            search_url,
            search_page_size: config.search_page_size,
        })
    }

    fn product_url(&self, external_id: &str) -> Result<Url, LookupError> {
        let mut url = self.product_api_url.clone();
        url.path_segments_mut()
            .map_err(|_| invalid_base(self.product_api_url.as_str()))?
            .pop_if_empty()
            .push("product")
            .push(&format!("{}.json", external_id));
        Ok(url)
    }
}

fn parse_base(raw: &str) -> Result<Url, LookupError> {
    Url::parse(raw).map_err(|_| invalid_base(raw))
}

fn invalid_base(raw: &str) -> LookupError {
    LookupError::Transport(format!("invalid Open Food Facts base URL '{}'", raw))
}

#[async_trait]
impl ProductLookup for OpenFoodFactsClient {
    #[instrument(skip(self))]
    async fn fetch_base_nutrients(&self, external_id: &str) -> Result<NutrientVector, LookupError> {
        let url = self.product_url(external_id)?;
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(external_id.to_string()));
        }
        if !status.is_success() {
            return Err(LookupError::Transport(format!(
                "Open Food Facts returned HTTP {}",
                status
            )));
        }

        let body: ProductResponse = response.json().await?;
        if !is_found(&body.status) {
            return Err(LookupError::NotFound(external_id.to_string()));
        }

        let nutriments = body.product.unwrap_or_default().nutriments;
        let nutrients = NutrientVector::new(
            nutrient(&nutriments, CALORIES_KEY),
            nutrient(&nutriments, PROTEIN_KEY),
            nutrient(&nutriments, CARBS_KEY),
            nutrient(&nutriments, FAT_KEY),
            nutrient(&nutriments, FIBER_KEY),
        );

        tracing::debug!(external_id, ?nutrients, "Fetched product nutrients");
        Ok(nutrients)
    }

    #[instrument(skip(self))]
    async fn search_products(&self, query: &str) -> Result<Vec<ProductSummary>, LookupError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Ok(Vec::new());
        }

        let page_size = self.search_page_size.to_string();
        let response = self
            .http_client
            .get(self.search_url.clone())
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("json", "1"),
                ("page_size", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Transport(format!(
                "Open Food Facts search returned HTTP {}",
                status
            )));
        }

        let body: SearchResponse = response.json().await?;
        let products: Vec<ProductSummary> = body
            .products
            .into_iter()
            .filter_map(SearchHit::into_summary)
            .collect();

        tracing::debug!(query, count = products.len(), "Product search completed");
        Ok(products)
    }
}
