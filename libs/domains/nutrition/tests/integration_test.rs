//! Integration tests for the Nutrition domain
//!
//! These run against a real MongoDB via testcontainers to check:
//! - The unique external_id index rejects duplicate inserts
//! - Upsert-based get_or_create converges under concurrency
//! - Concurrent builds resolve a new barcode to one cached record

use async_trait::async_trait;
use domain_nutrition::{
    IngredientRepository, LookupError, MongoIngredientRepository, NewIngredient, NutrientVector,
    NutritionError, NutritionService, ProductLookup, ProductSummary, RawIngredientInput,
};
use mongodb::bson::doc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{assertions::*, TestDataBuilder, TestMongo};

fn peanut_butter() -> NutrientVector {
    NutrientVector::new(588.0, 25.0, 20.0, 50.0, 6.0)
}

async fn repository(mongo: &TestMongo, builder: &TestDataBuilder) -> MongoIngredientRepository {
    let repo = MongoIngredientRepository::new(&mongo.database(&builder.database_name()));
    repo.init_indexes().await.unwrap();
    repo
}

/// Slow product database that always knows the product.
struct SlowLookup {
    fetches: AtomicUsize,
}

#[async_trait]
impl ProductLookup for SlowLookup {
    async fn fetch_base_nutrients(&self, _external_id: &str) -> Result<NutrientVector, LookupError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(25)).await;
        Ok(peanut_butter())
    }

    async fn search_products(&self, _query: &str) -> Result<Vec<ProductSummary>, LookupError> {
        Ok(Vec::new())
    }
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_find_by_external_id() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("create_and_find");
    let repo = repository(&mongo, &builder).await;
    let barcode = builder.barcode(0);

    let created = repo
        .create(NewIngredient::from_open_food_facts(
            &barcode,
            "Peanut butter",
            peanut_butter(),
        ))
        .await
        .unwrap();

    let found = assert_some(
        repo.find_by_external_id(&barcode).await.unwrap(),
        "cached ingredient",
    );
    assert_uuid_eq(found.id, created.id, "ingredient id");
    assert_eq!(found.nutrients_per_base, peanut_butter());
    assert_eq!(found.base_unit, "g");
    assert_close(found.base_amount, 100.0, "base amount");

    assert!(repo
        .find_by_external_id(&builder.barcode(1))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_duplicate_external_id_is_rejected() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("duplicate_external_id");
    let repo = repository(&mongo, &builder).await;
    let barcode = builder.barcode(0);

    repo.create(NewIngredient::from_open_food_facts(
        &barcode,
        "Peanut butter",
        peanut_butter(),
    ))
    .await
    .unwrap();

    let result = repo
        .create(NewIngredient::from_open_food_facts(
            &barcode,
            "Crunchy peanut butter",
            peanut_butter(),
        ))
        .await;

    assert!(matches!(result, Err(NutritionError::DuplicateKey(id)) if id == barcode));
}

#[tokio::test]
async fn test_get_or_create_returns_existing_record() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("get_or_create_existing");
    let repo = repository(&mongo, &builder).await;
    let barcode = builder.barcode(0);

    let first = repo
        .get_or_create(NewIngredient::from_open_food_facts(
            &barcode,
            "Peanut butter",
            peanut_butter(),
        ))
        .await
        .unwrap();
    let second = repo
        .get_or_create(NewIngredient::from_open_food_facts(
            &barcode,
            "Something else",
            NutrientVector::zero(),
        ))
        .await
        .unwrap();

    assert_uuid_eq(second.id, first.id, "ingredient id");
    assert_eq!(second.name, "Peanut butter");
    assert_eq!(second.nutrients_per_base, peanut_butter());
}

#[tokio::test]
async fn test_concurrent_get_or_create_stores_one_document() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("concurrent_get_or_create");
    let repo = Arc::new(repository(&mongo, &builder).await);
    let barcode = builder.barcode(0);

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let repo = Arc::clone(&repo);
            let barcode = barcode.clone();
            tokio::spawn(async move {
                repo.get_or_create(NewIngredient::from_open_food_facts(
                    barcode,
                    "Peanut butter",
                    peanut_butter(),
                ))
                .await
                .unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().id);
    }

    let count = repo
        .collection()
        .count_documents(doc! { "external_id": barcode.as_str() })
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert!(ids.iter().all(|id| *id == ids[0]));
}

// ============================================================================
// Service Tests
// ============================================================================

#[tokio::test]
async fn test_concurrent_builds_resolve_new_barcode_once() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("concurrent_builds");
    let repo = Arc::new(repository(&mongo, &builder).await);
    let lookup = Arc::new(SlowLookup {
        fetches: AtomicUsize::new(0),
    });
    let service = NutritionService::from_shared(Arc::clone(&repo), Arc::clone(&lookup));
    let barcode = builder.barcode(0);

    let input = vec![RawIngredientInput::new("Peanut butter", 30.0, "g").with_external_id(&barcode)];
    let (a, b) = tokio::join!(service.build(&input), service.build(&input));
    let (a, b) = (a.unwrap(), b.unwrap());

    let count = repo
        .collection()
        .count_documents(doc! { "external_id": barcode.as_str() })
        .await
        .unwrap();
    assert_eq!(count, 1);

    assert_eq!(a.lines[0].ingredient_ref, b.lines[0].ingredient_ref);
    assert!(a.lines[0].ingredient_ref.is_some());
    assert_eq!(a.total_nutrients, b.total_nutrients);
    assert!(!a.total_nutrients.is_zero());
    assert_close(a.total_nutrients.calories, 588.0 * 0.3, "calories");

    // Once cached, later builds never fetch again.
    let fetches_before = lookup.fetches.load(Ordering::SeqCst);
    service.build(&input).await.unwrap();
    assert_eq!(lookup.fetches.load(Ordering::SeqCst), fetches_before);
}
