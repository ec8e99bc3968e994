use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::RecipeResult;
use crate::models::{Recipe, RecipeFilter};

/// Repository trait for Recipe persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Store a fully assembled recipe
    async fn create(&self, recipe: Recipe) -> RecipeResult<Recipe>;

    async fn get_by_id(&self, id: Uuid) -> RecipeResult<Option<Recipe>>;

    /// Newest first
    async fn list(&self, filter: RecipeFilter) -> RecipeResult<Vec<Recipe>>;
}

/// In-memory implementation of RecipeRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecipeRepository {
    recipes: Arc<RwLock<HashMap<Uuid, Recipe>>>,
}

impl InMemoryRecipeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeRepository for InMemoryRecipeRepository {
    async fn create(&self, recipe: Recipe) -> RecipeResult<Recipe> {
        let mut recipes = self.recipes.write().await;
        recipes.insert(recipe.id, recipe.clone());

        tracing::info!(recipe_id = %recipe.id, "Created recipe");
        Ok(recipe)
    }

    async fn get_by_id(&self, id: Uuid) -> RecipeResult<Option<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes.get(&id).cloned())
    }

    async fn list(&self, filter: RecipeFilter) -> RecipeResult<Vec<Recipe>> {
        let recipes = self.recipes.read().await;

        let mut result: Vec<Recipe> = recipes
            .values()
            .filter(|r| filter.created_by.is_none_or(|author| r.created_by == author))
            .cloned()
            .collect();

        // Newest first; v7 ids break ties in creation order
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let result = result
            .into_iter()
            .skip(usize::try_from(filter.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(filter.limit).unwrap_or(0))
            .collect();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateRecipe;
    use domain_nutrition::RecipeNutritionResult;
    use serde_json::json;

    fn recipe(name: &str, author: Uuid) -> Recipe {
        let input: CreateRecipe = serde_json::from_value(json!({
            "name": name,
            "description": "test",
            "created_by": author,
        }))
        .unwrap();
        Recipe::new(input, RecipeNutritionResult::default())
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryRecipeRepository::new();
        let created = repo.create(recipe("Pancakes", Uuid::now_v7())).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert!(repo.get_by_id(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_author_newest_first() {
        let repo = InMemoryRecipeRepository::new();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();

        let first = repo.create(recipe("First", alice)).await.unwrap();
        repo.create(recipe("Other", bob)).await.unwrap();
        let second = repo.create(recipe("Second", alice)).await.unwrap();

        let filter = RecipeFilter {
            created_by: Some(alice),
            ..RecipeFilter::default()
        };
        let listed = repo.list(filter).await.unwrap();

        let ids: Vec<_> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let repo = InMemoryRecipeRepository::new();
        let author = Uuid::now_v7();
        for i in 0..5 {
            repo.create(recipe(&format!("Recipe {}", i), author))
                .await
                .unwrap();
        }

        let page = repo
            .list(RecipeFilter {
                created_by: None,
                limit: 2,
                offset: 4,
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Recipe 0");
    }
}
