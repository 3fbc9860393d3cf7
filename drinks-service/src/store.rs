use std::collections::BTreeMap;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::drinks::{Drink, RecipePart};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("drink {0} not found")]
    NotFound(i64),
    #[error("a drink titled '{0}' already exists")]
    DuplicateTitle(String),
}

#[derive(Default)]
struct Inner {
    drinks: BTreeMap<i64, Drink>,
    next_id: i64,
}

/// In-memory drink table. Titles are unique; ids are never reused.
#[derive(Default)]
pub struct DrinkStore {
    inner: RwLock<Inner>,
}

impl DrinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_demo(&self) {
        let water = vec![RecipePart { color: "blue".into(), name: "water".into(), parts: 1 }];
        if let Err(err) = self.insert("water".into(), water).await {
            tracing::debug!(%err, "demo drink already present");
        }
    }

    pub async fn list(&self) -> Vec<Drink> {
        self.inner.read().await.drinks.values().cloned().collect()
    }

    pub async fn get(&self, id: i64) -> Option<Drink> {
        self.inner.read().await.drinks.get(&id).cloned()
    }

    pub async fn insert(
        &self,
        title: String,
        recipe: Vec<RecipePart>,
    ) -> Result<Drink, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.drinks.values().any(|drink| drink.title == title) {
            return Err(StoreError::DuplicateTitle(title));
        }
        inner.next_id += 1;
        let drink = Drink { id: inner.next_id, title, recipe };
        inner.drinks.insert(drink.id, drink.clone());
        Ok(drink)
    }

    pub async fn update(
        &self,
        id: i64,
        title: Option<String>,
        recipe: Option<Vec<RecipePart>>,
    ) -> Result<Drink, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.drinks.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if let Some(title) = &title {
            if inner.drinks.values().any(|drink| drink.id != id && &drink.title == title) {
                return Err(StoreError::DuplicateTitle(title.clone()));
            }
        }
        let drink = inner.drinks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(title) = title {
            drink.title = title;
        }
        if let Some(recipe) = recipe {
            drink.recipe = recipe;
        }
        Ok(drink.clone())
    }

    pub async fn delete(&self, id: i64) -> Result<Drink, StoreError> {
        self.inner
            .write()
            .await
            .drinks
            .remove(&id)
            .ok_or(StoreError::NotFound(id))
    }
}
