// src/db/menu_repo.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{common::error::AppError, models::menu::MenuItem};

#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn insert(&self, item: MenuItem) -> Result<MenuItem, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MenuItem>, AppError>;

    // Cardápio completo, ordenado por nome.
    async fn list_all(&self) -> Result<Vec<MenuItem>, AppError>;

    async fn update(&self, item: MenuItem) -> Result<MenuItem, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

#[derive(Default)]
pub struct InMemoryMenuRepository {
    items: RwLock<HashMap<Uuid, MenuItem>>,
}

impl InMemoryMenuRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MenuRepository for InMemoryMenuRepository {
    async fn insert(&self, item: MenuItem) -> Result<MenuItem, AppError> {
        let mut items = self.items.write().await;
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MenuItem>, AppError> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<MenuItem>, AppError> {
        let items = self.items.read().await;
        let mut all: Vec<MenuItem> = items.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn update(&self, item: MenuItem) -> Result<MenuItem, AppError> {
        let mut items = self.items.write().await;
        if !items.contains_key(&item.id) {
            return Err(AppError::NotFound("Prato".to_string()));
        }
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut items = self.items.write().await;
        items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Prato".to_string()))
    }
}
