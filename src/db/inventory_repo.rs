// src/db/inventory_repo.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{common::error::AppError, models::inventory::InventoryItem};

// Contrato da coleção de insumos. Os serviços só enxergam este trait;
// trocar o armazenamento é implementar o trait de novo.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn insert(&self, item: InventoryItem) -> Result<InventoryItem, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryItem>, AppError>;

    // Todos os itens, ordenados por categoria e nome.
    async fn list_all(&self) -> Result<Vec<InventoryItem>, AppError>;

    async fn update(&self, item: InventoryItem) -> Result<InventoryItem, AppError>;

    // Grava apenas o saldo. Usado pelo serviço de estoque, que já
    // segura o lock do item quando chama aqui.
    async fn set_quantity(&self, id: Uuid, quantity: i64) -> Result<(), AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

// Implementação em memória: um mapa por id atrás de RwLock, o mesmo
// desenho de "uma coleção por entidade" do restante do sistema.
#[derive(Default)]
pub struct InMemoryInventoryRepository {
    items: RwLock<HashMap<Uuid, InventoryItem>>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn insert(&self, item: InventoryItem) -> Result<InventoryItem, AppError> {
        let mut items = self.items.write().await;
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryItem>, AppError> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<InventoryItem>, AppError> {
        let items = self.items.read().await;
        let mut all: Vec<InventoryItem> = items.values().cloned().collect();
        all.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        Ok(all)
    }

    async fn update(&self, item: InventoryItem) -> Result<InventoryItem, AppError> {
        let mut items = self.items.write().await;
        if !items.contains_key(&item.id) {
            return Err(AppError::NotFound("Item de estoque".to_string()));
        }
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn set_quantity(&self, id: Uuid, quantity: i64) -> Result<(), AppError> {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Item de estoque".to_string()))?;
        item.quantity = quantity;
        item.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut items = self.items.write().await;
        items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Item de estoque".to_string()))
    }
}
