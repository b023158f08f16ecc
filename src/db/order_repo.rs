// src/db/order_repo.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{common::error::AppError, models::order::Order};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: Order) -> Result<Order, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError>;

    async fn find_by_code(&self, order_code: &str) -> Result<Option<Order>, AppError>;

    // Todos os pedidos, do mais novo para o mais antigo.
    async fn list_all(&self) -> Result<Vec<Order>, AppError>;

    // Pedidos criados dentro de [start, end_exclusive), do mais antigo
    // para o mais novo (ordem que os agregadores consomem).
    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end_exclusive: DateTime<Utc>,
    ) -> Result<Vec<Order>, AppError>;

    // Histórico do cliente: pedidos com o mesmo e-mail OU telefone,
    // do mais novo para o mais antigo.
    async fn find_by_contact(&self, email: &str, phone: &str) -> Result<Vec<Order>, AppError>;

    async fn update(&self, order: Order) -> Result<Order, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: Order) -> Result<Order, AppError> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn find_by_code(&self, order_code: &str) -> Result<Option<Order>, AppError> {
        let orders = self.orders.read().await;
        Ok(orders.values().find(|o| o.order_code == order_code).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Order>, AppError> {
        let orders = self.orders.read().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end_exclusive: DateTime<Utc>,
    ) -> Result<Vec<Order>, AppError> {
        let orders = self.orders.read().await;
        let mut found: Vec<Order> = orders
            .values()
            .filter(|o| o.created_at >= start && o.created_at < end_exclusive)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }

    async fn find_by_contact(&self, email: &str, phone: &str) -> Result<Vec<Order>, AppError> {
        let orders = self.orders.read().await;
        let mut found: Vec<Order> = orders
            .values()
            .filter(|o| o.email.as_deref() == Some(email) || o.phone == phone)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn update(&self, order: Order) -> Result<Order, AppError> {
        let mut orders = self.orders.write().await;
        if !orders.contains_key(&order.id) {
            return Err(AppError::NotFound("Pedido".to_string()));
        }
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut orders = self.orders.write().await;
        orders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Pedido".to_string()))
    }
}
