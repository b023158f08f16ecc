// src/db/customer_repo.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{common::error::AppError, models::customer::Customer};

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    // Insere respeitando a unicidade do e-mail (sempre minúsculo).
    async fn insert(&self, customer: Customer) -> Result<Customer, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError>;

    async fn update(&self, customer: Customer) -> Result<Customer, AppError>;
}

#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<Uuid, Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn insert(&self, customer: Customer) -> Result<Customer, AppError> {
        let mut customers = self.customers.write().await;
        if customers.values().any(|c| c.email == customer.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        let customers = self.customers.read().await;
        Ok(customers.values().find(|c| c.email == email).cloned())
    }

    async fn update(&self, customer: Customer) -> Result<Customer, AppError> {
        let mut customers = self.customers.write().await;
        if !customers.contains_key(&customer.id) {
            return Err(AppError::NotFound("Cliente".to_string()));
        }
        // Unicidade do e-mail também vale na troca de e-mail.
        if customers
            .values()
            .any(|c| c.id != customer.id && c.email == customer.email)
        {
            return Err(AppError::EmailAlreadyExists);
        }
        customers.insert(customer.id, customer.clone());
        Ok(customer)
    }
}
