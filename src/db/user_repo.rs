// src/db/user_repo.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    // Insere respeitando a unicidade do telefone.
    async fn insert(&self, user: User) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, AppError>;
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.phone == user.phone) {
            return Err(AppError::PhoneAlreadyExists);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.phone == phone).cloned())
    }
}
