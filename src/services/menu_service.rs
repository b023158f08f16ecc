// src/services/menu_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MenuRepository,
    models::menu::{CreateMenuItemPayload, MenuItem, UpdateMenuItemPayload},
};

#[derive(Clone)]
pub struct MenuService {
    menu_repo: Arc<dyn MenuRepository>,
}

impl MenuService {
    pub fn new(menu_repo: Arc<dyn MenuRepository>) -> Self {
        Self { menu_repo }
    }

    pub async fn create_item(&self, payload: CreateMenuItemPayload) -> Result<MenuItem, AppError> {
        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::new_v4(),
            name: payload.name,
            description: payload.description,
            price: payload.price,
            cost_price: payload.cost_price,
            category: payload.category,
            image: payload.image.unwrap_or_else(|| "default-food.jpg".to_string()),
            available: payload.available.unwrap_or(true),
            popular: payload.popular.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };
        self.menu_repo.insert(item).await
    }

    pub async fn get_items(&self) -> Result<Vec<MenuItem>, AppError> {
        self.menu_repo.list_all().await
    }

    pub async fn get_item(&self, id: Uuid) -> Result<MenuItem, AppError> {
        self.menu_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Prato".to_string()))
    }

    pub async fn update_item(
        &self,
        id: Uuid,
        payload: UpdateMenuItemPayload,
    ) -> Result<MenuItem, AppError> {
        let mut item = self.get_item(id).await?;

        if let Some(name) = payload.name {
            item.name = name;
        }
        if let Some(description) = payload.description {
            item.description = description;
        }
        if let Some(price) = payload.price {
            item.price = price;
        }
        if let Some(cost_price) = payload.cost_price {
            item.cost_price = cost_price;
        }
        if let Some(category) = payload.category {
            item.category = category;
        }
        if let Some(image) = payload.image {
            item.image = image;
        }
        if let Some(available) = payload.available {
            item.available = available;
        }
        if let Some(popular) = payload.popular {
            item.popular = popular;
        }
        item.updated_at = Utc::now();

        self.menu_repo.update(item).await
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        self.menu_repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryMenuRepository;
    use crate::models::menu::MenuCategory;
    use rust_decimal::Decimal;

    fn service() -> MenuService {
        MenuService::new(Arc::new(InMemoryMenuRepository::new()))
    }

    fn payload() -> CreateMenuItemPayload {
        CreateMenuItemPayload {
            name: "Cá kho tộ".to_string(),
            description: "Peixe caramelizado na panela de barro".to_string(),
            price: Decimal::from(85_000),
            cost_price: Decimal::from(40_000),
            category: MenuCategory::MainCourse,
            image: None,
            available: None,
            popular: None,
        }
    }

    #[tokio::test]
    async fn criacao_aplica_os_defaults() {
        let service = service();
        let item = service.create_item(payload()).await.unwrap();

        assert_eq!(item.image, "default-food.jpg");
        assert!(item.available);
        assert!(!item.popular);

        // Helpers de margem do prato.
        assert_eq!(item.profit(), Decimal::from(45_000));
        assert!(item.profit_margin() > Decimal::from(52));
        assert!(item.profit_margin() < Decimal::from(53));
    }

    #[tokio::test]
    async fn atualizacao_parcial_so_toca_os_campos_presentes() {
        let service = service();
        let item = service.create_item(payload()).await.unwrap();

        let updated = service
            .update_item(
                item.id,
                UpdateMenuItemPayload {
                    name: None,
                    description: None,
                    price: Some(Decimal::from(90_000)),
                    cost_price: None,
                    category: None,
                    image: None,
                    available: Some(false),
                    popular: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, Decimal::from(90_000));
        assert!(!updated.available);
        assert_eq!(updated.name, item.name);

        let err = service.get_item(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
