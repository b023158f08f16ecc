// src/models/menu.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Categorias fechadas do cardápio, validadas na borda (nada de string livre).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MenuCategory {
    Appetizer,
    MainCourse,
    Dessert,
    Beverage,
    Specialty,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub cost_price: Decimal,
    pub category: MenuCategory,
    pub image: String,
    pub available: bool,
    pub popular: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    pub fn profit(&self) -> Decimal {
        self.price - self.cost_price
    }

    // Margem sobre o preço de venda, em %. Zero quando o preço é zero.
    pub fn profit_margin(&self) -> Decimal {
        if self.price.is_zero() {
            return Decimal::ZERO;
        }
        (self.price - self.cost_price) / self.price * Decimal::from(100)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Cá kho tộ")]
    pub name: String,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub price: Decimal,

    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub cost_price: Decimal,

    pub category: MenuCategory,

    pub image: Option<String>,
    pub available: Option<bool>,
    pub popular: Option<bool>,
}

// Atualização parcial: só os campos presentes são alterados.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemPayload {
    pub name: Option<String>,
    pub description: Option<String>,

    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub price: Option<Decimal>,

    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub cost_price: Option<Decimal>,

    pub category: Option<MenuCategory>,
    pub image: Option<String>,
    pub available: Option<bool>,
    pub popular: Option<bool>,
}
