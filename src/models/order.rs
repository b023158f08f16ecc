// src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Served,
    Completed,
    Cancelled,
}

impl OrderStatus {
    // Texto amigável exibido ao cliente no acompanhamento do pedido.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Aguardando preparo",
            OrderStatus::Preparing => "Em preparo",
            OrderStatus::Ready => "Pronto para servir",
            OrderStatus::Served => "Servido",
            OrderStatus::Completed => "Concluído",
            OrderStatus::Cancelled => "Cancelado",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Other,
}

// Linha do pedido: nome e preço são um retrato do cardápio no momento
// da compra. Renomear o prato depois não altera pedidos antigos.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_item_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,

    // Código público de acompanhamento, ex.: "20250518-123456".
    pub order_code: String,

    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,

    pub items: Vec<OrderItem>,
    pub reservation_id: Option<Uuid>,

    // Sempre recalculado no servidor a partir das linhas.
    pub total_amount: Decimal,

    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub serve_time: Option<DateTime<Utc>>,
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// Payloads
// ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    // Referência do prato no cardápio
    pub menu_item: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i64,

    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub customer_name: String,

    #[validate(length(min = 8, message = "O telefone é obrigatório."))]
    pub phone: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "O pedido precisa de ao menos um item."), nested)]
    pub items: Vec<OrderItemPayload>,

    pub reservation_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderPayload {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub serve_time: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

// ---
// Respostas públicas
// ---

// Resumo devolvido na criação do pedido.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedResponse {
    pub id: Uuid,
    pub order_code: String,
    pub customer_name: String,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub status_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackedOrderItem {
    pub name: String,
    pub quantity: i64,
    pub price: Decimal,
}

// Visão pública do acompanhamento: telefone mascarado, sem IDs internos.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderTrackingView {
    pub order_code: String,
    pub customer_name: String,
    pub phone: String,
    pub status: OrderStatus,
    pub status_text: String,
    pub items: Vec<TrackedOrderItem>,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
