// src/services/order_service.rs

use std::sync::Arc;

use chrono::{Local, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, MenuRepository, OrderRepository},
    models::order::{
        CreateOrderPayload, Order, OrderCreatedResponse, OrderItem, OrderStatus,
        OrderTrackingView, PaymentMethod, PaymentStatus, TrackedOrderItem, UpdateOrderPayload,
    },
};

#[derive(Clone)]
pub struct OrderService {
    order_repo: Arc<dyn OrderRepository>,
    menu_repo: Arc<dyn MenuRepository>,
    customer_repo: Arc<dyn CustomerRepository>,
}

impl OrderService {
    pub fn new(
        order_repo: Arc<dyn OrderRepository>,
        menu_repo: Arc<dyn MenuRepository>,
        customer_repo: Arc<dyn CustomerRepository>,
    ) -> Self {
        Self {
            order_repo,
            menu_repo,
            customer_repo,
        }
    }

    // Cria um pedido resolvendo cada prato no cardápio: nome e preço
    // entram como retrato do momento e o total é recalculado aqui.
    // Preço vindo do cliente nunca é usado.
    pub async fn create_order(
        &self,
        payload: CreateOrderPayload,
    ) -> Result<OrderCreatedResponse, AppError> {
        let mut items: Vec<OrderItem> = Vec::with_capacity(payload.items.len());
        let mut total_amount = Decimal::ZERO;

        for line in &payload.items {
            let menu_item = self
                .menu_repo
                .find_by_id(line.menu_item)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Prato {}", line.menu_item)))?;

            total_amount += menu_item.price * Decimal::from(line.quantity);
            items.push(OrderItem {
                menu_item_id: menu_item.id,
                name: menu_item.name,
                price: menu_item.price,
                quantity: line.quantity,
                note: line.note.clone().unwrap_or_default(),
            });
        }

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            order_code: generate_order_code(),
            customer_id: payload.customer_id,
            customer_name: payload.customer_name,
            phone: payload.phone,
            email: payload.email,
            items,
            reservation_id: payload.reservation_id,
            total_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_method: PaymentMethod::Cash,
            serve_time: None,
            note: payload.note,
            created_at: now,
            updated_at: now,
        };

        let created = self.order_repo.insert(order).await?;

        // Vincula o pedido à conta do cliente, quando houver.
        if let Some(customer_id) = payload.customer_id {
            if let Some(mut customer) = self.customer_repo.find_by_id(customer_id).await? {
                customer.order_ids.push(created.id);
                customer.updated_at = now;
                self.customer_repo.update(customer).await?;
            }
        }

        Ok(OrderCreatedResponse {
            id: created.id,
            order_code: created.order_code,
            customer_name: created.customer_name,
            total_amount: created.total_amount,
            status: created.status,
            status_text: created.status.label().to_string(),
            created_at: created.created_at,
        })
    }

    pub async fn get_orders(&self) -> Result<Vec<Order>, AppError> {
        self.order_repo.list_all().await
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Order, AppError> {
        self.order_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido".to_string()))
    }

    // Acompanhamento público pelo código: só o necessário para o
    // cliente, com o telefone mascarado.
    pub async fn track_order(&self, order_code: &str) -> Result<OrderTrackingView, AppError> {
        let order = self
            .order_repo
            .find_by_code(order_code)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido com esse código".to_string()))?;

        Ok(OrderTrackingView {
            order_code: order.order_code,
            customer_name: order.customer_name,
            phone: mask_phone(&order.phone),
            status: order.status,
            status_text: order.status.label().to_string(),
            items: order
                .items
                .into_iter()
                .map(|item| TrackedOrderItem {
                    name: item.name,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
            total_amount: order.total_amount,
            payment_status: order.payment_status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }

    pub async fn update_order(
        &self,
        id: Uuid,
        payload: UpdateOrderPayload,
    ) -> Result<Order, AppError> {
        let mut order = self.get_order(id).await?;

        if let Some(status) = payload.status {
            order.status = status;
        }
        if let Some(payment_status) = payload.payment_status {
            order.payment_status = payment_status;
        }
        if let Some(payment_method) = payload.payment_method {
            order.payment_method = payment_method;
        }
        if let Some(serve_time) = payload.serve_time {
            order.serve_time = Some(serve_time);
        }
        if let Some(note) = payload.note {
            order.note = Some(note);
        }
        order.updated_at = Utc::now();

        self.order_repo.update(order).await
    }

    pub async fn delete_order(&self, id: Uuid) -> Result<(), AppError> {
        self.order_repo.delete(id).await
    }
}

// Código público do pedido: data local + 6 dígitos derivados de um
// UUID aleatório (ex.: "20250518-123456").
fn generate_order_code() -> String {
    let raw = Uuid::new_v4();
    let bytes = raw.as_bytes();
    let seed = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let suffix = seed % 900_000 + 100_000;
    format!("{}-{}", Local::now().format("%Y%m%d"), suffix)
}

// Esconde o meio do telefone: "0901234567" -> "0901****567".
fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 7 {
        return phone.to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 3..].iter().collect();
    format!("{prefix}****{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryCustomerRepository, InMemoryMenuRepository, InMemoryOrderRepository};
    use crate::models::menu::{CreateMenuItemPayload, MenuCategory, MenuItem};
    use crate::models::order::OrderItemPayload;
    use crate::services::menu_service::MenuService;

    struct Fixture {
        service: OrderService,
        menu_service: MenuService,
    }

    fn fixture() -> Fixture {
        let menu_repo = Arc::new(InMemoryMenuRepository::new());
        Fixture {
            service: OrderService::new(
                Arc::new(InMemoryOrderRepository::new()),
                menu_repo.clone(),
                Arc::new(InMemoryCustomerRepository::new()),
            ),
            menu_service: MenuService::new(menu_repo),
        }
    }

    async fn seed_dish(fx: &Fixture, name: &str, price: i64) -> MenuItem {
        fx.menu_service
            .create_item(CreateMenuItemPayload {
                name: name.to_string(),
                description: "Prato da casa".to_string(),
                price: Decimal::from(price),
                cost_price: Decimal::from(price / 2),
                category: MenuCategory::MainCourse,
                image: None,
                available: None,
                popular: None,
            })
            .await
            .unwrap()
    }

    fn order_payload(items: Vec<OrderItemPayload>) -> CreateOrderPayload {
        CreateOrderPayload {
            customer_name: "Cliente".to_string(),
            phone: "0901234567".to_string(),
            email: None,
            items,
            reservation_id: None,
            customer_id: None,
            note: None,
        }
    }

    #[tokio::test]
    async fn pedido_congela_preco_do_cardapio_e_recalcula_o_total() {
        let fx = fixture();
        let dish = seed_dish(&fx, "Cá kho tộ", 85_000).await;

        let created = fx
            .service
            .create_order(order_payload(vec![OrderItemPayload {
                menu_item: dish.id,
                quantity: 2,
                note: None,
            }]))
            .await
            .unwrap();

        assert_eq!(created.total_amount, Decimal::from(170_000));

        // Mudar o preço do prato depois não altera o pedido gravado.
        fx.menu_service
            .update_item(
                dish.id,
                crate::models::menu::UpdateMenuItemPayload {
                    name: None,
                    description: None,
                    price: Some(Decimal::from(95_000)),
                    cost_price: None,
                    category: None,
                    image: None,
                    available: None,
                    popular: None,
                },
            )
            .await
            .unwrap();

        let stored = fx.service.get_order(created.id).await.unwrap();
        assert_eq!(stored.items[0].price, Decimal::from(85_000));
        assert_eq!(stored.total_amount, Decimal::from(170_000));
    }

    #[tokio::test]
    async fn prato_desconhecido_recusa_o_pedido() {
        let fx = fixture();

        let err = fx
            .service
            .create_order(order_payload(vec![OrderItemPayload {
                menu_item: Uuid::new_v4(),
                quantity: 1,
                note: None,
            }]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(fx.service.get_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn acompanhamento_mascara_o_telefone() {
        let fx = fixture();
        let dish = seed_dish(&fx, "Gỏi cuốn", 30_000).await;

        let created = fx
            .service
            .create_order(order_payload(vec![OrderItemPayload {
                menu_item: dish.id,
                quantity: 1,
                note: None,
            }]))
            .await
            .unwrap();

        let tracked = fx.service.track_order(&created.order_code).await.unwrap();
        assert_eq!(tracked.phone, "0901****567");
        assert_eq!(tracked.status_text, "Aguardando preparo");

        let err = fx.service.track_order("00000000-000000").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn atualizacao_marca_pagamento_e_status() {
        let fx = fixture();
        let dish = seed_dish(&fx, "Chè", 20_000).await;
        let created = fx
            .service
            .create_order(order_payload(vec![OrderItemPayload {
                menu_item: dish.id,
                quantity: 1,
                note: None,
            }]))
            .await
            .unwrap();

        let updated = fx
            .service
            .update_order(
                created.id,
                UpdateOrderPayload {
                    status: Some(OrderStatus::Completed),
                    payment_status: Some(PaymentStatus::Paid),
                    payment_method: Some(PaymentMethod::BankTransfer),
                    serve_time: None,
                    note: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Completed);
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn codigo_do_pedido_tem_data_e_seis_digitos() {
        let code = generate_order_code();
        let (date_part, number_part) = code.split_once('-').expect("separador");
        assert_eq!(date_part.len(), 8);
        assert_eq!(number_part.len(), 6);
        assert!(number_part.chars().all(|c| c.is_ascii_digit()));
    }
}
