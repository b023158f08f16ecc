// src/handlers/orders.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::order::{
        CreateOrderPayload, Order, OrderCreatedResponse, OrderTrackingView, UpdateOrderPayload,
    },
};

// POST /api/orders (público: o cliente pede sem login)
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado com total calculado no servidor", body = OrderCreatedResponse),
        (status = 404, description = "Algum prato do pedido não existe")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = app_state.order_service.create_order(payload).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/orders/track/{code} (público)
#[utoipa::path(
    get,
    path = "/api/orders/track/{code}",
    tag = "Orders",
    params(("code" = String, Path, description = "Código público do pedido")),
    responses(
        (status = 200, description = "Acompanhamento do pedido", body = OrderTrackingView),
        (status = 404, description = "Nenhum pedido com esse código")
    )
)]
pub async fn track_order(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = app_state.order_service.track_order(&code).await?;
    Ok((StatusCode::OK, Json(view)))
}

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedidos do mais novo para o mais antigo", body = Vec<Order>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_orders(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.order_service.get_orders().await?;
    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Detalhe do pedido", body = Order),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.get_order(id).await?;
    Ok((StatusCode::OK, Json(order)))
}

// PUT /api/orders/{id}
#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    tag = "Orders",
    request_body = UpdateOrderPayload,
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido atualizado", body = Order),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let order = app_state.order_service.update_order(id, payload).await?;

    Ok((StatusCode::OK, Json(order)))
}

// DELETE /api/orders/{id}
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido removido"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.order_service.delete_order(id).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Pedido removido." })),
    ))
}
