// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::dashboard::parse_day,
    middleware::auth::AuthenticatedUser,
    models::{
        dashboard::DateWindow,
        inventory::{
            CreateItemPayload, ExportPayload, ImportPayload, InventoryItem, Transaction,
            TransactionFilter, TransactionType, TransactionView, UpdateItemPayload,
        },
    },
    services::inventory_service::{ExportLine, ImportLine},
};

// GET /api/inventory
#[utoipa::path(
    get,
    path = "/api/inventory",
    tag = "Inventory",
    responses(
        (status = 200, description = "Itens do estoque por categoria e nome", body = Vec<InventoryItem>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_inventory(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state.inventory_service.get_items().await?;
    Ok((StatusCode::OK, Json(items)))
}

// GET /api/inventory/low-stock
#[utoipa::path(
    get,
    path = "/api/inventory/low-stock",
    tag = "Inventory",
    responses(
        (status = 200, description = "Itens no estoque mínimo ou abaixo", body = Vec<InventoryItem>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_low_stock(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state.inventory_service.low_stock().await?;
    Ok((StatusCode::OK, Json(items)))
}

// GET /api/inventory/{id}
#[utoipa::path(
    get,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Detalhe do item", body = InventoryItem),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_inventory_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state.inventory_service.get_item(id).await?;
    Ok((StatusCode::OK, Json(item)))
}

// POST /api/inventory
#[utoipa::path(
    post,
    path = "/api/inventory",
    tag = "Inventory",
    request_body = CreateItemPayload,
    responses(
        (status = 201, description = "Item criado", body = InventoryItem)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_inventory_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state.inventory_service.create_item(payload).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

// PUT /api/inventory/{id}
#[utoipa::path(
    put,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    request_body = UpdateItemPayload,
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item atualizado", body = InventoryItem),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_inventory_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state.inventory_service.update_item(id, payload).await?;

    Ok((StatusCode::OK, Json(item)))
}

// DELETE /api/inventory/{id}
#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item removido"),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_inventory_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.inventory_service.delete_item(id).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Item removido do estoque." })),
    ))
}

// POST /api/inventory/import
#[utoipa::path(
    post,
    path = "/api/inventory/import",
    tag = "Inventory",
    request_body = ImportPayload,
    responses(
        (status = 201, description = "Entrada registrada no livro", body = Transaction),
        (status = 404, description = "Algum item da lista não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_inventory(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ImportPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lines = payload
        .items
        .iter()
        .map(|line| ImportLine {
            item_id: line.item,
            quantity: line.quantity,
            unit_cost: line.cost,
        })
        .collect();

    let transaction = app_state
        .inventory_service
        .apply_import(lines, payload.supplier, payload.note, Some(user.0.id))
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

// POST /api/inventory/export
#[utoipa::path(
    post,
    path = "/api/inventory/export",
    tag = "Inventory",
    request_body = ExportPayload,
    responses(
        (status = 201, description = "Saída registrada no livro", body = Transaction),
        (status = 409, description = "Estoque insuficiente: nada foi alterado")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_inventory(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ExportPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lines = payload
        .items
        .iter()
        .map(|line| ExportLine {
            item_id: line.item,
            quantity: line.quantity,
        })
        .collect();

    let transaction = app_state
        .inventory_service
        .apply_export(lines, payload.order_id, payload.note, Some(user.0.id))
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    // "import" ou "export"
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub order_id: Option<Uuid>,
}

// GET /api/inventory/transactions
#[utoipa::path(
    get,
    path = "/api/inventory/transactions",
    tag = "Inventory",
    params(
        ("type" = Option<String>, Query, description = "import | export"),
        ("start" = Option<String>, Query, description = "Início AAAA-MM-DD"),
        ("end" = Option<String>, Query, description = "Fim AAAA-MM-DD"),
        ("orderId" = Option<Uuid>, Query, description = "Filtra saídas de um pedido")
    ),
    responses(
        (status = 200, description = "Livro de movimentações, mais novo primeiro", body = Vec<TransactionView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_transactions(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<TransactionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let transaction_type = match query.transaction_type.as_deref() {
        None => None,
        Some("import") => Some(TransactionType::Import),
        Some("export") => Some(TransactionType::Export),
        Some(other) => {
            return Err(AppError::InvalidInput(format!(
                "Tipo de movimentação desconhecido: {other}."
            )))
        }
    };

    let date_range = match (query.start.as_deref(), query.end.as_deref()) {
        (Some(start), Some(end)) => {
            let first = parse_day(start)?;
            let last = parse_day(end)?;
            if first > last {
                return Err(AppError::InvalidInput(
                    "O início do intervalo não pode vir depois do fim.".to_string(),
                ));
            }
            let window = DateWindow::from_local_days(first, last);
            Some((window.start, window.end_exclusive))
        }
        _ => None,
    };

    let transactions = app_state
        .inventory_service
        .transactions(TransactionFilter {
            transaction_type,
            date_range,
            order_id: query.order_id,
        })
        .await?;

    Ok((StatusCode::OK, Json(transactions)))
}
