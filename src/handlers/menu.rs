// src/handlers/menu.rs

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
    middleware::auth::AdminUser,
    models::menu::{CreateMenuItemPayload, MenuItem, UpdateMenuItemPayload},
};

// GET /api/menu
#[utoipa::path(
    get,
    path = "/api/menu",
    tag = "Menu",
    responses(
        (status = 200, description = "Cardápio completo", body = Vec<MenuItem>)
    )
)]
pub async fn get_menu_items(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state.menu_service.get_items().await?;
    Ok((StatusCode::OK, Json(items)))
}

// GET /api/menu/{id}
#[utoipa::path(
    get,
    path = "/api/menu/{id}",
    tag = "Menu",
    params(("id" = Uuid, Path, description = "ID do prato")),
    responses(
        (status = 200, description = "Detalhe do prato", body = MenuItem),
        (status = 404, description = "Prato não encontrado")
    )
)]
pub async fn get_menu_item(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state.menu_service.get_item(id).await?;
    Ok((StatusCode::OK, Json(item)))
}

// POST /api/menu
#[utoipa::path(
    post,
    path = "/api/menu",
    tag = "Menu",
    request_body = CreateMenuItemPayload,
    responses(
        (status = 201, description = "Prato criado", body = MenuItem)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_menu_item(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateMenuItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state.menu_service.create_item(payload).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

// PUT /api/menu/{id}
#[utoipa::path(
    put,
    path = "/api/menu/{id}",
    tag = "Menu",
    request_body = UpdateMenuItemPayload,
    params(("id" = Uuid, Path, description = "ID do prato")),
    responses(
        (status = 200, description = "Prato atualizado", body = MenuItem),
        (status = 404, description = "Prato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_menu_item(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state.menu_service.update_item(id, payload).await?;

    Ok((StatusCode::OK, Json(item)))
}

// DELETE /api/menu/{id}
#[utoipa::path(
    delete,
    path = "/api/menu/{id}",
    tag = "Menu",
    params(("id" = Uuid, Path, description = "ID do prato")),
    responses(
        (status = 200, description = "Prato removido"),
        (status = 404, description = "Prato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_menu_item(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.menu_service.delete_item(id).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Prato removido do cardápio." })),
    ))
}
