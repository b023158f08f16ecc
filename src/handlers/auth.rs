// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminUser, AuthenticatedUser},
    models::auth::{AuthResponse, LoginPayload, RegisterStaffPayload, User},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login da equipe realizado", body = AuthResponse),
        (status = 401, description = "Telefone ou PIN incorretos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state
        .auth_service
        .login(&payload.phone, &payload.pin)
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterStaffPayload,
    responses(
        (status = 201, description = "Membro da equipe cadastrado", body = User),
        (status = 403, description = "Somente admin pode cadastrar equipe"),
        (status = 409, description = "Telefone já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_staff(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<RegisterStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state.auth_service.register_staff(payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Dados do usuário autenticado", body = User),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.auth_service.me(user.0.id).await?;
    Ok((StatusCode::OK, Json(user)))
}
