// src/handlers/customers.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedCustomer,
    models::{
        customer::{
            Customer, CustomerAuthResponse, LoginCustomerPayload, RegisterCustomerPayload,
            UpdateCustomerPayload,
        },
        order::Order,
    },
};

// POST /api/customers/register
#[utoipa::path(
    post,
    path = "/api/customers/register",
    tag = "Customers",
    request_body = RegisterCustomerPayload,
    responses(
        (status = 201, description = "Conta de cliente criada", body = CustomerAuthResponse),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state.customer_service.register(payload).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

// POST /api/customers/login
#[utoipa::path(
    post,
    path = "/api/customers/login",
    tag = "Customers",
    request_body = LoginCustomerPayload,
    responses(
        (status = 200, description = "Login do cliente realizado", body = CustomerAuthResponse),
        (status = 401, description = "E-mail ou senha incorretos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state.customer_service.login(payload).await?;

    Ok((StatusCode::OK, Json(response)))
}

// GET /api/customers/me
#[utoipa::path(
    get,
    path = "/api/customers/me",
    tag = "Customers",
    responses(
        (status = 200, description = "Perfil do cliente autenticado", body = Customer),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn profile(
    State(app_state): State<AppState>,
    customer: AuthenticatedCustomer,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.customer_service.profile(customer.0.id).await?;
    Ok((StatusCode::OK, Json(customer)))
}

// PUT /api/customers/me
#[utoipa::path(
    put,
    path = "/api/customers/me",
    tag = "Customers",
    request_body = UpdateCustomerPayload,
    responses(
        (status = 200, description = "Perfil atualizado (token novo incluso)", body = CustomerAuthResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    customer: AuthenticatedCustomer,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state
        .customer_service
        .update_profile(customer.0.id, payload)
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

// GET /api/customers/me/orders
#[utoipa::path(
    get,
    path = "/api/customers/me/orders",
    tag = "Customers",
    responses(
        (status = 200, description = "Pedidos ligados ao e-mail/telefone da conta", body = Vec<Order>)
    ),
    security(("api_jwt" = []))
)]
pub async fn my_orders(
    State(app_state): State<AppState>,
    customer: AuthenticatedCustomer,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.customer_service.orders(customer.0.id).await?;
    Ok((StatusCode::OK, Json(orders)))
}
