// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::{Claims, Role, User},
        customer::Customer,
    },
};

// Lê e valida o "Authorization: Bearer <token>" da requisição.
fn claims_from_headers(app_state: &AppState, headers: &HeaderMap) -> Result<Claims, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return app_state.auth_service.validate_token(token);
        }
    }

    Err(AppError::InvalidToken)
}

// Resolve o membro da equipe dono do token. Token de cliente não abre
// o painel da equipe.
async fn resolve_staff(app_state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let claims = claims_from_headers(app_state, headers)?;

    match claims.role {
        Role::Admin | Role::Staff => app_state
            .auth_service
            .find_user(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken),
        Role::Customer => Err(AppError::Forbidden),
    }
}

async fn resolve_customer(app_state: &AppState, headers: &HeaderMap) -> Result<Customer, AppError> {
    let claims = claims_from_headers(app_state, headers)?;

    if claims.role != Role::Customer {
        return Err(AppError::Forbidden);
    }

    app_state
        .customer_service
        .find_customer(claims.sub)
        .await?
        .ok_or(AppError::InvalidToken)
}

// Guardião de router inteiro da equipe: valida uma vez e insere o
// usuário nos "extensions"; os extratores pegam de lá.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_staff(&app_state, request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// Guardião das rotas de conta do cliente.
pub async fn customer_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let customer = resolve_customer(&app_state, request.headers()).await?;
    request.extensions_mut().insert(customer);
    Ok(next.run(request).await)
}

// Extrator do usuário autenticado. Em routers cobertos pelo
// `auth_guard` ele só lê os extensions; em rotas soltas (router com
// métodos públicos e privados misturados) valida o token aqui mesmo.
pub struct AuthenticatedUser(pub User);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>() {
            return Ok(AuthenticatedUser(user.clone()));
        }

        let user = resolve_staff(state, &parts.headers).await?;
        Ok(AuthenticatedUser(user))
    }
}

// Igual ao AuthenticatedUser, mas só deixa passar admin.
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) =
            AuthenticatedUser::from_request_parts(parts, state).await?;

        if user.role != Role::Admin {
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}

// Extrator do cliente autenticado (rotas /api/customers/me*).
pub struct AuthenticatedCustomer(pub Customer);

impl FromRequestParts<AppState> for AuthenticatedCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(customer) = parts.extensions.get::<Customer>() {
            return Ok(AuthenticatedCustomer(customer.clone()));
        }

        let customer = resolve_customer(state, &parts.headers).await?;
        Ok(AuthenticatedCustomer(customer))
    }
}
