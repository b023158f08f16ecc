// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{Period, ProfitStats, RevenueStats, TodayStats, TopItemEntry},
};

// Converte "AAAA-MM-DD" num dia do calendário, com erro de validação
// amigável para datas malformadas.
pub(crate) fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    raw.parse::<NaiveDate>()
        .map_err(|_| AppError::InvalidInput(format!("Data inválida: {raw} (use AAAA-MM-DD).")))
}

// GET /api/dashboard/today
#[utoipa::path(
    get,
    path = "/api/dashboard/today",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo do dia: pedidos, pagamentos e reservas", body = TodayStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_today_stats(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.dashboard_service.today_stats().await?;
    Ok((StatusCode::OK, Json(stats)))
}

#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    pub period: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

// GET /api/dashboard/revenue
#[utoipa::path(
    get,
    path = "/api/dashboard/revenue",
    tag = "Dashboard",
    params(
        ("period" = Option<String>, Query, description = "today | week | month | custom (padrão: week)"),
        ("start" = Option<String>, Query, description = "Início AAAA-MM-DD (somente custom)"),
        ("end" = Option<String>, Query, description = "Fim AAAA-MM-DD (somente custom)")
    ),
    responses(
        (status = 200, description = "Receita do intervalo, sem filtro de pagamento", body = RevenueStats),
        (status = 400, description = "Intervalo de datas inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_revenue_stats(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<RevenueQuery>,
) -> Result<impl IntoResponse, AppError> {
    let period = query.period.as_deref().and_then(Period::parse);
    let start = query.start.as_deref().map(parse_day).transpose()?;
    let end = query.end.as_deref().map(parse_day).transpose()?;

    let stats = app_state
        .dashboard_service
        .revenue_stats(period, start, end)
        .await?;

    Ok((StatusCode::OK, Json(stats)))
}

#[derive(Debug, Deserialize)]
pub struct TopItemsQuery {
    pub period: Option<String>,
    pub limit: Option<usize>,
}

// GET /api/dashboard/top-items
#[utoipa::path(
    get,
    path = "/api/dashboard/top-items",
    tag = "Dashboard",
    params(
        ("period" = Option<String>, Query, description = "today | week | month (ausente = tudo)"),
        ("limit" = Option<usize>, Query, description = "Tamanho do ranking (padrão: 5)")
    ),
    responses(
        (status = 200, description = "Pratos mais vendidos por quantidade", body = Vec<TopItemEntry>),
        (status = 400, description = "Limite inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_top_items(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<TopItemsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let period = query.period.as_deref().and_then(Period::parse);
    let limit = query.limit.unwrap_or(5);

    let top = app_state.dashboard_service.top_items(period, limit).await?;

    Ok((StatusCode::OK, Json(top)))
}

#[derive(Debug, Deserialize)]
pub struct ProfitQuery {
    pub period: Option<String>,
}

// GET /api/dashboard/profit
#[utoipa::path(
    get,
    path = "/api/dashboard/profit",
    tag = "Dashboard",
    params(
        ("period" = Option<String>, Query, description = "today | week | month (padrão: today)")
    ),
    responses(
        (status = 200, description = "Lucro bruto: receita paga menos entradas de estoque", body = ProfitStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_profit_stats(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ProfitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let period = query.period.as_deref().and_then(Period::parse);

    let stats = app_state.dashboard_service.profit_stats(period).await?;

    Ok((StatusCode::OK, Json(stats)))
}
