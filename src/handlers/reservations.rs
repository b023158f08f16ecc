// src/handlers/reservations.rs

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
    models::reservation::{CreateReservationPayload, Reservation, UpdateReservationPayload},
};

// POST /api/reservations (público: o cliente reserva pelo site)
#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    request_body = CreateReservationPayload,
    responses(
        (status = 201, description = "Reserva registrada", body = Reservation)
    )
)]
pub async fn create_reservation(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let reservation = app_state
        .reservation_service
        .create_reservation(payload)
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

// GET /api/reservations
#[utoipa::path(
    get,
    path = "/api/reservations",
    tag = "Reservations",
    responses(
        (status = 200, description = "Agenda de reservas (dia + horário)", body = Vec<Reservation>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_reservations(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let reservations = app_state.reservation_service.get_reservations().await?;
    Ok((StatusCode::OK, Json(reservations)))
}

// GET /api/reservations/{id}
#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Detalhe da reserva", body = Reservation),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_reservation(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state.reservation_service.get_reservation(id).await?;
    Ok((StatusCode::OK, Json(reservation)))
}

// PUT /api/reservations/{id}
#[utoipa::path(
    put,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    request_body = UpdateReservationPayload,
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva atualizada", body = Reservation),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_reservation(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let reservation = app_state
        .reservation_service
        .update_reservation(id, payload)
        .await?;

    Ok((StatusCode::OK, Json(reservation)))
}

// DELETE /api/reservations/{id}
#[utoipa::path(
    delete,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva cancelada e removida"),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_reservation(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.reservation_service.delete_reservation(id).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Reserva removida." })),
    ))
}
