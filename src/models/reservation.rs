// src/models/reservation.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,

    // Dia reservado (sem fuso) + horário como texto livre ("19:30").
    pub date: NaiveDate,
    pub time: String,

    pub people: i64,
    pub special_requests: String,
    pub status: ReservationStatus,

    // Mesa atribuída pela equipe na confirmação ("" = ainda sem mesa).
    pub table: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub customer_name: String,

    #[validate(length(min = 8, message = "O telefone é obrigatório."))]
    pub phone: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[schema(example = "2025-05-18")]
    pub date: NaiveDate,

    #[validate(length(min = 1, message = "O horário é obrigatório."))]
    #[schema(example = "19:30")]
    pub time: String,

    #[validate(range(min = 1, message = "A reserva precisa de ao menos 1 pessoa."))]
    pub people: i64,

    pub special_requests: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationPayload {
    pub customer_name: Option<String>,
    pub phone: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub date: Option<NaiveDate>,
    pub time: Option<String>,

    #[validate(range(min = 1, message = "A reserva precisa de ao menos 1 pessoa."))]
    pub people: Option<i64>,

    pub special_requests: Option<String>,
    pub status: Option<ReservationStatus>,
    pub table: Option<String>,
}
