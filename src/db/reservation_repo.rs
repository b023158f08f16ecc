// src/db/reservation_repo.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{common::error::AppError, models::reservation::Reservation};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn insert(&self, reservation: Reservation) -> Result<Reservation, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, AppError>;

    // Agenda completa, ordenada por dia e horário.
    async fn list_all(&self) -> Result<Vec<Reservation>, AppError>;

    // Reservas marcadas para um dia específico.
    async fn find_on_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, AppError>;

    async fn update(&self, reservation: Reservation) -> Result<Reservation, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

#[derive(Default)]
pub struct InMemoryReservationRepository {
    reservations: RwLock<HashMap<Uuid, Reservation>>,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn insert(&self, reservation: Reservation) -> Result<Reservation, AppError> {
        let mut reservations = self.reservations.write().await;
        reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
        let reservations = self.reservations.read().await;
        Ok(reservations.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Reservation>, AppError> {
        let reservations = self.reservations.read().await;
        let mut all: Vec<Reservation> = reservations.values().cloned().collect();
        all.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        Ok(all)
    }

    async fn find_on_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, AppError> {
        let reservations = self.reservations.read().await;
        let mut found: Vec<Reservation> = reservations
            .values()
            .filter(|r| r.date == date)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(found)
    }

    async fn update(&self, reservation: Reservation) -> Result<Reservation, AppError> {
        let mut reservations = self.reservations.write().await;
        if !reservations.contains_key(&reservation.id) {
            return Err(AppError::NotFound("Reserva".to_string()));
        }
        reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut reservations = self.reservations.write().await;
        reservations
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Reserva".to_string()))
    }
}
