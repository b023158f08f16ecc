// src/services/reservation_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReservationRepository,
    models::reservation::{
        CreateReservationPayload, Reservation, ReservationStatus, UpdateReservationPayload,
    },
};

#[derive(Clone)]
pub struct ReservationService {
    reservation_repo: Arc<dyn ReservationRepository>,
}

impl ReservationService {
    pub fn new(reservation_repo: Arc<dyn ReservationRepository>) -> Self {
        Self { reservation_repo }
    }

    pub async fn create_reservation(
        &self,
        payload: CreateReservationPayload,
    ) -> Result<Reservation, AppError> {
        let now = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            customer_name: payload.customer_name,
            phone: payload.phone,
            email: payload.email,
            date: payload.date,
            time: payload.time,
            people: payload.people,
            special_requests: payload.special_requests.unwrap_or_default(),
            status: ReservationStatus::Pending,
            table: String::new(),
            created_at: now,
            updated_at: now,
        };
        self.reservation_repo.insert(reservation).await
    }

    pub async fn get_reservations(&self) -> Result<Vec<Reservation>, AppError> {
        self.reservation_repo.list_all().await
    }

    pub async fn get_reservation(&self, id: Uuid) -> Result<Reservation, AppError> {
        self.reservation_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva".to_string()))
    }

    pub async fn update_reservation(
        &self,
        id: Uuid,
        payload: UpdateReservationPayload,
    ) -> Result<Reservation, AppError> {
        let mut reservation = self.get_reservation(id).await?;

        if let Some(customer_name) = payload.customer_name {
            reservation.customer_name = customer_name;
        }
        if let Some(phone) = payload.phone {
            reservation.phone = phone;
        }
        if let Some(email) = payload.email {
            reservation.email = Some(email);
        }
        if let Some(date) = payload.date {
            reservation.date = date;
        }
        if let Some(time) = payload.time {
            reservation.time = time;
        }
        if let Some(people) = payload.people {
            reservation.people = people;
        }
        if let Some(special_requests) = payload.special_requests {
            reservation.special_requests = special_requests;
        }
        if let Some(status) = payload.status {
            reservation.status = status;
        }
        if let Some(table) = payload.table {
            reservation.table = table;
        }
        reservation.updated_at = Utc::now();

        self.reservation_repo.update(reservation).await
    }

    pub async fn delete_reservation(&self, id: Uuid) -> Result<(), AppError> {
        self.reservation_repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryReservationRepository;
    use chrono::NaiveDate;

    fn service() -> ReservationService {
        ReservationService::new(Arc::new(InMemoryReservationRepository::new()))
    }

    fn payload(date: &str, time: &str) -> CreateReservationPayload {
        CreateReservationPayload {
            customer_name: "Cliente".to_string(),
            phone: "0901234567".to_string(),
            email: None,
            date: date.parse::<NaiveDate>().unwrap(),
            time: time.to_string(),
            people: 4,
            special_requests: None,
        }
    }

    #[tokio::test]
    async fn agenda_em_ordem_de_dia_e_horario() {
        let service = service();
        let late = service.create_reservation(payload("2025-05-19", "20:00")).await.unwrap();
        let early = service.create_reservation(payload("2025-05-19", "18:30")).await.unwrap();
        let other_day = service.create_reservation(payload("2025-05-18", "21:00")).await.unwrap();

        let agenda = service.get_reservations().await.unwrap();
        let ids: Vec<Uuid> = agenda.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![other_day.id, early.id, late.id]);
    }

    #[tokio::test]
    async fn confirmacao_atribui_mesa() {
        let service = service();
        let reservation = service.create_reservation(payload("2025-05-19", "19:30")).await.unwrap();
        assert_eq!(reservation.status, ReservationStatus::Pending);

        let updated = service
            .update_reservation(
                reservation.id,
                UpdateReservationPayload {
                    customer_name: None,
                    phone: None,
                    email: None,
                    date: None,
                    time: None,
                    people: None,
                    special_requests: None,
                    status: Some(ReservationStatus::Confirmed),
                    table: Some("7".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, ReservationStatus::Confirmed);
        assert_eq!(updated.table, "7");
    }
}
