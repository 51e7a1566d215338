//! Modelo de Booking
//!
//! Reservas de pasajeros. El viaje embebido (join del backend) es la fuente
//! de conductor, vehículo y estado para atribuir ingresos.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::trip::Trip;

/// Estado de la reserva
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    PickedUp,
    OnBoard,
    Completed,
    Cancelled,
    Expired,
}

impl BookingStatus {
    /// Solo estas reservas cuentan para ingresos y analytics de conductores
    pub fn is_revenue_eligible(&self) -> bool {
        matches!(
            self,
            BookingStatus::Confirmed
                | BookingStatus::Completed
                | BookingStatus::PickedUp
                | BookingStatus::OnBoard
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub trip_id: Uuid,
    #[serde(default)]
    pub passenger_id: Option<Uuid>,
    #[serde(default)]
    pub passenger_phone: Option<String>,
    #[serde(default)]
    pub seats_booked: i32,
    #[serde(default)]
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    /// Viaje unido, ausente si el backend no hizo el join
    #[serde(default)]
    pub trip: Option<Trip>,
}

impl Booking {
    pub fn governing_trip(&self) -> Option<&Trip> {
        self.trip.as_ref()
    }
}
