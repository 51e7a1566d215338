//! Modelo de Trip
//!
//! Este módulo contiene el struct Trip y su estado. Los viajes son snapshots
//! de solo lectura entregados por el backend en cada render.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::profile::Profile;
use crate::models::vehicle::{VehicleInfo, VehicleKey};
use crate::utils::errors::AppError;

/// Estado del viaje
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Preparing,
    Urgent,
    Full,
    OnTrip,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub const ALL: [TripStatus; 6] = [
        TripStatus::Preparing,
        TripStatus::Urgent,
        TripStatus::Full,
        TripStatus::OnTrip,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Preparing => "PREPARING",
            TripStatus::Urgent => "URGENT",
            TripStatus::Full => "FULL",
            TripStatus::OnTrip => "ON_TRIP",
            TripStatus::Completed => "COMPLETED",
            TripStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        TripStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| AppError::Parse(format!("unknown trip status '{}'", value)))
    }
}

/// Viaje publicado por un conductor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    pub id: Uuid,
    #[serde(default)]
    pub driver_id: Option<Uuid>,
    /// Nombre tal como quedó guardado en el viaje
    #[serde(default)]
    pub driver_name: Option<String>,
    /// Perfil del conductor unido por el backend
    #[serde(default)]
    pub driver_profile: Option<Profile>,
    #[serde(default)]
    pub origin_name: Option<String>,
    #[serde(default)]
    pub origin_desc: Option<String>,
    #[serde(default)]
    pub dest_name: Option<String>,
    #[serde(default)]
    pub dest_desc: Option<String>,
    pub departure_time: DateTime<Utc>,
    #[serde(default)]
    pub arrival_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub seats: i32,
    #[serde(default)]
    pub available_seats: i32,
    #[serde(default)]
    pub vehicle_info: VehicleInfo,
    pub status: TripStatus,
    #[serde(default)]
    pub trip_code: Option<String>,
}

impl Trip {
    /// Nombre visible del conductor: perfil unido, luego el campo crudo
    pub fn driver_display_name(&self) -> &str {
        self.driver_profile
            .as_ref()
            .and_then(Profile::display_name)
            .or_else(|| {
                self.driver_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
            })
            .unwrap_or("")
    }

    pub fn vehicle_key(&self) -> Option<VehicleKey> {
        VehicleKey::derive(&self.vehicle_info, self.driver_display_name())
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == TripStatus::Cancelled
    }
}
