//! DTOs del snapshot del dashboard
//!
//! Formas de entrada tal como llegan del frontend/backend: colecciones ya
//! cargadas y la selección de filtros con el centinela `"ALL"`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::analytics::TimeRange;
use crate::models::booking::Booking;
use crate::models::notification::Notification;
use crate::models::profile::Profile;
use crate::models::trip::{Trip, TripStatus};
use crate::models::vehicle::VehicleKey;
use crate::services::record_filter_service::{Facet, FilterSet};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{validate_booking, validate_trip};

/// Valor centinela que desactiva una faceta
pub const ALL_SENTINEL: &str = "ALL";

/// Colecciones ya cargadas que el dashboard recibe en cada render
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub current_user: Option<Profile>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl DashboardSnapshot {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Registra los registros que violan invariantes de datos y devuelve cuántos
    pub fn report_data_quality(&self) -> usize {
        let mut violations = 0;

        for trip in &self.trips {
            if let Err(e) = validate_trip(trip) {
                warn!("⚠️ Viaje {} con datos inconsistentes: {}", trip.id, e);
                violations += 1;
            }
        }

        for booking in &self.bookings {
            if let Err(e) = validate_booking(booking) {
                warn!("⚠️ Reserva {} con datos inconsistentes: {}", booking.id, e);
                violations += 1;
            }
        }

        violations
    }
}

/// Selección de una faceta: `"ALL"` o lista de valores
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FacetSelection {
    Token(String),
    Values(Vec<String>),
}

impl Default for FacetSelection {
    fn default() -> Self {
        FacetSelection::Token(ALL_SENTINEL.to_string())
    }
}

impl FacetSelection {
    /// `None` si la selección es `ALL`, si no los valores seleccionados
    fn values(self) -> Option<Vec<String>> {
        let values = match self {
            FacetSelection::Token(token) => vec![token],
            FacetSelection::Values(values) => values,
        };

        if values.iter().any(|v| v.trim().eq_ignore_ascii_case(ALL_SENTINEL)) {
            None
        } else {
            Some(values)
        }
    }
}

/// Filtros seleccionados en la UI
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterRequest {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub drivers: FacetSelection,
    #[serde(default)]
    pub vehicles: FacetSelection,
    #[serde(default)]
    pub statuses: FacetSelection,
    #[serde(default)]
    pub time_range: TimeRange,
}

impl FilterRequest {
    /// Convierte la selección cruda en un `FilterSet` estructurado.
    ///
    /// Una clave de vehículo mal formada queda fuera del conjunto (no
    /// coincide con ningún registro); un estado desconocido es un error.
    pub fn to_filter_set(&self) -> AppResult<FilterSet> {
        let drivers = match self.drivers.clone().values() {
            None => Facet::All,
            Some(names) => Facet::only(names.into_iter().map(|n| n.trim().to_string())),
        };

        let vehicles = match self.vehicles.clone().values() {
            None => Facet::All,
            Some(keys) => {
                let mut parsed = HashSet::new();
                for key in keys {
                    match key.parse::<VehicleKey>() {
                        Ok(key) => {
                            parsed.insert(key);
                        }
                        Err(e) => warn!("⚠️ Clave de vehículo ignorada: {}", e),
                    }
                }
                Facet::Only(parsed)
            }
        };

        let statuses = match self.statuses.clone().values() {
            None => Facet::All,
            Some(values) => Facet::Only(
                values
                    .iter()
                    .map(|value| value.parse::<TripStatus>())
                    .collect::<Result<HashSet<_>, AppError>>()?,
            ),
        };

        Ok(FilterSet {
            search: self.search.clone(),
            drivers,
            vehicles,
            statuses,
        })
    }
}

/// Entrada completa del binario: snapshot + filtros
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardRequest {
    #[serde(flatten)]
    pub snapshot: DashboardSnapshot,
    #[serde(default)]
    pub filters: FilterRequest,
}

impl DashboardRequest {
    /// Lee la entrada del binario desde un fichero JSON
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let request: Self = serde_json::from_str(&raw)?;

        debug!(
            "📥 Snapshot cargado desde {}: {} viajes, {} reservas",
            path.as_ref().display(),
            request.snapshot.trips.len(),
            request.snapshot.bookings.len()
        );
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_filter_request_is_all() {
        let request: FilterRequest = serde_json::from_value(json!({})).unwrap();
        let filters = request.to_filter_set().unwrap();

        assert_eq!(filters, FilterSet::default());
        assert_eq!(request.time_range, TimeRange::ThisMonth);
    }

    #[test]
    fn test_facet_selection_parsing() {
        let request: FilterRequest = serde_json::from_value(json!({
            "search": "limo",
            "drivers": ["Ngô Văn H"],
            "vehicles": ["51A-123.45 ✧ Ngô Văn H", "broken-key"],
            "statuses": "ON_TRIP",
            "time_range": "LAST_7D"
        }))
        .unwrap();

        let filters = request.to_filter_set().unwrap();

        assert_eq!(filters.search, "limo");
        assert_eq!(filters.drivers, Facet::only(["Ngô Văn H".to_string()]));
        assert_eq!(
            filters.vehicles,
            Facet::only(["51A-123.45 ✧ Ngô Văn H".parse::<VehicleKey>().unwrap()])
        );
        assert_eq!(filters.statuses, Facet::only([TripStatus::OnTrip]));
        assert_eq!(request.time_range, TimeRange::Last7Days);
    }

    #[test]
    fn test_all_inside_list_disables_facet() {
        let request: FilterRequest = serde_json::from_value(json!({
            "drivers": ["Ngô Văn H", "ALL"]
        }))
        .unwrap();

        assert!(request.to_filter_set().unwrap().drivers.is_all());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let request: FilterRequest = serde_json::from_value(json!({
            "statuses": ["DELAYED"]
        }))
        .unwrap();

        assert!(matches!(request.to_filter_set(), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_snapshot_from_json_and_quality_report() {
        let snapshot = DashboardSnapshot::from_json(
            &json!({
                "trips": [{
                    "id": "7b4f3a52-2a51-4f0b-9d0a-5c2a0b1c9e10",
                    "departure_time": "2024-03-15T08:00:00Z",
                    "seats": 4,
                    "available_seats": 6,
                    "status": "FULL"
                }]
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(snapshot.trips.len(), 1);
        assert!(snapshot.bookings.is_empty());
        assert_eq!(snapshot.report_data_quality(), 1);
    }

    #[tokio::test]
    async fn test_request_from_path() {
        let path = std::env::temp_dir().join(format!("dashboard-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, json!({ "filters": { "time_range": "ALL" } }).to_string())
            .await
            .unwrap();

        let request = DashboardRequest::from_path(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(request.filters.time_range, TimeRange::All);
        assert!(request.snapshot.trips.is_empty());
    }

    #[tokio::test]
    async fn test_request_from_missing_path() {
        let path = std::env::temp_dir().join(format!("missing-{}.json", uuid::Uuid::new_v4()));

        assert!(matches!(DashboardRequest::from_path(&path).await, Err(AppError::Io(_))));
    }

    #[test]
    fn test_null_vehicle_info_loads_and_only_matches_all() {
        use crate::services::record_filter_service::{FilterSubject, RecordFilterService};

        let snapshot = DashboardSnapshot::from_json(
            &json!({
                "trips": [{
                    "id": "7b4f3a52-2a51-4f0b-9d0a-5c2a0b1c9e10",
                    "driver_name": "Ngô Văn H",
                    "departure_time": "2024-03-15T08:00:00Z",
                    "vehicle_info": null,
                    "status": "PREPARING"
                }]
            })
            .to_string(),
        )
        .unwrap();

        let trip = &snapshot.trips[0];
        assert!(trip.vehicle_key().is_none());
        assert!(RecordFilterService::matches(FilterSubject::Trip(trip), &FilterSet::default()));

        let filters = FilterSet {
            vehicles: Facet::only(["51A-123.45 ✧ Ngô Văn H".parse::<VehicleKey>().unwrap()]),
            ..FilterSet::default()
        };
        assert!(!RecordFilterService::matches(FilterSubject::Trip(trip), &filters));
    }

    #[test]
    fn test_snapshot_from_invalid_json() {
        assert!(matches!(DashboardSnapshot::from_json("{"), Err(AppError::Json(_))));
    }
}
