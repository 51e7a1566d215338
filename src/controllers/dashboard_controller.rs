//! Controller del dashboard
//!
//! Guarda el snapshot, los filtros y el rango activos y recalcula la vista
//! completa cada vez que alguno cambia. La acción "ver detalles" de una
//! barra o tarjeta se delega en un handler inyectado.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DashboardConfig;
use crate::controllers::tooltip_controller::TooltipController;
use crate::dto::snapshot_dto::{DashboardSnapshot, FilterRequest};
use crate::models::analytics::{DashboardView, TimeRange};
use crate::models::trip::Trip;
use crate::services::dashboard_service::DashboardService;
use crate::services::record_filter_service::FilterSet;
use crate::utils::errors::{not_found_error, AppResult};

/// Receptor de la acción "ver detalles del viaje"
pub trait TripDetailsHandler: Send + Sync {
    fn on_view_trip_details(&self, trip: &Trip);
}

impl<F> TripDetailsHandler for F
where
    F: Fn(&Trip) + Send + Sync,
{
    fn on_view_trip_details(&self, trip: &Trip) {
        self(trip)
    }
}

pub struct DashboardController {
    service: DashboardService,
    snapshot: DashboardSnapshot,
    filters: FilterSet,
    range: TimeRange,
    view: DashboardView,
    tooltip: TooltipController,
    trip_details: Box<dyn TripDetailsHandler>,
}

impl DashboardController {
    pub fn new(
        config: DashboardConfig,
        snapshot: DashboardSnapshot,
        trip_details: impl TripDetailsHandler + 'static,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        let tooltip = TooltipController::new(config.tooltip.clone());
        let service = DashboardService::new(config)?;
        let filters = FilterSet::default();
        let range = TimeRange::default();
        let view = service.build(&snapshot, &filters, range, now);

        info!(
            "✅ Dashboard iniciado con {} viajes y {} reservas",
            snapshot.trips.len(),
            snapshot.bookings.len()
        );

        Ok(Self {
            service,
            snapshot,
            filters,
            range,
            view,
            tooltip,
            trip_details: Box::new(trip_details),
        })
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn time_range(&self) -> TimeRange {
        self.range
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    pub fn set_filters(&mut self, filters: FilterSet, now: DateTime<Utc>) -> &DashboardView {
        self.filters = filters;
        self.refresh(now)
    }

    pub fn set_time_range(&mut self, range: TimeRange, now: DateTime<Utc>) -> &DashboardView {
        self.range = range;
        self.refresh(now)
    }

    /// Aplica filtros y rango tal como llegan de la UI
    pub fn apply_request(&mut self, request: &FilterRequest, now: DateTime<Utc>) -> AppResult<&DashboardView> {
        self.filters = request.to_filter_set()?;
        self.range = request.time_range;
        Ok(self.refresh(now))
    }

    /// Sustituye las colecciones (p. ej. tras recargar del backend)
    pub fn replace_snapshot(&mut self, snapshot: DashboardSnapshot, now: DateTime<Utc>) -> &DashboardView {
        self.snapshot = snapshot;

        // El viaje del tooltip puede haber desaparecido
        let stale = self
            .tooltip
            .state()
            .anchor()
            .map(|anchor| self.snapshot.trips.iter().all(|trip| trip.id != anchor.trip.id))
            .unwrap_or(false);
        if stale {
            self.tooltip.hide_now();
        }

        self.refresh(now)
    }

    /// Recalcula la vista con el reloj dado
    pub fn refresh(&mut self, now: DateTime<Utc>) -> &DashboardView {
        self.view = self.service.build(&self.snapshot, &self.filters, self.range, now);
        &self.view
    }

    /// Activa "ver detalles" sobre un viaje visible en la vista actual
    pub fn view_trip_details(&self, trip_id: Uuid) -> AppResult<()> {
        let trip = self
            .view
            .find_trip(trip_id)
            .ok_or_else(|| not_found_error("Trip", &trip_id.to_string()))?;

        debug!("🔎 Detalles del viaje {}", trip.id);
        self.trip_details.on_view_trip_details(trip);
        Ok(())
    }
}
